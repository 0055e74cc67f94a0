//! The accounting template provider.
//!
//! [`AccountingTemplate`] is what the host's output pipeline talks to. For
//! each area of a document it resolves the file pair, runs the bindings the
//! area needs, and returns `<style>{css}</style>` followed by the rendered
//! HTML.
//!
//! # Area rules
//!
//! | Area | HTML | CSS |
//! |------|------|-----|
//! | header | override, else shared | override, else shared |
//! | body | override only, else [`TemplateError::MissingTemplate`] | override, else shared (configurable), else no style block |
//! | footer | override, else shared | override, else shared |
//!
//! Nothing is cached. Every call re-reads the template files.

use accounting_template_render::{
    AssetKind, MiniJinjaEngine, RenderArea, ResolvedFile, TemplateDir, TemplateEngine,
};

use crate::binding::Binder;
use crate::config::ProviderConfig;
use crate::context::{Entity, RenderContext};
use crate::entity::{DocumentKind, EntityType, TemplateDescriptor, SYSTEM_DEFAULT_TEMPLATE};
use crate::error::{ConfigError, TemplateError};
use crate::pdf::{OutputSource, PdfDocument, PdfLayout};
use crate::services::{Locale, Services};

/// Translation key of the template title.
pub const TITLE_KEY: &str = "package.title";

/// Output-template provider for accounting documents.
#[derive(Debug)]
pub struct AccountingTemplate {
    config: ProviderConfig,
    services: Services,
    template_dir: TemplateDir,
}

impl AccountingTemplate {
    /// Identity the host records on outputs produced by this provider.
    pub const PROVIDER_ID: &'static str = "accounting_template::AccountingTemplate";

    /// Creates a provider, locating the template directory through the package store.
    pub fn new(config: ProviderConfig, services: Services) -> Result<Self, ConfigError> {
        let package = services.packages.package(&config.package)?;
        let template_dir = TemplateDir::new(package.dir().join(&config.template_dir));
        tracing::debug!(
            package = %config.package,
            template_dir = %template_dir.root().display(),
            "accounting templates ready"
        );
        Ok(Self {
            config,
            services,
            template_dir,
        })
    }

    /// Creates a provider over an explicit template directory.
    pub fn with_template_dir(
        template_dir: TemplateDir,
        config: ProviderConfig,
        services: Services,
    ) -> Self {
        Self {
            config,
            services,
            template_dir,
        }
    }

    /// All document types this provider has templates for.
    pub fn entity_types() -> &'static [EntityType] {
        &EntityType::ALL
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    pub fn template_dir(&self) -> &TemplateDir {
        &self.template_dir
    }

    /// A fresh engine whose includes resolve inside the template directory.
    pub fn engine(&self) -> MiniJinjaEngine {
        MiniJinjaEngine::with_template_dir(self.template_dir.root())
    }

    /// Templates available for `entity_type`. Empty for unknown types.
    pub fn get_templates(&self, entity_type: &str) -> Vec<TemplateDescriptor> {
        match DocumentKind::from(entity_type) {
            DocumentKind::Known(_) => vec![TemplateDescriptor {
                id: SYSTEM_DEFAULT_TEMPLATE.to_string(),
                title: self.get_template_title(SYSTEM_DEFAULT_TEMPLATE, None),
            }],
            DocumentKind::Unknown(_) => Vec::new(),
        }
    }

    /// Localized title of a template. Uses the provider's locale unless one is given.
    pub fn get_template_title(&self, _template_id: &str, locale: Option<&dyn Locale>) -> String {
        let locale: &dyn Locale = match locale {
            Some(locale) => locale,
            None => self.services.locale.as_ref(),
        };
        locale.get(&self.config.package, TITLE_KEY)
    }

    pub fn get_header_html(
        &self,
        template_id: &str,
        entity_type: &str,
        engine: &mut dyn TemplateEngine,
        entity: &dyn Entity,
    ) -> Result<String, TemplateError> {
        self.render_area(RenderArea::Header, template_id, entity_type, engine, entity)
    }

    /// Fails with [`TemplateError::MissingTemplate`] when the type has no `body.html`.
    pub fn get_body_html(
        &self,
        template_id: &str,
        entity_type: &str,
        engine: &mut dyn TemplateEngine,
        entity: &dyn Entity,
    ) -> Result<String, TemplateError> {
        self.render_area(RenderArea::Body, template_id, entity_type, engine, entity)
    }

    pub fn get_footer_html(
        &self,
        template_id: &str,
        entity_type: &str,
        engine: &mut dyn TemplateEngine,
        entity: &dyn Entity,
    ) -> Result<String, TemplateError> {
        self.render_area(RenderArea::Footer, template_id, entity_type, engine, entity)
    }

    /// Renders one area of a document.
    pub fn render_area(
        &self,
        area: RenderArea,
        template_id: &str,
        entity_type: &str,
        engine: &mut dyn TemplateEngine,
        entity: &dyn Entity,
    ) -> Result<String, TemplateError> {
        let kind = DocumentKind::from(entity_type);
        let ctx = RenderContext::new(&kind, template_id, entity);
        let binder = Binder::new(&self.services, &self.config.erp_package);

        let (html, css) = match area {
            RenderArea::Header => {
                binder.bind_header(&ctx, engine);
                (self.shared_fallback_html(&kind, area)?, self.shared_fallback_css(&kind, area))
            }
            RenderArea::Body => (self.body_html(&kind)?, self.body_css(&kind)),
            RenderArea::Footer => {
                binder.bind_footer(&ctx, engine);
                (self.shared_fallback_html(&kind, area)?, self.shared_fallback_css(&kind, area))
            }
        };

        let mut output = String::new();
        if let Some(css) = css {
            output.push_str("<style>");
            output.push_str(&css.read()?);
            output.push_str("</style>");
        } else if area != RenderArea::Body {
            tracing::warn!(area = %area, kind = %kind, "no stylesheet found");
            output.push_str("<style></style>");
        }
        output.push_str(&engine.fetch(html.path())?);

        tracing::debug!(
            area = %area,
            kind = %kind,
            template_id,
            html = %html.path().display(),
            "rendered area"
        );
        Ok(output)
    }

    /// Forwards the host's PDF-create event to the configured layout.
    pub fn on_pdf_create(&self, output: &dyn OutputSource, document: &mut dyn PdfDocument) {
        self.config.pdf.on_pdf_create(output, document);
    }

    pub fn pdf_layout(&self) -> &PdfLayout {
        &self.config.pdf
    }

    fn type_dir_name(kind: &DocumentKind) -> Option<&'static str> {
        kind.entity_type().map(|t| t.as_str())
    }

    fn shared_fallback_html(
        &self,
        kind: &DocumentKind,
        area: RenderArea,
    ) -> Result<ResolvedFile, TemplateError> {
        self.template_dir
            .resolve(Self::type_dir_name(kind), area, AssetKind::Html)
            .ok_or_else(|| {
                TemplateError::missing(self.template_dir.shared_path(area, AssetKind::Html))
            })
    }

    fn shared_fallback_css(&self, kind: &DocumentKind, area: RenderArea) -> Option<ResolvedFile> {
        self.template_dir
            .resolve(Self::type_dir_name(kind), area, AssetKind::Css)
    }

    fn body_html(&self, kind: &DocumentKind) -> Result<ResolvedFile, TemplateError> {
        let found = Self::type_dir_name(kind).and_then(|name| {
            self.template_dir
                .find_override(name, RenderArea::Body, AssetKind::Html)
        });

        found.ok_or_else(|| {
            TemplateError::missing(self.template_dir.override_path(
                kind.name(),
                RenderArea::Body,
                AssetKind::Html,
            ))
        })
    }

    fn body_css(&self, kind: &DocumentKind) -> Option<ResolvedFile> {
        let own = Self::type_dir_name(kind).and_then(|name| {
            self.template_dir
                .find_override(name, RenderArea::Body, AssetKind::Css)
        });

        if own.is_some() || !self.config.body_css_fallback {
            return own;
        }
        self.template_dir.find_shared(RenderArea::Body, AssetKind::Css)
    }
}
