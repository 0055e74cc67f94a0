//! Area file lookup for document templates.
//!
//! A template directory holds one shared file pair per render area and an
//! optional override directory per document type:
//!
//! ```text
//! template/
//! ├── header.html        shared default
//! ├── header.css
//! ├── body.css
//! ├── footer.html
//! ├── footer.css
//! └── Invoice/
//!     ├── header.html    override for Invoice only
//!     ├── body.html
//!     └── body.css
//! ```
//!
//! [`TemplateDir::resolve`] prefers the type-specific file and falls back to
//! the shared one. HTML and CSS are resolved independently, so a type can
//! override only its stylesheet. Nothing is cached: every lookup hits the
//! filesystem, which keeps edits to deployed templates visible immediately.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

/// A section of an output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderArea {
    Header,
    Body,
    Footer,
}

impl RenderArea {
    /// All areas, in document order.
    pub const ALL: [RenderArea; 3] = [RenderArea::Header, RenderArea::Body, RenderArea::Footer];

    /// File stem used for this area (`header`, `body`, `footer`).
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderArea::Header => "header",
            RenderArea::Body => "body",
            RenderArea::Footer => "footer",
        }
    }

    /// File name for the given asset of this area, e.g. `header.css`.
    pub fn file_name(&self, kind: AssetKind) -> String {
        format!("{}.{}", self.as_str(), kind.extension())
    }
}

impl fmt::Display for RenderArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The two files making up an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    Html,
    Css,
}

impl AssetKind {
    pub fn extension(&self) -> &'static str {
        match self {
            AssetKind::Html => "html",
            AssetKind::Css => "css",
        }
    }
}

/// Where a lookup found its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedFile {
    /// Found in the document type's own directory.
    Override(PathBuf),
    /// Found at the template root.
    Shared(PathBuf),
}

impl ResolvedFile {
    pub fn path(&self) -> &Path {
        match self {
            ResolvedFile::Override(path) | ResolvedFile::Shared(path) => path,
        }
    }

    pub fn is_override(&self) -> bool {
        matches!(self, ResolvedFile::Override(_))
    }

    /// Reads the file's content from disk.
    pub fn read(&self) -> Result<String, RenderError> {
        std::fs::read_to_string(self.path()).map_err(|e| RenderError::io(self.path(), e))
    }
}

/// A template directory with per-type override subdirectories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the override file for `type_name`, whether or not it exists.
    pub fn override_path(&self, type_name: &str, area: RenderArea, kind: AssetKind) -> PathBuf {
        self.root.join(type_name).join(area.file_name(kind))
    }

    /// Path of the shared default file, whether or not it exists.
    pub fn shared_path(&self, area: RenderArea, kind: AssetKind) -> PathBuf {
        self.root.join(area.file_name(kind))
    }

    /// Looks up the override file only.
    pub fn find_override(
        &self,
        type_name: &str,
        area: RenderArea,
        kind: AssetKind,
    ) -> Option<ResolvedFile> {
        let path = self.override_path(type_name, area, kind);
        path.is_file().then_some(ResolvedFile::Override(path))
    }

    /// Looks up the shared default file only.
    pub fn find_shared(&self, area: RenderArea, kind: AssetKind) -> Option<ResolvedFile> {
        let path = self.shared_path(area, kind);
        path.is_file().then_some(ResolvedFile::Shared(path))
    }

    /// Resolves a file, preferring the override for `type_name`.
    ///
    /// With `type_name == None` only the shared file is considered.
    /// Returns `None` when neither file exists.
    pub fn resolve(
        &self,
        type_name: Option<&str>,
        area: RenderArea,
        kind: AssetKind,
    ) -> Option<ResolvedFile> {
        let found = type_name
            .and_then(|name| self.find_override(name, area, kind))
            .or_else(|| self.find_shared(area, kind));

        match &found {
            Some(file) => tracing::debug!(
                area = %area,
                kind = kind.extension(),
                path = %file.path().display(),
                is_override = file.is_override(),
                "resolved template file"
            ),
            None => tracing::debug!(area = %area, kind = kind.extension(), "no template file"),
        }

        found
    }
}
