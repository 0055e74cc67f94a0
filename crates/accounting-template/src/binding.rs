//! Variable binding before fragments render.
//!
//! Header fragments reference display values that are not part of the engine
//! state the host prepared: a formatted date, the supplier of a purchasing
//! process, the company record for SEPA mandates. [`HeaderBinding`] decides
//! per document type which of these to compute, and [`Binder`] computes them
//! and assigns them on the engine.
//!
//! | Type | Binds |
//! |------|-------|
//! | `Dunning`, `Offer` | nothing |
//! | `Canceled`, `CreditNote`, `Invoice` | `dateFormatted` from the `date` attribute, locale-formatted |
//! | `Contract` | `dateFormatted` from the entity's own date accessor |
//! | `OpenItemsList` | `dateFormatted` from the `OpenItemsList` engine variable |
//! | `SEPADirectDebitAgreement` | `company` from the ERP package config |
//! | `PurchasingProcess` | `Customer`, `dateFormatted`, `Payment` |
//!
//! Unknown document kinds skip the table. Every header and footer pass,
//! unknown kinds included, binds `entityType` to the kind's name so shared
//! fragments can branch on it. Footers get the ERP package's full
//! configuration as `Config`.
//!
//! Binding never fails a render: a value that cannot be computed is logged
//! and left unbound, except `Payment`, which falls back to the no-payment
//! sentinel. Each pass first removes the variables it owns
//! ([`HEADER_VARIABLES`], [`FOOTER_VARIABLES`]), so an engine reused across
//! documents never shows a previous document's values.

use serde_json::Value;

use accounting_template_render::TemplateEngine;

use crate::context::RenderContext;
use crate::entity::{DocumentKind, EntityType};
use crate::error::ConfigError;
use crate::services::{parse_timestamp, PaymentBinding, Services};

pub const DATE_FORMATTED: &str = "dateFormatted";
pub const COMPANY: &str = "company";
pub const CUSTOMER: &str = "Customer";
pub const PAYMENT: &str = "Payment";
pub const CONFIG: &str = "Config";
pub const ENTITY_TYPE: &str = "entityType";
pub const OPEN_ITEMS_LIST: &str = "OpenItemsList";

/// Variables a header pass computes. Removed before each pass.
pub const HEADER_VARIABLES: [&str; 4] = [DATE_FORMATTED, COMPANY, CUSTOMER, PAYMENT];

/// Variables a footer pass computes. Removed before each pass.
pub const FOOTER_VARIABLES: [&str; 1] = [CONFIG];

/// The header binding behavior of a document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderBinding {
    Nothing,
    /// Parse the `date` attribute and format it for the locale.
    LocaleDate,
    /// Use the entity's date accessor as is.
    EntityDate,
    /// Copy the date from the companion `OpenItemsList` variable.
    OpenItemsListDate,
    /// Expose the ERP company section.
    Company,
    /// Supplier, date and payment method of a purchasing process.
    PurchasingProcess,
}

impl HeaderBinding {
    pub fn for_type(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Dunning | EntityType::Offer => HeaderBinding::Nothing,
            EntityType::Canceled | EntityType::CreditNote | EntityType::Invoice => {
                HeaderBinding::LocaleDate
            }
            EntityType::Contract => HeaderBinding::EntityDate,
            EntityType::OpenItemsList => HeaderBinding::OpenItemsListDate,
            EntityType::SEPADirectDebitAgreement => HeaderBinding::Company,
            EntityType::PurchasingProcess => HeaderBinding::PurchasingProcess,
        }
    }

    /// Total over all kinds: unknown kinds bind nothing.
    pub fn for_kind(kind: &DocumentKind) -> Self {
        kind.entity_type()
            .map(Self::for_type)
            .unwrap_or(HeaderBinding::Nothing)
    }
}

/// Computes bindings and assigns them on an engine.
pub struct Binder<'a> {
    services: &'a Services,
    erp_package: &'a str,
}

impl<'a> Binder<'a> {
    pub fn new(services: &'a Services, erp_package: &'a str) -> Self {
        Self {
            services,
            erp_package,
        }
    }

    /// Binds the header variables for `ctx`. Returns the names it bound.
    pub fn bind_header(
        &self,
        ctx: &RenderContext<'_>,
        engine: &mut dyn TemplateEngine,
    ) -> Vec<&'static str> {
        unassign_all(engine, &HEADER_VARIABLES);
        let mut bound = Vec::new();
        engine.assign(ENTITY_TYPE, Value::from(ctx.kind.name()));
        bound.push(ENTITY_TYPE);

        match HeaderBinding::for_kind(ctx.kind) {
            HeaderBinding::Nothing => {}
            HeaderBinding::LocaleDate => {
                if let Some(date) = self.locale_date(ctx.entity.attribute("date"), ctx.kind) {
                    engine.assign(DATE_FORMATTED, Value::from(date));
                    bound.push(DATE_FORMATTED);
                }
            }
            HeaderBinding::EntityDate => match ctx.entity.date() {
                Some(date) => {
                    engine.assign(DATE_FORMATTED, date);
                    bound.push(DATE_FORMATTED);
                }
                None => tracing::debug!(kind = %ctx.kind, "entity has no date"),
            },
            HeaderBinding::OpenItemsListDate => {
                let date = engine
                    .variable(OPEN_ITEMS_LIST)
                    .and_then(|list| list.get(DATE_FORMATTED))
                    .cloned();
                match date {
                    Some(date) => {
                        engine.assign(DATE_FORMATTED, date);
                        bound.push(DATE_FORMATTED);
                    }
                    None => tracing::warn!(
                        kind = %ctx.kind,
                        "no {} variable with a date to bind",
                        OPEN_ITEMS_LIST
                    ),
                }
            }
            HeaderBinding::Company => match self.company() {
                Ok(company) => {
                    engine.assign(COMPANY, company);
                    bound.push(COMPANY);
                }
                Err(err) => tracing::warn!(kind = %ctx.kind, error = %err, "company config unavailable"),
            },
            HeaderBinding::PurchasingProcess => {
                self.bind_purchasing_process(ctx, engine, &mut bound);
            }
        }

        tracing::debug!(kind = %ctx.kind, bound = ?bound, "bound header variables");
        bound
    }

    /// Binds the footer variables. A missing configuration is logged and skipped.
    pub fn bind_footer(
        &self,
        ctx: &RenderContext<'_>,
        engine: &mut dyn TemplateEngine,
    ) -> Vec<&'static str> {
        unassign_all(engine, &FOOTER_VARIABLES);
        let mut bound = vec![ENTITY_TYPE];
        engine.assign(ENTITY_TYPE, Value::from(ctx.kind.name()));

        match self.config() {
            Ok(config) => {
                engine.assign(CONFIG, config);
                bound.push(CONFIG);
            }
            Err(err) => tracing::error!(
                package = self.erp_package,
                error = %err,
                "footer rendered without Config"
            ),
        }
        bound
    }

    /// The ERP package's `company` section.
    pub fn company(&self) -> Result<Value, ConfigError> {
        let package = self.services.packages.package(self.erp_package)?;
        Ok(Value::Object(package.section(COMPANY)?.clone()))
    }

    /// The ERP package's whole configuration.
    pub fn config(&self) -> Result<Value, ConfigError> {
        let package = self.services.packages.package(self.erp_package)?;
        Ok(package.config().to_value())
    }

    fn bind_purchasing_process(
        &self,
        ctx: &RenderContext<'_>,
        engine: &mut dyn TemplateEngine,
        bound: &mut Vec<&'static str>,
    ) {
        match ctx.entity.supplier() {
            Some(supplier) => {
                engine.assign(CUSTOMER, supplier);
                bound.push(CUSTOMER);
            }
            None => tracing::debug!(kind = %ctx.kind, "purchasing process has no supplier"),
        }

        let serialized = ctx.entity.to_value();

        if let Some(date) = self.locale_date(serialized.get("date").cloned(), ctx.kind) {
            engine.assign(DATE_FORMATTED, Value::from(date));
            bound.push(DATE_FORMATTED);
        }

        engine.assign(PAYMENT, self.payment(serialized.get("payment_method")).to_value());
        bound.push(PAYMENT);
    }

    fn payment(&self, method: Option<&Value>) -> PaymentBinding {
        let Some(method_id) = method.and_then(payment_method_id) else {
            return PaymentBinding::None;
        };

        match self.services.payments.payment(&method_id) {
            Ok(payment) => PaymentBinding::Method(payment),
            Err(err) => {
                tracing::warn!(method = %method_id, error = %err, "payment lookup failed");
                PaymentBinding::None
            }
        }
    }

    fn locale_date(&self, raw: Option<Value>, kind: &DocumentKind) -> Option<String> {
        let Some(raw) = raw else {
            tracing::warn!(kind = %kind, "entity has no date attribute");
            return None;
        };

        match parse_timestamp(&raw) {
            Some(timestamp) => Some(self.services.locale.date_formatter().format(&timestamp)),
            None => {
                tracing::warn!(kind = %kind, date = %raw, "unparseable entity date");
                None
            }
        }
    }
}

fn unassign_all(engine: &mut dyn TemplateEngine, names: &[&str]) {
    for name in names {
        engine.unassign(name);
    }
}

/// A usable payment method id: a non-empty string or a number.
fn payment_method_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::JsonEntity;
    use crate::error::PaymentError;
    use crate::services::{
        MemoryPackageStore, Package, PackageConfig, Payment, PaymentCatalog, PaymentLookup,
        StaticLocale,
    };
    use accounting_template_render::MiniJinjaEngine;
    use proptest::prelude::*;
    use serde_json::json;

    fn services() -> Services {
        let config = PackageConfig::new()
            .with_section(
                "company",
                json!({"name": "ACME GmbH", "creditorId": "DE98ZZZ09999999999"})
                    .as_object()
                    .unwrap()
                    .clone(),
            )
            .with_section("general", json!({"currency": "EUR"}).as_object().unwrap().clone());
        let packages =
            MemoryPackageStore::new().with_package(Package::new("erp", "/srv/erp", config));
        let payments = PaymentCatalog::new().with_payment(Payment::new("3", "Bank transfer"));
        Services::new(packages, StaticLocale::new("%d.%m.%Y"), payments)
    }

    fn bind(kind: &str, entity: &JsonEntity, engine: &mut MiniJinjaEngine) -> Vec<&'static str> {
        let services = services();
        let binder = Binder::new(&services, "erp");
        let kind = DocumentKind::from(kind);
        let ctx = RenderContext::new(&kind, "system_default", entity);
        binder.bind_header(&ctx, engine)
    }

    // =========================================================================
    // Dispatch table
    // =========================================================================

    #[test]
    fn test_dispatch_table() {
        use EntityType::*;
        assert_eq!(HeaderBinding::for_type(Dunning), HeaderBinding::Nothing);
        assert_eq!(HeaderBinding::for_type(Offer), HeaderBinding::Nothing);
        assert_eq!(HeaderBinding::for_type(Invoice), HeaderBinding::LocaleDate);
        assert_eq!(HeaderBinding::for_type(CreditNote), HeaderBinding::LocaleDate);
        assert_eq!(HeaderBinding::for_type(Canceled), HeaderBinding::LocaleDate);
        assert_eq!(HeaderBinding::for_type(Contract), HeaderBinding::EntityDate);
        assert_eq!(
            HeaderBinding::for_type(OpenItemsList),
            HeaderBinding::OpenItemsListDate
        );
        assert_eq!(
            HeaderBinding::for_type(SEPADirectDebitAgreement),
            HeaderBinding::Company
        );
        assert_eq!(
            HeaderBinding::for_type(PurchasingProcess),
            HeaderBinding::PurchasingProcess
        );
    }

    proptest! {
        #[test]
        fn test_unknown_kinds_only_bind_entity_type(name in "[A-Za-z]{1,24}") {
            prop_assume!(EntityType::parse(&name).is_none());
            let kind = DocumentKind::from(name.as_str());
            prop_assert_eq!(HeaderBinding::for_kind(&kind), HeaderBinding::Nothing);

            let mut engine = MiniJinjaEngine::new();
            let entity = JsonEntity::new().with("date", "2024-01-15");
            let bound = bind(&name, &entity, &mut engine);
            prop_assert_eq!(bound, vec![ENTITY_TYPE]);
            prop_assert!(!engine.has_variable(DATE_FORMATTED));
        }
    }

    // =========================================================================
    // Per-type bindings
    // =========================================================================

    #[test]
    fn test_invoice_date_is_locale_formatted() {
        let mut engine = MiniJinjaEngine::new();
        let entity = JsonEntity::new().with("date", "2024-01-15");

        let bound = bind("Invoice", &entity, &mut engine);

        assert_eq!(bound, vec![ENTITY_TYPE, DATE_FORMATTED]);
        assert_eq!(engine.variable(DATE_FORMATTED), Some(&json!("15.01.2024")));
        assert_eq!(engine.variable(ENTITY_TYPE), Some(&json!("Invoice")));
    }

    #[test]
    fn test_credit_note_and_canceled_share_invoice_binding() {
        for kind in ["CreditNote", "Canceled"] {
            let mut engine = MiniJinjaEngine::new();
            let entity = JsonEntity::new().with("date", "2023-12-31 10:00:00");
            bind(kind, &entity, &mut engine);
            assert_eq!(engine.variable(DATE_FORMATTED), Some(&json!("31.12.2023")));
        }
    }

    #[test]
    fn test_unparseable_date_stays_unbound() {
        let mut engine = MiniJinjaEngine::new();
        let entity = JsonEntity::new().with("date", "soon");
        let bound = bind("Invoice", &entity, &mut engine);
        assert!(!bound.contains(&DATE_FORMATTED));
        assert!(!engine.has_variable(DATE_FORMATTED));
    }

    #[test]
    fn test_reused_engine_drops_previous_date() {
        let mut engine = MiniJinjaEngine::new();
        bind("Invoice", &JsonEntity::new().with("date", "2024-01-15"), &mut engine);
        assert_eq!(engine.variable(DATE_FORMATTED), Some(&json!("15.01.2024")));

        bind("Invoice", &JsonEntity::new().with("date", "not a date"), &mut engine);
        assert!(!engine.has_variable(DATE_FORMATTED));
    }

    #[test]
    fn test_reused_engine_drops_previous_purchasing_values() {
        let mut engine = MiniJinjaEngine::new();
        let process = JsonEntity::new()
            .with("supplier", json!({"name": "Parts Ltd"}))
            .with("date", "2024-02-29")
            .with("payment_method", "3");
        bind("PurchasingProcess", &process, &mut engine);
        bind("SEPADirectDebitAgreement", &JsonEntity::new(), &mut engine);

        assert!(!engine.has_variable(CUSTOMER));
        assert!(!engine.has_variable(DATE_FORMATTED));
        assert!(!engine.has_variable(PAYMENT));
        assert!(engine.has_variable(COMPANY));
    }

    #[test]
    fn test_header_pass_keeps_host_variables() {
        let mut engine = MiniJinjaEngine::new();
        engine.assign("articles", json!([]));
        bind("Offer", &JsonEntity::new(), &mut engine);
        assert!(engine.has_variable("articles"));
    }

    #[test]
    fn test_dunning_and_offer_bind_nothing() {
        for kind in ["Dunning", "Offer"] {
            let mut engine = MiniJinjaEngine::new();
            let entity = JsonEntity::new().with("date", "2024-01-15");
            assert_eq!(bind(kind, &entity, &mut engine), vec![ENTITY_TYPE]);
        }
    }

    #[test]
    fn test_contract_uses_entity_date_as_is() {
        let mut engine = MiniJinjaEngine::new();
        let entity = JsonEntity::new().with("date", "15. Januar 2024");
        bind("Contract", &entity, &mut engine);
        assert_eq!(engine.variable(DATE_FORMATTED), Some(&json!("15. Januar 2024")));
    }

    #[test]
    fn test_open_items_list_reads_companion_variable() {
        let mut engine = MiniJinjaEngine::new();
        engine.assign(OPEN_ITEMS_LIST, json!({"dateFormatted": "01.03.2024", "items": []}));

        bind("OpenItemsList", &JsonEntity::new(), &mut engine);
        assert_eq!(engine.variable(DATE_FORMATTED), Some(&json!("01.03.2024")));
    }

    #[test]
    fn test_open_items_list_without_companion() {
        let mut engine = MiniJinjaEngine::new();
        let bound = bind("OpenItemsList", &JsonEntity::new(), &mut engine);
        assert_eq!(bound, vec![ENTITY_TYPE]);
    }

    #[test]
    fn test_sepa_binds_company() {
        let mut engine = MiniJinjaEngine::new();
        bind("SEPADirectDebitAgreement", &JsonEntity::new(), &mut engine);
        assert_eq!(
            engine.variable(COMPANY),
            Some(&json!({"name": "ACME GmbH", "creditorId": "DE98ZZZ09999999999"}))
        );
    }

    #[test]
    fn test_sepa_without_erp_package_continues() {
        let services = Services::new(
            MemoryPackageStore::new(),
            StaticLocale::default(),
            PaymentCatalog::new(),
        );
        let binder = Binder::new(&services, "erp");
        let kind = DocumentKind::from("SEPADirectDebitAgreement");
        let entity = JsonEntity::new();
        let mut engine = MiniJinjaEngine::new();

        let ctx = RenderContext::new(&kind, "system_default", &entity);
        let bound = binder.bind_header(&ctx, &mut engine);
        assert_eq!(bound, vec![ENTITY_TYPE]);
        assert!(binder.company().is_err());
    }

    #[test]
    fn test_purchasing_process_full() {
        let mut engine = MiniJinjaEngine::new();
        let entity = JsonEntity::new()
            .with("supplier", json!({"name": "Parts Ltd"}))
            .with("date", "2024-02-29")
            .with("payment_method", "3");

        let bound = bind("PurchasingProcess", &entity, &mut engine);

        assert_eq!(bound, vec![ENTITY_TYPE, CUSTOMER, DATE_FORMATTED, PAYMENT]);
        assert_eq!(engine.variable(CUSTOMER), Some(&json!({"name": "Parts Ltd"})));
        assert_eq!(engine.variable(DATE_FORMATTED), Some(&json!("29.02.2024")));
        assert_eq!(
            engine.variable(PAYMENT),
            Some(&json!({"id": "3", "title": "Bank transfer"}))
        );
    }

    #[test]
    fn test_purchasing_process_empty_payment_is_sentinel() {
        let mut engine = MiniJinjaEngine::new();
        let entity = JsonEntity::new()
            .with("date", "2024-02-29")
            .with("payment_method", "");

        bind("PurchasingProcess", &entity, &mut engine);
        assert_eq!(engine.variable(PAYMENT), Some(&json!(false)));
    }

    #[test]
    fn test_purchasing_process_missing_or_unknown_payment_is_sentinel() {
        for entity in [
            JsonEntity::new(),
            JsonEntity::new().with("payment_method", json!(null)),
            JsonEntity::new().with("payment_method", "42"),
        ] {
            let mut engine = MiniJinjaEngine::new();
            bind("PurchasingProcess", &entity, &mut engine);
            assert_eq!(engine.variable(PAYMENT), Some(&json!(false)));
        }
    }

    struct OfflinePayments;

    impl PaymentLookup for OfflinePayments {
        fn payment(&self, _method_id: &str) -> Result<Payment, PaymentError> {
            Err(PaymentError::Lookup("connection refused".to_string()))
        }
    }

    #[test]
    fn test_failing_payment_backend_binds_sentinel() {
        let services = Services::new(
            MemoryPackageStore::new(),
            StaticLocale::default(),
            OfflinePayments,
        );
        let binder = Binder::new(&services, "erp");
        let kind = DocumentKind::from("PurchasingProcess");
        let entity = JsonEntity::new().with("payment_method", "3");
        let ctx = RenderContext::new(&kind, "system_default", &entity);
        let mut engine = MiniJinjaEngine::new();

        binder.bind_header(&ctx, &mut engine);
        assert_eq!(engine.variable(PAYMENT), Some(&json!(false)));
    }

    #[test]
    fn test_numeric_payment_method() {
        assert_eq!(payment_method_id(&json!(3)), Some("3".to_string()));
        assert_eq!(payment_method_id(&json!("  ")), None);
        assert_eq!(payment_method_id(&json!(false)), None);
    }

    // =========================================================================
    // Footer
    // =========================================================================

    #[test]
    fn test_footer_binds_config() {
        let services = services();
        let binder = Binder::new(&services, "erp");
        let kind = DocumentKind::from("Invoice");
        let entity = JsonEntity::new();
        let mut engine = MiniJinjaEngine::new();

        let ctx = RenderContext::new(&kind, "system_default", &entity);
        let bound = binder.bind_footer(&ctx, &mut engine);

        assert_eq!(bound, vec![ENTITY_TYPE, CONFIG]);
        assert_eq!(engine.variable(CONFIG).unwrap()["general"]["currency"], json!("EUR"));
    }

    #[test]
    fn test_footer_without_config_is_swallowed() {
        let services = services();
        let binder = Binder::new(&services, "not-installed");
        let kind = DocumentKind::from("Invoice");
        let entity = JsonEntity::new();
        let mut engine = MiniJinjaEngine::new();

        let ctx = RenderContext::new(&kind, "system_default", &entity);
        let bound = binder.bind_footer(&ctx, &mut engine);

        assert_eq!(bound, vec![ENTITY_TYPE]);
        assert!(!engine.has_variable(CONFIG));
    }

    #[test]
    fn test_footer_on_reused_engine_drops_previous_config() {
        let services = services();
        let kind = DocumentKind::from("Invoice");
        let entity = JsonEntity::new();
        let ctx = RenderContext::new(&kind, "system_default", &entity);
        let mut engine = MiniJinjaEngine::new();

        Binder::new(&services, "erp").bind_footer(&ctx, &mut engine);
        assert!(engine.has_variable(CONFIG));

        Binder::new(&services, "not-installed").bind_footer(&ctx, &mut engine);
        assert!(!engine.has_variable(CONFIG));
    }
}
