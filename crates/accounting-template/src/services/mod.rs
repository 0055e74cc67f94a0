//! Collaborators the provider calls into.
//!
//! None of these are implemented for real here: the host platform owns its
//! package store, localization and payment modules. The traits describe the
//! narrow contract the provider needs, and [`Services`] bundles one
//! implementation of each so they can be injected at construction.
//!
//! Each trait ships with a small stock implementation
//! ([`DirectoryPackageStore`], [`StaticLocale`], [`PaymentCatalog`]) for
//! hosts without one and for tests.

pub mod locale;
pub mod package;
pub mod payment;

pub use locale::{parse_timestamp, DateFormatter, Locale, StaticLocale};
pub use package::{
    DirectoryPackageStore, MemoryPackageStore, Package, PackageConfig, PackageStore, CONFIG_FILE,
};
pub use payment::{Payment, PaymentBinding, PaymentCatalog, PaymentLookup};

/// The collaborators of one provider instance.
pub struct Services {
    pub packages: Box<dyn PackageStore>,
    pub locale: Box<dyn Locale>,
    pub payments: Box<dyn PaymentLookup>,
}

impl Services {
    pub fn new(
        packages: impl PackageStore + 'static,
        locale: impl Locale + 'static,
        payments: impl PaymentLookup + 'static,
    ) -> Self {
        Self {
            packages: Box::new(packages),
            locale: Box::new(locale),
            payments: Box::new(payments),
        }
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services")
            .field("date_pattern", &self.locale.date_formatter().pattern())
            .finish_non_exhaustive()
    }
}
