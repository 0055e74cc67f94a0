//! Package and configuration store.
//!
//! The host platform installs packages into directories and keeps a
//! sectioned configuration per package. The provider needs two things from
//! it: its own package directory (where `template/` lives) and the ERP
//! package's configuration (the `company` section, and the whole config for
//! footers).
//!
//! [`DirectoryPackageStore`] reads packages from a root directory:
//!
//! ```text
//! <root>/<package name>/
//! └── etc/config.yaml     sections → key/value maps
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Location of a package's configuration file, relative to its directory.
pub const CONFIG_FILE: &str = "etc/config.yaml";

/// Access to installed packages.
pub trait PackageStore {
    /// Loads a package by name.
    fn package(&self, name: &str) -> Result<Package, ConfigError>;
}

/// An installed package.
#[derive(Debug, Clone, PartialEq)]
pub struct Package {
    name: String,
    dir: PathBuf,
    config: PackageConfig,
}

impl Package {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, config: PackageConfig) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn config(&self) -> &PackageConfig {
        &self.config
    }

    /// Returns a config section, or [`ConfigError::MissingSection`].
    pub fn section(&self, name: &str) -> Result<&Map<String, Value>, ConfigError> {
        self.config
            .section(name)
            .ok_or_else(|| ConfigError::MissingSection {
                package: self.name.clone(),
                section: name.to_string(),
            })
    }
}

/// A package configuration: named sections of key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackageConfig {
    sections: BTreeMap<String, Map<String, Value>>,
}

impl PackageConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML document of sections. An empty document is an empty config.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml)
    }

    pub fn section(&self, name: &str) -> Option<&Map<String, Value>> {
        self.sections.get(name)
    }

    /// Adds or replaces a section.
    pub fn with_section(mut self, name: impl Into<String>, values: Map<String, Value>) -> Self {
        self.sections.insert(name.into(), values);
        self
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(|s| s.as_str())
    }

    /// The whole configuration as one JSON object keyed by section.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.sections
                .iter()
                .map(|(name, values)| (name.clone(), Value::Object(values.clone())))
                .collect(),
        )
    }
}

/// Packages installed below a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryPackageStore {
    root: PathBuf,
}

impl DirectoryPackageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageStore for DirectoryPackageStore {
    fn package(&self, name: &str) -> Result<Package, ConfigError> {
        let dir = self.root.join(name);
        if !dir.is_dir() {
            return Err(ConfigError::PackageNotFound(name.to_string()));
        }

        let config_path = dir.join(CONFIG_FILE);
        let config = if config_path.is_file() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
                    path: config_path.clone(),
                    source,
                })?;
            PackageConfig::from_yaml(&content).map_err(|e| ConfigError::Parse {
                path: config_path.clone(),
                message: e.to_string(),
            })?
        } else {
            PackageConfig::default()
        };

        Ok(Package::new(name, dir, config))
    }
}

/// Packages registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackageStore {
    packages: HashMap<String, Package>,
}

impl MemoryPackageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, package: Package) {
        self.packages.insert(package.name.clone(), package);
    }

    pub fn with_package(mut self, package: Package) -> Self {
        self.insert(package);
        self
    }
}

impl PackageStore for MemoryPackageStore {
    fn package(&self, name: &str) -> Result<Package, ConfigError> {
        self.packages
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::PackageNotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    const ERP_CONFIG: &str = r#"
company:
  name: ACME GmbH
  creditorId: DE98ZZZ09999999999
general:
  currency: EUR
"#;

    #[test]
    fn test_config_from_yaml() {
        let config = PackageConfig::from_yaml(ERP_CONFIG).unwrap();
        let company = config.section("company").unwrap();
        assert_eq!(company.get("name"), Some(&json!("ACME GmbH")));
        assert_eq!(config.section_names().collect::<Vec<_>>(), ["company", "general"]);
    }

    #[test]
    fn test_config_to_value() {
        let config = PackageConfig::from_yaml(ERP_CONFIG).unwrap();
        assert_eq!(config.to_value()["general"]["currency"], json!("EUR"));
    }

    #[test]
    fn test_empty_yaml_is_empty_config() {
        assert_eq!(PackageConfig::from_yaml("  \n").unwrap(), PackageConfig::default());
    }

    #[test]
    fn test_directory_store_loads_config() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("erp/etc")).unwrap();
        fs::write(root.path().join("erp").join(CONFIG_FILE), ERP_CONFIG).unwrap();

        let store = DirectoryPackageStore::new(root.path());
        let package = store.package("erp").unwrap();

        assert_eq!(package.name(), "erp");
        assert_eq!(package.dir(), root.path().join("erp"));
        assert!(package.section("company").is_ok());
    }

    #[test]
    fn test_directory_store_without_config_file() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("templates")).unwrap();

        let store = DirectoryPackageStore::new(root.path());
        let package = store.package("templates").unwrap();
        assert_eq!(package.config(), &PackageConfig::default());
    }

    #[test]
    fn test_directory_store_missing_package() {
        let root = tempfile::tempdir().unwrap();
        let store = DirectoryPackageStore::new(root.path());
        assert!(matches!(
            store.package("erp"),
            Err(ConfigError::PackageNotFound(name)) if name == "erp"
        ));
    }

    #[test]
    fn test_directory_store_malformed_config() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("erp/etc")).unwrap();
        fs::write(root.path().join("erp").join(CONFIG_FILE), "company: [unclosed").unwrap();

        let store = DirectoryPackageStore::new(root.path());
        assert!(matches!(store.package("erp"), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_missing_section() {
        let package = Package::new("erp", "/srv/erp", PackageConfig::new());
        let err = package.section("company").unwrap_err();
        assert_eq!(
            err.to_string(),
            "config section 'company' missing in package 'erp'"
        );
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryPackageStore::new().with_package(Package::new(
            "erp",
            "/srv/erp",
            PackageConfig::new(),
        ));
        assert!(store.package("erp").is_ok());
        assert!(store.package("other").is_err());
    }
}
