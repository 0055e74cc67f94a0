//! Locale service: translations and date formatting.

use std::collections::BTreeMap;
use std::fmt::Write;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

/// Translation lookup and date formatting for the active language.
pub trait Locale {
    /// Translates `key` within `domain` (usually a package name).
    fn get(&self, domain: &str, key: &str) -> String;

    /// The date formatter for this locale.
    fn date_formatter(&self) -> &DateFormatter;
}

/// Formats timestamps with a strftime pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatter {
    pattern: String,
}

impl DateFormatter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Formats a timestamp.
    ///
    /// A pattern chrono cannot render falls back to ISO `YYYY-MM-DD`.
    pub fn format(&self, timestamp: &NaiveDateTime) -> String {
        let mut out = String::new();
        if write!(out, "{}", timestamp.format(&self.pattern)).is_err() {
            tracing::warn!(pattern = %self.pattern, "invalid date pattern");
            return timestamp.format("%Y-%m-%d").to_string();
        }
        out
    }
}

impl Default for DateFormatter {
    fn default() -> Self {
        Self::new("%d.%m.%Y")
    }
}

/// Parses the timestamp formats entities carry.
///
/// Accepted: `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, RFC 3339, and integer
/// unix seconds (as number or string).
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map(|dt| dt.naive_utc()),
        Value::String(s) => parse_timestamp_str(s.trim()),
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<NaiveDateTime> {
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    raw.parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.naive_utc())
}

/// A locale with a fixed date pattern and an in-memory translation table.
///
/// Missing translations render as `[domain] key`, which makes gaps visible
/// in the output instead of leaving blanks.
#[derive(Debug, Clone, Default)]
pub struct StaticLocale {
    formatter: DateFormatter,
    translations: BTreeMap<String, BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct LocaleFile {
    #[serde(default)]
    date_format: Option<String>,
    #[serde(default)]
    translations: BTreeMap<String, BTreeMap<String, String>>,
}

impl StaticLocale {
    pub fn new(date_pattern: impl Into<String>) -> Self {
        Self {
            formatter: DateFormatter::new(date_pattern),
            translations: BTreeMap::new(),
        }
    }

    /// Loads a locale from YAML:
    ///
    /// ```yaml
    /// date_format: "%d.%m.%Y"
    /// translations:
    ///   erp/accounting-templates:
    ///     package.title: Standard
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        let file: LocaleFile = serde_yaml::from_str(yaml)?;
        Ok(Self {
            formatter: file
                .date_format
                .map(DateFormatter::new)
                .unwrap_or_default(),
            translations: file.translations,
        })
    }

    /// Adds a translation.
    pub fn with_translation(
        mut self,
        domain: impl Into<String>,
        key: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        self.translations
            .entry(domain.into())
            .or_default()
            .insert(key.into(), text.into());
        self
    }
}

impl Locale for StaticLocale {
    fn get(&self, domain: &str, key: &str) -> String {
        self.translations
            .get(domain)
            .and_then(|keys| keys.get(key))
            .cloned()
            .unwrap_or_else(|| format!("[{}] {}", domain, key))
    }

    fn date_formatter(&self) -> &DateFormatter {
        &self.formatter
    }
}
