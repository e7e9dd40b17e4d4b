//! Content runtime configuration.
//!
//! Resolved once at process startup and passed into the notebook and normalizer, so that
//! nothing below the binary reads environment variables on its own.

use crate::{ContentError, ContentResult};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};
use std::fmt::Write;

/// Default `chrono` format for timestamps rendered on locally created recall notes.
///
/// Produces strings like `16/10/2026, 14:35:22`.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %H:%M:%S";

/// Content configuration resolved at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentConfig {
    report_fallbacks: bool,
    timestamp_format: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            report_fallbacks: false,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_owned(),
        }
    }
}

impl ContentConfig {
    /// Create a new `ContentConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ContentError::InvalidInput`] if `timestamp_format` is blank or is not a
    /// valid `strftime` pattern.
    pub fn new(report_fallbacks: bool, timestamp_format: String) -> ContentResult<Self> {
        if timestamp_format.trim().is_empty() {
            return Err(ContentError::InvalidInput(
                "timestamp_format cannot be empty".into(),
            ));
        }

        if StrftimeItems::new(&timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ContentError::InvalidInput(format!(
                "timestamp_format '{timestamp_format}' is not a valid strftime pattern"
            )));
        }

        Ok(Self {
            report_fallbacks,
            timestamp_format,
        })
    }

    /// Whether degraded fields should be reported through a [`crate::TracingObserver`].
    pub fn report_fallbacks(&self) -> bool {
        self.report_fallbacks
    }

    pub fn timestamp_format(&self) -> &str {
        &self.timestamp_format
    }

    /// Render the current local time for a newly created recall note.
    pub fn render_now(&self) -> String {
        self.render_timestamp(Local::now())
    }

    /// Render `at` with the configured format, falling back to RFC 3339.
    pub fn render_timestamp(&self, at: DateTime<Local>) -> String {
        let mut out = String::new();
        match write!(out, "{}", at.format(&self.timestamp_format)) {
            Ok(()) => out,
            Err(_) => at.to_rfc3339(),
        }
    }
}

/// Parse the fallback-reporting switch from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns `false`.
pub fn report_fallbacks_from_env_value(value: Option<String>) -> ContentResult<bool> {
    let value = value
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty());

    match value.as_deref() {
        None => Ok(false),
        Some("1" | "true" | "yes" | "on") => Ok(true),
        Some("0" | "false" | "no" | "off") => Ok(false),
        Some(other) => Err(ContentError::InvalidInput(format!(
            "MC_REPORT_FALLBACKS must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_silent() {
        let config = ContentConfig::default();
        assert!(!config.report_fallbacks());
        assert_eq!(config.timestamp_format(), DEFAULT_TIMESTAMP_FORMAT);
    }

    #[test]
    fn rejects_blank_timestamp_format() {
        let err = ContentConfig::new(true, "  ".into()).expect_err("blank format");
        assert!(matches!(err, ContentError::InvalidInput(msg) if msg.contains("timestamp_format")));
    }

    #[test]
    fn rejects_invalid_strftime_pattern() {
        let err = ContentConfig::new(false, "%Q".into()).expect_err("unknown specifier");
        assert!(matches!(err, ContentError::InvalidInput(msg) if msg.contains("strftime")));
    }

    #[test]
    fn renders_timestamps_with_configured_format() {
        use chrono::TimeZone;

        let config = ContentConfig::new(false, "%Y-%m-%d %H:%M".into()).expect("valid");
        let at = Local.with_ymd_and_hms(2026, 10, 16, 9, 5, 0).single().expect("unambiguous");
        assert_eq!(config.render_timestamp(at), "2026-10-16 09:05");
        assert!(!config.render_now().is_empty());
    }

    #[test]
    fn parses_boolean_env_values() {
        assert!(!report_fallbacks_from_env_value(None).unwrap());
        assert!(!report_fallbacks_from_env_value(Some("  ".into())).unwrap());
        assert!(report_fallbacks_from_env_value(Some("TRUE".into())).unwrap());
        assert!(report_fallbacks_from_env_value(Some("1".into())).unwrap());
        assert!(!report_fallbacks_from_env_value(Some("off".into())).unwrap());
    }

    #[test]
    fn rejects_unknown_env_value() {
        let err = report_fallbacks_from_env_value(Some("maybe".into())).expect_err("not a bool");
        assert!(matches!(err, ContentError::InvalidInput(msg) if msg.contains("maybe")));
    }
}
