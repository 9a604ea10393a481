//! Runtime configuration for the goal tracker.

use camino::Utf8PathBuf;
use chrono::NaiveTime;
use serde::Deserialize;

/// Default directory of the goal workbook.
pub const DEFAULT_WORKBOOK_DIR: &str = "goalpost-workbook";

/// Tracker settings.
///
/// Every field has a default, so a JSON document only needs the keys it
/// overrides.
///
/// # Examples
///
/// ```
/// use goalpost::config::TrackerConfig;
///
/// let config = TrackerConfig::from_json_str(r#"{ "reminder_time": "07:30:00" }"#)
///     .expect("valid config");
/// assert!(!config.strict_nesting);
/// assert_eq!(config.reminder_time.to_string(), "07:30:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Directory holding the `Goals` and `Tasks` sheets.
    pub workbook_dir: Utf8PathBuf,
    /// Local time of day at which the daily reminder fires.
    pub reminder_time: NaiveTime,
    /// Whether new and moved goals must respect the goal type nesting order.
    ///
    /// Off by default; any goal type may then nest under any other.
    pub strict_nesting: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            workbook_dir: Utf8PathBuf::from(DEFAULT_WORKBOOK_DIR),
            reminder_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
            strict_nesting: false,
        }
    }
}

impl TrackerConfig {
    /// Parses a configuration from JSON, filling missing keys with defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error when the document is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the workbook directory.
    #[must_use]
    pub fn with_workbook_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.workbook_dir = dir.into();
        self
    }

    /// Sets the reminder time of day.
    #[must_use]
    pub const fn with_reminder_time(mut self, time: NaiveTime) -> Self {
        self.reminder_time = time;
        self
    }

    /// Enables or disables nesting validation.
    #[must_use]
    pub const fn with_strict_nesting(mut self, strict: bool) -> Self {
        self.strict_nesting = strict;
        self
    }
}
