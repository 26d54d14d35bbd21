use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{DataError, HolidayCalendar, Locale, MissingYearPolicy};

/// Settings for building a [`crate::Calendar`].
///
/// ```json
/// { "locale": "zh", "missing_year_policy": { "fallback_year": 2026 }, "holiday_feed": "holidays.json" }
/// ```
///
/// Every field is optional; an empty object gives English labels, the
/// embedded holiday feed and no holidays for years the feed does not cover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    pub locale: Locale,
    pub missing_year_policy: MissingYearPolicy,
    /// Year used by the `current_year` policy when a lookup has no `today`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_year: Option<u16>,
    /// JSON feed replacing the embedded one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holiday_feed: Option<PathBuf>,
}

impl CalendarConfig {
    /// # Errors
    /// Returns `DataError::Json` for malformed JSON or unknown fields.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a configuration file. A relative `holiday_feed` is resolved
    /// against the file's directory.
    ///
    /// # Errors
    /// `DataError::Io` when the file cannot be read, otherwise as
    /// [`CalendarConfig::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        debug!("loading calendar config from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| DataError::io(path, source))?;
        let mut config = Self::from_json_str(&json)?;

        config.holiday_feed = config.holiday_feed.map(|feed| match path.parent() {
            Some(dir) if feed.is_relative() => dir.join(feed),
            _ => feed,
        });
        Ok(config)
    }

    /// Loads the configured holiday feed and applies the missing-year policy.
    ///
    /// # Errors
    /// Propagates feed loading errors.
    pub fn load_holidays(&self) -> Result<HolidayCalendar, DataError> {
        let holidays = match &self.holiday_feed {
            Some(path) => HolidayCalendar::from_path(path)?,
            None => HolidayCalendar::builtin()?,
        };
        let holidays = holidays.with_policy(self.missing_year_policy);
        Ok(match self.current_year {
            Some(year) => holidays.with_current_year(year),
            None => holidays,
        })
    }
}
