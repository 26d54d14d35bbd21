//! Gregorian to Chinese lunar calendar conversion with holiday lookup.
//!
//! The crate is a small, pure core: [`GregorianDate`] values are converted to
//! [`LunarDate`]s through a lunar table embedded at build time, lunar dates are
//! rendered with [`fmt::format_lunar`], and [`HolidayCalendar`] answers which
//! statutory or traditional holiday falls on a day. [`Calendar`] merges the
//! three into the per-day and per-month records consumed by web or desktop
//! front ends.
//!
//! ```
//! use nongli::{GregorianDate, LunarDate};
//!
//! let date: GregorianDate = "2024-02-10".parse().unwrap();
//! let lunar = date.to_lunar().unwrap();
//!
//! assert_eq!(lunar, LunarDate { year: 2024, month: 1, is_leap_month: false, day: 1 });
//! assert_eq!(lunar.to_solar().unwrap(), date);
//! ```

mod calendar;
mod config;
mod consts;
pub mod fmt;
mod holiday;
mod lunar;
mod prelude;
mod range;
mod table;
mod types;

pub use calendar::{Calendar, DateInfo, DayRecord, MonthView};
pub use config::CalendarConfig;
pub use consts::*;
pub use fmt::Locale;
pub use holiday::{HolidayCalendar, HolidayRecord, HolidayScope, MissingYearPolicy};
pub use lunar::{LunarDate, lunar_to_solar, solar_to_lunar};
pub use range::{DateRange, RangeError};
pub use table::LunarYear;
pub use types::{Day, Month, Weekday, Year, days_in_month, is_leap_year};

use crate::prelude::*;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use types::{jdn_from_ymd, ymd_from_jdn};

/// Julian day number of 1970-01-01
const UNIX_EPOCH_JDN: u32 = jdn_from_ymd(1970, 1, 1);
const SECONDS_PER_DAY: u64 = 86_400;

/// Validation failures reported by the conversion, formatting and lookup core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalendarError {
    /// A month, day or other argument is outside its representable range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A well-formed date that does not exist in its calendar.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The year lies outside the span covered by the lunar table.
    #[error("Year {year} is outside the supported range ({min}-{max})", min = MIN_YEAR, max = MAX_YEAR)]
    OutOfRange { year: i32 },

    /// A date string that is not `YYYY-MM-DD`.
    #[error("Invalid date format: {0}")]
    InvalidFormat(String),
}

/// Failures while loading holiday feeds or configuration files.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error(transparent)]
    Range(#[from] RangeError),

    /// Feed content that parses but is inconsistent.
    #[error("Invalid holiday feed: {0}")]
    Invalid(String),
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// A validated Gregorian calendar date in the supported range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct GregorianDate {
    year: Year,
    month: Month,
    day: Day,
}

impl GregorianDate {
    /// Creates a date, checking the year range, month range and month length.
    ///
    /// # Errors
    /// `OutOfRange` for years outside 1900..=2100, `InvalidArgument` for a month
    /// outside 1..=12 and `InvalidDate` for a day past the end of the month.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, CalendarError> {
        let year_nz = Year::new(year)?;
        let month_nz = Month::new(month)?;
        let day_nz = Day::new(day, year, month)?;
        Ok(Self {
            year: year_nz,
            month: month_nz,
            day: day_nz,
        })
    }

    /// Creates a date from already validated components.
    ///
    /// # Errors
    /// Returns `CalendarError::InvalidDate` if `day` is past the end of the month.
    pub fn from_parts(year: Year, month: Month, day: Day) -> Result<Self, CalendarError> {
        Day::new(day.get(), year.get(), month.get())?;
        Ok(Self { year, month, day })
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    pub const fn year_typed(&self) -> Year {
        self.year
    }

    pub const fn month_typed(&self) -> Month {
        self.month
    }

    /// Converts to `(year, month, day)`
    pub const fn to_ymd(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }

    /// Julian day number of this date.
    pub const fn jdn(&self) -> u32 {
        jdn_from_ymd(self.year.get(), self.month.get(), self.day.get())
    }

    /// Creates a date from a Julian day number.
    ///
    /// # Errors
    /// Returns `CalendarError::OutOfRange` if the day falls outside 1900..=2100.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_jdn(jdn: u32) -> Result<Self, CalendarError> {
        let (y, m, d) = ymd_from_jdn(jdn);
        let year = u16::try_from(y).map_err(|_| CalendarError::OutOfRange {
            year: i32::try_from(y).unwrap_or(i32::MAX),
        })?;
        // month and day from the JDN formula are always 1..=12 and 1..=31
        Self::new(year, m as u8, d as u8)
    }

    /// Today's date in UTC.
    ///
    /// # Errors
    /// Returns `CalendarError::OutOfRange` if the system clock is outside the supported years.
    pub fn today() -> Result<Self, CalendarError> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| CalendarError::OutOfRange { year: 1969 })?
            .as_secs();
        let days = u32::try_from(secs / SECONDS_PER_DAY)
            .map_err(|_| CalendarError::OutOfRange { year: i32::MAX })?;
        Self::from_jdn(UNIX_EPOCH_JDN + days)
    }

    /// Day of the week, Monday first.
    pub fn weekday(&self) -> Weekday {
        // jdn % 7 is 0 for Monday
        #[allow(clippy::cast_possible_truncation)]
        let ordinal = (self.jdn() % 7) as u8 + 1;
        Weekday::from_ordinal(ordinal).unwrap_or(Weekday::Monday)
    }

    /// Number of days in this date's month.
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year.get(), self.month.get())
    }

    /// The following day, or `None` past 2100-12-31.
    pub fn succ(&self) -> Option<Self> {
        let (year, month, day) = next_day(self.year(), self.month(), self.day())?;
        Self::new(year, month, day).ok()
    }

    /// The preceding day, or `None` before 1900-01-01.
    pub fn pred(&self) -> Option<Self> {
        let (year, month, day) = prev_day(self.year(), self.month(), self.day())?;
        Self::new(year, month, day).ok()
    }

    /// First day of this date's month.
    pub const fn first_of_month(&self) -> Self {
        Self {
            day: Day::FIRST,
            ..*self
        }
    }

    /// Converts this date to the Chinese lunar calendar.
    ///
    /// # Errors
    /// Returns `CalendarError::OutOfRange` for dates before lunar 1900-01-01 (1900-01-31).
    pub fn to_lunar(&self) -> Result<LunarDate, CalendarError> {
        solar_to_lunar(*self)
    }
}

// --- helpers for month navigation ---

/// `(year, month)` following the given month, or `None` past `MAX_YEAR`.
pub fn next_month(year: u16, month: u8) -> Option<(u16, u8)> {
    debug_assert!(month != 0 && month <= MAX_MONTH);
    if month == DECEMBER {
        if year >= MAX_YEAR {
            None
        } else {
            Some((year + 1, JANUARY))
        }
    } else {
        Some((year, month + 1))
    }
}

/// `(year, month)` preceding the given month, or `None` before `MIN_YEAR`.
pub fn prev_month(year: u16, month: u8) -> Option<(u16, u8)> {
    debug_assert!(month != 0 && month <= MAX_MONTH);
    if month == JANUARY {
        if year <= MIN_YEAR {
            None
        } else {
            Some((year - 1, DECEMBER))
        }
    } else {
        Some((year, month - 1))
    }
}

fn next_day(year: u16, month: u8, day: u8) -> Option<(u16, u8, u8)> {
    let max = days_in_month(year, month);
    if day < max {
        Some((year, month, day + 1))
    } else {
        next_month(year, month).map(|(ny, nm)| (ny, nm, MIN_DAY))
    }
}

fn prev_day(year: u16, month: u8, day: u8) -> Option<(u16, u8, u8)> {
    if day > MIN_DAY {
        Some((year, month, day - 1))
    } else {
        prev_month(year, month).map(|(py, pm)| (py, pm, days_in_month(py, pm)))
    }
}

impl FromStr for GregorianDate {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CalendarError::InvalidFormat("empty date string".to_owned()));
        }

        let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
        if parts.len() != 3 {
            return Err(CalendarError::InvalidFormat(format!(
                "expected YYYY{DATE_SEPARATOR}MM{DATE_SEPARATOR}DD, found {trimmed}"
            )));
        }

        // Parse components - InvalidFormat if not numeric
        let year = Self::parse_u16(parts[0])?;
        let month = Self::parse_u8(parts[1])?;
        let day = Self::parse_u8(parts[2])?;

        Self::new(year, month, day)
    }
}

impl GregorianDate {
    fn parse_u16(s: &str) -> Result<u16, CalendarError> {
        s.parse::<u16>()
            .map_err(|_| CalendarError::InvalidFormat(s.to_owned()))
    }

    fn parse_u8(s: &str) -> Result<u8, CalendarError> {
        s.parse::<u8>()
            .map_err(|_| CalendarError::InvalidFormat(s.to_owned()))
    }
}

impl TryFrom<(u16, u8, u8)> for GregorianDate {
    type Error = CalendarError;

    fn try_from(value: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(value.0, value.1, value.2)
    }
}

impl serde::Serialize for GregorianDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for GregorianDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
