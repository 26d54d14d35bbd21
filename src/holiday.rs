//! Statutory and traditional holiday tables.
//!
//! Gregorian holidays are announced year by year, so they live in a feed keyed
//! by year. A feed entry names either one day (`"date"`) or an inclusive span
//! (`"dates": "start/end"`). Evergreen Gregorian entries apply to every year,
//! and lunar entries are keyed by lunar `(month, day)`.
//!
//! ```json
//! {
//!   "gregorian": {
//!     "2024": [
//!       { "date": "2024-01-01", "name": "New Year's Day" },
//!       { "dates": "2024-02-10/2024-02-17", "name": "Spring Festival" }
//!     ]
//!   },
//!   "evergreen": [{ "month": 12, "day": 25, "name": "Christmas" }],
//!   "lunar": [{ "month": 1, "day": 1, "name": "Spring Festival" }]
//! }
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::consts::{DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, LUNAR_LONG_MONTH, LUNAR_SHORT_MONTH};
use crate::lunar::is_lunar_day;
use crate::{CalendarError, DataError, DateRange, GregorianDate, LunarDate, Month};

const BUILTIN_FEED: &str = include_str!("../data/holidays.json");

type DayTable = HashMap<(u8, u8), String>;

/// Which calendar a holiday record is keyed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HolidayScope {
    Gregorian,
    Lunar,
}

/// One holiday on one day.
///
/// Gregorian records with a `year` belong to that year's table; without a
/// year they repeat every year. Lunar records never carry a year.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HolidayRecord {
    pub scope: HolidayScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u16>,
    pub month: u8,
    pub day: u8,
    pub name: String,
}

impl HolidayRecord {
    pub fn gregorian(date: GregorianDate, name: impl Into<String>) -> Self {
        Self {
            scope: HolidayScope::Gregorian,
            year:  Some(date.year()),
            month: date.month(),
            day:   date.day(),
            name:  name.into(),
        }
    }

    pub fn lunar(month: u8, day: u8, name: impl Into<String>) -> Self {
        Self {
            scope: HolidayScope::Lunar,
            year: None,
            month,
            day,
            name: name.into(),
        }
    }

    fn validate(&self) -> Result<(), CalendarError> {
        match (self.scope, self.year) {
            (HolidayScope::Gregorian, Some(year)) => GregorianDate::new(year, self.month, self.day).map(|_| ()),
            (HolidayScope::Gregorian, None) => {
                let month = Month::new(self.month)?.get();
                let max = if month == FEBRUARY {
                    FEBRUARY_DAYS_LEAP
                } else {
                    DAYS_IN_MONTH[month as usize]
                };
                if self.day == 0 || self.day > max {
                    return Err(CalendarError::InvalidDate(format!(
                        "{:02}-{:02} does not occur in any year",
                        self.month, self.day
                    )));
                }
                Ok(())
            },
            (HolidayScope::Lunar, Some(year)) => Err(CalendarError::InvalidArgument(format!(
                "lunar holiday '{}' must not name a year ({year})",
                self.name
            ))),
            (HolidayScope::Lunar, None) => {
                Month::new(self.month)?;
                if !is_lunar_day(self.day) {
                    return Err(CalendarError::InvalidArgument(format!(
                        "lunar day {} is outside 1-{LUNAR_LONG_MONTH}",
                        self.day
                    )));
                }
                Ok(())
            },
        }
    }
}

/// What a Gregorian lookup does for a year with no table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingYearPolicy {
    /// No holiday; schedules are not known in advance.
    #[default]
    Empty,
    /// Use the table of the caller's current year.
    CurrentYear,
    /// Use the table of a fixed year.
    FallbackYear(u16),
}

/// On-disk feed layout.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct Feed {
    #[serde(default)]
    gregorian: BTreeMap<u16, Vec<FeedEntry>>,
    #[serde(default)]
    evergreen: Vec<DayEntry>,
    #[serde(default)]
    lunar: Vec<DayEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedEntry {
    Single { date: GregorianDate, name: String },
    Span { dates: DateRange, name: String },
}

#[derive(Debug, Deserialize)]
struct DayEntry {
    month: u8,
    day:   u8,
    name:  String,
}

/// Year-keyed Gregorian holidays plus evergreen and lunar tables.
#[derive(Debug, Clone)]
pub struct HolidayCalendar {
    by_year:      BTreeMap<u16, DayTable>,
    evergreen:    DayTable,
    lunar:        DayTable,
    policy:       MissingYearPolicy,
    current_year: Option<u16>,
}

impl Default for HolidayCalendar {
    fn default() -> Self {
        Self::new()
    }
}

impl HolidayCalendar {
    /// An empty calendar with the default policy.
    pub fn new() -> Self {
        Self {
            by_year:      BTreeMap::new(),
            evergreen:    HashMap::new(),
            lunar:        HashMap::new(),
            policy:       MissingYearPolicy::default(),
            current_year: None,
        }
    }

    /// The feed shipped with the crate: statutory holidays for 2023-2026 and
    /// the traditional lunar festivals.
    ///
    /// # Errors
    /// Only if the embedded feed is malformed.
    pub fn builtin() -> Result<Self, DataError> {
        Self::from_json_str(BUILTIN_FEED)
    }

    /// Parses a feed from JSON text.
    ///
    /// # Errors
    /// `DataError::Json` for malformed JSON, `DataError::Invalid` when an
    /// entry lies outside the year it is listed under, and
    /// `DataError::Calendar` for records that name impossible days.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let feed: Feed = serde_json::from_str(json)?;
        let mut calendar = Self::new();

        for (year, entries) in feed.gregorian {
            for entry in entries {
                let (range, name) = match entry {
                    FeedEntry::Single { date, name } => (DateRange::single(date), name),
                    FeedEntry::Span { dates, name } => (dates, name),
                };
                if range.start().year() != year || range.end().year() != year {
                    return Err(DataError::Invalid(format!(
                        "'{name}' on {range} is listed under {year}"
                    )));
                }
                for date in range.days() {
                    calendar.push(HolidayRecord::gregorian(date, name.clone()))?;
                }
            }
        }

        for entry in feed.evergreen {
            calendar.push(HolidayRecord {
                scope: HolidayScope::Gregorian,
                year:  None,
                month: entry.month,
                day:   entry.day,
                name:  entry.name,
            })?;
        }

        for entry in feed.lunar {
            calendar.push(HolidayRecord::lunar(entry.month, entry.day, entry.name))?;
        }

        debug!(
            "parsed holiday feed: {} years, {} gregorian days, {} evergreen, {} lunar",
            calendar.by_year.len(),
            calendar.by_year.values().map(HashMap::len).sum::<usize>(),
            calendar.evergreen.len(),
            calendar.lunar.len()
        );
        Ok(calendar)
    }

    /// Reads a feed from a JSON file.
    ///
    /// # Errors
    /// `DataError::Io` when the file cannot be read, otherwise as
    /// [`HolidayCalendar::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        debug!("loading holiday feed from {}", path.display());
        let json = std::fs::read_to_string(path).map_err(|source| DataError::io(path, source))?;
        Self::from_json_str(&json)
    }

    #[must_use]
    pub fn with_policy(mut self, policy: MissingYearPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the current year that [`MissingYearPolicy::CurrentYear`] falls
    /// back to in lookups without an explicit one. Unset, those lookups
    /// find nothing for unknown years.
    #[must_use]
    pub fn with_current_year(mut self, year: u16) -> Self {
        self.current_year = Some(year);
        self
    }

    pub const fn policy(&self) -> MissingYearPolicy {
        self.policy
    }

    /// Years with a Gregorian table, ascending.
    pub fn years(&self) -> impl Iterator<Item = u16> + '_ {
        self.by_year.keys().copied()
    }

    /// Adds a record, replacing any holiday already on that day.
    ///
    /// # Errors
    /// Returns `CalendarError` when the record names a day that cannot exist.
    pub fn push(&mut self, record: HolidayRecord) -> Result<(), CalendarError> {
        record.validate()?;
        let HolidayRecord {
            scope,
            year,
            month,
            day,
            name,
        } = record;

        let table = match (scope, year) {
            (HolidayScope::Gregorian, Some(year)) => self.by_year.entry(year).or_default(),
            (HolidayScope::Gregorian, None) => &mut self.evergreen,
            (HolidayScope::Lunar, _) => &mut self.lunar,
        };
        if let Some(previous) = table.insert((month, day), name) {
            warn!("{scope:?} holiday on {month:02}-{day:02} ({year:?}) replaces '{previous}'");
        }
        Ok(())
    }

    /// Statutory holiday on a Gregorian day, falling back to evergreen
    /// records. Years without a table follow the configured
    /// [`MissingYearPolicy`].
    pub fn gregorian_holiday(&self, month: u8, day: u8, year: u16) -> Option<&str> {
        self.lookup_gregorian(month, day, year, self.current_year)
    }

    /// Like [`HolidayCalendar::gregorian_holiday`], with the caller's current
    /// year used by [`MissingYearPolicy::CurrentYear`].
    pub fn gregorian_holiday_as_of(&self, month: u8, day: u8, year: u16, current_year: u16) -> Option<&str> {
        self.lookup_gregorian(month, day, year, Some(current_year))
    }

    fn lookup_gregorian(&self, month: u8, day: u8, year: u16, current_year: Option<u16>) -> Option<&str> {
        self.year_table(year, current_year)
            .and_then(|table| table.get(&(month, day)))
            .or_else(|| self.evergreen.get(&(month, day)))
            .map(String::as_str)
    }

    /// Traditional holiday for a lunar `(month, day)`, looked up literally.
    pub fn lunar_holiday(&self, month: u8, day: u8) -> Option<&str> {
        self.lunar.get(&(month, day)).map(String::as_str)
    }

    /// Traditional holiday on a lunar date.
    ///
    /// Leap months carry no festivals. A record on day 30 marks the last day
    /// of the month, so New Year's Eve lands on the 29th when the twelfth
    /// month is short.
    pub fn lunar_holiday_for(&self, lunar: &LunarDate) -> Option<&str> {
        if lunar.is_leap_month {
            return None;
        }
        self.lunar_holiday(lunar.month, lunar.day).or_else(|| {
            let short = lunar.day == LUNAR_SHORT_MONTH && lunar.month_len().ok() == Some(LUNAR_SHORT_MONTH);
            if short {
                self.lunar_holiday(lunar.month, LUNAR_LONG_MONTH)
            } else {
                None
            }
        })
    }

    /// The single holiday to show for a day: statutory first, then lunar.
    pub fn holiday_mark(&self, date: GregorianDate, lunar: &LunarDate) -> Option<&str> {
        self.gregorian_holiday(date.month(), date.day(), date.year())
            .or_else(|| self.lunar_holiday_for(lunar))
    }

    /// Every record, Gregorian years first, then evergreen, then lunar.
    pub fn records(&self) -> Vec<HolidayRecord> {
        let mut records = Vec::new();
        for (year, table) in &self.by_year {
            records.extend(sorted(table, HolidayScope::Gregorian, Some(*year)));
        }
        records.extend(sorted(&self.evergreen, HolidayScope::Gregorian, None));
        records.extend(sorted(&self.lunar, HolidayScope::Lunar, None));
        records
    }

    fn year_table(&self, year: u16, current_year: Option<u16>) -> Option<&DayTable> {
        if let Some(table) = self.by_year.get(&year) {
            return Some(table);
        }
        let fallback = match self.policy {
            MissingYearPolicy::Empty => None,
            MissingYearPolicy::CurrentYear => current_year,
            MissingYearPolicy::FallbackYear(fallback) => Some(fallback),
        }?;
        debug!("no holiday table for {year}, using {fallback} ({:?})", self.policy);
        self.by_year.get(&fallback)
    }
}

fn sorted(table: &DayTable, scope: HolidayScope, year: Option<u16>) -> Vec<HolidayRecord> {
    let mut records: Vec<HolidayRecord> = table
        .iter()
        .map(|(&(month, day), name)| HolidayRecord {
            scope,
            year,
            month,
            day,
            name: name.clone(),
        })
        .collect();
    records.sort_by_key(|record| (record.month, record.day));
    records
}
