use std::{cmp::Ordering, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{RANGE_SEPARATOR, prelude::*};

/// An inclusive span of Gregorian dates, such as a multi-day holiday.
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateRange {
    start: GregorianDate,
    end:   GregorianDate,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: GregorianDate, end: GregorianDate },

    /// Error parsing one of the dates.
    #[error(transparent)]
    Calendar(#[from] CalendarError),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: GregorianDate, end: GregorianDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering a single day
    pub const fn single(date: GregorianDate) -> Self {
        Self {
            start: date,
            end:   date,
        }
    }

    pub const fn start(&self) -> GregorianDate {
        self.start
    }

    pub const fn end(&self) -> GregorianDate {
        self.end
    }

    /// Returns both start and end dates as a tuple
    pub const fn dates(&self) -> (GregorianDate, GregorianDate) {
        (self.start, self.end)
    }

    pub fn contains(&self, date: &GregorianDate) -> bool {
        self.start <= *date && *date <= self.end
    }

    /// Checks if this range shares at least one day with another range
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Checks if this range is completely contained within another range
    pub fn is_within(&self, other: &Self) -> bool {
        other.start <= self.start && self.end <= other.end
    }

    /// Number of days in the range, counting both ends.
    pub const fn len(&self) -> u32 {
        self.end.jdn() - self.start.jdn() + 1
    }

    /// Always `false`: a range holds at least one day.
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Every day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = GregorianDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |day| day.succ().filter(|next| *next <= end))
    }
}

impl From<GregorianDate> for DateRange {
    fn from(date: GregorianDate) -> Self {
        Self::single(date)
    }
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // ISO 8601 extended format: use RANGE_SEPARATOR to separate start/end
        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!("Separator '{RANGE_SEPARATOR}' not found despite count == 1"))
                })?;

                let start = start_str.trim().parse::<GregorianDate>()?;
                let end = end_str.trim().parse::<GregorianDate>()?;

                Self::new(start, end)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl PartialOrd for DateRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateRange {
    fn cmp(&self, other: &Self) -> Ordering {
        // Compare start dates first, then end dates
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ord => ord,
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
