use std::fmt;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::consts::LUNAR_LONG_MONTH;
use crate::table::{LUNAR_EPOCH_JDN, LunarYear};
use crate::{CalendarError, GregorianDate};

/// A date in the Chinese lunar calendar.
///
/// A leap month carries the number of the month it follows and is marked with
/// `is_leap_month`. Fields are public so callers can build dates from raw
/// input; [`LunarDate::new`] and the conversion functions validate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year: u16,
    pub month: u8,
    pub is_leap_month: bool,
    pub day: u8,
}

impl LunarDate {
    /// Creates a lunar date, checking it against the lunar table.
    ///
    /// # Errors
    /// `OutOfRange` for years outside the table, `InvalidArgument` for a month
    /// outside 1..=12, and `InvalidDate` for a missing leap month or a day past
    /// the end of the month.
    pub fn new(year: u16, month: u8, is_leap_month: bool, day: u8) -> Result<Self, CalendarError> {
        let date = Self {
            year,
            month,
            is_leap_month,
            day,
        };
        date.validate()?;
        Ok(date)
    }

    /// Length of this date's month, 29 or 30.
    ///
    /// # Errors
    /// Same as [`LunarYear::month_len`], plus `OutOfRange` for the year.
    pub fn month_len(&self) -> Result<u8, CalendarError> {
        LunarYear::get(self.year)?.month_len(self.month, self.is_leap_month)
    }

    /// `true` on the last day of a month, whether it has 29 or 30 days.
    ///
    /// # Errors
    /// Same as [`LunarDate::month_len`].
    pub fn is_last_day_of_month(&self) -> Result<bool, CalendarError> {
        Ok(self.day == self.month_len()?)
    }

    /// Converts back to the Gregorian calendar.
    ///
    /// # Errors
    /// See [`lunar_to_solar`].
    pub fn to_solar(&self) -> Result<GregorianDate, CalendarError> {
        lunar_to_solar(*self)
    }

    fn validate(&self) -> Result<u8, CalendarError> {
        let len = self.month_len()?;
        if self.day == 0 || self.day > len {
            return Err(CalendarError::InvalidDate(format!(
                "lunar {self} does not exist: the month has {len} days"
            )));
        }
        Ok(len)
    }
}

impl fmt::Display for LunarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let leap = if self.is_leap_month { "L" } else { "" };
        write!(f, "{:04}-{leap}{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl From<LunarDate> for (u16, u8, bool, u8) {
    fn from(date: LunarDate) -> Self {
        (date.year, date.month, date.is_leap_month, date.day)
    }
}

/// Converts a Gregorian date to the lunar calendar.
///
/// Counts days from lunar 1900-01-01 (1900-01-31) and walks the table year by
/// year, then month by month, until the offset falls inside a month.
///
/// # Errors
/// Returns `CalendarError::OutOfRange` for dates outside the table, which
/// includes 1900-01-01..=1900-01-30 (lunar year 1899).
pub fn solar_to_lunar(date: GregorianDate) -> Result<LunarDate, CalendarError> {
    let jdn = date.jdn();
    let mut offset = jdn.checked_sub(LUNAR_EPOCH_JDN).ok_or(CalendarError::OutOfRange {
        year: i32::from(date.year()) - 1,
    })?;

    for lunar_year in LunarYear::all() {
        if let Some((month, is_leap_month, day)) = lunar_year.locate(offset) {
            let lunar = LunarDate {
                year: lunar_year.year(),
                month,
                is_leap_month,
                day,
            };
            trace!("{date} -> lunar {lunar}");
            return Ok(lunar);
        }
        offset -= lunar_year.days();
    }

    Err(CalendarError::OutOfRange {
        year: i32::from(date.year()) + 1,
    })
}

/// Converts a lunar date to the Gregorian calendar.
///
/// # Errors
/// `OutOfRange` for years outside the table or results past 2100-12-31,
/// `InvalidArgument` for a month outside 1..=12, and `InvalidDate` when the
/// day exceeds the month's length or the leap flag names a missing leap month.
pub fn lunar_to_solar(lunar: LunarDate) -> Result<GregorianDate, CalendarError> {
    lunar.validate()?;
    let year = LunarYear::get(lunar.year)?;
    let offset = year.days_before(lunar.month, lunar.is_leap_month)? + u32::from(lunar.day - 1);
    let date = GregorianDate::from_jdn(year.first_jdn() + offset)?;
    trace!("lunar {lunar} -> {date}");
    Ok(date)
}

/// Whether `day` can appear in some lunar month.
pub(crate) const fn is_lunar_day(day: u8) -> bool {
    day >= 1 && day <= LUNAR_LONG_MONTH
}
