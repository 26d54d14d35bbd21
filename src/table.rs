//! Lunar calendar reference table.
//!
//! Month placement in the Chinese calendar follows new-moon and solar-term
//! timing and cannot be reduced to a formula, so the month structure of every
//! lunar year from 1900 to 2100 is stored here as precomputed data.
//!
//! Each year is packed into one word:
//!
//! - bits `0..4`: number of the month followed by a leap month, `0` for none
//! - bits `4..16`: one bit per month, month 1 in bit 15 down to month 12 in
//!   bit 4; a set bit marks a 30-day month, a clear bit a 29-day month
//! - bit `16`: set when the leap month has 30 days

use crate::consts::{
    LUNAR_EPOCH, LUNAR_LONG_MONTH, LUNAR_SHORT_MONTH, MAX_MONTH, MAX_YEAR, MIN_YEAR,
};
use crate::types::jdn_from_ymd;
use crate::{CalendarError, GregorianDate};

/// Julian day number of lunar 1900-01-01 (Gregorian 1900-01-31)
pub(crate) const LUNAR_EPOCH_JDN: u32 = jdn_from_ymd(LUNAR_EPOCH.0, LUNAR_EPOCH.1, LUNAR_EPOCH.2);

const LEAP_MONTH_MASK: u32 = 0xf;
const LEAP_LONG_BIT: u32 = 0x1_0000;

#[rustfmt::skip]
static LUNAR_INFO: [u32; (MAX_YEAR - MIN_YEAR + 1) as usize] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920
    0x06566, 0x0d4a0, 0x0ea50, 0x16a95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x05ac0, 0x0ab60, 0x096d5, 0x092e0, // 1990
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050
    0x092e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090
    0x0d520,                                                                                    // 2100
];

/// Month structure of one lunar year, decoded from the reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LunarYear {
    year: u16,
    info: u32,
}

/// One month of a lunar year: `(month, is_leap_month, length)`.
pub type LunarMonth = (u8, bool, u8);

impl LunarYear {
    /// Looks up the table entry for a lunar year.
    ///
    /// # Errors
    /// Returns `CalendarError::OutOfRange` if the table has no entry for `year`.
    pub fn get(year: u16) -> Result<Self, CalendarError> {
        let info = year
            .checked_sub(MIN_YEAR)
            .and_then(|idx| LUNAR_INFO.get(usize::from(idx)))
            .ok_or(CalendarError::OutOfRange {
                year: i32::from(year),
            })?;
        Ok(Self { year, info: *info })
    }

    /// Every lunar year in the table, in order.
    pub fn all() -> impl Iterator<Item = Self> {
        (MIN_YEAR..).zip(LUNAR_INFO.iter()).map(|(year, &info)| Self { year, info })
    }

    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Number of the month followed by this year's leap month, if any.
    #[allow(clippy::cast_possible_truncation)]
    pub const fn leap_month(&self) -> Option<u8> {
        match (self.info & LEAP_MONTH_MASK) as u8 {
            0 => None,
            month => Some(month),
        }
    }

    /// Number of months in the year, 12 or 13.
    pub const fn month_count(&self) -> usize {
        if self.leap_month().is_some() { 13 } else { 12 }
    }

    /// Length of a month, checking the month number and the leap flag.
    ///
    /// # Errors
    /// `InvalidArgument` for a month outside 1..=12, `InvalidDate` when
    /// `is_leap_month` is set but this year has no leap month after `month`.
    pub fn month_len(&self, month: u8, is_leap_month: bool) -> Result<u8, CalendarError> {
        if !(1..=MAX_MONTH).contains(&month) {
            return Err(CalendarError::InvalidArgument(format!(
                "lunar month {month} not in 1..={MAX_MONTH}"
            )));
        }
        if is_leap_month {
            if self.leap_month() != Some(month) {
                return Err(CalendarError::InvalidDate(format!(
                    "lunar year {} has no leap month {month}",
                    self.year
                )));
            }
            return Ok(self.leap_len());
        }
        Ok(self.common_len(month))
    }

    /// All months in calendar order, the leap month right after its namesake.
    pub fn months(&self) -> impl Iterator<Item = LunarMonth> + '_ {
        (1..=MAX_MONTH).flat_map(move |month| {
            let common = Some((month, false, self.common_len(month)));
            let leap = (self.leap_month() == Some(month)).then(|| (month, true, self.leap_len()));
            common.into_iter().chain(leap)
        })
    }

    /// Total number of days in the year.
    pub fn days(&self) -> u32 {
        self.months().map(|(_, _, len)| u32::from(len)).sum()
    }

    /// Days from the first day of the year to the first day of the given month.
    ///
    /// # Errors
    /// Same as [`LunarYear::month_len`].
    pub fn days_before(&self, month: u8, is_leap_month: bool) -> Result<u32, CalendarError> {
        self.month_len(month, is_leap_month)?;
        Ok(self
            .months()
            .take_while(|&(m, leap, _)| (m, leap) != (month, is_leap_month))
            .map(|(_, _, len)| u32::from(len))
            .sum())
    }

    /// Finds `(month, is_leap_month, day)` for a zero-based day offset into the
    /// year, or `None` if the offset is past the end of the year.
    #[allow(clippy::cast_possible_truncation)]
    pub fn locate(&self, mut offset: u32) -> Option<LunarMonth> {
        for (month, is_leap, len) in self.months() {
            let len = u32::from(len);
            if offset < len {
                return Some((month, is_leap, offset as u8 + 1));
            }
            offset -= len;
        }
        None
    }

    /// Julian day number of the first day of the year.
    pub fn first_jdn(&self) -> u32 {
        LUNAR_EPOCH_JDN
            + Self::all()
                .take_while(|y| y.year < self.year)
                .map(|y| y.days())
                .sum::<u32>()
    }

    /// Gregorian date of lunar new year's day (month 1, day 1).
    ///
    /// # Errors
    /// Returns `CalendarError::OutOfRange` if the date is past 2100-12-31.
    pub fn new_year_day(&self) -> Result<GregorianDate, CalendarError> {
        GregorianDate::from_jdn(self.first_jdn())
    }

    const fn common_len(&self, month: u8) -> u8 {
        if self.info & (LEAP_LONG_BIT >> month) != 0 {
            LUNAR_LONG_MONTH
        } else {
            LUNAR_SHORT_MONTH
        }
    }

    const fn leap_len(&self) -> u8 {
        if self.info & LEAP_LONG_BIT != 0 {
            LUNAR_LONG_MONTH
        } else {
            LUNAR_SHORT_MONTH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_table_covers_supported_years() {
        assert_eq!(LunarYear::all().count(), 201);
        assert_eq!(LunarYear::all().next().map(|y| y.year()), Some(MIN_YEAR));
        assert_eq!(LunarYear::all().last().map(|y| y.year()), Some(MAX_YEAR));
    }

    #[test]
    fn test_get_out_of_range() {
        assert!(matches!(
            LunarYear::get(1899),
            Err(CalendarError::OutOfRange { year: 1899 })
        ));
        assert!(matches!(
            LunarYear::get(2101),
            Err(CalendarError::OutOfRange { year: 2101 })
        ));
        assert!(LunarYear::get(1900).is_ok());
        assert!(LunarYear::get(2100).is_ok());
    }

    #[test]
    fn test_month_lengths_are_29_or_30() {
        for year in LunarYear::all() {
            for (month, is_leap, len) in year.months() {
                assert!(
                    len == LUNAR_SHORT_MONTH || len == LUNAR_LONG_MONTH,
                    "{} month {month} (leap: {is_leap}) has {len} days",
                    year.year()
                );
            }
            assert_eq!(year.months().count(), year.month_count());
            assert!((353..=385).contains(&year.days()), "{} has {} days", year.year(), year.days());
        }
    }

    #[test]
    fn test_leap_months() {
        struct TestCase {
            year: u16,
            leap_month: Option<u8>,
        }

        let cases = [
            TestCase { year: 1900, leap_month: Some(8) },
            TestCase { year: 2000, leap_month: None },
            TestCase { year: 2017, leap_month: Some(6) },
            TestCase { year: 2020, leap_month: Some(4) },
            TestCase { year: 2023, leap_month: Some(2) },
            TestCase { year: 2024, leap_month: None },
            TestCase { year: 2025, leap_month: Some(6) },
            TestCase { year: 2033, leap_month: Some(11) },
        ];

        for case in &cases {
            let year = LunarYear::get(case.year).unwrap();
            assert_eq!(year.leap_month(), case.leap_month, "leap month of {}", case.year);
        }
    }

    #[test]
    fn test_leap_month_follows_its_namesake() {
        let year = LunarYear::get(2017).unwrap();
        let order: Vec<(u8, bool)> = year.months().map(|(m, leap, _)| (m, leap)).collect();
        assert_eq!(order[5], (6, false));
        assert_eq!(order[6], (6, true));
        assert_eq!(order[7], (7, false));
        assert_eq!(order.len(), 13);
    }

    #[test]
    fn test_month_len_validation() {
        let year = LunarYear::get(2017).unwrap();
        assert!(year.month_len(6, true).is_ok());
        assert!(matches!(year.month_len(5, true), Err(CalendarError::InvalidDate(_))));
        assert!(matches!(year.month_len(0, false), Err(CalendarError::InvalidArgument(_))));
        assert!(matches!(year.month_len(13, false), Err(CalendarError::InvalidArgument(_))));
    }

    #[test]
    fn test_new_year_days() {
        let cases = [
            (1900, date(1900, 1, 31)),
            (1950, date(1950, 2, 17)),
            (2000, date(2000, 2, 5)),
            (2017, date(2017, 1, 28)),
            (2023, date(2023, 1, 22)),
            (2024, date(2024, 2, 10)),
            (2025, date(2025, 1, 29)),
            (2026, date(2026, 2, 17)),
            (2100, date(2100, 2, 9)),
        ];
        for (year, expected) in cases {
            let lunar_year = LunarYear::get(year).unwrap();
            assert_eq!(lunar_year.new_year_day().unwrap(), expected, "new year of {year}");
        }
    }

    #[test]
    fn test_locate() {
        let year = LunarYear::get(2017).unwrap();
        assert_eq!(year.locate(0), Some((1, false, 1)));
        let before_leap = year.days_before(6, true).unwrap();
        assert_eq!(year.locate(before_leap), Some((6, true, 1)));
        assert_eq!(year.locate(year.days() - 1).map(|(m, leap, _)| (m, leap)), Some((12, false)));
        assert_eq!(year.locate(year.days()), None);
    }
}
