/// Earliest supported Gregorian and lunar year (inclusive)
pub const MIN_YEAR: u16 = 1900;

/// Latest supported Gregorian and lunar year (inclusive)
pub const MAX_YEAR: u16 = 2100;

/// Maximum valid month (December, or the twelfth lunar month)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Days per Gregorian month in a common year, indexed by month number
/// (index 0 unused); see [`crate::days_in_month`] for leap Februaries.
pub const DAYS_IN_MONTH: [u8; 13] = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Gregorian leap-year rule: every 4th year,
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// except centuries,
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// except every 400th year
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Length of a short ("small") lunar month
pub const LUNAR_SHORT_MONTH: u8 = 29;
/// Length of a long ("big") lunar month
pub const LUNAR_LONG_MONTH: u8 = 30;

/// Gregorian date of lunar 1900-01-01, the first day covered by the lunar table
pub const LUNAR_EPOCH: (u16, u8, u8) = (1900, 1, 31);

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Range separator (ISO 8601 extended format)
pub const RANGE_SEPARATOR: char = '/';
