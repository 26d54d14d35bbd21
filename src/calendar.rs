//! Per-day and per-month records combining conversion, labels and holidays.

use log::trace;
use serde::{Deserialize, Serialize};

use crate::fmt::{format_lunar, format_lunar_full, holiday_name, weekday_name};
use crate::{CalendarConfig, CalendarError, DataError, GregorianDate, HolidayCalendar, Locale, Month};

/// One in-month cell of a [`MonthView`].
///
/// Lunar fields are empty for the days of January 1900 before the lunar
/// table starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: u8,
    #[serde(rename = "lunar")]
    pub lunar_label: String,
    pub lunar_month: Option<u8>,
    pub lunar_day: Option<u8>,
    pub is_leap_month: bool,
    #[serde(rename = "greg_holiday")]
    pub gregorian_holiday: String,
    pub lunar_holiday: String,
    pub is_today: bool,
}

/// A month laid out in Monday-first weeks, `None` for padding cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthView {
    pub year: u16,
    pub month: u8,
    #[serde(rename = "days")]
    pub weeks: Vec<[Option<DayRecord>; 7]>,
}

impl MonthView {
    /// In-month cells in date order.
    pub fn days(&self) -> impl Iterator<Item = &DayRecord> {
        self.weeks.iter().flatten().flatten()
    }
}

/// Everything shown for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInfo {
    pub gregorian: GregorianDate,
    pub weekday: String,
    pub lunar: String,
    pub lunar_full: String,
    #[serde(rename = "greg_holiday")]
    pub gregorian_holiday: String,
    pub lunar_holiday: String,
}

/// Conversion, labels and holidays for one locale.
#[derive(Debug, Clone)]
pub struct Calendar {
    locale: Locale,
    holidays: HolidayCalendar,
}

impl Calendar {
    pub const fn new(locale: Locale, holidays: HolidayCalendar) -> Self {
        Self { locale, holidays }
    }

    /// A calendar over the embedded holiday feed.
    ///
    /// # Errors
    /// Only if the embedded feed is malformed.
    pub fn builtin(locale: Locale) -> Result<Self, DataError> {
        Ok(Self::new(locale, HolidayCalendar::builtin()?))
    }

    /// # Errors
    /// Propagates holiday feed loading errors.
    pub fn from_config(config: &CalendarConfig) -> Result<Self, DataError> {
        Ok(Self::new(config.locale, config.load_holidays()?))
    }

    pub const fn locale(&self) -> Locale {
        self.locale
    }

    pub const fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    /// Cell for one date. `is_today` compares against the caller's `today`,
    /// whose year also drives [`crate::MissingYearPolicy::CurrentYear`].
    ///
    /// # Errors
    /// Only label errors, which valid conversions never produce.
    pub fn day_record(&self, date: GregorianDate, today: GregorianDate) -> Result<DayRecord, CalendarError> {
        let gregorian_holiday = self.localized(self.holidays.gregorian_holiday_as_of(
            date.month(),
            date.day(),
            date.year(),
            today.year(),
        ));

        let Ok(lunar) = date.to_lunar() else {
            trace!("{date} precedes the lunar table");
            return Ok(DayRecord {
                day: date.day(),
                lunar_label: String::new(),
                lunar_month: None,
                lunar_day: None,
                is_leap_month: false,
                gregorian_holiday,
                lunar_holiday: String::new(),
                is_today: date == today,
            });
        };

        Ok(DayRecord {
            day: date.day(),
            lunar_label: format_lunar(&lunar, self.locale)?,
            lunar_month: Some(lunar.month),
            lunar_day: Some(lunar.day),
            is_leap_month: lunar.is_leap_month,
            gregorian_holiday,
            lunar_holiday: self.localized(self.holidays.lunar_holiday_for(&lunar)),
            is_today: date == today,
        })
    }

    /// Day grid for a month.
    ///
    /// ```
    /// use nongli::{Calendar, GregorianDate, Locale};
    ///
    /// let calendar = Calendar::builtin(Locale::English).unwrap();
    /// let today: GregorianDate = "2024-02-10".parse().unwrap();
    /// let view = calendar.month_view(2024, 2, today).unwrap();
    ///
    /// // February 2024 starts on a Thursday
    /// assert!(view.weeks[0][2].is_none());
    /// assert_eq!(view.weeks[0][3].as_ref().unwrap().day, 1);
    /// assert_eq!(view.days().count(), 29);
    /// ```
    ///
    /// # Errors
    /// `OutOfRange` for a year outside 1900..=2100 and `InvalidArgument` for a
    /// month outside 1..=12.
    pub fn month_view(&self, year: u16, month: u8, today: GregorianDate) -> Result<MonthView, CalendarError> {
        let first = GregorianDate::new(year, Month::new(month)?.get(), 1)?;
        let offset = first.weekday().column();
        let len = usize::from(first.days_in_month());

        let mut weeks = vec![<[Option<DayRecord>; 7]>::default(); (offset + len).div_ceil(7)];
        let mut date = Some(first);
        for cell in offset..offset + len {
            let Some(current) = date else { break };
            weeks[cell / 7][cell % 7] = Some(self.day_record(current, today)?);
            date = current.succ();
        }

        Ok(MonthView { year, month, weeks })
    }

    /// Details for a single date.
    ///
    /// # Errors
    /// `InvalidDate` for impossible dates such as February 30, `OutOfRange`
    /// for years outside the table or days before lunar 1900-01-01.
    pub fn date_info(&self, year: u16, month: u8, day: u8) -> Result<DateInfo, CalendarError> {
        let date = GregorianDate::new(year, month, day)?;
        let lunar = date.to_lunar()?;

        Ok(DateInfo {
            gregorian: date,
            weekday: weekday_name(date.weekday(), self.locale).to_owned(),
            lunar: format_lunar(&lunar, self.locale)?,
            lunar_full: format_lunar_full(&lunar, self.locale)?,
            gregorian_holiday: self.localized(self.holidays.gregorian_holiday(month, day, year)),
            lunar_holiday: self.localized(self.holidays.lunar_holiday_for(&lunar)),
        })
    }

    /// The holiday to display for a date, statutory first.
    ///
    /// # Errors
    /// `OutOfRange` for days before lunar 1900-01-01.
    pub fn holiday_mark(&self, date: GregorianDate) -> Result<Option<String>, CalendarError> {
        let lunar = date.to_lunar()?;
        Ok(self
            .holidays
            .holiday_mark(date, &lunar)
            .map(|name| holiday_name(name, self.locale).to_owned()))
    }

    fn localized(&self, name: Option<&str>) -> String {
        name.map(|name| holiday_name(name, self.locale))
            .unwrap_or_default()
            .to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MissingYearPolicy;
    use crate::test_utils::date;

    fn english() -> Calendar {
        Calendar::builtin(Locale::English).unwrap()
    }

    fn chinese() -> Calendar {
        Calendar::builtin(Locale::Chinese).unwrap()
    }

    #[test]
    fn test_month_view_layout() {
        let view = english().month_view(2024, 2, date(2024, 2, 10)).unwrap();
        assert_eq!((view.year, view.month), (2024, 2));
        assert_eq!(view.weeks.len(), 5);
        assert!(view.weeks[0][..3].iter().all(Option::is_none));
        assert!(view.weeks[4][4..].iter().all(Option::is_none));

        let days: Vec<u8> = view.days().map(|record| record.day).collect();
        assert_eq!(days, (1..=29).collect::<Vec<_>>());

        // 2024-09-01 is a Sunday
        let view = english().month_view(2024, 9, date(2024, 2, 10)).unwrap();
        assert_eq!(view.weeks[0][6].as_ref().map(|record| record.day), Some(1));
        assert_eq!(view.weeks.len(), 6);
    }

    #[test]
    fn test_month_view_spring_festival() {
        let view = english().month_view(2024, 2, date(2024, 2, 10)).unwrap();
        let record = view.weeks[1][5].as_ref().unwrap();
        assert_eq!(
            record,
            &DayRecord {
                day: 10,
                lunar_label: "Jan Day 1".to_owned(),
                lunar_month: Some(1),
                lunar_day: Some(1),
                is_leap_month: false,
                gregorian_holiday: "Spring Festival".to_owned(),
                lunar_holiday: "Spring Festival".to_owned(),
                is_today: true,
            }
        );
        assert_eq!(view.days().filter(|record| record.is_today).count(), 1);
    }

    #[test]
    fn test_month_view_rejects_bad_input() {
        let today = date(2024, 2, 10);
        assert!(matches!(
            english().month_view(1899, 12, today),
            Err(CalendarError::OutOfRange { year: 1899 })
        ));
        assert!(matches!(
            english().month_view(2101, 1, today),
            Err(CalendarError::OutOfRange { year: 2101 })
        ));
        assert!(matches!(
            english().month_view(2024, 13, today),
            Err(CalendarError::InvalidArgument(_))
        ));
        assert!(matches!(
            english().month_view(2024, 0, today),
            Err(CalendarError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_month_view_before_lunar_epoch() {
        let view = english().month_view(1900, 1, date(2024, 2, 10)).unwrap();
        let records: Vec<&DayRecord> = view.days().collect();
        assert_eq!(records.len(), 31);
        assert_eq!(records[29].lunar_label, "");
        assert_eq!(records[29].lunar_month, None);
        assert_eq!(records[30].lunar_label, "Jan Day 1");
        assert_eq!(records[30].lunar_holiday, "Spring Festival");
    }

    #[test]
    fn test_month_view_leap_month() {
        // lunar 2023 repeats its second month from 2023-03-22
        let view = english().month_view(2023, 3, date(2024, 2, 10)).unwrap();
        let record = view.days().find(|record| record.day == 22).unwrap();
        assert!(record.is_leap_month);
        assert_eq!(record.lunar_label, "Leap Feb Day 1");
    }

    #[test]
    fn test_month_view_serializes_like_the_web_api() {
        let view = english().month_view(2025, 1, date(2025, 1, 1)).unwrap();
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["year"], 2025);
        assert_eq!(json["days"][0][0], serde_json::Value::Null);
        assert_eq!(
            json["days"][0][2],
            serde_json::json!({
                "day": 1,
                "lunar": "Dec Day 2",
                "lunar_month": 12,
                "lunar_day": 2,
                "is_leap_month": false,
                "greg_holiday": "New Year's Day",
                "lunar_holiday": "",
                "is_today": true,
            })
        );
    }

    #[test]
    fn test_date_info() {
        let info = english().date_info(2025, 1, 1).unwrap();
        assert_eq!(
            info,
            DateInfo {
                gregorian: date(2025, 1, 1),
                weekday: "Wednesday".to_owned(),
                lunar: "Dec Day 2".to_owned(),
                lunar_full: "2024 Dec Day 2".to_owned(),
                gregorian_holiday: "New Year's Day".to_owned(),
                lunar_holiday: String::new(),
            }
        );
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["gregorian"], "2025-01-01");
        assert_eq!(json["greg_holiday"], "New Year's Day");
    }

    #[test]
    fn test_date_info_chinese() {
        let info = chinese().date_info(2024, 2, 10).unwrap();
        assert_eq!(info.weekday, "星期六");
        assert_eq!(info.lunar, "正月初一");
        assert_eq!(info.lunar_full, "甲辰年 正月初一");
        assert_eq!(info.gregorian_holiday, "春节");
        assert_eq!(info.lunar_holiday, "春节");
    }

    #[test]
    fn test_date_info_errors() {
        assert!(matches!(
            english().date_info(2024, 2, 30),
            Err(CalendarError::InvalidDate(_))
        ));
        assert!(matches!(
            english().date_info(2101, 1, 1),
            Err(CalendarError::OutOfRange { year: 2101 })
        ));
        assert!(matches!(
            english().date_info(1900, 1, 15),
            Err(CalendarError::OutOfRange { year: 1899 })
        ));
    }

    #[test]
    fn test_new_years_eve_short_month() {
        let info = english().date_info(2025, 1, 28).unwrap();
        assert_eq!(info.lunar, "Dec Day 29");
        assert_eq!(info.lunar_holiday, "New Year's Eve");
        assert_eq!(info.gregorian_holiday, "Spring Festival");
    }

    #[test]
    fn test_holiday_mark() {
        let calendar = chinese();
        assert_eq!(calendar.holiday_mark(date(2025, 1, 28)), Ok(Some("春节".to_owned())));
        assert_eq!(calendar.holiday_mark(date(2024, 2, 24)), Ok(Some("元宵节".to_owned())));
        assert_eq!(calendar.holiday_mark(date(2024, 3, 5)), Ok(None));
    }

    #[test]
    fn test_month_view_current_year_policy_uses_callers_today() {
        let config = CalendarConfig {
            missing_year_policy: MissingYearPolicy::CurrentYear,
            ..CalendarConfig::default()
        };
        let calendar = Calendar::from_config(&config).unwrap();

        let view = calendar.month_view(2030, 2, date(2024, 2, 10)).unwrap();
        let holiday = |day: u8| {
            view.days()
                .find(|record| record.day == day)
                .map(|record| record.gregorian_holiday.as_str())
        };
        assert_eq!(holiday(10), Some("Spring Festival"));
        assert_eq!(holiday(15), Some("Spring Festival"));
        assert_eq!(holiday(18), Some(""));

        let view = calendar.month_view(2030, 2, date(2026, 6, 1)).unwrap();
        let record = view.days().find(|record| record.day == 18).unwrap();
        assert_eq!(record.gregorian_holiday, "Spring Festival");
        assert!(!record.is_today);

        // without a configured year, single-date lookups stay empty
        assert_eq!(calendar.date_info(2030, 2, 10).unwrap().gregorian_holiday, "");
    }

    #[test]
    fn test_date_info_current_year_from_config() {
        let config = CalendarConfig {
            missing_year_policy: MissingYearPolicy::CurrentYear,
            current_year: Some(2025),
            ..CalendarConfig::default()
        };
        let calendar = Calendar::from_config(&config).unwrap();
        assert_eq!(calendar.date_info(2030, 1, 28).unwrap().gregorian_holiday, "Spring Festival");
    }

    #[test]
    fn test_from_config() {
        let config = CalendarConfig {
            locale: Locale::Chinese,
            missing_year_policy: MissingYearPolicy::FallbackYear(2026),
            ..CalendarConfig::default()
        };
        let calendar = Calendar::from_config(&config).unwrap();
        assert_eq!(calendar.locale(), Locale::Chinese);
        assert_eq!(calendar.holidays().policy(), MissingYearPolicy::FallbackYear(2026));
        assert_eq!(calendar.date_info(2030, 10, 1).unwrap().gregorian_holiday, "国庆节");
    }
}
