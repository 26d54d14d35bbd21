//! Label tables and formatting for lunar dates.
//!
//! Every locale shares one banding routine; only the label tables differ. Day
//! names fall into five bands: days 1–10 take the "early" prefix, 11–19 the
//! teens prefix, 21–29 the twenties prefix, and days 20 and 30 are fixed
//! tokens.

use serde::{Deserialize, Serialize};

use crate::consts::{LUNAR_LONG_MONTH, MAX_MONTH};
use crate::{CalendarError, LunarDate, Weekday};

/// Language used for every label the crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "zh")]
    Chinese,
}

impl Locale {
    pub const fn labels(self) -> &'static Labels {
        match self {
            Self::English => &ENGLISH,
            Self::Chinese => &CHINESE,
        }
    }
}

/// Label table for one locale.
#[derive(Debug)]
pub struct Labels {
    /// Month names, index 0 is the first month
    pub months: [&'static str; 12],
    pub leap_prefix: &'static str,
    /// Placed between the month and day names
    pub month_day_separator: &'static str,
    /// Index 0 names the tenth day of a band ("十" / "10"), 1..=9 the digits
    pub digits: [&'static str; 10],
    pub early_prefix: &'static str,
    pub teens_prefix: &'static str,
    pub twenties_prefix: &'static str,
    pub day_twenty: &'static str,
    pub day_thirty: &'static str,
    /// Monday first
    pub weekdays: [&'static str; 7],
    /// Starting from Spring Begins (立春)
    pub solar_terms: [&'static str; 24],
    /// Rat first
    pub zodiac: [&'static str; 12],
    /// Translations of canonical (English) holiday names
    pub holidays: &'static [(&'static str, &'static str)],
}

pub static ENGLISH: Labels = Labels {
    months: [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ],
    leap_prefix: "Leap ",
    month_day_separator: " ",
    digits: ["10", "1", "2", "3", "4", "5", "6", "7", "8", "9"],
    early_prefix: "Day ",
    teens_prefix: "Day 1",
    twenties_prefix: "Day 2",
    day_twenty: "Day 20",
    day_thirty: "Day 30",
    weekdays: [
        "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
    ],
    solar_terms: [
        "Spring Begins", "Rain Water", "Insects Awakened", "Spring Equinox", "Pure Brightness",
        "Grain Rain", "Summer Begins", "Grain Fill", "Grain in Ear", "Summer Solstice",
        "Minor Heat", "Major Heat", "Autumn Begins", "Heat Ends", "White Dew", "Autumn Equinox",
        "Cold Dew", "Frost Descent", "Winter Begins", "Minor Snow", "Major Snow",
        "Winter Solstice", "Minor Cold", "Major Cold",
    ],
    zodiac: [
        "Rat", "Ox", "Tiger", "Rabbit", "Dragon", "Snake", "Horse", "Goat", "Monkey", "Rooster",
        "Dog", "Pig",
    ],
    holidays: &[],
};

pub static CHINESE: Labels = Labels {
    months: [
        "正月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月", "十月", "冬月", "腊月",
    ],
    leap_prefix: "闰",
    month_day_separator: "",
    digits: ["十", "一", "二", "三", "四", "五", "六", "七", "八", "九"],
    early_prefix: "初",
    teens_prefix: "十",
    twenties_prefix: "廿",
    day_twenty: "二十",
    day_thirty: "三十",
    weekdays: ["星期一", "星期二", "星期三", "星期四", "星期五", "星期六", "星期日"],
    solar_terms: [
        "立春", "雨水", "惊蛰", "春分", "清明", "谷雨", "立夏", "小满", "芒种", "夏至", "小暑",
        "大暑", "立秋", "处暑", "白露", "秋分", "寒露", "霜降", "立冬", "小雪", "大雪", "冬至",
        "小寒", "大寒",
    ],
    zodiac: ["鼠", "牛", "虎", "兔", "龙", "蛇", "马", "羊", "猴", "鸡", "狗", "猪"],
    holidays: &[
        ("New Year's Day", "元旦"),
        ("Spring Festival", "春节"),
        ("Lantern Festival", "元宵节"),
        ("Qingming Festival", "清明节"),
        ("Labor Day", "劳动节"),
        ("Dragon Boat Festival", "端午节"),
        ("Ghost Festival", "中元节"),
        ("Mid-Autumn Festival", "中秋节"),
        ("National Day", "国庆节"),
        ("Double Ninth Festival", "重阳节"),
        ("Laba Festival", "腊八节"),
        ("New Year's Eve", "除夕"),
    ],
};

/// Month name with the leap prefix when needed.
///
/// ```
/// use nongli::{Locale, fmt};
///
/// assert_eq!("冬月", fmt::month_name(11, false, Locale::Chinese).unwrap());
/// assert_eq!("闰正月", fmt::month_name(1, true, Locale::Chinese).unwrap());
/// assert_eq!("Leap Jun", fmt::month_name(6, true, Locale::English).unwrap());
/// ```
///
/// # Errors
/// Returns `CalendarError::InvalidArgument` if `month` is not in `1..=12`.
pub fn month_name(month: u8, is_leap_month: bool, locale: Locale) -> Result<String, CalendarError> {
    let labels = locale.labels();
    let name = month
        .checked_sub(1)
        .and_then(|idx| labels.months.get(usize::from(idx)))
        .ok_or_else(|| {
            CalendarError::InvalidArgument(format!("lunar month {month} not in 1..={MAX_MONTH}"))
        })?;
    let prefix = if is_leap_month { labels.leap_prefix } else { "" };
    Ok(format!("{prefix}{name}"))
}

/// Day-of-month name.
///
/// ```
/// use nongli::{Locale, fmt};
///
/// assert_eq!("初十", fmt::day_name(10, Locale::Chinese).unwrap());
/// assert_eq!("廿五", fmt::day_name(25, Locale::Chinese).unwrap());
/// assert_eq!("Day 25", fmt::day_name(25, Locale::English).unwrap());
/// ```
///
/// # Errors
/// Returns `CalendarError::InvalidArgument` if `day` is not in `1..=30`.
pub fn day_name(day: u8, locale: Locale) -> Result<String, CalendarError> {
    let labels = locale.labels();
    let digit = labels.digits[usize::from(day % 10)];
    let name = match day {
        1..=10 => format!("{}{digit}", labels.early_prefix),
        11..=19 => format!("{}{digit}", labels.teens_prefix),
        20 => labels.day_twenty.to_owned(),
        21..=29 => format!("{}{digit}", labels.twenties_prefix),
        30 => labels.day_thirty.to_owned(),
        _ => {
            return Err(CalendarError::InvalidArgument(format!(
                "lunar day {day} not in 1..={LUNAR_LONG_MONTH}"
            )));
        }
    };
    Ok(name)
}

/// Month and day label, e.g. `"Jan Day 1"` or `"正月初一"`.
///
/// Only the ranges of `month` and `day` are checked; the lunar table is not
/// consulted, so the label of a day 30 is produced even for a 29-day month.
///
/// # Errors
/// Returns `CalendarError::InvalidArgument` for a month outside `1..=12` or a
/// day outside `1..=30`.
pub fn format_lunar(lunar: &LunarDate, locale: Locale) -> Result<String, CalendarError> {
    let month = month_name(lunar.month, lunar.is_leap_month, locale)?;
    let day = day_name(lunar.day, locale)?;
    Ok(format!("{month}{}{day}", locale.labels().month_day_separator))
}

/// Year label used in front of the month and day.
///
/// English uses the numeric year; Chinese uses the sexagenary name.
pub fn year_name(year: u16, locale: Locale) -> String {
    match locale {
        Locale::English => year.to_string(),
        Locale::Chinese => format!("{}年", sexagenary(sexagenary_for_year(year))),
    }
}

/// Full label including the lunar year, e.g. `"2024 Jan Day 1"` or `"甲辰年 正月初一"`.
///
/// # Errors
/// Same as [`format_lunar`].
pub fn format_lunar_full(lunar: &LunarDate, locale: Locale) -> Result<String, CalendarError> {
    let label = format_lunar(lunar, locale)?;
    Ok(format!("{} {label}", year_name(lunar.year, locale)))
}

/// Sexagenary (干支) number of a year, from 1 (甲子) to 60 (癸亥).
///
/// ```
/// use nongli::fmt::sexagenary_for_year;
///
/// assert_eq!(1, sexagenary_for_year(1984));
/// assert_eq!(41, sexagenary_for_year(2024));
/// ```
pub const fn sexagenary_for_year(year: u16) -> u32 {
    (year as u32 + 56) % 60 + 1
}

/// Sexagenary number as text.
///
/// ```
/// use nongli::fmt;
///
/// assert_eq!("乙巳", fmt::sexagenary(42));
/// ```
pub fn sexagenary(num: u32) -> String {
    const STEMS: [&str; 10] = ["癸", "甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬"];
    const BRANCHES: [&str; 12] = [
        "亥", "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌",
    ];
    STEMS[(num % 10) as usize].to_owned() + BRANCHES[(num % 12) as usize]
}

/// Zodiac animal of a lunar year.
pub fn zodiac(year: u16, locale: Locale) -> &'static str {
    locale.labels().zodiac[(usize::from(year) + 8) % 12]
}

/// Name of a solar term, numbered 1 (Spring Begins) to 24 (Major Cold).
pub fn solar_term(term: u8, locale: Locale) -> Option<&'static str> {
    let idx = usize::from(term.checked_sub(1)?);
    locale.labels().solar_terms.get(idx).copied()
}

pub fn weekday_name(weekday: Weekday, locale: Locale) -> &'static str {
    locale.labels().weekdays[weekday.column()]
}

/// Localized holiday name; names without a translation pass through.
pub fn holiday_name(name: &str, locale: Locale) -> &str {
    locale
        .labels()
        .holidays
        .iter()
        .find(|(canonical, _)| *canonical == name)
        .map_or(name, |(_, translated)| *translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::lunar;
    use proptest::prelude::*;

    #[test]
    fn test_day_bands_chinese() {
        for (expected, d) in [
            ("初一", 1),
            ("初九", 9),
            ("初十", 10),
            ("十一", 11),
            ("十九", 19),
            ("二十", 20),
            ("廿一", 21),
            ("廿九", 29),
            ("三十", 30),
        ] {
            assert_eq!(day_name(d, Locale::Chinese).unwrap(), expected);
        }
    }

    #[test]
    fn test_day_bands_english() {
        for d in 1..=30 {
            assert_eq!(day_name(d, Locale::English).unwrap(), format!("Day {d}"));
        }
    }

    #[test]
    fn test_fixed_tokens_ignore_year_and_month() {
        for (year, month, leap) in [(1900, 1, false), (2017, 6, true), (2100, 12, false)] {
            for (d, en, zh) in [(1, "Day 1", "初一"), (20, "Day 20", "二十"), (30, "Day 30", "三十")] {
                let date = lunar(year, month, leap, d);
                assert!(format_lunar(&date, Locale::English).unwrap().ends_with(en));
                assert!(format_lunar(&date, Locale::Chinese).unwrap().ends_with(zh));
            }
        }
    }

    #[test]
    fn test_format_lunar() {
        let date = lunar(2024, 1, false, 1);
        assert_eq!(format_lunar(&date, Locale::English).unwrap(), "Jan Day 1");
        assert_eq!(format_lunar(&date, Locale::Chinese).unwrap(), "正月初一");

        let leap = lunar(2017, 6, true, 15);
        assert_eq!(format_lunar(&leap, Locale::English).unwrap(), "Leap Jun Day 15");
        assert_eq!(format_lunar(&leap, Locale::Chinese).unwrap(), "闰六月十五");

        let winter = lunar(2024, 12, false, 23);
        assert_eq!(format_lunar(&winter, Locale::Chinese).unwrap(), "腊月廿三");
    }

    #[test]
    fn test_format_lunar_rejects_malformed_input() {
        for (month, day) in [(0, 1), (13, 1), (1, 0), (1, 31)] {
            let date = lunar(2024, month, false, day);
            for locale in [Locale::English, Locale::Chinese] {
                assert!(
                    matches!(format_lunar(&date, locale), Err(CalendarError::InvalidArgument(_))),
                    "month {month} day {day}"
                );
            }
        }
    }

    #[test]
    fn test_format_lunar_full() {
        let date = lunar(2024, 1, false, 1);
        assert_eq!(format_lunar_full(&date, Locale::English).unwrap(), "2024 Jan Day 1");
        assert_eq!(format_lunar_full(&date, Locale::Chinese).unwrap(), "甲辰年 正月初一");
    }

    #[test]
    fn test_sexagenary() {
        for (expected, num) in [("甲子", 1), ("庚寅", 27), ("癸亥", 60)] {
            assert_eq!(sexagenary(num), expected);
        }
        assert_eq!(sexagenary_for_year(2000), 17);
        assert_eq!(sexagenary(sexagenary_for_year(2025)), "乙巳");
        assert_eq!(sexagenary(sexagenary_for_year(1900)), "庚子");
    }

    #[test]
    fn test_zodiac() {
        assert_eq!(zodiac(2020, Locale::English), "Rat");
        assert_eq!(zodiac(2024, Locale::English), "Dragon");
        assert_eq!(zodiac(2025, Locale::Chinese), "蛇");
        assert_eq!(zodiac(u16::MAX, Locale::English), "Pig");
    }

    #[test]
    fn test_solar_terms() {
        assert_eq!(solar_term(1, Locale::English), Some("Spring Begins"));
        assert_eq!(solar_term(6, Locale::Chinese), Some("谷雨"));
        assert_eq!(solar_term(24, Locale::Chinese), Some("大寒"));
        assert_eq!(solar_term(0, Locale::English), None);
        assert_eq!(solar_term(25, Locale::English), None);
    }

    #[test]
    fn test_weekday_names() {
        assert_eq!(weekday_name(Weekday::Monday, Locale::English), "Monday");
        assert_eq!(weekday_name(Weekday::Sunday, Locale::Chinese), "星期日");
    }

    #[test]
    fn test_holiday_names() {
        assert_eq!(holiday_name("Spring Festival", Locale::Chinese), "春节");
        assert_eq!(holiday_name("Spring Festival", Locale::English), "Spring Festival");
        assert_eq!(holiday_name("Founders Day", Locale::Chinese), "Founders Day");
    }

    #[test]
    fn test_locale_serde() {
        assert_eq!(serde_json::to_string(&Locale::Chinese).unwrap(), r#""zh""#);
        let parsed: Locale = serde_json::from_str(r#""en""#).unwrap();
        assert_eq!(parsed, Locale::English);
    }

    proptest! {
        #[test]
        fn prop_format_is_pure(year in 1900u16..=2100, month in 1u8..=12, leap: bool, day in 1u8..=30) {
            let date = lunar(year, month, leap, day);
            for locale in [Locale::English, Locale::Chinese] {
                let first = format_lunar(&date, locale).unwrap();
                let _ = format_lunar(&lunar(2000, 1, false, 1), locale);
                prop_assert_eq!(format_lunar(&date, locale).unwrap(), first);
            }
        }
    }
}
