use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of days in a school week (Monday through Saturday).
pub const SCHOOL_WEEK_DAYS: usize = 6;

/// ISO weekday number for a date: Monday=1 .. Sunday=7.
///
/// Every place a date is turned into a weekday must go through this
/// function; the base timetable stores weekdays in the same convention.
pub fn weekday_number(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

/// Whether the date falls on a school day (Monday..Saturday).
pub fn is_school_day(date: NaiveDate) -> bool {
    weekday_number(date) != 7
}

/// Monday of the week containing `date`.
pub fn monday_of_week(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(weekday_number(date)) - 1)
}

/// ISO week label ("YYYY-Www", e.g. "2025-W36") for the week containing `date`.
pub fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

/// Monday of the ISO week given by label ("YYYY-Www").
///
/// Uses the ISO-8601 week-date calendar (Thursday-anchored week numbering),
/// so labels round-trip through [`week_label`] including week 1 and week
/// 52/53 boundaries.
pub fn monday_of_label(label: &str) -> Result<NaiveDate, String> {
    let (year, week) = label
        .split_once("-W")
        .ok_or_else(|| format!("Invalid week format, expected YYYY-Www: {label}"))?;
    let year: i32 = year
        .parse()
        .map_err(|_| format!("Invalid week year: {label}"))?;
    let week: u32 = week
        .parse()
        .map_err(|_| format!("Invalid week number: {label}"))?;
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
        .ok_or_else(|| format!("Week {week} does not exist in ISO year {year}"))
}

/// Anchor selecting a school week: an explicit date or an ISO week label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeekAnchor {
    /// Any date inside the week.
    Date(NaiveDate),
    /// An ISO week label such as "2025-W36".
    Label(String),
}

impl WeekAnchor {
    /// Monday of the anchored week.
    pub fn monday(&self) -> Result<NaiveDate, String> {
        match self {
            WeekAnchor::Date(date) => Ok(monday_of_week(*date)),
            WeekAnchor::Label(label) => monday_of_label(label),
        }
    }
}

/// Clock time of a lesson boundary, minute resolution.
///
/// Serialized as "HH:MM" on every wire and storage surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LessonTime(NaiveTime);

impl LessonTime {
    /// "00:00", the fallback when a period has no bell-table entry.
    pub const MIDNIGHT: LessonTime = LessonTime(NaiveTime::MIN);

    pub fn new(hour: u32, minute: u32) -> Result<Self, String> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| format!("Invalid clock time {hour:02}:{minute:02}"))
    }

    pub fn value(&self) -> NaiveTime {
        self.0
    }
}

impl Default for LessonTime {
    fn default() -> Self {
        Self::MIDNIGHT
    }
}

impl fmt::Display for LessonTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for LessonTime {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s, "%H:%M")
            .map(Self)
            .map_err(|_| format!("Invalid clock time, expected HH:MM: {s}"))
    }
}

impl Serialize for LessonTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LessonTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_weekday_monday_is_one() {
        assert_eq!(weekday_number(date(2025, 8, 25)), 1);
    }

    #[test]
    fn test_weekday_sunday_is_seven() {
        assert_eq!(weekday_number(date(2025, 8, 24)), 7);
    }

    #[test]
    fn test_weekday_full_week() {
        let numbers: Vec<u8> = (25..=31)
            .map(|d| weekday_number(date(2025, 8, d)))
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_school_day_saturday_yes_sunday_no() {
        assert!(is_school_day(date(2025, 8, 30)));
        assert!(!is_school_day(date(2025, 8, 31)));
    }

    #[test]
    fn test_monday_of_week_fixed_point() {
        let monday = date(2025, 9, 1);
        assert_eq!(monday_of_week(monday), monday);
    }

    #[test]
    fn test_monday_of_week_from_each_day() {
        let monday = date(2025, 9, 1);
        for offset in 0..7 {
            let day = monday + Days::new(offset);
            assert_eq!(monday_of_week(day), monday, "offset {offset}");
        }
    }

    #[test]
    fn test_week_label_format() {
        assert_eq!(week_label(date(2025, 9, 2)), "2025-W36");
    }

    #[test]
    fn test_week_label_pads_single_digit_weeks() {
        assert_eq!(week_label(date(2025, 1, 8)), "2025-W02");
    }

    #[test]
    fn test_week_label_year_boundary_belongs_to_next_year() {
        // 2024-12-30 is the Monday of ISO week 2025-W01.
        assert_eq!(week_label(date(2024, 12, 30)), "2025-W01");
    }

    #[test]
    fn test_week_label_year_boundary_belongs_to_previous_year() {
        // 2021-01-01 falls in ISO week 2020-W53.
        assert_eq!(week_label(date(2021, 1, 1)), "2020-W53");
    }

    #[test]
    fn test_monday_of_label() {
        assert_eq!(monday_of_label("2025-W36").unwrap(), date(2025, 9, 1));
    }

    #[test]
    fn test_monday_of_label_week_one() {
        assert_eq!(monday_of_label("2025-W01").unwrap(), date(2024, 12, 30));
    }

    #[test]
    fn test_monday_of_label_week_fifty_three() {
        assert_eq!(monday_of_label("2020-W53").unwrap(), date(2020, 12, 28));
    }

    #[test]
    fn test_monday_of_label_rejects_missing_week_53() {
        // 2025 has 52 ISO weeks.
        assert!(monday_of_label("2025-W53").is_err());
    }

    #[test]
    fn test_monday_of_label_rejects_garbage() {
        assert!(monday_of_label("2025W36").is_err());
        assert!(monday_of_label("2025-Wxx").is_err());
        assert!(monday_of_label("yyyy-W01").is_err());
        assert!(monday_of_label("2025-W00").is_err());
    }

    #[test]
    fn test_week_anchor_date() {
        let anchor = WeekAnchor::Date(date(2025, 9, 4));
        assert_eq!(anchor.monday().unwrap(), date(2025, 9, 1));
    }

    #[test]
    fn test_week_anchor_label() {
        let anchor = WeekAnchor::Label("2025-W36".to_string());
        assert_eq!(anchor.monday().unwrap(), date(2025, 9, 1));
    }

    #[test]
    fn test_lesson_time_display() {
        assert_eq!(LessonTime::new(8, 30).unwrap().to_string(), "08:30");
        assert_eq!(LessonTime::MIDNIGHT.to_string(), "00:00");
    }

    #[test]
    fn test_lesson_time_parse() {
        let t: LessonTime = "09:45".parse().unwrap();
        assert_eq!(t, LessonTime::new(9, 45).unwrap());
    }

    #[test]
    fn test_lesson_time_parse_rejects_bad_input() {
        assert!("9:45:00".parse::<LessonTime>().is_err());
        assert!("25:00".parse::<LessonTime>().is_err());
        assert!("noon".parse::<LessonTime>().is_err());
    }

    #[test]
    fn test_lesson_time_ordering() {
        assert!(LessonTime::new(8, 30).unwrap() < LessonTime::new(9, 20).unwrap());
    }

    #[test]
    fn test_lesson_time_serde_round_trip() {
        let t = LessonTime::new(13, 5).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        assert_eq!(json, "\"13:05\"");
        let back: LessonTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, t);
    }

    proptest! {
        #[test]
        fn prop_weekday_in_range(days in 0u64..36525) {
            let day = date(2000, 1, 1) + Days::new(days);
            let weekday = weekday_number(day);
            prop_assert!((1..=7).contains(&weekday));
            prop_assert_eq!(weekday == 7, day.weekday() == Weekday::Sun);
        }

        #[test]
        fn prop_monday_of_week_is_monday(days in 0u64..36525) {
            let day = date(2000, 1, 1) + Days::new(days);
            prop_assert_eq!(weekday_number(monday_of_week(day)), 1);
            prop_assert!(monday_of_week(day) <= day);
        }

        #[test]
        fn prop_week_label_round_trip(days in 0u64..36525) {
            let day = date(2000, 1, 1) + Days::new(days);
            let label = week_label(day);
            let monday = monday_of_label(&label).unwrap();
            prop_assert_eq!(week_label(monday), label);
            prop_assert_eq!(monday, monday_of_week(day));
        }
    }
}
