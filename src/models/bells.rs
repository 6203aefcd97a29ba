use super::calendar::LessonTime;
use serde::{Deserialize, Serialize};

/// Name of the school's default bell timetable.
pub const DEFAULT_BELL_TABLE_NAME: &str = "Стандарт";

/// One period's slot in a bell timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BellPeriod {
    pub num: u8,
    pub time_start: LessonTime,
    pub time_end: LessonTime,
}

/// Named, ordered period-number → clock-time mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BellTimetable {
    pub name: String,
    pub periods: Vec<BellPeriod>,
}

/// The built-in table: 12 periods of 40 minutes from 08:30, with the
/// school's long-break gaps between periods. Used whenever storage has no
/// table named "Стандарт".
const STANDARD_PERIODS: [(u8, (u32, u32), (u32, u32)); 12] = [
    (1, (8, 30), (9, 10)),
    (2, (9, 20), (10, 0)),
    (3, (10, 10), (10, 50)),
    (4, (11, 10), (11, 50)),
    (5, (12, 10), (12, 50)),
    (6, (13, 5), (13, 45)),
    (7, (14, 0), (14, 40)),
    (8, (15, 0), (15, 40)),
    (9, (15, 50), (16, 30)),
    (10, (16, 40), (17, 20)),
    (11, (17, 30), (18, 10)),
    (12, (18, 20), (19, 0)),
];

impl BellTimetable {
    /// The hard-coded fallback table (name "Стандарт").
    pub fn standard() -> Self {
        let periods = STANDARD_PERIODS
            .iter()
            .map(|&(num, (sh, sm), (eh, em))| BellPeriod {
                num,
                time_start: LessonTime::new(sh, sm).unwrap_or_default(),
                time_end: LessonTime::new(eh, em).unwrap_or_default(),
            })
            .collect();
        Self {
            name: DEFAULT_BELL_TABLE_NAME.to_string(),
            periods,
        }
    }

    pub fn period(&self, num: u8) -> Option<&BellPeriod> {
        self.periods.iter().find(|p| p.num == num)
    }

    /// Start/end times for a period; "00:00" when the table has no entry.
    pub fn times_for(&self, num: u8) -> (LessonTime, LessonTime) {
        match self.period(num) {
            Some(period) => (period.time_start, period.time_end),
            None => (LessonTime::MIDNIGHT, LessonTime::MIDNIGHT),
        }
    }
}

impl Default for BellTimetable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_has_twelve_periods() {
        let table = BellTimetable::standard();
        assert_eq!(table.periods.len(), 12);
        assert_eq!(table.name, "Стандарт");
    }

    #[test]
    fn test_standard_period_numbers_are_sequential() {
        let table = BellTimetable::standard();
        let nums: Vec<u8> = table.periods.iter().map(|p| p.num).collect();
        assert_eq!(nums, (1..=12).collect::<Vec<u8>>());
    }

    #[test]
    fn test_standard_start_times() {
        let table = BellTimetable::standard();
        let starts: Vec<String> = table
            .periods
            .iter()
            .map(|p| p.time_start.to_string())
            .collect();
        assert_eq!(
            starts,
            vec![
                "08:30", "09:20", "10:10", "11:10", "12:10", "13:05", "14:00", "15:00", "15:50",
                "16:40", "17:30", "18:20"
            ]
        );
    }

    #[test]
    fn test_standard_periods_last_forty_minutes() {
        let table = BellTimetable::standard();
        for period in &table.periods {
            let length = period.time_end.value() - period.time_start.value();
            assert_eq!(length.num_minutes(), 40, "period {}", period.num);
        }
    }

    #[test]
    fn test_standard_long_breaks() {
        let table = BellTimetable::standard();
        let gap = |after: u8| {
            let end = table.period(after).unwrap().time_end.value();
            let next = table.period(after + 1).unwrap().time_start.value();
            (next - end).num_minutes()
        };
        assert_eq!(gap(1), 10);
        assert_eq!(gap(3), 20);
        assert_eq!(gap(4), 20);
        assert_eq!(gap(5), 15);
        assert_eq!(gap(7), 20);
    }

    #[test]
    fn test_times_for_known_period() {
        let table = BellTimetable::standard();
        let (start, end) = table.times_for(6);
        assert_eq!(start.to_string(), "13:05");
        assert_eq!(end.to_string(), "13:45");
    }

    #[test]
    fn test_times_for_unknown_period_is_midnight() {
        let table = BellTimetable::standard();
        let (start, end) = table.times_for(13);
        assert_eq!(start.to_string(), "00:00");
        assert_eq!(end.to_string(), "00:00");
    }

    #[test]
    fn test_serializes_camel_case() {
        let table = BellTimetable::standard();
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["periods"][0]["timeStart"], "08:30");
        assert_eq!(json["periods"][0]["timeEnd"], "09:10");
    }

    #[test]
    fn test_round_trips_through_json() {
        let table = BellTimetable::standard();
        let json = serde_json::to_string(&table).unwrap();
        let back: BellTimetable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }
}
