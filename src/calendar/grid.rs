use serde::{Deserialize, Serialize};
use time::{Month, Weekday};

use super::{DayKey, DayKeyError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

impl WeekStart {
    fn weekday(self) -> Weekday {
        match self {
            WeekStart::Monday => Weekday::Monday,
            WeekStart::Sunday => Weekday::Sunday,
        }
    }

    /// Column (0..7) of `day` in a week starting on `self`.
    pub fn column(self, day: DayKey) -> usize {
        let from_start = day.date().weekday().number_days_from_monday()
            + 7
            - self.weekday().number_days_from_monday();
        usize::from(from_start % 7)
    }

    pub fn headers(self) -> [&'static str; 7] {
        match self {
            WeekStart::Monday => ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"],
            WeekStart::Sunday => ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"],
        }
    }
}

pub type Week = [Option<DayKey>; 7];

/// Lays a month out as week rows, padding with `None` outside the month.
pub fn month_weeks(year: i32, month: Month, start: WeekStart) -> Result<Vec<Week>, DayKeyError> {
    let days = DayKey::month_days(year, month)?;
    let mut weeks: Vec<Week> = Vec::with_capacity(6);
    let mut current: Week = [None; 7];
    for day in days {
        let column = start.column(day);
        if column == 0 && current.iter().any(Option::is_some) {
            weeks.push(current);
            current = [None; 7];
        }
        current[column] = Some(day);
    }
    if current.iter().any(Option::is_some) {
        weeks.push(current);
    }
    Ok(weeks)
}
