use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use time::macros::format_description;
use time::{Date, Duration, Month, OffsetDateTime, Time};

use super::{ClockSnapshot, LocalZone};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DayKeyError {
    #[error("`{0}` is not a calendar day (expected YYYY-MM-DD)")]
    Parse(String),
    #[error("`{0}` is not a calendar month (expected YYYY-MM)")]
    ParseMonth(String),
    #[error("year {0} is outside the supported calendar range")]
    OutOfRange(i32),
}

/// Calendar-day identity of an instant, stripped of time-of-day.
///
/// Ordering is chronological, so sorting keys in reverse yields most recent first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(Date);

impl DayKey {
    /// Day of `timestamp` as seen in `zone`.
    pub fn of(timestamp: OffsetDateTime, zone: LocalZone) -> Self {
        Self(timestamp.to_offset(zone.offset()).date())
    }

    pub fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub fn today(clock: &ClockSnapshot) -> Self {
        clock.today()
    }

    pub fn date(self) -> Date {
        self.0
    }

    /// The key `days` before this one, clamped at the earliest representable date.
    pub fn days_before(self, days: u32) -> Self {
        Self(
            self.0
                .checked_sub(Duration::days(i64::from(days)))
                .unwrap_or(Date::MIN),
        )
    }

    pub fn next(self) -> Option<Self> {
        self.0.next_day().map(Self)
    }

    pub fn previous(self) -> Option<Self> {
        self.0.previous_day().map(Self)
    }

    /// Local midnight opening this day.
    pub fn start_instant(self, zone: LocalZone) -> OffsetDateTime {
        self.0.with_time(Time::MIDNIGHT).assume_offset(zone.offset())
    }

    /// Every day of a calendar month, first to last.
    pub fn month_days(year: i32, month: Month) -> Result<Vec<DayKey>, DayKeyError> {
        let first =
            Date::from_calendar_date(year, month, 1).map_err(|_| DayKeyError::OutOfRange(year))?;
        let len = month.length(year);
        let mut days = Vec::with_capacity(usize::from(len));
        let mut cursor = Some(first);
        while let Some(date) = cursor {
            if date.month() != month {
                break;
            }
            days.push(Self(date));
            cursor = date.next_day();
        }
        Ok(days)
    }

    /// Parses `YYYY-MM` into a year and month.
    pub fn parse_month(input: &str) -> Result<(i32, Month), DayKeyError> {
        let trimmed = input.trim();
        let err = || DayKeyError::ParseMonth(trimmed.to_string());
        let (year, month) = trimmed.split_once('-').ok_or_else(err)?;
        let year: i32 = year.parse().map_err(|_| err())?;
        let month: u8 = month.parse().map_err(|_| err())?;
        let month = Month::try_from(month).map_err(|_| err())?;
        Ok((year, month))
    }
}

impl From<Date> for DayKey {
    fn from(date: Date) -> Self {
        Self(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for DayKey {
    type Err = DayKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
            .map(Self)
            .map_err(|_| DayKeyError::Parse(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn same_local_day_maps_to_same_key() {
        let zone = LocalZone::UTC;
        let t = datetime!(2024-01-05 08:15:00 UTC);
        let key = DayKey::of(t, zone);
        assert_eq!(key, DayKey::of(t + Duration::milliseconds(1), zone));
        assert_eq!(key, DayKey::of(t, zone));
        assert_eq!(key, DayKey::of(datetime!(2024-01-05 23:59:59.999 UTC), zone));
        assert_ne!(key, DayKey::of(datetime!(2024-01-06 00:00 UTC), zone));
    }

    #[test]
    fn key_is_taken_in_the_zone() {
        let zone = LocalZone::fixed(offset!(+2));
        let late_utc = datetime!(2024-01-01 23:30 UTC);
        assert_eq!(DayKey::of(late_utc, zone).date(), date!(2024 - 01 - 02));
        let same_wall_clock_day = datetime!(2024-01-02 08:00 +2);
        assert_eq!(DayKey::of(late_utc, zone), DayKey::of(same_wall_clock_day, zone));
    }

    #[test]
    fn start_instant_is_local_midnight() {
        let zone = LocalZone::fixed(offset!(-5));
        let key = DayKey::from(date!(2024 - 01 - 10));
        assert_eq!(key.start_instant(zone), datetime!(2024-01-10 00:00 -5));
        assert_eq!(DayKey::of(key.start_instant(zone), zone), key);
    }

    #[test]
    fn days_before_crosses_month_boundaries() {
        let key = DayKey::from(date!(2024 - 03 - 02));
        assert_eq!(key.days_before(2).date(), date!(2024 - 02 - 29));
        assert_eq!(key.days_before(0), key);
    }

    #[test]
    fn month_days_covers_leap_february() {
        let days = DayKey::month_days(2024, Month::February).expect("month");
        assert_eq!(days.len(), 29);
        assert_eq!(days[0].to_string(), "2024-02-01");
        assert_eq!(days[28].to_string(), "2024-02-29");
        assert_eq!(DayKey::month_days(2023, Month::February).expect("month").len(), 28);
        assert_eq!(DayKey::month_days(2024, Month::April).expect("month").len(), 30);
    }

    #[test]
    fn parses_day_and_month_strings() {
        let key: DayKey = "2024-01-03".parse().expect("day");
        assert_eq!(key.date(), date!(2024 - 01 - 03));
        assert!("2024-13-01".parse::<DayKey>().is_err());
        assert_eq!(
            DayKey::parse_month("2024-07").expect("month"),
            (2024, Month::July)
        );
        assert!(DayKey::parse_month("2024-00").is_err());
        assert!(DayKey::parse_month("july").is_err());
    }
}
