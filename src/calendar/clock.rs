use thiserror::Error;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use super::DayKey;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZoneError {
    #[error("the runtime local offset could not be determined")]
    Indeterminate,
    #[error("`{0}` is not a UTC offset (expected e.g. +09:00 or -05:30)")]
    InvalidOffset(String),
}

/// The single calendar reference every day computation is made in.
///
/// All components take the zone explicitly; mixing a UTC day and a local day for the same
/// instant is never done internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalZone {
    offset: UtcOffset,
}

impl LocalZone {
    pub const UTC: LocalZone = LocalZone {
        offset: UtcOffset::UTC,
    };

    pub fn fixed(offset: UtcOffset) -> Self {
        Self { offset }
    }

    /// Reads the runtime's current local offset.
    pub fn system() -> Result<Self, ZoneError> {
        UtcOffset::current_local_offset()
            .map(Self::fixed)
            .map_err(|_| ZoneError::Indeterminate)
    }

    /// Parses a signed `+HH:MM` / `-HH:MM` offset.
    pub fn parse_offset(input: &str) -> Result<Self, ZoneError> {
        let trimmed = input.trim();
        UtcOffset::parse(
            trimmed,
            format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
        )
        .map(Self::fixed)
        .map_err(|_| ZoneError::InvalidOffset(trimmed.to_string()))
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }
}

impl Default for LocalZone {
    fn default() -> Self {
        Self::UTC
    }
}

/// A pinned reading of "now" together with the zone it is interpreted in.
///
/// Callers capture one snapshot per render pass so that every day computed in that pass
/// agrees on what "today" is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    now: OffsetDateTime,
    zone: LocalZone,
}

impl ClockSnapshot {
    pub fn capture(zone: LocalZone) -> Self {
        Self::at(OffsetDateTime::now_utc(), zone)
    }

    pub fn at(now: OffsetDateTime, zone: LocalZone) -> Self {
        Self { now, zone }
    }

    pub fn now(&self) -> OffsetDateTime {
        self.now
    }

    pub fn zone(&self) -> LocalZone {
        self.zone
    }

    pub fn today(&self) -> DayKey {
        DayKey::of(self.now, self.zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, offset};

    #[test]
    fn parses_signed_offsets() {
        let zone = LocalZone::parse_offset(" +09:00 ").expect("offset");
        assert_eq!(zone.offset(), offset!(+9));
        let zone = LocalZone::parse_offset("-05:30").expect("offset");
        assert_eq!(zone.offset(), offset!(-5:30));
    }

    #[test]
    fn rejects_unsigned_or_garbage_offsets() {
        assert_eq!(
            LocalZone::parse_offset("09:00"),
            Err(ZoneError::InvalidOffset("09:00".into()))
        );
        assert!(LocalZone::parse_offset("tomorrow").is_err());
    }

    #[test]
    fn today_follows_the_zone_not_utc() {
        let now = datetime!(2024-03-31 22:30 UTC);
        let utc = ClockSnapshot::at(now, LocalZone::UTC);
        let tokyo = ClockSnapshot::at(now, LocalZone::fixed(offset!(+9)));
        assert_eq!(utc.today().date(), date!(2024 - 03 - 31));
        assert_eq!(tokyo.today().date(), date!(2024 - 04 - 01));
    }
}
