//! Day identity, day buckets and per-day markers.

mod aggregate;
mod clock;
mod day_key;
mod grid;
mod status;

pub use aggregate::{group_by_day, DayBucket, RecentWindow};
pub use clock::{ClockSnapshot, LocalZone, ZoneError};
pub use day_key::{DayKey, DayKeyError};
pub use grid::{month_weeks, Week, WeekStart};
pub use status::{resolve, DayMarkers, DayStatus, DayStatusIndex};
