//! Calendar core for study records and todos.
//!
//! Groups dated items by day, derives the markers a calendar cell shows, validates todo
//! start/end ranges and guards navigation away from unsaved edits. Everything operates on
//! caller-owned snapshots; nothing here performs I/O except [`config`] and [`cli`].

pub mod calendar;
pub mod cli;
pub mod config;
pub mod guard;
pub mod model;
pub mod schedule;
pub mod tags;

pub use calendar::{
    group_by_day, resolve, ClockSnapshot, DayBucket, DayKey, DayMarkers, DayStatus,
    DayStatusIndex, LocalZone,
};
pub use config::{CalendarConfig, ConfigLoader, ConfigPaths};
pub use guard::{EditSession, NavigationDecision, NavigationGuard, UnloadDecision};
pub use model::{Completable, Dated, ItemId, Snapshot, StudyRecord, TodoItem};
pub use schedule::{is_valid_range, RangeError, RangeValidator, TodoSchedule};
pub use tags::{filter_by_tag, TagSelection};
