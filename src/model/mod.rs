//! Dated items the calendar operates on.
//!
//! Items are produced by whatever owns create/update/delete; this crate only reads them.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, Time};

use crate::calendar::{DayKey, LocalZone};
use crate::schedule::TodoSchedule;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");
time::serde::format_description!(clock_time, Time, "[hour]:[minute]");
// Snapshots may carry seconds; they are read but written back at minute resolution.
time::serde::format_description!(
    clock_time_in,
    Time,
    "[hour padding:none]:[minute][optional [:[second]]]"
);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{id}"),
            ItemId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        ItemId::Text(id)
    }
}

/// Anything with an identity, a calendar position and tags.
pub trait Dated {
    fn id(&self) -> &ItemId;

    /// Instant used for day bucketing, or `None` when the item has no calendar position.
    fn occurs_at(&self, zone: LocalZone) -> Option<OffsetDateTime>;

    fn tags(&self) -> &[String];

    fn day_key(&self, zone: LocalZone) -> Option<DayKey> {
        self.occurs_at(zone).map(|at| DayKey::of(at, zone))
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.tags().iter().any(|candidate| candidate == tag)
    }
}

/// A dated item that can be ticked off.
pub trait Completable: Dated {
    fn is_completed(&self) -> bool;
}

impl<T: Dated + ?Sized> Dated for &T {
    fn id(&self) -> &ItemId {
        (**self).id()
    }

    fn occurs_at(&self, zone: LocalZone) -> Option<OffsetDateTime> {
        (**self).occurs_at(zone)
    }

    fn tags(&self) -> &[String] {
        (**self).tags()
    }

    fn day_key(&self, zone: LocalZone) -> Option<DayKey> {
        (**self).day_key(zone)
    }
}

impl<T: Completable + ?Sized> Completable for &T {
    fn is_completed(&self) -> bool {
        (**self).is_completed()
    }
}

/// A study entry, bucketed by the moment it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyRecord {
    pub id: ItemId,
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Dated for StudyRecord {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn occurs_at(&self, _zone: LocalZone) -> Option<OffsetDateTime> {
        Some(self.created_at)
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// A to-do, bucketed by its due date.
///
/// A todo without `due_date` is kept for display and tag filtering but never lands on a
/// calendar day and never validates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: ItemId,
    pub title: String,
    #[serde(default, with = "iso_date::option")]
    pub start_date: Option<Date>,
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<Date>,
    #[serde(
        default,
        serialize_with = "clock_time::option::serialize",
        deserialize_with = "clock_time_in::option::deserialize"
    )]
    pub start_time: Option<Time>,
    #[serde(
        default,
        serialize_with = "clock_time::option::serialize",
        deserialize_with = "clock_time_in::option::deserialize"
    )]
    pub end_time: Option<Time>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl TodoItem {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, due_date: Option<Date>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start_date: None,
            due_date,
            start_time: None,
            end_time: None,
            completed: false,
            tags: Vec::new(),
        }
    }

    pub fn schedule(&self) -> TodoSchedule {
        TodoSchedule {
            start_date: self.start_date,
            due_date: self.due_date,
            start_time: self.start_time,
            end_time: self.end_time,
        }
    }

    pub fn due_day(&self) -> Option<DayKey> {
        self.due_date.map(DayKey::from_date)
    }
}

impl Dated for TodoItem {
    fn id(&self) -> &ItemId {
        &self.id
    }

    fn occurs_at(&self, zone: LocalZone) -> Option<OffsetDateTime> {
        self.due_day().map(|day| day.start_instant(zone))
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn day_key(&self, _zone: LocalZone) -> Option<DayKey> {
        self.due_day()
    }
}

impl Completable for TodoItem {
    fn is_completed(&self) -> bool {
        self.completed
    }
}

/// A point-in-time copy of both collections, as handed over by the CRUD side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub records: Vec<StudyRecord>,
    pub todos: Vec<TodoItem>,
}
