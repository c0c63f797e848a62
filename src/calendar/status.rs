use std::collections::BTreeMap;

use bitflags::bitflags;

use super::{ClockSnapshot, DayKey};
use crate::model::{Completable, Dated};

bitflags! {
    /// Decorations a calendar cell can carry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DayMarkers: u8 {
        const RECORD = 1;
        const TODO_DUE = 1 << 1;
        const OVERDUE = 1 << 2;
        /// Only ever set together with `TODO_DUE`.
        const ALL_COMPLETED = 1 << 3;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayStatus {
    pub has_record: bool,
    pub has_todo_due: bool,
    pub has_overdue_todo: bool,
    /// False when nothing is due that day; check `has_todo_due` first.
    pub all_due_todos_completed: bool,
}

impl DayStatus {
    pub fn markers(&self) -> DayMarkers {
        let mut markers = DayMarkers::empty();
        markers.set(DayMarkers::RECORD, self.has_record);
        markers.set(DayMarkers::TODO_DUE, self.has_todo_due);
        markers.set(DayMarkers::OVERDUE, self.has_overdue_todo);
        markers.set(
            DayMarkers::ALL_COMPLETED,
            self.has_todo_due && self.all_due_todos_completed,
        );
        markers
    }

    pub fn is_blank(&self) -> bool {
        self.markers().is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct DayTally {
    records: usize,
    due: usize,
    completed: usize,
}

impl DayTally {
    fn status(&self, day: DayKey, today: DayKey) -> DayStatus {
        DayStatus {
            has_record: self.records > 0,
            has_todo_due: self.due > 0,
            has_overdue_todo: day < today && self.completed < self.due,
            all_due_todos_completed: self.due > 0 && self.completed == self.due,
        }
    }
}

/// Markers for a single day, scanning both collections once.
pub fn resolve<R: Dated, T: Completable>(
    day: DayKey,
    records: &[R],
    todos: &[T],
    clock: &ClockSnapshot,
) -> DayStatus {
    let zone = clock.zone();
    let mut tally = DayTally {
        records: records
            .iter()
            .filter(|record| record.day_key(zone) == Some(day))
            .count(),
        ..DayTally::default()
    };
    for todo in todos.iter().filter(|todo| todo.day_key(zone) == Some(day)) {
        tally.due += 1;
        if todo.is_completed() {
            tally.completed += 1;
        }
    }
    tally.status(day, clock.today())
}

/// Per-day tallies built once per render pass.
///
/// Answers [`resolve`] for any day without rescanning the collections.
#[derive(Debug, Clone)]
pub struct DayStatusIndex {
    today: DayKey,
    tallies: BTreeMap<DayKey, DayTally>,
}

impl DayStatusIndex {
    pub fn build<R: Dated, T: Completable>(
        records: &[R],
        todos: &[T],
        clock: &ClockSnapshot,
    ) -> Self {
        let zone = clock.zone();
        let mut tallies: BTreeMap<DayKey, DayTally> = BTreeMap::new();
        for day in records.iter().filter_map(|record| record.day_key(zone)) {
            tallies.entry(day).or_default().records += 1;
        }
        for todo in todos {
            let Some(day) = todo.day_key(zone) else {
                continue;
            };
            let tally = tallies.entry(day).or_default();
            tally.due += 1;
            if todo.is_completed() {
                tally.completed += 1;
            }
        }
        tracing::trace!(days = tallies.len(), "built day status index");
        Self {
            today: clock.today(),
            tallies,
        }
    }

    pub fn status(&self, day: DayKey) -> DayStatus {
        self.tallies
            .get(&day)
            .map(|tally| tally.status(day, self.today))
            .unwrap_or_default()
    }

    pub fn statuses<I>(&self, days: I) -> Vec<(DayKey, DayStatus)>
    where
        I: IntoIterator<Item = DayKey>,
    {
        days.into_iter().map(|day| (day, self.status(day))).collect()
    }

    /// Days in `first..=last` that carry at least one marker, oldest first.
    pub fn marked_between(&self, first: DayKey, last: DayKey) -> Vec<(DayKey, DayStatus)> {
        if first > last {
            return Vec::new();
        }
        self.tallies
            .range(first..=last)
            .map(|(day, tally)| (*day, tally.status(*day, self.today)))
            .filter(|(_, status)| !status.is_blank())
            .collect()
    }
}
