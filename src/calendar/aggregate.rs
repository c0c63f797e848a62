use indexmap::IndexMap;
use time::OffsetDateTime;

use super::{ClockSnapshot, DayKey};
use crate::model::Dated;

/// Items that share one calendar day, in the order the caller supplied them.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket<'a, T> {
    pub day: DayKey,
    pub items: Vec<&'a T>,
}

impl<'a, T> DayBucket<'a, T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The trailing `days` calendar days up to now.
///
/// Bounds are inclusive; the lower bound is local midnight `days` days before today and the
/// upper bound is the snapshot's instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentWindow {
    days: u32,
}

impl RecentWindow {
    pub fn new(days: u32) -> Self {
        Self { days }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn bounds(&self, clock: &ClockSnapshot) -> (OffsetDateTime, OffsetDateTime) {
        let first_day = clock.today().days_before(self.days);
        (first_day.start_instant(clock.zone()), clock.now())
    }

    pub fn contains(&self, instant: OffsetDateTime, clock: &ClockSnapshot) -> bool {
        let (lower, upper) = self.bounds(clock);
        lower <= instant && instant <= upper
    }
}

/// Groups `items` by calendar day, most recent day first.
///
/// With `window_days`, only items inside [`RecentWindow`] are kept. Items without a calendar
/// position are skipped.
pub fn group_by_day<'a, T: Dated>(
    items: &'a [T],
    window_days: Option<u32>,
    clock: &ClockSnapshot,
) -> Vec<DayBucket<'a, T>> {
    let zone = clock.zone();
    let bounds = window_days.map(|days| RecentWindow::new(days).bounds(clock));

    let mut groups: IndexMap<DayKey, Vec<&'a T>> = IndexMap::new();
    let mut undated = 0usize;
    let mut outside = 0usize;
    for item in items {
        let Some(at) = item.occurs_at(zone) else {
            undated += 1;
            continue;
        };
        if let Some((lower, upper)) = bounds {
            if at < lower || at > upper {
                outside += 1;
                continue;
            }
        }
        groups.entry(DayKey::of(at, zone)).or_default().push(item);
    }

    if undated > 0 || outside > 0 {
        tracing::debug!(undated, outside, window_days, "items left out of day buckets");
    }

    groups.sort_unstable_by(|left, _, right, _| right.cmp(left));
    groups
        .into_iter()
        .map(|(day, items)| DayBucket { day, items })
        .collect()
}
