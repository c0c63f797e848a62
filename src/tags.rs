//! Tag filtering and the caller-side tag selection.

use indexmap::IndexSet;

use crate::model::Dated;

/// Items carrying `tag`, in input order. `None` keeps everything.
pub fn filter_by_tag<'a, T: Dated>(items: &'a [T], tag: Option<&str>) -> Vec<&'a T> {
    match tag {
        None => items.iter().collect(),
        Some(tag) => items.iter().filter(|item| item.has_tag(tag)).collect(),
    }
}

/// Distinct tags across `items`, in the order first seen.
pub fn collect_tags<T: Dated>(items: &[T]) -> Vec<String> {
    let mut seen: IndexSet<&str> = IndexSet::new();
    for item in items {
        seen.extend(item.tags().iter().map(String::as_str));
    }
    seen.into_iter().map(str::to_string).collect()
}

/// The currently selected tag of a list view.
///
/// Selecting the tag that is already selected clears the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    selected: Option<String>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn toggle(&mut self, tag: &str) -> Option<&str> {
        if self.selected.as_deref() == Some(tag) {
            self.selected = None;
        } else {
            self.selected = Some(tag.to_string());
        }
        self.selected()
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn apply<'a, T: Dated>(&self, items: &'a [T]) -> Vec<&'a T> {
        filter_by_tag(items, self.selected())
    }
}
