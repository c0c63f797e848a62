use super::parse::clock_label;
use super::{RangeError, RangeValidator, TodoSchedule};
use crate::model::TodoItem;

/// The editable text of a todo form.
///
/// Fields hold exactly what the user typed; nothing is parsed until [`TodoDraft::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    pub start_date: String,
    pub due_date: String,
    pub start_time: String,
    pub end_time: String,
    pub tags: Vec<String>,
}

impl TodoDraft {
    pub fn from_item(item: &TodoItem) -> Self {
        Self {
            title: item.title.clone(),
            start_date: item.start_date.map(|d| d.to_string()).unwrap_or_default(),
            due_date: item.due_date.map(|d| d.to_string()).unwrap_or_default(),
            start_time: item.start_time.as_ref().map(clock_label).unwrap_or_default(),
            end_time: item.end_time.as_ref().map(clock_label).unwrap_or_default(),
            tags: item.tags.clone(),
        }
    }

    pub fn validate(&self, validator: &RangeValidator) -> Result<TodoSchedule, RangeError> {
        validator.check(
            Some(&self.start_date),
            Some(&self.due_date),
            Some(&self.start_time),
            Some(&self.end_time),
        )
    }

    /// Adds `tag` unless already present. Returns whether it was added.
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.tags.iter().any(|existing| existing == tag) {
            return false;
        }
        self.tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|existing| existing != tag);
        self.tags.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, time};

    #[test]
    fn round_trips_item_fields_into_form_text() {
        let mut item = TodoItem::new(4, "lab report", Some(date!(2024 - 02 - 09)));
        item.start_date = Some(date!(2024 - 02 - 09));
        item.start_time = Some(time!(8:00));
        item.end_time = Some(time!(9:45));
        item.tags = vec!["chem".into()];

        let draft = TodoDraft::from_item(&item);
        assert_eq!(draft.due_date, "2024-02-09");
        assert_eq!(draft.start_time, "08:00");
        assert_eq!(draft.end_time, "09:45");
        assert_eq!(draft.validate(&RangeValidator::default()), Ok(item.schedule()));
    }

    #[test]
    fn empty_draft_reports_missing_due_date() {
        let draft = TodoDraft::default();
        assert_eq!(
            draft.validate(&RangeValidator::default()),
            Err(RangeError::MissingDueDate)
        );
    }

    #[test]
    fn tags_are_trimmed_and_unique() {
        let mut draft = TodoDraft::default();
        assert!(draft.add_tag(" exam "));
        assert!(!draft.add_tag("exam"));
        assert!(!draft.add_tag("  "));
        assert_eq!(draft.tags, vec!["exam".to_string()]);
        assert!(draft.remove_tag("exam"));
        assert!(!draft.remove_tag("exam"));
    }
}
