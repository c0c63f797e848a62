use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::{Date, Time};

use super::parse::{clock_label, parse_date, parse_time, FieldValue};

/// How unparseable date/time strings are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InputPolicy {
    /// Malformed fields count as absent.
    #[default]
    Lenient,
    /// Any malformed field makes the range invalid.
    Strict,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleField {
    StartDate,
    DueDate,
    StartTime,
    EndTime,
}

impl fmt::Display for ScheduleField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ScheduleField::StartDate => "start date",
            ScheduleField::DueDate => "due date",
            ScheduleField::StartTime => "start time",
            ScheduleField::EndTime => "end time",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("a due date is required")]
    MissingDueDate,
    #[error("start date {start} is after due date {due}")]
    StartAfterDue { start: Date, due: Date },
    #[error(
        "start time {} must be earlier than end time {}",
        clock_label(.start),
        clock_label(.end)
    )]
    StartTimeNotBeforeEnd { start: Time, end: Time },
    #[error("{field} `{value}` is not recognised")]
    Malformed { field: ScheduleField, value: String },
}

/// The temporal fields of a todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TodoSchedule {
    pub start_date: Option<Date>,
    pub due_date: Option<Date>,
    pub start_time: Option<Time>,
    pub end_time: Option<Time>,
}

impl TodoSchedule {
    /// Checks the ordering rules, reporting the first one violated.
    ///
    /// Times only constrain a todo that starts and ends on the same day, at minute resolution.
    pub fn validate(&self) -> Result<(), RangeError> {
        let due = self.due_date.ok_or(RangeError::MissingDueDate)?;
        let Some(start) = self.start_date else {
            return Ok(());
        };
        if start > due {
            return Err(RangeError::StartAfterDue { start, due });
        }
        if start == due {
            if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
                if minute_of_day(start) >= minute_of_day(end) {
                    return Err(RangeError::StartTimeNotBeforeEnd { start, end });
                }
            }
        }
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

fn minute_of_day(time: Time) -> u16 {
    u16::from(time.hour()) * 60 + u16::from(time.minute())
}

/// Validates the raw strings of a todo form.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeValidator {
    policy: InputPolicy,
}

impl RangeValidator {
    pub fn new(policy: InputPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn check(
        &self,
        start_date: Option<&str>,
        due_date: Option<&str>,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> Result<TodoSchedule, RangeError> {
        let schedule = TodoSchedule {
            start_date: self.accept(ScheduleField::StartDate, parse_date(start_date))?,
            due_date: self.accept(ScheduleField::DueDate, parse_date(due_date))?,
            start_time: self.accept(ScheduleField::StartTime, parse_time(start_time))?,
            end_time: self.accept(ScheduleField::EndTime, parse_time(end_time))?,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn is_valid(
        &self,
        start_date: Option<&str>,
        due_date: Option<&str>,
        start_time: Option<&str>,
        end_time: Option<&str>,
    ) -> bool {
        self.check(start_date, due_date, start_time, end_time)
            .is_ok()
    }

    fn accept<T>(&self, field: ScheduleField, value: FieldValue<T>) -> Result<Option<T>, RangeError> {
        match value {
            FieldValue::Absent => Ok(None),
            FieldValue::Present(value) => Ok(Some(value)),
            FieldValue::Malformed(value) => match self.policy {
                InputPolicy::Lenient => {
                    tracing::debug!(%field, %value, "ignoring malformed schedule field");
                    Ok(None)
                }
                InputPolicy::Strict => Err(RangeError::Malformed { field, value }),
            },
        }
    }
}

/// Lenient range check over raw form strings.
pub fn is_valid_range(
    start_date: Option<&str>,
    due_date: Option<&str>,
    start_time: Option<&str>,
    end_time: Option<&str>,
) -> bool {
    RangeValidator::default().is_valid(start_date, due_date, start_time, end_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use time::macros::{date, time};

    #[test]
    fn due_date_is_mandatory() {
        assert!(!is_valid_range(None, None, None, None));
        assert!(!is_valid_range(Some("2024-01-01"), None, Some("09:00"), Some("10:00")));
        assert_eq!(
            RangeValidator::default().check(None, Some(" "), None, None),
            Err(RangeError::MissingDueDate)
        );
    }

    #[test]
    fn due_date_alone_is_valid() {
        assert!(is_valid_range(None, Some("2024-01-01"), None, None));
        // times without a start date add no constraint
        assert!(is_valid_range(None, Some("2024-01-01"), Some("18:00"), Some("09:00")));
    }

    #[test]
    fn start_after_due_is_rejected() {
        assert!(!is_valid_range(Some("2024-01-02"), Some("2024-01-01"), None, None));
        assert_matches!(
            RangeValidator::default().check(Some("2024-01-02"), Some("2024-01-01"), None, None),
            Err(RangeError::StartAfterDue { start, due })
                if start == date!(2024 - 01 - 02) && due == date!(2024 - 01 - 01)
        );
    }

    #[test]
    fn same_day_requires_start_strictly_before_end() {
        let day = Some("2024-01-01");
        assert!(!is_valid_range(day, day, Some("10:00"), Some("10:00")));
        assert!(!is_valid_range(day, day, Some("11:00"), Some("10:30")));
        assert!(is_valid_range(day, day, Some("10:00"), Some("10:01")));
        assert!(is_valid_range(day, day, Some("10:00"), None));
        assert!(is_valid_range(day, day, None, Some("10:00")));
    }

    #[test]
    fn seconds_do_not_separate_same_minute_times() {
        let day = Some("2024-01-01");
        assert!(!is_valid_range(day, day, Some("10:00"), Some("10:00:30")));
        assert!(!is_valid_range(day, day, Some("10:00:59"), Some("10:00")));
        assert!(is_valid_range(day, day, Some("10:00:59"), Some("10:01:00")));
        let schedule = TodoSchedule {
            start_date: Some(date!(2024 - 01 - 01)),
            due_date: Some(date!(2024 - 01 - 01)),
            start_time: Some(time!(10:00)),
            end_time: Some(time!(10:00:30)),
        };
        assert_eq!(
            schedule.validate(),
            Err(RangeError::StartTimeNotBeforeEnd {
                start: time!(10:00),
                end: time!(10:00:30),
            })
        );
    }

    #[test]
    fn times_are_ignored_across_days() {
        assert!(is_valid_range(
            Some("2024-01-01"),
            Some("2024-01-02"),
            Some("23:00"),
            Some("01:00")
        ));
    }

    #[test]
    fn lenient_policy_drops_malformed_fields() {
        let day = Some("2024-01-01");
        assert!(is_valid_range(Some("yesterday"), day, None, None));
        assert!(is_valid_range(day, day, Some("soon"), Some("10:00")));
        // a malformed due date is an absent due date
        assert!(!is_valid_range(None, Some("2024/01/01"), None, None));
    }

    #[test]
    fn strict_policy_fails_closed() {
        let strict = RangeValidator::new(InputPolicy::Strict);
        let day = Some("2024-01-01");
        assert_matches!(
            strict.check(day, day, Some("soon"), Some("10:00")),
            Err(RangeError::Malformed { field: ScheduleField::StartTime, value }) if value == "soon"
        );
        assert!(strict.is_valid(day, day, Some("09:00"), Some("10:00")));
    }

    #[test]
    fn check_returns_parsed_schedule() {
        let schedule = RangeValidator::default()
            .check(Some("2024-01-01"), Some("2024-01-01"), Some("9:30"), Some("11:00"))
            .expect("valid");
        assert_eq!(
            schedule,
            TodoSchedule {
                start_date: Some(date!(2024 - 01 - 01)),
                due_date: Some(date!(2024 - 01 - 01)),
                start_time: Some(time!(9:30)),
                end_time: Some(time!(11:00)),
            }
        );
    }

    #[test]
    fn errors_read_as_messages() {
        let err = RangeError::StartTimeNotBeforeEnd {
            start: time!(10:00),
            end: time!(10:00),
        };
        assert_eq!(err.to_string(), "start time 10:00 must be earlier than end time 10:00");
        let err = RangeError::Malformed {
            field: ScheduleField::DueDate,
            value: "soon".into(),
        };
        assert_eq!(err.to_string(), "due date `soon` is not recognised");
    }
}
