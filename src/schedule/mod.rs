//! Todo start/end validation.

mod draft;
mod parse;
mod range;

pub use draft::TodoDraft;
pub use range::{is_valid_range, InputPolicy, RangeError, RangeValidator, ScheduleField, TodoSchedule};
