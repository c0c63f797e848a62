use time::macros::format_description;
use time::{Date, Time};

/// Outcome of reading one optional form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FieldValue<T> {
    Absent,
    Present(T),
    Malformed(String),
}

pub(crate) fn parse_date(input: Option<&str>) -> FieldValue<Date> {
    parse_with(input, |raw| {
        Date::parse(raw, format_description!("[year]-[month]-[day]")).ok()
    })
}

/// Accepts `HH:MM` and `HH:MM:SS`, hour with or without a leading zero.
pub(crate) fn parse_time(input: Option<&str>) -> FieldValue<Time> {
    parse_with(input, |raw| {
        Time::parse(
            raw,
            format_description!("[hour padding:none]:[minute][optional [:[second]]]"),
        )
        .ok()
    })
}

pub(crate) fn clock_label(time: &Time) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

fn parse_with<T>(input: Option<&str>, parse: impl FnOnce(&str) -> Option<T>) -> FieldValue<T> {
    let Some(raw) = input.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return FieldValue::Absent;
    };
    match parse(raw) {
        Some(value) => FieldValue::Present(value),
        None => FieldValue::Malformed(raw.to_string()),
    }
}
