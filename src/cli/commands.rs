use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use time::Month;

use crate::calendar::{
    group_by_day, month_weeks, ClockSnapshot, DayBucket, DayKey, DayMarkers, DayStatus,
    DayStatusIndex, WeekStart,
};
use crate::config::CalendarConfig;
use crate::model::{Dated, Snapshot, StudyRecord, TodoItem};
use crate::schedule::{InputPolicy, RangeValidator};
use crate::tags::filter_by_tag;

#[derive(Args, Debug, Clone)]
pub struct DaysArgs {
    /// JSON snapshot with `records` and `todos` (`-` reads stdin)
    #[arg(long)]
    pub snapshot: PathBuf,
    /// Only keep items from the last N days up to now
    #[arg(long, conflicts_with = "recent")]
    pub window: Option<u32>,
    /// Use the configured recent window
    #[arg(long)]
    pub recent: bool,
    /// Only items carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
    /// List todos by due date instead of records
    #[arg(long)]
    pub todos: bool,
}

#[derive(Args, Debug, Clone)]
pub struct StatusArgs {
    /// JSON snapshot with `records` and `todos` (`-` reads stdin)
    #[arg(long)]
    pub snapshot: PathBuf,
    /// Month to show as YYYY-MM (defaults to the current month)
    #[arg(long)]
    pub month: Option<String>,
    /// Only items carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub due_date: Option<String>,
    #[arg(long)]
    pub start_time: Option<String>,
    #[arg(long)]
    pub end_time: Option<String>,
    /// Reject unparseable fields instead of ignoring them
    #[arg(long)]
    pub strict: bool,
}

pub fn print_days(config: &CalendarConfig, clock: &ClockSnapshot, args: DaysArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let window = args
        .window
        .or_else(|| args.recent.then_some(config.recent_window_days));
    let tag = args.tag.as_deref();

    let output = if args.todos {
        let todos = filter_by_tag(&snapshot.todos, tag);
        let buckets = group_by_day(&todos, window, clock);
        format_days(&buckets, |todo: &&TodoItem| describe_todo(todo))
    } else {
        let records = filter_by_tag(&snapshot.records, tag);
        let buckets = group_by_day(&records, window, clock);
        format_days(&buckets, |record: &&StudyRecord| describe_record(record))
    };
    print!("{output}");
    Ok(())
}

pub fn print_status(config: &CalendarConfig, clock: &ClockSnapshot, args: StatusArgs) -> Result<()> {
    let snapshot = load_snapshot(&args.snapshot)?;
    let (year, month) = match &args.month {
        Some(raw) => DayKey::parse_month(raw)?,
        None => {
            let today = clock.today().date();
            (today.year(), today.month())
        }
    };
    let tag = args.tag.as_deref();
    let records = filter_by_tag(&snapshot.records, tag);
    let todos = filter_by_tag(&snapshot.todos, tag);
    let index = DayStatusIndex::build(&records, &todos, clock);

    let output = format_month(&index, year, month, config.week_start)?;
    print!("{output}");
    Ok(())
}

pub fn validate_schedule(config: &CalendarConfig, args: ValidateArgs) -> Result<()> {
    let validator = if args.strict {
        RangeValidator::new(InputPolicy::Strict)
    } else {
        config.validator()
    };
    match validator.check(
        args.start_date.as_deref(),
        args.due_date.as_deref(),
        args.start_time.as_deref(),
        args.end_time.as_deref(),
    ) {
        Ok(_) => {
            println!("valid");
            Ok(())
        }
        Err(err) => bail!("invalid schedule: {err}"),
    }
}

fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = if path.as_os_str() == "-" {
        read_stdin()?
    } else {
        fs::read_to_string(path).with_context(|| format!("reading snapshot {}", path.display()))?
    };
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing snapshot {}", path.display()))?;
    tracing::debug!(
        records = snapshot.records.len(),
        todos = snapshot.todos.len(),
        "loaded snapshot"
    );
    Ok(snapshot)
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("reading snapshot from stdin")?;
    Ok(buffer)
}

fn format_days<T: Dated>(buckets: &[DayBucket<'_, T>], describe: impl Fn(&T) -> String) -> String {
    if buckets.is_empty() {
        return "Nothing on the calendar.\n".to_string();
    }
    let mut out = String::new();
    for bucket in buckets {
        let _ = writeln!(&mut out, "{}  ({})", bucket.day, bucket.len());
        for item in &bucket.items {
            let _ = writeln!(&mut out, "  {}", describe(item));
        }
    }
    out
}

fn describe_record(record: &StudyRecord) -> String {
    format!("#{}  {}{}", record.id, record.title, format_tags(&record.tags))
}

fn describe_todo(todo: &TodoItem) -> String {
    let check = if todo.completed { 'x' } else { ' ' };
    let span = match (todo.start_time, todo.end_time) {
        (Some(start), Some(end)) => format!(
            "  {:02}:{:02}-{:02}:{:02}",
            start.hour(),
            start.minute(),
            end.hour(),
            end.minute()
        ),
        (Some(start), None) => format!("  from {:02}:{:02}", start.hour(), start.minute()),
        (None, Some(end)) => format!("  until {:02}:{:02}", end.hour(), end.minute()),
        (None, None) => String::new(),
    };
    format!(
        "[{check}] #{}  {}{span}{}",
        todo.id,
        todo.title,
        format_tags(&todo.tags)
    )
}

fn format_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!("  [{}]", tags.join(", "))
    }
}

fn format_month(
    index: &DayStatusIndex,
    year: i32,
    month: Month,
    week_start: WeekStart,
) -> Result<String> {
    let weeks = month_weeks(year, month, week_start)?;
    let mut out = String::new();
    let _ = writeln!(&mut out, "{month} {year}");
    let header: String = week_start
        .headers()
        .iter()
        .map(|name| format!("{name:>2}  "))
        .collect();
    let _ = writeln!(&mut out, "{}", header.trim_end());
    for week in &weeks {
        let row: String = week
            .iter()
            .map(|cell| match cell {
                Some(day) => format!("{:>2}{} ", day.date().day(), glyph(&index.status(*day))),
                None => "    ".to_string(),
            })
            .collect();
        let _ = writeln!(&mut out, "{}", row.trim_end());
    }

    let (Some(first), Some(last)) = (
        weeks.first().and_then(|week| week.iter().flatten().next()),
        weeks.last().and_then(|week| week.iter().flatten().last()),
    ) else {
        return Ok(out);
    };
    let marked = index.marked_between(*first, *last);
    if !marked.is_empty() {
        out.push('\n');
    }
    for (day, status) in marked {
        let _ = writeln!(&mut out, "{day}  {}", marker_labels(status.markers()).join(", "));
    }
    Ok(out)
}

fn glyph(status: &DayStatus) -> char {
    let markers = status.markers();
    if markers.contains(DayMarkers::OVERDUE) {
        '!'
    } else if markers.contains(DayMarkers::ALL_COMPLETED) {
        '+'
    } else if markers.contains(DayMarkers::TODO_DUE) {
        'o'
    } else if markers.contains(DayMarkers::RECORD) {
        '*'
    } else {
        ' '
    }
}

fn marker_labels(markers: DayMarkers) -> Vec<&'static str> {
    [
        (DayMarkers::RECORD, "record"),
        (DayMarkers::TODO_DUE, "due"),
        (DayMarkers::OVERDUE, "overdue"),
        (DayMarkers::ALL_COMPLETED, "done"),
    ]
    .into_iter()
    .filter(|(flag, _)| markers.contains(*flag))
    .map(|(_, label)| label)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::LocalZone;
    use insta::assert_snapshot;
    use time::macros::{date, datetime, time};

    fn clock() -> ClockSnapshot {
        ClockSnapshot::at(datetime!(2024-01-10 12:00 UTC), LocalZone::UTC)
    }

    fn record(id: i64, title: &str, at: time::OffsetDateTime, tags: &[&str]) -> StudyRecord {
        StudyRecord {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            created_at: at,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
        }
    }

    fn todo(id: i64, due: time::Date, completed: bool) -> TodoItem {
        let mut item = TodoItem::new(id, format!("todo {id}"), Some(due));
        item.completed = completed;
        item
    }

    #[test]
    fn days_output_lists_most_recent_day_first() {
        let records = vec![
            record(1, "Sets", datetime!(2024-01-01 09:00 UTC), &["math", "logic"]),
            record(2, "Graphs", datetime!(2024-01-03 10:00 UTC), &["math"]),
            record(3, "Proofs", datetime!(2024-01-03 18:00 UTC), &[]),
        ];
        let buckets = group_by_day(&records, None, &clock());
        let output = format_days(&buckets, |record: &StudyRecord| describe_record(record));
        assert_snapshot!(output.trim_end(), @r"
        2024-01-03  (2)
          #2  Graphs  [math]
          #3  Proofs
        2024-01-01  (1)
          #1  Sets  [math, logic]
        ");
    }

    #[test]
    fn todo_lines_show_completion_and_times() {
        let mut item = todo(9, date!(2024 - 01 - 11), true);
        item.start_time = Some(time!(9:00));
        item.end_time = Some(time!(10:30));
        item.tags = vec!["exam".into()];
        assert_eq!(describe_todo(&item), "[x] #9  todo 9  09:00-10:30  [exam]");

        let open = todo(10, date!(2024 - 01 - 11), false);
        assert_eq!(describe_todo(&open), "[ ] #10  todo 10");
    }

    #[test]
    fn empty_days_output_says_so() {
        let records: Vec<StudyRecord> = Vec::new();
        let buckets = group_by_day(&records, Some(5), &clock());
        let output = format_days(&buckets, |record: &StudyRecord| describe_record(record));
        assert_eq!(output, "Nothing on the calendar.\n");
    }

    #[test]
    fn month_output_marks_each_day() -> anyhow::Result<()> {
        let records = vec![record(1, "Sets", datetime!(2024-01-03 09:00 UTC), &[])];
        let todos = vec![
            todo(1, date!(2024 - 01 - 09), false),
            todo(2, date!(2024 - 01 - 15), true),
            todo(3, date!(2024 - 01 - 20), false),
        ];
        let index = DayStatusIndex::build(&records, &todos, &clock());
        let output = format_month(&index, 2024, Month::January, WeekStart::Monday)?;
        let expected = [
            "January 2024",
            "Mo  Tu  We  Th  Fr  Sa  Su",
            " 1   2   3*  4   5   6   7",
            " 8   9! 10  11  12  13  14",
            "15+ 16  17  18  19  20o 21",
            "22  23  24  25  26  27  28",
            "29  30  31",
            "",
            "2024-01-03  record",
            "2024-01-09  due, overdue",
            "2024-01-15  due, done",
            "2024-01-20  due",
        ];
        assert_eq!(output, format!("{}\n", expected.join("\n")));
        Ok(())
    }

    #[test]
    fn sunday_weeks_shift_the_grid() -> anyhow::Result<()> {
        let records: Vec<StudyRecord> = Vec::new();
        let todos: Vec<TodoItem> = Vec::new();
        let index = DayStatusIndex::build(&records, &todos, &clock());
        let output = format_month(&index, 2024, Month::September, WeekStart::Sunday)?;
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[1], "Su  Mo  Tu  We  Th  Fr  Sa");
        // 2024-09-01 is a Sunday
        assert!(lines[2].starts_with(" 1   2   3"));
        assert_eq!(lines.len(), 7);
        Ok(())
    }

    #[test]
    fn marker_labels_follow_flag_order() {
        assert_eq!(
            marker_labels(DayMarkers::OVERDUE | DayMarkers::RECORD),
            vec!["record", "overdue"]
        );
        assert!(marker_labels(DayMarkers::empty()).is_empty());
    }

    #[test]
    fn load_snapshot_reports_the_file() {
        let err = load_snapshot(Path::new("/definitely/missing.json")).expect_err("missing file");
        assert!(format!("{err:#}").contains("/definitely/missing.json"));
    }
}
