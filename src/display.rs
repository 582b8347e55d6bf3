//! Date parsing, formatting and table output for the command line.

use chrono::{Datelike, Duration, Local, NaiveDate};

use crate::fields::{Locale, Status};
use crate::task::{EnhancedTask, TaskId};

/// Parse human-readable date input.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - weekday names, optionally prefixed with "this" or "next"
/// - "end of week" / "eow", "end of month" / "eom"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD"
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    parse_date_relative(s, Local::now().date_naive())
}

/// [`parse_date_input`] against an explicit `today`.
pub fn parse_date_relative(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return today.succ_opt(),
        "yesterday" => return today.pred_opt(),
        "end of week" | "eow" => return Some(start_end_of_week(today).1),
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            return NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt();
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        let (amount, unit_days) = if let Some(n) = rest.strip_suffix('d') {
            (n, 1)
        } else if let Some(n) = rest.strip_suffix('w') {
            (n, 7)
        } else if let Some(n) = rest.strip_suffix('m') {
            // Approximate: 30 days per month
            (n, 30)
        } else {
            return None;
        };
        let amount: i64 = amount.trim().parse().ok()?;
        let offset = Duration::try_days(amount.checked_mul(unit_days)?)?;
        return today.checked_add_signed(offset);
    }

    let (bare, skip_week) = if let Some(day) = s.strip_prefix("next ") {
        (day, true)
    } else if let Some(day) = s.strip_prefix("this ") {
        (day, false)
    } else {
        (s.as_str(), false)
    };
    if let Some(target) = weekday_index(bare) {
        let current = today.weekday().num_days_from_monday() as i64;
        let ahead = (target + 7 - current) % 7;
        let ahead = if skip_week { ahead + 7 } else { ahead };
        return today.checked_add_signed(Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

fn weekday_index(name: &str) -> Option<i64> {
    const DAYS: [(&str, &str); 7] = [
        ("monday", "mon"),
        ("tuesday", "tue"),
        ("wednesday", "wed"),
        ("thursday", "thu"),
        ("friday", "fri"),
        ("saturday", "sat"),
        ("sunday", "sun"),
    ];
    DAYS.iter()
        .position(|(long, short)| name == *long || name == *short)
        .map(|i| i as i64)
}

/// Start and end dates of the ISO week (Monday to Sunday) holding `day`.
pub fn start_end_of_week(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day - Duration::days(day.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// Format a date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_relative(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "today".into(),
        1 => "tomorrow".into(),
        n if n > 1 => format!("in {n}d"),
        n => format!("{}d late", -n),
    }
}

/// Long-form date: "May 26, 2024" or "26 mai 2024".
pub fn format_long_date(date: NaiveDate, locale: Locale) -> String {
    match locale {
        Locale::En => date.format("%B %-d, %Y").to_string(),
        Locale::Fr => date.format_localized("%-d %B %Y", chrono::Locale::fr_FR).to_string(),
    }
}

pub fn format_checklist(task: &EnhancedTask) -> String {
    match task.checklist {
        Some(c) => format!("{}/{}", c.done, c.total),
        None => "-".into(),
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Print tasks as a table.
pub fn print_table(tasks: &[&EnhancedTask], local: impl Fn(TaskId) -> bool) {
    println!(
        "{:<14} {:<13} {:<10} {:<6} {:<9} {}",
        "ID", "Status", "Due", "Check", "Notes", "Title"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let marker = if local(t.id) { " (local)" } else { "" };
        println!(
            "{:<14} {:<13} {:<10} {:<6} {:<9} {}{}",
            t.id,
            t.status.to_string(),
            format_relative(t.end_date, today),
            format_checklist(t),
            format!("{}c {}a", t.comments, t.attachments),
            truncate(&t.title, 60),
            marker
        );
    }
}

/// Print one status column heading.
pub fn print_group_heading(status: Status, count: usize) {
    println!();
    println!("== {status} ({count})");
}

/// Resolve a task identifier (either ID or title) to a task ID.
/// Returns an error if the title has multiple matches and suggests using the ID instead.
pub fn resolve_task_identifier(identifier: &str, tasks: &[EnhancedTask]) -> Result<TaskId, String> {
    if let Ok(id) = identifier.parse::<TaskId>() {
        if tasks.iter().any(|t| t.id == id) {
            return Ok(id);
        }
        return Err(format!("Task with ID {id} not found"));
    }

    let wanted = identifier.to_lowercase();
    let matches: Vec<&EnhancedTask> = tasks.iter().filter(|t| t.title.to_lowercase() == wanted).collect();
    match matches.as_slice() {
        [] => Err(format!("No task found with title '{identifier}'")),
        [only] => Ok(only.id),
        many => {
            let mut msg = format!("Multiple tasks found with title '{identifier}':\n");
            for t in many {
                msg.push_str(&format!("  ID {}: {} ({})\n", t.id, t.title, t.status));
            }
            msg.push_str("Please use the specific ID instead.");
            Err(msg)
        }
    }
}
