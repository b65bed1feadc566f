//! Day-heading classification shared by the calendar adapters.

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use fotd_core::{CalendarDate, DayLabel};
use regex::Regex;

static WEEKDAY_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b[\s,]*(\d{1,2})/(\d{1,2})\b",
    )
    .expect("valid regex")
});

static WEEKDAY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b")
        .expect("valid regex")
});

/// Classify a day heading, in priority order:
///
/// 1. contains "today" → `today`;
/// 2. contains "tomorrow" → `today + 1`;
/// 3. matches `Weekday M/D` → that date in `today`'s year, labelled by weekday.
///
/// Returns `None` for headings that are not day headings.
pub(super) fn classify_day_heading(
    heading: &str,
    today: NaiveDate,
) -> Option<(CalendarDate, DayLabel)> {
    let lowered = heading.to_lowercase();
    if lowered.contains("today") {
        return Some((CalendarDate::Resolved(today), DayLabel::Today));
    }
    if lowered.contains("tomorrow") {
        let date = today.checked_add_days(Days::new(1))?;
        return Some((CalendarDate::Resolved(date), DayLabel::Tomorrow));
    }

    let caps = WEEKDAY_DATE.captures(heading)?;
    let weekday = caps[1].parse::<Weekday>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    let day = caps[3].parse::<u32>().ok()?;
    let date = NaiveDate::from_ymd_opt(today.year(), month, day)
        .map_or_else(|| CalendarDate::label(heading), CalendarDate::Resolved);
    Some((date, DayLabel::Weekday(weekday)))
}

/// Like [`classify_day_heading`], but a bare weekday name is also accepted
/// and keeps the raw heading as its date.
pub(super) fn classify_day_label(
    heading: &str,
    today: NaiveDate,
) -> Option<(CalendarDate, DayLabel)> {
    if let Some(found) = classify_day_heading(heading, today) {
        return Some(found);
    }
    let caps = WEEKDAY_NAME.captures(heading)?;
    let weekday = caps[1].parse::<Weekday>().ok()?;
    Some((
        CalendarDate::label(heading),
        DayLabel::Weekday(weekday),
    ))
}
