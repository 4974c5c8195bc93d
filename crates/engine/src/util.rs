//! Internal helpers for input validation and month arithmetic.
//!
//! These utilities are **not** part of the public API, except `parse_month`
//! which the HTTP layer uses for path parameters.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{EngineError, ResultEngine};

pub(crate) const MAX_NOTE_CHARS: usize = 500;

pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim a note, turning blank input into `None`.
pub(crate) fn normalize_note(value: Option<&str>) -> ResultEngine<Option<String>> {
    let note = value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string);
    if let Some(note) = &note
        && note.chars().count() > MAX_NOTE_CHARS
    {
        return Err(EngineError::Validation(format!(
            "note must be at most {MAX_NOTE_CHARS} characters"
        )));
    }
    Ok(note)
}

/// Case and accent insensitive key used to detect duplicate names.
///
/// `"Café  Bar"`, `"cafe-bar"` and `"CAFE BAR"` all map to `"cafe bar"`.
pub(crate) fn normalize_key(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_space = false;
    for c in value.nfkd().filter(|c| !is_combining_mark(*c)) {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(c.to_lowercase());
        } else {
            pending_space = true;
        }
    }
    out
}

/// Parse `YYYY-MM` or `YYYY-MM-DD`, flooring to the first day of the month.
pub fn parse_month(value: &str) -> ResultEngine<NaiveDate> {
    let value = value.trim();
    let invalid = || EngineError::Validation(format!("invalid month: {value}"));

    let date = match value.len() {
        7 => NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d"),
        10 => NaiveDate::parse_from_str(value, "%Y-%m-%d"),
        _ => return Err(invalid()),
    }
    .map_err(|_| invalid())?;

    month_floor(date).ok_or_else(invalid)
}

pub(crate) fn month_floor(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)
}

/// `[start, next_month_start)` of the month beginning at `month`, in UTC.
pub(crate) fn month_bounds(month: NaiveDate) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
    let out_of_range = || EngineError::Validation(format!("month out of range: {month}"));

    let (year, next) = if month.month() == 12 {
        (month.year() + 1, 1)
    } else {
        (month.year(), month.month() + 1)
    };
    let next_month = NaiveDate::from_ymd_opt(year, next, 1).ok_or_else(out_of_range)?;

    let start = month.and_hms_opt(0, 0, 0).ok_or_else(out_of_range)?.and_utc();
    let end = next_month
        .and_hms_opt(0, 0, 0)
        .ok_or_else(out_of_range)?
        .and_utc();
    Ok((start, end))
}
