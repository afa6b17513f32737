//! World clock: the current time at a fixed UTC offset.

use chrono::{DateTime, FixedOffset, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ClockError {
    #[error("invalid UTC offset '{0}'")]
    InvalidOffset(String),

    #[error("UTC offset {0} hours is out of range")]
    OutOfRange(f64),
}

/// Selectable offsets, in hours, with a representative city.
pub const TIMEZONES: &[(f64, &str)] = &[
    (-12.0, "Baker Island"),
    (-10.0, "Honolulu"),
    (-8.0, "Los Angeles"),
    (-7.0, "Denver"),
    (-6.0, "Chicago"),
    (-5.0, "New York"),
    (-3.5, "St. John's"),
    (-3.0, "São Paulo"),
    (0.0, "UTC"),
    (1.0, "Paris"),
    (2.0, "Cairo"),
    (3.0, "Moscow"),
    (4.0, "Dubai"),
    (5.5, "Mumbai"),
    (7.0, "Bangkok"),
    (8.0, "Beijing"),
    (9.0, "Tokyo"),
    (10.0, "Sydney"),
    (12.0, "Auckland"),
];

/// A rendered clock face.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    /// `HH:MM:SS`
    pub time: String,
    /// `Fri Oct 16 2026`
    pub date: String,
}

/// Parse an offset in hours, e.g. `"8"`, `"-3.5"`, `"+5.5"`.
pub fn parse_offset(value: &str) -> Result<f64, ClockError> {
    let trimmed = value.trim();
    let offset: f64 = trimmed
        .strip_prefix('+')
        .unwrap_or(trimmed)
        .parse()
        .map_err(|_| ClockError::InvalidOffset(value.to_string()))?;

    if !offset.is_finite() {
        return Err(ClockError::InvalidOffset(value.to_string()));
    }
    Ok(offset)
}

fn fixed_offset(offset_hours: f64) -> Result<FixedOffset, ClockError> {
    let seconds = (offset_hours * 3600.0).round();
    if !seconds.is_finite() || seconds.abs() >= 86_400.0 {
        return Err(ClockError::OutOfRange(offset_hours));
    }
    FixedOffset::east_opt(seconds as i32).ok_or(ClockError::OutOfRange(offset_hours))
}

/// Render `now` as seen at `offset_hours` east of UTC.
pub fn render(now: DateTime<Utc>, offset_hours: f64) -> Result<ClockReading, ClockError> {
    let local = now.with_timezone(&fixed_offset(offset_hours)?);
    Ok(ClockReading {
        time: local.format("%H:%M:%S").to_string(),
        date: local.format("%a %b %d %Y").to_string(),
    })
}

/// Render the current time at `offset_hours`.
pub fn render_now(offset_hours: f64) -> Result<ClockReading, ClockError> {
    render(Utc::now(), offset_hours)
}

/// Label for an offset, e.g. `UTC+05:30`.
pub fn offset_label(offset_hours: f64) -> String {
    let total_minutes = (offset_hours * 60.0).round() as i64;
    let sign = if total_minutes < 0 { '-' } else { '+' };
    let minutes = total_minutes.unsigned_abs();
    format!("UTC{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}
