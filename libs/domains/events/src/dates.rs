//! Flexible date input.
//!
//! Accepts RFC 3339 timestamps, unix seconds and a fixed list of naive formats.
//! Naive values are read as UTC. Results are truncated to milliseconds, the
//! precision MongoDB stores.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{EventError, EventResult};

/// How a naive format is completed before parsing.
#[derive(Debug, Clone, Copy)]
enum Layout {
    Full(&'static str),
    /// Hour only; a `:00` minute is appended and `:%M` added to the pattern
    Hour(&'static str),
    Date(&'static str),
}

/// Tried in order; the first full match wins.
const FORMATS: [Layout; 8] = [
    Layout::Full("%Y-%m-%dT%H:%M:%S%.f"),
    Layout::Full("%Y-%m-%d %H:%M:%S"),
    Layout::Full("%Y-%m-%d %H:%M"),
    Layout::Hour("%Y-%m-%d %H"),
    Layout::Date("%Y-%m-%d"),
    Layout::Full("%Y/%m/%d %H:%M"),
    Layout::Hour("%Y/%m/%d %H"),
    Layout::Date("%Y/%m/%d"),
];

impl Layout {
    fn parse(self, input: &str) -> Option<NaiveDateTime> {
        match self {
            Layout::Full(fmt) => NaiveDateTime::parse_from_str(input, fmt).ok(),
            Layout::Hour(fmt) => {
                NaiveDateTime::parse_from_str(&format!("{input}:00"), &format!("{fmt}:%M")).ok()
            }
            Layout::Date(fmt) => NaiveDate::parse_from_str(input, fmt)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0)),
        }
    }
}

fn from_unix(seconds: i64) -> EventResult<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| EventError::Validation(format!("timestamp {seconds} is out of range")))
}

/// Parse a textual date into a UTC timestamp, truncated to milliseconds.
pub fn parse_datetime(input: &str) -> EventResult<DateTime<Utc>> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).trunc_subsecs(3));
    }

    if let Ok(seconds) = trimmed.parse::<i64>() {
        return from_unix(seconds);
    }

    FORMATS
        .iter()
        .find_map(|layout| layout.parse(trimmed))
        .map(|naive| naive.and_utc().trunc_subsecs(3))
        .ok_or_else(|| EventError::Validation(format!("unrecognised date format: '{trimmed}'")))
}

/// Canonical wire form: RFC 3339, `Z` suffix, fractional seconds only when present.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// A date as supplied by a client: unix seconds or text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
#[schema(example = "2025-02-10 21:30")]
pub enum DateInput {
    Unix(i64),
    Text(String),
}

impl DateInput {
    pub fn normalize(&self) -> EventResult<DateTime<Utc>> {
        match self {
            DateInput::Unix(seconds) => from_unix(*seconds),
            DateInput::Text(text) => parse_datetime(text),
        }
    }
}

impl From<&str> for DateInput {
    fn from(value: &str) -> Self {
        DateInput::Text(value.to_string())
    }
}

impl From<String> for DateInput {
    fn from(value: String) -> Self {
        DateInput::Text(value)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(value: DateTime<Utc>) -> Self {
        DateInput::Text(format_datetime(&value))
    }
}
