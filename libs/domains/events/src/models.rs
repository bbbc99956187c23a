//! Event entity and request shapes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::dates::DateInput;
use crate::error::{EventError, EventResult};

pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;
pub const MAX_TAG_LENGTH: usize = 100;
/// Largest `skip` MongoDB accepts (`i64::MAX`)
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// A tagged time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    /// Store-assigned identifier (24-hex ObjectId for MongoDB)
    #[schema(example = "6631c5d82fda6e60f14e2a3a")]
    pub id: String,

    pub start: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<DateTime<Utc>>,

    #[serde(default)]
    #[schema(example = json!(["database", "cloud"]))]
    pub tags: Vec<String>,
}

/// Where an event sits relative to a given instant; derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventState {
    Future,
    Ongoing,
    Stopped,
}

impl Event {
    pub fn state_at(&self, now: DateTime<Utc>) -> EventState {
        if self.start > now {
            EventState::Future
        } else {
            match self.stop {
                Some(stop) if stop <= now => EventState::Stopped,
                _ => EventState::Ongoing,
            }
        }
    }

    /// `start <= now` and `stop` absent or `>= now`.
    ///
    /// Inclusive on `stop`, unlike [`state_at`](Self::state_at) which counts `stop == now` as stopped.
    pub fn is_running_at(&self, now: DateTime<Utc>) -> bool {
        self.start <= now && self.stop.is_none_or(|stop| stop >= now)
    }
}

/// `stop`, when present, must be strictly after `start`.
pub fn validate_interval(start: DateTime<Utc>, stop: Option<DateTime<Utc>>) -> EventResult<()> {
    match stop {
        Some(stop) if stop <= start => Err(EventError::Validation(format!(
            "stop ({}) must be after start ({})",
            stop.to_rfc3339(),
            start.to_rfc3339()
        ))),
        _ => Ok(()),
    }
}

fn validate_tag_items(tags: &[String]) -> Result<(), ValidationError> {
    for tag in tags {
        let len = tag.chars().count();
        if len == 0 || len > MAX_TAG_LENGTH {
            let mut err = ValidationError::new("tag_length");
            err.message = Some("each tag must be between 1 and 100 characters".into());
            err.add_param("tag".into(), tag);
            return Err(err);
        }
    }
    Ok(())
}

/// An event ready to be stored: dates normalised, interval checked.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub start: DateTime<Utc>,
    pub stop: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl NewEvent {
    pub fn into_event(self, id: String) -> Event {
        Event {
            id,
            start: self.start,
            stop: self.stop,
            tags: self.tags,
        }
    }
}

/// Body of `POST /add_event`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateEvent {
    #[schema(value_type = DateInput, example = "2025-02-10 21:30")]
    pub start: DateInput,

    #[serde(default)]
    #[schema(value_type = Option<DateInput>, example = "2026-03-10 17:30")]
    pub stop: Option<DateInput>,

    #[validate(custom(function = "validate_tag_items"))]
    #[schema(example = json!(["database", "cloud"]))]
    pub tags: Vec<String>,
}

impl CreateEvent {
    pub fn into_new_event(self) -> EventResult<NewEvent> {
        self.validate()?;
        let (start, stop) = normalize_interval(&self.start, self.stop.as_ref())?;
        Ok(NewEvent {
            start,
            stop,
            tags: dedup_tags(&self.tags),
        })
    }
}

/// Normalise both dates and check the interval.
pub fn normalize_interval(
    start: &DateInput,
    stop: Option<&DateInput>,
) -> EventResult<(DateTime<Utc>, Option<DateTime<Utc>>)> {
    let start = start.normalize()?;
    let stop = stop.map(DateInput::normalize).transpose()?;
    validate_interval(start, stop)?;
    Ok((start, stop))
}

/// Body of `PATCH /update_event_datetime/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDatetime {
    #[schema(value_type = DateInput, example = "2025-02-10 21:30")]
    pub start: DateInput,

    #[serde(default)]
    #[schema(value_type = Option<DateInput>)]
    pub stop: Option<DateInput>,
}

/// Body of `PATCH /update_events_datetime`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateDatetimeByTags {
    #[validate(
        length(min = 1, message = "at least one tag is required"),
        custom(function = "validate_tag_items")
    )]
    pub tags: Vec<String>,

    #[schema(value_type = DateInput, example = "2025-02-10 21:30")]
    pub start: DateInput,

    #[serde(default)]
    #[schema(value_type = Option<DateInput>)]
    pub stop: Option<DateInput>,
}

/// Non-empty tag list for search and tag updates.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct TagList {
    #[validate(
        length(min = 1, message = "at least one tag is required"),
        custom(function = "validate_tag_items")
    )]
    pub tags: Vec<String>,
}

impl TagList {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
        }
    }
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// `skip` / `limit` window over a result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Number of matching events to skip
    #[serde(default)]
    #[validate(range(max = MAX_SKIP))]
    pub skip: u64,

    /// Page size, 1 to 100
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub limit: u64,
}

impl Pagination {
    pub fn new(skip: u64, limit: u64) -> EventResult<Self> {
        let page = Self { skip, limit };
        page.validate()?;
        Ok(page)
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub results: Vec<T>,
}

/// Order-preserving union: existing tags first, then new ones, no duplicates.
pub fn merge_tags(existing: &[String], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(existing.len() + extra.len());
    for tag in existing.iter().chain(extra) {
        if !merged.contains(tag) {
            merged.push(tag.clone());
        }
    }
    merged
}

/// Duplicates collapsed, first occurrence kept.
pub fn dedup_tags(tags: &[String]) -> Vec<String> {
    merge_tags(&[], tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, h, 0, 0).unwrap()
    }

    fn event(start: DateTime<Utc>, stop: Option<DateTime<Utc>>) -> Event {
        Event {
            id: "e1".into(),
            start,
            stop,
            tags: vec![],
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_state_at_boundaries() {
        let e = event(at(10), Some(at(12)));
        assert_eq!(e.state_at(at(9)), EventState::Future);
        assert_eq!(e.state_at(at(10)), EventState::Ongoing);
        assert_eq!(e.state_at(at(11)), EventState::Ongoing);
        assert_eq!(e.state_at(at(12)), EventState::Stopped);

        let open = event(at(10), None);
        assert_eq!(open.state_at(at(23)), EventState::Ongoing);
    }

    #[test]
    fn test_running_is_inclusive_on_stop() {
        let e = event(at(10), Some(at(12)));
        assert!(!e.is_running_at(at(10) - Duration::seconds(1)));
        assert!(e.is_running_at(at(10)));
        assert!(e.is_running_at(at(12)));
        assert!(!e.is_running_at(at(12) + Duration::seconds(1)));
        assert!(event(at(10), None).is_running_at(at(23)));
    }

    #[test]
    fn test_validate_interval() {
        assert!(validate_interval(at(10), None).is_ok());
        assert!(validate_interval(at(10), Some(at(11))).is_ok());
        assert!(matches!(
            validate_interval(at(10), Some(at(10))),
            Err(EventError::Validation(_))
        ));
        assert!(validate_interval(at(10), Some(at(9))).is_err());
    }

    #[test]
    fn test_create_event_normalizes_dates() {
        let create = CreateEvent {
            start: "2024-04-01 12:00:00".into(),
            stop: Some("2024/04/01 13".into()),
            tags: strings(&["db"]),
        };
        let new_event = create.into_new_event().unwrap();
        assert_eq!(new_event.start, at(12));
        assert_eq!(new_event.stop, Some(at(13)));
    }

    #[test]
    fn test_create_event_rejects_interval_below_millisecond() {
        let create = CreateEvent {
            start: "2024-04-01T12:00:00.0001".into(),
            stop: Some("2024-04-01T12:00:00.0009".into()),
            tags: vec![],
        };
        assert!(matches!(
            create.into_new_event(),
            Err(EventError::Validation(_))
        ));
    }

    #[test]
    fn test_create_event_collapses_duplicate_tags() {
        let create = CreateEvent {
            start: "2024-04-01".into(),
            stop: None,
            tags: strings(&["a", "b", "a"]),
        };
        assert_eq!(create.into_new_event().unwrap().tags, strings(&["a", "b"]));
    }

    #[test]
    fn test_create_event_allows_empty_tags() {
        let create = CreateEvent {
            start: "2024-04-01".into(),
            stop: None,
            tags: vec![],
        };
        assert!(create.into_new_event().is_ok());
    }

    #[test]
    fn test_create_event_rejects_inverted_interval() {
        let create = CreateEvent {
            start: "2024-04-01 12:00".into(),
            stop: Some("2024-04-01 11:00".into()),
            tags: vec![],
        };
        assert!(matches!(
            create.into_new_event(),
            Err(EventError::Validation(_))
        ));
    }

    #[test]
    fn test_tag_length_limits() {
        let too_long = "x".repeat(MAX_TAG_LENGTH + 1);
        assert!(TagList::new([too_long.as_str()]).validate().is_err());
        assert!(TagList::new([""]).validate().is_err());
        assert!(TagList::new(["x".repeat(MAX_TAG_LENGTH)]).validate().is_ok());
    }

    #[test]
    fn test_tag_list_must_not_be_empty() {
        assert!(TagList::default().validate().is_err());
        assert!(TagList::new(["cloud"]).validate().is_ok());
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(Pagination::new(0, 1).is_ok());
        assert!(Pagination::new(5, 100).is_ok());
        assert!(Pagination::new(0, 0).is_err());
        assert!(Pagination::new(0, 101).is_err());
    }

    #[test]
    fn test_pagination_skip_fits_store_offset() {
        assert!(Pagination::new(MAX_SKIP, 10).is_ok());
        assert!(matches!(
            Pagination::new(MAX_SKIP + 1, 10),
            Err(EventError::Validation(_))
        ));
        assert!(Pagination::new(u64::MAX, 10).is_err());
    }

    #[test]
    fn test_pagination_defaults_from_json() {
        let page: Pagination = serde_json::from_str("{}").unwrap();
        assert_eq!(page, Pagination::default());
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn test_merge_tags_keeps_order_and_dedups() {
        let merged = merge_tags(&strings(&["a", "b"]), &strings(&["c", "a", "c", "d"]));
        assert_eq!(merged, strings(&["a", "b", "c", "d"]));
        assert_eq!(dedup_tags(&strings(&["x", "x", "y"])), strings(&["x", "y"]));
    }

    #[test]
    fn test_event_wire_format() {
        let e = Event {
            id: "6631c5d82fda6e60f14e2a3a".into(),
            start: at(12),
            stop: None,
            tags: strings(&["db"]),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["start"], "2024-04-01T12:00:00Z");
        assert!(json.get("stop").is_none());
        assert_eq!(json["tags"][0], "db");
    }
}
