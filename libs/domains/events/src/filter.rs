//! Store-agnostic predicates and mutations.
//!
//! The service builds these; each repository translates them (BSON for MongoDB,
//! [`EventFilter::matches`] / [`EventMutation::apply`] in memory).

use chrono::{DateTime, Utc};

use crate::models::{Event, merge_tags};

/// Comparison against a timestamp field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lte(DateTime<Utc>),
    Gte(DateTime<Utc>),
}

impl Bound {
    fn holds(self, value: DateTime<Utc>) -> bool {
        match self {
            Bound::Lte(limit) => value <= limit,
            Bound::Gte(limit) => value >= limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventFilter {
    All,
    Start(Bound),
    /// Only matches events that have a `stop`
    Stop(Bound),
    StopAbsent,
    /// Tag sets intersect
    TagsAny(Vec<String>),
    And(Vec<EventFilter>),
    Or(Vec<EventFilter>),
}

impl EventFilter {
    /// `start <= now` and (`stop` absent or `stop >= now`).
    pub fn running_at(now: DateTime<Utc>) -> Self {
        EventFilter::And(vec![
            EventFilter::Start(Bound::Lte(now)),
            EventFilter::Or(vec![
                EventFilter::StopAbsent,
                EventFilter::Stop(Bound::Gte(now)),
            ]),
        ])
    }

    /// `stop <= now`; open-ended events never match.
    pub fn stopped_by(now: DateTime<Utc>) -> Self {
        EventFilter::Stop(Bound::Lte(now))
    }

    pub fn tags_any<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        EventFilter::TagsAny(tags.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Start(bound) => bound.holds(event.start),
            EventFilter::Stop(bound) => event.stop.is_some_and(|stop| bound.holds(stop)),
            EventFilter::StopAbsent => event.stop.is_none(),
            EventFilter::TagsAny(tags) => event.tags.iter().any(|t| tags.contains(t)),
            EventFilter::And(parts) => parts.iter().all(|f| f.matches(event)),
            EventFilter::Or(parts) => parts.iter().any(|f| f.matches(event)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventMutation {
    ReplaceTags(Vec<String>),
    /// Set union, existing order kept
    AddTags(Vec<String>),
    SetDatetime {
        start: DateTime<Utc>,
        stop: Option<DateTime<Utc>>,
    },
}

impl EventMutation {
    /// Applies the mutation; returns whether any stored value changed.
    pub fn apply(&self, event: &mut Event) -> bool {
        match self {
            EventMutation::ReplaceTags(tags) => replace(&mut event.tags, tags.clone()),
            EventMutation::AddTags(tags) => {
                let merged = merge_tags(&event.tags, tags);
                replace(&mut event.tags, merged)
            }
            EventMutation::SetDatetime { start, stop } => {
                let start_changed = replace(&mut event.start, *start);
                let stop_changed = replace(&mut event.stop, *stop);
                start_changed || stop_changed
            }
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, h, 0, 0).unwrap()
    }

    fn event(start: u32, stop: Option<u32>, tags: &[&str]) -> Event {
        Event {
            id: "e".into(),
            start: at(start),
            stop: stop.map(at),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_running_filter() {
        let now = at(12);
        let filter = EventFilter::running_at(now);

        assert!(filter.matches(&event(10, None, &[])));
        assert!(filter.matches(&event(10, Some(12), &[])));
        assert!(filter.matches(&event(12, Some(14), &[])));
        assert!(!filter.matches(&event(10, Some(11), &[])));
        assert!(!filter.matches(&event(13, None, &[])));
    }

    #[test]
    fn test_stopped_by_ignores_open_events() {
        let filter = EventFilter::stopped_by(at(12));
        assert!(filter.matches(&event(8, Some(12), &[])));
        assert!(!filter.matches(&event(8, Some(13), &[])));
        assert!(!filter.matches(&event(8, None, &[])));
    }

    #[test]
    fn test_tags_any() {
        let filter = EventFilter::tags_any(["cloud", "db"]);
        assert!(filter.matches(&event(1, None, &["db"])));
        assert!(filter.matches(&event(1, None, &["web", "cloud"])));
        assert!(!filter.matches(&event(1, None, &["web"])));
        assert!(!filter.matches(&event(1, None, &[])));
    }

    #[test]
    fn test_add_tags_reports_change() {
        let mut e = event(1, None, &["a"]);
        let add = EventMutation::AddTags(vec!["b".into(), "a".into()]);
        assert!(add.apply(&mut e));
        assert_eq!(e.tags, vec!["a", "b"]);
        assert!(!add.apply(&mut e));
    }

    #[test]
    fn test_replace_tags() {
        let mut e = event(1, None, &["a", "z"]);
        assert!(EventMutation::ReplaceTags(vec!["a".into(), "b".into()]).apply(&mut e));
        assert_eq!(e.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_set_datetime_unchanged_is_not_modified() {
        let mut e = event(1, Some(2), &[]);
        let same = EventMutation::SetDatetime {
            start: at(1),
            stop: Some(at(2)),
        };
        assert!(!same.apply(&mut e));

        let clear_stop = EventMutation::SetDatetime {
            start: at(1),
            stop: None,
        };
        assert!(clear_stop.apply(&mut e));
        assert_eq!(e.stop, None);
    }
}
