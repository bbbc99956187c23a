//! Event Service - Business logic layer

use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::clock::{Clock, SystemClock};
use crate::error::{EventError, EventResult};
use crate::filter::{EventFilter, EventMutation};
use crate::models::{
    CreateEvent, Event, EventState, Page, Pagination, TagList, UpdateDatetime,
    UpdateDatetimeByTags, dedup_tags, normalize_interval,
};
use crate::repository::EventRepository;
use crate::summary::{BulkUpdateSummary, DeleteAllSummary, DeleteOutcome};

/// Event service providing lifecycle and query operations
///
/// Normalises and validates input, evaluates event state against the injected
/// clock and drives the repository through store-agnostic filters.
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: EventRepository> Clone for EventService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<R: EventRepository> EventService<R> {
    /// Create a new EventService reading the system clock
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: R, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository: Arc::new(repository),
            clock,
        }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let new_event = input.into_new_event()?;
        let event = self.repository.insert(new_event).await?;

        info!(event_id = %event.id, "Event created");
        Ok(event)
    }

    #[instrument(skip(self))]
    pub async fn get_one(&self, id: &str) -> EventResult<Event> {
        self.repository
            .find_one(id)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))
    }

    #[instrument(skip(self))]
    pub async fn list_all(&self, page: Pagination) -> EventResult<Page<Event>> {
        self.page(&EventFilter::All, page).await
    }

    /// Events whose interval contains the current instant, `stop` inclusive
    #[instrument(skip(self))]
    pub async fn list_running(&self, page: Pagination) -> EventResult<Page<Event>> {
        let filter = EventFilter::running_at(self.clock.now());
        self.page(&filter, page).await
    }

    /// Events sharing at least one tag; an empty result is an error
    #[instrument(skip(self, tags), fields(tags = ?tags.tags))]
    pub async fn search_by_tags(&self, tags: TagList, page: Pagination) -> EventResult<Page<Event>> {
        tags.validate()?;
        let result = self.page(&EventFilter::TagsAny(tags.tags.clone()), page).await?;
        if result.total == 0 {
            return Err(EventError::NoTagMatches(tags.tags));
        }
        Ok(result)
    }

    async fn page(&self, filter: &EventFilter, page: Pagination) -> EventResult<Page<Event>> {
        page.validate()?;
        let total = self.repository.count(filter).await?;
        let results = self.repository.find(filter, page.skip, page.limit).await?;
        Ok(Page {
            total,
            skip: page.skip,
            limit: page.limit,
            results,
        })
    }

    /// Delete one event; ongoing and future events need `force`
    #[instrument(skip(self))]
    pub async fn delete_one(&self, id: &str, force: bool) -> EventResult<DeleteOutcome> {
        let event = self.get_one(id).await?;
        let state = event.state_at(self.clock.now());

        if !force && state != EventState::Stopped {
            warn!(event_id = %id, %state, "Refusing to delete event without force");
            return Ok(DeleteOutcome::new(event.id, false, state));
        }

        if !self.repository.delete_one(id).await? {
            return Err(EventError::NotFound(id.to_string()));
        }

        info!(event_id = %id, %state, force, "Event deleted");
        Ok(DeleteOutcome::new(event.id, true, state))
    }

    /// Delete everything with `force`, otherwise only events with `stop <= now`
    #[instrument(skip(self))]
    pub async fn delete_all(&self, force: bool) -> EventResult<DeleteAllSummary> {
        let total = self.repository.count(&EventFilter::All).await?;
        let filter = if force {
            EventFilter::All
        } else {
            EventFilter::stopped_by(self.clock.now())
        };
        let deleted = self.repository.delete_many(&filter).await?;

        let summary = DeleteAllSummary::new(total, deleted);
        if deleted == 0 && total > 0 {
            warn!(total, "No stopped events to delete");
        } else {
            info!(total, deleted, status = %summary.status, "Bulk delete finished");
        }
        Ok(summary)
    }

    /// Replace the tag set, or merge into it when `replace` is false
    #[instrument(skip(self, tags), fields(tags = ?tags.tags))]
    pub async fn update_tags(&self, id: &str, tags: TagList, replace: bool) -> EventResult<Event> {
        tags.validate()?;
        let tags = dedup_tags(&tags.tags);
        let mutation = if replace {
            EventMutation::ReplaceTags(tags)
        } else {
            EventMutation::AddTags(tags)
        };

        let event = self
            .repository
            .update_one(id, &mutation)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        info!(event_id = %id, replace, "Event tags updated");
        Ok(event)
    }

    #[instrument(skip(self, input))]
    pub async fn update_datetime(&self, id: &str, input: UpdateDatetime) -> EventResult<Event> {
        let (start, stop) = normalize_interval(&input.start, input.stop.as_ref())?;
        let mutation = EventMutation::SetDatetime { start, stop };

        let event = self
            .repository
            .update_one(id, &mutation)
            .await?
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        info!(event_id = %id, "Event datetime updated");
        Ok(event)
    }

    /// Set `(start, stop)` on every event sharing a tag with `input.tags`
    #[instrument(skip(self, input), fields(tags = ?input.tags))]
    pub async fn update_datetime_by_tags(
        &self,
        input: UpdateDatetimeByTags,
    ) -> EventResult<BulkUpdateSummary> {
        input.validate()?;
        let (start, stop) = normalize_interval(&input.start, input.stop.as_ref())?;

        let counts = self
            .repository
            .update_many(
                &EventFilter::TagsAny(input.tags),
                &EventMutation::SetDatetime { start, stop },
            )
            .await?;

        let summary = BulkUpdateSummary::new(counts.modified, counts.matched);
        info!(
            matched = counts.matched,
            updated = counts.modified,
            "Bulk datetime update finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::filter::Bound;
    use crate::models::NewEvent;
    use crate::repository::{MockEventRepository, UpdateCounts};
    use chrono::{DateTime, TimeZone, Utc};

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, h, 0, 0).unwrap()
    }

    fn service(mock: MockEventRepository) -> EventService<MockEventRepository> {
        EventService::with_clock(mock, Arc::new(FixedClock::new(at(12))))
    }

    fn stored(id: &str, start: u32, stop: Option<u32>) -> Event {
        Event {
            id: id.into(),
            start: at(start),
            stop: stop.map(at),
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn test_persistence_error_propagates_from_insert() {
        let mut mock = MockEventRepository::new();
        mock.expect_insert()
            .returning(|_: NewEvent| Err(EventError::Persistence("connection refused".into())));

        let err = service(mock)
            .create(CreateEvent {
                start: "2024-04-01".into(),
                stop: None,
                tags: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_invalid_interval_never_reaches_repository() {
        let mut mock = MockEventRepository::new();
        mock.expect_insert().never();

        let err = service(mock)
            .create(CreateEvent {
                start: "2024-04-01 12:00".into(),
                stop: Some("2024-04-01 12:00".into()),
                tags: vec![],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_refuses_ongoing_without_force() {
        let mut mock = MockEventRepository::new();
        mock.expect_find_one()
            .returning(|_| Ok(Some(stored("e1", 10, Some(14)))));
        mock.expect_delete_one().never();

        let outcome = service(mock).delete_one("e1", false).await.unwrap();
        assert!(!outcome.deleted);
        assert_eq!(outcome.state, EventState::Ongoing);
    }

    #[tokio::test]
    async fn test_delete_stopped_event() {
        let mut mock = MockEventRepository::new();
        mock.expect_find_one()
            .returning(|_| Ok(Some(stored("e1", 8, Some(12)))));
        mock.expect_delete_one().times(1).returning(|_| Ok(true));

        let outcome = service(mock).delete_one("e1", false).await.unwrap();
        assert!(outcome.deleted);
        assert_eq!(outcome.state, EventState::Stopped);
    }

    #[tokio::test]
    async fn test_delete_all_uses_stopped_filter() {
        let mut mock = MockEventRepository::new();
        mock.expect_count().returning(|_| Ok(2));
        mock.expect_delete_many()
            .withf(|filter| matches!(filter, EventFilter::Stop(Bound::Lte(t)) if *t == at(12)))
            .returning(|_| Ok(1));

        let summary = service(mock).delete_all(false).await.unwrap();
        assert_eq!((summary.total, summary.deleted), (2, 1));
    }

    #[tokio::test]
    async fn test_search_count_failure_is_persistence_error() {
        let mut mock = MockEventRepository::new();
        mock.expect_count()
            .returning(|_| Err(EventError::Persistence("timeout".into())));
        mock.expect_find().never();

        let err = service(mock)
            .search_by_tags(TagList::new(["x"]), Pagination::default())
            .await
            .unwrap_err();
        assert!(matches!(err, EventError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_bulk_update_reports_counts() {
        let mut mock = MockEventRepository::new();
        mock.expect_update_many().returning(|_, _| {
            Ok(UpdateCounts {
                matched: 2,
                modified: 1,
            })
        });

        let summary = service(mock)
            .update_datetime_by_tags(UpdateDatetimeByTags {
                tags: vec!["x".into()],
                start: "2024-04-01 10:00".into(),
                stop: None,
            })
            .await
            .unwrap();
        assert_eq!((summary.updated, summary.matched), (1, 2));
    }
}
