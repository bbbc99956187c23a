//! In-memory repository used by tests and `events --in-memory`.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;
use tracing::instrument;

use crate::error::EventResult;
use crate::filter::{EventFilter, EventMutation};
use crate::models::{Event, NewEvent};
use crate::repository::{EventRepository, UpdateCounts};

/// Insertion-ordered event store with the same predicate semantics as MongoDB.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: RwLock<Vec<Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing events, ids included.
    pub fn with_events(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    pub async fn snapshot(&self) -> Vec<Event> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn count(&self, filter: &EventFilter) -> EventResult<u64> {
        let events = self.events.read().await;
        Ok(events.iter().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn find(&self, filter: &EventFilter, skip: u64, limit: u64) -> EventResult<Vec<Event>> {
        let events = self.events.read().await;
        Ok(events
            .iter()
            .filter(|e| filter.matches(e))
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn find_one(&self, id: &str) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.iter().find(|e| e.id == id).cloned())
    }

    #[instrument(skip(self, event))]
    async fn insert(&self, event: NewEvent) -> EventResult<Event> {
        let event = event.into_event(ObjectId::new().to_hex());
        self.events.write().await.push(event.clone());
        Ok(event)
    }

    async fn update_one(&self, id: &str, mutation: &EventMutation) -> EventResult<Option<Event>> {
        let mut events = self.events.write().await;
        Ok(events.iter_mut().find(|e| e.id == id).map(|event| {
            mutation.apply(event);
            event.clone()
        }))
    }

    async fn update_many(
        &self,
        filter: &EventFilter,
        mutation: &EventMutation,
    ) -> EventResult<UpdateCounts> {
        let mut events = self.events.write().await;
        let mut counts = UpdateCounts::default();
        for event in events.iter_mut().filter(|e| filter.matches(e)) {
            counts.matched += 1;
            if mutation.apply(event) {
                counts.modified += 1;
            }
        }
        Ok(counts)
    }

    async fn delete_one(&self, id: &str) -> EventResult<bool> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }

    async fn delete_many(&self, filter: &EventFilter) -> EventResult<u64> {
        let mut events = self.events.write().await;
        let before = events.len();
        events.retain(|e| !filter.matches(e));
        Ok((before - events.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn new_event(hour: u32, tags: &[&str]) -> NewEvent {
        NewEvent {
            start: Utc.with_ymd_and_hms(2024, 4, 1, hour, 0, 0).unwrap(),
            stop: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_object_id() {
        let repo = InMemoryEventRepository::new();
        let event = repo.insert(new_event(1, &["a"])).await.unwrap();

        assert_eq!(event.id.len(), 24);
        assert!(ObjectId::parse_str(&event.id).is_ok());
        assert_eq!(repo.find_one(&event.id).await.unwrap(), Some(event));
    }

    #[tokio::test]
    async fn test_find_keeps_insertion_order_and_window() {
        let repo = InMemoryEventRepository::new();
        for hour in 1..=5 {
            repo.insert(new_event(hour, &[])).await.unwrap();
        }

        let page = repo.find(&EventFilter::All, 1, 2).await.unwrap();
        let hours: Vec<_> = page.iter().map(|e| e.start.format("%H").to_string()).collect();
        assert_eq!(hours, vec!["02", "03"]);
        assert_eq!(repo.count(&EventFilter::All).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_update_many_counts_only_changed() {
        let repo = InMemoryEventRepository::new();
        repo.insert(new_event(1, &["x"])).await.unwrap();
        repo.insert(new_event(2, &["x"])).await.unwrap();
        repo.insert(new_event(3, &["y"])).await.unwrap();

        let mutation = EventMutation::SetDatetime {
            start: Utc.with_ymd_and_hms(2024, 4, 1, 1, 0, 0).unwrap(),
            stop: None,
        };
        let counts = repo
            .update_many(&EventFilter::tags_any(["x"]), &mutation)
            .await
            .unwrap();
        assert_eq!(counts, UpdateCounts { matched: 2, modified: 1 });
    }

    #[tokio::test]
    async fn test_delete_unknown_id() {
        let repo = InMemoryEventRepository::new();
        assert!(!repo.delete_one("nope").await.unwrap());
        assert_eq!(repo.delete_many(&EventFilter::All).await.unwrap(), 0);
    }
}
