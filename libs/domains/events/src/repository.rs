use async_trait::async_trait;

use crate::error::EventResult;
use crate::filter::{EventFilter, EventMutation};
use crate::models::{Event, NewEvent};

/// Counts reported by a bulk update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub matched: u64,
    /// Documents whose stored values actually changed
    pub modified: u64,
}

/// Repository trait for Event persistence
///
/// The service only speaks [`EventFilter`] and [`EventMutation`]; implementations
/// translate them to their own query language.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn count(&self, filter: &EventFilter) -> EventResult<u64>;

    /// Matches in store-natural order, windowed by `skip` / `limit`
    async fn find(&self, filter: &EventFilter, skip: u64, limit: u64) -> EventResult<Vec<Event>>;

    /// `None` for unknown or malformed ids
    async fn find_one(&self, id: &str) -> EventResult<Option<Event>>;

    /// Store a new event and return it with its assigned id
    async fn insert(&self, event: NewEvent) -> EventResult<Event>;

    /// Apply a mutation to one event, returning the post-update document
    async fn update_one(&self, id: &str, mutation: &EventMutation) -> EventResult<Option<Event>>;

    async fn update_many(
        &self,
        filter: &EventFilter,
        mutation: &EventMutation,
    ) -> EventResult<UpdateCounts>;

    async fn delete_one(&self, id: &str) -> EventResult<bool>;

    async fn delete_many(&self, filter: &EventFilter) -> EventResult<u64>;
}
