//! MongoDB implementation of EventRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{self, Bson, Document, doc, oid::ObjectId},
    options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{EventError, EventResult};
use crate::filter::{Bound, EventFilter, EventMutation};
use crate::models::{Event, NewEvent};
use crate::repository::{EventRepository, UpdateCounts};

pub const COLLECTION_NAME: &str = "events";

/// Stored shape of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct EventDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    start: bson::DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stop: Option<bson::DateTime>,
    #[serde(default)]
    tags: Vec<String>,
}

fn to_bson_datetime(dt: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(dt.timestamp_millis())
}

fn from_bson_datetime(dt: bson::DateTime) -> EventResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).ok_or_else(|| {
        EventError::Persistence(format!("stored date {dt} is out of range"))
    })
}

impl TryFrom<EventDocument> for Event {
    type Error = EventError;

    fn try_from(doc: EventDocument) -> EventResult<Self> {
        Ok(Event {
            id: doc.id.to_hex(),
            start: from_bson_datetime(doc.start)?,
            stop: doc.stop.map(from_bson_datetime).transpose()?,
            tags: doc.tags,
        })
    }
}

impl From<NewEvent> for EventDocument {
    fn from(event: NewEvent) -> Self {
        Self {
            id: ObjectId::new(),
            start: to_bson_datetime(event.start),
            stop: event.stop.map(to_bson_datetime),
            tags: event.tags,
        }
    }
}

fn bound_doc(bound: Bound) -> Document {
    match bound {
        Bound::Lte(at) => doc! { "$lte": to_bson_datetime(at) },
        Bound::Gte(at) => doc! { "$gte": to_bson_datetime(at) },
    }
}

/// Translate a predicate into a MongoDB query document.
pub(crate) fn filter_document(filter: &EventFilter) -> Document {
    match filter {
        EventFilter::All => doc! {},
        EventFilter::Start(bound) => doc! { "start": bound_doc(*bound) },
        EventFilter::Stop(bound) => doc! { "stop": bound_doc(*bound) },
        // null matches both a missing field and an explicit null
        EventFilter::StopAbsent => doc! { "stop": Bson::Null },
        EventFilter::TagsAny(tags) => doc! { "tags": { "$in": tags.clone() } },
        EventFilter::And(parts) if parts.is_empty() => doc! {},
        EventFilter::And(parts) => {
            doc! { "$and": parts.iter().map(filter_document).collect::<Vec<_>>() }
        }
        EventFilter::Or(parts) if parts.is_empty() => doc! { "_id": { "$in": [] } },
        EventFilter::Or(parts) => {
            doc! { "$or": parts.iter().map(filter_document).collect::<Vec<_>>() }
        }
    }
}

/// Translate a mutation into a MongoDB update document.
pub(crate) fn update_document(mutation: &EventMutation) -> Document {
    match mutation {
        EventMutation::ReplaceTags(tags) => doc! { "$set": { "tags": tags.clone() } },
        EventMutation::AddTags(tags) => {
            doc! { "$addToSet": { "tags": { "$each": tags.clone() } } }
        }
        EventMutation::SetDatetime { start, stop: Some(stop) } => doc! {
            "$set": { "start": to_bson_datetime(*start), "stop": to_bson_datetime(*stop) }
        },
        EventMutation::SetDatetime { start, stop: None } => doc! {
            "$set": { "start": to_bson_datetime(*start) },
            "$unset": { "stop": "" }
        },
    }
}

/// Malformed ids cannot exist in the collection.
fn id_filter(id: &str) -> Option<Document> {
    ObjectId::parse_str(id).ok().map(|oid| doc! { "_id": oid })
}

/// MongoDB implementation of the EventRepository
#[derive(Clone)]
pub struct MongoEventRepository {
    collection: Collection<EventDocument>,
}

impl MongoEventRepository {
    /// Create a repository over the `events` collection of `db`
    ///
    /// # Example
    /// ```ignore
    /// let client = database::mongodb::connect_from_config(&config).await?;
    /// let repo = MongoEventRepository::new(&client.database("events"));
    /// repo.create_indexes().await?;
    /// ```
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, COLLECTION_NAME)
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<EventDocument>(collection_name),
        }
    }

    /// Create indexes backing the running, stopped and tag queries
    #[instrument(skip(self))]
    pub async fn create_indexes(&self) -> EventResult<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "start": 1 }).build(),
            IndexModel::builder().keys(doc! { "stop": 1 }).build(),
            IndexModel::builder().keys(doc! { "tags": 1 }).build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(collection = %self.collection.name(), "Event indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    #[instrument(skip(self, filter))]
    async fn count(&self, filter: &EventFilter) -> EventResult<u64> {
        let count = self
            .collection
            .count_documents(filter_document(filter))
            .await?;
        Ok(count)
    }

    #[instrument(skip(self, filter))]
    async fn find(&self, filter: &EventFilter, skip: u64, limit: u64) -> EventResult<Vec<Event>> {
        let options = FindOptions::builder()
            .sort(doc! { "_id": 1 })
            .skip(skip)
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();

        let cursor = self
            .collection
            .find(filter_document(filter))
            .with_options(options)
            .await?;
        let documents: Vec<EventDocument> = cursor.try_collect().await?;

        documents.into_iter().map(Event::try_from).collect()
    }

    #[instrument(skip(self))]
    async fn find_one(&self, id: &str) -> EventResult<Option<Event>> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };
        self.collection
            .find_one(filter)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    #[instrument(skip(self, event))]
    async fn insert(&self, event: NewEvent) -> EventResult<Event> {
        let document = EventDocument::from(event);
        self.collection.insert_one(&document).await?;

        tracing::info!(event_id = %document.id, "Event inserted");
        Event::try_from(document)
    }

    #[instrument(skip(self, mutation))]
    async fn update_one(&self, id: &str, mutation: &EventMutation) -> EventResult<Option<Event>> {
        let Some(filter) = id_filter(id) else {
            return Ok(None);
        };
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        self.collection
            .find_one_and_update(filter, update_document(mutation))
            .with_options(options)
            .await?
            .map(Event::try_from)
            .transpose()
    }

    #[instrument(skip(self, filter, mutation))]
    async fn update_many(
        &self,
        filter: &EventFilter,
        mutation: &EventMutation,
    ) -> EventResult<UpdateCounts> {
        let result = self
            .collection
            .update_many(filter_document(filter), update_document(mutation))
            .await?;

        Ok(UpdateCounts {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    #[instrument(skip(self))]
    async fn delete_one(&self, id: &str) -> EventResult<bool> {
        let Some(filter) = id_filter(id) else {
            return Ok(false);
        };
        let result = self.collection.delete_one(filter).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, filter))]
    async fn delete_many(&self, filter: &EventFilter) -> EventResult<u64> {
        let result = self
            .collection
            .delete_many(filter_document(filter))
            .await?;
        Ok(result.deleted_count)
    }
}
