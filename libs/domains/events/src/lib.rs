//! Events Domain
//!
//! Tagged time intervals with a mandatory `start`, an optional `stop` and a set
//! of free-text tags.
//!
//! - [`EventService`] holds the lifecycle rules: date normalisation, interval
//!   validation, the force-delete policy and running-event queries against an
//!   injectable [`Clock`].
//! - [`EventRepository`] is the persistence port, implemented by
//!   [`MongoEventRepository`] and [`InMemoryEventRepository`].
//! - [`handlers::router`] exposes the service over HTTP with [`ApiDoc`].

pub mod clock;
pub mod dates;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod summary;

pub use clock::{Clock, FixedClock, SystemClock};
pub use dates::{DateInput, format_datetime, parse_datetime};
pub use error::{EventError, EventResult};
pub use filter::{Bound, EventFilter, EventMutation};
pub use handlers::{ApiDoc, router};
pub use memory::InMemoryEventRepository;
pub use models::{
    CreateEvent, DEFAULT_LIMIT, Event, EventState, MAX_LIMIT, NewEvent, Page, Pagination, TagList,
    UpdateDatetime, UpdateDatetimeByTags,
};
pub use self::mongodb::MongoEventRepository;
pub use repository::{EventRepository, UpdateCounts};
pub use service::EventService;
pub use summary::{
    BulkUpdateStatus, BulkUpdateSummary, DeleteAllStatus, DeleteAllSummary, DeleteOutcome,
};
