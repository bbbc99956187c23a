//! Shared application state handed to route builders.

use mongodb::{Client, Database};

/// Cheap to clone: the MongoDB handles share one connection pool.
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub mongo_client: Client,
    pub db: Database,
}
