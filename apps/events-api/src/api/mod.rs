//! API routes module

pub mod events;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// All API routes; nested under /api by `axum_helpers::create_router`
pub fn routes(state: &AppState) -> Router {
    Router::new().nest("/events", events::router(state))
}
