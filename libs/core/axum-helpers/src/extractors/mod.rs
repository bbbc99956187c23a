//! Custom extractors for Axum handlers.
//!
//! Both extractors reject with the crate's [`AppError`](crate::errors::AppError) body shape.

pub mod validated_json;
pub mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;
