//! Error codes carried in every error body.
//!
//! Clients match on the string form, logs carry the integer. Numbers in the
//! 1000s are request problems, the 2000s are storage problems.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::NotFound;
//! assert_eq!(code.as_str(), "NOT_FOUND");
//! assert_eq!(code.code(), 1004);
//! ```

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    IntoStaticStr,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body or query rejected by `validator`, or a domain rule
    ValidationError,
    /// Path or query string did not deserialize
    InvalidParameter,
    /// Body is not JSON of the expected shape
    JsonExtraction,
    NotFound,
    InternalError,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    pub fn code(&self) -> i32 {
        self.entry().0
    }

    /// Message used when the underlying error must not reach the client.
    pub fn default_message(&self) -> &'static str {
        self.entry().1
    }

    fn entry(&self) -> (i32, &'static str) {
        match self {
            Self::ValidationError => (1001, "Request validation failed"),
            Self::InvalidParameter => (1002, "Invalid request parameter"),
            Self::JsonExtraction => (1003, "Failed to parse request body"),
            Self::NotFound => (1004, "Resource not found"),
            Self::InternalError => (1005, "An internal server error occurred"),
            Self::DatabaseError => (2001, "Database error occurred"),
        }
    }
}
