use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event with ID {0} not found")]
    NotFound(String),

    #[error("No events found with tags {}", .0.join(", "))]
    NoTagMatches(Vec<String>),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Persistence(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl EventError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EventError::NotFound(_) | EventError::NoTagMatches(_))
    }
}

/// Convert EventError to AppError for standardized error responses
impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(_) | EventError::NoTagMatches(_) => {
                AppError::NotFound(err.to_string())
            }
            EventError::Validation(msg) => AppError::BadRequest(msg),
            EventError::Persistence(msg) => AppError::Database(msg),
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Persistence(err.to_string())
    }
}

impl From<validator::ValidationErrors> for EventError {
    fn from(err: validator::ValidationErrors) -> Self {
        EventError::Validation(err.to_string())
    }
}
