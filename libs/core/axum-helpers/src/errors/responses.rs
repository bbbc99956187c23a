//! `ToResponse` wrappers around [`ErrorResponse`] for `#[utoipa::path]` declarations.
//!
//! The examples mirror what [`super::AppError`] actually renders.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

/// 500, driver failures are logged and masked
#[derive(ToResponse)]
#[response(
    description = "Storage failure, details are only logged",
    content_type = "application/json",
    example = json!({
        "code": 2001,
        "error": "DATABASE_ERROR",
        "message": "Database error occurred"
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

/// 400 from `validator` or a rejected date interval
#[derive(ToResponse)]
#[response(
    description = "Body or query did not pass validation",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "stop must not be before start"
    })
)]
pub struct BadRequestValidationResponse(pub ErrorResponse);

/// 400 from the `Path`/`Query` extractors
#[derive(ToResponse)]
#[response(
    description = "A path or query parameter could not be parsed",
    content_type = "application/json",
    example = json!({
        "code": 1002,
        "error": "INVALID_PARAMETER",
        "message": "Failed to deserialize query string: limit: invalid digit found in string"
    })
)]
pub struct BadRequestParameterResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "No matching event",
    content_type = "application/json",
    example = json!({
        "code": 1004,
        "error": "NOT_FOUND",
        "message": "Event with ID 6631c5d82fda6e60f14e2a3a not found"
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);
