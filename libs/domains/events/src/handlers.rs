use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
};
use axum_helpers::{
    ValidatedJson, ValidatedQuery,
    errors::responses::{
        BadRequestParameterResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi};
use validator::Validate;

use crate::dates::DateInput;
use crate::error::EventResult;
use crate::models::{
    CreateEvent, DEFAULT_LIMIT, Event, EventState, Page, Pagination, TagList, UpdateDatetime,
    UpdateDatetimeByTags,
};
use crate::repository::EventRepository;
use crate::service::EventService;
use crate::summary::{
    BulkUpdateStatus, BulkUpdateSummary, DeleteAllStatus, DeleteAllSummary, DeleteOutcome,
};

/// OpenAPI documentation for Events API
#[derive(OpenApi)]
#[openapi(
    paths(
        add_event,
        list_events,
        running_events,
        search_events,
        get_event,
        delete_event,
        delete_all_events,
        update_event_tags,
        update_event_datetime,
        update_events_datetime,
    ),
    components(
        schemas(
            Event,
            EventState,
            DateInput,
            CreateEvent,
            UpdateDatetime,
            UpdateDatetimeByTags,
            Page<Event>,
            DeleteOutcome,
            DeleteAllStatus,
            DeleteAllSummary,
            BulkUpdateStatus,
            BulkUpdateSummary,
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestParameterResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Events", description = "Tagged time intervals stored in MongoDB")
    )
)]
pub struct ApiDoc;

/// Create the events router with all HTTP endpoints
pub fn router<R: EventRepository + 'static>(service: EventService<R>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/add_event", post(add_event))
        .route("/list_events", get(list_events))
        .route("/running_events", get(running_events))
        .route("/search_events", get(search_events))
        .route("/event/{id}", get(get_event))
        .route("/delete_event/{id}", delete(delete_event))
        .route("/delete_all_events", delete(delete_all_events))
        .route("/update_event_tags/{id}", patch(update_event_tags))
        .route("/update_event_datetime/{id}", patch(update_event_datetime))
        .route("/update_events_datetime", patch(update_events_datetime))
        .with_state(shared_service)
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

/// Tag search parameters; `tags` may be repeated
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Match events carrying any of these tags
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one tag is required"))]
    pub tags: Vec<String>,

    #[serde(default)]
    #[validate(range(max = crate::models::MAX_SKIP))]
    pub skip: u64,

    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub limit: u64,
}

#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteParams {
    /// Also delete ongoing and future events
    #[serde(default)]
    pub force_delete: bool,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TagUpdateParams {
    #[serde(default)]
    #[validate(length(min = 1, message = "at least one tag is required"))]
    pub tags: Vec<String>,

    /// Replace the tag set instead of merging into it
    #[serde(default)]
    pub replace: bool,
}

/// Create a new event
#[utoipa::path(
    post,
    path = "/add_event",
    tag = "Events",
    request_body = CreateEvent,
    responses(
        (status = 201, description = "Event created", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateEvent>,
) -> EventResult<impl IntoResponse> {
    let event = service.create(input).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

/// List all events
#[utoipa::path(
    get,
    path = "/list_events",
    tag = "Events",
    params(Pagination),
    responses(
        (status = 200, description = "One page of events", body = Page<Event>),
        (status = 400, response = BadRequestParameterResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedQuery(page): ValidatedQuery<Pagination>,
) -> EventResult<Json<Page<Event>>> {
    Ok(Json(service.list_all(page).await?))
}

/// List events running now
#[utoipa::path(
    get,
    path = "/running_events",
    tag = "Events",
    params(Pagination),
    responses(
        (status = 200, description = "One page of running events", body = Page<Event>),
        (status = 400, response = BadRequestParameterResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn running_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedQuery(page): ValidatedQuery<Pagination>,
) -> EventResult<Json<Page<Event>>> {
    Ok(Json(service.list_running(page).await?))
}

/// Search events by tags
#[utoipa::path(
    get,
    path = "/search_events",
    tag = "Events",
    params(SearchParams),
    responses(
        (status = 200, description = "One page of matching events", body = Page<Event>),
        (status = 400, response = BadRequestParameterResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedQuery(params): ValidatedQuery<SearchParams>,
) -> EventResult<Json<Page<Event>>> {
    let page = Pagination {
        skip: params.skip,
        limit: params.limit,
    };
    let found = service
        .search_by_tags(TagList { tags: params.tags }, page)
        .await?;
    Ok(Json(found))
}

/// Get an event by ID
#[utoipa::path(
    get,
    path = "/event/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = Event),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
) -> EventResult<Json<Event>> {
    Ok(Json(service.get_one(&id).await?))
}

/// Delete an event
///
/// Ongoing and future events are kept unless `force_delete` is set.
#[utoipa::path(
    delete,
    path = "/delete_event/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ID"),
        DeleteParams
    ),
    responses(
        (status = 200, description = "Deletion outcome", body = DeleteOutcome),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
    ValidatedQuery(params): ValidatedQuery<DeleteParams>,
) -> EventResult<Json<DeleteOutcome>> {
    Ok(Json(service.delete_one(&id, params.force_delete).await?))
}

/// Delete all stopped events, or every event with `force_delete`
#[utoipa::path(
    delete,
    path = "/delete_all_events",
    tag = "Events",
    params(DeleteParams),
    responses(
        (status = 200, description = "Bulk deletion summary", body = DeleteAllSummary),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_all_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedQuery(params): ValidatedQuery<DeleteParams>,
) -> EventResult<Json<DeleteAllSummary>> {
    Ok(Json(service.delete_all(params.force_delete).await?))
}

/// Add tags to an event, or replace them
#[utoipa::path(
    patch,
    path = "/update_event_tags/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ID"),
        TagUpdateParams
    ),
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event_tags<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
    ValidatedQuery(params): ValidatedQuery<TagUpdateParams>,
) -> EventResult<Json<Event>> {
    let event = service
        .update_tags(&id, TagList { tags: params.tags }, params.replace)
        .await?;
    Ok(Json(event))
}

/// Change the start and stop of an event
#[utoipa::path(
    patch,
    path = "/update_event_datetime/{id}",
    tag = "Events",
    params(
        ("id" = String, Path, description = "Event ID")
    ),
    request_body = UpdateDatetime,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_event_datetime<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateDatetime>,
) -> EventResult<Json<Event>> {
    Ok(Json(service.update_datetime(&id, input).await?))
}

/// Change the start and stop of every event sharing a tag
#[utoipa::path(
    patch,
    path = "/update_events_datetime",
    tag = "Events",
    request_body = UpdateDatetimeByTags,
    responses(
        (status = 200, description = "Bulk update summary", body = BulkUpdateSummary),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_events_datetime<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    ValidatedJson(input): ValidatedJson<UpdateDatetimeByTags>,
) -> EventResult<Json<BulkUpdateSummary>> {
    Ok(Json(service.update_datetime_by_tags(input).await?))
}
