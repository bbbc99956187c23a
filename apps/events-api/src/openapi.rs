//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Combined OpenAPI documentation served by the docs UIs
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Events API",
        version = "0.1.0",
        description = "Create, query and manage tagged time-interval events stored in MongoDB",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/events", api = domain_events::ApiDoc)
    ),
    tags(
        (name = "Events", description = "Tagged time intervals stored in MongoDB")
    )
)]
pub struct ApiDoc;
