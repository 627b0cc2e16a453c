//! REST API layer: route handlers, DTOs, OpenAPI document and router
//! composition.
//!
//! All resource endpoints are mounted under `/api/v1`. The OpenAPI
//! document is served at `/api-docs/openapi.json`; with the `swagger-ui`
//! feature an interactive UI is mounted at `/swagger-ui`.

pub mod dto;
pub mod handlers;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// Path of the generated OpenAPI document.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// OpenAPI document for every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "campus-league",
        description = "University sports results and league standings"
    ),
    paths(
        handlers::system::health_handler,
        handlers::teams::register_team,
        handlers::teams::list_teams,
        handlers::teams::get_team,
        handlers::teams::delete_team,
        handlers::results::record_result,
        handlers::results::list_results,
        handlers::results::get_result,
        handlers::results::amend_result,
        handlers::results::delete_result,
        handlers::standings::get_standings,
        handlers::standings::audit_standings,
    ),
    components(schemas(
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
        crate::domain::StatDelta,
        crate::domain::StandingRow,
        crate::domain::MatchOutcome,
        crate::service::DriftEntry,
        crate::service::StandingsAudit,
    )),
    tags(
        (name = "Teams", description = "Team registration"),
        (name = "Results", description = "Match results and standings reconciliation"),
        (name = "Standings", description = "League tables and audit"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
        .merge(docs_router())
}

#[cfg(feature = "swagger-ui")]
fn docs_router() -> Router<AppState> {
    Router::new()
        .merge(utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}

#[cfg(not(feature = "swagger-ui"))]
fn docs_router() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_resource_paths() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/v1/teams",
            "/api/v1/teams/{id}",
            "/api/v1/results",
            "/api/v1/results/{id}",
            "/api/v1/standings/{sport}",
            "/api/v1/standings/{sport}/audit",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
