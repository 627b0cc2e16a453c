//! Standings handlers: league table and audit.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::StandingsResponse;
use crate::app_state::AppState;
use crate::domain::Sport;
use crate::error::{ErrorResponse, PortalError};
use crate::service::StandingsAudit;

/// `GET /standings/{sport}` — League table for one sport.
///
/// # Errors
///
/// Returns [`PortalError::InvalidRequest`] on an invalid sport.
#[utoipa::path(
    get,
    path = "/api/v1/standings/{sport}",
    tag = "Standings",
    summary = "League table",
    description = "Returns every team of the sport ordered by points, wins, draws, then name.",
    params(
        ("sport" = String, Path, description = "Sport tag"),
    ),
    responses(
        (status = 200, description = "League table", body = StandingsResponse),
        (status = 400, description = "Invalid sport", body = ErrorResponse),
    )
)]
pub async fn get_standings(
    State(state): State<AppState>,
    Path(sport): Path<String>,
) -> Result<impl IntoResponse, PortalError> {
    let sport = Sport::parse(&sport)?;
    let table = state.team_service.standings(sport.as_str()).await?;
    Ok(Json(StandingsResponse {
        sport: sport.to_string(),
        table,
    }))
}

/// `GET /standings/{sport}/audit` — Compare stored standings with results.
///
/// # Errors
///
/// Returns [`PortalError::InvalidRequest`] on an invalid sport.
#[utoipa::path(
    get,
    path = "/api/v1/standings/{sport}/audit",
    tag = "Standings",
    summary = "Audit standings",
    description = "Recomputes every team's aggregates from its results and lists the teams whose stored values differ. Read-only.",
    params(
        ("sport" = String, Path, description = "Sport tag"),
    ),
    responses(
        (status = 200, description = "Audit report", body = StandingsAudit),
        (status = 400, description = "Invalid sport", body = ErrorResponse),
    )
)]
pub async fn audit_standings(
    State(state): State<AppState>,
    Path(sport): Path<String>,
) -> Result<impl IntoResponse, PortalError> {
    let audit = state.team_service.audit_standings(&sport).await?;
    Ok(Json(audit))
}

/// Standings routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/standings/{sport}", get(get_standings))
        .route("/standings/{sport}/audit", get(audit_standings))
}
