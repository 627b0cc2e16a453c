//! Team handlers: register, list, get, delete.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ListParams, RegisterTeamRequest, TeamDto, TeamListResponse};
use crate::app_state::AppState;
use crate::domain::TeamId;
use crate::error::{ErrorResponse, PortalError};

/// `POST /teams` — Register a team.
///
/// # Errors
///
/// Returns [`PortalError::InvalidRequest`] on a blank name or sport.
#[utoipa::path(
    post,
    path = "/api/v1/teams",
    tag = "Teams",
    summary = "Register a team",
    description = "Registers a team for one sport with zeroed league aggregates.",
    request_body = RegisterTeamRequest,
    responses(
        (status = 201, description = "Team registered", body = TeamDto),
        (status = 400, description = "Invalid name or sport", body = ErrorResponse),
    )
)]
pub async fn register_team(
    State(state): State<AppState>,
    Json(req): Json<RegisterTeamRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let team = state
        .team_service
        .register_team(&req.name, &req.sport)
        .await?;
    Ok((StatusCode::CREATED, Json(TeamDto::from(team))))
}

/// `GET /teams` — List teams with pagination and optional sport filter.
///
/// # Errors
///
/// Returns [`PortalError`] on an invalid filter or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/teams",
    tag = "Teams",
    summary = "List teams",
    description = "Returns a paginated list of teams, optionally filtered by sport.",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated team list", body = TeamListResponse),
    )
)]
pub async fn list_teams(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, PortalError> {
    let params = params.clamped();
    let teams = state
        .team_service
        .list_teams(params.sport.as_deref())
        .await?;
    let (data, pagination) = params.paginate(teams);
    Ok(Json(TeamListResponse {
        data: data.into_iter().map(TeamDto::from).collect(),
        pagination,
    }))
}

/// `GET /teams/{id}` — Get one team.
///
/// # Errors
///
/// Returns [`PortalError::TeamNotFound`] if the team does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Get team",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
    ),
    responses(
        (status = 200, description = "Team details", body = TeamDto),
        (status = 404, description = "Team not found", body = ErrorResponse),
    )
)]
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, PortalError> {
    let team = state.team_service.get_team(TeamId::from_uuid(id)).await?;
    Ok(Json(TeamDto::from(team)))
}

/// `DELETE /teams/{id}` — Remove a team without results.
///
/// # Errors
///
/// Returns [`PortalError::TeamNotFound`] or [`PortalError::TeamInUse`].
#[utoipa::path(
    delete,
    path = "/api/v1/teams/{id}",
    tag = "Teams",
    summary = "Remove team",
    description = "Removes a team. Teams referenced by any match result cannot be removed.",
    params(
        ("id" = uuid::Uuid, Path, description = "Team UUID"),
    ),
    responses(
        (status = 204, description = "Team removed"),
        (status = 404, description = "Team not found", body = ErrorResponse),
        (status = 409, description = "Team still has results", body = ErrorResponse),
    )
)]
pub async fn delete_team(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, PortalError> {
    state
        .team_service
        .remove_team(TeamId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Team routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/teams", post(register_team).get(list_teams))
        .route("/teams/{id}", get(get_team).delete(delete_team))
}
