//! Match result handlers: record, list, get, amend, delete.
//!
//! The status code of every mutation reflects the match result write
//! only. Standings reconciliation runs inside the same request but its
//! failures are logged and published, not returned.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{
    AmendResultRequest, ListParams, RecordResultRequest, ResultDto, ResultListResponse,
};
use crate::app_state::AppState;
use crate::domain::ResultId;
use crate::error::{ErrorResponse, PortalError};

/// `POST /results` — Record a match result.
///
/// # Errors
///
/// Returns [`PortalError::UnknownTeam`], [`PortalError::SportMismatch`] or
/// [`PortalError::InvalidRequest`] on invalid input.
#[utoipa::path(
    post,
    path = "/api/v1/results",
    tag = "Results",
    summary = "Record a match result",
    description = "Stores a match result and credits both teams' standings.",
    request_body = RecordResultRequest,
    responses(
        (status = 201, description = "Result recorded", body = ResultDto),
        (status = 400, description = "Unknown team, sport mismatch or invalid input", body = ErrorResponse),
    )
)]
pub async fn record_result(
    State(state): State<AppState>,
    Json(req): Json<RecordResultRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let result = state.results_service.record_result(req.into()).await?;
    Ok((StatusCode::CREATED, Json(ResultDto::from(result))))
}

/// `GET /results` — List results, oldest first.
///
/// # Errors
///
/// Returns [`PortalError`] on an invalid filter or backend failure.
#[utoipa::path(
    get,
    path = "/api/v1/results",
    tag = "Results",
    summary = "List match results",
    params(ListParams),
    responses(
        (status = 200, description = "Paginated result list", body = ResultListResponse),
    )
)]
pub async fn list_results(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<impl IntoResponse, PortalError> {
    let params = params.clamped();
    let results = state
        .results_service
        .list_results(params.sport.as_deref())
        .await?;
    let (data, pagination) = params.paginate(results);
    Ok(Json(ResultListResponse {
        data: data.into_iter().map(ResultDto::from).collect(),
        pagination,
    }))
}

/// `GET /results/{id}` — Get one result.
///
/// # Errors
///
/// Returns [`PortalError::ResultNotFound`] if the result does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/results/{id}",
    tag = "Results",
    summary = "Get match result",
    params(
        ("id" = uuid::Uuid, Path, description = "Result UUID"),
    ),
    responses(
        (status = 200, description = "Result details", body = ResultDto),
        (status = 404, description = "Result not found", body = ErrorResponse),
    )
)]
pub async fn get_result(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, PortalError> {
    let result = state
        .results_service
        .get_result(ResultId::from_uuid(id))
        .await?;
    Ok(Json(ResultDto::from(result)))
}

/// `PUT /results/{id}` — Amend a result.
///
/// # Errors
///
/// Returns [`PortalError::ResultNotFound`] if the result does not exist,
/// or a validation error for the edited record.
#[utoipa::path(
    put,
    path = "/api/v1/results/{id}",
    tag = "Results",
    summary = "Amend a match result",
    description = "Edits a stored result and moves both teams' standings by the net difference.",
    params(
        ("id" = uuid::Uuid, Path, description = "Result UUID"),
    ),
    request_body = AmendResultRequest,
    responses(
        (status = 200, description = "Result amended", body = ResultDto),
        (status = 400, description = "Invalid edit", body = ErrorResponse),
        (status = 404, description = "Result not found", body = ErrorResponse),
    )
)]
pub async fn amend_result(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
    Json(req): Json<AmendResultRequest>,
) -> Result<impl IntoResponse, PortalError> {
    let result = state
        .results_service
        .amend_result(ResultId::from_uuid(id), req.into())
        .await?;
    Ok(Json(ResultDto::from(result)))
}

/// `DELETE /results/{id}` — Delete a result.
///
/// # Errors
///
/// Returns [`PortalError::ResultNotFound`] if the result does not exist.
#[utoipa::path(
    delete,
    path = "/api/v1/results/{id}",
    tag = "Results",
    summary = "Delete a match result",
    description = "Withdraws the result's contribution from both teams, then deletes it.",
    params(
        ("id" = uuid::Uuid, Path, description = "Result UUID"),
    ),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 404, description = "Result not found", body = ErrorResponse),
    )
)]
pub async fn delete_result(
    State(state): State<AppState>,
    Path(id): Path<uuid::Uuid>,
) -> Result<impl IntoResponse, PortalError> {
    state
        .results_service
        .remove_result(ResultId::from_uuid(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Result routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/results", post(record_result).get(list_results))
        .route(
            "/results/{id}",
            get(get_result).put(amend_result).delete(delete_result),
        )
}
