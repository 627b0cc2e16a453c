//! Portal error types with HTTP status code mapping.
//!
//! [`PortalError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ResultId, TeamId};

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 1002,
///     "message": "unknown team: 6f1c…",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code.
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category        | HTTP Status                  |
/// |-----------|-----------------|------------------------------|
/// | 1000–1999 | Validation      | 400 Bad Request              |
/// | 2000–2999 | State/Not Found | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server          | 500 Internal Server Error    |
#[derive(Debug, thiserror::Error)]
pub enum PortalError {
    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A match result references a team that does not exist.
    #[error("unknown team: {0}")]
    UnknownTeam(TeamId),

    /// A match result references a team registered for another sport.
    #[error("team {team_id} plays {team_sport}, not {result_sport}")]
    SportMismatch {
        /// Offending team.
        team_id: TeamId,
        /// Sport the team is registered for.
        team_sport: String,
        /// Sport of the match result.
        result_sport: String,
    },

    /// Team with the given ID was not found.
    #[error("team not found: {0}")]
    TeamNotFound(TeamId),

    /// Match result with the given ID was not found.
    #[error("match result not found: {0}")]
    ResultNotFound(ResultId),

    /// Team cannot be removed while match results reference it.
    #[error("team {team_id} is referenced by {results} match result(s)")]
    TeamInUse {
        /// Team that was asked to be removed.
        team_id: TeamId,
        /// Number of results still referencing it.
        results: u64,
    },

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::UnknownTeam(_) => 1002,
            Self::SportMismatch { .. } => 1003,
            Self::TeamNotFound(_) => 2001,
            Self::ResultNotFound(_) => 2002,
            Self::TeamInUse { .. } => 2003,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::UnknownTeam(_) | Self::SportMismatch { .. } => {
                StatusCode::BAD_REQUEST
            }
            Self::TeamNotFound(_) | Self::ResultNotFound(_) => StatusCode::NOT_FOUND,
            Self::TeamInUse { .. } => StatusCode::CONFLICT,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for PortalError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}
