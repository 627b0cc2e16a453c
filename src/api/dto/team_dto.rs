//! Team DTOs for registration, detail and list endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::Team;

/// Request body for `POST /teams`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterTeamRequest {
    /// Team name (max 100 chars).
    pub name: String,
    /// Sport the team competes in.
    pub sport: String,
}

/// A team with its league aggregates.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamDto {
    /// Team identifier.
    pub team_id: uuid::Uuid,
    /// Team name.
    pub name: String,
    /// Normalized sport tag.
    pub sport: String,
    /// Matches played.
    pub played: i64,
    /// League points.
    pub points: i64,
    /// Matches won.
    pub wins: i64,
    /// Matches drawn.
    pub draws: i64,
    /// Matches lost.
    pub losses: i64,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<Team> for TeamDto {
    fn from(team: Team) -> Self {
        Self {
            team_id: *team.id.as_uuid(),
            played: team.played(),
            name: team.name,
            sport: team.sport.to_string(),
            points: team.points,
            wins: team.wins,
            draws: team.draws,
            losses: team.losses,
            created_at: team.created_at,
        }
    }
}

/// Paginated list response for `GET /teams`.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamListResponse {
    /// Teams on this page.
    pub data: Vec<TeamDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
