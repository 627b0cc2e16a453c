//! Match result DTOs for record, amend, detail and list endpoints.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{MatchOutcome, MatchResult, TeamId};
use crate::service::{NewResult, ResultPatch};

/// Request body for `POST /results`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordResultRequest {
    /// Sport of the match.
    pub sport: String,
    /// Home team identifier.
    pub home_team_id: uuid::Uuid,
    /// Away team identifier.
    pub away_team_id: uuid::Uuid,
    /// Goals scored by the home team.
    pub home_goals: u32,
    /// Goals scored by the away team.
    pub away_goals: u32,
    /// Match date (`YYYY-MM-DD`).
    #[serde(default)]
    pub played_on: Option<NaiveDate>,
}

impl From<RecordResultRequest> for NewResult {
    fn from(req: RecordResultRequest) -> Self {
        Self {
            sport: req.sport,
            home_team_id: TeamId::from_uuid(req.home_team_id),
            away_team_id: TeamId::from_uuid(req.away_team_id),
            home_goals: req.home_goals,
            away_goals: req.away_goals,
            played_on: req.played_on,
        }
    }
}

/// Request body for `PUT /results/{id}`. Omitted fields keep their stored
/// value.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AmendResultRequest {
    /// New sport.
    #[serde(default)]
    pub sport: Option<String>,
    /// New home team.
    #[serde(default)]
    pub home_team_id: Option<uuid::Uuid>,
    /// New away team.
    #[serde(default)]
    pub away_team_id: Option<uuid::Uuid>,
    /// New home goals.
    #[serde(default)]
    pub home_goals: Option<u32>,
    /// New away goals.
    #[serde(default)]
    pub away_goals: Option<u32>,
    /// New match date. An explicit `null` clears the stored date.
    #[serde(default, deserialize_with = "explicit_null")]
    #[schema(value_type = Option<NaiveDate>)]
    pub played_on: Option<Option<NaiveDate>>,
}

/// Keeps an explicit `null` apart from an omitted field: omitted stays
/// `None` through `#[serde(default)]`, `null` becomes `Some(None)`.
fn explicit_null<'de, D, T>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl From<AmendResultRequest> for ResultPatch {
    fn from(req: AmendResultRequest) -> Self {
        Self {
            sport: req.sport,
            home_team_id: req.home_team_id.map(TeamId::from_uuid),
            away_team_id: req.away_team_id.map(TeamId::from_uuid),
            home_goals: req.home_goals,
            away_goals: req.away_goals,
            played_on: req.played_on,
        }
    }
}

/// A stored match result.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultDto {
    /// Result identifier.
    pub result_id: uuid::Uuid,
    /// Normalized sport tag.
    pub sport: String,
    /// Home team identifier.
    pub home_team_id: uuid::Uuid,
    /// Away team identifier.
    pub away_team_id: uuid::Uuid,
    /// Home goals.
    pub home_goals: u32,
    /// Away goals.
    pub away_goals: u32,
    /// Winner derived from the score.
    pub outcome: MatchOutcome,
    /// Match date.
    pub played_on: Option<NaiveDate>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last edit timestamp.
    pub updated_at: DateTime<Utc>,
}

impl From<MatchResult> for ResultDto {
    fn from(result: MatchResult) -> Self {
        Self {
            result_id: *result.id.as_uuid(),
            sport: result.sport.to_string(),
            home_team_id: *result.home_team_id.as_uuid(),
            away_team_id: *result.away_team_id.as_uuid(),
            home_goals: result.home_goals,
            away_goals: result.away_goals,
            outcome: result.outcome,
            played_on: result.played_on,
            created_at: result.created_at,
            updated_at: result.updated_at,
        }
    }
}

/// Paginated list response for `GET /results`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResultListResponse {
    /// Results on this page.
    pub data: Vec<ResultDto>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}
