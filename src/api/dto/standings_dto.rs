//! League table DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::StandingRow;

/// Response body for `GET /standings/{sport}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct StandingsResponse {
    /// Normalized sport tag.
    pub sport: String,
    /// Teams ordered by points, wins, draws, then name.
    pub table: Vec<StandingRow>,
}
