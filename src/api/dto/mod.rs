//! Data Transfer Objects for REST request/response serialization.
//!
//! Identifiers are exposed as plain UUIDs and sports as their normalized
//! lowercase tag.

pub mod common_dto;
pub mod result_dto;
pub mod standings_dto;
pub mod team_dto;

pub use common_dto::*;
pub use result_dto::*;
pub use standings_dto::*;
pub use team_dto::*;
