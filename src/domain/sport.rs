//! Sport category tag.
//!
//! Teams and match results are scoped per sport: a basketball team never
//! appears in a football fixture. [`Sport`] normalizes the tag (trimmed,
//! lowercase) so `"Football "` and `"football"` name the same set of teams.

use std::fmt;

use serde::Serialize;

use crate::error::PortalError;

/// Maximum accepted length of a sport tag, in characters.
pub const MAX_SPORT_LEN: usize = 50;

/// Normalized sport category.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sport(String);

impl Sport {
    /// Parses and normalizes a sport tag.
    ///
    /// # Errors
    ///
    /// Returns [`PortalError::InvalidRequest`] if the tag is blank or longer
    /// than [`MAX_SPORT_LEN`] characters.
    pub fn parse(raw: &str) -> Result<Self, PortalError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(PortalError::InvalidRequest(
                "sport must not be empty".to_string(),
            ));
        }
        if normalized.chars().count() > MAX_SPORT_LEN {
            return Err(PortalError::InvalidRequest(format!(
                "sport must be at most {MAX_SPORT_LEN} characters"
            )));
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized tag.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalizes_case_and_whitespace() {
        let sport = Sport::parse("  Football ");
        assert!(matches!(sport, Ok(ref s) if s.as_str() == "football"));
    }

    #[test]
    fn parse_rejects_blank() {
        assert!(Sport::parse("   ").is_err());
    }

    #[test]
    fn parse_rejects_overlong() {
        let long = "x".repeat(MAX_SPORT_LEN + 1);
        assert!(Sport::parse(&long).is_err());
    }
}
