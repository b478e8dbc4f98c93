use serde::{Deserialize, Serialize};

/// Error type for loading a [`SessionConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid session configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings a caller passes into every session.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Require the terms-of-service agreement on the final submit when the
    /// questionnaire carries terms.
    pub require_tos_agreement: bool,

    /// Reject text answers longer than the question's `max_characters`.
    pub enforce_max_characters: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            require_tos_agreement: true,
            enforce_max_characters: true,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}
