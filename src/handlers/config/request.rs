//! Configuration request DTOs

use serde::Deserialize;
use validator::Validate;

/// Set one configuration value
#[derive(Debug, Deserialize, Validate)]
pub struct SetConfigRequest {
    /// JSON value matching the key's schema type
    pub value: serde_json::Value,

    #[validate(length(min = 1, max = 255))]
    pub username: String,
}
