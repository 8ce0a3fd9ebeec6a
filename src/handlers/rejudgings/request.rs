//! Rejudging request DTOs

use serde::Deserialize;
use validator::Validate;

use crate::models::RejudgingSelector;

/// Start rejudging request
#[derive(Debug, Deserialize, Validate)]
pub struct StartRejudgingRequest {
    #[validate(length(min = 1, max = 255))]
    pub reason: String,

    #[validate(length(min = 1, max = 255))]
    pub started_by: String,

    /// Which submissions to rejudge; empty filters match everything
    pub selector: RejudgingSelector,

    /// Run the same rejudging this many times in total
    #[validate(range(min = 1, max = 100))]
    pub repeat: Option<i32>,
}

/// Finish rejudging request
#[derive(Debug, Deserialize, Validate)]
pub struct FinishRejudgingRequest {
    #[validate(length(min = 1, max = 255))]
    pub finished_by: String,
}
