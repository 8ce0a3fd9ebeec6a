//! Judgehost request DTOs

use serde::Deserialize;
use validator::Validate;

/// Register judgehost request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterJudgehostRequest {
    #[validate(length(min = 1, max = 255))]
    pub hostname: String,
}

/// Enable or disable a judgehost
#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub active: bool,
}

/// Internal error report from a judgehost
#[derive(Debug, Deserialize, Validate)]
pub struct ReportInternalErrorRequest {
    pub judging_id: Option<i64>,
    pub contest_id: Option<i64>,

    #[validate(length(min = 1, max = 1024))]
    pub description: String,

    /// Judgehost log excerpt, base64 encoded
    pub judgehost_log: Option<String>,

    pub disabled: crate::models::DisabledTarget,
}

/// Close an internal error
#[derive(Debug, Deserialize, Validate)]
pub struct CloseInternalErrorRequest {
    /// `resolved` re-enables the disabled target, `ignored` does not
    #[validate(length(min = 1, max = 16))]
    pub status: String,
}
