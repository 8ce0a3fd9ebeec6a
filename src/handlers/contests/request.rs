//! Contest request DTOs

use serde::Deserialize;
use validator::Validate;

/// Update contest times request. Absent fields are left unchanged;
/// optional times can be cleared by sending null inside the wrapper.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTimesRequest {
    #[validate(length(min = 1, max = 64))]
    pub activate_time: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub start_time: Option<String>,

    pub freeze_time: Option<Option<String>>,

    #[validate(length(min = 1, max = 64))]
    pub end_time: Option<String>,

    pub unfreeze_time: Option<Option<String>>,

    pub deactivate_time: Option<Option<String>>,

    /// Jury member performing the change
    #[validate(length(min = 1, max = 255))]
    pub username: String,
}

/// Pause the contest clock over an interval
#[derive(Debug, Deserialize, Validate)]
pub struct AddRemovedIntervalRequest {
    pub start_time: chrono::DateTime<chrono::Utc>,
    pub end_time: chrono::DateTime<chrono::Utc>,

    #[validate(length(min = 1, max = 255))]
    pub username: String,
}
