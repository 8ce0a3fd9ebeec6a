//! Judging request DTOs

use serde::Deserialize;
use validator::Validate;

/// Compile step report from a judgehost
#[derive(Debug, Deserialize, Validate)]
pub struct ReportCompileRequest {
    pub success: bool,

    /// Compiler output, base64 encoded
    pub output_compile: Option<String>,
}

/// One testcase result from a judgehost
#[derive(Debug, Deserialize, Validate)]
pub struct AddJudgingRunRequest {
    pub testcase_id: i64,

    #[validate(length(min = 1, max = 32))]
    pub run_result: String,

    /// Runtime in seconds
    #[validate(range(min = 0.0))]
    pub run_time: f64,

    /// Run outputs, base64 encoded
    pub output_run: Option<String>,
    pub output_diff: Option<String>,
    pub output_error: Option<String>,
    pub output_system: Option<String>,
}

/// Verify or unverify a judging
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    pub verified: bool,

    #[validate(length(min = 1, max = 255))]
    pub jury_member: Option<String>,

    #[validate(length(max = 1024))]
    pub comment: Option<String>,
}

/// Jury override of a verdict
#[derive(Debug, Deserialize, Validate)]
pub struct OverrideResultRequest {
    #[validate(length(min = 1, max = 32))]
    pub result: String,

    #[validate(length(min = 1, max = 255))]
    pub jury_member: String,
}
