//! Configuration response DTOs

use std::collections::HashMap;

use serde::Serialize;

use crate::settings::JudgeSettings;

/// The effective judge configuration snapshot
#[derive(Debug, Serialize)]
pub struct ConfigResponse {
    pub verification_required: bool,
    pub compile_penalty: bool,
    pub penalty_time: i64,
    pub results_prio: HashMap<String, i32>,
    pub results_remap: HashMap<String, String>,
    pub lazy_eval_results: bool,
    pub output_storage_limit: i64,
    pub judgehost_warning: i64,
    pub judgehost_critical: i64,
    pub score_in_seconds: bool,
}

impl From<&JudgeSettings> for ConfigResponse {
    fn from(settings: &JudgeSettings) -> Self {
        Self {
            verification_required: settings.verification_required,
            compile_penalty: settings.compile_penalty,
            penalty_time: settings.penalty_time,
            results_prio: settings.results_prio.clone(),
            results_remap: settings.results_remap.clone(),
            lazy_eval_results: settings.lazy_eval_results,
            output_storage_limit: settings.output_storage_limit,
            judgehost_warning: settings.judgehost_warning,
            judgehost_critical: settings.judgehost_critical,
            score_in_seconds: settings.score_in_seconds,
        }
    }
}
