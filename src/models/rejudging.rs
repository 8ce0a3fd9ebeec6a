//! Rejudging model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::constants::results;
use crate::error::{AppError, AppResult};

/// Rejudging database model
///
/// `end_time` is set when the rejudging is finished, either applied or
/// canceled; `valid` distinguishes the two. A repeated rejudging chain
/// shares `repeated_rejudging_id` with its first member.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Rejudging {
    pub id: i64,
    pub started_by: String,
    pub finished_by: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub reason: String,
    pub valid: bool,
    /// Total repetitions requested, if this is a repeated rejudging
    pub repeat_count: Option<i32>,
    pub repeated_rejudging_id: Option<i64>,
    /// Submission selector, stored as JSON
    pub selector: String,
}

impl Rejudging {
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }

    pub fn parse_selector(&self) -> AppResult<RejudgingSelector> {
        serde_json::from_str(&self.selector).map_err(|e| {
            AppError::Internal(anyhow::anyhow!(
                "invalid selector on rejudging {}: {}",
                self.id,
                e
            ))
        })
    }
}

/// Which submissions a rejudging covers. Filters combine with AND;
/// an empty list means no filter on that attribute.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejudgingSelector {
    #[serde(default)]
    pub contest_ids: Vec<i64>,
    #[serde(default)]
    pub problem_ids: Vec<i64>,
    #[serde(default)]
    pub team_ids: Vec<i64>,
    #[serde(default)]
    pub language_ids: Vec<String>,
    #[serde(default)]
    pub submission_ids: Vec<i64>,
    /// Only submissions whose valid judging has one of these verdicts
    #[serde(default)]
    pub verdicts: Vec<String>,
    /// Only submissions judged by one of these hosts
    #[serde(default)]
    pub judgehosts: Vec<String>,
    /// Include submissions currently judged correct
    #[serde(default)]
    pub include_correct: bool,
}

impl RejudgingSelector {
    /// Result-side eligibility for tagging: the valid judging must be
    /// finalized, pass the verdict filter, and `correct` only counts
    /// when `include_correct` is set. The tagging query applies the
    /// same rule in SQL.
    pub fn matches_result(&self, result: Option<&str>) -> bool {
        let Some(result) = result else {
            return false;
        };
        if !self.verdicts.is_empty() && !self.verdicts.iter().any(|v| v == result) {
            return false;
        }
        self.include_correct || result != results::CORRECT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_roundtrip_with_defaults() {
        let sel: RejudgingSelector = serde_json::from_str(r#"{"contest_ids":[3]}"#).unwrap();
        assert_eq!(sel.contest_ids, vec![3]);
        assert!(sel.problem_ids.is_empty());
        assert!(!sel.include_correct);
    }

    #[test]
    fn running_judgings_never_match_a_selector() {
        let sel = RejudgingSelector::default();
        assert!(!sel.matches_result(None));
        assert!(sel.matches_result(Some(results::WRONG_ANSWER)));
        assert!(!sel.matches_result(Some(results::CORRECT)));

        let sel = RejudgingSelector {
            include_correct: true,
            ..Default::default()
        };
        assert!(sel.matches_result(Some(results::CORRECT)));
        assert!(!sel.matches_result(None));

        let sel = RejudgingSelector {
            verdicts: vec![results::TIMELIMIT.to_string()],
            ..Default::default()
        };
        assert!(sel.matches_result(Some(results::TIMELIMIT)));
        assert!(!sel.matches_result(Some(results::WRONG_ANSWER)));
    }
}
