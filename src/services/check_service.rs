//! Health and consistency checks
//!
//! Everything here reports; nothing is auto-repaired. Internal error
//! handling is the one exception: reporting one disables its target and
//! resolving it re-enables.

use chrono::Duration;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    db::repositories::{InternalErrorRepository, JudgehostRepository, JudgingRepository},
    error::{AppError, AppResult},
    models::{scoreboard::internal_error_status, DisabledTarget, InternalError, Judging},
    services::JudgingService,
    settings::JudgeSettings,
    utils::time::now_utc,
};

/// A consistency violation found in the judging data
#[derive(Debug, Clone, Serialize)]
pub struct ConsistencyIssue {
    pub kind: String,
    pub description: String,
}

/// Check service: operator-facing health and consistency reporting
pub struct CheckService;

impl CheckService {
    /// Judgings running longer than `judgehost_critical` seconds whose
    /// host has gone silent; probably crashed, left for the operator
    pub async fn stale_judgings(pool: &PgPool, settings: &JudgeSettings) -> AppResult<Vec<Judging>> {
        let cutoff = now_utc() - Duration::seconds(settings.judgehost_critical);
        JudgingRepository::find_stale(pool, cutoff).await
    }

    /// Data invariants that should never break; violations are reported,
    /// never repaired automatically
    pub async fn run_consistency_checks(pool: &PgPool) -> AppResult<Vec<ConsistencyIssue>> {
        let mut issues = Vec::new();

        let duplicates: Vec<(i64, i64)> = sqlx::query_as(
            r#"
            SELECT submission_id, COUNT(*) FROM judging
            WHERE valid
            GROUP BY submission_id
            HAVING COUNT(*) > 1
            "#,
        )
        .fetch_all(pool)
        .await?;
        for (submission_id, count) in duplicates {
            issues.push(ConsistencyIssue {
                kind: "duplicate-valid-judging".to_string(),
                description: format!("submission {} has {} valid judgings", submission_id, count),
            });
        }

        let orphaned: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT s.id FROM submission s
            WHERE s.judgehost IS NOT NULL
              AND NOT EXISTS (SELECT 1 FROM judging j WHERE j.submission_id = s.id)
            "#,
        )
        .fetch_all(pool)
        .await?;
        for (submission_id,) in orphaned {
            issues.push(ConsistencyIssue {
                kind: "orphaned-claim".to_string(),
                description: format!("submission {} is claimed but has no judging", submission_id),
            });
        }

        let wrong_contest: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT j.id FROM judging j
            JOIN submission s ON s.id = j.submission_id
            WHERE j.contest_id <> s.contest_id
            "#,
        )
        .fetch_all(pool)
        .await?;
        for (judging_id,) in wrong_contest {
            issues.push(ConsistencyIssue {
                kind: "wrong-contest".to_string(),
                description: format!(
                    "judging {} belongs to a different contest than its submission",
                    judging_id
                ),
            });
        }

        let late_runs: Vec<(i64,)> = sqlx::query_as(
            r#"
            SELECT jr.id FROM judging_run jr
            JOIN judging j ON j.id = jr.judging_id
            WHERE j.end_time IS NOT NULL AND jr.end_time > j.end_time
            "#,
        )
        .fetch_all(pool)
        .await?;
        for (run_id,) in late_runs {
            issues.push(ConsistencyIssue {
                kind: "run-after-endtime".to_string(),
                description: format!("judging run {} finished after its judging ended", run_id),
            });
        }

        if !issues.is_empty() {
            warn!(count = issues.len(), "consistency check found issues");
        }
        Ok(issues)
    }

    /// Record a judgehost-reported error, disable its target, and free
    /// the affected judging for redispatch. Repeated reports of the same
    /// error collapse into the existing open record.
    pub async fn report_internal_error(
        pool: &PgPool,
        judging_id: Option<i64>,
        contest_id: Option<i64>,
        description: &str,
        judgehost_log: Option<&str>,
        target: &DisabledTarget,
    ) -> AppResult<InternalError> {
        let disabled = serde_json::to_string(target)
            .map_err(|e| anyhow::anyhow!("cannot serialize disable target: {}", e))?;

        let error = match InternalErrorRepository::find_open_duplicate(pool, description, &disabled)
            .await?
        {
            Some(existing) => existing,
            None => {
                InternalErrorRepository::create(
                    pool,
                    judging_id,
                    contest_id,
                    description,
                    judgehost_log,
                    &disabled,
                    now_utc(),
                )
                .await?
            }
        };

        InternalErrorRepository::set_target_enabled(pool, target, false).await?;
        if let Some(judging_id) = judging_id {
            // let another host pick the submission up again
            JudgingService::abort_judging(pool, judging_id).await?;
        }

        warn!(
            internal_error_id = error.id,
            ?target,
            description,
            "internal error reported, target disabled"
        );
        Ok(error)
    }

    /// Close an internal error. Resolving re-enables the disabled
    /// target; ignoring leaves it disabled.
    pub async fn close_internal_error(pool: &PgPool, id: i64, status: &str) -> AppResult<()> {
        if status != internal_error_status::RESOLVED && status != internal_error_status::IGNORED {
            return Err(AppError::InvalidInput(format!(
                "Invalid internal error status '{}'",
                status
            )));
        }

        let error = InternalErrorRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Internal error not found".to_string()))?;
        if error.status != internal_error_status::OPEN {
            return Err(AppError::Conflict(
                "Internal error is already closed".to_string(),
            ));
        }

        if status == internal_error_status::RESOLVED {
            let target: DisabledTarget = serde_json::from_str(&error.disabled)
                .map_err(|e| anyhow::anyhow!("invalid disable target on error {}: {}", id, e))?;
            InternalErrorRepository::set_target_enabled(pool, &target, true).await?;
        }
        InternalErrorRepository::set_status(pool, id, status).await?;

        info!(internal_error_id = id, status, "internal error closed");
        Ok(())
    }

    pub async fn list_open_errors(pool: &PgPool) -> AppResult<Vec<InternalError>> {
        InternalErrorRepository::list_open(pool).await
    }

    /// All judgehosts for the overview page
    pub async fn list_judgehosts(pool: &PgPool) -> AppResult<Vec<crate::models::Judgehost>> {
        JudgehostRepository::list(pool).await
    }
}
