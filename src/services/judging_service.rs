//! Judging state machine
//!
//! Compile reports and per-testcase runs arrive from judgehosts; this
//! service aggregates them into verdicts and drives the downstream
//! score, event, verification and balloon updates.

use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tracing::info;

use crate::{
    constants::{results, AUTO_VERIFIER},
    db::repositories::{
        AuditRepository, ContestRepository, JudgingRepository, SubmissionRepository,
    },
    error::{AppError, AppResult},
    models::{Judging, Submission},
    services::{BalloonService, EventService, ScoreboardService},
    settings::JudgeSettings,
    utils::time::now_utc,
    verdict,
};

/// Judging service for business logic
pub struct JudgingService;

impl JudgingService {
    /// Record the compile step of a judging. A failed compile finalizes
    /// the judging as compiler-error.
    pub async fn report_compile(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        judging_id: i64,
        success: bool,
        output_compile: Option<String>,
    ) -> AppResult<()> {
        let judging = Self::load_judging(pool, judging_id).await?;
        if judging.is_finished() {
            return Err(AppError::Conflict(
                "Judging has already been finished".to_string(),
            ));
        }

        let limit = settings.output_storage_limit.max(0) as usize;
        let output = output_compile.as_deref().map(|o| truncate_output(o, limit));

        if success {
            JudgingRepository::record_compile_result(pool, judging_id, output.as_deref(), None, None)
                .await?;
            return Ok(());
        }

        JudgingRepository::record_compile_result(
            pool,
            judging_id,
            output.as_deref(),
            Some(results::COMPILER_ERROR),
            Some(now_utc()),
        )
        .await?;

        info!(judging_id, "compile failed, judging finished as compiler-error");
        Self::after_verdict(pool, redis, settings, &judging, results::COMPILER_ERROR).await
    }

    /// Store one testcase result and aggregate the verdict
    #[allow(clippy::too_many_arguments)]
    pub async fn add_judging_run(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        judging_id: i64,
        testcase_id: i64,
        run_result: String,
        run_time: f64,
        end_time: DateTime<Utc>,
        outputs: RunOutputs,
    ) -> AppResult<()> {
        let judging = Self::load_judging(pool, judging_id).await?;
        let submission = Self::load_submission(pool, judging.submission_id).await?;

        let run_result = verdict::remap_result(&run_result, &settings.results_remap);
        if !settings.results_prio.contains_key(run_result) {
            return Err(AppError::InvalidInput(format!(
                "Unknown run result '{}'",
                run_result
            )));
        }

        let limit = settings.output_storage_limit.max(0) as usize;
        JudgingRepository::add_run(
            pool,
            judging_id,
            testcase_id,
            run_result,
            run_time,
            end_time,
            outputs.run.as_deref().map(|o| truncate_output(o, limit)).as_deref(),
            outputs.diff.as_deref().map(|o| truncate_output(o, limit)).as_deref(),
            outputs.error.as_deref().map(|o| truncate_output(o, limit)).as_deref(),
            outputs.system.as_deref().map(|o| truncate_output(o, limit)).as_deref(),
        )
        .await?;

        let run_results =
            JudgingRepository::run_results_by_rank(pool, judging_id, submission.problem_id).await?;
        let aggregated = verdict::final_result(&run_results, &settings.results_prio)?;
        let reported = run_results.iter().filter(|r| r.is_some()).count();
        let all_reported = reported == run_results.len();

        match (judging.result.as_deref(), aggregated.as_deref()) {
            (Some(old), Some(new)) if old != new && old != results::ABORTED => {
                Err(AppError::Internal(anyhow::anyhow!(
                    "verdict of judging {} changed from '{}' to '{}' after finalization",
                    judging_id,
                    old,
                    new
                )))
            }
            (Some(_), _) => {
                // remaining runs of an already decided judging
                if all_reported {
                    JudgingRepository::set_end_time(pool, judging_id, now_utc()).await?;
                }
                Ok(())
            }
            (None, Some(new)) => {
                let lazy = Self::lazy_eval(pool, settings, &submission).await?;
                if verdict::may_finalize(reported, run_results.len(), lazy) {
                    JudgingRepository::finish(pool, judging_id, new, now_utc()).await?;
                } else {
                    JudgingRepository::set_result(pool, judging_id, new).await?;
                }
                Self::after_verdict(pool, redis, settings, &judging, new).await
            }
            (None, None) => Ok(()),
        }
    }

    /// Mark a judging verified. Under required verification this is the
    /// point where the public side effects fire.
    pub async fn set_verified(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        judging_id: i64,
        verified: bool,
        jury_member: Option<&str>,
        comment: Option<&str>,
    ) -> AppResult<()> {
        let judging = Self::load_judging(pool, judging_id).await?;
        if !judging.is_finished() {
            return Err(AppError::Conflict(
                "Cannot verify an unfinished judging".to_string(),
            ));
        }

        JudgingRepository::set_verified(pool, judging_id, verified, jury_member, comment).await?;

        let submission = Self::load_submission(pool, judging.submission_id).await?;
        let contest = ScoreboardService::load_contest(pool, judging.contest_id).await?;

        if settings.verification_required {
            // verification changes result visibility
            ScoreboardService::refresh(
                pool,
                settings,
                &contest,
                submission.team_id,
                submission.problem_id,
            )
            .await?;
        }
        if verified {
            EventService::publish(
                redis,
                Some(judging.contest_id),
                "judgings",
                &judging_id.to_string(),
                "update",
            )
            .await;
            BalloonService::update_balloons(pool, redis, settings, &contest, &submission).await?;
        }
        Ok(())
    }

    /// Jury correction of a verdict. Overriding implies verification.
    pub async fn override_result(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        judging_id: i64,
        new_result: &str,
        jury_member: &str,
    ) -> AppResult<()> {
        if !settings.results_prio.contains_key(new_result) {
            return Err(AppError::InvalidInput(format!(
                "Unknown result '{}'",
                new_result
            )));
        }

        let judging = Self::load_judging(pool, judging_id).await?;
        if !judging.is_finished() {
            return Err(AppError::Conflict(
                "Cannot override an unfinished judging".to_string(),
            ));
        }
        if !judging.valid {
            return Err(AppError::Conflict(
                "Cannot override an invalidated judging".to_string(),
            ));
        }
        let old_result = judging.result.clone().unwrap_or_default();

        JudgingRepository::set_result(pool, judging_id, new_result).await?;
        JudgingRepository::set_verified(
            pool,
            judging_id,
            true,
            Some(jury_member),
            Some(&format!("result overridden from '{}'", old_result)),
        )
        .await?;

        AuditRepository::log(
            pool,
            now_utc(),
            Some(judging.contest_id),
            jury_member,
            "judging",
            &judging_id.to_string(),
            "override result",
            Some(&format!("{} -> {}", old_result, new_result)),
        )
        .await?;

        let submission = Self::load_submission(pool, judging.submission_id).await?;
        let contest = ScoreboardService::load_contest(pool, judging.contest_id).await?;
        ScoreboardService::refresh(
            pool,
            settings,
            &contest,
            submission.team_id,
            submission.problem_id,
        )
        .await?;
        EventService::publish(
            redis,
            Some(judging.contest_id),
            "judgings",
            &judging_id.to_string(),
            "update",
        )
        .await;
        BalloonService::update_balloons(pool, redis, settings, &contest, &submission).await?;

        Ok(())
    }

    /// Invalidate a judging whose host went away; the submission becomes
    /// dispatchable again
    pub async fn abort_judging(pool: &PgPool, judging_id: i64) -> AppResult<()> {
        let judging = Self::load_judging(pool, judging_id).await?;
        if judging.is_finished() {
            return Err(AppError::Conflict(
                "Cannot abort a finished judging".to_string(),
            ));
        }

        let mut tx = pool.begin().await?;
        JudgingRepository::abort(&mut *tx, judging_id, results::ABORTED).await?;
        tx.commit().await?;

        info!(judging_id, "judging aborted, submission released");
        Ok(())
    }

    /// Side effects after a verdict is known: auto-verify, score cell,
    /// event feed, balloon. Verification must land before the score
    /// refresh, or a required-verification cell stays pending.
    async fn after_verdict(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        judging: &Judging,
        result: &str,
    ) -> AppResult<()> {
        let submission = Self::load_submission(pool, judging.submission_id).await?;
        let contest = ScoreboardService::load_contest(pool, judging.contest_id).await?;

        if Self::auto_verify(&submission, result) {
            JudgingRepository::set_verified(
                pool,
                judging.id,
                true,
                Some(AUTO_VERIFIER),
                Some("expected result matched"),
            )
            .await?;
        }

        if judging.valid {
            ScoreboardService::refresh(
                pool,
                settings,
                &contest,
                submission.team_id,
                submission.problem_id,
            )
            .await?;
        }

        EventService::publish(
            redis,
            Some(judging.contest_id),
            "judgings",
            &judging.id.to_string(),
            "update",
        )
        .await;

        if judging.valid {
            BalloonService::update_balloons(pool, redis, settings, &contest, &submission).await?;
        }
        Ok(())
    }

    /// Auto-verify only when the submitter committed to a single
    /// expected outcome and the verdict matches it
    fn auto_verify(submission: &Submission, result: &str) -> bool {
        match submission.expected_results.as_deref() {
            Some([expected]) => expected == result,
            _ => false,
        }
    }

    /// Effective lazy evaluation for a submission's contest problem
    async fn lazy_eval(
        pool: &PgPool,
        settings: &JudgeSettings,
        submission: &Submission,
    ) -> AppResult<bool> {
        let cp = ContestRepository::find_contest_problem(
            pool,
            submission.contest_id,
            submission.problem_id,
        )
        .await?;
        Ok(cp
            .and_then(|cp| cp.lazy_eval_results)
            .unwrap_or(settings.lazy_eval_results))
    }

    async fn load_judging(pool: &PgPool, id: i64) -> AppResult<Judging> {
        JudgingRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Judging not found".to_string()))
    }

    async fn load_submission(pool: &PgPool, id: i64) -> AppResult<Submission> {
        SubmissionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))
    }

    pub async fn get_judging(pool: &PgPool, id: i64) -> AppResult<Judging> {
        Self::load_judging(pool, id).await
    }
}

/// Decoded run outputs, truncated before storage
#[derive(Debug, Default)]
pub struct RunOutputs {
    pub run: Option<String>,
    pub diff: Option<String>,
    pub error: Option<String>,
    pub system: Option<String>,
}

/// Truncate `output` to at most `limit` bytes on a char boundary,
/// marking the cut
fn truncate_output(output: &str, limit: usize) -> String {
    if output.len() <= limit {
        return output.to_string();
    }
    let mut end = limit;
    while !output.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n[output storage truncated]", &output[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "abcdé";
        let t = truncate_output(s, 5);
        assert!(t.starts_with("abcd"));
        assert!(t.ends_with("[output storage truncated]"));

        assert_eq!(truncate_output("short", 100), "short");
    }

    fn submission_with(expected: Option<Vec<&str>>) -> Submission {
        Submission {
            id: 1,
            contest_id: 1,
            team_id: 1,
            problem_id: 1,
            language_id: "rs".to_string(),
            submit_time: Utc::now(),
            valid: true,
            judgehost: None,
            priority: 0,
            rejudging_id: None,
            expected_results: expected.map(|v| v.into_iter().map(String::from).collect()),
        }
    }

    #[test]
    fn auto_verify_needs_single_matching_expectation() {
        let s = submission_with(Some(vec![results::CORRECT]));
        assert!(JudgingService::auto_verify(&s, results::CORRECT));
        assert!(!JudgingService::auto_verify(&s, results::WRONG_ANSWER));

        // multiple expected outcomes always need a human
        let s = submission_with(Some(vec![results::CORRECT, results::TIMELIMIT]));
        assert!(!JudgingService::auto_verify(&s, results::CORRECT));

        let s = submission_with(None);
        assert!(!JudgingService::auto_verify(&s, results::CORRECT));
    }
}
