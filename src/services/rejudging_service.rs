//! Rejudging coordinator
//!
//! A rejudging tags submissions, collects their new (invalid) judgings,
//! and on apply atomically swaps each submission's valid judging for
//! the rejudge attempt. Cancel leaves the originals untouched.

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tracing::info;

use crate::{
    constants::{results, REJUDGE_PRIORITY},
    db::repositories::{
        AuditRepository, JudgingRepository, RejudgingRepository, SubmissionRepository,
    },
    error::{AppError, AppResult},
    models::{Judging, Rejudging, RejudgingSelector},
    services::{BalloonService, EventService, ScoreboardService},
    settings::JudgeSettings,
    utils::time::now_utc,
};

/// How a rejudging is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishAction {
    Apply,
    Cancel,
}

/// Rejudging service for business logic
pub struct RejudgingService;

impl RejudgingService {
    /// Start a rejudging over the submissions a selector matches.
    /// Submissions already in another rejudging are skipped; if nothing
    /// remains the rejudging is not created.
    pub async fn start(
        pool: &PgPool,
        started_by: &str,
        reason: &str,
        selector: &RejudgingSelector,
        repeat_count: Option<i32>,
        repeated_rejudging_id: Option<i64>,
    ) -> AppResult<Rejudging> {
        if let Some(n) = repeat_count {
            if n < 1 {
                return Err(AppError::InvalidInput(
                    "Repeat count must be at least 1".to_string(),
                ));
            }
        }

        let mut tx = pool.begin().await?;
        let rejudging = RejudgingRepository::create(
            &mut *tx,
            started_by,
            reason,
            selector,
            now_utc(),
            repeat_count,
            repeated_rejudging_id,
        )
        .await?;

        let tagged =
            RejudgingRepository::tag_submissions(&mut *tx, rejudging.id, selector, REJUDGE_PRIORITY)
                .await?;
        if tagged == 0 {
            tx.rollback().await?;
            return Err(AppError::InvalidInput(
                "No submissions match the rejudging selector".to_string(),
            ));
        }
        tx.commit().await?;

        AuditRepository::log(
            pool,
            now_utc(),
            None,
            started_by,
            "rejudging",
            &rejudging.id.to_string(),
            "start",
            Some(&format!("{} submissions", tagged)),
        )
        .await?;

        info!(rejudging_id = rejudging.id, tagged, reason, "rejudging started");
        Ok(rejudging)
    }

    /// Apply or cancel a finished rejudging
    pub async fn finish(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        rejudging_id: i64,
        action: FinishAction,
        finished_by: &str,
    ) -> AppResult<()> {
        let rejudging = RejudgingRepository::find_by_id(pool, rejudging_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rejudging not found".to_string()))?;
        if rejudging.is_finished() {
            return Err(AppError::Conflict(
                "Rejudging has already been finished".to_string(),
            ));
        }

        match action {
            FinishAction::Apply => {
                Self::apply(pool, redis, settings, &rejudging, finished_by).await
            }
            FinishAction::Cancel => Self::cancel(pool, &rejudging, finished_by).await,
        }
    }

    async fn apply(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        rejudging: &Rejudging,
        finished_by: &str,
    ) -> AppResult<()> {
        let pending = RejudgingRepository::count_pending_candidates(pool, rejudging.id).await?;
        if pending > 0 {
            return Err(AppError::Blocked(vec![format!(
                "{} submissions are not judged yet",
                pending
            )]));
        }

        let judgings = Self::promotion_candidates(
            JudgingRepository::finished_for_rejudging(pool, rejudging.id).await?,
        );
        for judging in &judgings {
            // swap the valid judging and clear the tag atomically
            let mut tx = pool.begin().await?;
            JudgingRepository::promote(&mut *tx, judging.submission_id, judging.id).await?;
            RejudgingRepository::untag_submission(&mut *tx, judging.submission_id).await?;
            tx.commit().await?;

            let submission = SubmissionRepository::find_by_id(pool, judging.submission_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;
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
                &judging.id.to_string(),
                "update",
            )
            .await;
            BalloonService::update_balloons(pool, redis, settings, &contest, &submission).await?;
        }

        let mut tx = pool.begin().await?;
        RejudgingRepository::untag_submissions(&mut *tx, rejudging.id).await?;
        RejudgingRepository::finish(&mut *tx, rejudging.id, finished_by, now_utc(), true).await?;
        tx.commit().await?;

        AuditRepository::log(
            pool,
            now_utc(),
            None,
            finished_by,
            "rejudging",
            &rejudging.id.to_string(),
            "apply",
            Some(&format!("{} judgings promoted", judgings.len())),
        )
        .await?;
        info!(rejudging_id = rejudging.id, applied = judgings.len(), "rejudging applied");

        Self::maybe_repeat(pool, rejudging).await
    }

    async fn cancel(pool: &PgPool, rejudging: &Rejudging, finished_by: &str) -> AppResult<()> {
        let unfinished = JudgingRepository::unfinished_for_rejudging(pool, rejudging.id).await?;

        let mut tx = pool.begin().await?;
        for judging in &unfinished {
            JudgingRepository::abort(&mut *tx, judging.id, results::ABORTED).await?;
        }
        // originals stay valid; close the dispatch latch again
        RejudgingRepository::restore_claims(&mut *tx, rejudging.id).await?;
        RejudgingRepository::untag_submissions(&mut *tx, rejudging.id).await?;
        RejudgingRepository::finish(&mut *tx, rejudging.id, finished_by, now_utc(), false).await?;
        tx.commit().await?;

        AuditRepository::log(
            pool,
            now_utc(),
            None,
            finished_by,
            "rejudging",
            &rejudging.id.to_string(),
            "cancel",
            Some(&format!("{} judgings aborted", unfinished.len())),
        )
        .await?;
        info!(rejudging_id = rejudging.id, aborted = unfinished.len(), "rejudging canceled");
        Ok(())
    }

    /// Pick the judging to promote for each submission. Aborted attempts
    /// never win; when a redispatch left several finished attempts the
    /// latest one counts. A submission whose attempts all aborted is
    /// skipped, its original judging stays valid.
    fn promotion_candidates(judgings: Vec<Judging>) -> Vec<Judging> {
        let mut candidates: Vec<Judging> = Vec::with_capacity(judgings.len());
        for judging in judgings {
            if judging.result.as_deref() == Some(results::ABORTED) {
                continue;
            }
            match candidates
                .iter_mut()
                .find(|c| c.submission_id == judging.submission_id)
            {
                Some(c) => {
                    if c.id < judging.id {
                        *c = judging;
                    }
                }
                None => candidates.push(judging),
            }
        }
        candidates
    }

    /// Chain the next round of a repeated rejudging after an apply. A
    /// canceled rejudging never chains.
    async fn maybe_repeat(pool: &PgPool, rejudging: &Rejudging) -> AppResult<()> {
        let Some(repeat_count) = rejudging.repeat_count else {
            return Ok(());
        };
        if repeat_count <= 1 {
            return Ok(());
        }

        let selector = rejudging.parse_selector()?;
        let first_in_chain = rejudging.repeated_rejudging_id.unwrap_or(rejudging.id);
        let next = Self::start(
            pool,
            &rejudging.started_by,
            &rejudging.reason,
            &selector,
            Some(repeat_count - 1),
            Some(first_in_chain),
        )
        .await?;

        info!(
            rejudging_id = rejudging.id,
            next_rejudging_id = next.id,
            rounds_left = repeat_count - 1,
            "repeated rejudging chained"
        );
        Ok(())
    }

    pub async fn get(pool: &PgPool, id: i64) -> AppResult<Rejudging> {
        RejudgingRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Rejudging not found".to_string()))
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Rejudging>> {
        RejudgingRepository::list(pool).await
    }

    /// (finished, total) judging counts of a rejudging
    pub async fn progress(pool: &PgPool, id: i64) -> AppResult<(i64, i64)> {
        RejudgingRepository::progress(pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn judging(id: i64, submission_id: i64, result: &str) -> Judging {
        Judging {
            id,
            submission_id,
            contest_id: 1,
            judgehost: "host-1".to_string(),
            start_time: now_utc(),
            end_time: Some(now_utc()),
            result: Some(result.to_string()),
            valid: false,
            verified: false,
            jury_member: None,
            verify_comment: None,
            rejudging_id: Some(7),
            prev_judging_id: Some(2),
            output_compile: None,
        }
    }

    #[test]
    fn aborted_attempts_are_never_promoted() {
        // host crash aborted judging 11; the redispatch produced 12
        let picked = RejudgingService::promotion_candidates(vec![
            judging(11, 5, results::ABORTED),
            judging(12, 5, results::CORRECT),
        ]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, 12);

        // order from the database must not matter
        let picked = RejudgingService::promotion_candidates(vec![
            judging(12, 5, results::CORRECT),
            judging(11, 5, results::ABORTED),
        ]);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, 12);

        // only aborted attempts: nothing to promote, the original stays
        let picked =
            RejudgingService::promotion_candidates(vec![judging(11, 5, results::ABORTED)]);
        assert!(picked.is_empty());
    }

    #[test]
    fn latest_finished_attempt_wins_per_submission() {
        let picked = RejudgingService::promotion_candidates(vec![
            judging(20, 5, results::WRONG_ANSWER),
            judging(22, 5, results::CORRECT),
            judging(21, 6, results::TIMELIMIT),
        ]);
        assert_eq!(picked.len(), 2);
        assert!(picked.iter().any(|j| j.submission_id == 5 && j.id == 22));
        assert!(picked.iter().any(|j| j.submission_id == 6 && j.id == 21));
    }
}
