//! Judgehost work dispatch

use std::time::Duration;

use futures::future::try_join3;
use redis::aio::ConnectionManager;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{debug, info};

use crate::{
    config::DispatchConfig,
    db::repositories::{JudgehostRepository, JudgingRepository, SubmissionRepository},
    error::{AppError, AppResult},
    models::Submission,
    services::EventService,
    utils::time::now_utc,
};

/// Work order handed to a judgehost
#[derive(Debug, Clone, Serialize)]
pub struct JudgingAssignment {
    pub judging_id: i64,
    pub submission_id: i64,
    pub contest_id: i64,
    pub team_id: i64,
    pub problem_id: i64,
    pub language_id: String,
    /// Problem time limit scaled by the language time factor, seconds
    pub time_limit_secs: f64,
    pub mem_limit_kb: Option<i64>,
    pub testcase_count: i64,
}

/// Dispatch service: hands out judging work to judgehosts
pub struct DispatchService;

impl DispatchService {
    /// Claim the next eligible submission for `hostname` and open a
    /// judging for it. `Ok(None)` when there is no work, or when the
    /// claim race was lost (the next poll retries).
    pub async fn request_work(
        pool: &PgPool,
        redis: &ConnectionManager,
        hostname: &str,
    ) -> AppResult<Option<JudgingAssignment>> {
        let host = JudgehostRepository::find_by_hostname(pool, hostname)
            .await?
            .ok_or_else(|| AppError::NotFound("Judgehost not registered".to_string()))?;
        if !host.active {
            return Err(AppError::Forbidden("Judgehost is disabled".to_string()));
        }

        let now = now_utc();
        JudgehostRepository::update_poll_time(pool, hostname, now).await?;

        let restriction = match host.restriction_id {
            Some(id) => JudgehostRepository::find_restriction(pool, id).await?,
            None => None,
        };

        let Some(submission) =
            JudgehostRepository::find_next_judgeable(pool, hostname, restriction.as_ref(), now)
                .await?
        else {
            return Ok(None);
        };

        let mut tx = pool.begin().await?;
        if !JudgingRepository::claim_submission(&mut *tx, submission.id, hostname).await? {
            // another host got there first
            tx.rollback().await?;
            debug!(hostname, submission_id = submission.id, "lost claim race");
            return Ok(None);
        }

        // a rejudge attempt stays invalid until the rejudging is applied
        let (valid, prev_judging_id) = match submission.rejudging_id {
            Some(_) => {
                let prev = JudgingRepository::find_valid_for_submission(pool, submission.id)
                    .await?
                    .map(|j| j.id);
                (false, prev)
            }
            None => (true, None),
        };

        let judging = JudgingRepository::create(
            &mut *tx,
            submission.id,
            submission.contest_id,
            hostname,
            now,
            valid,
            submission.rejudging_id,
            prev_judging_id,
        )
        .await?;
        tx.commit().await?;

        info!(
            hostname,
            submission_id = submission.id,
            judging_id = judging.id,
            rejudging_id = ?submission.rejudging_id,
            "submission dispatched"
        );
        EventService::publish(
            redis,
            Some(submission.contest_id),
            "judgings",
            &judging.id.to_string(),
            "create",
        )
        .await;

        Self::build_assignment(pool, judging.id, &submission).await.map(Some)
    }

    /// Long-poll wrapper around [`request_work`]: waits up to the
    /// configured timeout, checking at the poll interval.
    pub async fn request_work_longpoll(
        pool: &PgPool,
        redis: &ConnectionManager,
        dispatch: &DispatchConfig,
        hostname: &str,
    ) -> AppResult<Option<JudgingAssignment>> {
        let deadline =
            tokio::time::Instant::now() + Duration::from_secs(dispatch.longpoll_timeout_seconds);
        let interval = Duration::from_millis(dispatch.longpoll_interval_ms);

        loop {
            if let Some(assignment) = Self::request_work(pool, redis, hostname).await? {
                return Ok(Some(assignment));
            }
            if tokio::time::Instant::now() + interval >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(interval).await;
        }
    }

    async fn build_assignment(
        pool: &PgPool,
        judging_id: i64,
        submission: &Submission,
    ) -> AppResult<JudgingAssignment> {
        let (problem, language, testcase_count) = try_join3(
            SubmissionRepository::find_problem(pool, submission.problem_id),
            SubmissionRepository::find_language(pool, &submission.language_id),
            SubmissionRepository::count_testcases(pool, submission.problem_id),
        )
        .await?;
        let problem = problem.ok_or_else(|| AppError::NotFound("Problem not found".to_string()))?;
        let language =
            language.ok_or_else(|| AppError::NotFound("Language not found".to_string()))?;

        Ok(JudgingAssignment {
            judging_id,
            submission_id: submission.id,
            contest_id: submission.contest_id,
            team_id: submission.team_id,
            problem_id: submission.problem_id,
            language_id: submission.language_id.clone(),
            time_limit_secs: problem.timelimit_secs * language.time_factor,
            mem_limit_kb: problem.memlimit_kb,
            testcase_count,
        })
    }
}
