//! Submission intake

use chrono::{DateTime, Utc};
use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tracing::info;

use crate::{
    constants::DEFAULT_SUBMISSION_PRIORITY,
    db::repositories::{ContestRepository, SubmissionRepository},
    error::{AppError, AppResult},
    models::Submission,
    services::EventService,
    utils::time::now_utc,
};

/// Submission service for business logic
pub struct SubmissionService;

impl SubmissionService {
    /// Accept a submission into a running contest. Submissions dated
    /// before the start are stored as-is; scoring clamps them to the
    /// contest start.
    #[allow(clippy::too_many_arguments)]
    pub async fn create_submission(
        pool: &PgPool,
        redis: &ConnectionManager,
        contest_id: i64,
        team_id: i64,
        problem_id: i64,
        language_id: &str,
        submit_time: Option<DateTime<Utc>>,
        expected_results: Option<Vec<String>>,
    ) -> AppResult<Submission> {
        let contest = ContestRepository::find_by_id(pool, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))?;

        let submit_time = submit_time.unwrap_or_else(now_utc);
        if !contest.is_running(submit_time) {
            return Err(AppError::InvalidInput(
                "Contest is not accepting submissions".to_string(),
            ));
        }

        let team = SubmissionRepository::find_team(pool, team_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Team not found".to_string()))?;
        if !team.enabled {
            return Err(AppError::Forbidden("Team is disabled".to_string()));
        }

        let contest_problem = ContestRepository::find_contest_problem(pool, contest_id, problem_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Problem not part of contest".to_string()))?;
        if !contest_problem.allow_submit {
            return Err(AppError::Forbidden(
                "Problem does not accept submissions".to_string(),
            ));
        }

        SubmissionRepository::find_language(pool, language_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Language not found".to_string()))?;

        let submission = SubmissionRepository::create(
            pool,
            contest_id,
            team_id,
            problem_id,
            language_id,
            submit_time,
            DEFAULT_SUBMISSION_PRIORITY,
            expected_results.as_deref(),
        )
        .await?;

        EventService::publish(
            redis,
            Some(contest_id),
            "submissions",
            &submission.id.to_string(),
            "create",
        )
        .await;

        info!(
            submission_id = submission.id,
            contest_id, team_id, problem_id, "submission accepted"
        );
        Ok(submission)
    }

    pub async fn get_submission(pool: &PgPool, id: i64) -> AppResult<Submission> {
        SubmissionRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))
    }
}
