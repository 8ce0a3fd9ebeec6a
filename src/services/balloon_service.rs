//! Balloon handling for correct submissions

use redis::{aio::ConnectionManager, AsyncCommands};
use serde_json::json;
use sqlx::PgPool;
use tracing::{info, warn};

use crate::{
    constants::{results, BALLOON_QUEUE},
    db::repositories::{JudgingRepository, ScoreboardRepository},
    error::AppResult,
    models::{Contest, Submission},
    settings::JudgeSettings,
};

/// Issues balloons for correct submissions in balloon contests
pub struct BalloonService;

impl BalloonService {
    /// Record a balloon for `submission` if its valid judging is correct
    /// (and verified, when verification is required). At most one balloon
    /// per submission.
    pub async fn update_balloons(
        pool: &PgPool,
        redis: &ConnectionManager,
        settings: &JudgeSettings,
        contest: &Contest,
        submission: &Submission,
    ) -> AppResult<()> {
        if !contest.process_balloons {
            return Ok(());
        }

        let Some(judging) = JudgingRepository::find_valid_for_submission(pool, submission.id).await?
        else {
            return Ok(());
        };
        if judging.result.as_deref() != Some(results::CORRECT) {
            return Ok(());
        }
        if settings.verification_required && !judging.verified {
            return Ok(());
        }

        if let Some(balloon) = ScoreboardRepository::add_balloon(pool, submission.id).await? {
            info!(
                submission_id = submission.id,
                team_id = submission.team_id,
                problem_id = submission.problem_id,
                "balloon queued"
            );

            let payload = json!({
                "balloon_id": balloon.id,
                "contest_id": submission.contest_id,
                "team_id": submission.team_id,
                "problem_id": submission.problem_id,
                "submission_id": submission.id,
            });
            let mut conn = redis.clone();
            if let Err(e) = conn
                .lpush::<_, _, ()>(BALLOON_QUEUE, payload.to_string())
                .await
            {
                warn!(balloon_id = balloon.id, error = %e, "failed to enqueue balloon");
            }
        }

        Ok(())
    }
}
