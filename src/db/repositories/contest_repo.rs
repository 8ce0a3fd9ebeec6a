//! Contest repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Contest, ContestProblem, RemovedInterval},
};

/// Repository for contest database operations
pub struct ContestRepository;

impl ContestRepository {
    /// Find contest by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Contest>> {
        let contest = sqlx::query_as::<_, Contest>(r#"SELECT * FROM contest WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(contest)
    }

    /// List contests active at `instant` (between activate and deactivate)
    pub async fn list_active(pool: &PgPool, instant: DateTime<Utc>) -> AppResult<Vec<Contest>> {
        let contests = sqlx::query_as::<_, Contest>(
            r#"
            SELECT * FROM contest
            WHERE enabled
              AND activate_time <= $1
              AND (deactivate_time IS NULL OR deactivate_time > $1)
            ORDER BY start_time, id
            "#,
        )
        .bind(instant)
        .fetch_all(pool)
        .await?;

        Ok(contests)
    }

    /// Persist re-derived contest times
    pub async fn update_times(pool: &PgPool, contest: &Contest) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE contest SET
                activate_time = $2, start_time = $3, freeze_time = $4,
                end_time = $5, unfreeze_time = $6, deactivate_time = $7,
                activate_time_string = $8, start_time_string = $9,
                freeze_time_string = $10, end_time_string = $11,
                unfreeze_time_string = $12, deactivate_time_string = $13
            WHERE id = $1
            "#,
        )
        .bind(contest.id)
        .bind(contest.activate_time)
        .bind(contest.start_time)
        .bind(contest.freeze_time)
        .bind(contest.end_time)
        .bind(contest.unfreeze_time)
        .bind(contest.deactivate_time)
        .bind(&contest.activate_time_string)
        .bind(&contest.start_time_string)
        .bind(&contest.freeze_time_string)
        .bind(&contest.end_time_string)
        .bind(&contest.unfreeze_time_string)
        .bind(&contest.deactivate_time_string)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Removed intervals for a contest, oldest first
    pub async fn removed_intervals(pool: &PgPool, contest_id: i64) -> AppResult<Vec<RemovedInterval>> {
        let intervals = sqlx::query_as::<_, RemovedInterval>(
            r#"SELECT * FROM removed_interval WHERE contest_id = $1 ORDER BY start_time"#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(intervals)
    }

    pub async fn add_removed_interval(
        pool: &PgPool,
        contest_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> AppResult<RemovedInterval> {
        let interval = sqlx::query_as::<_, RemovedInterval>(
            r#"
            INSERT INTO removed_interval (contest_id, start_time, end_time)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(contest_id)
        .bind(start_time)
        .bind(end_time)
        .fetch_one(pool)
        .await?;

        Ok(interval)
    }

    /// Problems attached to a contest, in shortname order
    pub async fn contest_problems(pool: &PgPool, contest_id: i64) -> AppResult<Vec<ContestProblem>> {
        let problems = sqlx::query_as::<_, ContestProblem>(
            r#"SELECT * FROM contest_problem WHERE contest_id = $1 ORDER BY shortname"#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(problems)
    }

    pub async fn find_contest_problem(
        pool: &PgPool,
        contest_id: i64,
        problem_id: i64,
    ) -> AppResult<Option<ContestProblem>> {
        let problem = sqlx::query_as::<_, ContestProblem>(
            r#"SELECT * FROM contest_problem WHERE contest_id = $1 AND problem_id = $2"#,
        )
        .bind(contest_id)
        .bind(problem_id)
        .fetch_optional(pool)
        .await?;

        Ok(problem)
    }

    /// Count submissions in the contest without a finished valid judging
    pub async fn count_unjudged(pool: &PgPool, contest_id: i64) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM submission s
            WHERE s.contest_id = $1 AND s.valid
              AND NOT EXISTS (
                  SELECT 1 FROM judging j
                  WHERE j.submission_id = s.id AND j.valid AND j.result IS NOT NULL
              )
            "#,
        )
        .bind(contest_id)
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }

    /// Count finished valid judgings that still lack verification
    pub async fn count_unverified(pool: &PgPool, contest_id: i64) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM judging j
            JOIN submission s ON s.id = j.submission_id
            WHERE j.contest_id = $1 AND s.valid AND j.valid
              AND j.result IS NOT NULL AND NOT j.verified
            "#,
        )
        .bind(contest_id)
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }

    pub async fn count_unanswered_clarifications(pool: &PgPool, contest_id: i64) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM clarification
            WHERE contest_id = $1 AND sender_team_id IS NOT NULL AND NOT answered
            "#,
        )
        .bind(contest_id)
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }
}
