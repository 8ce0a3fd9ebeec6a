//! Submission repository

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use crate::{
    error::AppResult,
    models::{Language, Problem, Submission, Team},
};

/// Join of a submission with its valid judging, as needed for scoring
#[derive(Debug, Clone, FromRow)]
pub struct CellHistoryRow {
    pub id: i64,
    pub submit_time: DateTime<Utc>,
    pub result: Option<String>,
    pub verified: Option<bool>,
}

/// Repository for submission database operations
pub struct SubmissionRepository;

impl SubmissionRepository {
    /// Create a new submission
    pub async fn create(
        pool: &PgPool,
        contest_id: i64,
        team_id: i64,
        problem_id: i64,
        language_id: &str,
        submit_time: DateTime<Utc>,
        priority: i32,
        expected_results: Option<&[String]>,
    ) -> AppResult<Submission> {
        let submission = sqlx::query_as::<_, Submission>(
            r#"
            INSERT INTO submission (
                contest_id, team_id, problem_id, language_id,
                submit_time, priority, expected_results
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(contest_id)
        .bind(team_id)
        .bind(problem_id)
        .bind(language_id)
        .bind(submit_time)
        .bind(priority)
        .bind(expected_results)
        .fetch_one(pool)
        .await?;

        Ok(submission)
    }

    /// Find submission by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Submission>> {
        let submission =
            sqlx::query_as::<_, Submission>(r#"SELECT * FROM submission WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(submission)
    }

    /// Valid submissions of one (team, problem) pair with the result of
    /// their valid judging, ordered by submit time then id
    pub async fn cell_history(
        pool: &PgPool,
        contest_id: i64,
        team_id: i64,
        problem_id: i64,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<CellHistoryRow>> {
        let rows = sqlx::query_as::<_, CellHistoryRow>(
            r#"
            SELECT s.id, s.submit_time, j.result, j.verified
            FROM submission s
            LEFT JOIN judging j ON j.submission_id = s.id AND j.valid
            WHERE s.contest_id = $1 AND s.team_id = $2 AND s.problem_id = $3
              AND s.valid AND s.submit_time < $4
            ORDER BY s.submit_time, s.id
            "#,
        )
        .bind(contest_id)
        .bind(team_id)
        .bind(problem_id)
        .bind(until)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    /// Same-sortorder rivals of a solving submission: every other valid
    /// submission on the same problem that is correct or might still
    /// become correct. The first-to-solve comparison itself happens in
    /// [`crate::scoring::first_to_solve`].
    pub async fn first_to_solve_rivals(
        pool: &PgPool,
        submission_id: i64,
        verification_required: bool,
    ) -> AppResult<Vec<(i64, DateTime<Utc>)>> {
        let rivals: Vec<(i64, DateTime<Utc>)> = sqlx::query_as(
            r#"
            WITH me AS (
                SELECT s.id, s.contest_id, s.problem_id, t.sortorder
                FROM submission s
                JOIN team t ON t.id = s.team_id
                WHERE s.id = $1
            )
            SELECT s.id, s.submit_time
            FROM submission s
            CROSS JOIN me
            JOIN team t ON t.id = s.team_id
            LEFT JOIN judging j ON j.submission_id = s.id AND j.valid
            WHERE s.contest_id = me.contest_id
              AND s.problem_id = me.problem_id
              AND s.valid
              AND s.id <> me.id
              AND t.sortorder = me.sortorder
              AND (j.result IS NULL
                   OR j.result = 'correct'
                   OR ($2 AND NOT j.verified))
            "#,
        )
        .bind(submission_id)
        .bind(verification_required)
        .fetch_all(pool)
        .await?;

        Ok(rivals)
    }

    pub async fn find_team(pool: &PgPool, id: i64) -> AppResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(r#"SELECT * FROM team WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(team)
    }

    pub async fn find_problem(pool: &PgPool, id: i64) -> AppResult<Option<Problem>> {
        let problem = sqlx::query_as::<_, Problem>(r#"SELECT * FROM problem WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(problem)
    }

    pub async fn find_language(pool: &PgPool, id: &str) -> AppResult<Option<Language>> {
        let language = sqlx::query_as::<_, Language>(r#"SELECT * FROM language WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(language)
    }

    /// Testcase count for a problem
    pub async fn count_testcases(pool: &PgPool, problem_id: i64) -> AppResult<i64> {
        let count: (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM testcase WHERE problem_id = $1"#)
                .bind(problem_id)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }
}
