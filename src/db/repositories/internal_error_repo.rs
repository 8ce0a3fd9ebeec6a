//! Internal error repository

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{scoreboard::internal_error_status, DisabledTarget, InternalError},
};

/// Repository for judgehost-reported internal errors
pub struct InternalErrorRepository;

impl InternalErrorRepository {
    pub async fn create(
        pool: &PgPool,
        judging_id: Option<i64>,
        contest_id: Option<i64>,
        description: &str,
        judgehost_log: Option<&str>,
        disabled: &str,
        time: DateTime<Utc>,
    ) -> AppResult<InternalError> {
        let error = sqlx::query_as::<_, InternalError>(
            r#"
            INSERT INTO internal_error (
                judging_id, contest_id, description, judgehost_log, disabled, time
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(judging_id)
        .bind(contest_id)
        .bind(description)
        .bind(judgehost_log)
        .bind(disabled)
        .bind(time)
        .fetch_one(pool)
        .await?;

        Ok(error)
    }

    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<InternalError>> {
        let error =
            sqlx::query_as::<_, InternalError>(r#"SELECT * FROM internal_error WHERE id = $1"#)
                .bind(id)
                .fetch_optional(pool)
                .await?;

        Ok(error)
    }

    /// An open error with the same description and disable target, used
    /// to collapse repeated reports
    pub async fn find_open_duplicate(
        pool: &PgPool,
        description: &str,
        disabled: &str,
    ) -> AppResult<Option<InternalError>> {
        let error = sqlx::query_as::<_, InternalError>(
            r#"
            SELECT * FROM internal_error
            WHERE status = $3 AND description = $1 AND disabled = $2
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(description)
        .bind(disabled)
        .bind(internal_error_status::OPEN)
        .fetch_optional(pool)
        .await?;

        Ok(error)
    }

    pub async fn list_open(pool: &PgPool) -> AppResult<Vec<InternalError>> {
        let errors = sqlx::query_as::<_, InternalError>(
            r#"SELECT * FROM internal_error WHERE status = $1 ORDER BY id"#,
        )
        .bind(internal_error_status::OPEN)
        .fetch_all(pool)
        .await?;

        Ok(errors)
    }

    pub async fn set_status(pool: &PgPool, id: i64, status: &str) -> AppResult<()> {
        sqlx::query(r#"UPDATE internal_error SET status = $2 WHERE id = $1"#)
            .bind(id)
            .bind(status)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Disable or re-enable the judging target named by an internal
    /// error
    pub async fn set_target_enabled(
        pool: &PgPool,
        target: &DisabledTarget,
        enabled: bool,
    ) -> AppResult<()> {
        match target {
            DisabledTarget::Judgehost { hostname } => {
                sqlx::query(r#"UPDATE judgehost SET active = $2 WHERE hostname = $1"#)
                    .bind(hostname)
                    .bind(enabled)
                    .execute(pool)
                    .await?;
            }
            DisabledTarget::Problem { problem_id } => {
                sqlx::query(r#"UPDATE contest_problem SET allow_judge = $2 WHERE problem_id = $1"#)
                    .bind(problem_id)
                    .bind(enabled)
                    .execute(pool)
                    .await?;
            }
            DisabledTarget::Language { language_id } => {
                sqlx::query(r#"UPDATE language SET allow_judge = $2 WHERE id = $1"#)
                    .bind(language_id)
                    .bind(enabled)
                    .execute(pool)
                    .await?;
            }
        }

        Ok(())
    }
}
