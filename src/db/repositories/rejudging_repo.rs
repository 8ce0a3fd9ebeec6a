//! Rejudging repository

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    error::AppResult,
    models::{Rejudging, RejudgingSelector},
};

/// Repository for rejudging database operations
pub struct RejudgingRepository;

impl RejudgingRepository {
    pub async fn create(
        conn: &mut PgConnection,
        started_by: &str,
        reason: &str,
        selector: &RejudgingSelector,
        start_time: DateTime<Utc>,
        repeat_count: Option<i32>,
        repeated_rejudging_id: Option<i64>,
    ) -> AppResult<Rejudging> {
        let selector_json = serde_json::to_string(selector)
            .map_err(|e| anyhow::anyhow!("cannot serialize selector: {}", e))?;

        let rejudging = sqlx::query_as::<_, Rejudging>(
            r#"
            INSERT INTO rejudging (
                started_by, reason, selector, start_time,
                repeat_count, repeated_rejudging_id
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(started_by)
        .bind(reason)
        .bind(selector_json)
        .bind(start_time)
        .bind(repeat_count)
        .bind(repeated_rejudging_id)
        .fetch_one(conn)
        .await?;

        Ok(rejudging)
    }

    /// Find rejudging by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Rejudging>> {
        let rejudging = sqlx::query_as::<_, Rejudging>(r#"SELECT * FROM rejudging WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(rejudging)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Rejudging>> {
        let rejudgings =
            sqlx::query_as::<_, Rejudging>(r#"SELECT * FROM rejudging ORDER BY id DESC"#)
                .fetch_all(pool)
                .await?;

        Ok(rejudgings)
    }

    /// Tag the submissions a selector matches. Only finalized valid
    /// judgings qualify; submissions already in another rejudging are
    /// skipped. Returns how many were tagged. Tagged submissions queue
    /// behind fresh ones via their priority.
    pub async fn tag_submissions(
        conn: &mut PgConnection,
        rejudging_id: i64,
        selector: &RejudgingSelector,
        priority: i32,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE submission s
            SET rejudging_id = $1, judgehost = NULL, priority = $10
            FROM judging j
            WHERE j.submission_id = s.id AND j.valid
              AND j.result IS NOT NULL
              AND s.rejudging_id IS NULL
              AND s.valid
              AND (cardinality($2::bigint[]) = 0 OR s.contest_id = ANY($2))
              AND (cardinality($3::bigint[]) = 0 OR s.problem_id = ANY($3))
              AND (cardinality($4::bigint[]) = 0 OR s.team_id = ANY($4))
              AND (cardinality($5::text[]) = 0 OR s.language_id = ANY($5))
              AND (cardinality($6::bigint[]) = 0 OR s.id = ANY($6))
              AND (cardinality($7::text[]) = 0 OR j.result = ANY($7))
              AND (cardinality($8::text[]) = 0 OR j.judgehost = ANY($8))
              AND ($9 OR j.result IS DISTINCT FROM 'correct')
            "#,
        )
        .bind(rejudging_id)
        .bind(&selector.contest_ids)
        .bind(&selector.problem_ids)
        .bind(&selector.team_ids)
        .bind(&selector.language_ids)
        .bind(&selector.submission_ids)
        .bind(&selector.verdicts)
        .bind(&selector.judgehosts)
        .bind(selector.include_correct)
        .bind(priority)
        .execute(conn)
        .await?;

        Ok(result.rows_affected())
    }

    /// Tagged submissions that do not yet have a finished judging for
    /// this rejudging; these block applying it. An aborted attempt does
    /// not count, its redispatch still has to produce a verdict.
    pub async fn count_pending_candidates(pool: &PgPool, rejudging_id: i64) -> AppResult<i64> {
        let count: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM submission s
            WHERE s.rejudging_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM judging j
                  WHERE j.submission_id = s.id
                    AND j.rejudging_id = $1
                    AND j.result IS NOT NULL
                    AND j.result <> 'aborted'
              )
            "#,
        )
        .bind(rejudging_id)
        .fetch_one(pool)
        .await?;

        Ok(count.0)
    }

    /// Point the dispatch claim of tagged submissions back at the host
    /// of their valid judging (on cancel, so they are not re-offered)
    pub async fn restore_claims(conn: &mut PgConnection, rejudging_id: i64) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE submission s
            SET judgehost = j.judgehost
            FROM judging j
            WHERE j.submission_id = s.id AND j.valid
              AND s.rejudging_id = $1
            "#,
        )
        .bind(rejudging_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Clear the tag of a single submission
    pub async fn untag_submission(conn: &mut PgConnection, submission_id: i64) -> AppResult<()> {
        sqlx::query(r#"UPDATE submission SET rejudging_id = NULL WHERE id = $1"#)
            .bind(submission_id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Untag all submissions of a rejudging (on apply or cancel)
    pub async fn untag_submissions(conn: &mut PgConnection, rejudging_id: i64) -> AppResult<u64> {
        let result = sqlx::query(r#"UPDATE submission SET rejudging_id = NULL WHERE rejudging_id = $1"#)
            .bind(rejudging_id)
            .execute(conn)
            .await?;

        Ok(result.rows_affected())
    }

    /// Close a rejudging; `valid = false` means canceled
    pub async fn finish(
        conn: &mut PgConnection,
        rejudging_id: i64,
        finished_by: &str,
        end_time: DateTime<Utc>,
        valid: bool,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE rejudging SET finished_by = $2, end_time = $3, valid = $4
            WHERE id = $1
            "#,
        )
        .bind(rejudging_id)
        .bind(finished_by)
        .bind(end_time)
        .bind(valid)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// Progress counters: (finished, total) judgings of a rejudging
    pub async fn progress(pool: &PgPool, rejudging_id: i64) -> AppResult<(i64, i64)> {
        let row: (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FILTER (WHERE result IS NOT NULL), COUNT(*)
            FROM judging WHERE rejudging_id = $1
            "#,
        )
        .bind(rejudging_id)
        .fetch_one(pool)
        .await?;

        Ok(row)
    }
}
