//! Judging repository

use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};

use crate::{
    error::AppResult,
    models::{Judging, JudgingRun},
};

/// Repository for judging database operations
pub struct JudgingRepository;

impl JudgingRepository {
    /// Atomically claim a submission for a judgehost. Returns false when
    /// another host claimed it first.
    pub async fn claim_submission(
        conn: &mut PgConnection,
        submission_id: i64,
        hostname: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            r#"UPDATE submission SET judgehost = $2 WHERE id = $1 AND judgehost IS NULL"#,
        )
        .bind(submission_id)
        .bind(hostname)
        .execute(conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Create a judging for a claimed submission. Rejudge attempts are
    /// created invalid and reference the rejudging and the judging they
    /// will replace.
    pub async fn create(
        conn: &mut PgConnection,
        submission_id: i64,
        contest_id: i64,
        hostname: &str,
        start_time: DateTime<Utc>,
        valid: bool,
        rejudging_id: Option<i64>,
        prev_judging_id: Option<i64>,
    ) -> AppResult<Judging> {
        let judging = sqlx::query_as::<_, Judging>(
            r#"
            INSERT INTO judging (
                submission_id, contest_id, judgehost, start_time,
                valid, rejudging_id, prev_judging_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(submission_id)
        .bind(contest_id)
        .bind(hostname)
        .bind(start_time)
        .bind(valid)
        .bind(rejudging_id)
        .bind(prev_judging_id)
        .fetch_one(conn)
        .await?;

        Ok(judging)
    }

    /// Find judging by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> AppResult<Option<Judging>> {
        let judging = sqlx::query_as::<_, Judging>(r#"SELECT * FROM judging WHERE id = $1"#)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        Ok(judging)
    }

    /// The valid judging of a submission, if any
    pub async fn find_valid_for_submission(
        pool: &PgPool,
        submission_id: i64,
    ) -> AppResult<Option<Judging>> {
        let judging = sqlx::query_as::<_, Judging>(
            r#"SELECT * FROM judging WHERE submission_id = $1 AND valid"#,
        )
        .bind(submission_id)
        .fetch_optional(pool)
        .await?;

        Ok(judging)
    }

    /// Store compilation output and, on failure, finish the judging
    pub async fn record_compile_result(
        pool: &PgPool,
        judging_id: i64,
        output_compile: Option<&str>,
        result: Option<&str>,
        end_time: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE judging
            SET output_compile = $2, result = $3, end_time = $4
            WHERE id = $1
            "#,
        )
        .bind(judging_id)
        .bind(output_compile)
        .bind(result)
        .bind(end_time)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Finish a judging with its aggregated verdict
    pub async fn finish(
        pool: &PgPool,
        judging_id: i64,
        result: &str,
        end_time: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(r#"UPDATE judging SET result = $2, end_time = $3 WHERE id = $1"#)
            .bind(judging_id)
            .bind(result)
            .bind(end_time)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Mark a judging aborted and free the submission for redispatch
    pub async fn abort(conn: &mut PgConnection, judging_id: i64, result: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE judging SET result = $2, end_time = NOW(), valid = FALSE
            WHERE id = $1
            "#,
        )
        .bind(judging_id)
        .bind(result)
        .execute(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            UPDATE submission SET judgehost = NULL
            WHERE id = (SELECT submission_id FROM judging WHERE id = $1)
            "#,
        )
        .bind(judging_id)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn set_verified(
        pool: &PgPool,
        judging_id: i64,
        verified: bool,
        jury_member: Option<&str>,
        comment: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE judging
            SET verified = $2, jury_member = $3, verify_comment = $4
            WHERE id = $1
            "#,
        )
        .bind(judging_id)
        .bind(verified)
        .bind(jury_member)
        .bind(comment)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Set the verdict without touching the end time
    pub async fn set_result(pool: &PgPool, judging_id: i64, result: &str) -> AppResult<()> {
        sqlx::query(r#"UPDATE judging SET result = $2 WHERE id = $1"#)
            .bind(judging_id)
            .bind(result)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Stamp the end time if it is still unset
    pub async fn set_end_time(
        pool: &PgPool,
        judging_id: i64,
        end_time: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(r#"UPDATE judging SET end_time = $2 WHERE id = $1 AND end_time IS NULL"#)
            .bind(judging_id)
            .bind(end_time)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Insert a testcase result for a judging
    pub async fn add_run(
        pool: &PgPool,
        judging_id: i64,
        testcase_id: i64,
        run_result: &str,
        run_time: f64,
        end_time: DateTime<Utc>,
        output_run: Option<&str>,
        output_diff: Option<&str>,
        output_error: Option<&str>,
        output_system: Option<&str>,
    ) -> AppResult<JudgingRun> {
        let run = sqlx::query_as::<_, JudgingRun>(
            r#"
            INSERT INTO judging_run (
                judging_id, testcase_id, run_result, run_time, end_time,
                output_run, output_diff, output_error, output_system
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(judging_id)
        .bind(testcase_id)
        .bind(run_result)
        .bind(run_time)
        .bind(end_time)
        .bind(output_run)
        .bind(output_diff)
        .bind(output_error)
        .bind(output_system)
        .fetch_one(pool)
        .await?;

        Ok(run)
    }

    /// Run results of a judging in testcase rank order; unrun testcases
    /// appear as NULL
    pub async fn run_results_by_rank(
        pool: &PgPool,
        judging_id: i64,
        problem_id: i64,
    ) -> AppResult<Vec<Option<String>>> {
        let rows: Vec<(Option<String>,)> = sqlx::query_as(
            r#"
            SELECT jr.run_result
            FROM testcase tc
            LEFT JOIN judging_run jr ON jr.testcase_id = tc.id AND jr.judging_id = $1
            WHERE tc.problem_id = $2
            ORDER BY tc.rank
            "#,
        )
        .bind(judging_id)
        .bind(problem_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(r,)| r).collect())
    }

    /// Invalidate all judgings of a submission, then promote one. Runs on
    /// a transaction so the single-valid-judging invariant holds
    /// throughout.
    pub async fn promote(
        conn: &mut PgConnection,
        submission_id: i64,
        judging_id: i64,
    ) -> AppResult<()> {
        sqlx::query(r#"UPDATE judging SET valid = FALSE WHERE submission_id = $1"#)
            .bind(submission_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(r#"UPDATE judging SET valid = TRUE WHERE id = $1"#)
            .bind(judging_id)
            .execute(conn)
            .await?;

        Ok(())
    }

    /// Unfinished judgings belonging to a rejudging
    pub async fn unfinished_for_rejudging(
        pool: &PgPool,
        rejudging_id: i64,
    ) -> AppResult<Vec<Judging>> {
        let judgings = sqlx::query_as::<_, Judging>(
            r#"SELECT * FROM judging WHERE rejudging_id = $1 AND result IS NULL"#,
        )
        .bind(rejudging_id)
        .fetch_all(pool)
        .await?;

        Ok(judgings)
    }

    /// Finished judgings of a rejudging. A submission can carry several
    /// when an attempt was aborted and redispatched; the caller picks
    /// one per submission.
    pub async fn finished_for_rejudging(
        pool: &PgPool,
        rejudging_id: i64,
    ) -> AppResult<Vec<Judging>> {
        let judgings = sqlx::query_as::<_, Judging>(
            r#"
            SELECT * FROM judging
            WHERE rejudging_id = $1 AND result IS NOT NULL
            ORDER BY submission_id, id
            "#,
        )
        .bind(rejudging_id)
        .fetch_all(pool)
        .await?;

        Ok(judgings)
    }

    /// Judgings started before `cutoff` that never finished, with the
    /// host that was running them
    pub async fn find_stale(pool: &PgPool, cutoff: DateTime<Utc>) -> AppResult<Vec<Judging>> {
        let judgings = sqlx::query_as::<_, Judging>(
            r#"
            SELECT j.* FROM judging j
            JOIN judgehost h ON h.hostname = j.judgehost
            WHERE j.result IS NULL
              AND j.start_time < $1
              AND (h.poll_time IS NULL OR h.poll_time < $1)
            "#,
        )
        .bind(cutoff)
        .fetch_all(pool)
        .await?;

        Ok(judgings)
    }
}
