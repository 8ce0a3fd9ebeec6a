//! Judgehost repository, including the dispatch query

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Judgehost, JudgehostRestriction, Submission},
};

/// Repository for judgehost database operations
pub struct JudgehostRepository;

impl JudgehostRepository {
    /// Register a judgehost, reactivating it if it already exists
    pub async fn register(pool: &PgPool, hostname: &str, now: DateTime<Utc>) -> AppResult<Judgehost> {
        let host = sqlx::query_as::<_, Judgehost>(
            r#"
            INSERT INTO judgehost (hostname, active, poll_time)
            VALUES ($1, TRUE, $2)
            ON CONFLICT (hostname) DO UPDATE SET poll_time = $2
            RETURNING *
            "#,
        )
        .bind(hostname)
        .bind(now)
        .fetch_one(pool)
        .await?;

        Ok(host)
    }

    pub async fn find_by_hostname(pool: &PgPool, hostname: &str) -> AppResult<Option<Judgehost>> {
        let host = sqlx::query_as::<_, Judgehost>(r#"SELECT * FROM judgehost WHERE hostname = $1"#)
            .bind(hostname)
            .fetch_optional(pool)
            .await?;

        Ok(host)
    }

    pub async fn list(pool: &PgPool) -> AppResult<Vec<Judgehost>> {
        let hosts = sqlx::query_as::<_, Judgehost>(r#"SELECT * FROM judgehost ORDER BY hostname"#)
            .fetch_all(pool)
            .await?;

        Ok(hosts)
    }

    pub async fn set_active(pool: &PgPool, hostname: &str, active: bool) -> AppResult<()> {
        sqlx::query(r#"UPDATE judgehost SET active = $2 WHERE hostname = $1"#)
            .bind(hostname)
            .bind(active)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn update_poll_time(
        pool: &PgPool,
        hostname: &str,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        sqlx::query(r#"UPDATE judgehost SET poll_time = $2 WHERE hostname = $1"#)
            .bind(hostname)
            .bind(now)
            .execute(pool)
            .await?;

        Ok(())
    }

    pub async fn find_restriction(
        pool: &PgPool,
        id: i64,
    ) -> AppResult<Option<JudgehostRestriction>> {
        let restriction = sqlx::query_as::<_, JudgehostRestriction>(
            r#"SELECT * FROM judgehost_restriction WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(restriction)
    }

    /// Next submission this host may judge: unclaimed, valid, in an
    /// active contest, judgeable problem and language, within the host's
    /// restriction. Ordered by priority, then submit time, then id.
    ///
    /// The contest window is activate to deactivate, not start to end:
    /// last-second submissions and rejudgings started after the contest
    /// still get judged.
    ///
    /// Empty restriction lists mean no filter; `rejudge_own = false`
    /// excludes submissions this host judged before.
    pub async fn find_next_judgeable(
        pool: &PgPool,
        hostname: &str,
        restriction: Option<&JudgehostRestriction>,
        now: DateTime<Utc>,
    ) -> AppResult<Option<Submission>> {
        let (contest_ids, problem_ids, language_ids, rejudge_own) = match restriction {
            Some(r) => (
                r.contest_ids.as_slice(),
                r.problem_ids.as_slice(),
                r.language_ids.as_slice(),
                r.rejudge_own,
            ),
            None => (&[] as &[i64], &[] as &[i64], &[] as &[String], true),
        };

        let submission = sqlx::query_as::<_, Submission>(
            r#"
            SELECT s.* FROM submission s
            JOIN contest c ON c.id = s.contest_id
            JOIN contest_problem cp
                ON cp.contest_id = s.contest_id AND cp.problem_id = s.problem_id
            JOIN language l ON l.id = s.language_id
            WHERE s.judgehost IS NULL
              AND s.valid
              AND c.enabled
              AND c.activate_time <= $2
              AND (c.deactivate_time IS NULL OR c.deactivate_time > $2)
              AND cp.allow_judge
              AND l.allow_judge
              AND (cardinality($3::bigint[]) = 0 OR s.contest_id = ANY($3))
              AND (cardinality($4::bigint[]) = 0 OR s.problem_id = ANY($4))
              AND (cardinality($5::text[]) = 0 OR s.language_id = ANY($5))
              AND ($6 OR NOT EXISTS (
                  SELECT 1 FROM judging j
                  WHERE j.submission_id = s.id AND j.judgehost = $1
              ))
            ORDER BY s.priority, s.submit_time, s.id
            LIMIT 1
            "#,
        )
        .bind(hostname)
        .bind(now)
        .bind(contest_ids)
        .bind(problem_ids)
        .bind(language_ids)
        .bind(rejudge_own)
        .fetch_optional(pool)
        .await?;

        Ok(submission)
    }
}
