//! Configuration and audit log repositories

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::error::AppResult;
use crate::settings::JudgeSettings;

/// Repository for judge settings stored in the database
pub struct ConfigRepository;

impl ConfigRepository {
    /// Load all settings, applying stored overrides on top of defaults
    pub async fn load_settings(pool: &PgPool) -> AppResult<JudgeSettings> {
        let rows: Vec<(String, String)> =
            sqlx::query_as(r#"SELECT name, value FROM configuration"#)
                .fetch_all(pool)
                .await?;

        JudgeSettings::from_rows(rows.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }

    /// Store one setting; the value must already be validated
    pub async fn set(pool: &PgPool, name: &str, value: &str) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO configuration (name, value) VALUES ($1, $2)
            ON CONFLICT (name) DO UPDATE SET value = $2
            "#,
        )
        .bind(name)
        .bind(value)
        .execute(pool)
        .await?;

        Ok(())
    }
}

/// Repository for the audit log
pub struct AuditRepository;

impl AuditRepository {
    #[allow(clippy::too_many_arguments)]
    pub async fn log(
        pool: &PgPool,
        log_time: DateTime<Utc>,
        contest_id: Option<i64>,
        username: &str,
        datatype: &str,
        dataid: &str,
        action: &str,
        extra_info: Option<&str>,
    ) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auditlog (
                log_time, contest_id, username, datatype, dataid, action, extra_info
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(log_time)
        .bind(contest_id)
        .bind(username)
        .bind(datatype)
        .bind(dataid)
        .bind(action)
        .bind(extra_info)
        .execute(pool)
        .await?;

        Ok(())
    }
}
