//! Contest service

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::info;

use crate::{
    db::repositories::{AuditRepository, ContestRepository},
    error::{AppError, AppResult},
    models::{Contest, RemovedInterval},
    settings::JudgeSettings,
    utils::time::{format_duration, now_utc},
};

/// New authoritative time strings for a contest; `None` leaves a field
/// unchanged, `Some(None)` clears an optional one
#[derive(Debug, Default)]
pub struct TimeStringUpdate {
    pub activate_time: Option<String>,
    pub start_time: Option<String>,
    pub freeze_time: Option<Option<String>>,
    pub end_time: Option<String>,
    pub unfreeze_time: Option<Option<String>>,
    pub deactivate_time: Option<Option<String>>,
}

/// Contest service for business logic
pub struct ContestService;

impl ContestService {
    /// Get contest by ID
    pub async fn get_contest(pool: &PgPool, id: i64) -> AppResult<Contest> {
        ContestRepository::find_by_id(pool, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))
    }

    /// List contests currently active
    pub async fn list_active(pool: &PgPool) -> AppResult<Vec<Contest>> {
        ContestRepository::list_active(pool, now_utc()).await
    }

    /// Update contest times from their authoritative strings.
    ///
    /// Returns the updated contest and whether a scoreboard refresh is
    /// needed (start or freeze moved). The refresh itself is left to the
    /// caller, it is never done implicitly.
    pub async fn update_times(
        pool: &PgPool,
        contest_id: i64,
        update: TimeStringUpdate,
        username: &str,
    ) -> AppResult<(Contest, bool)> {
        let mut contest = Self::get_contest(pool, contest_id).await?;

        if let Some(s) = update.activate_time {
            contest.activate_time_string = s;
        }
        if let Some(s) = update.start_time {
            contest.start_time_string = s;
        }
        if let Some(s) = update.freeze_time {
            contest.freeze_time_string = s;
        }
        if let Some(s) = update.end_time {
            contest.end_time_string = s;
        }
        if let Some(s) = update.unfreeze_time {
            contest.unfreeze_time_string = s;
        }
        if let Some(s) = update.deactivate_time {
            contest.deactivate_time_string = s;
        }

        let old_start = contest.start_time;
        let old_freeze = contest.freeze_time;
        let old_unfreeze = contest.unfreeze_time;

        contest.derive_times()?;
        ContestRepository::update_times(pool, &contest).await?;

        let cache_refresh_needed = contest.start_time != old_start
            || contest.freeze_time != old_freeze
            || contest.unfreeze_time != old_unfreeze;

        AuditRepository::log(
            pool,
            now_utc(),
            Some(contest_id),
            username,
            "contest",
            &contest_id.to_string(),
            "update times",
            None,
        )
        .await?;

        info!(contest_id, cache_refresh_needed, "contest times updated");
        Ok((contest, cache_refresh_needed))
    }

    /// Pause the contest clock over an interval. Submissions inside the
    /// interval count as if made at its start.
    pub async fn add_removed_interval(
        pool: &PgPool,
        contest_id: i64,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        username: &str,
    ) -> AppResult<RemovedInterval> {
        if end_time <= start_time {
            return Err(AppError::InvalidInput(
                "Interval end must be after its start".to_string(),
            ));
        }
        let contest = Self::get_contest(pool, contest_id).await?;
        if start_time < contest.start_time || end_time > contest.end_time {
            return Err(AppError::InvalidInput(
                "Interval must lie within the contest".to_string(),
            ));
        }

        let interval =
            ContestRepository::add_removed_interval(pool, contest_id, start_time, end_time).await?;

        AuditRepository::log(
            pool,
            now_utc(),
            Some(contest_id),
            username,
            "contest",
            &contest_id.to_string(),
            "add removed interval",
            Some(&format!(
                "clock paused for {}",
                format_duration(end_time - start_time)
            )),
        )
        .await?;

        info!(contest_id, "removed interval added");
        Ok(interval)
    }

    /// Removed intervals of a contest
    pub async fn removed_intervals(pool: &PgPool, contest_id: i64) -> AppResult<Vec<RemovedInterval>> {
        ContestRepository::removed_intervals(pool, contest_id).await
    }

    /// Reasons the contest cannot be finalized yet; empty means it can
    pub async fn finalize_check(
        pool: &PgPool,
        settings: &JudgeSettings,
        contest_id: i64,
    ) -> AppResult<Vec<String>> {
        let contest = Self::get_contest(pool, contest_id).await?;
        let mut reasons = Vec::new();

        if now_utc() < contest.end_time {
            reasons.push("Contest has not ended yet".to_string());
        }

        let unjudged = ContestRepository::count_unjudged(pool, contest_id).await?;
        if unjudged > 0 {
            reasons.push(format!("{} submissions are not judged yet", unjudged));
        }

        if settings.verification_required {
            let unverified = ContestRepository::count_unverified(pool, contest_id).await?;
            if unverified > 0 {
                reasons.push(format!("{} judgings are not verified yet", unverified));
            }
        }

        let unanswered = ContestRepository::count_unanswered_clarifications(pool, contest_id).await?;
        if unanswered > 0 {
            reasons.push(format!("{} clarifications are not answered yet", unanswered));
        }

        Ok(reasons)
    }
}
