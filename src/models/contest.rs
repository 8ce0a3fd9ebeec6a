//! Contest model and contest clock

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, AppResult};
use crate::utils::time::{is_relative, resolve_time_string};

/// Contest database model
///
/// Every time field carries an authoritative string form; the timestamp
/// columns are derived from those strings and re-derived whenever a string
/// changes (relative strings resolve against the start time).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Contest {
    pub id: i64,
    pub name: String,
    pub shortname: String,
    pub activate_time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub freeze_time: Option<DateTime<Utc>>,
    pub end_time: DateTime<Utc>,
    pub unfreeze_time: Option<DateTime<Utc>>,
    pub deactivate_time: Option<DateTime<Utc>>,
    pub activate_time_string: String,
    pub start_time_string: String,
    pub freeze_time_string: Option<String>,
    pub end_time_string: String,
    pub unfreeze_time_string: Option<String>,
    pub deactivate_time_string: Option<String>,
    pub enabled: bool,
    pub public: bool,
    pub process_balloons: bool,
}

/// A time interval removed from the contest clock (e.g. a power outage)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct RemovedInterval {
    pub id: i64,
    pub contest_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Scoreboard visibility state derived from the contest clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezeData {
    /// Contest has started
    pub started: bool,
    /// Public scoreboard is frozen
    pub show_frozen: bool,
    /// Final standings may be shown publicly
    pub show_final: bool,
}

impl Contest {
    /// Elapsed contest time at `instant`, with removed intervals
    /// subtracted from the clock. `None` before the contest start.
    pub fn contest_time(
        &self,
        instant: DateTime<Utc>,
        removed: &[RemovedInterval],
    ) -> Option<Duration> {
        if instant < self.start_time {
            return None;
        }

        let mut elapsed = instant - self.start_time;
        for interval in removed {
            if interval.start_time < instant {
                let overlap = std::cmp::min(
                    instant - interval.start_time,
                    interval.end_time - interval.start_time,
                );
                elapsed -= overlap;
            }
        }
        Some(elapsed)
    }

    /// Freeze/visibility state at `instant`.
    ///
    /// Final standings show once the contest is over and either no freeze
    /// was set or the unfreeze time has passed; the board is frozen from
    /// the freeze time until then.
    pub fn freeze_data(&self, instant: DateTime<Utc>) -> FreezeData {
        let show_final = (self.freeze_time.is_none() && instant >= self.end_time)
            || self.unfreeze_time.is_some_and(|t| instant >= t);
        let show_frozen =
            !show_final && self.freeze_time.is_some_and(|t| instant >= t);
        FreezeData {
            started: instant >= self.start_time,
            show_frozen,
            show_final,
        }
    }

    /// Whether submissions are currently accepted and judged
    pub fn is_running(&self, instant: DateTime<Utc>) -> bool {
        self.enabled && instant >= self.start_time && instant < self.end_time
    }

    /// Whether submissions of this contest may be dispatched to a
    /// judgehost at `instant`. The dispatch window runs from activate to
    /// deactivate, not start to end: last-second submissions and
    /// rejudgings started after the contest still get judged. The repo
    /// queries selecting dispatchable work apply the same window.
    pub fn in_dispatch_window(&self, instant: DateTime<Utc>) -> bool {
        self.enabled
            && self.activate_time <= instant
            && self.deactivate_time.is_none_or(|t| t > instant)
    }

    /// Whether `instant` falls after the scoreboard freeze (used to hide
    /// results from the public view)
    pub fn after_freeze(&self, instant: DateTime<Utc>) -> bool {
        self.freeze_time.is_some_and(|t| instant >= t)
    }

    /// Re-derive all timestamps from their authoritative strings. Relative
    /// strings resolve against the (absolute) start time, so the start
    /// string itself must be absolute.
    pub fn derive_times(&mut self) -> AppResult<()> {
        if is_relative(&self.start_time_string) {
            return Err(AppError::Validation(
                "start time must be absolute".to_string(),
            ));
        }
        let start = resolve_time_string(&self.start_time_string, self.start_time)
            .ok_or_else(|| bad_time("start", &self.start_time_string))?;
        self.start_time = start;

        self.activate_time = resolve_time_string(&self.activate_time_string, start)
            .ok_or_else(|| bad_time("activate", &self.activate_time_string))?;
        self.end_time = resolve_time_string(&self.end_time_string, start)
            .ok_or_else(|| bad_time("end", &self.end_time_string))?;
        self.freeze_time = self
            .freeze_time_string
            .as_deref()
            .map(|s| resolve_time_string(s, start).ok_or_else(|| bad_time("freeze", s)))
            .transpose()?;
        self.unfreeze_time = self
            .unfreeze_time_string
            .as_deref()
            .map(|s| resolve_time_string(s, start).ok_or_else(|| bad_time("unfreeze", s)))
            .transpose()?;
        self.deactivate_time = self
            .deactivate_time_string
            .as_deref()
            .map(|s| resolve_time_string(s, start).ok_or_else(|| bad_time("deactivate", s)))
            .transpose()?;

        self.validate_time_order()
    }

    /// Enforce activate <= start <= freeze <= end <= unfreeze <= deactivate
    pub fn validate_time_order(&self) -> AppResult<()> {
        let mut checkpoints: Vec<(&str, DateTime<Utc>)> =
            vec![("activate", self.activate_time), ("start", self.start_time)];
        if let Some(freeze) = self.freeze_time {
            checkpoints.push(("freeze", freeze));
        }
        checkpoints.push(("end", self.end_time));
        if let Some(unfreeze) = self.unfreeze_time {
            checkpoints.push(("unfreeze", unfreeze));
        }
        if let Some(deactivate) = self.deactivate_time {
            checkpoints.push(("deactivate", deactivate));
        }

        for pair in checkpoints.windows(2) {
            if pair[0].1 > pair[1].1 {
                return Err(AppError::Validation(format!(
                    "contest {} time is after {} time",
                    pair[0].0, pair[1].0
                )));
            }
        }
        Ok(())
    }
}

fn bad_time(field: &str, value: &str) -> AppError {
    AppError::Validation(format!("cannot parse {} time '{}'", field, value))
}

/// Problem as configured within a contest
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ContestProblem {
    pub contest_id: i64,
    pub problem_id: i64,
    pub shortname: String,
    pub points: i32,
    pub allow_submit: bool,
    pub allow_judge: bool,
    /// Per-problem override of the global lazy evaluation setting
    pub lazy_eval_results: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn contest() -> Contest {
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();
        Contest {
            id: 1,
            name: "Test Contest".to_string(),
            shortname: "test".to_string(),
            activate_time: start - Duration::hours(1),
            start_time: start,
            freeze_time: Some(start + Duration::hours(4)),
            end_time: start + Duration::hours(5),
            unfreeze_time: Some(start + Duration::hours(7)),
            deactivate_time: None,
            activate_time_string: "-1:00:00".to_string(),
            start_time_string: "2024-06-01T10:00:00Z".to_string(),
            freeze_time_string: Some("+4:00:00".to_string()),
            end_time_string: "+5:00:00".to_string(),
            unfreeze_time_string: Some("+7:00:00".to_string()),
            deactivate_time_string: None,
            enabled: true,
            public: true,
            process_balloons: false,
        }
    }

    #[test]
    fn contest_time_before_start_is_none() {
        let c = contest();
        assert_eq!(c.contest_time(c.start_time - Duration::seconds(1), &[]), None);
        assert_eq!(c.contest_time(c.start_time, &[]), Some(Duration::zero()));
    }

    #[test]
    fn contest_time_subtracts_removed_intervals() {
        let c = contest();
        let interval = RemovedInterval {
            id: 1,
            contest_id: 1,
            start_time: c.start_time + Duration::minutes(60),
            end_time: c.start_time + Duration::minutes(70),
        };

        // before the interval: unaffected
        let t = c.contest_time(c.start_time + Duration::minutes(30), &[interval.clone()]);
        assert_eq!(t, Some(Duration::minutes(30)));

        // inside the interval: clock holds still
        let t = c.contest_time(c.start_time + Duration::minutes(65), &[interval.clone()]);
        assert_eq!(t, Some(Duration::minutes(60)));

        // after the interval: full interval subtracted
        let t = c.contest_time(c.start_time + Duration::minutes(90), &[interval]);
        assert_eq!(t, Some(Duration::minutes(80)));
    }

    #[test]
    fn freeze_lifecycle() {
        let c = contest();

        let before = c.freeze_data(c.start_time + Duration::hours(1));
        assert!(before.started && !before.show_frozen && !before.show_final);

        let frozen = c.freeze_data(c.start_time + Duration::hours(4));
        assert!(frozen.show_frozen && !frozen.show_final);

        // contest over but not yet unfrozen: still frozen
        let ended = c.freeze_data(c.start_time + Duration::hours(6));
        assert!(ended.show_frozen && !ended.show_final);

        let unfrozen = c.freeze_data(c.start_time + Duration::hours(7));
        assert!(!unfrozen.show_frozen && unfrozen.show_final);
    }

    #[test]
    fn dispatch_window_outlives_the_contest() {
        let c = contest();
        // a rejudging started hours after the end must still dispatch
        assert!(c.in_dispatch_window(c.end_time + Duration::hours(3)));
        assert!(c.in_dispatch_window(c.end_time));
        assert!(!c.in_dispatch_window(c.activate_time - Duration::seconds(1)));

        let mut c = contest();
        c.deactivate_time = Some(c.end_time + Duration::hours(12));
        assert!(c.in_dispatch_window(c.end_time + Duration::hours(3)));
        assert!(!c.in_dispatch_window(c.end_time + Duration::hours(12)));

        c.enabled = false;
        assert!(!c.in_dispatch_window(c.start_time));
    }

    #[test]
    fn no_freeze_means_final_at_end() {
        let mut c = contest();
        c.freeze_time = None;
        c.unfreeze_time = None;
        let fd = c.freeze_data(c.end_time);
        assert!(fd.show_final && !fd.show_frozen);
    }

    #[test]
    fn derive_times_resolves_relative_strings() {
        let mut c = contest();
        c.start_time_string = "2024-06-01T12:00:00Z".to_string();
        c.derive_times().unwrap();

        let new_start = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(c.start_time, new_start);
        assert_eq!(c.freeze_time, Some(new_start + Duration::hours(4)));
        assert_eq!(c.end_time, new_start + Duration::hours(5));
        assert_eq!(c.activate_time, new_start - Duration::hours(1));
    }

    #[test]
    fn derive_times_rejects_relative_start() {
        let mut c = contest();
        c.start_time_string = "+0:00:00".to_string();
        assert!(c.derive_times().is_err());
    }

    #[test]
    fn time_order_is_validated() {
        let mut c = contest();
        c.freeze_time = Some(c.end_time + Duration::hours(1));
        assert!(c.validate_time_order().is_err());
    }
}
