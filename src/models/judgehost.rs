//! Judgehost and restriction models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Judgehost database model
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Judgehost {
    pub hostname: String,
    pub active: bool,
    /// Last time the host asked for work
    pub poll_time: Option<DateTime<Utc>>,
    pub restriction_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgehostHealth {
    Ok,
    Warning,
    Critical,
}

impl Judgehost {
    /// Health from the last poll time against the configured thresholds
    pub fn health(
        &self,
        now: DateTime<Utc>,
        warning_secs: i64,
        critical_secs: i64,
    ) -> JudgehostHealth {
        let Some(poll_time) = self.poll_time else {
            return JudgehostHealth::Critical;
        };
        let silent = (now - poll_time).num_seconds();
        if silent >= critical_secs {
            JudgehostHealth::Critical
        } else if silent >= warning_secs {
            JudgehostHealth::Warning
        } else {
            JudgehostHealth::Ok
        }
    }
}

/// Limits which submissions a judgehost may pick up. Empty lists mean
/// no restriction on that attribute.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct JudgehostRestriction {
    pub id: i64,
    pub name: String,
    pub contest_ids: Vec<i64>,
    pub problem_ids: Vec<i64>,
    pub language_ids: Vec<String>,
    /// Allow this host to rejudge submissions it judged itself
    pub rejudge_own: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn health_thresholds() {
        let now = Utc::now();
        let mut host = Judgehost {
            hostname: "judge-1".to_string(),
            active: true,
            poll_time: Some(now - Duration::seconds(5)),
            restriction_id: None,
        };
        assert_eq!(host.health(now, 30, 120), JudgehostHealth::Ok);

        host.poll_time = Some(now - Duration::seconds(45));
        assert_eq!(host.health(now, 30, 120), JudgehostHealth::Warning);

        host.poll_time = Some(now - Duration::seconds(300));
        assert_eq!(host.health(now, 30, 120), JudgehostHealth::Critical);

        host.poll_time = None;
        assert_eq!(host.health(now, 30, 120), JudgehostHealth::Critical);
    }
}
