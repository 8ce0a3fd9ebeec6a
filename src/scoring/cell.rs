//! Scoreboard cell computation
//!
//! Pure computation over the judged history of one (team, problem) pair.
//! The restricted view reflects true results; the public view treats
//! every submission after the scoreboard freeze as pending.

use chrono::{DateTime, Utc};

use crate::constants::results;
use crate::settings::JudgeSettings;

/// One submission in a (team, problem) history, ordered by submit time
/// then id.
#[derive(Debug, Clone)]
pub struct AttemptRow {
    pub submission_id: i64,
    /// Contest time at submission, in seconds, clamped at zero
    pub contest_seconds: i64,
    pub after_freeze: bool,
    /// Result of the valid judging; `None` while unjudged
    pub result: Option<String>,
    pub verified: bool,
}

/// One side (restricted or public) of a scoreboard cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellStats {
    /// Counted attempts, including the correct one
    pub submissions: i32,
    pub pending: i32,
    /// Contest time of the first correct submission, in seconds
    pub solve_time: i64,
    pub is_correct: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Restricted,
    Public,
}

/// Compute one view of a cell.
///
/// Attempts count up to and including the first correct submission;
/// later submissions are ignored. A submission with no visible result
/// counts as pending without counting as an attempt. Compiler errors
/// are skipped entirely unless `compile_penalty` is set.
pub fn compute_view(rows: &[AttemptRow], settings: &JudgeSettings, view: CellView) -> CellStats {
    let mut stats = CellStats::default();

    for row in rows {
        let visible_result = match view {
            CellView::Public if row.after_freeze => None,
            _ => row.result.as_deref(),
        };
        // unverified results are hidden while verification is required
        let visible_result = match visible_result {
            Some(_) if settings.verification_required && !row.verified => None,
            other => other,
        };

        match visible_result {
            None => {
                stats.pending += 1;
            }
            Some(results::COMPILER_ERROR) if !settings.compile_penalty => {}
            Some(result) => {
                stats.submissions += 1;
                if result == results::CORRECT {
                    stats.solve_time = row.contest_seconds.max(0);
                    stats.is_correct = true;
                    break;
                }
            }
        }
    }

    stats
}

/// Whether a solving submission beats every rival in its sortorder
/// group. Rivals are the other correct or still-pending submissions on
/// the problem; ties on submit time go to the lowest submission id.
pub fn first_to_solve(
    candidate_id: i64,
    candidate_time: DateTime<Utc>,
    rivals: &[(i64, DateTime<Utc>)],
) -> bool {
    rivals.iter().all(|&(id, time)| {
        time > candidate_time || (time == candidate_time && id > candidate_id)
    })
}

/// Compute both views of a cell from one history
pub fn compute_cell(rows: &[AttemptRow], settings: &JudgeSettings) -> (CellStats, CellStats) {
    (
        compute_view(rows, settings, CellView::Restricted),
        compute_view(rows, settings, CellView::Public),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, secs: i64, result: Option<&str>) -> AttemptRow {
        AttemptRow {
            submission_id: id,
            contest_seconds: secs,
            after_freeze: false,
            result: result.map(String::from),
            verified: true,
        }
    }

    fn settings() -> JudgeSettings {
        JudgeSettings::default()
    }

    #[test]
    fn counts_attempts_up_to_first_correct() {
        let rows = vec![
            row(1, 600, Some(results::WRONG_ANSWER)),
            row(2, 1200, Some(results::TIMELIMIT)),
            row(3, 1800, Some(results::CORRECT)),
            row(4, 2400, Some(results::WRONG_ANSWER)),
        ];
        let stats = compute_view(&rows, &settings(), CellView::Restricted);
        assert_eq!(stats.submissions, 3);
        assert_eq!(stats.pending, 0);
        assert_eq!(stats.solve_time, 1800);
        assert!(stats.is_correct);
    }

    #[test]
    fn unjudged_counts_as_pending_not_attempt() {
        let rows = vec![
            row(1, 600, Some(results::WRONG_ANSWER)),
            row(2, 1200, None),
        ];
        let stats = compute_view(&rows, &settings(), CellView::Restricted);
        assert_eq!(stats.submissions, 1);
        assert_eq!(stats.pending, 1);
        assert!(!stats.is_correct);
    }

    #[test]
    fn compiler_error_skipped_without_penalty() {
        let rows = vec![
            row(1, 600, Some(results::COMPILER_ERROR)),
            row(2, 1200, Some(results::CORRECT)),
        ];
        let mut s = settings();
        s.compile_penalty = false;
        let stats = compute_view(&rows, &s, CellView::Restricted);
        assert_eq!(stats.submissions, 1);

        s.compile_penalty = true;
        let stats = compute_view(&rows, &s, CellView::Restricted);
        assert_eq!(stats.submissions, 2);
    }

    #[test]
    fn unverified_hidden_when_verification_required() {
        let mut rows = vec![row(1, 600, Some(results::CORRECT))];
        rows[0].verified = false;

        let mut s = settings();
        s.verification_required = true;
        let stats = compute_view(&rows, &s, CellView::Restricted);
        assert_eq!(stats.pending, 1);
        assert!(!stats.is_correct);

        s.verification_required = false;
        let stats = compute_view(&rows, &s, CellView::Restricted);
        assert!(stats.is_correct);
    }

    #[test]
    fn verified_result_scores_under_required_verification() {
        // a judging verified by the time the cell is recomputed scores
        // immediately, it never sits in pending
        let rows = vec![row(1, 600, Some(results::CORRECT))];
        let mut s = settings();
        s.verification_required = true;
        let stats = compute_view(&rows, &s, CellView::Restricted);
        assert!(stats.is_correct);
        assert_eq!(stats.pending, 0);
    }

    #[test]
    fn public_view_hides_results_after_freeze() {
        let mut rows = vec![
            row(1, 600, Some(results::WRONG_ANSWER)),
            row(2, 15000, Some(results::CORRECT)),
        ];
        rows[1].after_freeze = true;

        let (restricted, public) = compute_cell(&rows, &settings());
        assert!(restricted.is_correct);
        assert_eq!(restricted.submissions, 2);

        assert!(!public.is_correct);
        assert_eq!(public.submissions, 1);
        assert_eq!(public.pending, 1);
    }

    #[test]
    fn correct_before_freeze_visible_publicly() {
        let rows = vec![row(1, 600, Some(results::CORRECT))];
        let (_, public) = compute_cell(&rows, &settings());
        assert!(public.is_correct);
        assert_eq!(public.solve_time, 600);
    }

    #[test]
    fn negative_contest_time_clamped_to_zero() {
        let rows = vec![row(1, -30, Some(results::CORRECT))];
        let stats = compute_view(&rows, &settings(), CellView::Restricted);
        assert_eq!(stats.solve_time, 0);
    }

    #[test]
    fn empty_history_gives_empty_cell() {
        let stats = compute_view(&[], &settings(), CellView::Restricted);
        assert_eq!(stats, CellStats::default());
    }

    #[test]
    fn first_to_solve_ties_break_on_lowest_submission_id() {
        use chrono::{Duration, TimeZone};
        let t = Utc.with_ymd_and_hms(2024, 6, 1, 11, 0, 0).unwrap();

        assert!(first_to_solve(10, t, &[]));
        assert!(first_to_solve(10, t, &[(11, t)]));
        assert!(!first_to_solve(11, t, &[(10, t)]));

        // an earlier rival wins outright, a pending one included
        assert!(!first_to_solve(10, t, &[(11, t - Duration::seconds(1))]));
        assert!(first_to_solve(10, t, &[(11, t + Duration::seconds(1))]));
    }
}
