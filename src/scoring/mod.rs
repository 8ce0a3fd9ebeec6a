//! Pure scoreboard computations, kept free of database access

pub mod cell;
pub mod rank;

pub use cell::{compute_cell, compute_view, first_to_solve, AttemptRow, CellStats, CellView};
pub use rank::{
    cmp_standings, compute_totals, penalty_time, rank_standings, RankedCell, TeamStanding,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::results;
    use crate::settings::JudgeSettings;

    // a single correct submission five minutes in, from cell to totals
    #[test]
    fn solved_submission_flows_into_rank_totals() {
        let settings = JudgeSettings::default();
        let rows = vec![AttemptRow {
            submission_id: 1,
            contest_seconds: 300,
            after_freeze: false,
            result: Some(results::CORRECT.to_string()),
            verified: true,
        }];

        let (restricted, public) = compute_cell(&rows, &settings);
        assert_eq!(restricted.submissions, 1);
        assert_eq!(restricted.pending, 0);
        assert!(restricted.is_correct);
        assert_eq!(restricted.solve_time, 300);
        assert_eq!(public, restricted);

        let cells = [RankedCell {
            stats: restricted,
            problem_points: 1,
        }];
        let (points, total_time) = compute_totals(&cells, settings.penalty_time, false);
        assert_eq!((points, total_time), (1, 5));

        let (points, total_time) = compute_totals(&cells, settings.penalty_time, true);
        assert_eq!((points, total_time), (1, 300));
    }

    // a full recalculation replays the same histories through the same
    // functions, so recomputing must reproduce the cached values exactly
    #[test]
    fn recomputing_from_the_same_history_is_stable() {
        let settings = JudgeSettings::default();
        let rows = vec![
            AttemptRow {
                submission_id: 1,
                contest_seconds: 600,
                after_freeze: false,
                result: Some(results::WRONG_ANSWER.to_string()),
                verified: true,
            },
            AttemptRow {
                submission_id: 2,
                contest_seconds: 900,
                after_freeze: false,
                result: None,
                verified: false,
            },
            AttemptRow {
                submission_id: 3,
                contest_seconds: 1800,
                after_freeze: true,
                result: Some(results::CORRECT.to_string()),
                verified: true,
            },
        ];

        let first = compute_cell(&rows, &settings);
        let second = compute_cell(&rows, &settings);
        assert_eq!(first, second);

        let cells = [RankedCell {
            stats: first.0,
            problem_points: 3,
        }];
        assert_eq!(
            compute_totals(&cells, settings.penalty_time, false),
            compute_totals(&cells, settings.penalty_time, false),
        );
    }
}
