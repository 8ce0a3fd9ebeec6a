//! Rank totals and standings ordering

use std::cmp::Ordering;

use super::cell::CellStats;

/// A solved cell's contribution to the rank totals
#[derive(Debug, Clone, Copy)]
pub struct RankedCell {
    pub stats: CellStats,
    /// Point value of the problem in this contest
    pub problem_points: i32,
}

/// Penalty time for a solved problem: each wrong attempt before the
/// correct one costs `penalty_time` minutes. Zero for unsolved problems.
pub fn penalty_time(stats: &CellStats, penalty_minutes: i64, score_in_seconds: bool) -> i64 {
    if !stats.is_correct {
        return 0;
    }
    let unit = if score_in_seconds { 60 } else { 1 };
    i64::from(stats.submissions - 1) * penalty_minutes * unit
}

/// Solve time in scoreboard units: whole minutes, or seconds when
/// `score_in_seconds` is set
pub fn solve_time_units(stats: &CellStats, score_in_seconds: bool) -> i64 {
    if score_in_seconds {
        stats.solve_time
    } else {
        stats.solve_time / 60
    }
}

/// Total points and total time over a team's cells
pub fn compute_totals(
    cells: &[RankedCell],
    penalty_minutes: i64,
    score_in_seconds: bool,
) -> (i32, i64) {
    let mut points = 0;
    let mut total_time = 0;
    for cell in cells {
        if cell.stats.is_correct {
            points += cell.problem_points;
            total_time += solve_time_units(&cell.stats, score_in_seconds)
                + penalty_time(&cell.stats, penalty_minutes, score_in_seconds);
        }
    }
    (points, total_time)
}

/// One team's totals, ready for ordering
#[derive(Debug, Clone)]
pub struct TeamStanding {
    pub team_id: i64,
    pub sortorder: i32,
    pub points: i32,
    pub total_time: i64,
    /// Solve times of all solved problems, in scoreboard units
    pub solve_times: Vec<i64>,
}

/// Standings comparator: higher points first, then lower total time,
/// then earlier individual solve times compared latest-first. Teams
/// that compare equal share a rank.
pub fn cmp_standings(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(a.total_time.cmp(&b.total_time))
        .then_with(|| {
            let mut a_times = a.solve_times.clone();
            let mut b_times = b.solve_times.clone();
            a_times.sort_unstable_by(|x, y| y.cmp(x));
            b_times.sort_unstable_by(|x, y| y.cmp(x));
            a_times.cmp(&b_times)
        })
}

/// Sort standings within each sortorder group and assign ranks; tied
/// teams receive the same rank. Returns (rank, standing) pairs in
/// display order.
pub fn rank_standings(mut standings: Vec<TeamStanding>) -> Vec<(u32, TeamStanding)> {
    standings.sort_by(|a, b| a.sortorder.cmp(&b.sortorder).then_with(|| cmp_standings(a, b)));

    let mut ranked = Vec::with_capacity(standings.len());
    let mut rank = 0u32;
    let mut pos_in_group = 0u32;
    let mut prev: Option<TeamStanding> = None;

    for standing in standings {
        let same_group = prev.as_ref().is_some_and(|p| p.sortorder == standing.sortorder);
        if !same_group {
            pos_in_group = 0;
        }
        pos_in_group += 1;

        let tied = same_group
            && prev
                .as_ref()
                .is_some_and(|p| cmp_standings(p, &standing) == Ordering::Equal);
        if !tied {
            rank = pos_in_group;
        }
        prev = Some(standing.clone());
        ranked.push((rank, standing));
    }
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solved(secs: i64, attempts: i32) -> CellStats {
        CellStats {
            submissions: attempts,
            pending: 0,
            solve_time: secs,
            is_correct: true,
        }
    }

    #[test]
    fn penalty_counts_wrong_attempts_before_correct() {
        // 3 wrong then correct at 100 minutes, 20 minute penalty
        let stats = solved(6000, 4);
        assert_eq!(penalty_time(&stats, 20, false), 60);

        let (points, time) = compute_totals(
            &[RankedCell {
                stats,
                problem_points: 1,
            }],
            20,
            false,
        );
        assert_eq!(points, 1);
        assert_eq!(time, 160);
    }

    #[test]
    fn unsolved_contributes_nothing() {
        let stats = CellStats {
            submissions: 5,
            pending: 1,
            solve_time: 0,
            is_correct: false,
        };
        assert_eq!(penalty_time(&stats, 20, false), 0);
        let (points, time) = compute_totals(
            &[RankedCell {
                stats,
                problem_points: 1,
            }],
            20,
            false,
        );
        assert_eq!((points, time), (0, 0));
    }

    #[test]
    fn score_in_seconds_scales_penalty_and_time() {
        let stats = solved(90, 2);
        assert_eq!(solve_time_units(&stats, false), 1);
        assert_eq!(solve_time_units(&stats, true), 90);
        assert_eq!(penalty_time(&stats, 20, true), 1200);
    }

    fn standing(team_id: i64, points: i32, total_time: i64, solve_times: Vec<i64>) -> TeamStanding {
        TeamStanding {
            team_id,
            sortorder: 0,
            points,
            total_time,
            solve_times,
        }
    }

    #[test]
    fn points_dominate_time() {
        let a = standing(1, 3, 500, vec![100, 200, 200]);
        let b = standing(2, 2, 100, vec![40, 60]);
        assert_eq!(cmp_standings(&a, &b), Ordering::Less);
    }

    #[test]
    fn lower_time_wins_equal_points() {
        let a = standing(1, 2, 300, vec![100, 200]);
        let b = standing(2, 2, 280, vec![140, 140]);
        assert_eq!(cmp_standings(&a, &b), Ordering::Greater);
    }

    #[test]
    fn earlier_last_correct_breaks_time_tie() {
        let a = standing(1, 2, 300, vec![100, 200]);
        let b = standing(2, 2, 300, vec![120, 180]);
        assert_eq!(cmp_standings(&a, &b), Ordering::Greater);
    }

    #[test]
    fn full_tie_shares_rank() {
        let a = standing(1, 2, 300, vec![100, 200]);
        let b = standing(2, 2, 300, vec![200, 100]);
        assert_eq!(cmp_standings(&a, &b), Ordering::Equal);

        let ranked = rank_standings(vec![a, b, standing(3, 1, 50, vec![50])]);
        assert_eq!(ranked[0].0, 1);
        assert_eq!(ranked[1].0, 1);
        assert_eq!(ranked[2].0, 3);
    }

    #[test]
    fn sortorder_groups_rank_independently() {
        let mut a = standing(1, 1, 100, vec![100]);
        let mut b = standing(2, 3, 100, vec![20, 30, 50]);
        a.sortorder = 0;
        b.sortorder = 1;
        let ranked = rank_standings(vec![b, a]);
        // each group starts at rank 1
        assert_eq!(ranked[0].1.team_id, 1);
        assert_eq!(ranked[0].0, 1);
        assert_eq!(ranked[1].1.team_id, 2);
        assert_eq!(ranked[1].0, 1);
    }
}
