//! Score and rank cache maintenance

use std::collections::HashMap;

use sqlx::PgPool;
use tracing::info;

use crate::{
    constants::results,
    db::repositories::{ContestRepository, ScoreboardRepository, SubmissionRepository},
    error::{AppError, AppResult},
    models::{Contest, RankCacheRow, RemovedInterval, ScoreCacheCell},
    scoring::{self, AttemptRow, RankedCell, TeamStanding},
    settings::JudgeSettings,
};

/// Keeps the scorecache and rankcache in sync with judging results
pub struct ScoreboardService;

impl ScoreboardService {
    /// Recompute one scoreboard cell from the submission history.
    /// Idempotent; safe to call after any judging change.
    pub async fn recompute_cell(
        pool: &PgPool,
        settings: &JudgeSettings,
        contest: &Contest,
        team_id: i64,
        problem_id: i64,
    ) -> AppResult<()> {
        let removed = ContestRepository::removed_intervals(pool, contest.id).await?;
        let history =
            SubmissionRepository::cell_history(pool, contest.id, team_id, problem_id, contest.end_time)
                .await?;

        let rows: Vec<AttemptRow> = history
            .iter()
            .map(|h| AttemptRow {
                submission_id: h.id,
                contest_seconds: Self::contest_seconds(contest, &removed, h.submit_time),
                after_freeze: contest.after_freeze(h.submit_time),
                result: h.result.clone(),
                verified: h.verified.unwrap_or(false),
            })
            .collect();

        let (restricted, public) = scoring::compute_cell(&rows, settings);

        // first to solve is decided on true results, within the team's
        // sortorder
        let mut is_first_to_solve = false;
        if restricted.is_correct {
            if let Some(correct) = history
                .iter()
                .find(|h| h.result.as_deref() == Some(results::CORRECT))
            {
                let rivals = SubmissionRepository::first_to_solve_rivals(
                    pool,
                    correct.id,
                    settings.verification_required,
                )
                .await?;
                is_first_to_solve =
                    scoring::first_to_solve(correct.id, correct.submit_time, &rivals);
            }
        }

        let cell = ScoreCacheCell {
            contest_id: contest.id,
            team_id,
            problem_id,
            submissions_restricted: restricted.submissions,
            pending_restricted: restricted.pending,
            solve_time_restricted: restricted.solve_time,
            is_correct_restricted: restricted.is_correct,
            submissions_public: public.submissions,
            pending_public: public.pending,
            solve_time_public: public.solve_time,
            is_correct_public: public.is_correct,
            is_first_to_solve,
        };

        let mut tx = pool.begin().await?;
        ScoreboardRepository::lock_cell(&mut *tx, contest.id, team_id, problem_id).await?;
        ScoreboardRepository::upsert_cell(&mut *tx, &cell).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Recompute a team's rank totals from its cached cells
    pub async fn recompute_rank(
        pool: &PgPool,
        settings: &JudgeSettings,
        contest: &Contest,
        team_id: i64,
    ) -> AppResult<()> {
        let points_by_problem = Self::problem_points(pool, contest.id).await?;
        let cells = ScoreboardRepository::team_cells(pool, contest.id, team_id).await?;

        let restricted: Vec<RankedCell> = cells
            .iter()
            .map(|c| RankedCell {
                stats: scoring::CellStats {
                    submissions: c.submissions_restricted,
                    pending: c.pending_restricted,
                    solve_time: c.solve_time_restricted,
                    is_correct: c.is_correct_restricted,
                },
                problem_points: points_by_problem.get(&c.problem_id).copied().unwrap_or(1),
            })
            .collect();
        let public: Vec<RankedCell> = cells
            .iter()
            .map(|c| RankedCell {
                stats: scoring::CellStats {
                    submissions: c.submissions_public,
                    pending: c.pending_public,
                    solve_time: c.solve_time_public,
                    is_correct: c.is_correct_public,
                },
                problem_points: points_by_problem.get(&c.problem_id).copied().unwrap_or(1),
            })
            .collect();

        let (points_restricted, total_time_restricted) = scoring::compute_totals(
            &restricted,
            settings.penalty_time,
            settings.score_in_seconds,
        );
        let (points_public, total_time_public) =
            scoring::compute_totals(&public, settings.penalty_time, settings.score_in_seconds);

        let row = RankCacheRow {
            contest_id: contest.id,
            team_id,
            points_restricted,
            total_time_restricted,
            points_public,
            total_time_public,
        };

        let mut tx = pool.begin().await?;
        ScoreboardRepository::upsert_rank(&mut *tx, &row).await?;
        tx.commit().await?;

        Ok(())
    }

    /// Refresh a cell and the owning team's rank in one go; the usual
    /// entry point after a judging change
    pub async fn refresh(
        pool: &PgPool,
        settings: &JudgeSettings,
        contest: &Contest,
        team_id: i64,
        problem_id: i64,
    ) -> AppResult<()> {
        Self::recompute_cell(pool, settings, contest, team_id, problem_id).await?;
        Self::recompute_rank(pool, settings, contest, team_id).await
    }

    /// Full rebuild: every (team, problem) pair with submissions, then
    /// every rank row, then stale cache rows pruned. The disaster
    /// recovery path; idempotent.
    pub async fn recalculate_all(
        pool: &PgPool,
        settings: &JudgeSettings,
        contest: &Contest,
    ) -> AppResult<u64> {
        let keys = ScoreboardRepository::cell_keys(pool, contest.id).await?;
        let cell_count = keys.len();

        let mut team_ids: Vec<i64> = keys.iter().map(|k| k.team_id).collect();
        team_ids.sort_unstable();
        team_ids.dedup();

        for key in &keys {
            Self::recompute_cell(pool, settings, contest, key.team_id, key.problem_id).await?;
        }
        for team_id in &team_ids {
            Self::recompute_rank(pool, settings, contest, *team_id).await?;
        }
        let pruned = ScoreboardRepository::prune_stale(pool, contest.id).await?;

        info!(
            contest_id = contest.id,
            cells = cell_count,
            teams = team_ids.len(),
            pruned,
            "scoreboard recalculated"
        );
        Ok(pruned)
    }

    /// Ranked standings built from the caches. `restricted` selects the
    /// jury view; the public view shows frozen data.
    pub async fn standings(
        pool: &PgPool,
        settings: &JudgeSettings,
        contest: &Contest,
        restricted: bool,
    ) -> AppResult<Vec<(u32, TeamStanding)>> {
        let teams = ScoreboardRepository::scoreboard_teams(pool, contest.id).await?;
        let cells = ScoreboardRepository::contest_cells(pool, contest.id).await?;
        let ranks = ScoreboardRepository::contest_ranks(pool, contest.id).await?;

        let cells_by_team: HashMap<i64, Vec<&ScoreCacheCell>> =
            cells.iter().fold(HashMap::new(), |mut acc, c| {
                acc.entry(c.team_id).or_default().push(c);
                acc
            });
        let ranks_by_team: HashMap<i64, &RankCacheRow> =
            ranks.iter().map(|r| (r.team_id, r)).collect();

        let standings = teams
            .iter()
            .map(|team| {
                let (points, total_time) = ranks_by_team
                    .get(&team.id)
                    .map(|r| {
                        if restricted {
                            (r.points_restricted, r.total_time_restricted)
                        } else {
                            (r.points_public, r.total_time_public)
                        }
                    })
                    .unwrap_or((0, 0));

                let solve_times = cells_by_team
                    .get(&team.id)
                    .map(|cells| {
                        cells
                            .iter()
                            .filter(|c| {
                                if restricted {
                                    c.is_correct_restricted
                                } else {
                                    c.is_correct_public
                                }
                            })
                            .map(|c| {
                                let secs = if restricted {
                                    c.solve_time_restricted
                                } else {
                                    c.solve_time_public
                                };
                                if settings.score_in_seconds {
                                    secs
                                } else {
                                    secs / 60
                                }
                            })
                            .collect()
                    })
                    .unwrap_or_default();

                TeamStanding {
                    team_id: team.id,
                    sortorder: team.sortorder,
                    points,
                    total_time,
                    solve_times,
                }
            })
            .collect();

        Ok(scoring::rank_standings(standings))
    }

    /// Contest clock seconds for a submission, clamped to the contest
    /// start
    fn contest_seconds(
        contest: &Contest,
        removed: &[RemovedInterval],
        submit_time: chrono::DateTime<chrono::Utc>,
    ) -> i64 {
        let clamped = std::cmp::max(submit_time, contest.start_time);
        contest
            .contest_time(clamped, removed)
            .map(|d| d.num_seconds())
            .unwrap_or(0)
    }

    /// Point values of the problems in a contest
    async fn problem_points(pool: &PgPool, contest_id: i64) -> AppResult<HashMap<i64, i32>> {
        let problems = ContestRepository::contest_problems(pool, contest_id).await?;
        Ok(problems.iter().map(|p| (p.problem_id, p.points)).collect())
    }

    /// Load a contest or fail with not found
    pub async fn load_contest(pool: &PgPool, contest_id: i64) -> AppResult<Contest> {
        ContestRepository::find_by_id(pool, contest_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contest not found".to_string()))
    }
}
