//! Score and rank cache repository

use sqlx::{FromRow, PgConnection, PgPool};

use crate::{
    error::AppResult,
    models::{Balloon, RankCacheRow, ScoreCacheCell, Team},
};

/// A (team, problem) pair that has submissions in a contest
#[derive(Debug, Clone, Copy, FromRow)]
pub struct CellKey {
    pub team_id: i64,
    pub problem_id: i64,
}

/// Repository for scorecache and rankcache operations
pub struct ScoreboardRepository;

impl ScoreboardRepository {
    /// Serialize concurrent writers of the same cell for the duration of
    /// the surrounding transaction
    pub async fn lock_cell(
        conn: &mut PgConnection,
        contest_id: i64,
        team_id: i64,
        problem_id: i64,
    ) -> AppResult<()> {
        sqlx::query(r#"SELECT pg_advisory_xact_lock(hashtextextended($1, 0))"#)
            .bind(format!("scorecache:{}:{}:{}", contest_id, team_id, problem_id))
            .execute(conn)
            .await?;

        Ok(())
    }

    pub async fn upsert_cell(conn: &mut PgConnection, cell: &ScoreCacheCell) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO scorecache (
                contest_id, team_id, problem_id,
                submissions_restricted, pending_restricted,
                solve_time_restricted, is_correct_restricted,
                submissions_public, pending_public,
                solve_time_public, is_correct_public,
                is_first_to_solve
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (contest_id, team_id, problem_id) DO UPDATE SET
                submissions_restricted = EXCLUDED.submissions_restricted,
                pending_restricted = EXCLUDED.pending_restricted,
                solve_time_restricted = EXCLUDED.solve_time_restricted,
                is_correct_restricted = EXCLUDED.is_correct_restricted,
                submissions_public = EXCLUDED.submissions_public,
                pending_public = EXCLUDED.pending_public,
                solve_time_public = EXCLUDED.solve_time_public,
                is_correct_public = EXCLUDED.is_correct_public,
                is_first_to_solve = EXCLUDED.is_first_to_solve
            "#,
        )
        .bind(cell.contest_id)
        .bind(cell.team_id)
        .bind(cell.problem_id)
        .bind(cell.submissions_restricted)
        .bind(cell.pending_restricted)
        .bind(cell.solve_time_restricted)
        .bind(cell.is_correct_restricted)
        .bind(cell.submissions_public)
        .bind(cell.pending_public)
        .bind(cell.solve_time_public)
        .bind(cell.is_correct_public)
        .bind(cell.is_first_to_solve)
        .execute(conn)
        .await?;

        Ok(())
    }

    pub async fn upsert_rank(conn: &mut PgConnection, row: &RankCacheRow) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rankcache (
                contest_id, team_id,
                points_restricted, total_time_restricted,
                points_public, total_time_public
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (contest_id, team_id) DO UPDATE SET
                points_restricted = EXCLUDED.points_restricted,
                total_time_restricted = EXCLUDED.total_time_restricted,
                points_public = EXCLUDED.points_public,
                total_time_public = EXCLUDED.total_time_public
            "#,
        )
        .bind(row.contest_id)
        .bind(row.team_id)
        .bind(row.points_restricted)
        .bind(row.total_time_restricted)
        .bind(row.points_public)
        .bind(row.total_time_public)
        .execute(conn)
        .await?;

        Ok(())
    }

    /// All cached cells of a team in a contest
    pub async fn team_cells(
        pool: &PgPool,
        contest_id: i64,
        team_id: i64,
    ) -> AppResult<Vec<ScoreCacheCell>> {
        let cells = sqlx::query_as::<_, ScoreCacheCell>(
            r#"SELECT * FROM scorecache WHERE contest_id = $1 AND team_id = $2"#,
        )
        .bind(contest_id)
        .bind(team_id)
        .fetch_all(pool)
        .await?;

        Ok(cells)
    }

    /// All cached cells of a contest
    pub async fn contest_cells(pool: &PgPool, contest_id: i64) -> AppResult<Vec<ScoreCacheCell>> {
        let cells = sqlx::query_as::<_, ScoreCacheCell>(
            r#"SELECT * FROM scorecache WHERE contest_id = $1"#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(cells)
    }

    pub async fn contest_ranks(pool: &PgPool, contest_id: i64) -> AppResult<Vec<RankCacheRow>> {
        let rows =
            sqlx::query_as::<_, RankCacheRow>(r#"SELECT * FROM rankcache WHERE contest_id = $1"#)
                .bind(contest_id)
                .fetch_all(pool)
                .await?;

        Ok(rows)
    }

    /// Teams that appear on the scoreboard of a contest
    pub async fn scoreboard_teams(pool: &PgPool, contest_id: i64) -> AppResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT DISTINCT t.* FROM team t
            JOIN submission s ON s.team_id = t.id
            WHERE s.contest_id = $1 AND t.enabled
            ORDER BY t.sortorder, t.id
            "#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(teams)
    }

    /// (team, problem) pairs with valid submissions, the set a full
    /// recalculation must cover
    pub async fn cell_keys(pool: &PgPool, contest_id: i64) -> AppResult<Vec<CellKey>> {
        let keys = sqlx::query_as::<_, CellKey>(
            r#"
            SELECT DISTINCT team_id, problem_id FROM submission
            WHERE contest_id = $1 AND valid
            "#,
        )
        .bind(contest_id)
        .fetch_all(pool)
        .await?;

        Ok(keys)
    }

    /// Drop cache rows for (team, problem) pairs that no longer have
    /// valid submissions
    pub async fn prune_stale(pool: &PgPool, contest_id: i64) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM scorecache sc
            WHERE sc.contest_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM submission s
                  WHERE s.contest_id = sc.contest_id
                    AND s.team_id = sc.team_id
                    AND s.problem_id = sc.problem_id
                    AND s.valid
              )
            "#,
        )
        .bind(contest_id)
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM rankcache rc
            WHERE rc.contest_id = $1
              AND NOT EXISTS (
                  SELECT 1 FROM scorecache sc
                  WHERE sc.contest_id = rc.contest_id AND sc.team_id = rc.team_id
              )
            "#,
        )
        .bind(contest_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Record a balloon owed for a correct submission; at most one per
    /// submission
    pub async fn add_balloon(pool: &PgPool, submission_id: i64) -> AppResult<Option<Balloon>> {
        let balloon = sqlx::query_as::<_, Balloon>(
            r#"
            INSERT INTO balloon (submission_id)
            VALUES ($1)
            ON CONFLICT (submission_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(submission_id)
        .fetch_optional(pool)
        .await?;

        Ok(balloon)
    }
}
