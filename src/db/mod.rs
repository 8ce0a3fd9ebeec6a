//! Persistence layer: pool setup, embedded migrations and the
//! repository types the services talk to.

pub mod connection;
pub mod repositories;

use sqlx::PgPool;

pub use connection::*;

/// Apply the judge schema migrations at startup
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
