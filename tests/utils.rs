use sqlx::{migrate::Migrator, sqlite::SqlitePoolOptions, SqlitePool as Pool};

use marketplace::api::State;
use marketplace::catalog::CatalogSqlService;
use marketplace::engagement::EngagementSqlService;
use marketplace::users::UserSqlService;

static MIGRATOR: Migrator = sqlx::migrate!();

pub type AnyHow = Box<dyn std::error::Error>;

/// Fresh in-memory database with the schema applied. A single pooled
/// connection keeps every statement on the same in-memory instance.
pub async fn restore_db() -> Result<Pool, AnyHow> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    MIGRATOR.run(&pool).await?;
    Ok(pool)
}

#[allow(dead_code)]
pub async fn services() -> Result<(UserSqlService, CatalogSqlService, EngagementSqlService), AnyHow>
{
    let pool = restore_db().await?;
    Ok((
        UserSqlService::new(pool.clone()),
        CatalogSqlService::new(pool.clone()),
        EngagementSqlService::new(pool),
    ))
}

#[allow(dead_code)]
pub async fn state() -> Result<State, AnyHow> {
    Ok(State::new(restore_db().await?))
}
