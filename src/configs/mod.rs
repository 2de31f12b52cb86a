use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::api::error;

pub async fn connect_database(database_url: &str) -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(database_url)
        .await?;
    Ok(pool)
}

const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS applications (
        id               TEXT PRIMARY KEY,
        name             TEXT NOT NULL,
        email            TEXT NOT NULL,
        phone            TEXT NOT NULL,
        experience       TEXT NOT NULL DEFAULT '',
        message          TEXT NOT NULL DEFAULT '',
        files            TEXT,
        status           TEXT NOT NULL DEFAULT 'pending',
        archived         BOOLEAN NOT NULL DEFAULT FALSE,
        archived_at      TIMESTAMPTZ,
        auto_delete_date TIMESTAMPTZ,
        created_at       TIMESTAMPTZ NOT NULL,
        updated_at       TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS applications_archived_created_idx ON applications (archived, created_at DESC)",
    r#"
    CREATE TABLE IF NOT EXISTS page_views (
        date  DATE PRIMARY KEY,
        views BIGINT NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS social_analytics (
        date     DATE NOT NULL,
        platform TEXT NOT NULL,
        clicks   BIGINT NOT NULL DEFAULT 0,
        PRIMARY KEY (date, platform)
    )
    "#,
];

/// Creates the tables the repositories expect. Safe to run on every start.
pub async fn init_schema(pool: &PgPool) -> Result<(), error::SystemError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    log::info!("Database schema ready");
    Ok(())
}
