//! SQLite pool construction and schema migrations.
//!
//! The server's `--migrate` run mode and the test suites share the same
//! embedded migrator, so the schema has a single source of truth in the
//! `migrations/` directory.

use sqlx::{
    SqlitePool,
    migrate::{MigrateError, Migrator},
    sqlite::SqlitePoolOptions,
};

/// Migrations embedded at compile time from `migrations/`.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a connection pool against the configured database URL.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Open a single-connection in-memory database.
///
/// SQLite `:memory:` databases exist per connection, so the pool is
/// pinned to exactly one. Used by the test suites.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
}

/// Apply any pending migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
