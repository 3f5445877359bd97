// File: prizecode-core/tests/test_utils/mod.rs

use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use tempfile::TempDir;

use prizecode_common::Error;
use prizecode_core::repositories::SqliteCodeRepository;
use prizecode_core::services::{CodeLedger, OutcomeSelector, default_prize_table};

/// Pool over a throwaway on-disk database. A file (not `:memory:`) so every
/// pool connection sees the same data, with a busy timeout so concurrent
/// write transactions wait instead of erroring.
pub async fn create_test_db_pool(dir: &TempDir) -> Result<Pool<Sqlite>, Error> {
    let options = SqliteConnectOptions::new()
        .filename(dir.path().join("ledger.db"))
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// A fully wired ledger over a fresh database, plus the repository for
/// direct row inspection.
pub async fn setup_ledger(dir: &TempDir) -> Result<(CodeLedger, Arc<SqliteCodeRepository>), Error> {
    let pool = create_test_db_pool(dir).await?;
    let repo = Arc::new(SqliteCodeRepository::new(pool));
    repo.init_schema().await?;

    let selector = Arc::new(OutcomeSelector::new(default_prize_table())?);
    let ledger = CodeLedger::new(repo.clone(), selector);
    Ok((ledger, repo))
}
