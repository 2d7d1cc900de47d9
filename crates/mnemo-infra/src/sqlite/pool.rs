//! Split read/write SQLite pools for the local fallback store.
//!
//! SQLite serializes writers at the database level, so the writer pool
//! holds exactly one connection and queues writes in front of it; a
//! wider read-only pool serves concurrent searches. WAL mode lets the
//! readers proceed while a write is in flight.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Reader connections; searches are short full scans, so a small pool
/// is plenty at fallback scale.
const MAX_READERS: u32 = 8;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired pools over one local database file.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open (creating if absent) the database at `path` and bring its
    /// schema up to date.
    ///
    /// Migrations run on the writer before the reader pool opens, so a
    /// reader never observes a half-migrated schema.
    pub async fn open(path: &Path) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options.clone())
            .await?;

        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(MAX_READERS)
            .connect_with(options.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}
