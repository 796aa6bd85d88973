//! SQLite connection management.
//!
//! Two pools over one database file: reads fan out across several
//! connections while every write funnels through a single one, matching
//! SQLite's one-writer rule instead of fighting it. WAL journal mode
//! keeps readers from blocking that writer. Migrations run on the write
//! pool before the read pool ever connects, so a reader never sees a
//! half-migrated schema.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

const MAX_READERS: u32 = 8;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Paired read/write pools for one SQLite database.
#[derive(Clone)]
pub struct DatabasePool {
    pub reader: SqlitePool,
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the database, apply pending migrations, and return the pool
    /// pair. The database file is created when missing; foreign keys are
    /// enforced on every connection.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true)
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

/// Resolve the data directory from `ENGITUTOR_DATA_DIR`, falling back to
/// `~/.engitutor`. The caller is responsible for creating it.
pub fn resolve_data_dir() -> std::path::PathBuf {
    std::env::var("ENGITUTOR_DATA_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            std::path::PathBuf::from(home).join(".engitutor")
        })
}

/// Returns the default database URL inside [`resolve_data_dir`].
pub fn default_database_url() -> String {
    format!("sqlite://{}/engitutor.db", resolve_data_dir().display())
}
