//! Roster Storage
//!
//! `SQLite` Record Store for Roster user records.
//!
//! # Architecture
//!
//! - **Deferred queries in, one statement out**: every `UserQuery` is
//!   rendered to a single SQL statement when it is fetched
//! - **Projection in SQL**: contact queries select only `name, mail`
//! - **Batched writes**: bulk creation is one transaction, one commit
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_core::filter::predicates;
//! use roster_core::query::UserQuery;
//! use roster_storage::{create_pool, run_migrations, LocalStorageContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://roster.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = LocalStorageContext::new(pool);
//!
//! let contacts = UserQuery::all()
//!     .filter(predicates::active_users())
//!     .select_contacts()
//!     .fetch_all(&storage)
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod context;

pub mod users;

pub use context::LocalStorageContext;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;
use std::time::Duration;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Connection pool tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    /// Upper bound on open connections
    pub max_connections: u32,
    /// How long a statement waits on a locked database
    pub busy_timeout: Duration,
    /// How long a caller waits for a free connection
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            busy_timeout: Duration::from_secs(30),
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool with default settings
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://roster.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with(database_url, PoolSettings::default()).await
}

/// Create a new `SQLite` pool
///
/// # Errors
///
/// Returns an error if the URL is malformed, the database directory cannot
/// be created, or the connection fails
pub async fn create_pool_with(
    database_url: &str,
    settings: PoolSettings,
) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(database_url, "creating pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(settings.busy_timeout);

    // SQLite creates the file but not its directory
    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await?;

    tracing::info!(
        max_connections = settings.max_connections,
        "database pool ready"
    );

    Ok(pool)
}
