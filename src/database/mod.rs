//! Helps to connect to the database.
//!
//! Nothing here is global. Open a [`Database`] once and hand a reference to
//! whatever needs storage.

use sqlx::{
    pool::PoolConnection,
    query::Query,
    sqlite::{SqliteArguments, SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::Config, error::DatabaseError};

pub const TAGS_TABLE: &str = "tags";
pub const INGREDIENTS_TABLE: &str = "ingredients";

/// A handle to the SQLite database. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Opens (or creates) the database file named by the config, then runs
    /// migrations on it.
    #[tracing::instrument(skip_all)]
    pub async fn connect(config: &Config) -> Result<Self, DatabaseError> {
        let path = config.database_path();
        tracing::debug!("opening database at `{path}`");

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(true);

        Self::connect_with(options).await
    }

    /// Connects with the given options and migrates.
    pub async fn connect_with(options: SqliteConnectOptions) -> Result<Self, DatabaseError> {
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .inspect_err(|e| tracing::error!("Failed to connect to the database. err: {e}"))
            .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

        // migrations are idempotent, so this is fine on every startup
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .inspect_err(|e| {
                tracing::error!(
                    "Database connection succeeded, but migrating the database failed! err: {e}"
                )
            })?;

        Ok(Self { pool })
    }

    /// The underlying pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Grabs a connection from the pool.
    pub async fn acquire(&self) -> Result<PoolConnection<Sqlite>, DatabaseError> {
        self.pool
            .acquire()
            .await
            .inspect_err(|e| tracing::error!("Failed to get database connection! err: {e}"))
            .map_err(DatabaseError::from)
    }

    /// Closes every connection in the pool.
    pub async fn close(&self) {
        self.pool.close().await
    }
}

/// Something that knows how to write (or overwrite) its own row.
pub trait InsertIntoTable {
    /// Builds the `INSERT ... ON CONFLICT` query for this value.
    fn make_insertion_query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>>;
}
