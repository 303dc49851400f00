use core::error::Error;
use pisserror::Error;

/// Stick this at the end of bug warnings/errors.
///
/// It helps operators find out where to report bugs when looking at logs.
pub const BUG_MSG: &str =
    "this is a bug, so please report it! you can do so by opening an issue on the pantry repo.";

#[derive(Debug, Error)]
pub enum PantryError {
    #[error("The database has encountered an error. See: `{_0}`")]
    Database(#[from] DatabaseError),

    /// A required field was missing, empty, or out of range.
    #[error("Invalid argument: {_0}")]
    InvalidArgument(String),

    /// No caller identity came with the request.
    #[error("Authentication credentials were not provided.")]
    Unauthenticated,

    /// The record doesn't exist, or the caller doesn't own it. Callers can't
    /// tell the two apart.
    #[error("No {what} with id `{id}` was found.")]
    NotFound { what: &'static str, id: i64 },

    #[error("Failed to hash or parse a password hash. See: `{_0}`")]
    PasswordHash(String),

    #[error("Failed to write the uploaded file at `{path}`. Err: `{err}`.")]
    Io { path: String, err: std::io::Error },
}

impl From<sqlx::Error> for PantryError {
    fn from(value: sqlx::Error) -> Self {
        Self::Database(DatabaseError::from(value))
    }
}

impl PantryError {
    /// Shorthand for the "missing or not yours" case.
    pub(crate) fn not_found(what: &'static str, id: i64) -> Self {
        Self::NotFound { what, id }
    }
}

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("General database error. See: {_0}")]
    GeneralDatabaseError(#[from] sqlx::Error),

    #[error("Failed to connect to the database. See: {_0}")]
    ConnectionError(String),

    #[error("Migrating the database failed. See: {_0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    #[error("Couldn't continue with database insertion. See: {_0}")]
    InsertionFailed(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    /// during fs read from disk
    #[error("Failed to read config file. See: `{_0}`")]
    ReadFailed(#[from] tokio::io::Error),

    /// parsing
    #[error("Failed to parse config file. See: `{_0}`")]
    ParseFailed(#[from] toml::de::Error),

    /// when we read from disk, the paths should be equal
    #[error("The config file had a data directory that didn't match the one it was loaded from.")]
    PathMismatch,
}
