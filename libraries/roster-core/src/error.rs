/// Core error types for Roster
use thiserror::Error;

/// Result type alias using `RosterError`
pub type Result<T> = std::result::Result<T, RosterError>;

/// Core error type for Roster
#[derive(Error, Debug)]
pub enum RosterError {
    /// The Record Store could not be reached (pool timeout, closed pool, I/O)
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A write was rejected by the store's integrity rules
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Entity not found (mutations only; lookups return `Option`)
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record
        entity: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Schema migration failure
    #[error("Migration error: {0}")]
    Migration(String),

    /// Any other database error
    #[error("Database error: {0}")]
    Database(String),
}

impl RosterError {
    /// Create a store-unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create a constraint violation error
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::ConstraintViolation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether the error came from the store's integrity rules
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation(_))
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for RosterError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        match err {
            sqlx::Error::Database(ref db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => Self::ConstraintViolation(db_err.message().to_string()),
                _ => Self::Database(err.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::WorkerCrashed => Self::Unavailable(err.to_string()),
            sqlx::Error::RowNotFound => Self::not_found("Row", "unknown"),
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::migrate::MigrateError> for RosterError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        Self::Migration(err.to_string())
    }
}
