use diesel::r2d2::PoolError;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

/// Result type returned by repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Failures surfaced by the repositories.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No record matched the supplied identifier.
    #[error("record not found")]
    NotFound,
    /// A category with the same name already exists.
    #[error("a category with this name already exists")]
    DuplicateName,
    /// The referenced category does not exist.
    #[error("invalid category selected")]
    InvalidCategory,
    /// The category is still assigned to products and cannot be deleted.
    #[error("category is assigned to {0} product(s)")]
    CategoryInUse(i64),
    /// A required field is missing or empty.
    #[error("validation failed: {0}")]
    Validation(String),
    /// A list column could not be encoded or decoded.
    #[error("failed to convert list column: {0}")]
    Serialization(#[from] serde_json::Error),
    /// No connection could be checked out of the pool.
    #[error("connection pool error: {0}")]
    Pool(#[from] PoolError),
    /// Any other database failure.
    #[error("database error: {0}")]
    Database(DieselError),
}

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,
            // `categories.name` carries the only unique constraint a caller can hit.
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                RepositoryError::DuplicateName
            }
            other => RepositoryError::Database(other),
        }
    }
}
