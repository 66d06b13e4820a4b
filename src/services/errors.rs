use thiserror::Error;

use crate::repository::RepositoryError;

/// Result type returned by service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Submitted data failed validation.
    #[error("{0}")]
    Form(String),
    /// The requested record does not exist.
    #[error("not found")]
    NotFound,
    /// A category with the same name already exists.
    #[error("a category with this name already exists")]
    DuplicateName,
    /// The referenced category does not exist.
    #[error("invalid category selected, please choose a valid category")]
    InvalidCategory,
    /// The category is still assigned to products.
    #[error(
        "cannot delete category, it is assigned to {0} product(s); reassign them to a different category first"
    )]
    CategoryInUse(i64),
    /// Unexpected failure; details are logged where it happened.
    #[error("internal error")]
    Internal,
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::DuplicateName => ServiceError::DuplicateName,
            RepositoryError::InvalidCategory => ServiceError::InvalidCategory,
            RepositoryError::CategoryInUse(count) => ServiceError::CategoryInUse(count),
            RepositoryError::Validation(message) => ServiceError::Form(message),
            RepositoryError::Serialization(_)
            | RepositoryError::Pool(_)
            | RepositoryError::Database(_) => ServiceError::Internal,
        }
    }
}

/// Log a repository failure with `context` and convert it.
///
/// Expected outcomes such as missing records are logged at `warn`, everything
/// else at `error`.
pub(crate) fn log_repository_error(context: &str, err: RepositoryError) -> ServiceError {
    match &err {
        RepositoryError::Serialization(_)
        | RepositoryError::Pool(_)
        | RepositoryError::Database(_) => log::error!("{context}: {err}"),
        _ => log::warn!("{context}: {err}"),
    }
    ServiceError::from(err)
}
