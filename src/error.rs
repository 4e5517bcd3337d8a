use thiserror::Error;

/// Failures surfaced by the persistence gateway.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("blog {id} was modified concurrently (expected version {expected})")]
    VersionConflict { id: i64, expected: i64 },

    #[error("corrupt row: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Errors returned by the blog, comment and report services.
#[derive(Error, Debug)]
pub enum BlogError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("{0}")]
    Validation(String),

    #[error("blog {0} is being modified concurrently, try again")]
    Conflict(i64),

    #[error("storage failure: {0}")]
    Storage(String),
}

impl BlogError {
    pub fn validation(msg: impl Into<String>) -> Self {
        BlogError::Validation(msg.into())
    }
}

impl From<StoreError> for BlogError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity, id } => BlogError::NotFound { entity, id },
            StoreError::VersionConflict { id, .. } => BlogError::Conflict(id),
            other => BlogError::Storage(other.to_string()),
        }
    }
}

pub type BlogResult<T> = std::result::Result<T, BlogError>;
