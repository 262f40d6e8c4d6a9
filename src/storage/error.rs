use rusqlite::ErrorCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("{entity} {id} is already persisted; use update instead")]
    AlreadyPersisted { entity: &'static str, id: i64 },
    #[error("{entity} has not been saved yet")]
    NotPersisted { entity: &'static str },
    #[error("{entity} instance is borrowed elsewhere")]
    InstanceBusy { entity: &'static str },
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("sqlite error: {0}")]
    Sqlite(#[source] rusqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        let code = match &err {
            rusqlite::Error::SqliteFailure(failure, _) => Some(failure.code),
            _ => None,
        };

        match code {
            Some(ErrorCode::ConstraintViolation) => {
                StoreError::ConstraintViolation(err.to_string())
            }
            Some(
                ErrorCode::CannotOpen
                | ErrorCode::NotADatabase
                | ErrorCode::PermissionDenied
                | ErrorCode::SystemIoFailure
                | ErrorCode::DatabaseCorrupt
                | ErrorCode::DiskFull,
            ) => StoreError::Connection(err.to_string()),
            _ => StoreError::Sqlite(err),
        }
    }
}
