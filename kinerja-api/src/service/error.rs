//! Service Errors
//!
//! Error type shared by every service, plus the mapping from database errors.

use thiserror::Error;

/// Postgres SQLSTATE for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";
/// Postgres SQLSTATE for foreign key violations
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl ServiceError {
    pub fn not_found(what: &str, key: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{} {} not found", what, key))
    }
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            match db.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return ServiceError::Conflict(format!(
                        "duplicate data: {}",
                        db.constraint().unwrap_or("unique key")
                    ));
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return ServiceError::Validation(format!(
                        "referenced data does not exist: {}",
                        db.constraint().unwrap_or("foreign key")
                    ));
                }
                _ => {}
            }
        }
        ServiceError::Database(err)
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = ServiceError::not_found("opd", "1.01");
        assert_eq!(err.to_string(), "opd 1.01 not found");
    }

    #[test]
    fn test_plain_sqlx_errors_stay_database_errors() {
        let err = ServiceError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ServiceError::Database(_)));
    }
}
