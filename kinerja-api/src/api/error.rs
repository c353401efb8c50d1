//! API Error Handling
//!
//! Unified error types and conversion for API responses. Errors are rendered
//! in the same `{code, status, data}` envelope as successful responses, with
//! the message in `data`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kinerja_core::dto::web::WebResponse;

use crate::service::error::ServiceError;

/// API error type
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    DatabaseError(sqlx::Error),
    InternalError(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn status_text(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT FOUND",
            ApiError::BadRequest(_) => "BAD REQUEST",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "ACCESS NOT ALLOWED",
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => "INTERNAL SERVER ERROR",
        }
    }

    fn envelope(self) -> WebResponse<String> {
        let status = self.status_code();
        let status_text = self.status_text();
        let message = match self {
            ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg)
            | ApiError::Unauthorized(msg)
            | ApiError::Forbidden(msg) => msg,
            ApiError::DatabaseError(err) => {
                tracing::error!("Database error: {:?}", err);
                "Internal server error".to_string()
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                msg
            }
        };
        WebResponse::new(status.as_u16(), status_text, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(self.envelope())).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Validation(msg) => ApiError::BadRequest(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Database(err) => ApiError::DatabaseError(err),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::from(ServiceError::from(err))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::NotFound(String::new()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::BadRequest(String::new()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict(String::new()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Unauthorized(String::new()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::Forbidden(String::new()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::InternalError(String::new()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_service_errors_convert() {
        let err: ApiError = ServiceError::Validation("tahun is required".into()).into();
        assert!(matches!(err, ApiError::BadRequest(ref m) if m == "tahun is required"));

        let err: ApiError = ServiceError::Conflict("duplicate".into()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_envelope_hides_database_details() {
        let body = ApiError::DatabaseError(sqlx::Error::PoolTimedOut).envelope();
        assert_eq!(body.code, 500);
        assert_eq!(body.data, "Internal server error");
    }

    #[test]
    fn test_forbidden_envelope() {
        let body = ApiError::Forbidden("client not allowed".into()).envelope();
        assert_eq!(body.code, 403);
        assert_eq!(body.status, "ACCESS NOT ALLOWED");
        assert_eq!(body.data, "client not allowed");
    }
}
