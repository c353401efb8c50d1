//! Success responses
//!
//! Every handler answers with the `{code, status, data}` envelope and an HTTP
//! status equal to `code`.

use axum::{Json, http::StatusCode};
use kinerja_core::dto::web::{MessageResponse, WebResponse};

use crate::api::error::{ApiError, ApiResult};

pub type ApiResponse<T> = ApiResult<(StatusCode, Json<WebResponse<T>>)>;
pub type ApiMessage = ApiResult<(StatusCode, Json<MessageResponse>)>;

pub fn ok<T>(status: &str, data: T) -> ApiResponse<T> {
    Ok((StatusCode::OK, Json(WebResponse::ok(status, data))))
}

pub fn created<T>(status: &str, data: T) -> ApiResponse<T> {
    Ok((StatusCode::CREATED, Json(WebResponse::created(status, data))))
}

/// 200 with `"data": null`
pub fn message(status: &str) -> ApiMessage {
    Ok((StatusCode::OK, Json(WebResponse::ok(status, None))))
}

/// Numeric path segment (ids, years), rejected in the envelope rather than as plain text
pub fn parse_id(raw: &str) -> ApiResult<i32> {
    raw.trim()
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("invalid path parameter: {}", raw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_uses_201() {
        let (status, Json(body)) = created("CREATED", 7).unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.code, 201);
        assert_eq!(body.data, 7);
    }

    #[test]
    fn test_message_has_no_data() {
        let (status, Json(body)) = message("Success Delete Pohon Kinerja").unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "Success Delete Pohon Kinerja");
        assert!(body.data.is_none());
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }
}
