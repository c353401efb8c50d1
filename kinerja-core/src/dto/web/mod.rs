//! Response envelope shared by every endpoint

use serde::{Deserialize, Serialize};

/// `{ "code": 200, "status": "success get opd", "data": ... }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebResponse<T> {
    pub code: u16,
    pub status: String,
    pub data: T,
}

impl<T> WebResponse<T> {
    pub fn new(code: u16, status: impl Into<String>, data: T) -> Self {
        Self {
            code,
            status: status.into(),
            data,
        }
    }

    pub fn ok(status: impl Into<String>, data: T) -> Self {
        Self::new(200, status, data)
    }

    pub fn created(status: impl Into<String>, data: T) -> Self {
        Self::new(201, status, data)
    }
}

/// Body of responses that carry only a message
pub type MessageResponse = WebResponse<Option<String>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(WebResponse::ok("success get opd", vec![1, 2])).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "code": 200, "status": "success get opd", "data": [1, 2] })
        );
    }

    #[test]
    fn test_message_response_serializes_null_data() {
        let body: MessageResponse = WebResponse::ok("success delete opd", None);
        let value = serde_json::to_value(body).unwrap();
        assert!(value["data"].is_null());
    }
}
