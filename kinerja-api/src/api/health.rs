//! Health Check API Handler

use crate::api::response::{self, ApiMessage};

/// GET /health
pub async fn health_check() -> ApiMessage {
    response::message("OK")
}
