//! Authentication middleware for protected routes

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use super::{AuthError, AuthPolicy, JwksStore, authorize_claims, bearer_token};
use crate::api::error::ApiError;

pub const SESSION_HEADER: &str = "x-session-id";

/// Everything the middleware needs to authenticate a request
#[derive(Debug, Clone)]
pub struct Authenticator {
    pub jwks: JwksStore,
    pub policy: AuthPolicy,
}

/// Verify the bearer token and attach an [`super::AuthContext`] to the request
pub async fn require_auth(
    State(auth): State<Authenticator>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    // owned copies: the request body is not Sync, so no borrow of it may
    // live across the await below
    let token = {
        let header = req.headers().get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        bearer_token(header).map_err(reject)?.to_string()
    };
    let session_id = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let claims = auth.jwks.verify(&token).await.map_err(reject)?;
    let context = authorize_claims(&auth.policy, claims, session_id.as_deref()).map_err(reject)?;

    tracing::debug!(
        "Authenticated {} request (service token: {})",
        req.uri().path(),
        context.is_service_token
    );

    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

fn reject(err: AuthError) -> ApiError {
    tracing::warn!("Rejected request: {}", err);
    if err.is_forbidden() {
        ApiError::Forbidden(err.to_string())
    } else {
        ApiError::Unauthorized(err.to_string())
    }
}
