//! Bearer token authentication
//!
//! Tokens are JWTs signed by the identity provider, verified against its
//! published key set (see [`jwks`]). After the signature checks out, the claims
//! are authorized:
//!
//! - `iss` must equal the configured issuer
//! - a `client_id` claim marks a service token, which must belong to the one
//!   allowed service client
//! - any other token is a user token and needs an `X-Session-Id` header

pub mod jwks;
pub mod middleware;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use jwks::JwksStore;
pub use middleware::{Authenticator, require_auth};

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("Token tidak ditemukan")]
    MissingToken,

    #[error("Missing or invalid Authorization header")]
    MalformedHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid issuer")]
    InvalidIssuer,

    #[error("client not allowed")]
    ClientNotAllowed,

    #[error("User session not found")]
    MissingSession,
}

impl AuthError {
    /// Rejections that mean "you may not" rather than "who are you"
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::ClientNotAllowed)
    }
}

/// Verified token claims
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
    #[serde(default)]
    pub pegawai_id: Option<String>,
    #[serde(default)]
    pub kode_opd: Option<String>,
    #[serde(default)]
    pub nip: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
}

impl Claims {
    /// Numeric user id, `0` when the token carries none
    pub fn user_id(&self) -> i32 {
        match &self.user_id {
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .unwrap_or(0),
            Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    pub claims: Claims,
    pub client_id: String,
    pub is_service_token: bool,
    pub session_id: String,
}

/// Settings the claim checks run against
#[derive(Debug, Clone, Default)]
pub struct AuthPolicy {
    pub issuer: String,
    pub allowed_service_client_id: String,
}

/// Apply issuer, service-client and session rules to verified claims
pub fn authorize_claims(
    policy: &AuthPolicy,
    claims: Claims,
    session_id: Option<&str>,
) -> Result<AuthContext, AuthError> {
    if claims.iss.as_deref() != Some(policy.issuer.as_str()) {
        return Err(AuthError::InvalidIssuer);
    }

    let session_id = session_id.unwrap_or_default().to_string();

    match claims.client_id.clone() {
        Some(client_id) => {
            if client_id != policy.allowed_service_client_id {
                return Err(AuthError::ClientNotAllowed);
            }
            Ok(AuthContext {
                claims,
                client_id,
                is_service_token: true,
                session_id,
            })
        }
        None => {
            if session_id.is_empty() {
                return Err(AuthError::MissingSession);
            }
            Ok(AuthContext {
                claims,
                client_id: String::new(),
                is_service_token: false,
                session_id,
            })
        }
    }
}

/// Token part of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    if header.is_empty() {
        return Err(AuthError::MissingToken);
    }
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MalformedHeader)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> AuthPolicy {
        AuthPolicy {
            issuer: "https://sso/realms/kinerja".to_string(),
            allowed_service_client_id: "laporan-service".to_string(),
        }
    }

    fn user_claims() -> Claims {
        Claims {
            iss: Some("https://sso/realms/kinerja".to_string()),
            user_id: Some(serde_json::json!(17)),
            ..Default::default()
        }
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let mut claims = user_claims();
        claims.iss = Some("https://evil".to_string());
        assert_eq!(
            authorize_claims(&policy(), claims, Some("s1")).unwrap_err(),
            AuthError::InvalidIssuer
        );

        let mut claims = user_claims();
        claims.iss = None;
        assert_eq!(
            authorize_claims(&policy(), claims, Some("s1")).unwrap_err(),
            AuthError::InvalidIssuer
        );
    }

    #[test]
    fn test_user_token_needs_session() {
        let err = authorize_claims(&policy(), user_claims(), None).unwrap_err();
        assert_eq!(err, AuthError::MissingSession);
        assert!(!err.is_forbidden());

        let ctx = authorize_claims(&policy(), user_claims(), Some("sess-1")).unwrap();
        assert!(!ctx.is_service_token);
        assert_eq!(ctx.session_id, "sess-1");
        assert_eq!(ctx.claims.user_id(), 17);
    }

    #[test]
    fn test_user_id_out_of_range_is_zero() {
        let claims = Claims {
            user_id: Some(serde_json::json!(4_294_967_297_i64)),
            ..Default::default()
        };
        assert_eq!(claims.user_id(), 0);

        let claims = Claims {
            user_id: Some(serde_json::json!(" 42 ")),
            ..Default::default()
        };
        assert_eq!(claims.user_id(), 42);
    }

    #[test]
    fn test_service_token_must_be_allowed_client() {
        let mut claims = user_claims();
        claims.client_id = Some("other-service".to_string());
        let err = authorize_claims(&policy(), claims, None).unwrap_err();
        assert_eq!(err, AuthError::ClientNotAllowed);
        assert!(err.is_forbidden());

        let mut claims = user_claims();
        claims.client_id = Some("laporan-service".to_string());
        let ctx = authorize_claims(&policy(), claims, None).unwrap();
        assert!(ctx.is_service_token);
        assert_eq!(ctx.client_id, "laporan-service");
    }

    #[test]
    fn test_bearer_header_parsing() {
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Basic abc")), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token(Some("Bearer ")), Err(AuthError::MalformedHeader));
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")), Ok("abc.def.ghi"));
    }

    #[test]
    fn test_user_id_from_string_claim() {
        let claims = Claims {
            user_id: Some(serde_json::json!("23")),
            ..Default::default()
        };
        assert_eq!(claims.user_id(), 23);
        assert_eq!(Claims::default().user_id(), 0);
    }
}
