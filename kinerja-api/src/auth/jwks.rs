//! JSON Web Key Set store
//!
//! Holds the identity provider's signing keys. The set is fetched once at
//! startup (failure aborts startup) and then refreshed in the background.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use tokio::sync::RwLock;
use tokio::time;
use tracing::{debug, warn};

use super::{AuthError, Claims};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct JwksStore {
    url: String,
    client: reqwest::Client,
    keys: Arc<RwLock<JwkSet>>,
}

impl JwksStore {
    /// Fetch the key set from `url`
    pub async fn init(url: &str) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build JWKS HTTP client")?;

        let keys = fetch(&client, url).await?;
        tracing::info!("Loaded {} signing keys from {}", keys.keys.len(), url);

        Ok(Self {
            url: url.to_string(),
            client,
            keys: Arc::new(RwLock::new(keys)),
        })
    }

    /// Store over a fixed key set, never refreshed
    pub fn from_keys(keys: JwkSet) -> Self {
        Self {
            url: String::new(),
            client: reqwest::Client::new(),
            keys: Arc::new(RwLock::new(keys)),
        }
    }

    /// Re-download the key set every [`REFRESH_INTERVAL`]. On failure the
    /// previous keys stay in use.
    pub fn spawn_refresh(&self) -> tokio::task::JoinHandle<()> {
        let store = self.clone();

        tokio::spawn(async move {
            let mut ticker = time::interval(REFRESH_INTERVAL);
            // first tick fires immediately; keys were just loaded
            ticker.tick().await;

            loop {
                ticker.tick().await;

                match fetch(&store.client, &store.url).await {
                    Ok(keys) => {
                        debug!("Refreshed JWKS ({} keys)", keys.keys.len());
                        *store.keys.write().await = keys;
                    }
                    Err(e) => warn!("Failed to refresh JWKS: {:#}", e),
                }
            }
        })
    }

    /// Check signature and expiry, returning the token's claims
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|e| {
            debug!("JWT header error: {}", e);
            AuthError::InvalidToken
        })?;
        let kid = header.kid.ok_or(AuthError::InvalidToken)?;

        let key = {
            let keys = self.keys.read().await;
            let jwk = keys.find(&kid).ok_or_else(|| {
                debug!("JWT signed with unknown key {}", kid);
                AuthError::InvalidToken
            })?;
            DecodingKey::from_jwk(jwk).map_err(|e| {
                warn!("Unusable JWK {}: {}", kid, e);
                AuthError::InvalidToken
            })?
        };

        let mut validation = Validation::new(header.alg);
        validation.validate_aud = false;

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!("JWT parse error: {}", e);
                AuthError::InvalidToken
            })
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> anyhow::Result<JwkSet> {
    client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch JWKS from {}", url))?
        .error_for_status()
        .context("JWKS endpoint returned an error")?
        .json::<JwkSet>()
        .await
        .context("Failed to parse JWKS")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_garbage_token_is_invalid() {
        let store = JwksStore::from_keys(JwkSet { keys: Vec::new() });
        assert_eq!(store.verify("not-a-jwt").await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn test_unknown_kid_is_invalid() {
        let store = JwksStore::from_keys(JwkSet { keys: Vec::new() });
        // {"alg":"RS256","typ":"JWT","kid":"k1"}.{"iss":"x"}.sig
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCIsImtpZCI6ImsxIn0.eyJpc3MiOiJ4In0.c2ln";
        assert_eq!(store.verify(token).await, Err(AuthError::InvalidToken));
    }
}
