use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

/// Auth servers publish RSA keys for RS256 and P-256 keys for ES256
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
    #[serde(default)]
    x: Option<String>,
    #[serde(default)]
    y: Option<String>,
}

#[derive(Clone)]
pub struct VerificationKey {
    pub key: DecodingKey,
    pub algorithm: Algorithm,
}

struct JwksCache {
    keys: HashMap<String, VerificationKey>,
    last_fetched: Instant,
}

pub struct JwksClient {
    jwks_url: String,
    client: reqwest::Client,
    cache: Arc<RwLock<Option<JwksCache>>>,
    cache_ttl: Duration,
}

impl JwksClient {
    pub fn new(issuer_url: &str, cache_ttl: Duration) -> Self {
        Self {
            jwks_url: format!("{}/.well-known/jwks.json", issuer_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(None)),
            cache_ttl,
        }
    }

    pub async fn get_key(&self, kid: &str) -> Result<VerificationKey, JwksError> {
        if let Some(key) = self.cached(kid, true).await {
            return Ok(key);
        }

        // Unknown kid or stale cache, keys may have rotated
        self.fetch_jwks().await?;
        self.cached(kid, false)
            .await
            .ok_or_else(|| JwksError::KeyNotFound(kid.to_string()))
    }

    async fn cached(&self, kid: &str, fresh_only: bool) -> Option<VerificationKey> {
        let cache = self.cache.read().await;
        cache
            .as_ref()
            .filter(|cached| !fresh_only || cached.last_fetched.elapsed() < self.cache_ttl)
            .and_then(|cached| cached.keys.get(kid).cloned())
    }

    async fn fetch_jwks(&self) -> Result<(), JwksError> {
        let response = self
            .client
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| JwksError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(JwksError::FetchError(format!(
                "Failed to fetch JWKS: HTTP {}",
                response.status()
            )));
        }

        let jwks: JwksResponse = response
            .json()
            .await
            .map_err(|e| JwksError::ParseError(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in jwks.keys {
            if let Some(key) = convert_jwk(&jwk)? {
                keys.insert(jwk.kid, key);
            }
        }
        tracing::debug!("Fetched {} signing keys from {}", keys.len(), self.jwks_url);

        let mut cache = self.cache.write().await;
        *cache = Some(JwksCache {
            keys,
            last_fetched: Instant::now(),
        });

        Ok(())
    }
}

fn convert_jwk(jwk: &Jwk) -> Result<Option<VerificationKey>, JwksError> {
    match (jwk.kty.as_str(), &jwk.n, &jwk.e, &jwk.x, &jwk.y) {
        ("RSA", Some(n), Some(e), _, _) => {
            let key = DecodingKey::from_rsa_components(n, e)
                .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
            Ok(Some(VerificationKey {
                key,
                algorithm: Algorithm::RS256,
            }))
        }
        ("EC", _, _, Some(x), Some(y)) => {
            let key = DecodingKey::from_ec_components(x, y)
                .map_err(|e| JwksError::KeyConversionError(e.to_string()))?;
            Ok(Some(VerificationKey {
                key,
                algorithm: Algorithm::ES256,
            }))
        }
        _ => Ok(None),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwksError {
    #[error("Failed to fetch JWKS: {0}")]
    FetchError(String),

    #[error("Failed to parse JWKS: {0}")]
    ParseError(String),

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Failed to convert key: {0}")]
    KeyConversionError(String),
}
