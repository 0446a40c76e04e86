use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::jwks::{JwksClient, VerificationKey};
use super::model::AuthenticatedUser;
use super::session::SessionManager;
use crate::core::error::AppError;

/// Where signing keys come from
pub enum KeySource {
    /// Legacy shared secret, HS256
    Secret(DecodingKey),
    /// Asymmetric keys published by the auth server
    Jwks(Arc<JwksClient>),
}

pub struct JwtValidator {
    keys: KeySource,
    issuer: String,
    audience: String,
    leeway: u64,
    sessions: Arc<SessionManager>,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "aud")]
    _aud: AudienceClaim,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    is_anonymous: bool,
}

/// Audience can be either a single string or an array of strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
#[allow(dead_code)]
enum AudienceClaim {
    Single(String),
    Multiple(Vec<String>),
}

impl JwtValidator {
    pub fn new(
        keys: KeySource,
        issuer: String,
        audience: String,
        leeway: Duration,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self {
            keys,
            issuer,
            audience,
            leeway: leeway.as_secs(),
            sessions,
        }
    }

    pub fn with_secret(
        secret: &str,
        issuer: String,
        audience: String,
        leeway: Duration,
        sessions: Arc<SessionManager>,
    ) -> Self {
        Self::new(
            KeySource::Secret(DecodingKey::from_secret(secret.as_bytes())),
            issuer,
            audience,
            leeway,
            sessions,
        )
    }

    pub async fn validate_token(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Auth(e.to_string()))?;

        let verification = match &self.keys {
            KeySource::Secret(key) => VerificationKey {
                key: key.clone(),
                algorithm: Algorithm::HS256,
            },
            KeySource::Jwks(client) => {
                let kid = header
                    .kid
                    .as_deref()
                    .ok_or_else(|| AppError::Auth("Missing kid in token header".to_string()))?;
                client
                    .get_key(kid)
                    .await
                    .map_err(|e| AppError::Auth(e.to_string()))?
            }
        };

        if header.alg != verification.algorithm {
            return Err(AppError::Auth(format!(
                "Unsupported algorithm: {:?}, expected {:?}",
                header.alg, verification.algorithm
            )));
        }

        let validation = self.validation(verification.algorithm, true);
        let claims = match decode::<Claims>(token, &verification.key, &validation) {
            Ok(data) => data.claims,
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                // Signature is still checked to attribute the expiry to a user
                let user_id = decode::<Claims>(
                    token,
                    &verification.key,
                    &self.validation(verification.algorithm, false),
                )
                .ok()
                .and_then(|data| Uuid::parse_str(&data.claims.sub).ok());
                self.sessions.notify_expired(user_id, "jwt expired");
                return Err(AppError::SessionExpired);
            }
            Err(e) => return Err(AppError::Auth(e.to_string())),
        };

        if claims.is_anonymous {
            return Err(AppError::Auth("Anonymous sessions are not allowed".to_string()));
        }

        let sub = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Auth("Token subject is not a user id".to_string()))?;

        Ok(AuthenticatedUser {
            sub,
            email: claims.email,
            role: claims.role.unwrap_or_else(|| "authenticated".to_string()),
            session_id: claims.session_id,
        })
    }

    fn validation(&self, algorithm: Algorithm, validate_exp: bool) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway;
        validation.validate_exp = validate_exp;
        validation.validate_nbf = true;
        validation
    }
}
