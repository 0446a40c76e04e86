//! HTTP client for the GoTrue-compatible auth server

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::config::GoTrueConfig;
use crate::core::error::{is_session_expired_message, AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct GoTrueUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GoTrueSession {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub refresh_token: String,
    pub user: GoTrueUser,
}

/// Sign-up returns a session, or only the user when email confirmation is on
#[derive(Debug, Clone)]
pub enum SignupOutcome {
    Session(GoTrueSession),
    ConfirmationRequired(GoTrueUser),
}

#[derive(Debug, Deserialize, Default)]
struct GoTrueErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    email: &'a str,
    password: &'a str,
    data: Value,
}

pub struct GoTrueClient {
    config: GoTrueConfig,
    http_client: reqwest::Client,
}

impl GoTrueClient {
    pub fn new(config: GoTrueConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    pub async fn sign_up(&self, email: &str, password: &str, metadata: Value) -> Result<SignupOutcome> {
        let mut url = format!("{}/signup", self.config.url);
        if let Some(redirect) = &self.config.email_redirect_to {
            url = format!("{}?redirect_to={}", url, urlencoding::encode(redirect));
        }

        let body = self
            .send_json(
                self.http_client.post(&url).json(&SignupRequest {
                    email,
                    password,
                    data: metadata,
                }),
            )
            .await?;

        if body.get("access_token").is_some() {
            let session: GoTrueSession = serde_json::from_value(body).map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to parse sign-up session: {}", e))
            })?;
            Ok(SignupOutcome::Session(session))
        } else {
            let user: GoTrueUser = serde_json::from_value(body).map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to parse sign-up user: {}", e))
            })?;
            Ok(SignupOutcome::ConfirmationRequired(user))
        }
    }

    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<GoTrueSession> {
        let url = format!("{}/token?grant_type=password", self.config.url);
        let request = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }));
        self.send_session(request).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<GoTrueSession> {
        let url = format!("{}/token?grant_type=refresh_token", self.config.url);
        let request = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "refresh_token": refresh_token }));
        self.send_session(request).await
    }

    /// Revoke the session behind `access_token`
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = format!("{}/logout", self.config.url);
        let response = self
            .http_client
            .post(&url)
            .header("apikey", &self.config.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to reach auth server: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(map_error_response(status, &body))
    }

    async fn send_session(&self, request: reqwest::RequestBuilder) -> Result<GoTrueSession> {
        let body = self.send_json(request).await?;
        serde_json::from_value(body).map_err(|e| {
            tracing::error!("Failed to parse auth session: {}", e);
            AppError::ExternalServiceError(format!("Failed to parse auth session: {}", e))
        })
    }

    async fn send_json(&self, request: reqwest::RequestBuilder) -> Result<Value> {
        let response = request
            .header("apikey", &self.config.api_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Auth server request failed: {}", e);
                AppError::ExternalServiceError(format!("Failed to reach auth server: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            tracing::debug!("Auth server error: HTTP {} - {}", status, body);
            return Err(map_error_response(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            AppError::ExternalServiceError(format!("Invalid auth server response: {}", e))
        })
    }
}

/// Turn an auth server error into the matching `AppError`
pub fn map_error_response(status: StatusCode, body: &str) -> AppError {
    let parsed: GoTrueErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .error_description
        .or(parsed.msg)
        .or(parsed.message)
        .or(parsed.error.clone())
        .unwrap_or_else(|| format!("Auth server returned HTTP {}", status));

    if is_session_expired_message(&message)
        || parsed.error_code.as_deref() == Some("refresh_token_not_found")
        || parsed.error_code.as_deref() == Some("session_expired")
    {
        return AppError::SessionExpired;
    }

    match status {
        StatusCode::BAD_REQUEST if parsed.error.as_deref() == Some("invalid_grant") => {
            AppError::Unauthorized(message)
        }
        StatusCode::UNPROCESSABLE_ENTITY if parsed.error_code.as_deref() == Some("user_already_exists") => {
            AppError::Conflict(message)
        }
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::BadRequest(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AppError::Unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => AppError::BadRequest(message),
        _ => AppError::ExternalServiceError(message),
    }
}
