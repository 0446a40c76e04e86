use serde_json::json;
use std::sync::Arc;

use crate::core::error::Result;
use crate::features::auth::clients::{GoTrueClient, SignupOutcome};
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, MeResponseDto, RefreshTokenRequestDto, SessionDto,
    SignupRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::session::SessionManager;

/// Sign-up, sign-in and token refresh, delegated to the auth server
pub struct AuthService {
    gotrue: Arc<GoTrueClient>,
    sessions: Arc<SessionManager>,
}

impl AuthService {
    pub fn new(gotrue: Arc<GoTrueClient>, sessions: Arc<SessionManager>) -> Self {
        Self { gotrue, sessions }
    }

    pub async fn signup(&self, dto: SignupRequestDto) -> Result<AuthResponseDto> {
        let metadata = json!({
            "first_name": dto.first_name,
            "last_name": dto.last_name,
            "company": dto.company,
        });

        match self.gotrue.sign_up(&dto.email, &dto.password, metadata).await? {
            SignupOutcome::Session(session) => {
                tracing::info!("User signed up: {}", session.user.id);
                Ok(session.into())
            }
            SignupOutcome::ConfirmationRequired(user) => {
                tracing::info!("User signed up, awaiting email confirmation: {}", user.id);
                Ok(AuthResponseDto {
                    session: None,
                    user: user.into(),
                })
            }
        }
    }

    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let session = self
            .gotrue
            .sign_in_with_password(&dto.email, &dto.password)
            .await?;
        tracing::info!("User logged in: {}", session.user.id);
        Ok(session.into())
    }

    pub async fn refresh_token(&self, dto: RefreshTokenRequestDto) -> Result<SessionDto> {
        let result = self.gotrue.refresh(&dto.refresh_token).await;
        let session = self.sessions.observe(None, result)?;
        Ok(session.into())
    }

    pub async fn logout(&self, user: &AuthenticatedUser, access_token: &str) -> Result<()> {
        let result = self.gotrue.sign_out(access_token).await;
        self.sessions.observe(Some(user.sub), result)?;
        tracing::info!("User logged out: {}", user.sub);
        Ok(())
    }

    pub fn current_user(&self, user: AuthenticatedUser) -> MeResponseDto {
        user.into()
    }
}
