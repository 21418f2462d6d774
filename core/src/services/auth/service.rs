//! Main authentication service implementation

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::domain::entities::token::AccessClaims;
use crate::domain::value_objects::{AuthResult, LoginRequest, LogoutRequest, RefreshTokenRequest};
use crate::errors::{AuthError, DomainResult};
use crate::repositories::{RefreshTokenStore, UserRepository};
use crate::services::token::TokenIssuer;

use super::password::PasswordVerifier;

/// Authentication facade used by the HTTP layer
pub struct AuthService<S, U, P>
where
    S: RefreshTokenStore,
    U: UserRepository,
    P: PasswordVerifier,
{
    /// User lookup for login
    user_repository: Arc<U>,
    /// Token issuance, rotation and revocation
    token_issuer: Arc<TokenIssuer<S, U>>,
    password_verifier: Arc<P>,
}

impl<S, U, P> AuthService<S, U, P>
where
    S: RefreshTokenStore,
    U: UserRepository,
    P: PasswordVerifier,
{
    pub fn new(
        user_repository: Arc<U>,
        token_issuer: Arc<TokenIssuer<S, U>>,
        password_verifier: Arc<P>,
    ) -> Self {
        Self {
            user_repository,
            token_issuer,
            password_verifier,
        }
    }

    pub fn token_issuer(&self) -> &TokenIssuer<S, U> {
        &self.token_issuer
    }

    /// Log in with email or user name and password
    ///
    /// An unknown login and a wrong password fail the same way with
    /// `InvalidCredentials`.
    pub async fn login(&self, request: LoginRequest) -> DomainResult<AuthResult> {
        request.validate()?;

        let user = match self
            .user_repository
            .find_by_email_or_user_name(&request.email_or_user_name)
            .await?
        {
            Some(user) => user,
            None => {
                tracing::warn!(event = "login_failed", reason = "unknown_user", "Login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !self
            .password_verifier
            .verify(&request.password, &user.password_hash)
            .await?
        {
            tracing::warn!(
                user_id = %user.id,
                event = "login_failed",
                reason = "bad_password",
                "Login failed"
            );
            return Err(AuthError::InvalidCredentials.into());
        }

        let result = self.token_issuer.issue_for_user(user.id).await?;

        tracing::info!(user_id = %user.id, event = "login_succeeded", "User logged in");
        Ok(result)
    }

    /// Exchange an expired access token and its refresh token for a new pair
    pub async fn refresh(&self, request: RefreshTokenRequest) -> DomainResult<AuthResult> {
        request.validate()?;

        self.token_issuer
            .issue_from_refresh(&request.access_token, &request.refresh_token)
            .await
    }

    /// Revoke the session family of the presented refresh token
    ///
    /// `user_id` comes from the caller's authenticated access token.
    pub async fn logout(&self, user_id: Uuid, request: LogoutRequest) -> DomainResult<usize> {
        request.validate()?;

        self.token_issuer
            .revoke_family(user_id, &request.refresh_token)
            .await
    }

    /// Validate a bearer access token, expiry included
    pub fn authenticate(&self, access_token: &str) -> DomainResult<AccessClaims> {
        self.token_issuer.verify_access_token(access_token)
    }
}
