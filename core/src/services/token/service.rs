//! Token issuer implementation

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

use hr_shared::config::AuthConfig;

use crate::domain::entities::token::{AccessClaims, RefreshToken};
use crate::domain::entities::user::User;
use crate::domain::value_objects::AuthResult;
use crate::errors::{AuthError, DomainError, DomainResult, StoreError, TokenError};
use crate::repositories::{RefreshTokenStore, UserRepository};

use super::config::TokenServiceConfig;
use super::key::SigningKey;

/// Issues access tokens and manages the refresh token lifecycle
pub struct TokenIssuer<S: RefreshTokenStore, U: UserRepository> {
    store: Arc<S>,
    users: Arc<U>,
    key: SigningKey,
    config: TokenServiceConfig,
    /// Full validation for authenticating requests
    validation: Validation,
    /// Same checks without `exp`, for the access token presented on refresh
    refresh_validation: Validation,
}

impl<S: RefreshTokenStore, U: UserRepository> TokenIssuer<S, U> {
    /// Creates a new token issuer
    ///
    /// Only HS256 is accepted on verification; tokens signed with any other
    /// algorithm fail closed.
    pub fn new(store: Arc<S>, users: Arc<U>, key: SigningKey, config: TokenServiceConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = config.clock_skew_seconds;
        validation.validate_exp = true;
        validation.validate_nbf = true;

        let mut refresh_validation = validation.clone();
        refresh_validation.validate_exp = false;

        Self {
            store,
            users,
            key,
            config,
            validation,
            refresh_validation,
        }
    }

    /// Creates an issuer from the shared auth configuration, deriving the key
    /// from `JWT_SECRET`
    pub fn from_auth_config(
        store: Arc<S>,
        users: Arc<U>,
        auth: &AuthConfig,
    ) -> Result<Self, DomainError> {
        let key = SigningKey::from_secret(auth.jwt.secret.as_bytes())?;
        Ok(Self::new(
            store,
            users,
            key,
            TokenServiceConfig::from_auth_config(auth),
        ))
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Issues tokens for a user after a successful login
    ///
    /// Reuses the user's live refresh token when there is one, otherwise
    /// starts or rotates a chain.
    pub async fn issue_for_user(&self, user_id: Uuid) -> DomainResult<AuthResult> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.issue_and_maybe_rotate(&user, false).await
    }

    /// Exchanges an (possibly expired) access token plus its refresh token for
    /// a new pair. The refresh token is always rotated.
    ///
    /// # Errors
    ///
    /// * `InvalidAccessToken` - signature, algorithm, issuer or audience check failed
    /// * `InvalidRefreshToken` - token unknown, revoked, expired, consumed, or
    ///   lost a concurrent rotation
    pub async fn issue_from_refresh(
        &self,
        expired_access_token: &str,
        presented_refresh_token: &str,
    ) -> DomainResult<AuthResult> {
        let claims = self.decode_claims(expired_access_token, &self.refresh_validation)?;
        let user_id = claims
            .user_id()
            .map_err(|_| DomainError::Token(TokenError::InvalidAccessToken))?;

        let existing = self
            .store
            .find_by_value(user_id, presented_refresh_token)
            .await?
            .ok_or_else(|| {
                tracing::warn!(
                    user_id = %user_id,
                    event = "refresh_token_unknown",
                    "Refresh token not found for user"
                );
                DomainError::Token(TokenError::InvalidRefreshToken)
            })?;

        if !existing.is_valid_at(Utc::now()) {
            self.reject_refresh(&existing).await;
            return Err(DomainError::Token(TokenError::InvalidRefreshToken));
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let access_token = self.sign_access_token(&user)?;
        let successor = self
            .store
            .rotate(&existing, RefreshToken::generate_value())
            .await
            .map_err(|error| {
                let mapped = match error {
                    // Someone else rotated it first
                    StoreError::ConcurrencyConflict | StoreError::NotFound => {
                        TokenError::InvalidRefreshToken
                    }
                    _ => TokenError::TokenPersistenceFailed,
                };
                tracing::warn!(
                    user_id = %user_id,
                    family_id = %existing.token_family_id,
                    error = %error,
                    event = "refresh_rotation_failed",
                    "Refresh token rotation failed"
                );
                DomainError::Token(mapped)
            })?;

        tracing::info!(
            user_id = %user_id,
            family_id = %successor.token_family_id,
            event = "refresh_token_rotated",
            "Rotated refresh token"
        );

        Ok(self.auth_result(access_token, successor.token))
    }

    /// Core issuance step shared by login and refresh
    ///
    /// A new refresh token is created when the user has no live token, when
    /// the current one has expired, or when `rotate` is set. Otherwise the
    /// current value is returned again.
    pub async fn issue_and_maybe_rotate(&self, user: &User, rotate: bool) -> DomainResult<AuthResult> {
        let existing = self.store.find_active(user.id).await?;

        let should_generate_new = match &existing {
            None => true,
            Some(token) => rotate || token.is_expired_at(Utc::now()),
        };

        let access_token = self.sign_access_token(user)?;

        let refresh_token = match existing {
            Some(existing) if !should_generate_new => existing.token,
            Some(existing) => {
                let successor = self
                    .store
                    .rotate(&existing, RefreshToken::generate_value())
                    .await
                    .map_err(|error| self.persistence_failed(user.id, error))?;
                tracing::info!(
                    user_id = %user.id,
                    family_id = %successor.token_family_id,
                    event = "refresh_token_rotated",
                    "Replaced current refresh token"
                );
                successor.token
            }
            None => {
                let created = self
                    .store
                    .insert(user.id, RefreshToken::generate_value(), None)
                    .await
                    .map_err(|error| self.persistence_failed(user.id, error))?;
                tracing::info!(
                    user_id = %user.id,
                    family_id = %created.token_family_id,
                    event = "refresh_family_started",
                    "Issued refresh token for new family"
                );
                created.token
            }
        };

        Ok(self.auth_result(access_token, refresh_token))
    }

    /// Fully validates an access token, expiry included
    pub fn verify_access_token(&self, token: &str) -> DomainResult<AccessClaims> {
        self.decode_claims(token, &self.validation)
    }

    /// Logout: revokes the family of the presented refresh token
    ///
    /// Returns how many tokens changed state; a repeat call returns 0.
    pub async fn revoke_family(
        &self,
        user_id: Uuid,
        presented_refresh_token: &str,
    ) -> DomainResult<usize> {
        let token = self
            .store
            .find_by_value(user_id, presented_refresh_token)
            .await?
            .ok_or(DomainError::Token(TokenError::InvalidRefreshToken))?;

        let revoked = self.store.revoke_family(token.token_family_id).await?;

        tracing::info!(
            user_id = %user_id,
            family_id = %token.token_family_id,
            revoked = revoked,
            event = "refresh_family_revoked",
            "Revoked refresh token family"
        );

        Ok(revoked)
    }

    fn sign_access_token(&self, user: &User) -> DomainResult<String> {
        let claims = AccessClaims::for_user(
            user,
            &self.config.issuer,
            &self.config.audience,
            self.config.access_token_expiry_seconds,
            Utc::now(),
        );

        encode(&Header::new(Algorithm::HS256), &claims, self.key.encoding_key()).map_err(|e| {
            tracing::error!(
                user_id = %user.id,
                error = %e,
                event = "access_token_signing_failed",
                "Failed to sign access token"
            );
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    fn decode_claims(&self, token: &str, validation: &Validation) -> DomainResult<AccessClaims> {
        decode::<AccessClaims>(token, self.key.decoding_key(), validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(
                    error_kind = ?e.kind(),
                    event = "access_token_rejected",
                    "Access token failed validation"
                );
                DomainError::Token(TokenError::InvalidAccessToken)
            })
    }

    /// Handles a refresh token that exists but is no longer usable
    async fn reject_refresh(&self, token: &RefreshToken) {
        if token.is_used() && self.config.revoke_family_on_reuse {
            // A consumed token came back: assume the chain leaked
            match self.store.revoke_family(token.token_family_id).await {
                Ok(revoked) => tracing::warn!(
                    user_id = %token.user_id,
                    family_id = %token.token_family_id,
                    revoked = revoked,
                    event = "refresh_token_reuse",
                    "Consumed refresh token presented again, family revoked"
                ),
                Err(e) => tracing::error!(
                    user_id = %token.user_id,
                    family_id = %token.token_family_id,
                    error = %e,
                    event = "refresh_token_reuse",
                    "Consumed refresh token presented again, family revocation failed"
                ),
            }
        } else {
            tracing::warn!(
                user_id = %token.user_id,
                family_id = %token.token_family_id,
                revoked = token.is_revoked,
                expired = token.is_expired(),
                event = "refresh_token_rejected",
                "Refresh token is no longer valid"
            );
        }
    }

    fn persistence_failed(&self, user_id: Uuid, error: StoreError) -> DomainError {
        tracing::error!(
            user_id = %user_id,
            error = %error,
            event = "refresh_token_persistence_failed",
            "Failed to persist refresh token"
        );
        DomainError::Token(TokenError::TokenPersistenceFailed)
    }

    fn auth_result(&self, access_token: String, refresh_token: String) -> AuthResult {
        AuthResult::new(
            access_token,
            refresh_token,
            self.config.access_token_expiry_seconds,
        )
    }
}
