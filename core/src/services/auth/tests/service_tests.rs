//! Unit tests for authentication service

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::user::User;
use crate::domain::value_objects::{LoginRequest, LogoutRequest, RefreshTokenRequest};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{InMemoryRefreshTokenStore, InMemoryUserRepository, RefreshTokenStore};
use crate::services::auth::{AuthService, BcryptPasswordVerifier, PasswordVerifier};
use crate::services::token::{SigningKey, TokenIssuer, TokenServiceConfig};

const PASSWORD: &str = "Correct-Horse-9";

/// Compares plaintext, keeps tests fast
struct PlainPasswordVerifier;

#[async_trait]
impl PasswordVerifier for PlainPasswordVerifier {
    async fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool> {
        Ok(password == password_hash)
    }
}

struct Setup<P: PasswordVerifier> {
    service: AuthService<InMemoryRefreshTokenStore, InMemoryUserRepository, P>,
    store: Arc<InMemoryRefreshTokenStore>,
    user: User,
}

fn setup_with<P: PasswordVerifier>(verifier: P, password_hash: String) -> Setup<P> {
    let user = User::new("jdoe", "Jane.Doe@example.com", "Jane Doe", password_hash)
        .with_roles(["Employee", "Manager"]);
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    let users = Arc::new(InMemoryUserRepository::with_users([user.clone()]));
    let issuer = Arc::new(TokenIssuer::new(
        Arc::clone(&store),
        Arc::clone(&users),
        SigningKey::from_secret(b"test-secret-key-that-is-at-least-32-bytes").unwrap(),
        TokenServiceConfig::default(),
    ));

    Setup {
        service: AuthService::new(users, issuer, Arc::new(verifier)),
        store,
        user,
    }
}

fn setup() -> Setup<PlainPasswordVerifier> {
    setup_with(PlainPasswordVerifier, PASSWORD.to_string())
}

fn login_request(login: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email_or_user_name: login.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn test_login_with_user_name_or_email() {
    let s = setup();

    let by_name = s.service.login(login_request("JDOE", PASSWORD)).await.unwrap();
    let by_email = s
        .service
        .login(login_request("jane.doe@example.com", PASSWORD))
        .await
        .unwrap();

    assert_eq!(by_name.refresh_token, by_email.refresh_token);
    assert_eq!(
        by_name.expires_in,
        s.service.token_issuer().config().access_token_expiry_seconds
    );
    let claims = s.service.authenticate(&by_email.access_token).unwrap();
    assert_eq!(claims.user_id().unwrap(), s.user.id);
    assert_eq!(claims.role, vec!["Employee", "Manager"]);
}

#[tokio::test]
async fn test_unknown_user_and_wrong_password_look_the_same() {
    let s = setup();

    let unknown = s.service.login(login_request("nobody", PASSWORD)).await;
    let wrong = s.service.login(login_request("jdoe", "wrong")).await;

    let expected = DomainError::Auth(AuthError::InvalidCredentials);
    assert_eq!(unknown.unwrap_err(), expected);
    assert_eq!(wrong.unwrap_err(), expected);
    assert!(s.store.is_empty().await);
}

#[tokio::test]
async fn test_login_validation_reports_fields() {
    let s = setup();

    let error = s.service.login(login_request("", "")).await.unwrap_err();

    match error {
        DomainError::Validation { errors } => {
            let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
            assert_eq!(fields, vec!["email_or_user_name", "password"]);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_then_logout_flow() {
    let s = setup();
    let login = s.service.login(login_request("jdoe", PASSWORD)).await.unwrap();

    let refreshed = s
        .service
        .refresh(RefreshTokenRequest {
            access_token: login.access_token.clone(),
            refresh_token: login.refresh_token.clone(),
        })
        .await
        .unwrap();

    let revoked = s
        .service
        .logout(
            s.user.id,
            LogoutRequest {
                refresh_token: refreshed.refresh_token.clone(),
            },
        )
        .await
        .unwrap();
    assert_eq!(revoked, 1);

    let again = s
        .service
        .refresh(RefreshTokenRequest {
            access_token: refreshed.access_token,
            refresh_token: refreshed.refresh_token,
        })
        .await;
    assert_eq!(
        again.unwrap_err(),
        DomainError::Token(TokenError::InvalidRefreshToken)
    );
}

#[tokio::test]
async fn test_refresh_requires_both_tokens() {
    let s = setup();

    let error = s
        .service
        .refresh(RefreshTokenRequest {
            access_token: String::new(),
            refresh_token: "value".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(error.error_code(), "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_logout_with_foreign_token_fails() {
    let s = setup();
    let login = s.service.login(login_request("jdoe", PASSWORD)).await.unwrap();

    let result = s
        .service
        .logout(
            Uuid::new_v4(),
            LogoutRequest {
                refresh_token: login.refresh_token,
            },
        )
        .await;

    assert_eq!(
        result.unwrap_err(),
        DomainError::Token(TokenError::InvalidRefreshToken)
    );
    assert!(s.store.find_active(s.user.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_login_with_bcrypt_hash() {
    let verifier = BcryptPasswordVerifier::with_cost(4);
    let hash = verifier.hash(PASSWORD).unwrap();
    let s = setup_with(verifier, hash);

    assert!(s.service.login(login_request("jdoe", PASSWORD)).await.is_ok());
    assert_eq!(
        s.service
            .login(login_request("jdoe", "nope"))
            .await
            .unwrap_err(),
        DomainError::Auth(AuthError::InvalidCredentials)
    );
}
