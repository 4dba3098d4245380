//! Authentication service - Handles login and token verification.
//!
//! Users log in with the deployment's identity field (email or phone) and
//! receive an HS256 JWT. Password handling lives in `domain::Password`.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::password::DUMMY_HASH;
use crate::domain::{IdentityField, Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

/// Token response returned after successful authentication
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// JWT access token
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,
    /// Token type (always "Bearer")
    #[schema(example = "Bearer")]
    pub token_type: String,
    /// Token expiration time in seconds
    #[schema(example = 86400)]
    pub expires_in: i64,
    pub user: UserResponse,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Check credentials against the configured identity field and issue a token
    async fn login(&self, identity: String, password: String) -> AppResult<TokenResponse>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// The account behind a token, which must still be active
    async fn current_user(&self, id: Uuid) -> AppResult<User>;
}

fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        role: user.role,
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
        user: UserResponse::from(user.clone()),
    })
}

fn verify_token_internal(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, identity: String, password: String) -> AppResult<TokenResponse> {
        let field = self.config.identity_field;
        let identity = identity.trim().to_string();
        let lookup = match field {
            IdentityField::Email => identity.to_lowercase(),
            IdentityField::Phone => identity,
        };

        let user = self
            .uow
            .users()
            .find_by_identity(field, &lookup)
            .await?
            .filter(|user| user.is_active);

        // Verify against a dummy hash when there is no account so the
        // response time does not reveal which identities exist.
        let stored = Password::from_hash(
            user.as_ref()
                .map(|u| u.password_hash.clone())
                .unwrap_or_else(|| DUMMY_HASH.to_string()),
        );
        let password_valid = stored.verify(&password);

        match user {
            Some(user) if password_valid => {
                tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
                generate_token(&user, &self.config)
            }
            _ => {
                tracing::debug!(identity_field = %field, "Login rejected");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token_internal(token, &self.config)
    }

    async fn current_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .filter(|user| user.is_active)
            .ok_or(AppError::Unauthorized)
    }
}
