use axum::http::{header, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: Uuid,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    /// Claims for `user_id` expiring `expiry_hours` from now. Lifetimes past
    /// the representable date range are rejected rather than wrapped.
    pub fn new(user_id: Uuid, expiry_hours: u64) -> Result<Self, JwtError> {
        let now = Utc::now();
        let exp = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                JwtError::TokenGeneration(format!("expiry of {} hours is out of range", expiry_hours))
            })?;

        Ok(Self {
            user_id,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// Verified caller. Only `IdentityVerifier::verify` hands these out, so a
/// value of this type is proof the request carried a valid credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    user_id: Uuid,
}

impl Identity {
    pub(crate) fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("no credential supplied")]
    MissingCredential,

    #[error("invalid or expired credential")]
    InvalidCredential,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::unauthorized(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT secret")]
    InvalidSecret,
}

/// Stateless HS256 bearer-token verifier.
#[derive(Clone)]
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Extract the bearer credential from request headers and verify it.
    pub fn verify(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = extract_bearer_token(headers)?;
        self.verify_token(token)
    }

    pub fn verify_token(&self, token: &str) -> Result<Identity, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!("Rejected credential: {}", e);
            AuthError::InvalidCredential
        })?;

        Ok(Identity::new(token_data.claims.user_id))
    }
}

/// Extract JWT token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::InvalidCredential)?;

    let auth_str = auth_str.trim();
    let (scheme, token) = auth_str.split_once(' ').unwrap_or((auth_str, ""));
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return Err(AuthError::InvalidCredential);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MissingCredential);
    }
    Ok(token)
}

/// Sign a credential for `user_id`. Used by the `token` CLI command and tests.
pub fn issue_token(secret: &str, user_id: Uuid, expiry_hours: u64) -> Result<String, JwtError> {
    sign_claims(secret, &Claims::new(user_id, expiry_hours)?)
}

pub fn sign_claims(secret: &str, claims: &Claims) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}
