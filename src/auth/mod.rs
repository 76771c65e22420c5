//! Authentication module for the Anime List API
//!
//! This module provides authentication functionality including:
//! - Password hashing with bcrypt
//! - Access and refresh JWT generation and verification
//! - Bearer scheme parsing of the Authorization header
//! - Request extractors for required and optional authentication

use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;

use crate::config::JwtConfig;
use crate::error::AppError;

/// Default bcrypt cost factor
const BCRYPT_COST: u32 = 12;

/// Authentication errors
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("The credentials provided are invalid")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    HashingError(String),

    #[error("Token generation failed: {0}")]
    TokenGenerationError(String),

    #[error("Token verification failed: {0}")]
    TokenVerificationError(String),

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("No authorization header present.")]
    MissingAuthHeader,

    #[error("Invalid authentication scheme")]
    InvalidAuthScheme,

    #[error("You are not authorized to modify this resource.")]
    NotResourceOwner,
}

/// Kind of token, carried in the `typ` claim
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims structure, shared by access and refresh tokens
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: i32,
    /// User email
    pub email: String,
    /// Username at the time of issue
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
    /// Access or refresh
    pub typ: TokenType,
}

/// Identity baked into issued tokens
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: i32,
    pub email: &'a str,
    pub username: &'a str,
}

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| AuthError::HashingError(e.to_string()))
}

/// Verify a password against a bcrypt hash
///
/// Returns `Ok(false)` on mismatch; `Err` only if the hash itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    bcrypt::verify(password, hash).map_err(|e| AuthError::HashingError(e.to_string()))
}

fn issue_token(
    subject: &TokenSubject<'_>,
    typ: TokenType,
    secret: &str,
    ttl_secs: i64,
) -> Result<String, AuthError> {
    let now = Utc::now();
    let expiry = now + Duration::seconds(ttl_secs);

    let claims = Claims {
        sub: subject.user_id,
        email: subject.email.to_string(),
        username: subject.username.to_string(),
        exp: expiry.timestamp(),
        iat: now.timestamp(),
        typ,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
}

fn verify_token(token: &str, typ: TokenType, secret: &str) -> Result<Claims, AuthError> {
    let token_data: TokenData<Claims> = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        _ => AuthError::TokenVerificationError(e.to_string()),
    })?;

    if token_data.claims.typ != typ {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}

/// Generate a short-lived access token
pub fn generate_access_token(
    subject: &TokenSubject<'_>,
    jwt: &JwtConfig,
) -> Result<String, AuthError> {
    issue_token(subject, TokenType::Access, &jwt.access_secret, jwt.access_ttl_secs)
}

/// Generate a long-lived refresh token
pub fn generate_refresh_token(
    subject: &TokenSubject<'_>,
    jwt: &JwtConfig,
) -> Result<String, AuthError> {
    issue_token(subject, TokenType::Refresh, &jwt.refresh_secret, jwt.refresh_ttl_secs)
}

/// Verify an access token and return its claims
pub fn verify_access_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AuthError> {
    verify_token(token, TokenType::Access, &jwt.access_secret)
}

/// Verify a refresh token and return its claims
pub fn verify_refresh_token(token: &str, jwt: &JwtConfig) -> Result<Claims, AuthError> {
    verify_token(token, TokenType::Refresh, &jwt.refresh_secret)
}

/// Extract the token from an Authorization header value
///
/// The scheme is matched case-insensitively against `Bearer`.
pub fn extract_token_from_header(auth_header: &str) -> Result<&str, AuthError> {
    let mut parts = auth_header.trim().splitn(2, ' ');
    let scheme = parts.next().unwrap_or_default();

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidAuthScheme);
    }

    let token = parts.next().map(str::trim).unwrap_or_default();
    if token.is_empty() {
        return Err(AuthError::InvalidToken);
    }

    Ok(token)
}

/// Validate an HTTP request and extract the authenticated user
pub fn validate_http_request(req: &HttpRequest, jwt: &JwtConfig) -> Result<Auth, AuthError> {
    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_access_token(token, jwt)?;

    Ok(Auth::from(claims))
}

/// Configuration for the auth extractors
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
}

/// Authenticated user extractor
///
/// Rejects the request with 401 when the bearer token is missing or invalid.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The authenticated user's ID
    pub user_id: i32,
    pub email: String,
    pub username: String,
}

impl From<Claims> for Auth {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            username: claims.username,
        }
    }
}

impl Auth {
    /// Ensure the caller owns the resource identified by `owner_id`
    pub fn ensure_owner(&self, owner_id: i32) -> Result<(), AuthError> {
        if self.user_id != owner_id {
            return Err(AuthError::NotResourceOwner);
        }
        Ok(())
    }
}

fn auth_config(req: &HttpRequest) -> Result<&web::Data<AuthConfig>, AppError> {
    req.app_data::<web::Data<AuthConfig>>()
        .ok_or_else(|| AppError::internal("Auth configuration not found"))
}

impl FromRequest for Auth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = auth_config(req).and_then(|config| {
            validate_http_request(req, &config.jwt).map_err(|e| {
                tracing::debug!("Rejected request to {}: {}", req.path(), e);
                AppError::from(e)
            })
        });

        ready(result.map_err(actix_web::Error::from))
    }
}

/// Optional authentication extractor
///
/// Never rejects: an absent or invalid token yields `OptionalAuth(None)`.
#[derive(Debug, Clone)]
pub struct OptionalAuth(pub Option<Auth>);

impl OptionalAuth {
    pub fn user(&self) -> Option<&Auth> {
        self.0.as_ref()
    }
}

impl FromRequest for OptionalAuth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let result = auth_config(req)
            .map(|config| OptionalAuth(validate_http_request(req, &config.jwt).ok()));

        ready(result.map_err(actix_web::Error::from))
    }
}
