//! Login and token refresh

use sqlx::PgPool;
use tracing::{debug, info};

use crate::auth::{
    generate_access_token, generate_refresh_token, verify_password, verify_refresh_token,
    AuthError, TokenSubject,
};
use crate::config::JwtConfig;
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::links::{self, RequestTarget};
use crate::models::{AccessTokenResponse, LoginRequest, RefreshRequest, TokenResponse};

/// Exchange credentials for an access and a refresh token
///
/// An unknown email and a wrong password produce the same error.
pub async fn login(
    pool: &PgPool,
    jwt: &JwtConfig,
    target: &RequestTarget<'_>,
    request: LoginRequest,
) -> AppResult<TokenResponse> {
    let email = request.email.trim().to_lowercase();
    let user = users::find_user_by_email(pool, &email)
        .await?
        .ok_or(AuthError::InvalidCredentials)?;

    let hash = user.password_hash.clone();
    let password = request.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))??;

    if !matches {
        debug!("Rejected login for user {}", user.id);
        return Err(AuthError::InvalidCredentials.into());
    }

    let subject = TokenSubject {
        user_id: user.id,
        email: &user.email,
        username: &user.username,
    };
    let access_token = generate_access_token(&subject, jwt)?;
    let refresh_token = generate_refresh_token(&subject, jwt)?;

    info!("User logged in: {}", user.id);

    Ok(TokenResponse {
        access_token,
        refresh_token,
        links: links::response_links(target, Vec::new(), Some(user.id)),
    })
}

/// Issue a new access token from a valid refresh token
pub async fn refresh(
    pool: &PgPool,
    jwt: &JwtConfig,
    target: &RequestTarget<'_>,
    request: RefreshRequest,
) -> AppResult<AccessTokenResponse> {
    let claims = verify_refresh_token(request.refresh_token.trim(), jwt)?;

    // The username may have changed since the refresh token was issued
    let user = users::find_user_by_id(pool, claims.sub)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    let access_token = generate_access_token(
        &TokenSubject {
            user_id: user.id,
            email: &user.email,
            username: &user.username,
        },
        jwt,
    )?;

    Ok(AccessTokenResponse {
        access_token,
        links: links::response_links(target, Vec::new(), Some(user.id)),
    })
}
