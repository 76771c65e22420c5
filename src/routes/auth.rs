//! Authentication routes
//!
//! - POST /auth/login - Exchange credentials for tokens
//! - POST /auth/refresh - Exchange a refresh token for a new access token

use actix_web::{web, HttpRequest, HttpResponse};

use super::{request_target, AppState};
use crate::error::AppResult;
use crate::models::{AccessTokenResponse, ErrorBody, LoginRequest, RefreshRequest, TokenResponse};
use crate::services::auth;

/// POST /auth/login - Login with email and password
///
/// # Responses
/// - 200: Access and refresh tokens
/// - 400: Malformed body
/// - 401: Unknown email or wrong password
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn login(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let response = auth::login(
        data.db.pool(),
        &data.config.jwt,
        &request_target(&req),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// POST /auth/refresh - Issue a new access token
#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid or expired refresh token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn refresh(
    req: HttpRequest,
    data: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> AppResult<HttpResponse> {
    let response = auth::refresh(
        data.db.pool(),
        &data.config.jwt,
        &request_target(&req),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Configure authentication routes
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh)),
    );
}
