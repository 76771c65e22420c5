//! User routes
//!
//! - POST /user/register - Create an account and its anime list
//! - PUT /user/username - Rename the caller

use actix_web::{web, HttpResponse};

use super::AppState;
use crate::auth::Auth;
use crate::error::AppResult;
use crate::models::{ErrorBody, RegisterRequest, RegisterResponse, UpdateUsernameRequest};
use crate::services::users;

/// POST /user/register - Register a new user
///
/// # Request Body
/// - email: valid address, at most 254 characters
/// - password: 12 to 256 characters
/// - username: 3 to 32 characters, unique
#[utoipa::path(
    post,
    path = "/user/register",
    tag = "user",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Email or username already exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn register(
    data: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let response = users::register(data.db.pool(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// PUT /user/username - Change the caller's username
#[utoipa::path(
    put,
    path = "/user/username",
    tag = "user",
    request_body = UpdateUsernameRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Username updated"),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 409, description = "Username already exists", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn update_username(
    data: web::Data<AppState>,
    auth: Auth,
    body: web::Json<UpdateUsernameRequest>,
) -> AppResult<HttpResponse> {
    users::update_username(data.db.pool(), &auth, body.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure user routes
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/register", web::post().to(register))
            .route("/username", web::put().to(update_username)),
    );
}
