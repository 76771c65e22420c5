//! Webhook subscription routes
//!
//! - GET /webhook/anime-list/{id} - Caller's subscription status
//! - POST /webhook/anime-list/{id}/subscribe - Register a callback URL
//! - DELETE /webhook/anime-list/{id}/subscribe - Remove a callback URL

use actix_web::{web, HttpRequest, HttpResponse};

use super::{request_target, AppState};
use crate::auth::Auth;
use crate::error::AppResult;
use crate::models::{
    ErrorBody, SubscribeRequest, SubscribeResponse, SubscriptionStatus, UnsubscribeRequest,
};
use crate::services::webhooks;

/// GET /webhook/anime-list/{id} - Show the caller's webhooks on a list
#[utoipa::path(
    get,
    path = "/webhook/anime-list/{id}",
    tag = "webhook",
    params(
        ("id" = i32, Path, description = "Owner's user id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Subscription status", body = SubscriptionStatus),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 404, description = "Anime list not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn subscription_status(
    req: HttpRequest,
    data: web::Data<AppState>,
    auth: Auth,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let body = webhooks::subscription_status(
        data.db.pool(),
        &request_target(&req),
        &auth,
        path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(body))
}

/// POST /webhook/anime-list/{id}/subscribe - Subscribe to list changes
///
/// The callback receives a signed POST whenever an anime is added to or
/// removed from the list. Subscribing the same URL again replaces its secret.
#[utoipa::path(
    post,
    path = "/webhook/anime-list/{id}/subscribe",
    tag = "webhook",
    params(
        ("id" = i32, Path, description = "Owner's user id")
    ),
    request_body = SubscribeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Subscribed", body = SubscribeResponse),
        (status = 400, description = "Invalid url or secret", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 404, description = "Anime list not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn subscribe(
    req: HttpRequest,
    data: web::Data<AppState>,
    auth: Auth,
    path: web::Path<i32>,
    body: web::Json<SubscribeRequest>,
) -> AppResult<HttpResponse> {
    let response = webhooks::subscribe(
        data.db.pool(),
        &request_target(&req),
        &auth,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Created().json(response))
}

/// DELETE /webhook/anime-list/{id}/subscribe - Unsubscribe a callback URL
#[utoipa::path(
    delete,
    path = "/webhook/anime-list/{id}/subscribe",
    tag = "webhook",
    params(
        ("id" = i32, Path, description = "Owner's user id")
    ),
    request_body = UnsubscribeRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Unsubscribed"),
        (status = 400, description = "Missing url", body = ErrorBody),
        (status = 401, description = "Not authenticated", body = ErrorBody),
        (status = 404, description = "Anime list not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn unsubscribe(
    data: web::Data<AppState>,
    auth: Auth,
    path: web::Path<i32>,
    body: web::Json<UnsubscribeRequest>,
) -> AppResult<HttpResponse> {
    webhooks::unsubscribe(data.db.pool(), &auth, path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure webhook routes
pub fn configure_webhook_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/webhook/anime-list")
            .route("/{id}", web::get().to(subscription_status))
            .route("/{id}/subscribe", web::post().to(subscribe))
            .route("/{id}/subscribe", web::delete().to(unsubscribe)),
    );
}
