//! API Routes module for the Anime List API
//!
//! This module wires every HTTP handler, the extractor error handlers that
//! keep failures in the `{status, message}` shape, and the OpenAPI document.

pub mod anime;
pub mod anime_lists;
pub mod auth;
pub mod users;
pub mod webhooks;

use actix_web::middleware::DefaultHeaders;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use tracing::debug;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{IntoParams, Modify, OpenApi};

use crate::config::Config;
use crate::db::Database;
use crate::error::{AppError, AppResult, BAD_DATA_MESSAGE, NOT_FOUND_MESSAGE};
use crate::links::{self, RequestTarget};
use crate::models::{
    AccessTokenResponse, Anime, AnimeListIndex, AnimeListSummary, AnimeListView, AnimePage,
    AnimeRef, AnimeSearchPage, AnimeSeason, AnimeStatus, AnimeType, Broadcast, EntryPoint,
    ErrorBody, Link, LoginRequest, MinimizedAnime, RefreshRequest, RegisterRequest,
    RegisterResponse, Season, SubscribeRequest, SubscribeResponse, SubscriptionStatus,
    TokenResponse, UnsubscribeRequest, UpdateUsernameRequest, UserData, WebhookEvent,
    WebhookPayload,
};
use crate::webhook::WebhookNotifier;

/// Message for path ids that are not numbers
pub const INVALID_ID_MESSAGE: &str = "The id parameter must be a number.";

/// Application state shared across handlers
pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub notifier: WebhookNotifier,
}

/// Query parameters for paginated collections
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number; absent, non-numeric or non-positive values mean 1
    pub page: Option<String>,
}

/// Method, path and query of a request, for link generation
pub fn request_target(req: &HttpRequest) -> RequestTarget<'_> {
    RequestTarget::new(req.method().as_str(), req.path(), req.query_string())
}

/// GET / - API entry point
#[utoipa::path(
    get,
    path = "/",
    tag = "meta",
    responses(
        (status = 200, description = "Links to every top level resource", body = EntryPoint)
    )
)]
pub async fn entry_point() -> HttpResponse {
    HttpResponse::Ok().json(EntryPoint {
        links: links::entry_point_links(),
    })
}

/// Fallback for unknown routes
pub async fn not_found(req: HttpRequest) -> AppResult<HttpResponse> {
    debug!("No route for {} {}", req.method(), req.path());
    Err(AppError::not_found(NOT_FOUND_MESSAGE))
}

/// JSON body extractor config: malformed or unexpected bodies are bad data
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, req| {
        debug!("Rejected JSON body for {}: {}", req.path(), err);
        AppError::bad_data(BAD_DATA_MESSAGE).into()
    })
}

/// Path extractor config: ids must be numbers
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, req| {
        debug!("Rejected path {}: {}", req.path(), err);
        AppError::bad_data(INVALID_ID_MESSAGE).into()
    })
}

/// Query extractor config
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, req| {
        debug!("Rejected query for {}: {}", req.path(), err);
        AppError::bad_data(BAD_DATA_MESSAGE).into()
    })
}

/// Security headers added to every response
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("Referrer-Policy", "no-referrer"))
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Anime List API",
        version = "0.1.0",
        description = "Browse anime, keep per-user anime lists and subscribe to list changes with signed webhooks",
        license(
            name = "MIT"
        )
    ),
    paths(
        entry_point,
        users::register,
        users::update_username,
        auth::login,
        auth::refresh,
        anime::list_anime,
        anime::search_anime,
        anime::get_anime,
        anime_lists::list_anime_lists,
        anime_lists::get_anime_list,
        anime_lists::add_anime,
        anime_lists::remove_anime,
        webhooks::subscription_status,
        webhooks::subscribe,
        webhooks::unsubscribe
    ),
    components(
        schemas(
            Link,
            ErrorBody,
            EntryPoint,
            UserData,
            RegisterRequest,
            RegisterResponse,
            UpdateUsernameRequest,
            LoginRequest,
            TokenResponse,
            RefreshRequest,
            AccessTokenResponse,
            AnimeType,
            AnimeStatus,
            Season,
            AnimeSeason,
            Broadcast,
            Anime,
            MinimizedAnime,
            AnimePage,
            AnimeSearchPage,
            AnimeListSummary,
            AnimeListIndex,
            AnimeListView,
            SubscribeRequest,
            UnsubscribeRequest,
            SubscriptionStatus,
            SubscribeResponse,
            WebhookEvent,
            AnimeRef,
            WebhookPayload
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "meta", description = "API entry point"),
        (name = "user", description = "Registration and profile"),
        (name = "auth", description = "Login and token refresh"),
        (name = "anime", description = "Anime catalogue"),
        (name = "anime-list", description = "Per-user anime lists"),
        (name = "webhook", description = "Signed notifications on list changes")
    )
)]
pub struct ApiDoc;

/// Configure API routes and the extractor error handlers
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(path_config())
        .app_data(query_config())
        .route("/", web::get().to(entry_point));

    users::configure_user_routes(cfg);
    auth::configure_auth_routes(cfg);
    anime::configure_anime_routes(cfg);
    anime_lists::configure_anime_list_routes(cfg);
    webhooks::configure_webhook_routes(cfg);
}
