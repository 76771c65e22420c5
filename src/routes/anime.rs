//! Anime routes
//!
//! - GET /anime - Paginated catalogue
//! - GET /anime/search - Case-insensitive title search
//! - GET /anime/{id} - Full anime details

use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use utoipa::IntoParams;

use super::{request_target, AppState, PageQuery};
use crate::auth::OptionalAuth;
use crate::error::AppResult;
use crate::models::{Anime, AnimePage, AnimeSearchPage, ErrorBody};
use crate::services::{anime, pagination::parse_page};

/// Query parameters for the search endpoint
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Text contained in the title, ignoring case
    pub title: Option<String>,
    /// Page number, defaults to 1
    pub page: Option<String>,
}

/// GET /anime - List the anime catalogue, 20 per page
#[utoipa::path(
    get,
    path = "/anime",
    tag = "anime",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of anime", body = AnimePage),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_anime(
    req: HttpRequest,
    data: web::Data<AppState>,
    viewer: OptionalAuth,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = parse_page(query.page.as_deref());
    let body = anime::list_anime(data.db.pool(), &request_target(&req), viewer.user(), page).await?;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /anime/search - Search the catalogue by title
#[utoipa::path(
    get,
    path = "/anime/search",
    tag = "anime",
    params(SearchQuery),
    responses(
        (status = 200, description = "One page of matching anime", body = AnimeSearchPage),
        (status = 400, description = "Missing title", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn search_anime(
    req: HttpRequest,
    data: web::Data<AppState>,
    viewer: OptionalAuth,
    query: web::Query<SearchQuery>,
) -> AppResult<HttpResponse> {
    let page = parse_page(query.page.as_deref());
    let body = anime::search_anime(
        data.db.pool(),
        &request_target(&req),
        viewer.user(),
        query.title.as_deref(),
        page,
    )
    .await?;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /anime/{id} - Get one anime
#[utoipa::path(
    get,
    path = "/anime/{id}",
    tag = "anime",
    params(
        ("id" = i32, Path, description = "Anime id")
    ),
    responses(
        (status = 200, description = "Anime details", body = Anime),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 404, description = "Anime not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn get_anime(
    req: HttpRequest,
    data: web::Data<AppState>,
    viewer: OptionalAuth,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let body = anime::get_anime(
        data.db.pool(),
        &request_target(&req),
        viewer.user(),
        path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(body))
}

/// Configure anime routes
pub fn configure_anime_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/anime")
            .route("", web::get().to(list_anime))
            .route("/", web::get().to(list_anime))
            .route("/search", web::get().to(search_anime))
            .route("/{id}", web::get().to(get_anime)),
    );
}
