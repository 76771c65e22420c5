//! Anime list routes
//!
//! - GET /anime-list - Paginated index of every user's list
//! - GET /anime-list/{id} - One user's list
//! - POST /anime-list/{id}/anime/{animeId} - Add an anime (owner only)
//! - DELETE /anime-list/{id}/anime/{animeId} - Remove an anime (owner only)

use actix_web::{web, HttpRequest, HttpResponse};

use super::{request_target, AppState, PageQuery};
use crate::auth::{Auth, OptionalAuth};
use crate::error::AppResult;
use crate::models::{AnimeListIndex, AnimeListView, ErrorBody};
use crate::services::{anime_lists, pagination::parse_page};

/// GET /anime-list - Index of anime lists, 20 per page
#[utoipa::path(
    get,
    path = "/anime-list",
    tag = "anime-list",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of anime lists", body = AnimeListIndex),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_anime_lists(
    req: HttpRequest,
    data: web::Data<AppState>,
    viewer: OptionalAuth,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = parse_page(query.page.as_deref());
    let body = anime_lists::list_anime_lists(
        data.db.pool(),
        &data.config.base_url,
        &request_target(&req),
        viewer.user(),
        page,
    )
    .await?;
    Ok(HttpResponse::Ok().json(body))
}

/// GET /anime-list/{id} - Show a user's anime list
#[utoipa::path(
    get,
    path = "/anime-list/{id}",
    tag = "anime-list",
    params(
        ("id" = i32, Path, description = "Owner's user id")
    ),
    responses(
        (status = 200, description = "The anime list", body = AnimeListView),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 404, description = "Anime list not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn get_anime_list(
    req: HttpRequest,
    data: web::Data<AppState>,
    viewer: OptionalAuth,
    path: web::Path<i32>,
) -> AppResult<HttpResponse> {
    let body = anime_lists::get_anime_list(
        data.db.pool(),
        &request_target(&req),
        viewer.user(),
        path.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(body))
}

/// POST /anime-list/{id}/anime/{animeId} - Add an anime to the caller's list
///
/// Subscribers of the list are notified with an `anime-added` event.
#[utoipa::path(
    post,
    path = "/anime-list/{id}/anime/{animeId}",
    tag = "anime-list",
    params(
        ("id" = i32, Path, description = "Owner's user id"),
        ("animeId" = i32, Path, description = "Anime id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Anime added, returns the updated list", body = AnimeListView),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorBody),
        (status = 404, description = "Anime list or anime not found", body = ErrorBody),
        (status = 409, description = "Anime already in the list", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn add_anime(
    req: HttpRequest,
    data: web::Data<AppState>,
    auth: Auth,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (owner_id, anime_id) = path.into_inner();
    let body = anime_lists::add_anime(
        data.db.pool(),
        &data.notifier,
        &request_target(&req),
        &auth,
        owner_id,
        anime_id,
    )
    .await?;
    Ok(HttpResponse::Created().json(body))
}

/// DELETE /anime-list/{id}/anime/{animeId} - Remove an anime from the caller's list
///
/// Subscribers of the list are notified with an `anime-removed` event.
#[utoipa::path(
    delete,
    path = "/anime-list/{id}/anime/{animeId}",
    tag = "anime-list",
    params(
        ("id" = i32, Path, description = "Owner's user id"),
        ("animeId" = i32, Path, description = "Anime id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Anime removed"),
        (status = 400, description = "Id is not a number", body = ErrorBody),
        (status = 401, description = "Not authenticated or not the owner", body = ErrorBody),
        (status = 404, description = "Anime list or entry not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn remove_anime(
    data: web::Data<AppState>,
    auth: Auth,
    path: web::Path<(i32, i32)>,
) -> AppResult<HttpResponse> {
    let (owner_id, anime_id) = path.into_inner();
    anime_lists::remove_anime(data.db.pool(), &data.notifier, &auth, owner_id, anime_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure anime list routes
pub fn configure_anime_list_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/anime-list")
            .route("", web::get().to(list_anime_lists))
            .route("/", web::get().to(list_anime_lists))
            .route("/{id}", web::get().to(get_anime_list))
            .route("/{id}/anime/{anime_id}", web::post().to(add_anime))
            .route("/{id}/anime/{anime_id}", web::delete().to(remove_anime)),
    );
}
