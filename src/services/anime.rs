//! Anime catalogue browsing and search

use sqlx::PgPool;

use super::pagination::{offset, total_pages, PAGE_SIZE};
use crate::auth::Auth;
use crate::db::anime;
use crate::error::{AppError, AppResult};
use crate::links::{self, RequestTarget};
use crate::models::{Anime, AnimePage, AnimeSearchPage, MinimizedAnime};

pub const ANIME_NOT_FOUND_MESSAGE: &str = "Anime could not be found with that ID.";

/// Attach `self` and, for a logged in viewer, `add-to-list` to each item
pub fn decorate_catalogue_items(items: &mut [MinimizedAnime], viewer: Option<&Auth>) {
    for item in items {
        item.links.push(links::anime_self_link(item.anime_id));
        if let Some(user) = viewer {
            item.links
                .push(links::add_to_list_link(user.user_id, item.anime_id));
        }
    }
}

/// One page of the catalogue
pub async fn list_anime(
    pool: &PgPool,
    target: &RequestTarget<'_>,
    viewer: Option<&Auth>,
    page: i64,
) -> AppResult<AnimePage> {
    let total_anime = anime::count_anime(pool).await?;
    let total_pages = total_pages(total_anime);

    let mut data = anime::get_anime_page(pool, PAGE_SIZE, offset(page)).await?;
    decorate_catalogue_items(&mut data, viewer);

    Ok(AnimePage {
        current_page: page,
        total_pages,
        total_anime,
        data,
        links: links::response_links(
            target,
            links::page_links("/anime", page, total_pages),
            viewer.map(|user| user.user_id),
        ),
    })
}

/// One page of anime whose title contains `title`
pub async fn search_anime(
    pool: &PgPool,
    target: &RequestTarget<'_>,
    viewer: Option<&Auth>,
    title: Option<&str>,
    page: i64,
) -> AppResult<AnimeSearchPage> {
    let title = title
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .ok_or_else(|| AppError::bad_data("The title query parameter is required."))?;

    let total_results = anime::count_search_results(pool, title).await?;
    let total_pages = total_pages(total_results);

    let mut data = anime::search_anime(pool, title, PAGE_SIZE, offset(page)).await?;
    decorate_catalogue_items(&mut data, viewer);

    let base = format!("/anime/search?title={}", urlencoding::encode(title));

    Ok(AnimeSearchPage {
        current_page: page,
        total_pages,
        total_results,
        data,
        links: links::response_links(
            target,
            links::page_links(&base, page, total_pages),
            viewer.map(|user| user.user_id),
        ),
    })
}

/// Full details of one anime
pub async fn get_anime(
    pool: &PgPool,
    target: &RequestTarget<'_>,
    viewer: Option<&Auth>,
    anime_id: i32,
) -> AppResult<Anime> {
    let mut anime = anime::get_anime_by_id(pool, anime_id)
        .await?
        .ok_or_else(|| AppError::not_found(ANIME_NOT_FOUND_MESSAGE))?;

    let specific = viewer
        .map(|user| vec![links::add_to_list_link(user.user_id, anime.anime_id)])
        .unwrap_or_default();
    anime.links = links::response_links(target, specific, viewer.map(|user| user.user_id));

    Ok(anime)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnimeType;

    fn item(id: i32) -> MinimizedAnime {
        MinimizedAnime {
            anime_id: id,
            title: format!("Anime {}", id),
            anime_type: AnimeType::Movie,
            links: Vec::new(),
        }
    }

    #[test]
    fn test_anonymous_items_only_link_to_themselves() {
        let mut items = vec![item(1), item(2)];
        decorate_catalogue_items(&mut items, None);

        assert_eq!(items[0].links, vec![links::anime_self_link(1)]);
        assert_eq!(items[1].links.len(), 1);
    }

    #[test]
    fn test_logged_in_items_can_be_added_to_list() {
        let viewer = Auth {
            user_id: 8,
            email: "a@b.co".to_string(),
            username: "viewer".to_string(),
        };
        let mut items = vec![item(3)];
        decorate_catalogue_items(&mut items, Some(&viewer));

        assert_eq!(
            items[0].links,
            vec![links::anime_self_link(3), links::add_to_list_link(8, 3)]
        );
    }
}
