//! Anime list browsing and mutation

use sqlx::PgPool;
use tracing::info;

use super::anime::ANIME_NOT_FOUND_MESSAGE;
use super::pagination::{offset, total_pages, PAGE_SIZE};
use super::webhooks::notify_list_change;
use crate::auth::Auth;
use crate::db::{anime, anime_lists, RepositoryError};
use crate::error::{AppError, AppResult};
use crate::links::{self, RequestTarget};
use crate::models::{
    AnimeListIndex, AnimeListRecord, AnimeListSummary, AnimeListView, AnimeRef, MinimizedAnime,
    WebhookEvent,
};
use crate::webhook::WebhookNotifier;

pub const ANIME_LIST_NOT_FOUND_MESSAGE: &str = "Anime list could not be found with that ID.";
pub const ANIME_ALREADY_IN_LIST_MESSAGE: &str = "That anime is already in the anime list.";
pub const ANIME_NOT_IN_LIST_MESSAGE: &str = "That anime is not in the anime list.";

/// Fetch a list header or fail with 404
pub async fn require_anime_list(pool: &PgPool, owner_id: i32) -> AppResult<AnimeListRecord> {
    anime_lists::find_anime_list(pool, owner_id)
        .await?
        .ok_or_else(|| AppError::not_found(ANIME_LIST_NOT_FOUND_MESSAGE))
}

/// Absolute `anime-list` URLs for the paginated index
fn index_url(base_url: &str, page: i64) -> String {
    links::page_href(&format!("{}/anime-list", base_url), page)
}

/// Decorate a list's entries for `viewer`
///
/// The owner sees `remove-from-list` on every entry; everyone else only
/// gets the link to the anime itself.
pub fn decorate_list_entries(
    entries: &mut [MinimizedAnime],
    owner_id: i32,
    viewer: Option<&Auth>,
) {
    let is_owner = viewer.is_some_and(|user| user.user_id == owner_id);
    for entry in entries {
        entry.links.push(links::anime_info_link(entry.anime_id));
        if is_owner {
            entry
                .links
                .push(links::remove_from_list_link(owner_id, entry.anime_id));
        }
    }
}

/// Assemble the view of a list
pub fn list_view(
    list: &AnimeListRecord,
    mut entries: Vec<MinimizedAnime>,
    target: &RequestTarget<'_>,
    viewer: Option<&Auth>,
) -> AnimeListView {
    decorate_list_entries(&mut entries, list.owner_id, viewer);

    let specific = match viewer {
        Some(user) if user.user_id != list.owner_id => vec![links::subscribe_link(list.owner_id)],
        _ => Vec::new(),
    };

    AnimeListView {
        username: list.owner_username.clone(),
        list: entries,
        links: links::response_links(target, specific, viewer.map(|user| user.user_id)),
    }
}

/// One page of the anime list index
pub async fn list_anime_lists(
    pool: &PgPool,
    base_url: &str,
    target: &RequestTarget<'_>,
    viewer: Option<&Auth>,
    page: i64,
) -> AppResult<AnimeListIndex> {
    let total = anime_lists::count_anime_lists(pool).await?;
    let total_pages = total_pages(total);
    let records = anime_lists::get_anime_list_page(pool, PAGE_SIZE, offset(page)).await?;

    let data = records
        .into_iter()
        .map(|list| AnimeListSummary {
            link: format!("{}/anime-list/{}", base_url, list.owner_id),
            owner_username: list.owner_username,
        })
        .collect();

    let (next, previous) = links::adjacent_pages(page, total_pages);

    Ok(AnimeListIndex {
        data,
        next: index_url(base_url, next),
        previous: index_url(base_url, previous),
        total_pages,
        current_page: page,
        links: links::response_links(
            target,
            links::page_links("/anime-list", page, total_pages),
            viewer.map(|user| user.user_id),
        ),
    })
}

/// A user's anime list
pub async fn get_anime_list(
    pool: &PgPool,
    target: &RequestTarget<'_>,
    viewer: Option<&Auth>,
    owner_id: i32,
) -> AppResult<AnimeListView> {
    let list = require_anime_list(pool, owner_id).await?;
    let entries = anime_lists::get_list_entries(pool, owner_id).await?;
    Ok(list_view(&list, entries, target, viewer))
}

/// Append an anime to the caller's own list and notify subscribers
pub async fn add_anime(
    pool: &PgPool,
    notifier: &WebhookNotifier,
    target: &RequestTarget<'_>,
    auth: &Auth,
    owner_id: i32,
    anime_id: i32,
) -> AppResult<AnimeListView> {
    auth.ensure_owner(owner_id)?;

    let list = require_anime_list(pool, owner_id).await?;
    let anime = anime::get_anime_by_id(pool, anime_id)
        .await?
        .ok_or_else(|| AppError::not_found(ANIME_NOT_FOUND_MESSAGE))?;

    anime_lists::add_anime_to_list(pool, owner_id, anime_id)
        .await
        .map_err(|e| match e {
            RepositoryError::Duplicate(_) => AppError::conflict(ANIME_ALREADY_IN_LIST_MESSAGE),
            other => other.into(),
        })?;

    info!("User {} added anime {} to their list", owner_id, anime_id);

    notify_list_change(
        pool,
        notifier,
        &list,
        WebhookEvent::AnimeAdded,
        AnimeRef {
            anime_id: anime.anime_id,
            title: anime.title,
            anime_type: anime.anime_type,
        },
    )
    .await;

    let entries = anime_lists::get_list_entries(pool, owner_id).await?;
    Ok(list_view(&list, entries, target, Some(auth)))
}

/// Remove an anime from the caller's own list and notify subscribers
pub async fn remove_anime(
    pool: &PgPool,
    notifier: &WebhookNotifier,
    auth: &Auth,
    owner_id: i32,
    anime_id: i32,
) -> AppResult<()> {
    auth.ensure_owner(owner_id)?;

    let list = require_anime_list(pool, owner_id).await?;
    let entry = anime_lists::get_list_entries(pool, owner_id)
        .await?
        .into_iter()
        .find(|entry| entry.anime_id == anime_id)
        .ok_or_else(|| AppError::not_found(ANIME_NOT_IN_LIST_MESSAGE))?;

    if !anime_lists::remove_anime_from_list(pool, owner_id, anime_id).await? {
        return Err(AppError::not_found(ANIME_NOT_IN_LIST_MESSAGE));
    }

    info!("User {} removed anime {} from their list", owner_id, anime_id);

    notify_list_change(
        pool,
        notifier,
        &list,
        WebhookEvent::AnimeRemoved,
        AnimeRef {
            anime_id: entry.anime_id,
            title: entry.title,
            anime_type: entry.anime_type,
        },
    )
    .await;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnimeType;

    fn viewer(id: i32) -> Auth {
        Auth {
            user_id: id,
            email: format!("user{}@example.com", id),
            username: format!("user{}", id),
        }
    }

    fn list() -> AnimeListRecord {
        AnimeListRecord {
            owner_id: 5,
            owner_username: "owner".to_string(),
        }
    }

    fn entries() -> Vec<MinimizedAnime> {
        vec![MinimizedAnime {
            anime_id: 19,
            title: "Monster".to_string(),
            anime_type: AnimeType::Tv,
            links: Vec::new(),
        }]
    }

    fn rels(links: &[crate::models::Link]) -> Vec<&str> {
        links.iter().map(|l| l.rel.as_str()).collect()
    }

    #[test]
    fn test_owner_view_offers_removal() {
        let target = RequestTarget::new("GET", "/anime-list/5", "");
        let owner = viewer(5);
        let view = list_view(&list(), entries(), &target, Some(&owner));

        assert_eq!(view.username, "owner");
        assert_eq!(rels(&view.list[0].links), vec!["view-anime-info", "remove-from-list"]);
        assert!(!view.links.iter().any(|l| l.rel == "subscribe"));
    }

    #[test]
    fn test_other_user_view_offers_subscription() {
        let target = RequestTarget::new("GET", "/anime-list/5", "");
        let other = viewer(6);
        let view = list_view(&list(), entries(), &target, Some(&other));

        assert_eq!(rels(&view.list[0].links), vec!["view-anime-info"]);
        assert!(view.links.iter().any(|l| l.rel == "subscribe"
            && l.href == "/webhook/anime-list/5/subscribe"));
    }

    #[test]
    fn test_anonymous_view() {
        let target = RequestTarget::new("GET", "/anime-list/5", "");
        let view = list_view(&list(), entries(), &target, None);

        assert_eq!(rels(&view.list[0].links), vec!["view-anime-info"]);
        assert!(!view.links.iter().any(|l| l.rel == "subscribe"));
        assert!(view.links.iter().any(|l| l.rel == "login"));
    }

    #[test]
    fn test_index_url() {
        assert_eq!(
            index_url("http://localhost:3000", 2),
            "http://localhost:3000/anime-list?page=2"
        );
    }
}
