//! Webhook subscriptions and list change notifications

use chrono::Utc;
use reqwest::Url;
use sqlx::PgPool;
use tracing::{info, warn};

use super::anime_lists::{decorate_list_entries, require_anime_list};
use crate::auth::Auth;
use crate::db::{anime_lists, webhooks};
use crate::error::{AppError, AppResult};
use crate::links::{self, RequestTarget};
use crate::models::{
    AnimeListRecord, AnimeListView, AnimeRef, SubscribeRequest, SubscribeResponse,
    SubscriptionStatus, UnsubscribeRequest, WebhookEvent, WebhookPayload,
};
use crate::webhook::WebhookNotifier;

pub const INVALID_URL_MESSAGE: &str = "A valid http or https url is required.";
pub const MISSING_SECRET_MESSAGE: &str = "A secret is required.";

/// Parse a callback URL, accepting only http and https
pub fn validate_callback_url(raw: &str) -> AppResult<String> {
    let url = Url::parse(raw.trim()).map_err(|_| AppError::bad_data(INVALID_URL_MESSAGE))?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(AppError::bad_data(INVALID_URL_MESSAGE));
    }

    Ok(url.to_string())
}

/// Notify every webhook on `list` about a change
///
/// Never fails: lookup errors are logged and deliveries run detached.
pub async fn notify_list_change(
    pool: &PgPool,
    notifier: &WebhookNotifier,
    list: &AnimeListRecord,
    event: WebhookEvent,
    anime: AnimeRef,
) {
    let hooks = match webhooks::get_webhooks_for_list(pool, list.owner_id).await {
        Ok(hooks) => hooks,
        Err(e) => {
            warn!("Failed to load webhooks for list {}: {}", list.owner_id, e);
            return;
        }
    };

    let payload = WebhookPayload {
        event,
        anime_list_owner_id: list.owner_id,
        owner_username: list.owner_username.clone(),
        anime,
        timestamp: Utc::now(),
    };

    let spawned = notifier.notify(hooks, &payload);
    if spawned > 0 {
        info!(
            "Dispatched {:?} for list {} to {} webhook(s)",
            event, list.owner_id, spawned
        );
    }
}

/// Which callback URLs the caller registered on a list
pub async fn subscription_status(
    pool: &PgPool,
    target: &RequestTarget<'_>,
    auth: &Auth,
    owner_id: i32,
) -> AppResult<SubscriptionStatus> {
    require_anime_list(pool, owner_id).await?;
    let urls = webhooks::get_subscriber_urls(pool, owner_id, auth.user_id).await?;

    let mut specific = vec![links::owner_link(owner_id), links::subscribe_link(owner_id)];
    if !urls.is_empty() {
        specific.push(links::unsubscribe_link(owner_id));
    }

    Ok(SubscriptionStatus {
        subscribed: !urls.is_empty(),
        data: urls,
        links: links::response_links(target, specific, Some(auth.user_id)),
    })
}

/// Register a callback URL on a list
///
/// Subscribing an already registered URL replaces its secret.
pub async fn subscribe(
    pool: &PgPool,
    target: &RequestTarget<'_>,
    auth: &Auth,
    owner_id: i32,
    request: SubscribeRequest,
) -> AppResult<SubscribeResponse> {
    let url = validate_callback_url(&request.url)?;
    if request.secret.trim().is_empty() {
        return Err(AppError::bad_data(MISSING_SECRET_MESSAGE));
    }

    let list = require_anime_list(pool, owner_id).await?;
    webhooks::upsert_webhook(pool, owner_id, auth.user_id, &url, &request.secret).await?;
    info!("User {} subscribed to list {}", auth.user_id, owner_id);

    let mut entries = anime_lists::get_list_entries(pool, owner_id).await?;
    decorate_list_entries(&mut entries, owner_id, Some(auth));

    Ok(SubscribeResponse {
        anime_list: AnimeListView {
            username: list.owner_username,
            list: entries,
            links: vec![links::owner_link(owner_id), links::unsubscribe_link(owner_id)],
        },
        links: links::response_links(target, Vec::new(), Some(auth.user_id)),
    })
}

/// Remove a callback URL from a list; unknown URLs are ignored
pub async fn unsubscribe(
    pool: &PgPool,
    auth: &Auth,
    owner_id: i32,
    request: UnsubscribeRequest,
) -> AppResult<()> {
    let url = request
        .url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .ok_or_else(|| AppError::bad_data("The url field is required."))?;

    require_anime_list(pool, owner_id).await?;

    // Stored URLs are normalised, so try both spellings
    let mut removed = webhooks::delete_webhook(pool, owner_id, auth.user_id, url).await?;
    if !removed {
        if let Ok(normalised) = validate_callback_url(url) {
            removed = webhooks::delete_webhook(pool, owner_id, auth.user_id, &normalised).await?;
        }
    }

    if removed {
        info!("User {} unsubscribed from list {}", auth.user_id, owner_id);
    }
    Ok(())
}
