//! Data models for the Anime List API
//!
//! This module contains all data structures used throughout the application:
//! request bodies, response envelopes, store records and webhook payloads.

use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============================================================================
// Shared
// ============================================================================

/// A HATEOAS link advertising a related action
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct Link {
    /// Relationship of the target to the current resource
    pub rel: String,
    /// Relative (or absolute) target URI, possibly a URI template
    pub href: String,
    /// HTTP method to use on the target
    pub method: String,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            method: method.into(),
        }
    }
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct ErrorBody {
    /// HTTP status code
    pub status: u16,
    /// Message explaining the cause of the error
    pub message: String,
}

impl ErrorBody {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
        }
    }
}

/// Response of the API entry point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct EntryPoint {
    pub links: Vec<Link>,
}

// ============================================================================
// Users and Authentication
// ============================================================================

/// Stored user row, including the password hash
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: i32,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// Public user data
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub user_id: i32,
    pub email: String,
    pub username: String,
}

impl From<&UserRecord> for UserData {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            email: user.email.clone(),
            username: user.username.clone(),
        }
    }
}

/// Request body for user registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// User email address
    #[schema(example = "janedoe@example.com")]
    pub email: String,
    /// Password, 12 to 256 characters
    #[schema(example = "supersecretturbopassword")]
    pub password: String,
    /// Unique username, 3 to 32 characters
    #[schema(example = "janeDoe123")]
    pub username: String,
}

/// Response for a successful registration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub user_data: UserData,
    pub links: Vec<Link>,
}

/// Request body for updating the username
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateUsernameRequest {
    /// The new username
    pub username: String,
}

/// Request body for login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Tokens issued on login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub links: Vec<Link>,
}

/// Request body for refreshing an access token
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Access token issued on refresh
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub links: Vec<Link>,
}

// ============================================================================
// Anime
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "anime_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimeType {
    Tv,
    Movie,
    Ova,
    Ona,
    Special,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "anime_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnimeStatus {
    Finished,
    Ongoing,
    #[serde(alias = "UPCOMING")]
    NotYetAired,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "anime_season", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct AnimeSeason {
    pub season: Season,
    pub year: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Broadcast {
    pub day: Option<String>,
    pub time: Option<String>,
    pub timezone: Option<String>,
    pub string: Option<String>,
}

/// Anime as inserted into the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewAnime {
    pub title: String,
    #[serde(rename = "type")]
    pub anime_type: AnimeType,
    pub episodes: Option<i32>,
    pub status: AnimeStatus,
    pub anime_season: AnimeSeason,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub related_anime: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub broadcast: Option<Broadcast>,
}

/// Full anime resource
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Anime {
    #[schema(example = 19)]
    pub anime_id: i32,
    #[schema(example = "Oshi no Ko")]
    pub title: String,
    #[serde(rename = "type")]
    pub anime_type: AnimeType,
    pub episodes: Option<i32>,
    pub status: AnimeStatus,
    pub anime_season: AnimeSeason,
    pub synonyms: Vec<String>,
    pub related_anime: Vec<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub broadcast: Option<Broadcast>,
    pub links: Vec<Link>,
}

/// Reduced anime reference used in lists
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MinimizedAnime {
    #[schema(example = 101)]
    pub anime_id: i32,
    #[schema(example = "Naruto")]
    pub title: String,
    #[serde(rename = "type")]
    pub anime_type: AnimeType,
    pub links: Vec<Link>,
}

impl From<&Anime> for MinimizedAnime {
    fn from(anime: &Anime) -> Self {
        Self {
            anime_id: anime.anime_id,
            title: anime.title.clone(),
            anime_type: anime.anime_type,
            links: Vec::new(),
        }
    }
}

/// One page of the anime catalogue
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimePage {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_anime: i64,
    pub data: Vec<MinimizedAnime>,
    pub links: Vec<Link>,
}

/// One page of title search results
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimeSearchPage {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_results: i64,
    pub data: Vec<MinimizedAnime>,
    pub links: Vec<Link>,
}

// ============================================================================
// Anime Lists
// ============================================================================

/// Stored anime list header
#[derive(Debug, Clone, PartialEq)]
pub struct AnimeListRecord {
    pub owner_id: i32,
    pub owner_username: String,
}

/// Index entry pointing at one user's list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimeListSummary {
    /// Absolute URL of the anime list
    pub link: String,
    pub owner_username: String,
}

/// One page of the anime list index
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimeListIndex {
    pub data: Vec<AnimeListSummary>,
    pub next: String,
    pub previous: String,
    pub total_pages: i64,
    pub current_page: i64,
    pub links: Vec<Link>,
}

/// A user's anime list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct AnimeListView {
    pub username: String,
    pub list: Vec<MinimizedAnime>,
    pub links: Vec<Link>,
}

// ============================================================================
// Webhooks
// ============================================================================

/// Stored webhook subscription
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRecord {
    pub id: i32,
    pub list_owner_id: i32,
    pub subscriber_id: i32,
    pub url: String,
    pub secret: String,
}

/// Request body for subscribing to a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct SubscribeRequest {
    /// Callback URL receiving notifications
    #[schema(example = "http://localhost:4000/callback-url")]
    pub url: String,
    /// Shared secret used to sign notifications
    pub secret: String,
}

/// Request body for unsubscribing from a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UnsubscribeRequest {
    pub url: Option<String>,
}

/// Subscription status of the caller on a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct SubscriptionStatus {
    pub subscribed: bool,
    /// Callback URLs registered by the caller
    pub data: Vec<String>,
    pub links: Vec<Link>,
}

/// Response for a successful subscription
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeResponse {
    pub anime_list: AnimeListView,
    pub links: Vec<Link>,
}

/// Kind of list mutation announced to subscribers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum WebhookEvent {
    AnimeAdded,
    AnimeRemoved,
}

/// Anime reference embedded in webhook payloads
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnimeRef {
    pub anime_id: i32,
    pub title: String,
    #[serde(rename = "type")]
    pub anime_type: AnimeType,
}

/// Body POSTed to every subscriber of a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub event: WebhookEvent,
    pub anime_list_owner_id: i32,
    pub owner_username: String,
    pub anime: AnimeRef,
    pub timestamp: DateTime<Utc>,
}
