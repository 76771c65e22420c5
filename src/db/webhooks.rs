//! Webhook subscription repository

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::RepositoryResult;
use crate::models::WebhookRecord;

fn webhook_from_row(row: &PgRow) -> WebhookRecord {
    WebhookRecord {
        id: row.get("id"),
        list_owner_id: row.get("list_owner_id"),
        subscriber_id: row.get("subscriber_id"),
        url: row.get("url"),
        secret: row.get("secret"),
    }
}

/// Register a callback URL on a list, replacing the secret if it already exists
pub async fn upsert_webhook(
    pool: &PgPool,
    list_owner_id: i32,
    subscriber_id: i32,
    url: &str,
    secret: &str,
) -> RepositoryResult<WebhookRecord> {
    let row = sqlx::query(
        r#"
        INSERT INTO webhooks (list_owner_id, subscriber_id, url, secret)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (list_owner_id, subscriber_id, url) DO UPDATE SET
            secret = EXCLUDED.secret
        RETURNING id, list_owner_id, subscriber_id, url, secret
        "#,
    )
    .bind(list_owner_id)
    .bind(subscriber_id)
    .bind(url)
    .bind(secret)
    .fetch_one(pool)
    .await?;

    Ok(webhook_from_row(&row))
}

/// Remove a subscriber's callback URL from a list
pub async fn delete_webhook(
    pool: &PgPool,
    list_owner_id: i32,
    subscriber_id: i32,
    url: &str,
) -> RepositoryResult<bool> {
    let result = sqlx::query(
        "DELETE FROM webhooks WHERE list_owner_id = $1 AND subscriber_id = $2 AND url = $3",
    )
    .bind(list_owner_id)
    .bind(subscriber_id)
    .bind(url)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Callback URLs a subscriber registered on a list
pub async fn get_subscriber_urls(
    pool: &PgPool,
    list_owner_id: i32,
    subscriber_id: i32,
) -> RepositoryResult<Vec<String>> {
    let rows = sqlx::query(
        r#"
        SELECT url
        FROM webhooks
        WHERE list_owner_id = $1 AND subscriber_id = $2
        ORDER BY id
        "#,
    )
    .bind(list_owner_id)
    .bind(subscriber_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(|row| row.get("url")).collect())
}

/// Every webhook registered on a list
pub async fn get_webhooks_for_list(
    pool: &PgPool,
    list_owner_id: i32,
) -> RepositoryResult<Vec<WebhookRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT id, list_owner_id, subscriber_id, url, secret
        FROM webhooks
        WHERE list_owner_id = $1
        ORDER BY id
        "#,
    )
    .bind(list_owner_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(webhook_from_row).collect())
}
