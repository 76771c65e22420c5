//! Anime list repository

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{RepositoryError, RepositoryResult};
use crate::models::{AnimeListRecord, MinimizedAnime};

fn list_from_row(row: &PgRow) -> AnimeListRecord {
    AnimeListRecord {
        owner_id: row.get("owner_id"),
        owner_username: row.get("owner_username"),
    }
}

/// Total number of anime lists
pub async fn count_anime_lists(pool: &PgPool) -> RepositoryResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM anime_lists")
        .fetch_one(pool)
        .await?;
    Ok(row.get("count"))
}

/// One page of anime lists, ordered by owner id
pub async fn get_anime_list_page(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> RepositoryResult<Vec<AnimeListRecord>> {
    let rows = sqlx::query(
        r#"
        SELECT owner_id, owner_username
        FROM anime_lists
        ORDER BY owner_id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(list_from_row).collect())
}

/// Find the list owned by `owner_id`
pub async fn find_anime_list(
    pool: &PgPool,
    owner_id: i32,
) -> RepositoryResult<Option<AnimeListRecord>> {
    let row = sqlx::query("SELECT owner_id, owner_username FROM anime_lists WHERE owner_id = $1")
        .bind(owner_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(list_from_row))
}

/// Anime on a list, in the order they were added
pub async fn get_list_entries(pool: &PgPool, owner_id: i32) -> RepositoryResult<Vec<MinimizedAnime>> {
    let rows = sqlx::query(
        r#"
        SELECT a.id, a.title, a.type
        FROM anime_list_entries e
        JOIN anime a ON a.id = e.anime_id
        WHERE e.owner_id = $1
        ORDER BY e.id
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    let entries = rows
        .iter()
        .map(|row| MinimizedAnime {
            anime_id: row.get("id"),
            title: row.get("title"),
            anime_type: row.get("type"),
            links: Vec::new(),
        })
        .collect();

    Ok(entries)
}

/// Append an anime to a list
///
/// Fails with `RepositoryError::Duplicate` when the anime is already on it.
pub async fn add_anime_to_list(pool: &PgPool, owner_id: i32, anime_id: i32) -> RepositoryResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("INSERT INTO anime_list_entries (owner_id, anime_id) VALUES ($1, $2)")
        .bind(owner_id)
        .bind(anime_id)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

    sqlx::query("UPDATE anime_lists SET updated_at = CURRENT_TIMESTAMP WHERE owner_id = $1")
        .bind(owner_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}

/// Remove an anime from a list; returns whether an entry was removed
pub async fn remove_anime_from_list(
    pool: &PgPool,
    owner_id: i32,
    anime_id: i32,
) -> RepositoryResult<bool> {
    let result = sqlx::query("DELETE FROM anime_list_entries WHERE owner_id = $1 AND anime_id = $2")
        .bind(owner_id)
        .bind(anime_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
