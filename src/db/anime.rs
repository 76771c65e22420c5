//! Anime catalogue repository

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::RepositoryResult;
use crate::models::{Anime, AnimeSeason, Broadcast, MinimizedAnime, NewAnime};

fn minimized_from_row(row: &PgRow) -> MinimizedAnime {
    MinimizedAnime {
        anime_id: row.get("id"),
        title: row.get("title"),
        anime_type: row.get("type"),
        links: Vec::new(),
    }
}

fn anime_from_row(row: &PgRow) -> Anime {
    let broadcast = Broadcast {
        day: row.get("broadcast_day"),
        time: row.get("broadcast_time"),
        timezone: row.get("broadcast_timezone"),
        string: row.get("broadcast_string"),
    };
    let has_broadcast = broadcast.day.is_some()
        || broadcast.time.is_some()
        || broadcast.timezone.is_some()
        || broadcast.string.is_some();

    Anime {
        anime_id: row.get("id"),
        title: row.get("title"),
        anime_type: row.get("type"),
        episodes: row.get("episodes"),
        status: row.get("status"),
        anime_season: AnimeSeason {
            season: row.get("season"),
            year: row.get("season_year"),
        },
        synonyms: row.get("synonyms"),
        related_anime: row.get("related_anime"),
        tags: row.get("tags"),
        broadcast: has_broadcast.then_some(broadcast),
        links: Vec::new(),
    }
}

const INSERT_ANIME: &str = r#"
    INSERT INTO anime (
        title, type, episodes, status, season, season_year,
        synonyms, related_anime, tags,
        broadcast_day, broadcast_time, broadcast_timezone, broadcast_string
    )
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
    RETURNING id
"#;

fn bind_new_anime<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    anime: &'q NewAnime,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    let broadcast = anime.broadcast.as_ref();
    query
        .bind(&anime.title)
        .bind(anime.anime_type)
        .bind(anime.episodes)
        .bind(anime.status)
        .bind(anime.anime_season.season)
        .bind(anime.anime_season.year)
        .bind(&anime.synonyms)
        .bind(&anime.related_anime)
        .bind(&anime.tags)
        .bind(broadcast.and_then(|b| b.day.as_deref()))
        .bind(broadcast.and_then(|b| b.time.as_deref()))
        .bind(broadcast.and_then(|b| b.timezone.as_deref()))
        .bind(broadcast.and_then(|b| b.string.as_deref()))
}

/// Insert one anime and return its id
pub async fn insert_anime(pool: &PgPool, anime: &NewAnime) -> RepositoryResult<i32> {
    let row = bind_new_anime(sqlx::query(INSERT_ANIME), anime)
        .fetch_one(pool)
        .await?;
    Ok(row.get("id"))
}

/// Insert a batch of anime in one transaction
pub async fn insert_anime_batch(pool: &PgPool, anime_list: &[NewAnime]) -> RepositoryResult<u64> {
    if anime_list.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    for anime in anime_list {
        bind_new_anime(sqlx::query(INSERT_ANIME), anime)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    Ok(anime_list.len() as u64)
}

/// Total number of anime in the catalogue
pub async fn count_anime(pool: &PgPool) -> RepositoryResult<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM anime")
        .fetch_one(pool)
        .await?;
    Ok(row.get("count"))
}

/// One page of the catalogue, ordered by id
pub async fn get_anime_page(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> RepositoryResult<Vec<MinimizedAnime>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, type
        FROM anime
        ORDER BY id
        LIMIT $1 OFFSET $2
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(minimized_from_row).collect())
}

/// Number of anime whose title contains `title`, ignoring case
pub async fn count_search_results(pool: &PgPool, title: &str) -> RepositoryResult<i64> {
    let row = sqlx::query(
        "SELECT COUNT(*) AS count FROM anime WHERE POSITION(LOWER($1) IN LOWER(title)) > 0",
    )
    .bind(title)
    .fetch_one(pool)
    .await?;
    Ok(row.get("count"))
}

/// One page of anime whose title contains `title`, ignoring case
pub async fn search_anime(
    pool: &PgPool,
    title: &str,
    limit: i64,
    offset: i64,
) -> RepositoryResult<Vec<MinimizedAnime>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, type
        FROM anime
        WHERE POSITION(LOWER($1) IN LOWER(title)) > 0
        ORDER BY id
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(title)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(minimized_from_row).collect())
}

/// Fetch a full anime record
pub async fn get_anime_by_id(pool: &PgPool, id: i32) -> RepositoryResult<Option<Anime>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, type, episodes, status, season, season_year,
               synonyms, related_anime, tags,
               broadcast_day, broadcast_time, broadcast_timezone, broadcast_string
        FROM anime
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(anime_from_row))
}

/// Delete an anime
pub async fn delete_anime(pool: &PgPool, id: i32) -> RepositoryResult<bool> {
    let result = sqlx::query("DELETE FROM anime WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}


#[cfg(test)]
mod tests {
    use super::fixtures::new_anime;
    use super::*;
    use crate::db::test_support::{connect, unique_suffix};
    use crate::models::AnimeType;

    #[tokio::test]
    #[ignore]
    async fn test_anime_insert_and_fetch() {
        let pool = connect().await;
        let title = format!("Repository Test {}", unique_suffix());

        let id = insert_anime(&pool, &new_anime(&title))
            .await
            .expect("Failed to insert");

        let anime = get_anime_by_id(&pool, id)
            .await
            .expect("Failed to fetch")
            .expect("Anime should exist");
        assert_eq!(anime.title, title);
        assert_eq!(anime.anime_type, AnimeType::Tv);
        assert_eq!(anime.anime_season.year, Some(2023));
        assert!(anime.broadcast.is_none());

        delete_anime(&pool, id).await.expect("Failed to delete");
        assert!(get_anime_by_id(&pool, id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn test_search_is_case_insensitive() {
        let pool = connect().await;
        let marker = format!("ZqSearch{}", unique_suffix());
        let id = insert_anime(&pool, &new_anime(&format!("The {} Saga", marker)))
            .await
            .expect("Failed to insert");

        let needle = marker.to_lowercase();
        assert_eq!(count_search_results(&pool, &needle).await.unwrap(), 1);

        let found = search_anime(&pool, &needle, 20, 0).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].anime_id, id);

        delete_anime(&pool, id).await.expect("Failed to delete");
    }

    #[tokio::test]
    #[ignore]
    async fn test_anime_table_only_indexes_primary_key() {
        let pool = connect().await;

        let rows = sqlx::query("SELECT indexname FROM pg_indexes WHERE tablename = 'anime'")
            .fetch_all(&pool)
            .await
            .expect("Failed to list indexes");
        let names: Vec<String> = rows.iter().map(|row| row.get("indexname")).collect();

        assert_eq!(names, vec!["anime_pkey".to_string()]);
    }
}
