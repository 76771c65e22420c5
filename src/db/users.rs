//! User repository
//!
//! A user and their anime list are created and renamed together.

use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::{RepositoryError, RepositoryResult};
use crate::models::UserRecord;

fn user_from_row(row: &PgRow) -> UserRecord {
    UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        username: row.get("username"),
        password_hash: row.get("password_hash"),
    }
}

/// Insert a user together with their empty anime list
///
/// Fails with `RepositoryError::Duplicate` when the email or username is taken.
pub async fn create_user_with_list(
    pool: &PgPool,
    email: &str,
    username: &str,
    password_hash: &str,
) -> RepositoryResult<UserRecord> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query(
        r#"
        INSERT INTO users (email, username, password_hash)
        VALUES ($1, $2, $3)
        RETURNING id, email, username, password_hash
        "#,
    )
    .bind(email)
    .bind(username)
    .bind(password_hash)
    .fetch_one(&mut *tx)
    .await
    .map_err(RepositoryError::from_write)?;

    let user = user_from_row(&row);

    sqlx::query("INSERT INTO anime_lists (owner_id, owner_username) VALUES ($1, $2)")
        .bind(user.id)
        .bind(&user.username)
        .execute(&mut *tx)
        .await
        .map_err(RepositoryError::from_write)?;

    tx.commit().await?;
    Ok(user)
}

/// Find a user by (already normalised) email
pub async fn find_user_by_email(pool: &PgPool, email: &str) -> RepositoryResult<Option<UserRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, username, password_hash
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Find a user by id
pub async fn find_user_by_id(pool: &PgPool, id: i32) -> RepositoryResult<Option<UserRecord>> {
    let row = sqlx::query(
        r#"
        SELECT id, email, username, password_hash
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Rename a user and the owner name on their anime list in one transaction
pub async fn update_username(pool: &PgPool, user_id: i32, username: &str) -> RepositoryResult<()> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE users SET username = $1, updated_at = CURRENT_TIMESTAMP WHERE id = $2",
    )
    .bind(username)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(RepositoryError::from_write)?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::NotFound(format!("user {}", user_id)));
    }

    sqlx::query(
        "UPDATE anime_lists SET owner_username = $1, updated_at = CURRENT_TIMESTAMP WHERE owner_id = $2",
    )
    .bind(username)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Delete a user; their list, entries and webhooks cascade
pub async fn delete_user(pool: &PgPool, id: i32) -> RepositoryResult<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::anime_lists::find_anime_list;
    use crate::db::test_support::{connect, unique_suffix};

    // Integration tests that require a database connection
    // These are marked with #[ignore] and can be run with `cargo test -- --ignored`

    #[tokio::test]
    #[ignore]
    async fn test_create_user_creates_list() {
        let pool = connect().await;
        let suffix = unique_suffix();
        let email = format!("user{}@example.com", suffix);
        let username = format!("u{}", suffix);

        let user = create_user_with_list(&pool, &email, &username, "hash")
            .await
            .expect("Failed to create user");

        let list = find_anime_list(&pool, user.id)
            .await
            .expect("Failed to fetch list")
            .expect("List should exist");
        assert_eq!(list.owner_username, username);

        let found = find_user_by_email(&pool, &email).await.expect("Failed to fetch");
        assert_eq!(found.map(|u| u.id), Some(user.id));

        delete_user(&pool, user.id).await.expect("Failed to delete");
    }

    #[tokio::test]
    #[ignore]
    async fn test_duplicate_email_is_reported() {
        let pool = connect().await;
        let suffix = unique_suffix();
        let email = format!("dup{}@example.com", suffix);

        let user = create_user_with_list(&pool, &email, &format!("a{}", suffix), "hash")
            .await
            .expect("Failed to create user");

        let second = create_user_with_list(&pool, &email, &format!("b{}", suffix), "hash").await;
        assert!(matches!(second, Err(RepositoryError::Duplicate(_))));

        delete_user(&pool, user.id).await.expect("Failed to delete");
    }

    #[tokio::test]
    #[ignore]
    async fn test_update_username_renames_list() {
        let pool = connect().await;
        let suffix = unique_suffix();

        let user = create_user_with_list(
            &pool,
            &format!("rename{}@example.com", suffix),
            &format!("old{}", suffix),
            "hash",
        )
        .await
        .expect("Failed to create user");

        let new_name = format!("new{}", suffix);
        update_username(&pool, user.id, &new_name)
            .await
            .expect("Failed to rename");

        let list = find_anime_list(&pool, user.id).await.unwrap().unwrap();
        assert_eq!(list.owner_username, new_name);

        let missing = update_username(&pool, -1, "ghost").await;
        assert!(matches!(missing, Err(RepositoryError::NotFound(_))));

        delete_user(&pool, user.id).await.expect("Failed to delete");
    }
}
