//! User registration and profile updates

use sqlx::PgPool;
use tracing::info;

use crate::auth::{hash_password, Auth};
use crate::db::users;
use crate::error::{AppError, AppResult};
use crate::links;
use crate::models::{RegisterRequest, RegisterResponse, UpdateUsernameRequest, UserData};

pub const MAX_EMAIL_LEN: usize = 254;
pub const MIN_PASSWORD_LEN: usize = 12;
pub const MAX_PASSWORD_LEN: usize = 256;
pub const MIN_USERNAME_LEN: usize = 3;
pub const MAX_USERNAME_LEN: usize = 32;

/// Basic email validation: one `@`, a non-empty local part and a dotted domain
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') || email.chars().any(char::is_whitespace) {
        return false;
    }

    if domain.is_empty() || !domain.contains('.') {
        return false;
    }

    !domain.split('.').any(str::is_empty)
}

/// Trim, lowercase and validate an email address
pub fn normalize_email(raw: &str) -> AppResult<String> {
    let email = raw.trim().to_lowercase();
    if email.len() > MAX_EMAIL_LEN || !is_valid_email(&email) {
        return Err(AppError::bad_data("A valid email address is required."));
    }
    Ok(email)
}

/// Check the password length in characters
pub fn validate_password(password: &str) -> AppResult<()> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::bad_data(format!(
            "The password must be between {} and {} characters long.",
            MIN_PASSWORD_LEN, MAX_PASSWORD_LEN
        )));
    }
    Ok(())
}

/// Trim and validate a username
pub fn normalize_username(raw: &str) -> AppResult<String> {
    let username = raw.trim();
    let len = username.chars().count();
    if !(MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&len) {
        return Err(AppError::bad_data(format!(
            "The username must be between {} and {} characters long.",
            MIN_USERNAME_LEN, MAX_USERNAME_LEN
        )));
    }
    Ok(username.to_string())
}

/// Create a user together with their empty anime list
pub async fn register(pool: &PgPool, request: RegisterRequest) -> AppResult<RegisterResponse> {
    let email = normalize_email(&request.email)?;
    validate_password(&request.password)?;
    let username = normalize_username(&request.username)?;

    let password = request.password;
    let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))??;

    let user = users::create_user_with_list(pool, &email, &username, &password_hash).await?;
    info!("User registered: {} ({})", user.username, user.id);

    Ok(RegisterResponse {
        user_data: UserData::from(&user),
        links: vec![links::profile_link(user.id)],
    })
}

/// Rename the caller and their anime list
pub async fn update_username(
    pool: &PgPool,
    auth: &Auth,
    request: UpdateUsernameRequest,
) -> AppResult<()> {
    let username = normalize_username(&request.username)?;
    users::update_username(pool, auth.user_id, &username).await?;
    info!("User {} renamed to {}", auth.user_id, username);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_is_valid_email_valid() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(is_valid_email("user+tag@example.org"));
        assert!(is_valid_email("a@b.co"));
    }

    #[test]
    fn test_is_valid_email_invalid() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("invalid"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("test@"));
        assert!(!is_valid_email("test@.com"));
        assert!(!is_valid_email("test@example"));
        assert!(!is_valid_email("test@@example.com"));
        assert!(!is_valid_email("test@example..com"));
        assert!(!is_valid_email("te st@example.com"));
    }

    #[test]
    fn test_normalize_email_trims_and_lowercases() {
        assert_eq!(
            normalize_email("  Jane.Doe@Example.COM ").unwrap(),
            "jane.doe@example.com"
        );
    }

    #[test]
    fn test_normalize_email_rejects_long_address() {
        let email = format!("{}@example.com", "a".repeat(250));
        let err = normalize_email(&email).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validate_password_bounds() {
        assert!(validate_password(&"a".repeat(11)).is_err());
        assert!(validate_password(&"a".repeat(12)).is_ok());
        assert!(validate_password(&"a".repeat(256)).is_ok());
        assert!(validate_password(&"a".repeat(257)).is_err());
    }

    #[test]
    fn test_validate_password_counts_characters() {
        // 12 characters, 36 bytes
        assert!(validate_password(&"密".repeat(12)).is_ok());
    }

    #[test]
    fn test_normalize_username_bounds() {
        assert_eq!(normalize_username("  abc  ").unwrap(), "abc");
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("   ab   ").is_err());
        assert!(normalize_username(&"x".repeat(32)).is_ok());
        assert!(normalize_username(&"x".repeat(33)).is_err());
    }
}
