use shared_types::{AppError, User};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::jwt::hash_token;
use crate::error_convert::SqlxErrorExt;

/// Magic-link tokens are short-lived; a stale link in an inbox should not
/// stay usable for long.
fn login_token_expiry_minutes() -> i64 {
    std::env::var("LOGIN_TOKEN_EXPIRY_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15)
}

/// Create a single-use login token for the given email address and return
/// the raw token. Only the SHA-256 hash is persisted.
pub async fn create_login_token(pool: &Pool<Postgres>, email: &str) -> Result<String, AppError> {
    let token = Uuid::new_v4().to_string();
    let token_hash = hash_token(&token);
    let expires_at =
        chrono::Utc::now() + chrono::Duration::minutes(login_token_expiry_minutes());

    sqlx::query("INSERT INTO login_tokens (email, token_hash, expires_at) VALUES ($1, $2, $3)")
        .bind(email)
        .bind(token_hash)
        .bind(expires_at)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(token)
}

/// Burn a login token and return the account it belongs to, creating the
/// account on first sign-in. Expired, unknown, and already-used tokens all
/// fail the same way so the response does not reveal which case applied.
pub async fn verify_login_token(pool: &Pool<Postgres>, token: &str) -> Result<User, AppError> {
    let token_hash = hash_token(token);

    let email: String = sqlx::query_scalar(
        r#"
        UPDATE login_tokens
        SET used_at = NOW()
        WHERE token_hash = $1 AND expires_at > NOW() AND used_at IS NULL
        RETURNING email
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?
    .ok_or_else(|| AppError::unauthorized("Invalid or expired sign-in link"))?;

    crate::repo::user::upsert_by_email(pool, &email).await
}
