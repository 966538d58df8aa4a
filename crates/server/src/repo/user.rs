use shared_types::{AppError, UpdateSettingsRequest, User};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const USER_COLUMNS: &str =
    "id, email, display_name, default_rate, timezone, email_bounced, created_at";

/// Fetch or create the account for a verified email address. Accounts are
/// provisioned implicitly on first sign-in; a bounced flag is cleared when
/// the address proves deliverable again by completing a magic link.
pub async fn upsert_by_email(pool: &Pool<Postgres>, email: &str) -> Result<User, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email)
        VALUES ($1)
        ON CONFLICT (email) DO UPDATE SET email_bounced = FALSE
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(email)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn update_settings(
    pool: &Pool<Postgres>,
    id: Uuid,
    req: &UpdateSettingsRequest,
) -> Result<Option<User>, AppError> {
    let row = sqlx::query_as::<_, User>(&format!(
        r#"
        UPDATE users
        SET display_name = COALESCE($2, display_name),
            default_rate = COALESCE($3, default_rate),
            timezone = COALESCE($4, timezone)
        WHERE id = $1
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(&req.display_name)
    .bind(req.default_rate)
    .bind(&req.timezone)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Record a hard bounce from the mail provider for this address.
pub async fn set_email_bounced(pool: &Pool<Postgres>, email: &str) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE users SET email_bounced = TRUE WHERE email = $1")
        .bind(email)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
