use shared_types::{AppError, CreateSessionRequest, Session, UpdateSessionRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const SESSION_COLUMNS: &str =
    "id, owner_id, client_id, title, location, starts_at, ends_at, notes, created_at";

pub async fn create(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    req: &CreateSessionRequest,
) -> Result<Session, AppError> {
    let row = sqlx::query_as::<_, Session>(&format!(
        r#"
        INSERT INTO sessions (owner_id, client_id, title, location, starts_at, ends_at, notes)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(req.client_id)
    .bind(&req.title)
    .bind(&req.location)
    .bind(req.starts_at)
    .bind(req.ends_at)
    .bind(&req.notes)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn find_by_id(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<Session>, AppError> {
    let row = sqlx::query_as::<_, Session>(&format!(
        "SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Upcoming first, so the calendar view reads top-down.
pub async fn list_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<Session>, AppError> {
    let rows = sqlx::query_as::<_, Session>(&format!(
        "SELECT {SESSION_COLUMNS} FROM sessions WHERE owner_id = $1 ORDER BY starts_at ASC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

pub async fn update(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
    req: &UpdateSessionRequest,
) -> Result<Option<Session>, AppError> {
    let row = sqlx::query_as::<_, Session>(&format!(
        r#"
        UPDATE sessions
        SET client_id = COALESCE($3, client_id),
            title = COALESCE($4, title),
            location = COALESCE($5, location),
            starts_at = COALESCE($6, starts_at),
            ends_at = COALESCE($7, ends_at),
            notes = COALESCE($8, notes)
        WHERE id = $1 AND owner_id = $2
        RETURNING {SESSION_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(req.client_id)
    .bind(&req.title)
    .bind(&req.location)
    .bind(req.starts_at)
    .bind(req.ends_at)
    .bind(&req.notes)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn delete(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
