use shared_types::{AppError, CreateMessageRequest, Message, UpdateMessageRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const MESSAGE_COLUMNS: &str = "id, owner_id, subject, body, read, created_at";

pub async fn create(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    req: &CreateMessageRequest,
) -> Result<Message, AppError> {
    let row = sqlx::query_as::<_, Message>(&format!(
        r#"
        INSERT INTO messages (owner_id, subject, body)
        VALUES ($1, $2, $3)
        RETURNING {MESSAGE_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(&req.subject)
    .bind(&req.body)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn list_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<Message>, AppError> {
    let rows = sqlx::query_as::<_, Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages WHERE owner_id = $1 ORDER BY created_at DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

pub async fn find_by_id(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<Message>, AppError> {
    let row = sqlx::query_as::<_, Message>(&format!(
        "SELECT {MESSAGE_COLUMNS} FROM messages WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn update(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
    req: &UpdateMessageRequest,
) -> Result<Option<Message>, AppError> {
    let row = sqlx::query_as::<_, Message>(&format!(
        r#"
        UPDATE messages
        SET subject = COALESCE($3, subject),
            body = COALESCE($4, body)
        WHERE id = $1 AND owner_id = $2
        RETURNING {MESSAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(&req.subject)
    .bind(&req.body)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Mark a message as read. Returns the updated record or None when the
/// message does not exist for this owner.
pub async fn mark_read(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<Message>, AppError> {
    let row = sqlx::query_as::<_, Message>(&format!(
        r#"
        UPDATE messages
        SET read = TRUE
        WHERE id = $1 AND owner_id = $2
        RETURNING {MESSAGE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn delete(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
