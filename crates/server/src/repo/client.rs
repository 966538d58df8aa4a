use shared_types::{AppError, Client, CreateClientRequest, UpdateClientRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const CLIENT_COLUMNS: &str = "id, owner_id, name, email, phone, notes, created_at, updated_at";

pub async fn create(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    req: &CreateClientRequest,
) -> Result<Client, AppError> {
    let row = sqlx::query_as::<_, Client>(&format!(
        r#"
        INSERT INTO clients (owner_id, name, email, phone, notes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {CLIENT_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone)
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
) -> Result<Option<Client>, AppError> {
    let row = sqlx::query_as::<_, Client>(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn list_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<Client>, AppError> {
    let rows = sqlx::query_as::<_, Client>(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE owner_id = $1 ORDER BY name ASC"
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
    req: &UpdateClientRequest,
) -> Result<Option<Client>, AppError> {
    let row = sqlx::query_as::<_, Client>(&format!(
        r#"
        UPDATE clients
        SET name = COALESCE($3, name),
            email = COALESCE($4, email),
            phone = COALESCE($5, phone),
            notes = COALESCE($6, notes),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING {CLIENT_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(&req.name)
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.notes)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

pub async fn delete(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM clients WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
