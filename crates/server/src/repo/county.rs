use shared_types::{AppError, County};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Insert a new county for this owner.
pub async fn create(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    name: &str,
    report_format: &str,
    next_due: Option<&str>,
) -> Result<County, AppError> {
    let row = sqlx::query_as::<_, County>(
        r#"
        INSERT INTO counties (owner_id, name, report_format, next_due)
        VALUES ($1, $2, $3, $4)
        RETURNING id, owner_id, name, report_format, next_due, created_at, updated_at
        "#,
    )
    .bind(owner_id)
    .bind(name)
    .bind(report_format)
    .bind(next_due)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Find a county by ID, scoped to the owner.
pub async fn find_by_id(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<County>, AppError> {
    let row = sqlx::query_as::<_, County>(
        r#"
        SELECT id, owner_id, name, report_format, next_due, created_at, updated_at
        FROM counties
        WHERE id = $1 AND owner_id = $2
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// List all counties this owner reports to, alphabetically.
pub async fn list_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<County>, AppError> {
    let rows = sqlx::query_as::<_, County>(
        r#"
        SELECT id, owner_id, name, report_format, next_due, created_at, updated_at
        FROM counties
        WHERE owner_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Partial update. Omitted fields keep their stored values. Returns the
/// updated record or None when the county does not exist for this owner.
pub async fn update(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
    name: Option<&str>,
    report_format: Option<&str>,
    next_due: Option<&str>,
) -> Result<Option<County>, AppError> {
    let row = sqlx::query_as::<_, County>(
        r#"
        UPDATE counties
        SET name = COALESCE($3, name),
            report_format = COALESCE($4, report_format),
            next_due = COALESCE($5, next_due),
            updated_at = NOW()
        WHERE id = $1 AND owner_id = $2
        RETURNING id, owner_id, name, report_format, next_due, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(name)
    .bind(report_format)
    .bind(next_due)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Delete a county. Returns true if a row was actually deleted.
pub async fn delete(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM counties WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
