use shared_types::{AppError, CreateInvoiceRequest, Invoice, UpdateInvoiceRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

const INVOICE_COLUMNS: &str =
    "id, owner_id, county_id, case_number, matter, contact, hours, rate, status, due_text, created_at";

/// Insert a new invoice in Draft status.
pub async fn create(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    req: &CreateInvoiceRequest,
) -> Result<Invoice, AppError> {
    let row = sqlx::query_as::<_, Invoice>(&format!(
        r#"
        INSERT INTO invoices (owner_id, county_id, case_number, matter, contact, hours, rate, status, due_text)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 'Draft', $8)
        RETURNING {INVOICE_COLUMNS}
        "#
    ))
    .bind(owner_id)
    .bind(req.county_id)
    .bind(&req.case_number)
    .bind(&req.matter)
    .bind(&req.contact)
    .bind(req.hours)
    .bind(req.rate)
    .bind(&req.due_text)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Find an invoice by ID, scoped to the owner.
pub async fn find_by_id(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
) -> Result<Option<Invoice>, AppError> {
    let row = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = $1 AND owner_id = $2"
    ))
    .bind(id)
    .bind(owner_id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// List all invoices for this owner, most recent first.
pub async fn list_by_owner(pool: &Pool<Postgres>, owner_id: Uuid) -> Result<Vec<Invoice>, AppError> {
    let rows = sqlx::query_as::<_, Invoice>(&format!(
        "SELECT {INVOICE_COLUMNS} FROM invoices WHERE owner_id = $1 ORDER BY created_at DESC"
    ))
    .bind(owner_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// The county report row set: Sent invoices attached to the county, owned
/// by this owner, most recent first. Draft and already-reported invoices
/// never appear here.
pub async fn list_sent_by_county(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    county_id: Uuid,
) -> Result<Vec<Invoice>, AppError> {
    let rows = sqlx::query_as::<_, Invoice>(&format!(
        r#"
        SELECT {INVOICE_COLUMNS}
        FROM invoices
        WHERE owner_id = $1 AND county_id = $2 AND status = 'Sent'
        ORDER BY created_at DESC
        "#
    ))
    .bind(owner_id)
    .bind(county_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(rows)
}

/// Partial update. Omitted fields keep their stored values. Returns the
/// updated record or None when the invoice does not exist for this owner.
pub async fn update(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
    req: &UpdateInvoiceRequest,
) -> Result<Option<Invoice>, AppError> {
    let row = sqlx::query_as::<_, Invoice>(&format!(
        r#"
        UPDATE invoices
        SET county_id = COALESCE($3, county_id),
            case_number = COALESCE($4, case_number),
            matter = COALESCE($5, matter),
            contact = COALESCE($6, contact),
            hours = COALESCE($7, hours),
            rate = COALESCE($8, rate),
            status = COALESCE($9, status),
            due_text = COALESCE($10, due_text)
        WHERE id = $1 AND owner_id = $2
        RETURNING {INVOICE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(req.county_id)
    .bind(&req.case_number)
    .bind(&req.matter)
    .bind(&req.contact)
    .bind(req.hours)
    .bind(req.rate)
    .bind(&req.status)
    .bind(&req.due_text)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Move an invoice to a new lifecycle status. Returns the updated record
/// or None when the invoice does not exist for this owner.
pub async fn set_status(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    id: Uuid,
    status: &str,
) -> Result<Option<Invoice>, AppError> {
    let row = sqlx::query_as::<_, Invoice>(&format!(
        r#"
        UPDATE invoices
        SET status = $3
        WHERE id = $1 AND owner_id = $2
        RETURNING {INVOICE_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(owner_id)
    .bind(status)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)?;

    Ok(row)
}

/// Delete an invoice. Returns true if a row was actually deleted.
pub async fn delete(pool: &Pool<Postgres>, owner_id: Uuid, id: Uuid) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM invoices WHERE id = $1 AND owner_id = $2")
        .bind(id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)?;

    Ok(result.rows_affected() > 0)
}
