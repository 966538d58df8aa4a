use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::AuthRequired;
use shared_types::{
    AppError, CreateInvoiceRequest, InvoiceResponse, InvoiceStatus, SendInvoiceRequest,
    UpdateInvoiceRequest,
};

use super::parse_uuid;

// ---------------------------------------------------------------------------
// GET /api/invoices
// ---------------------------------------------------------------------------

/// List the caller's invoices, most recent first.
#[utoipa::path(
    get,
    path = "/api/invoices",
    responses(
        (status = 200, description = "Invoice list", body = Vec<InvoiceResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn list_invoices(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<InvoiceResponse>>, AppError> {
    let invoices = crate::repo::invoice::list_by_owner(&pool, claims.sub).await?;
    let response: Vec<InvoiceResponse> = invoices.into_iter().map(InvoiceResponse::from).collect();
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// POST /api/invoices
// ---------------------------------------------------------------------------

/// Create an invoice in Draft status.
#[utoipa::path(
    post,
    path = "/api/invoices",
    request_body = CreateInvoiceRequest,
    responses(
        (status = 201, description = "Invoice created", body = InvoiceResponse),
        (status = 400, description = "Invalid request", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn create_invoice(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    if body.case_number.trim().is_empty() {
        return Err(AppError::bad_request("Case number cannot be empty"));
    }
    if !body.hours.is_finite() || body.hours < 0.0 {
        return Err(AppError::bad_request("Hours must be a non-negative number"));
    }
    if !body.rate.is_finite() || body.rate < 0.0 {
        return Err(AppError::bad_request("Rate must be a non-negative number"));
    }

    if let Some(county_id) = body.county_id {
        crate::repo::county::find_by_id(&pool, claims.sub, county_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Unknown county"))?;
    }

    let invoice = crate::repo::invoice::create(&pool, claims.sub, &body).await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

// ---------------------------------------------------------------------------
// GET /api/invoices/{id}
// ---------------------------------------------------------------------------

/// Get a single invoice by ID.
#[utoipa::path(
    get,
    path = "/api/invoices/{id}",
    params(("id" = String, Path, description = "Invoice UUID")),
    responses(
        (status = 200, description = "Invoice found", body = InvoiceResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn get_invoice(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let invoice = crate::repo::invoice::find_by_id(&pool, claims.sub, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice not found"))?;

    Ok(Json(InvoiceResponse::from(invoice)))
}

// ---------------------------------------------------------------------------
// PUT /api/invoices/{id}
// ---------------------------------------------------------------------------

/// Update an invoice. Omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/invoices/{id}",
    params(("id" = String, Path, description = "Invoice UUID")),
    request_body = UpdateInvoiceRequest,
    responses(
        (status = 200, description = "Invoice updated", body = InvoiceResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn update_invoice(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<UpdateInvoiceRequest>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    if let Some(status) = body.status.as_deref() {
        if InvoiceStatus::parse(status).is_none() {
            return Err(AppError::bad_request(format!(
                "Unknown invoice status '{status}'"
            )));
        }
    }
    if let Some(hours) = body.hours {
        if !hours.is_finite() || hours < 0.0 {
            return Err(AppError::bad_request("Hours must be a non-negative number"));
        }
    }
    if let Some(rate) = body.rate {
        if !rate.is_finite() || rate < 0.0 {
            return Err(AppError::bad_request("Rate must be a non-negative number"));
        }
    }

    if let Some(county_id) = body.county_id {
        crate::repo::county::find_by_id(&pool, claims.sub, county_id)
            .await?
            .ok_or_else(|| AppError::bad_request("Unknown county"))?;
    }

    let invoice = crate::repo::invoice::update(&pool, claims.sub, uuid, &body)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice not found"))?;

    Ok(Json(InvoiceResponse::from(invoice)))
}

// ---------------------------------------------------------------------------
// DELETE /api/invoices/{id}
// ---------------------------------------------------------------------------

/// Delete an invoice.
#[utoipa::path(
    delete,
    path = "/api/invoices/{id}",
    params(("id" = String, Path, description = "Invoice UUID")),
    responses(
        (status = 204, description = "Invoice deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn delete_invoice(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = parse_uuid(&id)?;

    let deleted = crate::repo::invoice::delete(&pool, claims.sub, uuid).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("Invoice not found"))
    }
}

// ---------------------------------------------------------------------------
// POST /api/invoices/{id}/send
// ---------------------------------------------------------------------------

/// Email an invoice to its billing contact and mark it Sent.
///
/// The status only moves after the provider accepts the message; a
/// rejected recipient or provider failure leaves the invoice untouched.
#[utoipa::path(
    post,
    path = "/api/invoices/{id}/send",
    params(("id" = String, Path, description = "Invoice UUID")),
    request_body = SendInvoiceRequest,
    responses(
        (status = 200, description = "Invoice sent", body = InvoiceResponse),
        (status = 400, description = "Recipient rejected", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "invoices"
)]
pub async fn send_invoice(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    body: Option<Json<SendInvoiceRequest>>,
) -> Result<Json<InvoiceResponse>, AppError> {
    let uuid = parse_uuid(&id)?;
    let body = body.map(|Json(b)| b).unwrap_or_default();

    let invoice = crate::repo::invoice::find_by_id(&pool, claims.sub, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Invoice not found"))?;

    let recipient = body
        .to
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(invoice.contact.as_str())
        .to_string();

    crate::outbound::validate_recipient(&recipient).await?;

    crate::mailgun::send_invoice_email(
        &recipient,
        &invoice.case_number,
        &invoice.matter,
        invoice.hours_or_zero(),
        invoice.rate_or_zero(),
        invoice.due_text.as_deref(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Failed to send invoice: {e}")))?;

    let updated =
        crate::repo::invoice::set_status(&pool, claims.sub, uuid, InvoiceStatus::Sent.as_str())
            .await?
            .ok_or_else(|| AppError::not_found("Invoice not found"))?;

    Ok(Json(InvoiceResponse::from(updated)))
}
