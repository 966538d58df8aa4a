use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use crate::auth::AuthRequired;
use shared_types::{
    AppError, CountyResponse, CreateCountyRequest, ReportFormat, UpdateCountyRequest,
};

use super::parse_uuid;

/// Normalize a caller-supplied report format on write. Unlike the export
/// path, an unknown value here is a hard 422: this is durable state, not a
/// one-off render.
fn normalize_format(raw: &str) -> Result<ReportFormat, AppError> {
    ReportFormat::normalize(raw).ok_or_else(|| {
        AppError::validation(
            format!("Unknown report format '{}'", raw.trim()),
            [(
                "report_format".to_string(),
                "Must be one of csv_line_per_invoice, pdf_line_per_invoice, pdf_grouped_by_case"
                    .to_string(),
            )]
            .into(),
        )
    })
}

// ---------------------------------------------------------------------------
// GET /api/counties
// ---------------------------------------------------------------------------

/// List the caller's counties.
#[utoipa::path(
    get,
    path = "/api/counties",
    responses(
        (status = 200, description = "County list", body = Vec<CountyResponse>)
    ),
    security(("bearer_auth" = [])),
    tag = "counties"
)]
pub async fn list_counties(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<CountyResponse>>, AppError> {
    let counties = crate::repo::county::list_by_owner(&pool, claims.sub).await?;
    let response: Vec<CountyResponse> = counties.into_iter().map(CountyResponse::from).collect();
    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// POST /api/counties
// ---------------------------------------------------------------------------

/// Create a county. The report format defaults to CSV when omitted.
#[utoipa::path(
    post,
    path = "/api/counties",
    request_body = CreateCountyRequest,
    responses(
        (status = 201, description = "County created", body = CountyResponse),
        (status = 422, description = "Unknown report format", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "counties"
)]
pub async fn create_county(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Json(body): Json<CreateCountyRequest>,
) -> Result<(StatusCode, Json<CountyResponse>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::bad_request("County name cannot be empty"));
    }

    let format = match body.report_format.as_deref() {
        Some(raw) => normalize_format(raw)?,
        None => ReportFormat::CsvLinePerInvoice,
    };

    let county = crate::repo::county::create(
        &pool,
        claims.sub,
        body.name.trim(),
        format.as_str(),
        body.next_due.as_deref(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(CountyResponse::from(county))))
}

// ---------------------------------------------------------------------------
// GET /api/counties/{id}
// ---------------------------------------------------------------------------

/// Get a single county by ID.
#[utoipa::path(
    get,
    path = "/api/counties/{id}",
    params(("id" = String, Path, description = "County UUID")),
    responses(
        (status = 200, description = "County found", body = CountyResponse),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "counties"
)]
pub async fn get_county(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<Json<CountyResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let county = crate::repo::county::find_by_id(&pool, claims.sub, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("County not found"))?;

    Ok(Json(CountyResponse::from(county)))
}

// ---------------------------------------------------------------------------
// PUT /api/counties/{id}
// ---------------------------------------------------------------------------

/// Update a county. Omitted fields are left unchanged.
#[utoipa::path(
    put,
    path = "/api/counties/{id}",
    params(("id" = String, Path, description = "County UUID")),
    request_body = UpdateCountyRequest,
    responses(
        (status = 200, description = "County updated", body = CountyResponse),
        (status = 404, description = "Not found", body = AppError),
        (status = 422, description = "Unknown report format", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "counties"
)]
pub async fn update_county(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Json(body): Json<UpdateCountyRequest>,
) -> Result<Json<CountyResponse>, AppError> {
    let uuid = parse_uuid(&id)?;

    let format = match body.report_format.as_deref() {
        Some(raw) => Some(normalize_format(raw)?),
        None => None,
    };

    let county = crate::repo::county::update(
        &pool,
        claims.sub,
        uuid,
        body.name.as_deref(),
        format.map(|f| f.as_str()),
        body.next_due.as_deref(),
    )
    .await?
    .ok_or_else(|| AppError::not_found("County not found"))?;

    Ok(Json(CountyResponse::from(county)))
}

// ---------------------------------------------------------------------------
// DELETE /api/counties/{id}
// ---------------------------------------------------------------------------

/// Delete a county.
#[utoipa::path(
    delete,
    path = "/api/counties/{id}",
    params(("id" = String, Path, description = "County UUID")),
    responses(
        (status = 204, description = "County deleted"),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "counties"
)]
pub async fn delete_county(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let uuid = parse_uuid(&id)?;

    let deleted = crate::repo::county::delete(&pool, claims.sub, uuid).await?;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::not_found("County not found"))
    }
}
