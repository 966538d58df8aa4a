use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use sqlx::{Pool, Postgres};

use crate::auth::AuthRequired;
use crate::report::csv::render_csv;
use crate::report::layout::{paginate, ReportLayout};
use crate::report::selector::{select_report, ReportSelection};
use crate::typst::{build_report_source, compile_typst};
use shared_types::{
    AppError, ExportCountySummary, ExportKind, ExportPreview, ExportPreviewRow,
};

use super::parse_uuid;

/// Rows included in a preview response. The full set only ships in the
/// downloaded artifact.
const PREVIEW_ROW_LIMIT: usize = 25;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ExportParams {
    /// Truthy values ("1", "true", "yes") return a JSON preview instead of
    /// the artifact.
    #[serde(default)]
    pub preview: Option<String>,
    /// One-off format override; does not touch the stored preference.
    #[serde(default)]
    pub format: Option<String>,
}

impl ExportParams {
    pub fn wants_preview(&self) -> bool {
        matches!(
            self.preview.as_deref().map(str::trim),
            Some("1") | Some("true") | Some("yes")
        )
    }
}

/// Filename-safe version of a county name: alphanumerics kept, runs of
/// anything else collapsed to single dashes.
fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    let trimmed = out.trim_end_matches('-');
    if trimmed.is_empty() {
        "county".to_string()
    } else {
        trimmed.to_string()
    }
}

fn attachment_headers(filename: &str, content_type: &'static str) -> Result<HeaderMap, AppError> {
    let disposition = format!("attachment; filename=\"{}\"", filename);
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition)
            .map_err(|_| AppError::internal("Invalid export filename"))?,
    );
    Ok(headers)
}

fn preview_response(selection: &ReportSelection) -> Json<ExportPreview> {
    let invoices: Vec<ExportPreviewRow> = selection
        .rows
        .iter()
        .take(PREVIEW_ROW_LIMIT)
        .map(ExportPreviewRow::from)
        .collect();

    Json(ExportPreview {
        county: ExportCountySummary::from(&selection.county),
        export_kind: selection.kind,
        totals: selection.totals,
        invoices,
    })
}

// ---------------------------------------------------------------------------
// GET /api/counties/{id}/export
// ---------------------------------------------------------------------------

/// Export the county's month-end report.
///
/// The artifact covers the county's Sent invoices for the calling owner.
/// The output format follows the county's stored preference unless the
/// `format` query parameter overrides it for this request; `preview=1`
/// returns row and totals JSON without rendering anything.
#[utoipa::path(
    get,
    path = "/api/counties/{id}/export",
    params(
        ("id" = String, Path, description = "County UUID"),
        ExportParams
    ),
    responses(
        (status = 200, description = "Report artifact (CSV or PDF) or JSON preview"),
        (status = 404, description = "Not found", body = AppError)
    ),
    security(("bearer_auth" = [])),
    tag = "export"
)]
pub async fn export_county(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<String>,
    Query(params): Query<ExportParams>,
) -> Result<axum::response::Response, AppError> {
    let uuid = parse_uuid(&id)?;

    let selection = select_report(&pool, claims.sub, uuid, params.format.as_deref()).await?;

    if params.wants_preview() {
        return Ok(preview_response(&selection).into_response());
    }

    let basename = sanitize_filename(&selection.county.name);

    match selection.kind {
        ExportKind::Csv => {
            let body = render_csv(&selection.rows)?;
            let headers =
                attachment_headers(&format!("{basename}-report.csv"), "text/csv; charset=utf-8")?;
            Ok((StatusCode::OK, headers, body).into_response())
        }
        ExportKind::Pdf => {
            let document = paginate(
                &selection.county,
                &selection.rows,
                &selection.totals,
                ReportLayout::default(),
            );
            let source = build_report_source(&document);
            let body = compile_typst(&source).await?;
            let headers =
                attachment_headers(&format!("{basename}-report.pdf"), "application/pdf")?;
            Ok((StatusCode::OK, headers, body).into_response())
        }
    }
}
