use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::county::ReportFormat;
use crate::invoice::Invoice;

/// Concrete artifact kind an export request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Csv,
    Pdf,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Csv => "csv",
            ExportKind::Pdf => "pdf",
        }
    }
}

impl From<ReportFormat> for ExportKind {
    fn from(format: ReportFormat) -> Self {
        match format {
            ReportFormat::CsvLinePerInvoice => ExportKind::Csv,
            ReportFormat::PdfLinePerInvoice | ReportFormat::PdfGroupedByCase => ExportKind::Pdf,
        }
    }
}

/// Aggregate totals over the selected invoice rows. Always derived from
/// exactly the rows returned alongside them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ExportTotals {
    pub cases: i64,
    pub hours: f64,
    pub amount: f64,
}

/// JSON preview of an export: county summary, resolved kind, totals, and a
/// truncated row list. Wire names are camelCase per the public API contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExportPreview {
    pub county: ExportCountySummary,
    pub export_kind: ExportKind,
    pub totals: ExportTotals,
    pub invoices: Vec<ExportPreviewRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExportCountySummary {
    pub id: Uuid,
    pub name: String,
    pub report_format: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ExportPreviewRow {
    pub id: Uuid,
    pub case_number: String,
    pub matter: String,
    pub contact: String,
    pub hours: f64,
    pub rate: f64,
    pub total: f64,
    pub created_at: DateTime<Utc>,
}

impl From<&crate::county::County> for ExportCountySummary {
    fn from(c: &crate::county::County) -> Self {
        Self {
            id: c.id,
            name: c.name.clone(),
            report_format: c.report_format.clone(),
        }
    }
}

impl From<&Invoice> for ExportPreviewRow {
    fn from(i: &Invoice) -> Self {
        Self {
            id: i.id,
            case_number: i.case_number.clone(),
            matter: i.matter.clone(),
            contact: i.contact.clone(),
            hours: i.hours_or_zero(),
            rate: i.rate_or_zero(),
            // Surfaced to cents, matching the rendered report bodies.
            total: (i.total() * 100.0).round() / 100.0,
            created_at: i.created_at,
        }
    }
}
