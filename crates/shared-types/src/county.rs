use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// County-level report format preference. Only the three canonical strings
/// below are ever persisted; the legacy short forms `csv` and `pdf` are
/// accepted at the boundary and normalized on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    CsvLinePerInvoice,
    PdfLinePerInvoice,
    PdfGroupedByCase,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::CsvLinePerInvoice => "csv_line_per_invoice",
            ReportFormat::PdfLinePerInvoice => "pdf_line_per_invoice",
            ReportFormat::PdfGroupedByCase => "pdf_grouped_by_case",
        }
    }

    /// Parse a canonical format string. Legacy short forms are NOT accepted
    /// here; use [`ReportFormat::normalize`] at the request boundary.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "csv_line_per_invoice" => Some(ReportFormat::CsvLinePerInvoice),
            "pdf_line_per_invoice" => Some(ReportFormat::PdfLinePerInvoice),
            "pdf_grouped_by_case" => Some(ReportFormat::PdfGroupedByCase),
            _ => None,
        }
    }

    /// Normalize a caller-supplied format string. Accepts the three canonical
    /// values plus the legacy short forms (`csv`, `pdf`). Unrecognized input
    /// yields `None`; callers decide whether that is an error (county
    /// create/update) or a silent fall-through (export override).
    pub fn normalize(raw: &str) -> Option<Self> {
        match raw.trim() {
            "csv" => Some(ReportFormat::CsvLinePerInvoice),
            "pdf" => Some(ReportFormat::PdfLinePerInvoice),
            other => Self::parse(other),
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A jurisdiction used for consolidated billing reports, owned by exactly
/// one mediator account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct County {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    /// Stored as a canonical format string. Kept as text rather than
    /// [`ReportFormat`] so a legacy or hand-edited row never aborts an
    /// export; unrecognized values fall back to CSV at selection time.
    pub report_format: String,
    pub next_due: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// County as returned by the REST API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CountyResponse {
    pub id: Uuid,
    pub name: String,
    pub report_format: String,
    pub next_due: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<County> for CountyResponse {
    fn from(c: County) -> Self {
        Self {
            id: c.id,
            name: c.name,
            report_format: c.report_format,
            next_due: c.next_due,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateCountyRequest {
    pub name: String,
    /// Canonical or legacy format string; defaults to CSV when omitted.
    #[serde(default)]
    pub report_format: Option<String>,
    #[serde(default)]
    pub next_due: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateCountyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub report_format: Option<String>,
    #[serde(default)]
    pub next_due: Option<String>,
}
