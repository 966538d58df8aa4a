use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice lifecycle status. Only `Sent` invoices are eligible for county
/// export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum InvoiceStatus {
    Draft,
    Sent,
    ForCountyReport,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Draft => "Draft",
            InvoiceStatus::Sent => "Sent",
            InvoiceStatus::ForCountyReport => "For county report",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Draft" => Some(InvoiceStatus::Draft),
            "Sent" => Some(InvoiceStatus::Sent),
            "For county report" => Some(InvoiceStatus::ForCountyReport),
            _ => None,
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A billable unit tied to a case and, optionally, a county.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub county_id: Option<Uuid>,
    pub case_number: String,
    pub matter: String,
    pub contact: String,
    pub hours: f64,
    pub rate: f64,
    pub status: String,
    pub due_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    /// Billed hours, coerced to zero when the stored value is not a finite
    /// non-negative number.
    pub fn hours_or_zero(&self) -> f64 {
        if self.hours.is_finite() && self.hours >= 0.0 {
            self.hours
        } else {
            0.0
        }
    }

    /// Hourly rate with the same coercion as [`Invoice::hours_or_zero`].
    pub fn rate_or_zero(&self) -> f64 {
        if self.rate.is_finite() && self.rate >= 0.0 {
            self.rate
        } else {
            0.0
        }
    }

    /// Total amount is always derived, never stored.
    pub fn total(&self) -> f64 {
        self.hours_or_zero() * self.rate_or_zero()
    }
}

/// Invoice as returned by the REST API. `total` is computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InvoiceResponse {
    pub id: Uuid,
    pub county_id: Option<Uuid>,
    pub case_number: String,
    pub matter: String,
    pub contact: String,
    pub hours: f64,
    pub rate: f64,
    pub total: f64,
    pub status: String,
    pub due_text: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(i: Invoice) -> Self {
        let total = i.total();
        Self {
            id: i.id,
            county_id: i.county_id,
            case_number: i.case_number,
            matter: i.matter,
            contact: i.contact,
            hours: i.hours,
            rate: i.rate,
            total,
            status: i.status,
            due_text: i.due_text,
            created_at: i.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateInvoiceRequest {
    #[serde(default)]
    pub county_id: Option<Uuid>,
    pub case_number: String,
    pub matter: String,
    pub contact: String,
    pub hours: f64,
    pub rate: f64,
    #[serde(default)]
    pub due_text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateInvoiceRequest {
    #[serde(default)]
    pub county_id: Option<Uuid>,
    #[serde(default)]
    pub case_number: Option<String>,
    #[serde(default)]
    pub matter: Option<String>,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub hours: Option<f64>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub due_text: Option<String>,
}

/// Request body for `POST /api/invoices/{id}/send`. The recipient defaults
/// to the invoice's billing contact when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SendInvoiceRequest {
    #[serde(default)]
    pub to: Option<String>,
}
