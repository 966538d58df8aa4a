use shared_types::{AppError, County, ExportKind, ExportTotals, Invoice, ReportFormat};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::round2;

/// Everything the renderer needs: the county, the resolved output kind,
/// the Sent rows (most recent first), and totals derived from exactly
/// those rows.
#[derive(Debug, Clone)]
pub struct ReportSelection {
    pub county: County,
    pub kind: ExportKind,
    pub rows: Vec<Invoice>,
    pub totals: ExportTotals,
}

/// Resolve the effective output kind.
///
/// An explicit override wins when it normalizes to a known format; an
/// override that normalizes to nothing is silently ignored and the stored
/// preference applies. A stored value that is not one of the canonical
/// strings falls back to CSV rather than failing; a report is always
/// better than an error on a billing deadline.
pub fn effective_kind(stored_format: &str, format_override: Option<&str>) -> ExportKind {
    if let Some(raw) = format_override {
        if let Some(format) = ReportFormat::normalize(raw) {
            return format.into();
        }
    }

    match ReportFormat::parse(stored_format) {
        Some(format) => format.into(),
        None => ExportKind::Csv,
    }
}

/// Aggregate totals over the given rows. The amount is
/// `round(sum(hours_i * rate_i), 2)`: products are summed unrounded and
/// rounded once at the end.
pub fn compute_totals(rows: &[Invoice]) -> ExportTotals {
    let hours: f64 = rows.iter().map(Invoice::hours_or_zero).sum();
    let amount: f64 = rows.iter().map(Invoice::total).sum();

    ExportTotals {
        cases: rows.len() as i64,
        hours: round2(hours),
        amount: round2(amount),
    }
}

/// Load the county and its Sent invoices, scoped strictly to the owner.
///
/// A county that does not exist for this owner is a 404; a store failure
/// on either read surfaces as a 500 without any partial row set.
pub async fn select_report(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    county_id: Uuid,
    format_override: Option<&str>,
) -> Result<ReportSelection, AppError> {
    let county = crate::repo::county::find_by_id(pool, owner_id, county_id)
        .await?
        .ok_or_else(|| AppError::not_found("County not found"))?;

    let kind = effective_kind(&county.report_format, format_override);

    let rows = crate::repo::invoice::list_sent_by_county(pool, owner_id, county_id).await?;
    let totals = compute_totals(&rows);

    Ok(ReportSelection {
        county,
        kind,
        rows,
        totals,
    })
}
