use csv::{QuoteStyle, WriterBuilder};
use shared_types::{AppError, Invoice};

use super::round2;

/// Fixed header row. Column order is part of the export contract.
pub const CSV_HEADER: [&str; 6] = ["Case Number", "Matter", "Bill To", "Hours", "Rate", "Total"];

/// Serialize the selected rows as CSV.
///
/// Every field is quoted and internal quotes are doubled, so commas,
/// quotes, or newlines inside matter/contact text never corrupt the
/// structure. Row order matches the selector's ordering; identical input
/// rows always produce byte-identical output.
pub fn render_csv(rows: &[Invoice]) -> Result<String, AppError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(Vec::new());

    writer
        .write_record(CSV_HEADER)
        .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;

    for row in rows {
        writer
            .write_record([
                row.case_number.as_str(),
                row.matter.as_str(),
                row.contact.as_str(),
                &format!("{:.2}", row.hours_or_zero()),
                &format!("{:.2}", row.rate_or_zero()),
                &format!("{:.2}", round2(row.total())),
            ])
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;

    String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV was not UTF-8: {e}")))
}
