use shared_types::{County, ExportTotals, Invoice, ReportFormat};

use super::round2;

/// Fixed page geometry for the paginated report, in PDF points.
///
/// Landscape US Letter. None of these values are derived from content;
/// page breaks depend only on row count. Truncation widths are
/// presentation constants tied to the column offsets, kept here rather
/// than inline at the call sites.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub left_margin: f64,
    /// Vertical cursor start on every page.
    pub top_y: f64,
    /// Advance after the title line (larger type than body lines).
    pub title_advance: f64,
    /// Gap between the summary block and the column header.
    pub header_gap: f64,
    pub line_height: f64,
    /// A row whose cursor exceeds this starts a new page.
    pub bottom_y: f64,
    pub col_case: f64,
    pub col_matter: f64,
    pub col_hours: f64,
    pub col_total: f64,
    pub col_bill: f64,
    pub matter_max: usize,
    pub matter_keep: usize,
    pub contact_max: usize,
    pub contact_keep: usize,
}

impl Default for ReportLayout {
    fn default() -> Self {
        Self {
            page_width: 792.0,
            page_height: 612.0,
            left_margin: 40.0,
            top_y: 54.0,
            title_advance: 24.0,
            header_gap: 8.0,
            line_height: 16.0,
            bottom_y: 560.0,
            col_case: 40.0,
            col_matter: 150.0,
            col_hours: 470.0,
            col_total: 540.0,
            col_bill: 620.0,
            matter_max: 40,
            matter_keep: 37,
            contact_max: 30,
            contact_keep: 27,
        }
    }
}

/// One positioned line on a report page.
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Title {
        y: f64,
        text: String,
    },
    Summary {
        y: f64,
        text: String,
    },
    FormatLabel {
        y: f64,
        text: String,
    },
    Header {
        y: f64,
    },
    Row {
        y: f64,
        case_number: String,
        matter: String,
        hours: String,
        total: String,
        contact: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPage {
    pub lines: Vec<Line>,
}

impl ReportPage {
    /// Count of invoice rows on this page.
    pub fn row_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, Line::Row { .. }))
            .count()
    }
}

/// A fully laid-out report: deterministic in content and page breaks for
/// identical input and layout constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub layout: ReportLayout,
    pub pages: Vec<ReportPage>,
}

/// Truncate a cell to `max` characters, keeping `keep` and appending an
/// ellipsis when it overflows. Counts characters, not bytes.
pub fn truncate_cell(text: &str, max: usize, keep: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut truncated: String = text.chars().take(keep).collect();
        truncated.push_str("...");
        truncated
    }
}

/// Lay the selected rows out into pages.
///
/// Page 1 carries the title, the totals summary, and (for the
/// grouped-by-case format) a label line; the row layout itself is
/// identical to the line-per-invoice variant (the grouping is labeling
/// only). Every page emits the five-column header before any invoice row.
pub fn paginate(
    county: &County,
    rows: &[Invoice],
    totals: &ExportTotals,
    layout: ReportLayout,
) -> ReportDocument {
    let mut pages = Vec::new();
    let mut lines = Vec::new();
    let mut y = layout.top_y;

    lines.push(Line::Title {
        y,
        text: format!("{} - Month End Report", county.name),
    });
    y += layout.title_advance;

    lines.push(Line::Summary {
        y,
        text: format!(
            "{} invoices  |  {:.2} hours  |  ${:.2} total",
            totals.cases, totals.hours, totals.amount
        ),
    });
    y += layout.line_height;

    if county.report_format == ReportFormat::PdfGroupedByCase.as_str() {
        lines.push(Line::FormatLabel {
            y,
            text: "Format: PDF (grouped by case)".to_string(),
        });
        y += layout.line_height;
    }

    y += layout.header_gap;
    lines.push(Line::Header { y });
    y += layout.line_height;

    for row in rows {
        if y > layout.bottom_y {
            pages.push(ReportPage { lines });
            lines = Vec::new();
            y = layout.top_y;
            lines.push(Line::Header { y });
            y += layout.line_height;
        }

        lines.push(Line::Row {
            y,
            case_number: row.case_number.clone(),
            matter: truncate_cell(&row.matter, layout.matter_max, layout.matter_keep),
            hours: format!("{:.2}", row.hours_or_zero()),
            total: format!("{:.2}", round2(row.total())),
            contact: truncate_cell(&row.contact, layout.contact_max, layout.contact_keep),
        });
        y += layout.line_height;
    }

    pages.push(ReportPage { lines });

    ReportDocument { layout, pages }
}
