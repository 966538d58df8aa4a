use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::Datelike;
use ecow::EcoVec;
use shared_types::AppError;
use typst::diag::{FileError, FileResult, SourceDiagnostic};
use typst::foundations::{Bytes, Datetime};
use typst::layout::PagedDocument;
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};

use crate::report::layout::{Line, ReportDocument};

/// Escape special Typst characters inside string literals (`\`, `"`, `#`).
pub fn escape_typst(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('#', "\\#")
}

/// Build a complete Typst source for a county report by prepending `#let`
/// variable bindings to the `county-report.typ` template.
///
/// The layout engine has already placed every line; the bindings carry the
/// page geometry plus a nested array of `(kind, y, ...)` dictionaries, one
/// inner array per page. The template only paints what it is handed.
pub fn build_report_source(doc: &ReportDocument) -> String {
    let layout = &doc.layout;
    let mut bindings = format!(
        "#let page_width = {page_width}\n\
         #let page_height = {page_height}\n\
         #let left_margin = {left_margin}\n\
         #let col_case = {col_case}\n\
         #let col_matter = {col_matter}\n\
         #let col_hours = {col_hours}\n\
         #let col_total = {col_total}\n\
         #let col_bill = {col_bill}\n",
        page_width = layout.page_width,
        page_height = layout.page_height,
        left_margin = layout.left_margin,
        col_case = layout.col_case,
        col_matter = layout.col_matter,
        col_hours = layout.col_hours,
        col_total = layout.col_total,
        col_bill = layout.col_bill,
    );

    bindings.push_str("#let pages = (\n");
    for page in &doc.pages {
        bindings.push_str("  (\n");
        for line in &page.lines {
            // Trailing commas keep one-element arrays as arrays.
            match line {
                Line::Title { y, text } => {
                    let _ = writeln!(
                        bindings,
                        "    (kind: \"title\", y: {y}, text: \"{}\"),",
                        escape_typst(text)
                    );
                }
                Line::Summary { y, text } => {
                    let _ = writeln!(
                        bindings,
                        "    (kind: \"summary\", y: {y}, text: \"{}\"),",
                        escape_typst(text)
                    );
                }
                Line::FormatLabel { y, text } => {
                    let _ = writeln!(
                        bindings,
                        "    (kind: \"label\", y: {y}, text: \"{}\"),",
                        escape_typst(text)
                    );
                }
                Line::Header { y } => {
                    let _ = writeln!(bindings, "    (kind: \"header\", y: {y}),");
                }
                Line::Row {
                    y,
                    case_number,
                    matter,
                    hours,
                    total,
                    contact,
                } => {
                    let _ = writeln!(
                        bindings,
                        "    (kind: \"row\", y: {y}, case: \"{}\", matter: \"{}\", hours: \"{}\", total: \"{}\", contact: \"{}\"),",
                        escape_typst(case_number),
                        escape_typst(matter),
                        escape_typst(hours),
                        escape_typst(total),
                        escape_typst(contact),
                    );
                }
            }
        }
        bindings.push_str("  ),\n");
    }
    bindings.push_str(")\n\n");

    format!("{bindings}{}", report_template())
}

/// The county-report Typst template, bundled into the binary at build time.
pub fn report_template() -> &'static str {
    include_str!("../../../templates/county-report.typ")
}

/// Number of fonts available to the compiler. First call pays the parse
/// cost; later calls are free.
pub fn font_count() -> usize {
    FONTS.len()
}

// ---------------------------------------------------------------------------
// Static singletons, initialized once and reused across all requests
// ---------------------------------------------------------------------------

static FONTS: LazyLock<Vec<Font>> = LazyLock::new(|| {
    typst_assets::fonts()
        .flat_map(|data| Font::iter(Bytes::new(data)))
        .collect()
});

static FONT_BOOK: LazyLock<LazyHash<FontBook>> =
    LazyLock::new(|| LazyHash::new(FontBook::from_fonts(FONTS.iter())));

static LIBRARY: LazyLock<LazyHash<Library>> = LazyLock::new(|| LazyHash::new(Library::default()));

// ---------------------------------------------------------------------------
// World implementation for in-process Typst compilation
// ---------------------------------------------------------------------------

struct AccordiaWorld {
    source: Source,
}

impl AccordiaWorld {
    fn new(source_text: &str) -> Self {
        Self {
            source: Source::detached(source_text),
        }
    }
}

impl World for AccordiaWorld {
    fn library(&self) -> &LazyHash<Library> {
        &LIBRARY
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &FONT_BOOK
    }

    fn main(&self) -> FileId {
        self.source.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.source.id() {
            Ok(self.source.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        Err(FileError::NotFound(id.vpath().as_rooted_path().into()))
    }

    fn font(&self, index: usize) -> Option<Font> {
        FONTS.get(index).cloned()
    }

    fn today(&self, offset: Option<i64>) -> Option<Datetime> {
        let now = chrono::Utc::now();
        let naive = if let Some(hours) = offset {
            let tz = chrono::FixedOffset::east_opt((hours as i32) * 3600)?;
            now.with_timezone(&tz).naive_local()
        } else {
            now.naive_utc()
        };
        Datetime::from_ymd(
            naive.year(),
            (naive.month0() + 1) as u8,
            (naive.day0() + 1) as u8,
        )
    }
}

// ---------------------------------------------------------------------------
// Public compilation entry point
// ---------------------------------------------------------------------------

/// Compile a Typst source string into PDF bytes using the in-process library.
///
/// Compilation is offloaded to a blocking thread since it is CPU-bound.
pub async fn compile_typst(source: &str) -> Result<Vec<u8>, AppError> {
    let source = source.to_owned();

    tokio::task::spawn_blocking(move || compile_typst_sync(&source))
        .await
        .map_err(|e| AppError::internal(format!("Typst task panicked: {e}")))?
}

fn compile_typst_sync(source: &str) -> Result<Vec<u8>, AppError> {
    let world = AccordiaWorld::new(source);

    let warned = typst::compile::<PagedDocument>(&world);
    let document = warned
        .output
        .map_err(|diagnostics| format_diagnostics("Typst compilation failed", &diagnostics))?;

    typst_pdf::pdf(&document, &typst_pdf::PdfOptions::default())
        .map_err(|diagnostics| format_diagnostics("PDF export failed", &diagnostics))
}

fn format_diagnostics(prefix: &str, diagnostics: &EcoVec<SourceDiagnostic>) -> AppError {
    let msgs: Vec<String> = diagnostics.iter().map(|d| d.message.to_string()).collect();
    AppError::internal(format!("{prefix}: {}", msgs.join("; ")))
}
