#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Per-page text and table extraction for purchase-order PDFs.
//!
//! This crate is the adapter between raw PDF bytes and the extraction
//! core. It drives the pure-Rust [`pdf_extract`] content interpreter to
//! collect every glyph with its position ([`layout`]), rebuilds the page
//! lines from those positions, and recovers a cell grid aligned under the
//! table's header row (see [`text_table`]).
//!
//! The primary entry point is [`Document`]. A `Document` owns everything
//! it extracted, so the underlying parser state is released as soon as
//! [`Document::from_bytes`] returns.

pub mod layout;
pub mod text_table;

use std::panic::AssertUnwindSafe;
use std::path::Path;

use serde::Serialize;

use layout::{Glyph, GlyphCollector, Line};
pub use text_table::{Columns, Row, Table};

/// Errors specific to opening a PDF.
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    /// The bytes do not start with a PDF header.
    #[error("not a PDF document")]
    NotPdf,

    /// PDF text extraction failed.
    #[error("PDF extraction error: {0}")]
    Unreadable(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How far into the file the `%PDF-` marker may appear.
const HEADER_SEARCH_LIMIT: usize = 1024;

/// Default minimum number of cells a line needs to count as a table header.
pub const DEFAULT_MIN_TABLE_CELLS: usize = 3;

/// One page of extracted content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Plain text of the page.
    pub text: String,
    /// The page's table, if one was detected.
    pub table: Option<Table>,
}

impl Page {
    /// Builds a page from fixed-width text, where two or more spaces (or a
    /// tab) separate table cells and a blank cell is a wider gap.
    #[must_use]
    pub fn from_text(text: &str, min_table_cells: usize) -> Self {
        let lines: Vec<Line> = text
            .lines()
            .map(Line::from_text)
            .filter(|line| !line.is_empty())
            .collect();
        Self::from_lines(&lines, min_table_cells, None).0
    }

    /// Builds a page from positioned lines, returning the table columns in
    /// effect for the next page.
    fn from_lines(
        lines: &[Line],
        min_table_cells: usize,
        carried: Option<&Columns>,
    ) -> (Self, Option<Columns>) {
        let text = lines.iter().map(Line::text).collect::<Vec<_>>().join("\n");
        let (table, columns) = text_table::detect(lines, min_table_cells, carried).unzip();
        (Self { text, table }, columns)
    }
}

/// An opened purchase-order document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pages: Vec<Page>,
}

impl Document {
    /// Creates a document from already-extracted pages.
    #[must_use]
    pub const fn new(pages: Vec<Page>) -> Self {
        Self { pages }
    }

    /// Parses a PDF held in memory.
    ///
    /// # Errors
    ///
    /// * [`PdfError::NotPdf`] if no `%PDF-` header is present
    /// * [`PdfError::Unreadable`] if the content cannot be interpreted or the
    ///   interpreter panics
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfError> {
        Self::from_bytes_with(bytes, DEFAULT_MIN_TABLE_CELLS)
    }

    /// Like [`Self::from_bytes`] with an explicit table header threshold.
    ///
    /// # Errors
    ///
    /// See [`Self::from_bytes`].
    pub fn from_bytes_with(bytes: &[u8], min_table_cells: usize) -> Result<Self, PdfError> {
        if !has_pdf_header(bytes) {
            return Err(PdfError::NotPdf);
        }

        log::debug!("Extracting text from {} bytes of PDF", bytes.len());

        // pdf-extract panics on some malformed content streams
        let glyphs = std::panic::catch_unwind(AssertUnwindSafe(|| collect_glyphs(bytes)))
            .map_err(|_| PdfError::Unreadable("PDF parser aborted".to_owned()))??;

        let mut carried: Option<Columns> = None;
        let mut pages = Vec::with_capacity(glyphs.len());
        for page_glyphs in glyphs {
            let lines = layout::lines(page_glyphs);
            let (page, columns) = Page::from_lines(&lines, min_table_cells, carried.as_ref());
            if columns.is_some() {
                carried = columns;
            }
            pages.push(page);
        }

        log::debug!(
            "Extracted {} pages ({} with tables)",
            pages.len(),
            pages.iter().filter(|p| p.table.is_some()).count()
        );

        Ok(Self { pages })
    }

    /// Reads and parses a PDF file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfError::Io`] if the file cannot be read, otherwise see
    /// [`Self::from_bytes`].
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PdfError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Returns the pages in document order.
    #[must_use]
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Text of the first page, or an empty string for an empty document.
    #[must_use]
    pub fn first_page_text(&self) -> &str {
        self.pages.first().map_or("", |p| p.text.as_str())
    }
}

fn collect_glyphs(bytes: &[u8]) -> Result<Vec<Vec<Glyph>>, PdfError> {
    let mut doc = pdf_extract::Document::load_mem(bytes).map_err(unreadable)?;
    if doc.is_encrypted() {
        doc.decrypt("").map_err(unreadable)?;
    }

    let mut collector = GlyphCollector::default();
    pdf_extract::output_doc(&doc, &mut collector).map_err(unreadable)?;
    Ok(collector.into_pages())
}

#[allow(clippy::needless_pass_by_value)]
fn unreadable(e: impl std::fmt::Display) -> PdfError {
    PdfError::Unreadable(format!("failed to extract text from PDF: {e}"))
}

fn has_pdf_header(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(HEADER_SEARCH_LIMIT)];
    head.windows(5).any(|w| w == b"%PDF-")
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_PAGE_ORDER: &[u8] = include_bytes!("../fixtures/three_page_order.pdf");

    fn cells(row: &Row) -> Vec<&str> {
        row.iter().map(|c| c.as_deref().unwrap_or("-")).collect()
    }

    #[test]
    fn rejects_bytes_without_pdf_header() {
        let err = Document::from_bytes(b"PK\x03\x04 not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::NotPdf));
    }

    #[test]
    fn finds_header_after_leading_junk() {
        assert!(has_pdf_header(b"\xef\xbb\xbf%PDF-1.4\n"));
        assert!(!has_pdf_header(b"%PD"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Document::open("/nonexistent/order.pdf").unwrap_err();
        assert!(matches!(err, PdfError::Io(_)));
    }

    #[test]
    fn first_page_text_of_empty_document_is_empty() {
        let doc = Document::default();
        assert_eq!(doc.page_count(), 0);
        assert_eq!(doc.first_page_text(), "");
    }

    #[test]
    fn page_from_text_detects_table() {
        let page = Page::from_text(
            "PURCHASE ORDER\nIDCODE   ARTICLE   STYLE   QTY\nA1       CLOTH     S-1     1,200\n",
            DEFAULT_MIN_TABLE_CELLS,
        );
        assert_eq!(page.text, "PURCHASE ORDER\nIDCODE ARTICLE STYLE QTY\nA1 CLOTH S-1 1,200");
        let table = page.table.unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][3].as_deref(), Some("1,200"));
    }

    #[test]
    fn garbage_after_header_is_unreadable() {
        let err = Document::from_bytes(b"%PDF-1.4\nthis is not a pdf body").unwrap_err();
        assert!(matches!(err, PdfError::Unreadable(_)));
    }

    #[test]
    fn reads_positioned_table_from_pdf() {
        let doc = Document::from_bytes(THREE_PAGE_ORDER).unwrap();

        assert_eq!(doc.page_count(), 3);
        assert!(doc.first_page_text().contains("ISSUED DATE: 12 Dec 2025"));
        assert!(doc.first_page_text().contains("MPO-NO: HDM-UB-12-2025-0227"));

        let table = doc.pages()[0].table.as_ref().unwrap();
        assert_eq!(table.column_count(), 12);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0][3].as_deref(), Some("COLOUR CODE"));
        assert_eq!(
            cells(&table.rows[1]),
            vec![
                "7001", "TWILL", "COTTON TWILL", "410", "NAVY", "58", "PO1", "STYLE-9", "1,200",
                "YDS", "1.25", "1,500.00"
            ]
        );
    }

    #[test]
    fn blank_pdf_cells_keep_their_column() {
        let doc = Document::from_bytes(THREE_PAGE_ORDER).unwrap();
        let rows = &doc.pages()[0].table.as_ref().unwrap().rows;

        assert_eq!(rows[2][7].as_deref(), Some("STYLE-10"));
        assert_eq!(rows[2][9], None);
        assert_eq!(rows[2][10].as_deref(), Some("1.10"));

        assert_eq!(rows[3][1], None);
        assert_eq!(rows[3][2].as_deref(), Some("LINING"));
        assert_eq!(rows[3][9].as_deref(), Some("MTR"));
    }

    #[test]
    fn later_pages_reuse_or_repeat_the_header() {
        let doc = Document::from_bytes(THREE_PAGE_ORDER).unwrap();

        let second = doc.pages()[1].table.as_ref().unwrap();
        assert_eq!(second.rows[0][0].as_deref(), Some("IDCODE"));
        let total = second.rows.last().unwrap();
        assert_eq!(total[7].as_deref(), Some("Total"));
        assert_eq!(total[8].as_deref(), Some("4,850"));

        let third = doc.pages()[2].table.as_ref().unwrap();
        assert_eq!(third.column_count(), 12);
        let last = third.rows.last().unwrap();
        assert_eq!(last[7].as_deref(), Some("STYLE-14"));
        assert_eq!(last[8].as_deref(), Some("75"));
    }
}
