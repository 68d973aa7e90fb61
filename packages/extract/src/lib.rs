#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Purchase-order extraction core.
//!
//! Turns an opened [`Document`] into canonical spreadsheet rows:
//!
//! 1. [`header::parse_header`] reads the order metadata from page one
//! 2. [`classify::classify_row`] picks line items out of every page's table
//! 3. [`mapper::map_row`] merges header and line into a [`CanonicalRow`]
//!
//! [`extract_document`] drives the pipeline. Only failing to open the PDF
//! is an error; every per-field and per-row problem has a local fallback.

pub mod classify;
pub mod config;
pub mod dates;
pub mod header;
pub mod mapper;

use std::path::Path;

use serde::Serialize;
use unico_order_models::schema::SchemaGeneration;
use unico_order_models::{CanonicalRow, HeaderInfo};
use unico_pdf::{Document, PdfError};

pub use config::ExtractorConfig;

/// Errors that abort an extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The input could not be opened as a PDF.
    #[error("document unreadable: {0}")]
    DocumentUnreadable(String),

    /// A configuration file or override was invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PdfError> for ExtractError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::Io(e) => Self::Io(e),
            other => Self::DocumentUnreadable(other.to_string()),
        }
    }
}

/// The result of extracting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extraction {
    /// Header shared by every row.
    pub header: HeaderInfo,
    /// Layout the rows were mapped with.
    pub schema: SchemaGeneration,
    /// Rows in page-then-table order, numbered from 1.
    pub rows: Vec<CanonicalRow>,
}

impl Extraction {
    /// Number of extracted line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no line items were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column titles matching [`Self::rows`].
    #[must_use]
    pub fn titles(&self) -> Vec<&'static str> {
        self.schema.titles()
    }
}

/// Extracts every line item from an opened document.
///
/// A document with no pages still yields a header built from defaults.
#[must_use]
pub fn extract_document(document: &Document, config: &ExtractorConfig) -> Extraction {
    let header = header::parse_header(document.first_page_text(), config);

    let mut rows = Vec::new();
    let mut sequence: u64 = 1;

    for (index, page) in document.pages().iter().enumerate() {
        let Some(table) = &page.table else {
            log::debug!("Page {}: no table", index + 1);
            continue;
        };

        let before = rows.len();
        for cells in &table.rows {
            if let Some(item) = classify::classify_row(cells, config) {
                rows.push(mapper::map_row(&header, &item, sequence, config));
                sequence += 1;
            } else {
                log::trace!("Page {}: skipped row {cells:?}", index + 1);
            }
        }

        log::debug!(
            "Page {}: {} of {} table rows are line items",
            index + 1,
            rows.len() - before,
            table.rows.len()
        );
    }

    log::info!(
        "Extracted {} line items from {} pages (PO {})",
        rows.len(),
        document.page_count(),
        header.purchase_order_number
    );

    Extraction {
        header,
        schema: config.schema,
        rows,
    }
}

/// Opens PDF bytes and extracts them.
///
/// # Errors
///
/// Returns [`ExtractError::DocumentUnreadable`] if the bytes are not a
/// readable PDF.
pub fn extract_pdf_bytes(bytes: &[u8], config: &ExtractorConfig) -> Result<Extraction, ExtractError> {
    let document = Document::from_bytes_with(bytes, config.min_table_cells)?;
    Ok(extract_document(&document, config))
}

/// Opens a PDF file and extracts it.
///
/// # Errors
///
/// Returns [`ExtractError::Io`] if the file cannot be read, or
/// [`ExtractError::DocumentUnreadable`] if it is not a readable PDF.
pub fn extract_pdf(path: impl AsRef<Path>, config: &ExtractorConfig) -> Result<Extraction, ExtractError> {
    let bytes = std::fs::read(path.as_ref())?;
    extract_pdf_bytes(&bytes, config)
}
