#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Spreadsheet rendering for canonical purchase-order rows.
//!
//! [`write_workbook`] writes one worksheet: a title row followed by one row
//! per [`CanonicalRow`], styled according to a [`StyleSpec`]. Integer
//! cells are written as numbers so quantities carry no thousands
//! separator. [`read_workbook`] reads a rendered file back as plain
//! strings for verification.

pub mod style;

use std::path::Path;

use umya_spreadsheet::{
    Border, HorizontalAlignmentValues, Spreadsheet, Style, VerticalAlignmentValues, Worksheet,
};
use unico_order_models::{CanonicalRow, CellValue};

pub use style::StyleSpec;

/// Errors that can occur while rendering or reading a workbook.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Writing the workbook failed.
    #[error("failed to write workbook: {0}")]
    Write(String),

    /// Reading the workbook failed.
    #[error("failed to read workbook: {0}")]
    Read(String),

    /// The style configuration was invalid.
    #[error("invalid style: {0}")]
    Style(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Plain-text view of a rendered worksheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkbookContents {
    /// Name of the first worksheet.
    pub sheet_name: String,
    /// Values of the first row.
    pub titles: Vec<String>,
    /// Values of every following row.
    pub rows: Vec<Vec<String>>,
}

/// Builds an in-memory workbook.
///
/// # Errors
///
/// Returns [`RenderError::Write`] if the worksheet cannot be created.
pub fn render(
    titles: &[&str],
    rows: &[CanonicalRow],
    style: &StyleSpec,
) -> Result<Spreadsheet, RenderError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(style.sheet_title.as_str())
        .map_err(|e| RenderError::Write(e.to_owned()))?;

    for (col, title) in (1_u32..).zip(titles) {
        sheet.get_cell_mut((col, 1)).set_value(*title);
        apply_header_style(sheet.get_style_mut((col, 1)), col_index(col), style);
    }
    sheet.get_row_dimension_mut(&1).set_height(style.header_height);

    for (row_number, row) in (2_u32..).zip(rows) {
        for (col, value) in (1_u32..).zip(row.cells()) {
            write_value(sheet, col, row_number, value);
            apply_data_style(sheet.get_style_mut((col, row_number)), col_index(col), style);
        }
    }

    for (col, width) in (1_u32..).zip(&style.column_widths) {
        sheet.get_column_dimension_by_number_mut(&col).set_width(*width);
    }

    Ok(book)
}

/// Renders rows and saves them as an `.xlsx` file.
///
/// # Errors
///
/// Returns [`RenderError::Write`] if rendering or saving fails.
pub fn write_workbook(
    path: impl AsRef<Path>,
    titles: &[&str],
    rows: &[CanonicalRow],
    style: &StyleSpec,
) -> Result<(), RenderError> {
    let path = path.as_ref();
    let book = render(titles, rows, style)?;

    umya_spreadsheet::writer::xlsx::write(&book, path)
        .map_err(|e| RenderError::Write(e.to_string()))?;

    log::info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Reads the first worksheet of an `.xlsx` file as strings.
///
/// # Errors
///
/// Returns [`RenderError::Read`] if the file cannot be parsed or has no
/// worksheet.
pub fn read_workbook(path: impl AsRef<Path>) -> Result<WorkbookContents, RenderError> {
    let book = umya_spreadsheet::reader::xlsx::read(path.as_ref())
        .map_err(|e| RenderError::Read(e.to_string()))?;
    let sheet = book
        .get_sheet(&0)
        .ok_or_else(|| RenderError::Read("workbook has no worksheets".to_owned()))?;

    let max_col = sheet.get_highest_column();
    let max_row = sheet.get_highest_row();
    let row_values = |row: u32| -> Vec<String> {
        (1..=max_col)
            .map(|col| sheet.get_value((col, row)))
            .collect()
    };

    Ok(WorkbookContents {
        sheet_name: sheet.get_name().to_owned(),
        titles: if max_row >= 1 { row_values(1) } else { Vec::new() },
        rows: (2..=max_row).map(row_values).collect(),
    })
}

#[allow(clippy::cast_precision_loss)]
fn write_value(sheet: &mut Worksheet, col: u32, row: u32, value: &CellValue) {
    let cell = sheet.get_cell_mut((col, row));
    match value {
        CellValue::Text(text) => {
            cell.set_value(text.as_str());
        }
        CellValue::Integer(n) => {
            cell.set_value_number(*n as f64);
        }
    }
}

fn apply_header_style(target: &mut Style, column: usize, style: &StyleSpec) {
    apply_font(target, column, style);
    target.get_font_mut().set_bold(style.header_bold);
    target.set_background_color(style.header_fill.as_str());

    let alignment = target.get_alignment_mut();
    alignment.set_horizontal(HorizontalAlignmentValues::Center);
    alignment.set_vertical(VerticalAlignmentValues::Center);
    alignment.set_wrap_text(true);

    apply_borders(target, style);
}

fn apply_data_style(target: &mut Style, column: usize, style: &StyleSpec) {
    apply_font(target, column, style);

    let alignment = target.get_alignment_mut();
    alignment.set_vertical(VerticalAlignmentValues::Center);
    if style.is_centered(column) {
        alignment.set_horizontal(HorizontalAlignmentValues::Center);
    }

    apply_borders(target, style);
}

fn apply_font(target: &mut Style, column: usize, style: &StyleSpec) {
    let font = target.get_font_mut();
    font.set_name(style.font_name.as_str());
    font.set_size(style.font_size);
    if style.is_emphasized(column) {
        font.get_color_mut().set_argb(style.emphasis_color.as_str());
    }
}

fn apply_borders(target: &mut Style, style: &StyleSpec) {
    if !style.borders {
        return;
    }
    let borders = target.get_borders_mut();
    borders.get_left_mut().set_border_style(Border::BORDER_THIN);
    borders.get_right_mut().set_border_style(Border::BORDER_THIN);
    borders.get_top_mut().set_border_style(Border::BORDER_THIN);
    borders.get_bottom_mut().set_border_style(Border::BORDER_THIN);
}

/// Converts a 1-based spreadsheet column to a 0-based schema position.
fn col_index(col: u32) -> usize {
    usize::try_from(col).map_or(usize::MAX, |c| c.saturating_sub(1))
}
