//! Spreadsheet styling configuration.
//!
//! The reference layout is a green, bold header row in Times New Roman
//! with thin borders everywhere and two red columns (orderer and
//! province). None of it depends on content; all of it can be overridden
//! from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use unico_order_models::COLUMN_COUNT;

use crate::RenderError;

/// Widths of the reference-layout columns, in character units.
const DEFAULT_COLUMN_WIDTHS: [f64; COLUMN_COUNT] = [
    12.0, 6.0, 8.0, 14.0, 14.0, 14.0, 14.0, 8.0, 20.0, 12.0, 20.0, 20.0, 10.0, 12.0, 18.0, 38.0,
    10.0, 8.0, 16.0, 12.0, 12.0, 10.0, 8.0, 8.0, 8.0, 8.0, 12.0,
];

/// Fonts, fills, borders, and widths applied by the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleSpec {
    /// Worksheet name.
    pub sheet_title: String,
    /// Font family for every cell.
    pub font_name: String,
    /// Font size in points for every cell.
    pub font_size: f64,
    /// Whether header cells are bold.
    pub header_bold: bool,
    /// Header background as ARGB hex.
    pub header_fill: String,
    /// Header row height in points.
    pub header_height: f64,
    /// Font color (ARGB hex) of emphasized columns.
    pub emphasis_color: String,
    /// 0-based columns drawn in [`Self::emphasis_color`], header included.
    pub emphasis_columns: Vec<usize>,
    /// 0-based data columns that are centered.
    pub centered_columns: Vec<usize>,
    /// Per-column widths; columns beyond the list keep the default width.
    pub column_widths: Vec<f64>,
    /// Whether to draw thin borders around every written cell.
    pub borders: bool,
}

impl Default for StyleSpec {
    fn default() -> Self {
        Self {
            sheet_title: "UNICO Orders".to_owned(),
            font_name: "Times New Roman".to_owned(),
            font_size: 10.0,
            header_bold: true,
            header_fill: "FFC1F0C8".to_owned(),
            header_height: 30.0,
            emphasis_color: "FFFF0000".to_owned(),
            emphasis_columns: vec![8, 13],
            centered_columns: vec![1],
            column_widths: DEFAULT_COLUMN_WIDTHS.to_vec(),
            borders: true,
        }
    }
}

impl StyleSpec {
    /// Parses a TOML document. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Style`] if the TOML does not parse.
    pub fn from_toml_str(toml: &str) -> Result<Self, RenderError> {
        toml::from_str(toml).map_err(|e| RenderError::Style(e.to_string()))
    }

    /// Reads and parses a TOML style file.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Io`] if the file cannot be read, or
    /// [`RenderError::Style`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub(crate) fn is_emphasized(&self, column: usize) -> bool {
        self.emphasis_columns.contains(&column)
    }

    #[must_use]
    pub(crate) fn is_centered(&self, column: usize) -> bool {
        self.centered_columns.contains(&column)
    }
}
