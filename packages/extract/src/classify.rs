//! Line-item classification of raw table rows.
//!
//! The order table has a fixed column order:
//!
//! | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 | 10 | 11 |
//! |---|---|---|---|---|---|---|---|---|---|----|----|
//! | IDCODE | ARTICLE | DESCRIPTION | COLOUR CODE | COLOUR | SIZE | ORDER-NO | STYLE | QTY | UNIT | PRICE | AMOUNT |
//!
//! Header rows, totals, remarks, and anything else without a positive
//! quantity and a real style are not line items.

use unico_order_models::LineItem;

use crate::config::ExtractorConfig;

/// Rows with fewer cells cannot hold a style, quantity, and unit.
pub const MIN_ROW_CELLS: usize = 10;

/// Cell holding the style code.
pub const STYLE_CELL: usize = 7;

/// Cell holding the ordered quantity.
pub const QUANTITY_CELL: usize = 8;

/// Cell holding the unit of measure.
pub const UNIT_CELL: usize = 9;

/// Style values (lowercased) that mark summary rows.
const NON_DATA_STYLES: &[&str] = &["total", "grand total", "remark"];

/// Classifies one table row.
///
/// Returns `None` for anything that is not a complete line item; this
/// function never panics on malformed cells.
#[must_use]
pub fn classify_row(cells: &[Option<String>], config: &ExtractorConfig) -> Option<LineItem> {
    if cells.len() < MIN_ROW_CELLS {
        return None;
    }

    let quantity = parse_quantity(cell(cells, QUANTITY_CELL)?)?;

    let style = cell(cells, STYLE_CELL)?.trim();
    if style.is_empty() || NON_DATA_STYLES.contains(&style.to_lowercase().as_str()) {
        return None;
    }

    let unit = cell(cells, UNIT_CELL)
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(config.default_unit.as_str());

    Some(LineItem {
        style: style.to_owned(),
        quantity,
        unit: unit.to_owned(),
    })
}

/// Parses a quantity such as `1,250`. Zero and non-digit input are `None`.
#[must_use]
pub fn parse_quantity(raw: &str) -> Option<u64> {
    let cleaned = raw.replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() || !cleaned.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    cleaned.parse::<u64>().ok().filter(|&q| q > 0)
}

fn cell(cells: &[Option<String>], index: usize) -> Option<&str> {
    cells.get(index).and_then(Option::as_deref)
}
