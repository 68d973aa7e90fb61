#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Purchase-order data model shared across the extractor workspace.
//!
//! A document yields exactly one [`HeaderInfo`] and zero or more
//! [`LineItem`]s. Each line item is merged with the header into a
//! [`CanonicalRow`] whose column layout is fixed by a
//! [`schema::SchemaGeneration`].

pub mod schema;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of positions in every canonical row.
pub const COLUMN_COUNT: usize = 27;

/// Named shipping region a purchase order is delivered to.
///
/// `Display` yields the region name as it appears in the spreadsheet;
/// parsing accepts either that name or the `snake_case` identifier.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(ascii_case_insensitive)]
pub enum Location {
    /// Bắc Giang warehouse (also receives goods addressed to Bắc Ninh).
    #[strum(to_string = "BẮC GIANG", serialize = "bac_giang")]
    BacGiang,
    /// Yên Bái warehouse (also receives goods addressed to Lào Cai).
    #[strum(to_string = "YÊN BÁI", serialize = "yen_bai")]
    YenBai,
}

impl Location {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::BacGiang, Self::YenBai]
    }
}

/// Document-level metadata parsed once from the first page.
///
/// Dates are kept as `dd/mm/yyyy` strings because a label that fails to
/// parse is carried through verbatim rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderInfo {
    /// Date the order was issued.
    pub issued_date: String,
    /// Date the goods leave the supplier.
    pub ship_date: String,
    /// The `MPO-NO` token.
    pub purchase_order_number: String,
    /// Season code, e.g. `F26BULK`.
    pub season: String,
    /// Buyer name, e.g. `LL.BEAN`.
    pub buyer: String,
    /// Destination region inferred from the ship-to text.
    pub location: Location,
}

/// One sellable order line taken from a table row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Style code, trimmed and never empty.
    pub style: String,
    /// Ordered quantity, always greater than zero.
    pub quantity: u64,
    /// Unit of measure, e.g. `YDS`.
    pub unit: String,
}

/// A single typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Free text. Unsourced positions hold an empty string.
    Text(String),
    /// Non-negative integer (sequence numbers and quantities).
    Integer(u64),
}

impl CellValue {
    /// An empty text cell.
    #[must_use]
    pub const fn empty() -> Self {
        Self::Text(String::new())
    }

    /// Returns the text content, or `None` for integer cells.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Integer(_) => None,
        }
    }

    /// Returns the integer content, or `None` for text cells.
    #[must_use]
    pub const fn as_integer(&self) -> Option<u64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    /// Whether this is an empty text cell.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<u64> for CellValue {
    fn from(value: u64) -> Self {
        Self::Integer(value)
    }
}

/// The fixed-width output record for one line item.
///
/// The meaning of each position is defined by the
/// [`schema::SchemaGeneration`] the row was mapped with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalRow([CellValue; COLUMN_COUNT]);

impl CanonicalRow {
    /// Wraps a complete set of cells.
    #[must_use]
    pub const fn new(cells: [CellValue; COLUMN_COUNT]) -> Self {
        Self(cells)
    }

    /// Returns the cells in column order.
    #[must_use]
    pub const fn cells(&self) -> &[CellValue; COLUMN_COUNT] {
        &self.0
    }

    /// Returns the cell at `index`, if in range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.0.get(index)
    }

    /// Consumes the row and returns its cells.
    #[must_use]
    pub fn into_cells(self) -> [CellValue; COLUMN_COUNT] {
        self.0
    }
}
