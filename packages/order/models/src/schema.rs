//! Versioned canonical column schemas.
//!
//! Each [`SchemaGeneration`] is a single table pairing a column title with
//! the [`ColumnField`] that fills it, so titles and field order cannot
//! drift apart. The generation in use is always chosen explicitly; it is
//! never inferred from a document.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

use crate::COLUMN_COUNT;

/// What a canonical column is populated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnField {
    /// Always an empty string.
    Empty,
    /// 1-based position of the line within the document.
    Sequence,
    /// Header issued date.
    IssuedDate,
    /// Header ship date.
    ShipDate,
    /// Ship date plus two days, or empty if the ship date is unparseable.
    DeliveryDate,
    /// Configured orderer name.
    Orderer,
    /// Configured customer name.
    Customer,
    /// `"<customer> <location>"`.
    BillTo,
    /// Same value as [`Self::BillTo`].
    Consignee,
    /// Header location.
    Province,
    /// Line style.
    Style,
    /// `"<buyer> <season> <po-number>"`.
    PurchaseOrder,
    /// Line unit.
    Unit,
    /// Line quantity.
    Quantity,
}

/// A titled column in a schema generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Header text written to the spreadsheet.
    pub title: &'static str,
    /// Source of the column's values.
    pub field: ColumnField,
}

const fn col(title: &'static str, field: ColumnField) -> Column {
    Column { title, field }
}

/// A specific assignment of the 27 canonical positions.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SchemaGeneration {
    /// Legacy layout: quantity in position 23, three trailing spare
    /// columns.
    V1,
    /// Reference layout with an order-status column: unit in position 23,
    /// quantity in the last position.
    #[default]
    V2,
}

impl SchemaGeneration {
    /// Returns the column table for this generation.
    #[must_use]
    pub const fn columns(self) -> &'static [Column; COLUMN_COUNT] {
        match self {
            Self::V1 => &V1_COLUMNS,
            Self::V2 => &V2_COLUMNS,
        }
    }

    /// Returns the column titles in order.
    #[must_use]
    pub fn titles(self) -> Vec<&'static str> {
        self.columns().iter().map(|c| c.title).collect()
    }

    /// Returns the first position populated from `field`.
    #[must_use]
    pub fn position(self, field: ColumnField) -> Option<usize> {
        self.columns().iter().position(|c| c.field == field)
    }
}

use ColumnField as F;

static V1_COLUMNS: [Column; COLUMN_COUNT] = [
    col("GHI CHÚ", F::Empty),
    col("STT", F::Sequence),
    col("HĐ", F::Empty),
    col("NGÀY NHẬN ĐƠN", F::IssuedDate),
    col("NGÀY XUẤT HÀNG", F::ShipDate),
    col("NGÀY HÀNG ĐẾN", F::DeliveryDate),
    col("PKL", F::Empty),
    col("NGƯỜI ĐẶT HÀNG", F::Orderer),
    col("KHÁCH HÀNG", F::Customer),
    col("BILL TO", F::BillTo),
    col("CONSIGNEE", F::Consignee),
    col("PL & TK", F::Empty),
    col("TỈNH", F::Province),
    col("STYLE", F::Style),
    col("PO", F::PurchaseOrder),
    col("SHEET", F::Empty),
    col("pkl", F::Empty),
    col("Mô tả", F::Empty),
    col("MÃ GỐC", F::Empty),
    col("MÃ HÀNG", F::Empty),
    col("Color", F::Empty),
    col("width", F::Empty),
    col("ĐVT", F::Unit),
    col("SỐ LƯỢNG", F::Quantity),
    col("Cột 25", F::Empty),
    col("Cột 26", F::Empty),
    col("Cột 27", F::Empty),
];

static V2_COLUMNS: [Column; COLUMN_COUNT] = [
    col("GHI CHÚ", F::Empty),
    col("STT", F::Sequence),
    col("HĐ", F::Empty),
    col("TÌNH TRẠNG ĐƠN", F::Empty),
    col("NGÀY NHẬN ĐƠN", F::IssuedDate),
    col("NGÀY XUẤT HÀNG", F::ShipDate),
    col("NGÀY HÀNG ĐẾN", F::DeliveryDate),
    col("PKL", F::Empty),
    col("NGƯỜI ĐẶT HÀNG", F::Orderer),
    col("KHÁCH HÀNG", F::Customer),
    col("BILL TO", F::BillTo),
    col("CONSIGNEE", F::Consignee),
    col("PL & TK", F::Empty),
    col("TỈNH", F::Province),
    col("STYLE", F::Style),
    col("PO", F::PurchaseOrder),
    col("SHEET", F::Empty),
    col("pkl", F::Empty),
    col("Mô tả", F::Empty),
    col("MÃ GỐC", F::Empty),
    col("MÃ HÀNG", F::Empty),
    col("Color", F::Empty),
    col("width", F::Empty),
    col("ĐVT", F::Unit),
    col("Cột 25", F::Empty),
    col("Cột 26", F::Empty),
    col("SỐ LƯỢNG", F::Quantity),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_generation_is_v2() {
        assert_eq!(SchemaGeneration::default(), SchemaGeneration::V2);
        assert_eq!("V1".parse::<SchemaGeneration>().unwrap(), SchemaGeneration::V1);
        assert_eq!(SchemaGeneration::V2.to_string(), "v2");
    }

    #[test]
    fn v2_positions_match_reference_layout() {
        let s = SchemaGeneration::V2;
        assert_eq!(s.position(F::Sequence), Some(1));
        assert_eq!(s.position(F::IssuedDate), Some(4));
        assert_eq!(s.position(F::ShipDate), Some(5));
        assert_eq!(s.position(F::DeliveryDate), Some(6));
        assert_eq!(s.position(F::Orderer), Some(8));
        assert_eq!(s.position(F::Customer), Some(9));
        assert_eq!(s.position(F::BillTo), Some(10));
        assert_eq!(s.position(F::Consignee), Some(11));
        assert_eq!(s.position(F::Province), Some(13));
        assert_eq!(s.position(F::Style), Some(14));
        assert_eq!(s.position(F::PurchaseOrder), Some(15));
        assert_eq!(s.position(F::Unit), Some(23));
        assert_eq!(s.position(F::Quantity), Some(26));
    }

    #[test]
    fn v1_positions_match_legacy_layout() {
        let s = SchemaGeneration::V1;
        assert_eq!(s.position(F::IssuedDate), Some(3));
        assert_eq!(s.position(F::Province), Some(12));
        assert_eq!(s.position(F::Style), Some(13));
        assert_eq!(s.position(F::Unit), Some(22));
        assert_eq!(s.position(F::Quantity), Some(23));
    }

    #[test]
    fn titles_are_unique_within_each_generation() {
        for generation in [SchemaGeneration::V1, SchemaGeneration::V2] {
            let mut titles = generation.titles();
            assert_eq!(titles.len(), COLUMN_COUNT);
            titles.sort_unstable();
            titles.dedup();
            assert_eq!(titles.len(), COLUMN_COUNT, "{generation}: duplicate title");
        }
    }

    #[test]
    fn sourced_fields_appear_once() {
        for generation in [SchemaGeneration::V1, SchemaGeneration::V2] {
            for field in [F::Sequence, F::Style, F::Quantity, F::Unit, F::PurchaseOrder] {
                let count = generation
                    .columns()
                    .iter()
                    .filter(|c| c.field == field)
                    .count();
                assert_eq!(count, 1, "{generation}: {field:?}");
            }
        }
    }
}
