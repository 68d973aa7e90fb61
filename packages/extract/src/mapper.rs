//! Header + line item to canonical row mapping.

use unico_order_models::schema::ColumnField;
use unico_order_models::{CanonicalRow, CellValue, HeaderInfo, LineItem};

use crate::config::ExtractorConfig;
use crate::dates::add_days;

/// Days between shipping and arrival at the warehouse.
pub const DELIVERY_LEAD_DAYS: u64 = 2;

/// Builds the canonical row for one line item.
///
/// Pure: identical inputs always produce identical rows. The column
/// layout is `config.schema`; positions with no source are empty text.
#[must_use]
pub fn map_row(
    header: &HeaderInfo,
    item: &LineItem,
    sequence: u64,
    config: &ExtractorConfig,
) -> CanonicalRow {
    let delivery_date = add_days(&header.ship_date, DELIVERY_LEAD_DAYS).unwrap_or_default();
    let bill_to = format!("{} {}", config.customer, header.location);
    let purchase_order = format!(
        "{} {} {}",
        header.buyer, header.season, header.purchase_order_number
    );

    let columns = *config.schema.columns();
    CanonicalRow::new(columns.map(|column| match column.field {
        ColumnField::Empty => CellValue::empty(),
        ColumnField::Sequence => CellValue::Integer(sequence),
        ColumnField::IssuedDate => header.issued_date.as_str().into(),
        ColumnField::ShipDate => header.ship_date.as_str().into(),
        ColumnField::DeliveryDate => delivery_date.as_str().into(),
        ColumnField::Orderer => config.default_orderer.as_str().into(),
        ColumnField::Customer => config.customer.as_str().into(),
        ColumnField::BillTo | ColumnField::Consignee => bill_to.as_str().into(),
        ColumnField::Province => header.location.to_string().into(),
        ColumnField::Style => item.style.as_str().into(),
        ColumnField::PurchaseOrder => purchase_order.as_str().into(),
        ColumnField::Unit => item.unit.as_str().into(),
        ColumnField::Quantity => CellValue::Integer(item.quantity),
    }))
}

#[cfg(test)]
mod tests {
    use unico_order_models::schema::SchemaGeneration;
    use unico_order_models::{COLUMN_COUNT, Location};

    use super::*;

    fn header() -> HeaderInfo {
        HeaderInfo {
            issued_date: "12/12/2025".to_owned(),
            ship_date: "13/12/2025".to_owned(),
            purchase_order_number: "HDM-UB-12-2025-0227".to_owned(),
            season: "F26BULK".to_owned(),
            buyer: "LL.BEAN".to_owned(),
            location: Location::BacGiang,
        }
    }

    fn item() -> LineItem {
        LineItem {
            style: "STYLE-9".to_owned(),
            quantity: 1200,
            unit: "YDS".to_owned(),
        }
    }

    fn text(row: &CanonicalRow, index: usize) -> &str {
        row.get(index).and_then(CellValue::as_text).unwrap()
    }

    #[test]
    fn maps_reference_layout() {
        let row = map_row(&header(), &item(), 3, &ExtractorConfig::default());
        let cells = row.cells();

        assert_eq!(cells.len(), COLUMN_COUNT);
        assert_eq!(cells[1], CellValue::Integer(3));
        assert_eq!(text(&row, 4), "12/12/2025");
        assert_eq!(text(&row, 5), "13/12/2025");
        assert_eq!(text(&row, 6), "15/12/2025");
        assert_eq!(text(&row, 8), "Nguyễn Quyên_IS3");
        assert_eq!(text(&row, 9), "UNICO");
        assert_eq!(text(&row, 10), "UNICO BẮC GIANG");
        assert_eq!(text(&row, 11), "UNICO BẮC GIANG");
        assert_eq!(text(&row, 13), "BẮC GIANG");
        assert_eq!(text(&row, 14), "STYLE-9");
        assert_eq!(text(&row, 15), "LL.BEAN F26BULK HDM-UB-12-2025-0227");
        assert_eq!(text(&row, 23), "YDS");
        assert_eq!(cells[26], CellValue::Integer(1200));

        for index in [0, 2, 3, 7, 12, 16, 17, 18, 19, 20, 21, 22, 24, 25] {
            assert!(cells[index].is_empty(), "position {index} should be empty");
        }
    }

    #[test]
    fn maps_legacy_layout() {
        let config = ExtractorConfig {
            schema: SchemaGeneration::V1,
            ..ExtractorConfig::default()
        };
        let row = map_row(&header(), &item(), 1, &config);

        assert_eq!(text(&row, 3), "12/12/2025");
        assert_eq!(text(&row, 5), "15/12/2025");
        assert_eq!(text(&row, 12), "BẮC GIANG");
        assert_eq!(text(&row, 13), "STYLE-9");
        assert_eq!(text(&row, 22), "YDS");
        assert_eq!(row.cells()[23], CellValue::Integer(1200));
        assert!(row.cells()[26].is_empty());
    }

    #[test]
    fn unparseable_ship_date_leaves_delivery_empty() {
        let header = HeaderInfo {
            ship_date: "31 Foo 2025".to_owned(),
            ..header()
        };
        let row = map_row(&header, &item(), 1, &ExtractorConfig::default());
        assert_eq!(text(&row, 5), "31 Foo 2025");
        assert_eq!(text(&row, 6), "");
    }

    #[test]
    fn purchase_order_keeps_double_spaces() {
        let header = HeaderInfo {
            season: String::new(),
            ..header()
        };
        let row = map_row(&header, &item(), 1, &ExtractorConfig::default());
        assert_eq!(text(&row, 15), "LL.BEAN  HDM-UB-12-2025-0227");
    }

    #[test]
    fn bill_to_follows_location() {
        let header = HeaderInfo {
            location: Location::YenBai,
            ..header()
        };
        let row = map_row(&header, &item(), 1, &ExtractorConfig::default());
        assert_eq!(text(&row, 10), "UNICO YÊN BÁI");
        assert_eq!(text(&row, 13), "YÊN BÁI");
    }

    #[test]
    fn mapping_is_deterministic() {
        let config = ExtractorConfig::default();
        let a = map_row(&header(), &item(), 7, &config);
        let b = map_row(&header(), &item(), 7, &config);
        assert_eq!(a, b);
    }
}
