//! The canonical restaurant table every consumer depends on

use super::types::*;

/// The 21 output columns, in output order.
pub static RESTAURANTS: TableSchema = TableSchema {
    name: "restaurants",
    columns: &[
        Column::required("restaurant_id", ColumnType::Integer),
        Column::required("restaurant_name", ColumnType::Text),
        Column::required("country", ColumnType::Text),
        Column::required("city", ColumnType::Text),
        Column::required("address", ColumnType::Text),
        Column::required("locality", ColumnType::Text),
        Column::required("locality_verbose", ColumnType::Text),
        Column::required("longitude", ColumnType::Real),
        Column::required("latitude", ColumnType::Real),
        Column::required("cuisines", ColumnType::Text),
        Column::required("price_type", ColumnType::Text),
        Column::required("average_cost_for_two", ColumnType::Real),
        Column::required("currency", ColumnType::Text),
        Column::required("has_table_booking", ColumnType::Flag),
        Column::required("has_online_delivery", ColumnType::Flag),
        Column::required("is_delivering_now", ColumnType::Flag),
        Column::required("aggregate_rating", ColumnType::Real),
        Column::required("rating_color", ColumnType::Text),
        Column::required("color_name", ColumnType::Text),
        Column::required("rating_text", ColumnType::Text),
        Column::required("votes", ColumnType::Integer),
    ],
    indexes: &[
        Index::on(&["country"]),
        Index::on(&["city"]),
        Index::on(&["cuisines"]),
    ],
};

/// Source columns consumed by the code resolver.
pub const COUNTRY_CODE: &str = "country_code";
pub const RATING_COLOR: &str = "rating_color";
pub const PRICE_RANGE: &str = "price_range";
pub const CUISINES: &str = "cuisines";

/// Columns derived by the code resolver.
pub const COUNTRY: &str = "country";
pub const COLOR_NAME: &str = "color_name";
pub const PRICE_TYPE: &str = "price_type";

/// Canonical column names in output order
pub fn canonical_columns() -> Vec<&'static str> {
    RESTAURANTS.column_names()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order() {
        let cols = canonical_columns();
        assert_eq!(cols.len(), 21);
        assert_eq!(cols.first(), Some(&"restaurant_id"));
        assert_eq!(cols[10], "price_type");
        assert_eq!(cols.last(), Some(&"votes"));
    }

    #[test]
    fn test_derived_columns_are_canonical_and_codes_mostly_are_not() {
        assert!(RESTAURANTS.column(COUNTRY).is_some());
        assert!(RESTAURANTS.column(COLOR_NAME).is_some());
        assert!(RESTAURANTS.column(PRICE_TYPE).is_some());
        assert!(RESTAURANTS.column(COUNTRY_CODE).is_none());
        assert!(RESTAURANTS.column(PRICE_RANGE).is_none());
        // the raw hex code survives projection next to its label
        assert!(RESTAURANTS.column(RATING_COLOR).is_some());
    }
}
