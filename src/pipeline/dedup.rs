use std::collections::HashSet;
use tracing::debug;

use super::table::Table;
use crate::schema::{COUNTRY_CODE, PRICE_RANGE, RESTAURANTS};

/// Drop rows whose values equal an earlier row in every column.
///
/// Numeric columns compare by value, so `4.0` and `4` are the same cell.
/// Every other column compares as text. Keeps first occurrences, with their
/// original text, in their source order. Returns the number removed.
pub fn dedup(mut table: Table) -> (Table, usize) {
    let before = table.rows.len();
    let numeric: Vec<bool> = table.columns.iter().map(|c| is_numeric_column(c)).collect();
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);

    table.rows.retain(|row| {
        let key = row
            .values
            .iter()
            .zip(&numeric)
            .map(|(value, &by_value)| {
                if by_value {
                    canonical_number(value)
                } else {
                    value.clone()
                }
            })
            .collect();
        seen.insert(key)
    });

    let removed = before - table.rows.len();
    debug!(removed, "Removed duplicate rows");
    (table, removed)
}

fn is_numeric_column(name: &str) -> bool {
    name == COUNTRY_CODE
        || name == PRICE_RANGE
        || RESTAURANTS
            .column(name)
            .map_or(false, |c| c.col_type.is_numeric())
}

/// Shortest decimal form of a numeric cell; non-numbers are kept verbatim
fn canonical_number(value: &str) -> String {
    match value.trim().parse::<f64>() {
        Ok(v) if v == 0.0 => "0".to_string(),
        Ok(v) if v.is_finite() => v.to_string(),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::table::Row;

    fn row(line: u64, values: &[&str]) -> Row {
        Row {
            line,
            values: values.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_exact_duplicates_only() {
        let table = Table::new(
            vec!["id".into(), "name".into()],
            vec![
                row(2, &["1", "A"]),
                row(3, &["1", "A"]),
                row(4, &["1", "B"]),
                row(5, &["2", "A"]),
                row(6, &["1", "A"]),
            ],
        );

        let (out, removed) = dedup(table);
        assert_eq!(removed, 2);
        let lines: Vec<u64> = out.rows.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4, 5]);
    }

    #[test]
    fn test_numeric_cells_compare_by_value() {
        let table = Table::new(
            vec![
                "restaurant_name".into(),
                "aggregate_rating".into(),
                COUNTRY_CODE.into(),
            ],
            vec![
                row(2, &["Cafe", "4.0", "1"]),
                row(3, &["Cafe", "4", "1.0"]),
                row(4, &["Cafe", "4.00", "1"]),
                row(5, &["Cafe", "4.1", "1"]),
            ],
        );

        let (out, removed) = dedup(table);
        assert_eq!(removed, 2);
        assert_eq!(out.rows[0].values, vec!["Cafe", "4.0", "1"]);
        assert_eq!(out.rows[1].line, 5);
    }

    #[test]
    fn test_text_cells_compare_verbatim() {
        let table = Table::new(
            vec!["restaurant_name".into(), "votes".into()],
            vec![row(2, &["4.0", "10"]), row(3, &["4", "10"])],
        );

        let (out, removed) = dedup(table);
        assert_eq!(removed, 0);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_canonical_number() {
        assert_eq!(canonical_number("12.50"), "12.5");
        assert_eq!(canonical_number("-0.0"), "0");
        assert_eq!(canonical_number("300"), "300");
        assert_eq!(canonical_number("n/a-ish"), "n/a-ish");
    }
}
