use std::collections::HashSet;
use tracing::{debug, warn};

use super::table::{RawTable, Row, Table};

/// Canonical header name: capitalize each word, drop whitespace, then snake_case.
///
/// `"average Cost for two"` becomes `"AverageCostForTwo"` and then
/// `"average_cost_for_two"`.
pub fn normalize_header(header: &str) -> String {
    let titled = titleize(header);
    let joined: String = titled.chars().filter(|c| !c.is_whitespace()).collect();
    underscore(&joined)
}

/// Rename headers and drop every row that has a missing value.
/// Returns the dense table and the number of rows dropped.
pub fn normalize(raw: RawTable) -> (Table, usize) {
    let columns: Vec<String> = raw.headers.iter().map(|h| normalize_header(h)).collect();

    let mut seen = HashSet::new();
    for col in &columns {
        if !seen.insert(col.as_str()) {
            warn!(column = %col, "Duplicate column after header normalization");
        }
    }

    let total = raw.rows.len();
    let rows: Vec<Row> = raw
        .rows
        .into_iter()
        .filter_map(|row| {
            let values: Option<Vec<String>> = row.values.into_iter().collect();
            values.map(|values| Row {
                line: row.line,
                values,
            })
        })
        .collect();

    let dropped = total - rows.len();
    debug!(total, dropped, "Dropped rows with missing values");

    (Table::new(columns, rows), dropped)
}

/// CamelCase and spaced words to lowercase underscore form.
fn underscore(word: &str) -> String {
    let chars: Vec<char> = word.chars().collect();
    let mut out = String::with_capacity(word.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_ascii_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_lower);
            if boundary {
                out.push('_');
            }
        }
        if c == '-' {
            out.push('_');
        } else {
            out.extend(c.to_lowercase());
        }
    }

    out
}

/// Capitalized-word form: every word starts upper case, the rest is lower case.
fn titleize(word: &str) -> String {
    let humanized = underscore(word).replace('_', " ");
    let mut out = String::with_capacity(humanized.len());
    let mut prev_cased = false;

    for c in humanized.chars() {
        if c.is_alphabetic() {
            if prev_cased {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_cased = true;
        } else {
            out.push(c);
            prev_cased = false;
        }
    }

    out
}
