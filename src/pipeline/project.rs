use tracing::debug;

use super::table::Table;
use crate::error::Result;
use crate::parser::Restaurant;
use crate::schema::RESTAURANTS;

/// Select the canonical columns in canonical order and type every row.
/// Any other column is dropped.
pub fn project(table: &Table) -> Result<Vec<Restaurant>> {
    let indices = RESTAURANTS
        .columns
        .iter()
        .map(|col| table.require(col.name, "projector"))
        .collect::<Result<Vec<usize>>>()?;

    let mut records = Vec::with_capacity(table.len());
    let mut cells: Vec<&str> = Vec::with_capacity(indices.len());

    for row in &table.rows {
        cells.clear();
        cells.extend(indices.iter().map(|&i| row.values[i].as_str()));
        records.push(Restaurant::from_cells(&cells, row.line)?);
    }

    debug!(
        rows = records.len(),
        dropped_columns = table.columns.len().saturating_sub(indices.len()),
        "Projected canonical columns"
    );
    Ok(records)
}
