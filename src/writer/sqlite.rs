use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::delimited::{ensure_parent, temp_sibling};
use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use crate::error::{PipelineError, Result};
use crate::parser::Restaurant;
use crate::schema::{TableSchema, RESTAURANTS};
use crate::ui::Ui;

const BATCH_SIZE: usize = 1000;

pub struct SqliteWriter {
    conn: Connection,
    tmp_path: PathBuf,
    db_path: PathBuf,
}

impl SqliteWriter {
    /// Open a fresh database next to `db_path`; it replaces `db_path` on finalize.
    pub fn new(db_path: &Path) -> Result<Self> {
        ensure_parent(db_path)?;
        let tmp_path = temp_sibling(db_path);

        // Remove a stale temp database if a previous run died
        if tmp_path.exists() {
            fs::remove_file(&tmp_path).map_err(PipelineError::sink)?;
        }

        let conn = Connection::open(&tmp_path)?;
        conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -64000;",
        )?;

        Ok(Self {
            conn,
            tmp_path,
            db_path: db_path.to_path_buf(),
        })
    }

    /// Create the table and its indexes
    pub fn create_table(&self, schema: &TableSchema) -> Result<()> {
        self.conn.execute(&generate_create_table(schema), [])?;
        for index_sql in generate_indexes(schema) {
            self.conn.execute(&index_sql, [])?;
        }
        Ok(())
    }

    /// Insert all records in one transaction
    pub fn insert_restaurants(
        &mut self,
        records: &[Restaurant],
        ui: &mut impl Ui,
    ) -> Result<u64> {
        let insert_sql = generate_insert(&RESTAURANTS);
        let total = records.len() as u64;
        let tx = self.conn.transaction()?;
        let mut count: u64 = 0;

        for batch in records.chunks(BATCH_SIZE) {
            insert_batch(&tx, &insert_sql, batch)?;
            count += batch.len() as u64;
            ui.set_progress(count, total, "restaurants");
        }

        tx.commit()?;
        ui.clear_progress();
        Ok(count)
    }

    /// Close the database and move it over the target path
    pub fn finalize(self) -> Result<PathBuf> {
        self.conn.execute_batch("PRAGMA optimize;")?;
        self.conn.close().map_err(|(_, e)| e)?;
        fs::rename(&self.tmp_path, &self.db_path).map_err(PipelineError::sink)?;
        Ok(self.db_path)
    }
}

/// Insert a batch of rows into the database
fn insert_batch(tx: &rusqlite::Transaction, sql: &str, batch: &[Restaurant]) -> Result<()> {
    let mut stmt = tx.prepare_cached(sql)?;

    for record in batch {
        for (idx, value) in record.sql_values().iter().enumerate() {
            value.bind_to(idx + 1, &mut stmt)?;
        }
        stmt.raw_execute()?;
    }

    Ok(())
}

/// Write the cleaned table into an SQLite database
///
/// On any failure the temporary database is removed and the target is left as it was.
pub fn write_sqlite(db_path: &Path, records: &[Restaurant], ui: &mut impl Ui) -> Result<u64> {
    let writer = SqliteWriter::new(db_path)?;
    let tmp = writer.tmp_path.clone();

    match populate(writer, records, ui) {
        Ok((path, count)) => {
            info!(path = ?path, rows = count, "Wrote SQLite database");
            Ok(count)
        }
        Err(e) => {
            fs::remove_file(&tmp).ok();
            Err(e)
        }
    }
}

fn populate(
    mut writer: SqliteWriter,
    records: &[Restaurant],
    ui: &mut impl Ui,
) -> Result<(PathBuf, u64)> {
    writer.create_table(&RESTAURANTS)?;
    let count = writer.insert_restaurants(records, ui)?;
    let path = writer.finalize()?;
    Ok((path, count))
}
