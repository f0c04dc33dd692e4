use crate::error::{PipelineError, Result};

/// A source row as read: `None` marks a missing value
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source file
    pub line: u64,
    pub values: Vec<Option<String>>,
}

/// The source table exactly as loaded
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// A dense row: every column has a value
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: u64,
    pub values: Vec<String>,
}

/// Dense string table flowing between the normalizer and the projector
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column that `stage` cannot do without
    pub fn require(&self, name: &str, stage: &'static str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::missing_column(name, stage))
    }

    /// Derive a column from an existing one, replacing it if it already exists.
    pub fn derive<F>(
        mut self,
        stage: &'static str,
        source: &str,
        target: &str,
        mut f: F,
    ) -> Result<Self>
    where
        F: FnMut(&str, u64) -> Result<String>,
    {
        let src = self.require(source, stage)?;
        let existing = self.column_index(target);

        for row in &mut self.rows {
            let value = f(&row.values[src], row.line)?;
            match existing {
                Some(idx) => row.values[idx] = value,
                None => row.values.push(value),
            }
        }

        if existing.is_none() {
            self.columns.push(target.to_string());
        }

        Ok(self)
    }
}
