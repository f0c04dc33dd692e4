//! Dataset preparation: load, normalize, resolve, simplify, dedup, project, write.
//!
//! Every stage consumes the previous stage's complete output. The sink is
//! only touched after every other stage succeeded, so a failed run leaves
//! any previous artifact untouched.

pub mod cuisine;
pub mod dedup;
pub mod loader;
pub mod normalize;
pub mod project;
pub mod resolve;
pub mod table;

use std::path::Path;
use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::lookup::{CodeTables, PricePolicy};
use crate::parser::Restaurant;
use crate::ui::{Phase, Ui};
use crate::writer::write_delimited;

pub use loader::{load_csv, load_from_reader};
pub use resolve::CodeResolver;
pub use table::{RawTable, Table};

/// Row counts observed while preparing the table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrepReport {
    pub raw_rows: usize,
    pub dropped_null_rows: usize,
    pub duplicate_rows: usize,
    pub output_rows: usize,
}

impl PrepReport {
    /// Rows left after dropping rows with missing values
    pub fn dense_rows(&self) -> usize {
        self.raw_rows - self.dropped_null_rows
    }
}

impl std::fmt::Display for PrepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} rows read, {} dropped (missing values), {} duplicates removed, {} written",
            self.raw_rows, self.dropped_null_rows, self.duplicate_rows, self.output_rows
        )
    }
}

/// The cleaned table plus what happened while building it
#[derive(Debug, Clone)]
pub struct PreparedDataset {
    pub restaurants: Vec<Restaurant>,
    pub report: PrepReport,
}

impl PreparedDataset {
    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    resolver: CodeResolver,
}

impl Pipeline {
    pub fn new(tables: CodeTables, price_policy: PricePolicy) -> Self {
        Self {
            resolver: CodeResolver::new(tables, price_policy),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.code_tables()?, settings.price_policy()))
    }

    pub fn resolver(&self) -> &CodeResolver {
        &self.resolver
    }

    /// Load `input` and run every in-memory stage
    pub fn prepare(&self, input: &Path, ui: &mut impl Ui) -> Result<PreparedDataset> {
        ui.set_phase(Phase::Loading);
        ui.set_info(format!("Reading {}", input.display()));
        let raw = load_csv(input)?;
        self.prepare_table(raw, ui)
    }

    /// Run the pure stages over an already loaded table
    pub fn prepare_table(&self, raw: RawTable, ui: &mut impl Ui) -> Result<PreparedDataset> {
        let raw_rows = raw.rows.len();

        ui.set_phase(Phase::Normalizing);
        let (table, dropped_null_rows) = normalize::normalize(raw);
        if dropped_null_rows > 0 {
            ui.log(format!("Dropped {} rows with missing values", dropped_null_rows));
        }

        ui.set_phase(Phase::Resolving);
        let table = self.resolver.resolve(table)?;

        ui.set_phase(Phase::Simplifying);
        let table = cuisine::simplify(table)?;

        ui.set_phase(Phase::Deduplicating);
        let (table, duplicate_rows) = dedup::dedup(table);
        if duplicate_rows > 0 {
            ui.log(format!("Removed {} duplicate rows", duplicate_rows));
        }

        ui.set_phase(Phase::Projecting);
        let restaurants = project::project(&table)?;

        let report = PrepReport {
            raw_rows,
            dropped_null_rows,
            duplicate_rows,
            output_rows: restaurants.len(),
        };
        info!(
            raw_rows,
            dropped_null_rows,
            duplicate_rows,
            output_rows = report.output_rows,
            "Prepared dataset"
        );

        Ok(PreparedDataset {
            restaurants,
            report,
        })
    }

    /// Prepare `input` and write it to `output`
    pub fn run(
        &self,
        input: &Path,
        output: &Path,
        delimiter: u8,
        ui: &mut impl Ui,
    ) -> Result<PreparedDataset> {
        let dataset = self.prepare(input, ui)?;

        ui.set_phase(Phase::Writing);
        write_delimited(output, dataset.restaurants(), delimiter)?;

        ui.set_phase(Phase::Complete);
        ui.log(dataset.report.to_string());
        Ok(dataset)
    }
}
