//! Optional TOML configuration
//!
//! ```toml
//! [pipeline]
//! unmatched_price_range = "gourmet"
//!
//! [output]
//! path = "datasets/data_processed.csv"
//! delimiter = ","
//!
//! [lookups.countries]
//! 1 = "India"
//!
//! [lookups.colors]
//! "3F7E00" = "darkgreen"
//! ```

use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::lookup::{CodeTables, PricePolicy, PriceType};

/// Default file name of the sink artifact
pub const DEFAULT_OUTPUT_FILE: &str = "data_processed.csv";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub output: OutputSettings,
    pub lookups: LookupSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineSettings {
    pub unmatched_price_range: PriceType,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            unmatched_price_range: PricePolicy::default().unmatched,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub path: Option<PathBuf>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LookupSettings {
    /// Country code (as a string key) to name
    pub countries: Option<BTreeMap<String, String>>,
    /// Rating-color hex code to color name
    pub colors: Option<BTreeMap<String, String>>,
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read {:?}: {}", path, e))
        })?;
        let settings = Self::from_toml(&text)?;
        debug!(path = ?path, "Loaded configuration");
        Ok(settings)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path` if given, otherwise the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    pub fn price_policy(&self) -> PricePolicy {
        PricePolicy::new(self.pipeline.unmatched_price_range)
    }

    /// Built-in tables with any configured replacements applied
    pub fn code_tables(&self) -> Result<CodeTables> {
        let mut tables = CodeTables::default();

        if let Some(countries) = &self.lookups.countries {
            let parsed = countries
                .iter()
                .map(|(code, name)| {
                    code.trim()
                        .parse::<i64>()
                        .map(|c| (c, name.clone()))
                        .map_err(|_| {
                            PipelineError::Config(format!("Country code is not an integer: {}", code))
                        })
                })
                .collect::<Result<BTreeMap<i64, String>>>()?;
            tables = tables.with_countries(parsed);
        }

        if let Some(colors) = &self.lookups.colors {
            tables = tables.with_colors(colors.clone());
        }

        Ok(tables)
    }

    /// Output delimiter as a byte
    pub fn delimiter(&self) -> Result<Option<u8>> {
        self.output.delimiter.map(delimiter_byte).transpose()
    }

    /// Configured output path, or the default under the user's data directory
    pub fn output_path(&self) -> Result<PathBuf> {
        match &self.output.path {
            Some(p) => Ok(p.clone()),
            None => default_output_path(),
        }
    }
}

/// `data_processed.csv` in the platform data directory
pub fn default_output_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "restaurant-prep").ok_or_else(|| {
        PipelineError::Config("Could not determine data directory".to_string())
    })?;
    Ok(dirs.data_dir().join(DEFAULT_OUTPUT_FILE))
}

/// Delimiters must be a single ASCII character
pub fn delimiter_byte(c: char) -> Result<u8> {
    if c.is_ascii() && c != '"' && c != '\n' && c != '\r' {
        Ok(c as u8)
    } else {
        Err(PipelineError::Config(format!("Unsupported delimiter: {:?}", c)))
    }
}
