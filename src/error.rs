use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Source not found or unreadable: {path:?}: {source}")]
    SourceNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown {table} code {code:?} at line {line}")]
    UnknownCode {
        table: &'static str,
        code: String,
        line: u64,
    },

    #[error("Missing column {column} needed by the {stage}")]
    MissingColumn { column: String, stage: &'static str },

    #[error("Invalid value {value:?} for column {column} at line {line}: {reason}")]
    InvalidValue {
        column: &'static str,
        value: String,
        line: u64,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write output: {0}")]
    Write(#[source] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid filter: {0}")]
    Filter(String),

    #[error("Invalid query: {0}")]
    Query(String),
}

impl PipelineError {
    /// Name of the stage that raised the error
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::SourceNotFound { .. } => "loader",
            PipelineError::UnknownCode { .. } => "resolver",
            PipelineError::MissingColumn { stage, .. } => *stage,
            PipelineError::InvalidValue { .. } => "projector",
            PipelineError::Csv(_) | PipelineError::Io(_) => "io",
            PipelineError::Write(_) | PipelineError::Sqlite(_) => "sink",
            PipelineError::Config(_) => "config",
            PipelineError::Filter(_) => "filter",
            PipelineError::Query(_) => "analysis",
        }
    }

    pub fn missing_column(column: &str, stage: &'static str) -> Self {
        PipelineError::MissingColumn {
            column: column.to_string(),
            stage,
        }
    }

    /// I/O failure while producing an output artifact
    pub fn sink(err: std::io::Error) -> Self {
        PipelineError::Write(err.into())
    }
}

impl From<toml::de::Error> for PipelineError {
    fn from(err: toml::de::Error) -> Self {
        PipelineError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
