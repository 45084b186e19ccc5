//! Error types for loading datasets and configuration.

use thiserror::Error;

/// Errors that can occur while loading a dataset, a configuration file,
/// or writing an export.
#[derive(Debug, Error)]
pub enum SshMonError {
    /// A required column is absent from the CSV header.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// A row has an empty cell in a required column.
    #[error("line {line}: empty value in required column '{column}'")]
    MissingValue { line: u64, column: String },

    /// The CSV text could not be read.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The configuration YAML could not be parsed.
    #[error("config YAML error: {0}")]
    ConfigYaml(#[from] serde_yaml::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// A session was asked to render before anything was loaded.
    #[error("no dataset loaded")]
    NoDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, SshMonError>;
