use thiserror::Error;

/// Structured failures of the data layer.
///
/// Loader functions return `anyhow::Result` with context attached; these
/// variants sit at the root of the chain so the UI can tell a schema problem
/// apart from an I/O or parse failure via `downcast_ref`.
#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("data file is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}
