use std::path::PathBuf;

use thiserror::Error;

use crate::cruzeiro::stats::model::ReportMode;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, StatsError>;

/// Error type covering the failures that stop a report from being produced.
///
/// Problems confined to a single sheet are not errors: they are reported as
/// [`SheetWarning`](crate::cruzeiro::stats::model::SheetWarning)s and the
/// remaining sheets are still processed.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the workbook exists but a sheet cannot be located in it.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a player-scoped report is requested without a player.
    #[error("report '{0}' requires a player name")]
    PlayerRequired(ReportMode),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
