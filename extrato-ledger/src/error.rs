use extrato_ingest::IngestError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LedgerError>;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("statement parser failed: {0}")]
    Parse(String),

    /// A stored row no longer converts back to domain types.
    #[error("row {id} is corrupt: {reason}")]
    CorruptRow { id: i64, reason: String },
}
