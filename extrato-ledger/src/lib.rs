//! extrato-ledger: SQLite-backed transaction ledger, statement import, and CSV export

pub mod error;
pub mod export;
pub mod import;
pub mod schema;
pub mod store;

pub use error::LedgerError;
pub use export::{export_csv, export_csv_file, ExportOptions};
pub use import::{import_statement, ImportReport};
pub use store::{Ledger, LedgerConfig, LedgerCounts};
