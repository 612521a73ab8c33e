//! extrato-ingest: statement text extraction and debit-line parsing.

pub mod error;
pub mod parsers;
pub mod text;

pub use error::IngestError;
pub use parsers::debit_lines::parse_debit_lines;
pub use text::{discover_statements, FileTextSource, StatementText, TextSource};
