//! Statement import: text source -> parser -> ledger.

use extrato_ingest::{parse_debit_lines, StatementText, TextSource};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{LedgerError, Result};
use crate::store::Ledger;

/// Outcome of importing one statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub path: PathBuf,
    /// Debit lines recognized in the statement
    pub parsed: usize,
    /// Rows that were not already in the ledger
    pub inserted: usize,
}

impl ImportReport {
    pub fn duplicates(&self) -> usize {
        self.parsed - self.inserted
    }
}

pub fn import_statement(ledger: &Ledger, source: &dyn TextSource, path: &Path) -> Result<ImportReport> {
    let pages = source.extract_pages(path)?;
    let text = StatementText::concat(&pages);
    let records = parse_debit_lines(text.as_str()).map_err(|e| LedgerError::Parse(e.to_string()))?;
    let inserted = ledger.import(&records)?;

    info!(
        path = %path.display(),
        parsed = records.len(),
        inserted,
        "statement imported"
    );

    Ok(ImportReport {
        path: path.to_path_buf(),
        parsed: records.len(),
        inserted,
    })
}
