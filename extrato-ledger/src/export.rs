//! CSV export of the ledger with pt-BR formatted amounts.

use extrato_core::{format_brl, MoneyStyle, StoredTransaction};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{LedgerError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Field separator. `;` by default since `,` is the decimal separator.
    pub delimiter: u8,
    pub style: MoneyStyle,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            style: MoneyStyle::Currency,
        }
    }
}

/// Write `Description, Date, Amount` rows. Returns the number of data rows.
///
/// The ledger only holds expenses, so amounts are written as magnitudes.
pub fn export_csv<W: Write>(rows: &[StoredTransaction], writer: W, opts: ExportOptions) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(opts.delimiter)
        .from_writer(writer);

    wtr.write_record(["Description", "Date", "Amount"])?;
    for row in rows {
        wtr.write_record([
            row.description.as_str(),
            row.date.text.as_str(),
            format_brl(row.amount.abs(), opts.style).as_str(),
        ])?;
    }
    wtr.flush().map_err(|e| LedgerError::Csv(e.into()))?;
    Ok(rows.len())
}

pub fn export_csv_file(path: impl AsRef<Path>, rows: &[StoredTransaction], opts: ExportOptions) -> Result<usize> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| LedgerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    export_csv(rows, file, opts)
}
