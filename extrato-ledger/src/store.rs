//! Persistence gateway.
//!
//! Each public call opens its own connection, does its work inside one SQLite
//! transaction, commits, and drops the connection before returning. The
//! `UNIQUE` constraint on `dedup_key` is the only guard against duplicate
//! imports, so concurrent importers stay safe.

use extrato_core::money::round_cents;
use extrato_core::{StatementDate, StoredTransaction, TransactionEdit, TransactionRecord};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{LedgerError, Result};
use crate::schema::SCHEMA;

const INSERT_SQL: &str = "INSERT INTO transactions (date, booked_on, description, amount, dedup_key, invoice_id)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)
     ON CONFLICT(dedup_key) DO NOTHING";

const SELECT_SQL: &str =
    "SELECT id, date, description, amount, dedup_key, invoice_id FROM transactions";

/// Where the ledger lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    pub db_path: PathBuf,
}

impl LedgerConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LedgerCounts {
    pub transactions: u64,
    pub invoices: u64,
}

/// Raw row before conversion to domain types.
struct Row {
    id: i64,
    date: String,
    description: String,
    amount: f64,
    dedup_key: String,
    invoice_id: Option<i64>,
}

impl Row {
    fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            description: row.get(2)?,
            amount: row.get(3)?,
            dedup_key: row.get(4)?,
            invoice_id: row.get(5)?,
        })
    }

    fn into_stored(self) -> Result<StoredTransaction> {
        let date = StatementDate::parse(&self.date).map_err(|e| LedgerError::CorruptRow {
            id: self.id,
            reason: e.to_string(),
        })?;
        let amount = Decimal::from_f64(self.amount).ok_or_else(|| LedgerError::CorruptRow {
            id: self.id,
            reason: format!("amount {} is not finite", self.amount),
        })?;
        Ok(StoredTransaction {
            id: self.id,
            date,
            description: self.description,
            amount: round_cents(amount),
            dedup_key: self.dedup_key,
            invoice_id: self.invoice_id,
        })
    }
}

fn amount_to_sql(amount: Decimal) -> f64 {
    round_cents(amount).to_f64().unwrap_or_default()
}

#[derive(Debug, Clone)]
pub struct Ledger {
    config: LedgerConfig,
}

impl Ledger {
    /// Open (creating if needed) the database described by `config`.
    pub fn open(config: LedgerConfig) -> Result<Self> {
        if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LedgerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let ledger = Self { config };
        let conn = ledger.connect()?;
        conn.execute_batch(SCHEMA)?;
        debug!(db = %ledger.path().display(), "ledger schema ready");
        Ok(ledger)
    }

    pub fn path(&self) -> &Path {
        &self.config.db_path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.config.db_path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Insert one record unless its dedup key is already stored.
    ///
    /// Returns `false` for a duplicate.
    pub fn insert_if_new(&self, record: &TransactionRecord) -> Result<bool> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let inserted = insert_record(&tx, record)?;
        tx.commit()?;
        Ok(inserted)
    }

    /// Insert every record independently; duplicates are skipped, not fatal.
    ///
    /// Returns how many rows were new.
    pub fn import(&self, records: &[TransactionRecord]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut inserted = 0;
        for record in records {
            if insert_record(&tx, record)? {
                inserted += 1;
            } else {
                debug!(key = %record.dedup_key, "duplicate transaction skipped");
            }
        }
        tx.commit()?;
        info!(parsed = records.len(), inserted, "import committed");
        Ok(inserted)
    }

    /// All transactions in calendar order (ties by insertion order).
    pub fn list_all(&self) -> Result<Vec<StoredTransaction>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("{SELECT_SQL} ORDER BY booked_on, id"))?;
        let rows = stmt
            .query_map([], Row::from_sql)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        rows.into_iter().map(Row::into_stored).collect()
    }

    pub fn get(&self, id: i64) -> Result<Option<StoredTransaction>> {
        let conn = self.connect()?;
        let row = conn
            .query_row(&format!("{SELECT_SQL} WHERE id = ?1"), params![id], Row::from_sql)
            .optional()?;
        row.map(Row::into_stored).transpose()
    }

    /// Replace description, date, and amount. The dedup key is left alone.
    ///
    /// Returns `false` when no row has this id.
    pub fn update(&self, id: i64, edit: &TransactionEdit) -> Result<bool> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let changed = tx.execute(
            "UPDATE transactions SET description = ?1, date = ?2, booked_on = ?3, amount = ?4 WHERE id = ?5",
            params![
                edit.description,
                edit.date.text,
                edit.date.iso(),
                amount_to_sql(edit.amount),
                id
            ],
        )?;
        tx.commit()?;
        Ok(changed == 1)
    }

    pub fn delete_one(&self, id: i64) -> Result<bool> {
        Ok(self.delete_many(&[id])? == 1)
    }

    /// Delete several rows at once. Returns how many existed.
    pub fn delete_many(&self, ids: &[i64]) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let mut removed = 0;
        {
            let mut stmt = tx.prepare("DELETE FROM transactions WHERE id = ?1")?;
            for id in ids {
                removed += stmt.execute(params![id])?;
            }
        }
        tx.commit()?;
        Ok(removed)
    }

    /// Remove every transaction row. Invoices are not touched.
    pub fn clear_all(&self) -> Result<usize> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM transactions", [])?;
        tx.commit()?;
        info!(removed, "ledger cleared");
        Ok(removed)
    }

    pub fn counts(&self) -> Result<LedgerCounts> {
        let conn = self.connect()?;
        let transactions: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        let invoices: i64 = conn.query_row("SELECT COUNT(*) FROM invoices", [], |row| row.get(0))?;
        Ok(LedgerCounts {
            transactions: transactions as u64,
            invoices: invoices as u64,
        })
    }
}

fn insert_record(conn: &Connection, record: &TransactionRecord) -> Result<bool> {
    let changed = conn.execute(
        INSERT_SQL,
        params![
            record.date.text,
            record.date.iso(),
            record.description,
            amount_to_sql(record.amount),
            record.dedup_key,
            record.invoice_id,
        ],
    )?;
    Ok(changed == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ledger() -> (tempfile::TempDir, Ledger) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::open(LedgerConfig::new(dir.path().join("ledger.db"))).unwrap();
        (dir, ledger)
    }

    fn record(date: &str, desc: &str, amount: &str) -> TransactionRecord {
        TransactionRecord::new(
            StatementDate::parse(date).unwrap(),
            desc,
            Decimal::from_str(amount).unwrap(),
        )
    }

    #[test]
    fn test_insert_if_new_rejects_duplicate() {
        let (_dir, ledger) = ledger();
        let rec = record("15/03/24", "SUPERMARKET ABC", "-250.00");
        assert!(ledger.insert_if_new(&rec).unwrap());
        assert!(!ledger.insert_if_new(&rec).unwrap());
        assert_eq!(ledger.counts().unwrap().transactions, 1);
    }

    #[test]
    fn test_list_orders_by_calendar_date() {
        let (_dir, ledger) = ledger();
        ledger
            .import(&[
                record("02/01/25", "NEW YEAR", "-1"),
                record("31/12/24", "NEW YEAR EVE", "-2"),
                record("15/06/2024", "MID YEAR", "-3"),
            ])
            .unwrap();
        let dates: Vec<_> = ledger
            .list_all()
            .unwrap()
            .into_iter()
            .map(|t| t.date.text)
            .collect();
        assert_eq!(dates, vec!["15/06/2024", "31/12/24", "02/01/25"]);
    }

    #[test]
    fn test_missing_ids() {
        let (_dir, ledger) = ledger();
        let edit = TransactionEdit::parse("X", "01/01/24", "1,00").unwrap();
        assert!(!ledger.update(42, &edit).unwrap());
        assert!(!ledger.delete_one(42).unwrap());
        assert!(ledger.get(42).unwrap().is_none());
    }

    #[test]
    fn test_delete_many_counts_existing() {
        let (_dir, ledger) = ledger();
        ledger
            .import(&[record("01/01/24", "A", "-1"), record("02/01/24", "B", "-2")])
            .unwrap();
        let ids: Vec<i64> = ledger.list_all().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ledger.delete_many(&[ids[0], ids[1], 999]).unwrap(), 2);
        assert!(ledger.list_all().unwrap().is_empty());
    }
}
