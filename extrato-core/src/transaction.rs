//! Transaction and invoice records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::date::StatementDate;
use crate::dedup::dedup_key;

/// A debit line pulled out of a statement, ready to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub date: StatementDate,
    /// Normalized description (sequence number stripped, whitespace collapsed)
    pub description: String,
    /// Negative for money leaving the account
    pub amount: Decimal,
    /// Computed once at creation; never recomputed after edits
    pub dedup_key: String,
    /// Reserved for invoice reconciliation; always `None` today
    pub invoice_id: Option<i64>,
}

impl TransactionRecord {
    pub fn new(date: StatementDate, description: impl Into<String>, amount: Decimal) -> Self {
        let description = description.into();
        let dedup_key = dedup_key(&date.text, &description, amount);
        Self {
            date,
            description,
            amount,
            dedup_key,
            invoice_id: None,
        }
    }
}

/// A transaction row as read back from the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTransaction {
    pub id: i64,
    pub date: StatementDate,
    pub description: String,
    pub amount: Decimal,
    pub dedup_key: String,
    pub invoice_id: Option<i64>,
}

/// Invoice slot kept in the schema for future reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    pub id: i64,
    /// Unique electronic invoice access key
    pub invoice_key: String,
    pub issuer_name: Option<String>,
    pub tax_id: Option<String>,
    pub issued_on: Option<String>,
    pub document_number: Option<String>,
}
