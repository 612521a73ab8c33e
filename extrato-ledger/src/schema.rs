//! Table definitions. Every statement is idempotent.

/// `date` keeps the statement's day-first text; `booked_on` is the ISO date
/// used for ordering.
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS invoices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    invoice_key TEXT UNIQUE NOT NULL,
    issuer_name TEXT,
    tax_id TEXT,
    issued_on TEXT,
    document_number TEXT
);

CREATE TABLE IF NOT EXISTS transactions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    date TEXT NOT NULL,
    booked_on TEXT NOT NULL,
    description TEXT NOT NULL,
    amount REAL NOT NULL,
    dedup_key TEXT UNIQUE NOT NULL,
    invoice_id INTEGER REFERENCES invoices(id)
);

CREATE INDEX IF NOT EXISTS idx_transactions_booked_on ON transactions(booked_on);
"#;
