//! extrato-core: domain types for bank-statement expense tracking

pub mod date;
pub mod dedup;
pub mod edit;
pub mod money;
pub mod transaction;

pub use date::{DateError, StatementDate};
pub use dedup::dedup_key;
pub use edit::{EditError, TransactionEdit};
pub use money::{format_brl, parse_statement_amount, parse_user_amount, MoneyError, MoneyStyle};
pub use transaction::{InvoiceRecord, StoredTransaction, TransactionRecord};
