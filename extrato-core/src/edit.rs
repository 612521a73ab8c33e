//! Typed edit command for a stored transaction.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::date::{DateError, StatementDate};
use crate::money::{parse_user_amount, MoneyError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("invalid date: {0}")]
    Date(#[from] DateError),
    #[error("invalid amount: {0}")]
    Amount(#[from] MoneyError),
}

/// Full replacement of the mutable fields of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionEdit {
    pub description: String,
    pub date: StatementDate,
    pub amount: Decimal,
}

impl TransactionEdit {
    /// Validate raw text fields before anything reaches the ledger.
    pub fn parse(description: &str, date: &str, amount: &str) -> Result<Self, EditError> {
        let description = description.split_whitespace().collect::<Vec<_>>().join(" ");
        if description.is_empty() {
            return Err(EditError::EmptyDescription);
        }
        Ok(Self {
            description,
            date: StatementDate::parse(date)?,
            amount: parse_user_amount(amount)?,
        })
    }
}
