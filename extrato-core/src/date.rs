//! Statement dates: `DD/MM/YY` or `DD/MM/YYYY`, kept as written plus a calendar value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("expected DD/MM/YY or DD/MM/YYYY, got '{0}'")]
    Format(String),
    #[error("'{0}' is not a calendar date")]
    OutOfRange(String),
}

/// A date as printed on the statement.
///
/// `text` is the exact token from the source line; it feeds the dedup key and
/// is what exports show. `date` is only used for ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatementDate {
    pub text: String,
    pub date: NaiveDate,
}

impl StatementDate {
    /// Parse a day-first date. Two-digit years land in 2000-2099.
    pub fn parse(text: &str) -> Result<Self, DateError> {
        let text = text.trim();
        let mut parts = text.split('/');
        let (Some(d), Some(m), Some(y), None) = (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(DateError::Format(text.to_string()));
        };

        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
        if d.len() != 2 || m.len() != 2 || !(y.len() == 2 || y.len() == 4) {
            return Err(DateError::Format(text.to_string()));
        }
        if !(all_digits(d) && all_digits(m) && all_digits(y)) {
            return Err(DateError::Format(text.to_string()));
        }

        let day: u32 = d.parse().map_err(|_| DateError::Format(text.to_string()))?;
        let month: u32 = m.parse().map_err(|_| DateError::Format(text.to_string()))?;
        let mut year: i32 = y.parse().map_err(|_| DateError::Format(text.to_string()))?;
        if y.len() == 2 {
            year += 2000;
        }

        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| DateError::OutOfRange(text.to_string()))?;

        Ok(Self {
            text: text.to_string(),
            date,
        })
    }

    /// ISO form (`YYYY-MM-DD`), used as the sortable storage column.
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for StatementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialOrd for StatementDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StatementDate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date).then_with(|| self.text.cmp(&other.text))
    }
}
