//! Debit-line statement parser (text)
//!
//! Expected extracted-text rows, one transaction per line:
//!   DATE      DESCRIPTION                      AMOUNT      BALANCE
//!   15/03/24  042  SUPERMARKET ABC             250,00-     1.500,00
//!   15/03/24  SALARY DEPOSIT                 3.000,00      4.500,00
//!
//! Only amounts carrying the trailing debit marker are kept; credits and
//! balance-only rows are dropped.

use anyhow::Result;
use extrato_core::money::{parse_statement_amount, DEBIT_MARKER};
use extrato_core::{StatementDate, TransactionRecord};
use regex::Regex;
use tracing::{debug, trace};

/// Strip the sequence-number column some layouts put before the description,
/// then collapse runs of whitespace.
fn normalize_description(raw: &str, seq_re: &Regex, ws_re: &Regex) -> String {
    let stripped = seq_re.replace(raw, "");
    ws_re.replace_all(stripped.trim(), " ").into_owned()
}

/// Parse concatenated statement text into debit transactions, in line order.
pub fn parse_debit_lines(text: &str) -> Result<Vec<TransactionRecord>> {
    // DATE DESCRIPTION AMOUNT [BALANCE]
    let txn_re = Regex::new(concat!(
        r"^\s*(?P<date>\d{2}/\d{2}/(?:\d{4}|\d{2}))\s+",
        r"(?P<desc>.*?)\s+",
        r"(?P<amount>[\d.,]+-?)",
        r"(?:\s+[\d.,]+)?\s*$"
    ))?;
    let seq_re = Regex::new(r"^\d+\s+")?;
    let ws_re = Regex::new(r"\s{2,}")?;

    let mut out = Vec::new();

    for (idx, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(caps) = txn_re.captures(line) else {
            continue;
        };

        let amount_token = &caps["amount"];
        if !amount_token.ends_with(DEBIT_MARKER) {
            trace!(line = idx + 1, "skipping non-debit row");
            continue;
        }

        let magnitude = match parse_statement_amount(amount_token) {
            Ok(v) => v,
            Err(e) => {
                debug!(line = idx + 1, error = %e, "skipping row with unparseable amount");
                continue;
            }
        };

        let date = match StatementDate::parse(&caps["date"]) {
            Ok(d) => d,
            Err(e) => {
                debug!(line = idx + 1, error = %e, "skipping row with invalid date");
                continue;
            }
        };

        let description = normalize_description(&caps["desc"], &seq_re, &ws_re);
        out.push(TransactionRecord::new(date, description, -magnitude));
    }

    debug!(count = out.len(), "parsed debit lines");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_debit_with_balance() {
        let txns = parse_debit_lines("15/03/24 SUPERMARKET ABC         250,00-      1.500,00").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date.text, "15/03/24");
        assert_eq!(txns[0].description, "SUPERMARKET ABC");
        assert_eq!(txns[0].amount, dec("-250.00"));
    }

    #[test]
    fn test_credit_rows_are_dropped() {
        let txns = parse_debit_lines("15/03/24 SALARY DEPOSIT          3.000,00       4.500,00").unwrap();
        assert!(txns.is_empty());
    }

    #[test]
    fn test_grouped_amount_and_padding() {
        let txns = parse_debit_lines("01/02/24  SOME DESC   1.234,56-  9.999,00").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, dec("-1234.56"));
        assert_eq!(txns[0].description, "SOME DESC");
    }

    #[test]
    fn test_strips_sequence_number_and_collapses_spaces() {
        let txns = parse_debit_lines("10/01/2025 042   PAYMENT    X   89,90-").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "PAYMENT X");
        assert_eq!(txns[0].date.text, "10/01/2025");
    }

    #[test]
    fn test_no_balance_and_trailing_whitespace() {
        let txns = parse_debit_lines("05/05/24 TARIFA PACOTE 35,00-   \r\n").unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "TARIFA PACOTE");
        assert_eq!(txns[0].amount, dec("-35"));
    }

    #[test]
    fn test_garbage_does_not_abort() {
        let text = "\
EXTRATO DE CONTA CORRENTE
DATA     HISTORICO                 VALOR      SALDO
01/03/24 SALDO ANTERIOR                       1.000,00
02/03/24 BROKEN AMOUNT            1,2,3-
31/02/24 IMPOSSIBLE DATE            10,00-
03/03/24 FARMACIA POPULAR           45,10-       954,90
04/03/24 PIX RECEBIDO              100,00      1.054,90
05/03/24 12 POSTO SHELL            200,00-       854,90
";
        let txns = parse_debit_lines(text).unwrap();
        let descs: Vec<_> = txns.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["FARMACIA POPULAR", "POSTO SHELL"]);
        assert_eq!(txns[1].amount, dec("-200"));
    }

    #[test]
    fn test_pages_keep_order() {
        let text = "02/01/25 SECOND PAGE ITEM 1,00-\n31/12/24 FIRST PAGE ITEM 2,00-\n";
        let txns = parse_debit_lines(text).unwrap();
        assert_eq!(txns[0].description, "SECOND PAGE ITEM");
        assert_eq!(txns[1].description, "FIRST PAGE ITEM");
    }
}
