//! Plain-text expense report. Amounts are shown as magnitudes.

use extrato_core::{format_brl, MoneyStyle, StoredTransaction};
use rust_decimal::Decimal;

pub fn render_table(rows: &[StoredTransaction]) -> String {
    let amounts: Vec<String> = rows
        .iter()
        .map(|r| format_brl(r.amount.abs(), MoneyStyle::Currency))
        .collect();

    let id_w = rows.iter().map(|r| r.id.to_string().len()).max().unwrap_or(0).max(2);
    let date_w = rows.iter().map(|r| r.date.text.chars().count()).max().unwrap_or(0).max(4);
    let desc_w = rows
        .iter()
        .map(|r| r.description.chars().count())
        .max()
        .unwrap_or(0)
        .max(11);
    let amt_w = amounts.iter().map(|a| a.chars().count()).max().unwrap_or(0).max(6);

    let mut out = String::new();
    out.push_str(&format!(
        "{:>id_w$}  {:<date_w$}  {:<desc_w$}  {:>amt_w$}\n",
        "ID", "Date", "Description", "Amount"
    ));
    out.push_str(&format!(
        "{}  {}  {}  {}\n",
        "-".repeat(id_w),
        "-".repeat(date_w),
        "-".repeat(desc_w),
        "-".repeat(amt_w)
    ));
    for (row, amount) in rows.iter().zip(&amounts) {
        out.push_str(&format!(
            "{:>id_w$}  {:<date_w$}  {:<desc_w$}  {:>amt_w$}\n",
            row.id, row.date.text, row.description, amount
        ));
    }

    let total: Decimal = rows.iter().map(|r| r.amount).sum::<Decimal>().abs();
    out.push_str(&format!(
        "\n{} transactions, total {}\n",
        rows.len(),
        format_brl(total, MoneyStyle::Currency)
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use extrato_core::StatementDate;
    use std::str::FromStr;

    #[test]
    fn test_table_lists_rows_and_total() {
        let rows = vec![
            StoredTransaction {
                id: 1,
                date: StatementDate::parse("15/03/24").unwrap(),
                description: "SUPERMARKET ABC".to_string(),
                amount: Decimal::from_str("-250.00").unwrap(),
                dedup_key: "k1".to_string(),
                invoice_id: None,
            },
            StoredTransaction {
                id: 12,
                date: StatementDate::parse("18/03/24").unwrap(),
                description: "LUZ".to_string(),
                amount: Decimal::from_str("-1187.35").unwrap(),
                dedup_key: "k2".to_string(),
                invoice_id: None,
            },
        ];
        let table = render_table(&rows);
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].starts_with("ID  Date"));
        assert!(lines[2].contains("SUPERMARKET ABC") && lines[2].ends_with("R$ 250,00"));
        assert!(lines[3].starts_with("12  18/03/24"));
        assert!(lines[3].ends_with("R$ 1.187,35"));
        assert_eq!(lines.last().copied(), Some("2 transactions, total R$ 1.437,35"));
    }
}
