pub mod debit_lines;
