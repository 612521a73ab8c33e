use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use extrato_core::TransactionEdit;
use extrato_ingest::{discover_statements, FileTextSource, IngestError};
use extrato_ledger::{export_csv_file, import_statement, Ledger, LedgerError};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

mod config;
mod report;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "extrato",
    version = env!("EXTRATO_VERSION"),
    about = "Import debit transactions from bank statements into a local ledger"
)]
struct Cli {
    /// Enable verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file (default: ~/.extrato/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQLite ledger to use instead of the configured one
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import debit transactions from a statement PDF, or every PDF in a folder
    Import {
        /// Statement file or folder (default: configured statements_dir)
        path: Option<PathBuf>,
    },

    /// Show the expense report
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Replace description, date, and amount of one transaction
    Edit {
        id: i64,

        #[arg(long)]
        description: String,

        /// DD/MM/YY or DD/MM/YYYY
        #[arg(long)]
        date: String,

        /// pt-BR amount, e.g. "-1.234,56" or "250,00-"
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
    },

    /// Delete one or more transactions by id
    Delete {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Export transactions to CSV
    Export {
        file: PathBuf,

        /// Plain numbers instead of "R$ " currency strings
        #[arg(long)]
        plain: bool,

        /// Field separator (default from config, usually ';')
        #[arg(long)]
        delimiter: Option<char>,
    },

    /// Delete every transaction (invoices are kept)
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },

    /// Link an invoice to a transaction
    Associate,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config file if none exists
    Init,
    /// Print the effective configuration
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: could not install logger: {e}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cfg = config::load_config(cli.config.as_deref())?;
    let db = cli.db.as_deref();

    match cli.command {
        Command::Import { path } => {
            let ledger = open_ledger(&cfg, db)?;
            let path = path.unwrap_or_else(|| cfg.import.statements_dir.clone());
            import_path(&ledger, &path)?;
        }

        Command::List { json } => {
            let rows = open_ledger(&cfg, db)?.list_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if rows.is_empty() {
                println!("No transactions yet. Import a statement with: extrato import <file.pdf>");
            } else {
                print!("{}", report::render_table(&rows));
            }
        }

        Command::Edit {
            id,
            description,
            date,
            amount,
        } => {
            let edit = TransactionEdit::parse(&description, &date, &amount)?;
            if !open_ledger(&cfg, db)?.update(id, &edit)? {
                bail!("no transaction with id {id}");
            }
            println!("Updated transaction {id}");
        }

        Command::Delete { ids } => {
            let removed = open_ledger(&cfg, db)?.delete_many(&ids)?;
            println!("Deleted {removed} of {} transaction(s)", ids.len());
            if removed < ids.len() {
                warn!(requested = ids.len(), removed, "some ids did not exist");
            }
        }

        Command::Export {
            file,
            plain,
            delimiter,
        } => {
            let opts = cfg.export_options(delimiter, plain)?;
            let rows = open_ledger(&cfg, db)?.list_all()?;
            let n = export_csv_file(&file, &rows, opts)
                .with_context(|| format!("exporting to {}", file.display()))?;
            println!("Exported {n} transactions to {}", file.display());
        }

        Command::Reset { yes } => {
            if !yes {
                bail!("refusing to delete every transaction without --yes");
            }
            let removed = open_ledger(&cfg, db)?.clear_all()?;
            println!("Removed {removed} transactions");
        }

        Command::Associate => {
            println!("Invoice association is not implemented yet; transactions keep an empty invoice link.");
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(cli.config.as_deref())?,
            ConfigCommand::Show => {
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}

fn open_ledger(cfg: &Config, db: Option<&Path>) -> Result<Ledger> {
    let lc = cfg.ledger_config(db)?;
    let path = lc.db_path.clone();
    Ledger::open(lc).with_context(|| format!("opening ledger {}", path.display()))
}

/// Import one file, or every PDF in a folder. A bad file in a folder is
/// reported and skipped.
fn import_path(ledger: &Ledger, path: &Path) -> Result<()> {
    if path.is_dir() {
        let files = discover_statements(path)?;
        if files.is_empty() {
            println!("No PDF statements found in {}", path.display());
            return Ok(());
        }

        let mut total = 0;
        for file in &files {
            match import_statement(ledger, &FileTextSource, file) {
                Ok(report) => {
                    total += report.inserted;
                    println!(
                        "{}: {} new ({} duplicates)",
                        file.display(),
                        report.inserted,
                        report.duplicates()
                    );
                }
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "statement skipped");
                    eprintln!("{}: {e}", file.display());
                }
            }
        }
        println!("Import finished: {total} new transactions from {} file(s)", files.len());
        return Ok(());
    }

    match import_statement(ledger, &FileTextSource, path) {
        Ok(report) => {
            println!(
                "Import finished: {} new transactions ({} duplicates)",
                report.inserted,
                report.duplicates()
            );
            Ok(())
        }
        Err(LedgerError::Ingest(IngestError::NotFound(p))) => {
            bail!("statement not found: {} (pass a PDF path or folder)", p.display())
        }
        Err(e) => Err(e).with_context(|| format!("importing {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_leads_with_package_version() {
        let cmd = Cli::command();
        let version = cmd.get_version().unwrap();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")), "{version}");
        if let Some((_, sha)) = version.split_once(" (") {
            let sha = sha.trim_end_matches(')');
            assert_eq!(sha.len(), 7);
            assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
        }
    }

    #[test]
    fn test_edit_accepts_negative_amount() {
        let cli = Cli::try_parse_from([
            "extrato", "edit", "7", "--description", "LUZ", "--date", "18/03/24", "--amount", "-187,35",
        ])
        .unwrap();
        match cli.command {
            Command::Edit { id, amount, .. } => {
                assert_eq!(id, 7);
                assert_eq!(amount, "-187,35");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
