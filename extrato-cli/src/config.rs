use anyhow::{bail, Context, Result};
use extrato_core::MoneyStyle;
use extrato_ledger::{ExportOptions, LedgerConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{default_db_path, ensure_extrato_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub import: ImportSection,
    #[serde(default)]
    pub export: ExportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSection {
    /// SQLite file. Defaults to `<extrato home>/ledger.db`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Folder scanned by `extrato import` when no path is given
    pub statements_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub delimiter: char,
    pub style: MoneyStyle,
}

impl Default for ImportSection {
    fn default() -> Self {
        Self {
            statements_dir: PathBuf::from("extratos"),
        }
    }
}

impl Default for ExportSection {
    fn default() -> Self {
        Self {
            delimiter: ';',
            style: MoneyStyle::Currency,
        }
    }
}

impl Config {
    /// Resolve the ledger location; `--db` wins over the file.
    pub fn ledger_config(&self, db_override: Option<&Path>) -> Result<LedgerConfig> {
        let path = match (db_override, &self.storage.db_path) {
            (Some(p), _) => p.to_path_buf(),
            (None, Some(p)) => p.clone(),
            (None, None) => default_db_path()?,
        };
        Ok(LedgerConfig::new(path))
    }

    pub fn export_options(&self, delimiter: Option<char>, plain: bool) -> Result<ExportOptions> {
        let delimiter = delimiter.unwrap_or(self.export.delimiter);
        if !delimiter.is_ascii() {
            bail!("export delimiter must be a single ASCII character, got '{delimiter}'");
        }
        Ok(ExportOptions {
            delimiter: delimiter as u8,
            style: if plain { MoneyStyle::Plain } else { self.export.style },
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_extrato_home()?.join("config.toml"))
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config, path: &Path) -> Result<()> {
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn init_config(path: Option<&Path>) -> Result<()> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
