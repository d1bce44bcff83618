use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use crate::data::model::columns::{COMPANY_NAME, YEAR};

/// Config file picked up from the working directory when `--config` is not
/// given.
pub const DEFAULT_CONFIG_FILE: &str = "cars-dashboard.toml";
pub const DEFAULT_RAW_PATH: &str = "carspandas.csv";
pub const DEFAULT_CLEANED_PATH: &str = "Cars_cleaned.csv";

/// Command line arguments.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Raw listings file (.csv, .json or .parquet)
    #[arg(long, value_name = "PATH")]
    pub raw: Option<PathBuf>,

    /// Cleaned listings file (.csv, .json or .parquet)
    #[arg(long, value_name = "PATH")]
    pub cleaned: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Settings as read from the TOML file.  Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Path of the raw dataset
    pub raw_path: Option<PathBuf>,

    /// Path of the cleaned dataset
    pub cleaned_path: Option<PathBuf>,

    /// Categorical column behind the multi-select filter
    pub category_column: Option<String>,

    /// Numeric column behind the range slider
    pub range_column: Option<String>,

    /// Maximum rows shown in the table viewers
    pub preview_rows: Option<usize>,
}

impl FileConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Resolved settings used by the application.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub raw_path: PathBuf,
    pub cleaned_path: PathBuf,
    pub category_column: String,
    pub range_column: String,
    pub preview_rows: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            raw_path: PathBuf::from(DEFAULT_RAW_PATH),
            cleaned_path: PathBuf::from(DEFAULT_CLEANED_PATH),
            category_column: COMPANY_NAME.to_string(),
            range_column: YEAR.to_string(),
            preview_rows: None,
        }
    }
}

impl DashboardConfig {
    /// Merge settings: command line over config file over defaults.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            raw_path: cli
                .raw
                .clone()
                .or(file.raw_path)
                .unwrap_or(defaults.raw_path),
            cleaned_path: cli
                .cleaned
                .clone()
                .or(file.cleaned_path)
                .unwrap_or(defaults.cleaned_path),
            category_column: file.category_column.unwrap_or(defaults.category_column),
            range_column: file.range_column.unwrap_or(defaults.range_column),
            preview_rows: file.preview_rows,
        }
    }

    /// Build the configuration from the command line, reading the config
    /// file named by `--config`, or the default file if it exists.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load_from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                FileConfig::load_from_file(DEFAULT_CONFIG_FILE)?
            }
            None => FileConfig::default(),
        };
        Ok(Self::resolve(cli, file))
    }
}

/// Initialise `env_logger`.  `RUST_LOG` still wins when set.
pub fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();

    log::debug!("Logger initialized with level: {level:?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("cars-dashboard").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_without_anything() {
        let config = DashboardConfig::resolve(&cli(&[]), FileConfig::default());
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.cleaned_path, PathBuf::from("Cars_cleaned.csv"));
    }

    #[test]
    fn cli_overrides_file() {
        let file = FileConfig {
            raw_path: Some("from_file_raw.csv".into()),
            cleaned_path: Some("from_file_clean.csv".into()),
            range_column: Some("Model_Year".into()),
            ..Default::default()
        };
        let config = DashboardConfig::resolve(&cli(&["--cleaned", "cli.csv"]), file);
        assert_eq!(config.raw_path, PathBuf::from("from_file_raw.csv"));
        assert_eq!(config.cleaned_path, PathBuf::from("cli.csv"));
        assert_eq!(config.range_column, "Model_Year");
        assert_eq!(config.category_column, "Company_Name");
    }

    #[test]
    fn config_file_round_trip_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.toml");
        std::fs::write(&path, "cleaned_path = \"data/clean.csv\"\npreview_rows = 50\n").unwrap();

        let config = DashboardConfig::from_cli(&cli(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(config.cleaned_path, PathBuf::from("data/clean.csv"));
        assert_eq!(config.preview_rows, Some(50));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dash.toml");
        std::fs::write(&path, "colour = \"red\"\n").unwrap();
        assert!(FileConfig::load_from_file(&path).is_err());
    }
}
