// Configuration management for the routing dump tool
// Supports CLI arguments, config file (TOML), and environment variables

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Routing dump tool - parse routing table dumps, store them in SQLite and print them
#[derive(Parser, Debug, Clone)]
#[command(name = "route-dump")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Logging level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, env = "ROUTE_DUMP_LOG")]
    pub log_level: Option<String>,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ROUTE_DUMP_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Parse a routing table dump and save it as JSON
    Parse {
        /// File with routing table dump
        #[arg(value_name = "INFILE")]
        input: PathBuf,

        /// Output JSON file to store results
        #[arg(value_name = "OUTFILE")]
        output: PathBuf,

        /// Write JSON on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Save a JSON routing table to SQLite and print it
    Store {
        /// JSON file with routing table
        #[arg(value_name = "INFILE")]
        input: PathBuf,

        /// SQLite database file
        #[arg(value_name = "DATABASE")]
        database: PathBuf,

        /// Don't print the table after saving
        #[arg(long)]
        no_print: bool,
    },

    /// Print the routes stored in a SQLite database
    Show {
        /// SQLite database file
        #[arg(value_name = "DATABASE")]
        database: PathBuf,
    },
}

/// Configuration file structure (TOML format)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigFile {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// JSON export settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Indent the JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Blank out a destination that repeats the previous row
    #[serde(default = "default_true")]
    pub collapse_repeated: bool,
}

// Default value functions
fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            pretty: default_true(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            collapse_repeated: default_true(),
        }
    }
}

/// Merged configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    pub command: Command,
    pub log_level: Level,
    pub pretty_json: bool,
    pub collapse_repeated: bool,
}

const DEFAULT_CONFIG_PATHS: [&str; 2] = ["route-dump.toml", "config.toml"];

impl Config {
    /// Load configuration from all sources (CLI args, config file, defaults)
    /// Priority: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> anyhow::Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(cli_args: CliArgs) -> anyhow::Result<Self> {
        let config_file = match &cli_args.config {
            Some(config_path) => read_config_file(config_path)?,
            None => {
                let mut loaded_config = None;
                for path in DEFAULT_CONFIG_PATHS.iter().map(Path::new) {
                    if path.exists() {
                        loaded_config = Some(read_config_file(path)?);
                        break;
                    }
                }
                loaded_config.unwrap_or_default()
            }
        };

        let level = cli_args
            .log_level
            .as_deref()
            .unwrap_or(config_file.logging.level.as_str());
        let log_level = parse_log_level(level)?;

        let pretty_json = match &cli_args.command {
            Command::Parse { compact, .. } => !compact && config_file.export.pretty,
            _ => config_file.export.pretty,
        };

        Ok(Config {
            command: cli_args.command,
            log_level,
            pretty_json,
            collapse_repeated: config_file.report.collapse_repeated,
        })
    }
}

fn read_config_file(path: &Path) -> anyhow::Result<ConfigFile> {
    tracing::info!("Loading configuration from: {}", path.display());
    let config_content = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<ConfigFile>(&config_content)?)
}

fn parse_log_level(level_str: &str) -> anyhow::Result<Level> {
    match level_str.to_lowercase().as_str() {
        "error" => Ok(Level::ERROR),
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(anyhow::anyhow!("Invalid log level: {}", level_str)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.logging.level, "info");
        assert!(config.export.pretty);
        assert!(config.report.collapse_repeated);
    }

    #[test]
    fn test_partial_config_file() {
        let config: ConfigFile = toml::from_str("[export]\npretty = false\n").unwrap();
        assert!(!config.export.pretty);
        assert_eq!(config.logging.level, "info");
        assert!(config.report.collapse_repeated);
    }

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("info"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("DEBUG"), Ok(Level::DEBUG)));
        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_cli_parse_command() {
        let args = CliArgs::try_parse_from(["route-dump", "parse", "dump.log", "routes.json", "--compact"])
            .unwrap();
        assert_eq!(
            args.command,
            Command::Parse {
                input: PathBuf::from("dump.log"),
                output: PathBuf::from("routes.json"),
                compact: true,
            }
        );
    }

    #[test]
    fn test_config_file_and_cli_merge() {
        let file = write_config("[logging]\nlevel = \"warn\"\n\n[report]\ncollapse_repeated = false\n");
        let path = file.path().to_str().unwrap();

        let args = CliArgs::try_parse_from(["route-dump", "--config", path, "show", "routes.db"]).unwrap();
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.log_level, Level::WARN);
        assert!(!config.collapse_repeated);
        assert!(config.pretty_json);

        let args = CliArgs::try_parse_from([
            "route-dump", "-c", path, "-l", "debug", "parse", "dump.log", "routes.json", "--compact",
        ])
        .unwrap();
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(!config.pretty_json);
    }

    #[test]
    fn test_bad_config_file() {
        let file = write_config("[logging]\nlevel = 3\n");
        let path = file.path().to_str().unwrap();

        let args = CliArgs::try_parse_from(["route-dump", "--config", path, "show", "routes.db"]).unwrap();
        assert!(Config::from_args(args).is_err());
    }
}
