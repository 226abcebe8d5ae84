mod config;
mod error;
mod report;
mod routes;
mod storage;

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use config::{Command, Config};
use error::AppResult;
use routes::{builder, export};

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging; RUST_LOG takes precedence over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str().to_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> AppResult<()> {
    match &config.command {
        Command::Parse { input, output, .. } => {
            tracing::info!("Parsing routing dump {}", input.display());
            let table = builder::read_table(BufReader::new(File::open(input)?))?;
            if table.is_empty() {
                tracing::warn!("No routes found in {}", input.display());
            }

            let mut writer = BufWriter::new(File::create(output)?);
            export::write_json(&mut writer, &table, config.pretty_json)?;
            writer.flush()?;
            tracing::info!("Routing table written to {}", output.display());
        }
        Command::Store {
            input,
            database,
            no_print,
        } => {
            let table = export::read_json(BufReader::new(File::open(input)?))?;
            let mut conn = storage::open(database)?;
            storage::save(&mut conn, &table)?;
            if !no_print {
                print_report(&conn, config.collapse_repeated)?;
            }
        }
        Command::Show { database } => {
            let conn = storage::open(database)?;
            print_report(&conn, config.collapse_repeated)?;
        }
    }
    Ok(())
}

fn print_report(conn: &rusqlite::Connection, collapse_repeated: bool) -> AppResult<()> {
    let rows = storage::load_destinations(conn)?;
    let stdout = io::stdout();
    report::write_report(stdout.lock(), &rows, collapse_repeated)?;
    Ok(())
}
