//! # reso-host - Runs RESO validation modules
//!
//! Loads a validation module compiled to WebAssembly, serves it a record
//! and its previous version through the `reso` host calls, and prints every
//! call the module makes back.
//!
//! ## Features
//! - Two-phase record transfer (`reso.data`, `reso.previous_data`)
//! - Field errors, warnings, required/visible flags and value overrides
//! - Fuel and memory limits per invocation
//! - TOML configuration with command-line overrides

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

mod config;
mod validators;

use config::{Config, ConfigError};
use validators::wasm::{WasmRuntime, WasmValidator};
use validators::{Execution, ExecutionStatus, HostCall, RecordPair, Validator};

/// Command line arguments; each one overrides the matching config setting
#[derive(Parser, Debug)]
#[command(name = "reso-host", version, about = "Run a RESO validation module against JSON records")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// The validation module in WebAssembly format
    #[arg(short, long, value_name = "FILE")]
    webassembly: Option<PathBuf>,

    /// The record being saved, as JSON
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// The previously persisted record, as JSON. Omit for new records.
    #[arg(short, long, value_name = "FILE")]
    previous_data: Option<PathBuf>,

    /// Instruction budget for the invocation
    #[arg(long)]
    fuel: Option<u64>,

    /// Use once for module diagnostics, twice for every host call
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    init_tracing(config.runtime.verbose);

    let (Some(module_path), Some(current_path)) = (&config.validator.path, &config.records.current)
    else {
        eprintln!("❌ A validation module and a record are required");
        std::process::exit(1);
    };

    let records = match RecordPair::from_files(current_path, config.records.previous.as_deref()) {
        Ok(records) => records,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    let validator = match WasmRuntime::new(&config.runtime)
        .map(Arc::new)
        .and_then(|runtime| WasmValidator::from_file(config.validator_name(), module_path, runtime))
    {
        Ok(validator) => validator,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    info!("▶️  Running validator '{}'", validator.name());

    let execution = match validator.validate(&records).await {
        Ok(execution) => execution,
        Err(e) => {
            error!("Validator '{}' failed: {}", validator.name(), e);
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    print_execution(&execution, config.runtime.verbose);

    debug!("Validation program finished");
    if execution.is_aborted() {
        std::process::exit(5);
    }
}

/// Build the configuration from the optional file plus command-line overrides
fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    if let Some(path) = &args.webassembly {
        config.validator.path = Some(path.clone());
    }
    if let Some(path) = &args.data {
        config.records.current = Some(path.clone());
    }
    if let Some(path) = &args.previous_data {
        config.records.previous = Some(path.clone());
    }
    if let Some(fuel) = args.fuel {
        config.runtime.fuel = fuel;
    }
    if args.verbose > 0 {
        config.runtime.verbose = args.verbose;
    }

    config.validate()?;
    Ok(config)
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_execution(execution: &Execution, verbose: u8) {
    for call in &execution.report.calls {
        if matches!(call, HostCall::Diagnostic { .. }) && verbose == 0 {
            continue;
        }
        println!("{}", call);
    }

    match &execution.status {
        ExecutionStatus::Aborted(reason) => println!("💥 Validation aborted: {}", reason),
        ExecutionStatus::Completed if execution.report.passed() => {
            println!("✅ Validation passed")
        }
        ExecutionStatus::Completed => println!(
            "❌ Validation failed with {} error(s)",
            execution.report.errors().len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_arguments_override_config_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[validator]\npath = \"from-file.wasm\"\n\
             [records]\ncurrent = \"listing.json\"\n\
             [runtime]\nfuel = 10"
        )
        .unwrap();

        let config_path = file.path().to_string_lossy().to_string();
        let args = Args::parse_from([
            "reso-host",
            "--config",
            config_path.as_str(),
            "--webassembly",
            "from-cli.wasm",
            "--fuel",
            "20",
            "-vv",
        ]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.validator.path, Some(PathBuf::from("from-cli.wasm")));
        assert_eq!(config.records.current, Some(PathBuf::from("listing.json")));
        assert_eq!(config.runtime.fuel, 20);
        assert_eq!(config.runtime.verbose, 2);
    }

    #[test]
    fn test_arguments_alone_are_enough() {
        let args = Args::parse_from(["reso-host", "-w", "listing.wasm", "-d", "listing.json"]);
        let config = load_config(&args).unwrap();

        assert_eq!(config.validator_name(), "listing");
        assert!(config.records.previous.is_none());
    }

    #[test]
    fn test_missing_record_is_rejected() {
        let args = Args::parse_from(["reso-host", "-w", "listing.wasm"]);
        assert!(matches!(load_config(&args), Err(ConfigError::Missing("records.current"))));
    }
}
