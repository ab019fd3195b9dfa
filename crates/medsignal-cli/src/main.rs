//! medsignal — extract business signals from channel exports and dumps.

use std::path::PathBuf;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use medsignal_core::ExtractionConfig;
use medsignal_extract::Extractor;

mod commands;

fn print_help() {
    println!("medsignal — business signal extraction for channel exports");
    println!();
    println!("Usage: medsignal <command> <path>...");
    println!();
    println!("Paths may be JSON exports, CSV dumps, or directories holding them.");
    println!();
    println!("Commands:");
    println!("  extract <paths...>       Print extracted records as JSON lines");
    println!("  insights <paths...>      Print aggregate business insights");
    println!("  help                     Show this help");
    println!();
    println!("Environment:");
    println!("  MEDSIGNAL_CONFIG         JSON config file (overrides MEDSIGNAL_* variables)");
    println!("  RUST_LOG                 Log filter (default: info)");
}

fn load_config() -> anyhow::Result<ExtractionConfig> {
    match std::env::var("MEDSIGNAL_CONFIG") {
        Ok(path) => ExtractionConfig::from_json_file(&path)
            .with_context(|| format!("loading config from {}", path)),
        Err(_) => ExtractionConfig::from_env().context("reading MEDSIGNAL_* variables"),
    }
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");
    let files: Vec<PathBuf> = args.iter().skip(2).map(PathBuf::from).collect();

    match command {
        "extract" | "insights" if files.is_empty() => {
            eprintln!("Usage: medsignal {} <path>...", command);
            std::process::exit(2);
        }
        "extract" => {
            let extractor = Extractor::new(&load_config()?)?;
            let stdout = std::io::stdout();
            let summary = commands::extract(&extractor, &files, &mut stdout.lock())?;
            info!(
                "Extracted {} records from {} messages ({} skipped)",
                summary.extracted, summary.processed, summary.skipped_errors
            );
            eprintln!("{}", serde_json::to_string(&summary)?);
        }
        "insights" => {
            let extractor = Extractor::new(&load_config()?)?;
            let insights = commands::insights(&extractor, &files)?;
            println!("{}", serde_json::to_string_pretty(&insights)?);
        }
        "help" | "--help" | "-h" => print_help(),
        other => {
            eprintln!("Unknown command: {}", other);
            print_help();
            std::process::exit(2);
        }
    }

    Ok(())
}
