//! CLI entry point for suite_host
//!
//! The host library is normally linked into a plug-in pipeline; this binary
//! exposes its offline tooling:
//! - Inspecting persisted descriptor files (settings or scripting snapshots)
//! - Listing the suites and versions the host offers
//! - Printing the effective configuration
//!
//! # Usage
//!
//! ```bash
//! suite_host inspect settings/com.example.blur.desc
//! suite_host suites --json
//! SUITE_HOST_LOGGING__LEVEL=debug suite_host config
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use suite_host::config::HostConfig;
use suite_host::{persist, tracing_setup};
use tracing::debug;

#[derive(Parser)]
#[command(name = "suite_host")]
#[command(about = "Plug-in callback suite host tooling", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/suite_host.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a persisted descriptor and print its contents
    Inspect {
        /// Path to a persisted descriptor file
        file: PathBuf,

        /// Print the value tree as JSON instead of an outline
        #[arg(long)]
        json: bool,
    },

    /// List offered suites and versions
    Suites {
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => HostConfig::load_from(path),
        None => HostConfig::load(),
    }
    .context("loading configuration")?;
    config.validate()?;
    tracing_setup::init_from_config(&config)?;

    match cli.command {
        Commands::Inspect { file, json } => inspect(file, json),
        Commands::Suites { json } => list_suites(json),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

fn inspect(path: PathBuf, json: bool) -> Result<()> {
    let bytes = fs::read(&path).with_context(|| format!("reading {}", path.display()))?;
    let descriptor =
        persist::decode(&bytes).with_context(|| format!("decoding {}", path.display()))?;
    debug!(path = %path.display(), keys = descriptor.len(), "descriptor decoded");

    if json {
        println!("{}", serde_json::to_string_pretty(&descriptor)?);
    } else {
        print!("{}", descriptor.outline());
    }
    Ok(())
}

fn list_suites(json: bool) -> Result<()> {
    let suites = suite_api::offered_suites();
    if json {
        println!("{}", serde_json::to_string_pretty(&suites)?);
        return Ok(());
    }
    for info in suites {
        let versions: Vec<String> = info.versions.iter().map(i32::to_string).collect();
        println!("{:<42} {}", info.name, versions.join(", "));
    }
    Ok(())
}
