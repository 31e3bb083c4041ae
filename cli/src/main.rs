use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fleetform_kernel::convert::convert;
use fleetform_kernel::emit::{EmitConfig, StreamErrorPolicy};

/// Fleetform CLI
#[derive(Parser, Debug)]
#[command(name = "fleetform")]
#[command(about = "Convert a Fleet integration policy JSON into a Terraform resource", long_about = None)]
struct Cli {
    /// Path to integration policy JSON (reads stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Path to emitter config JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the declaration here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Override the Terraform resource type
    #[arg(long)]
    resource_type: Option<String>,

    /// Fail instead of skipping streams that cannot be encoded
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // ----------------------------
    // Load config
    // ----------------------------
    let mut config = if let Some(path) = &cli.config {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str::<EmitConfig>(&data)
            .with_context(|| format!("parsing config {}", path.display()))?
    } else {
        EmitConfig::default()
    };
    if let Some(resource_type) = cli.resource_type {
        config.resource_type = resource_type;
    }
    if cli.strict {
        config.stream_errors = StreamErrorPolicy::Fail;
    }

    // ----------------------------
    // Load policy
    // ----------------------------
    let raw = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading policy {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading policy from stdin")?;
            buf
        }
    };

    // ----------------------------
    // Convert
    // ----------------------------
    let emission = convert(&raw, &config)?;

    if !emission.is_complete() {
        tracing::warn!(
            skipped = emission.skipped.len(),
            "some streams were left out of the declaration"
        );
    }

    // ----------------------------
    // Output
    // ----------------------------
    match &cli.output {
        Some(path) => fs::write(path, &emission.text)
            .with_context(|| format!("writing {}", path.display()))?,
        None => print!("{}", emission.text),
    }

    Ok(())
}
