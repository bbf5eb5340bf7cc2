//! hotlru-replay - drive an LRU cache from a command trace

mod command;
mod config;
mod handler;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hotlru::SharedCache;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crate::config::ReplayConfig;
use crate::handler::{replay, CommandHandler};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Cache capacity (number of entries); overrides the config file
    #[arg(short, long)]
    capacity: Option<usize>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Trace file to replay (reads stdin when omitted)
    #[arg(short, long)]
    trace: Option<PathBuf>,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,

    /// Only print the final report
    #[arg(short, long)]
    quiet: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter(
            std::env::var("RUST_LOG").ok().as_deref(),
            args.verbose,
        ))
        .init();

    let mut config = match &args.config {
        Some(path) => ReplayConfig::load(path)?,
        None => ReplayConfig::default(),
    };
    config.apply_overrides(args.capacity, args.json);

    info!("Starting hotlru-replay v{}", env!("CARGO_PKG_VERSION"));
    info!("Cache capacity: {}", config.cache.capacity);

    let mut handler = CommandHandler::new(build_cache(&config)?);

    let input: Box<dyn BufRead> = match &args.trace {
        Some(path) => {
            info!("Replaying trace {}", path.display());
            let file = File::open(path)
                .with_context(|| format!("failed to open trace {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let quiet = !config.echo_replies(args.quiet);
    let summary = replay(&mut handler, input, &mut out, quiet)?;

    if config.report.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(out, "{}", summary)?;
    }

    Ok(())
}

/// `RUST_LOG` wins when set and valid; otherwise `info`, or `debug` with
/// `--verbose`
fn env_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let fallback = if verbose { Level::DEBUG } else { Level::INFO };
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => EnvFilter::try_new(directives)
            .unwrap_or_else(|_| EnvFilter::new(fallback.as_str())),
        _ => EnvFilter::new(fallback.as_str()),
    }
}

fn build_cache(config: &ReplayConfig) -> Result<SharedCache<String, String>> {
    SharedCache::new(config.cache.capacity).context("failed to create cache")
}
