//! CLI for the ping flattener.
//!
//! Reads newline-delimited JSON records from a file or stdin and writes one
//! CSV row per record to stdout. Records that fail to parse are skipped
//! with a warning.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use tracing::warn;

use skylift_flatten::{Dimensions, flatten, to_csv_line};

/// Flatten device ping records into CSV rows.
#[derive(Parser)]
#[command(name = "skylift-flatten")]
#[command(about = "Flatten device ping records into CSV rows")]
#[command(version)]
struct Cli {
    /// Submission dimensions:
    /// reason,appName,updateChannel,appVersion,appBuildId,submissionDate
    #[arg(short, long)]
    dimensions: String,

    /// Input file of newline-delimited JSON records; stdin when omitted.
    input: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(dimensions) = Dimensions::parse(&cli.dimensions) else {
        bail!("--dimensions needs exactly six comma-separated values");
    };

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut skipped = 0usize;

    for (line_number, line) in reader.lines().enumerate() {
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str(&line) {
            Ok(record) => {
                let row = flatten(&dimensions, &record);
                writeln!(out, "{}", to_csv_line(&row)).context("writing output")?;
            }
            Err(error) => {
                skipped += 1;
                warn!(line = line_number + 1, %error, "skipping unparseable record");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, "some records could not be parsed");
    }
    Ok(())
}
