//! pcapdns CLI entry point.

use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pcapdns::analyze::DnsAnalyzer;
use pcapdns::cli::Args;

fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    let analyzer = DnsAnalyzer::with_config(args.amplification_config());
    let report = analyzer
        .analyze_file(&args.file)
        .with_context(|| format!("failed to analyze capture: {}", args.file.display()))?;

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create report file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            report.write_json(&mut writer, args.pretty)?;
        }
        None => {
            let mut stdout = io::stdout();
            report.write_json(&mut stdout, args.pretty)?;
        }
    }

    Ok(())
}
