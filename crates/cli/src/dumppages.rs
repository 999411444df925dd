//! dumppages - Normalize raw page geometry for template parsing
//!
//! Reads a raw geometry dump (words and drawn lines per page, as emitted
//! by the upstream PDF extractor) together with the rendered page images,
//! and writes the normalized document data consumed by `parsedoc`.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use plantilla_core::normalize::normalize_document;
use plantilla_core::source::RawDocument;

mod images;

/// Normalize raw page geometry against rendered page images.
#[derive(Parser, Debug)]
#[command(name = "dumppages")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the raw geometry JSON file
    raw: PathBuf,

    /// Directory with one rendered page image per page, in file name order
    #[arg(short = 'i', long = "images-dir")]
    images_dir: PathBuf,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Pretty-print the output JSON
    #[arg(long, action = ArgAction::SetTrue)]
    pretty: bool,

    /// Use debug logging level
    #[arg(short = 'v', long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn open_output(outfile: &str) -> Result<Box<dyn Write>> {
    if outfile == "-" {
        Ok(Box::new(BufWriter::new(io::stdout())))
    } else {
        let file = File::create(outfile)
            .with_context(|| format!("creating output file {outfile}"))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let raw_json = std::fs::read_to_string(&args.raw)
        .with_context(|| format!("reading raw geometry {}", args.raw.display()))?;
    let raw: RawDocument =
        serde_json::from_str(&raw_json).context("parsing raw geometry JSON")?;
    let page_images = images::load_page_images(&args.images_dir)?;

    let document = normalize_document(&raw, &page_images)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    let mut output = open_output(&args.outfile)?;
    writeln!(output, "{json}")?;
    output.flush()?;
    Ok(())
}
