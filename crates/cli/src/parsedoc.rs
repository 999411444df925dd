//! parsedoc - Template-driven structured extraction
//!
//! Applies a parsing template to a normalized document (see `dumppages`)
//! and writes the extracted forms and tables as JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser as ClapParser};
use plantilla_core::model::DocumentData;
use plantilla_core::parser::Parser;
use plantilla_core::source::OcrEngine;
use plantilla_core::template::{ExtractionMethod, Template};

mod images;
mod ocr;

use ocr::TesseractOcr;

/// Apply a parsing template to a normalized document.
#[derive(ClapParser, Debug)]
#[command(name = "parsedoc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the template JSON file
    template: PathBuf,

    /// Path to the normalized document JSON file
    data: PathBuf,

    /// Directory with one rendered page image per page; required for OCR
    /// templates
    #[arg(short = 'i', long = "images-dir")]
    images_dir: Option<PathBuf>,

    /// Language passed to tesseract for OCR templates
    #[arg(short = 'l', long)]
    lang: Option<String>,

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

    let template_json = std::fs::read_to_string(&args.template)
        .with_context(|| format!("reading template {}", args.template.display()))?;
    let template =
        Template::from_json(&template_json).context("loading template")?;

    let data_json = std::fs::read_to_string(&args.data)
        .with_context(|| format!("reading document data {}", args.data.display()))?;
    let data: DocumentData =
        serde_json::from_str(&data_json).context("parsing document data JSON")?;

    let page_images = match &args.images_dir {
        Some(dir) => images::load_page_images(dir)?,
        None => Vec::new(),
    };

    let engine;
    let parser = if template.extraction_method == ExtractionMethod::Ocr {
        if args.images_dir.is_none() {
            bail!("OCR template needs rendered page images; pass --images-dir");
        }
        engine = match &args.lang {
            Some(lang) => TesseractOcr::with_lang(lang),
            None => TesseractOcr::new(),
        };
        if !engine.is_available() {
            bail!("OCR template needs tesseract, which was not found on this system");
        }
        Parser::with_ocr(&engine)
    } else {
        Parser::new()
    };

    let output_document = parser.parse(&template, &data, &page_images)?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&output_document)?
    } else {
        output_document.to_json()?
    };

    let mut output = open_output(&args.outfile)?;
    writeln!(output, "{json}")?;
    output.flush()?;
    Ok(())
}
