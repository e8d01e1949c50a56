//! Command line tool for extracting row images from Excel catalogs.
//!
//! # Usage
//!
//! Write every image to a directory:
//! ```sh
//! sheetpix catalog.xlsx -o images/
//! ```
//!
//! Only report what would be extracted, as JSON:
//! ```sh
//! sheetpix catalog.xlsx --json
//! ```

use clap::Parser;
use sheetpix::images::{DirectorySink, ExtractOptions, ExtractionSummary, ImageExtractor};
use std::path::PathBuf;
use std::process;

/// Extract the primary and supplier image of every row in an Excel catalog
#[derive(Parser, Debug)]
#[command(name = "sheetpix", version, about)]
struct Args {
    /// Input spreadsheet (.xlsx)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Directory the images are written to; nothing is written if omitted
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Zero-based column holding the row keys
    #[arg(long, value_name = "N", default_value_t = 0)]
    key_column: u32,

    /// Number of header rows above the first data row
    #[arg(long, value_name = "N", default_value_t = 1)]
    header_rows: u32,

    /// Read media on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Treat a workbook without pictures as empty instead of failing
    #[arg(long)]
    allow_no_drawing: bool,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match run(&args) {
        Ok(summary) => report(&args, &summary),
        Err(e) => {
            eprintln!("Error: {}: {}", args.input.display(), e);
            process::exit(1);
        },
    }
}

fn run(args: &Args) -> Result<ExtractionSummary, Box<dyn std::error::Error>> {
    let data = std::fs::read(&args.input)?;
    let options = ExtractOptions::new()
        .with_key_column(args.key_column)
        .with_header_rows(args.header_rows)
        .with_parallel(!args.sequential)
        .with_missing_drawing_as_empty(args.allow_no_drawing);
    let extractor = ImageExtractor::new(options);

    let summary = match &args.output {
        Some(dir) => {
            let mut sink = DirectorySink::create(dir)?;
            extractor.extract_each(&data, |image| sink.write(&image).map(|_| ()))?
        },
        None => extractor.extract_each(&data, |_| Ok(()))?,
    };
    Ok(summary)
}

fn report(args: &Args, summary: &ExtractionSummary) {
    if args.json {
        match serde_json::to_string_pretty(summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            },
        }
        return;
    }

    println!(
        "{}: {} primary, {} supplier ({} images) for {} rows",
        args.input.display(),
        summary.primary_count,
        summary.supplier_count,
        summary.total,
        summary.row_key_count
    );
    if let Some(dir) = &args.output {
        println!("Written to {}", dir.display());
    }
    for diagnostic in &summary.diagnostics {
        println!("  skipped: {}", diagnostic);
    }
}
