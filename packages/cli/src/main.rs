#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI front end for the portcall table parsers.
//!
//! Takes text already extracted from a PDF (one file per page or table) and
//! prints one JSON object per parsed record to stdout, so extraction can be
//! tried out against a new source document before wiring it into a spider.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use portcall_pdf::{AlignedTable, ErosionTable, TableSchema};

#[derive(Parser)]
#[command(name = "portcall_cli", about = "PDF table extraction tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse overlapping-column text with a typed schema (erosion parser)
    Erode {
        /// Path to the extracted text file
        text: PathBuf,
        /// Path to a JSON table schema (columns, header stops, start side,
        /// strategy)
        #[arg(long)]
        schema: PathBuf,
        /// Decimal separator used by float columns
        #[arg(long, default_value = ",")]
        decimal_separator: char,
        /// Source name used in log messages (defaults to the text file name)
        #[arg(long)]
        source: Option<String>,
    },
    /// Parse position-aligned text using header word offsets
    Align {
        /// Path to the extracted text file
        text: PathBuf,
        /// Zero-based index of the header line
        #[arg(long, default_value = "0")]
        header_line: usize,
        /// Zero-based index of the first line after the table, if any
        #[arg(long)]
        end_line: Option<usize>,
        /// Assign words by raw distance only, ignoring each word's span
        #[arg(long)]
        no_smart_distance: bool,
        /// Keep the original case of header names in record keys
        #[arg(long)]
        keep_case: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Erode {
            text,
            schema,
            decimal_separator,
            source,
        } => {
            let schema_json = std::fs::read_to_string(&schema)?;
            let schema: TableSchema = serde_json::from_str(&schema_json)?;
            let content = std::fs::read_to_string(&text)?;

            let source = source.unwrap_or_else(|| {
                text.file_name().map_or_else(
                    || text.display().to_string(),
                    |name| name.to_string_lossy().into_owned(),
                )
            });
            let table = ErosionTable::new(schema)?
                .with_decimal_separator(decimal_separator)
                .with_source(&source);

            let mut count = 0usize;
            for record in table.parse(&content)? {
                println!("{}", serde_json::to_string(&record)?);
                count += 1;
            }
            log::info!("Extracted {count} records from {source}");
        }
        Commands::Align {
            text,
            header_line,
            end_line,
            no_smart_distance,
            keep_case,
        } => {
            let content = std::fs::read_to_string(&text)?;
            let table = AlignedTable::with_bounds(&content, header_line, end_line);

            let mut count = 0usize;
            for record in table.parse_with(!no_smart_distance, !keep_case) {
                println!("{}", serde_json::to_string(&record)?);
                count += 1;
            }
            log::info!("Extracted {count} records from {}", text.display());
        }
    }

    Ok(())
}
