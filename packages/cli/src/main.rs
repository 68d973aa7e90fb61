#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the UNICO order extractor.
//!
//! ```text
//! unico convert <order.pdf> [-o out.xlsx] [--config extractor.toml] [--style style.toml]
//! unico inspect <order.pdf> [--rows 20]
//! unico verify <out.xlsx> [--rows 5]
//! unico serve
//! ```
//!
//! Logging is controlled with `RUST_LOG`.

mod report;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use unico_extract::ExtractorConfig;
use unico_pdf::Document;
use unico_xlsx::StyleSpec;

#[derive(Parser)]
#[command(name = "unico", about = "Convert UNICO purchase-order PDFs to spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a purchase order and write the spreadsheet
    Convert {
        /// Purchase-order PDF
        input: PathBuf,
        /// Output spreadsheet (defaults to the input name with `.xlsx`)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Extractor TOML configuration
        #[arg(long)]
        config: Option<PathBuf>,
        /// Spreadsheet style TOML configuration
        #[arg(long)]
        style: Option<PathBuf>,
    },
    /// Show the text and detected table rows of every page
    Inspect {
        /// Purchase-order PDF
        input: PathBuf,
        /// Maximum table rows shown per page
        #[arg(long, default_value = "20")]
        rows: usize,
        /// Extractor TOML configuration
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the titles and first rows of a rendered spreadsheet
    Verify {
        /// Spreadsheet written by `convert` or the server
        input: PathBuf,
        /// Maximum data rows shown
        #[arg(long, default_value = "5")]
        rows: usize,
    },
    /// Start the HTTP server
    Serve,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            style,
        } => {
            let config = ExtractorConfig::resolve(config.as_deref())?;
            let style = style.map_or_else(|| Ok(StyleSpec::default()), StyleSpec::load)?;
            let output = output.unwrap_or_else(|| input.with_extension("xlsx"));
            log::debug!("Converting with {config:?}");

            let extraction = unico_extract::extract_pdf(&input, &config)?;
            unico_xlsx::write_workbook(&output, &extraction.titles(), &extraction.rows, &style)?;

            println!(
                "Extracted {} line items from {} into {}",
                extraction.len(),
                input.display(),
                output.display()
            );
        }
        Commands::Inspect {
            input,
            rows,
            config,
        } => {
            let config = ExtractorConfig::resolve(config.as_deref())?;
            inspect(&input, rows, &config)?;
        }
        Commands::Verify { input, rows } => {
            let contents = unico_xlsx::read_workbook(&input)?;

            println!("Sheet: {}", contents.sheet_name);
            println!("{} columns, {} data rows", contents.titles.len(), contents.rows.len());
            println!();
            println!("{}", report::format_titles(&contents.titles));
            println!();
            for (i, row) in contents.rows.iter().take(rows).enumerate() {
                println!("Row {}: {}", i + 1, report::format_values(row));
            }
        }
        Commands::Serve => {
            actix_web::rt::System::new().block_on(unico_server::run_server())?;
        }
    }

    Ok(())
}

fn inspect(
    input: &Path,
    max_rows: usize,
    config: &ExtractorConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = std::fs::read(input)?;
    let document = Document::from_bytes_with(&bytes, config.min_table_cells)?;

    println!("{}: {} pages", input.display(), document.page_count());

    for (index, page) in document.pages().iter().enumerate() {
        println!();
        println!("=== Page {} ===", index + 1);
        println!(
            "{}",
            report::preview(&page.text, report::TEXT_PREVIEW_CHARS)
        );

        let Some(table) = &page.table else {
            println!("(no table detected)");
            continue;
        };

        println!(
            "--- {} table rows, up to {} columns ---",
            table.rows.len(),
            table.column_count()
        );
        for row in table.rows.iter().take(max_rows) {
            let marker = if unico_extract::classify::classify_row(row, config).is_some() {
                '*'
            } else {
                ' '
            };
            println!("{marker} {}", report::format_cells(row));
        }
    }

    let extraction = unico_extract::extract_document(&document, config);
    println!();
    println!("Header: {:?}", extraction.header);
    println!("Line items (marked *): {}", extraction.len());

    Ok(())
}
