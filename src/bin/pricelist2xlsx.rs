//! CLI binary for pricelist2xlsx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pricelist2xlsx::{
    convert, convert_to_file, default_output_path, inspect, ConversionConfig, PageSelection,
};
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes january_converted.xlsx next to the input)
  pricelist2xlsx january.pdf

  # Choose the output file
  pricelist2xlsx january.pdf -o out/january.xlsx

  # Parse a page subset
  pricelist2xlsx --pages 2-14 january.pdf

  # Full extraction result as JSON on stdout (no workbook written)
  pricelist2xlsx --json january.pdf > january.json

  # Inspect PDF metadata, no parsing
  pricelist2xlsx --inspect-only january.pdf

  # A list with a different code prefix and an extra page footer
  pricelist2xlsx --code-prefix VT --skip-marker "Vintage Trading Co" list.pdf

OUTPUT COLUMNS:
  Item Code | Producer | Product Name | Vintage | Pack Size |
  Bottle Size (ml) | Product Type | FOB Case Price

LINE CONVENTIONS (defaults):
  product line     starts with the code prefix and carries a $…/cs price:
                     LD1234 Domaine Test Rouge 2021 (12) (12/750ml) $180.00/cs
  producer header  contains ", ":        Test Estate, Loire
  region banner    short all-caps line:  LOIRE

  Pack formats normalise litres to ml (6/1.5L = 6 × 1500 ml). Lines without
  a pack pattern default to 12 × 750 ml; names without a year default to NV.

ENVIRONMENT VARIABLES:
  PRICELIST_OUTPUT        Default output path
  PRICELIST_PAGES         Default page selection
  PRICELIST_PASSWORD      PDF user password
  PRICELIST_CODE_PREFIX   Product-code prefix (default LD)
  PRICELIST_SKIP_MARKERS  Comma-separated extra boilerplate markers
  PRICELIST_SHEET_NAME    Worksheet name (default "Price List")
  PDFIUM_LIB_PATH         Path to an existing libpdfium — skips auto-download
  PDFIUM_AUTO_CACHE_DIR   Override the default pdfium cache directory

SETUP:
  None. PDFium (~30 MB) is downloaded automatically on first run and cached
  locally; subsequent startups skip the download entirely. To use an
  existing pdfium copy: PDFIUM_LIB_PATH=/path/to/libpdfium pricelist2xlsx ...
"#;

/// Convert wine price-list PDFs to XLSX spreadsheets.
#[derive(Parser, Debug)]
#[command(
    name = "pricelist2xlsx",
    version,
    about = "Convert wine price-list PDFs to XLSX spreadsheets",
    long_about = "Extract structured product records (code, producer, name, vintage, pack \
format, category, case price) from print-oriented wholesale price-list PDFs and write them \
as an XLSX spreadsheet. Parsing works on the text layer alone: lines are classified by \
shape, so no template or page coordinates are needed.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the price-list PDF.
    input: PathBuf,

    /// Write the workbook here instead of `<input>_converted.xlsx`.
    #[arg(short, long, env = "PRICELIST_OUTPUT")]
    output: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PRICELIST_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PRICELIST_PASSWORD")]
    password: Option<String>,

    /// Product-code prefix identifying product lines.
    #[arg(long, env = "PRICELIST_CODE_PREFIX", default_value = "LD")]
    code_prefix: String,

    /// Extra boilerplate marker; lines containing it are discarded (repeatable).
    #[arg(
        long = "skip-marker",
        env = "PRICELIST_SKIP_MARKERS",
        value_delimiter = ','
    )]
    skip_marker: Vec<String>,

    /// Worksheet name in the output workbook.
    #[arg(long, env = "PRICELIST_SHEET_NAME")]
    sheet_name: Option<String>,

    /// Print the full extraction result as JSON to stdout (no workbook).
    #[arg(long, env = "PRICELIST_JSON")]
    json: bool,

    /// Print PDF metadata only, no parsing.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PRICELIST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PRICELIST_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The parse itself is near-instant, so the default stays at WARN and
    // the summary line carries the useful numbers. `-v` opens the firehose.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure PDFium engine is available ────────────────────────────────
    // On the very first run the shared library (~30 MB) is downloaded from
    // bblanchon/pdfium-binaries and cached. Subsequent startups skip this
    // block entirely (instant path check only).
    if !pdfium_auto::is_pdfium_cached() {
        if !cli.quiet {
            let dl_bar = ProgressBar::new(0);
            dl_bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            dl_bar.set_prefix("PDF engine");
            dl_bar.set_message("Connecting…");
            dl_bar.enable_steady_tick(Duration::from_millis(80));

            pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
                if let Some(t) = total {
                    if dl_bar.length().unwrap_or(0) != t {
                        dl_bar.set_length(t);
                    }
                }
                dl_bar.set_position(downloaded);
            }))
            .context("Failed to download PDFium engine")?;

            dl_bar.finish_with_message("ready ✓");
        } else {
            // Quiet mode: download silently; errors still propagate.
            pdfium_auto::ensure_pdfium_library(None)
                .context("Failed to download PDFium engine")?;
        }
    }

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta =
            inspect(&cli.input, cli.password.as_deref()).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input.display());
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            if let Some(ref v) = meta.pdf_version {
                println!("PDF Version:  {}", v);
            }
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
            if let Some(ref d) = meta.creation_date {
                println!("Created:      {}", d);
            }
            if let Some(ref m) = meta.modification_date {
                println!("Modified:     {}", m);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if cli.json {
        let output = convert(&cli.input, &config)
            .context("Conversion failed")?
            .into_result()?;

        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialise output")?
        );

        if !cli.quiet {
            eprintln!(
                "{} {} records from {} pages  {}",
                green("✔"),
                bold(&output.stats.records_extracted.to_string()),
                output.stats.parsed_pages,
                dim(&format!("{}ms", output.stats.total_duration_ms)),
            );
        }
    } else {
        let output_path = cli
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&cli.input));

        let stats =
            convert_to_file(&cli.input, &output_path, &config).context("Conversion failed")?;

        if !cli.quiet {
            let tick = if stats.skipped_product_lines == 0 {
                green("✔")
            } else {
                cyan("⚠")
            };
            eprintln!(
                "{}  {} records from {} pages  {}  →  {}",
                tick,
                bold(&stats.records_extracted.to_string()),
                stats.parsed_pages,
                dim(&format!("{}ms", stats.total_duration_ms)),
                bold(&output_path.display().to_string()),
            );
            if stats.skipped_product_lines > 0 {
                eprintln!(
                    "   {} of {} product lines skipped (no parseable price)",
                    stats.skipped_product_lines, stats.product_lines
                );
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let pages = parse_page_selection(&cli.pages)?;

    let mut builder = ConversionConfig::builder()
        .code_prefix(cli.code_prefix.as_str())
        .pages(pages);

    for marker in &cli.skip_marker {
        builder = builder.skip_marker(marker.as_str());
    }
    if let Some(ref name) = cli.sheet_name {
        builder = builder.sheet_name(name.as_str());
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.as_str());
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_page_selection(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start
            .trim()
            .parse()
            .context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!(
                "Invalid page range '{}-{}': start must be <= end",
                start,
                end
            );
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}
