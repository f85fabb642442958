//! # pricelist2xlsx
//!
//! Convert wholesale wine price-list PDFs into structured XLSX spreadsheets.
//!
//! ## Why this crate?
//!
//! Importers publish their price lists as print-oriented PDFs: region
//! banners, producer headers, then one line per wine with the code, name,
//! vintage, pack format, and case price all run together. Re-keying those
//! into a spreadsheet is slow and error-prone. This crate reads the text
//! layer via pdfium and recovers the table by classifying each line from
//! its shape alone — no coordinates, no templates — so a reformatted list
//! still parses as long as the line conventions hold.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    validate path and %PDF magic
//!  ├─ 2. Text     per-page text layer via pdfium
//!  ├─ 3. Segment  classify lines, carry producer/region context
//!  ├─ 4. Fields   price, vintage, pack size, category per product line
//!  └─ 5. Output   records + stats, optionally written as XLSX
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pricelist2xlsx::{convert_to_file, ConversionConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let stats = convert_to_file("january.pdf", "january_converted.xlsx", &config)?;
//!     eprintln!(
//!         "{} records from {} pages",
//!         stats.records_extracted, stats.parsed_pages
//!     );
//!     Ok(())
//! }
//! ```
//!
//! Already have the page text? [`parse_pages`] runs the parser without
//! touching pdfium at all.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pricelist2xlsx` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pricelist2xlsx = { version = "0.3", default-features = false }
//! ```
//!
//! ## Output Columns
//!
//! | # | Column | Source |
//! |---|--------|--------|
//! | 1 | Item Code | first token of the product line, verbatim |
//! | 2 | Producer | most recent producer header (placeholder if none) |
//! | 3 | Product Name | tokens between code and price, case-count annotation stripped |
//! | 4 | Vintage | first `20xx` or `NV` in the name, default `NV` |
//! | 5 | Pack Size | `N/VVVml` pattern in the name, default 12 |
//! | 6 | Bottle Size (ml) | same pattern, litres normalised to ml, default 750 |
//! | 7 | Product Type | keyword category (Red Wine, Rosé, Cider, …) |
//! | 8 | FOB Case Price | numeric value of the `$…/cs` token |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, PageSelection};
pub use convert::{convert, convert_from_bytes, convert_to_file, inspect, parse_pages};
pub use error::PriceListError;
pub use output::{Category, ConversionOutput, ConversionStats, DocumentMetadata, ProductRecord};
pub use pipeline::writer::default_output_path;
