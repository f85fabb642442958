//! Output types: the product record, its category, document metadata,
//! per-run statistics, and the [`ConversionOutput`] container returned by
//! [`crate::convert::convert`].
//!
//! Everything here is plain serialisable data. `--json` on the CLI dumps a
//! whole [`ConversionOutput`]; the XLSX writer consumes only `records`.

use crate::error::PriceListError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Wine category inferred from keywords in the product name.
///
/// Serialises as the rendered label (the same string written to the
/// `Product Type` spreadsheet column), so JSON and XLSX outputs agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Sparkling Wine")]
    Sparkling,
    #[serde(rename = "Rosé")]
    Rose,
    #[serde(rename = "White Wine")]
    White,
    #[serde(rename = "Red Wine")]
    Red,
    #[serde(rename = "Fortified Wine")]
    Fortified,
    #[serde(rename = "Cider")]
    Cider,
    /// No keyword matched; rendered with the generic catch-all label.
    #[serde(rename = "Wine")]
    Unclassified,
}

impl Category {
    /// The label written to the `Product Type` column.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Sparkling => "Sparkling Wine",
            Category::Rose => "Rosé",
            Category::White => "White Wine",
            Category::Red => "Red Wine",
            Category::Fortified => "Fortified Wine",
            Category::Cider => "Cider",
            Category::Unclassified => "Wine",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One extracted product, immutable once constructed.
///
/// Field order matches the spreadsheet column order: Item Code, Producer,
/// Product Name, Vintage, Pack Size, Bottle Size (ml), Product Type,
/// FOB Case Price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Item code, taken verbatim from the first token of the product line.
    pub code: String,
    /// Producer from the most recent producer header, or the configured
    /// placeholder when none preceded this line.
    pub producer: String,
    /// Free-text product name. May retain embedded size or vintage
    /// fragments the cleanup pass does not strip.
    pub name: String,
    /// Four-digit year, or the non-vintage sentinel.
    pub vintage: String,
    /// Bottles per case.
    pub pack_size: u32,
    /// Bottle volume, normalised to milliliters.
    pub bottle_size_ml: u32,
    /// Inferred wine category.
    pub category: Category,
    /// FOB price per case. Always positive and finite.
    pub case_price: f64,
}

/// Document-level metadata read from the PDF info dictionary.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    /// Producing software (the PDF `Producer` info key — unrelated to the
    /// wine producers in the records).
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: Option<String>,
}

/// Counters and timings for one extraction run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Pages in the document (before page selection).
    pub total_pages: usize,
    /// Selected pages fed to the parser.
    pub parsed_pages: usize,
    /// Selected pages that yielded no extractable text.
    pub empty_pages: usize,
    /// Trimmed lines fed to the classifier.
    pub lines_seen: usize,
    /// Lines classified as product candidates.
    pub product_lines: usize,
    /// Product candidates the field extractor dropped.
    pub skipped_product_lines: usize,
    /// Producer headers encountered.
    pub producers_seen: usize,
    /// Region headers encountered (section banners excluded).
    pub regions_seen: usize,
    /// Records in the output.
    pub records_extracted: usize,
    /// Time spent in pdfium text extraction.
    pub extract_duration_ms: u64,
    /// Time spent segmenting and extracting fields.
    pub parse_duration_ms: u64,
    /// Wall-clock time for the whole run.
    pub total_duration_ms: u64,
}

/// Result of one extraction run.
///
/// `records` may be empty — an empty price list is an `Ok` at the core
/// level. Callers that treat emptiness as failure (the CLI does) convert
/// via [`ConversionOutput::into_result`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Extracted records, in document order.
    pub records: Vec<ProductRecord>,
    /// PDF metadata; `None` when parsing raw page text without a document.
    pub metadata: Option<DocumentMetadata>,
    /// Counters and timings.
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// Treat an empty record set as [`PriceListError::NoRecordsFound`].
    pub fn into_result(self) -> Result<Self, PriceListError> {
        if self.records.is_empty() {
            Err(PriceListError::NoRecordsFound {
                pages: self.stats.parsed_pages,
            })
        } else {
            Ok(self)
        }
    }
}
