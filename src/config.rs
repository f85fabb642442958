//! Configuration types for price-list extraction.
//!
//! All parsing behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. Keeping every knob in one struct
//! makes it trivial to share configs across documents, log them, and diff
//! two runs to understand why their outputs differ.
//!
//! The defaults encode the Louis/Dressner price-list convention (`LD`
//! product codes, `$…/cs` case prices, `Producer, Region` header lines).
//! Every surface cue the classifier relies on is a field here, so a layout
//! tweak in a future season's list is a config change, not a code change.

use crate::error::PriceListError;
use serde::{Deserialize, Serialize};

/// Configuration for a price-list extraction run.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pricelist2xlsx::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .code_prefix("LD")
///     .skip_marker("Price List")
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConversionConfig {
    /// Prefix identifying a product line. Default: `"LD"`.
    ///
    /// This is the single strongest surface cue in the document: every
    /// sellable item's line starts with its item code, and every item code
    /// starts with this prefix. The classifier checks it before any other
    /// heuristic, so a malformed product line can never be mistaken for a
    /// producer header just because it happens to contain a comma.
    pub code_prefix: String,

    /// Suffix marking the per-case price token. Default: `"/cs"`.
    ///
    /// The field extractor scans a product line's tokens for the first one
    /// containing this marker; everything between the code and that token
    /// is the product name. A line without it carries no price and is
    /// dropped.
    pub price_suffix: String,

    /// Currency symbol stripped from price tokens and used to veto
    /// header classification. Default: `'$'`.
    pub currency_symbol: char,

    /// Lines containing any of these markers are boilerplate (page
    /// headers/footers) and discarded before classification.
    /// Default: `["Price List"]`.
    pub boilerplate_markers: Vec<String>,

    /// All-caps section banners that look like region headers but are not
    /// (`NEW ARRIVALS` and friends). They are consumed without touching the
    /// current region. Comparison is against the whole trimmed line.
    pub section_labels: Vec<String>,

    /// Maximum length (in characters, exclusive) for a region header line.
    /// Default: 50.
    ///
    /// Region headers are short all-caps banners like `LOIRE` or
    /// `SOUTHWEST FRANCE`. Long all-caps lines are more likely shouting
    /// boilerplate than geography.
    pub region_max_chars: usize,

    /// Maximum length (in characters, exclusive) for a producer header
    /// line. Default: 100.
    pub producer_max_chars: usize,

    /// Bottles per case when a product name carries no pack annotation.
    /// Default: 12.
    pub default_pack_size: u32,

    /// Bottle volume in milliliters when a product name carries no pack
    /// annotation. Default: 750.
    pub default_bottle_size_ml: u32,

    /// Producer recorded for product lines with no preceding producer
    /// header. Default: `"Unknown Producer"`.
    pub default_producer: String,

    /// Vintage recorded when a product name carries no recognizable year.
    /// Default: `"NV"`.
    pub non_vintage_label: String,

    /// Worksheet name in the output workbook. Default: `"Price List"`.
    /// Excel limits sheet names to 31 characters and forbids
    /// `[ ] : * ? / \`.
    pub sheet_name: String,

    /// Page selection. Default: all pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            code_prefix: "LD".to_string(),
            price_suffix: "/cs".to_string(),
            currency_symbol: '$',
            boilerplate_markers: vec!["Price List".to_string()],
            section_labels: vec![
                "NEW ARRIVALS".to_string(),
                "SPECIAL PRICING".to_string(),
                "LAST CASES".to_string(),
            ],
            region_max_chars: 50,
            producer_max_chars: 100,
            default_pack_size: 12,
            default_bottle_size_ml: 750,
            default_producer: "Unknown Producer".to_string(),
            non_vintage_label: "NV".to_string(),
            sheet_name: "Price List".to_string(),
            pages: PageSelection::default(),
            password: None,
        }
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn code_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.code_prefix = prefix.into();
        self
    }

    pub fn price_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.config.price_suffix = suffix.into();
        self
    }

    pub fn currency_symbol(mut self, symbol: char) -> Self {
        self.config.currency_symbol = symbol;
        self
    }

    /// Replace the boilerplate marker list.
    pub fn boilerplate_markers(mut self, markers: Vec<String>) -> Self {
        self.config.boilerplate_markers = markers;
        self
    }

    /// Append one boilerplate marker (repeatable; mirrors `--skip-marker`).
    pub fn skip_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.boilerplate_markers.push(marker.into());
        self
    }

    pub fn section_labels(mut self, labels: Vec<String>) -> Self {
        self.config.section_labels = labels;
        self
    }

    pub fn region_max_chars(mut self, n: usize) -> Self {
        self.config.region_max_chars = n.max(1);
        self
    }

    pub fn producer_max_chars(mut self, n: usize) -> Self {
        self.config.producer_max_chars = n.max(1);
        self
    }

    pub fn default_pack_size(mut self, n: u32) -> Self {
        self.config.default_pack_size = n.max(1);
        self
    }

    pub fn default_bottle_size_ml(mut self, ml: u32) -> Self {
        self.config.default_bottle_size_ml = ml.max(1);
        self
    }

    pub fn default_producer(mut self, producer: impl Into<String>) -> Self {
        self.config.default_producer = producer.into();
        self
    }

    pub fn non_vintage_label(mut self, label: impl Into<String>) -> Self {
        self.config.non_vintage_label = label.into();
        self
    }

    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.config.sheet_name = name.into();
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, PriceListError> {
        let c = &self.config;
        if c.code_prefix.is_empty() {
            return Err(PriceListError::InvalidConfig(
                "Product-code prefix must not be empty (it would classify every line as a product)"
                    .into(),
            ));
        }
        if c.price_suffix.is_empty() || c.price_suffix.contains(char::is_whitespace) {
            return Err(PriceListError::InvalidConfig(format!(
                "Price suffix must be a non-empty token fragment without whitespace, got '{}'",
                c.price_suffix
            )));
        }
        if c.sheet_name.is_empty() || c.sheet_name.chars().count() > 31 {
            return Err(PriceListError::InvalidConfig(format!(
                "Sheet name must be 1–31 characters, got '{}'",
                c.sheet_name
            )));
        }
        if c.sheet_name.contains(['[', ']', ':', '*', '?', '/', '\\']) {
            return Err(PriceListError::InvalidConfig(format!(
                "Sheet name '{}' contains a character Excel forbids ([ ] : * ? / \\)",
                c.sheet_name
            )));
        }
        Ok(self.config)
    }
}

// ── Page selection ─────────────────────────────────────────────────────────

/// Specifies which pages of the document to parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Parse all pages (default).
    #[default]
    All,
    /// Parse a single page (1-indexed).
    Single(usize),
    /// Parse a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Parse specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed
    /// page numbers. Out-of-range pages are silently omitted; the caller
    /// decides whether an empty expansion is an error.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}
