//! Line classification: raw page text → {product, region, producer, noise}.
//!
//! ## Why surface cues?
//!
//! Text extraction flattens the page: no table cells, no font weights, no
//! column positions survive — only lines. The document's own typographic
//! conventions are the remaining signal: product lines start with the item
//! code prefix, region banners are short ALL-CAPS lines, producer headers
//! read `Name, Region`. [`classify_line`] encodes those cues as ordered
//! rules, first match wins.
//!
//! The product-code prefix outranks every shape heuristic. A mangled
//! product line may well contain a comma or read all-caps, and misfiling
//! one as a producer header would silently corrupt the attribution of every
//! record after it, so the prefix check runs before the region and producer
//! shapes.
//!
//! [`Segmenter`] is the stateful part: an accumulator folded over the
//! document's lines, carrying [`ParseContext`] (current producer and
//! region) forward. Producers frequently span page breaks, so the context
//! is document-scoped, never reset between pages.

use crate::config::ConversionConfig;
use crate::output::ProductRecord;
use crate::pipeline::fields;
use tracing::debug;

/// Separator that marks a producer header (`Name, Region`).
const PRODUCER_SEPARATOR: &str = ", ";

/// Carried-forward classification state for one document.
#[derive(Debug, Default, Clone)]
pub struct ParseContext {
    /// Most recent producer header; applied to subsequent product lines.
    pub producer: Option<String>,
    /// Most recent region header. Tracked for observability only; region
    /// never reaches the output records.
    pub region: Option<String>,
}

/// What the classifier decided about one trimmed line.
#[derive(Debug, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Empty after trimming.
    Blank,
    /// Contains a boilerplate marker (page header/footer text).
    Boilerplate,
    /// Starts with the product-code prefix; goes to the field extractor.
    Product(&'a str),
    /// Region banner; updates the current region.
    Region(&'a str),
    /// Region-shaped but denylisted (`NEW ARRIVALS` etc.); consumed without
    /// touching the context.
    SectionLabel,
    /// Producer header; updates the current producer.
    Producer(&'a str),
    /// None of the above.
    Noise,
}

/// Classify one line. `line` must already be trimmed.
pub fn classify_line<'a>(line: &'a str, config: &ConversionConfig) -> LineClass<'a> {
    if line.is_empty() {
        return LineClass::Blank;
    }
    if config
        .boilerplate_markers
        .iter()
        .any(|m| !m.is_empty() && line.contains(m.as_str()))
    {
        return LineClass::Boilerplate;
    }
    if line.starts_with(config.code_prefix.as_str()) {
        return LineClass::Product(line);
    }
    if is_region_shaped(line, config) {
        if config.section_labels.iter().any(|l| l == line) {
            return LineClass::SectionLabel;
        }
        return LineClass::Region(line);
    }
    if is_producer_shaped(line, config) {
        return LineClass::Producer(line);
    }
    LineClass::Noise
}

fn is_region_shaped(line: &str, config: &ConversionConfig) -> bool {
    is_all_caps(line)
        && line.chars().count() < config.region_max_chars
        && !line.contains(config.currency_symbol)
}

fn is_producer_shaped(line: &str, config: &ConversionConfig) -> bool {
    line.contains(PRODUCER_SEPARATOR)
        && !line.contains(config.currency_symbol)
        && line.chars().count() < config.producer_max_chars
}

/// True when the line has at least one cased character and none of its
/// cased characters are lower-case. Digits and punctuation are neutral, so
/// `LOIRE 2` qualifies while `LOIRE rouge` and `12/750` do not.
fn is_all_caps(s: &str) -> bool {
    let mut has_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Counters accumulated by one [`Segmenter`] pass.
#[derive(Debug, Default, Clone, Copy)]
pub struct SegmentCounts {
    pub lines_seen: usize,
    pub product_lines: usize,
    pub skipped_product_lines: usize,
    pub producers_seen: usize,
    pub regions_seen: usize,
}

/// Stateful fold over a document's lines.
///
/// Feed pages (or lines) strictly in document order; the producer context
/// a record inherits depends on every header line seen before it.
pub struct Segmenter<'c> {
    config: &'c ConversionConfig,
    context: ParseContext,
    counts: SegmentCounts,
}

impl<'c> Segmenter<'c> {
    pub fn new(config: &'c ConversionConfig) -> Self {
        Self {
            config,
            context: ParseContext::default(),
            counts: SegmentCounts::default(),
        }
    }

    /// Feed one raw line; returns a record when the line is a product line
    /// the field extractor could parse.
    pub fn feed_line(&mut self, raw_line: &str) -> Option<ProductRecord> {
        let line = raw_line.trim();
        self.counts.lines_seen += 1;

        match classify_line(line, self.config) {
            LineClass::Blank | LineClass::Boilerplate | LineClass::Noise => None,
            LineClass::SectionLabel => {
                debug!("Section banner consumed: {}", line);
                None
            }
            LineClass::Region(name) => {
                debug!("Region: {}", name);
                self.context.region = Some(name.to_string());
                self.counts.regions_seen += 1;
                None
            }
            LineClass::Producer(name) => {
                debug!("Producer: {}", name);
                self.context.producer = Some(name.to_string());
                self.counts.producers_seen += 1;
                None
            }
            LineClass::Product(product_line) => {
                self.counts.product_lines += 1;
                let producer = self
                    .context
                    .producer
                    .as_deref()
                    .unwrap_or(&self.config.default_producer);
                let record = fields::extract_record(product_line, producer, self.config);
                if record.is_none() {
                    self.counts.skipped_product_lines += 1;
                }
                record
            }
        }
    }

    /// Feed one page of text, line by line, returning the page's records.
    pub fn feed_page(&mut self, text: &str) -> Vec<ProductRecord> {
        text.lines().filter_map(|line| self.feed_line(line)).collect()
    }

    /// Current classification state.
    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    /// Counters accumulated so far.
    pub fn counts(&self) -> SegmentCounts {
        self.counts
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ConversionConfig {
        ConversionConfig::default()
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(classify_line("", &cfg()), LineClass::Blank);
    }

    #[test]
    fn test_boilerplate_marker() {
        assert_eq!(
            classify_line("Louis/Dressner Selections Price List", &cfg()),
            LineClass::Boilerplate
        );
    }

    #[test]
    fn test_boilerplate_beats_product_prefix() {
        // Rule 1 wins even when the line starts with the code prefix.
        assert_eq!(
            classify_line("LD0001 Price List Cuvée $100.00/cs", &cfg()),
            LineClass::Boilerplate
        );
    }

    #[test]
    fn test_product_line() {
        let line = "LD1234 Domaine Test Rouge 2021 $180.00/cs";
        assert_eq!(classify_line(line, &cfg()), LineClass::Product(line));
    }

    #[test]
    fn test_region_header() {
        assert_eq!(classify_line("LOIRE", &cfg()), LineClass::Region("LOIRE"));
        assert_eq!(
            classify_line("SOUTHWEST FRANCE", &cfg()),
            LineClass::Region("SOUTHWEST FRANCE")
        );
    }

    #[test]
    fn test_region_header_with_accents() {
        assert_eq!(
            classify_line("RHÔNE", &cfg()),
            LineClass::Region("RHÔNE")
        );
    }

    #[test]
    fn test_section_label_is_not_a_region() {
        assert_eq!(classify_line("NEW ARRIVALS", &cfg()), LineClass::SectionLabel);
        assert_eq!(
            classify_line("SPECIAL PRICING", &cfg()),
            LineClass::SectionLabel
        );
        assert_eq!(classify_line("LAST CASES", &cfg()), LineClass::SectionLabel);
    }

    #[test]
    fn test_all_caps_with_currency_is_noise() {
        assert_eq!(classify_line("SAVE $50 TODAY", &cfg()), LineClass::Noise);
    }

    #[test]
    fn test_long_all_caps_is_noise() {
        let line = "A".repeat(50);
        assert_eq!(classify_line(&line, &cfg()), LineClass::Noise);
        let line = "A".repeat(49);
        assert_eq!(classify_line(&line, &cfg()), LineClass::Region(line.as_str()));
    }

    #[test]
    fn test_producer_header() {
        assert_eq!(
            classify_line("Test Estate, Loire", &cfg()),
            LineClass::Producer("Test Estate, Loire")
        );
    }

    #[test]
    fn test_producer_needs_comma_space() {
        // A bare comma without the following space is not a producer header.
        assert_eq!(classify_line("Estate,Loire", &cfg()), LineClass::Noise);
    }

    #[test]
    fn test_producer_length_threshold_is_strict() {
        let base = "Estate, ";
        let long = format!("{}{}", base, "x".repeat(100 - base.chars().count()));
        assert_eq!(long.chars().count(), 100);
        assert_eq!(classify_line(&long, &cfg()), LineClass::Noise);

        let ok = format!("{}{}", base, "x".repeat(99 - base.chars().count()));
        assert_eq!(classify_line(&ok, &cfg()), LineClass::Producer(ok.as_str()));
    }

    #[test]
    fn test_producer_with_currency_is_noise() {
        assert_eq!(
            classify_line("Estate, Loire $180.00", &cfg()),
            LineClass::Noise
        );
    }

    #[test]
    fn test_malformed_product_line_is_never_a_producer() {
        // Starts with the code prefix AND contains ", ": the prefix wins,
        // so a broken product line cannot poison the producer context.
        let line = "LD9999 Domaine, Broken Line No Price";
        assert_eq!(classify_line(line, &cfg()), LineClass::Product(line));
    }

    #[test]
    fn test_is_all_caps() {
        assert!(is_all_caps("LOIRE"));
        assert!(is_all_caps("LOIRE 2"));
        assert!(is_all_caps("ÎLE-DE-RÉ"));
        assert!(!is_all_caps("Loire"));
        assert!(!is_all_caps("LOIRE rouge"));
        assert!(!is_all_caps("12/750"));
        assert!(!is_all_caps(""));
    }

    #[test]
    fn test_segmenter_attributes_producer() {
        let config = cfg();
        let mut seg = Segmenter::new(&config);
        assert!(seg.feed_line("Test Estate, Loire").is_none());
        let rec = seg
            .feed_line("LD1234 Domaine Test Rouge 2021 $180.00/cs")
            .expect("product line should parse");
        assert_eq!(rec.producer, "Test Estate, Loire");
    }

    #[test]
    fn test_segmenter_default_producer() {
        let config = cfg();
        let mut seg = Segmenter::new(&config);
        let rec = seg
            .feed_line("LD1 Vin de Table Rouge $90.00/cs")
            .expect("product line should parse");
        assert_eq!(rec.producer, "Unknown Producer");
    }

    #[test]
    fn test_segmenter_carries_context_across_pages() {
        let config = cfg();
        let mut seg = Segmenter::new(&config);
        let first = seg.feed_page("LOIRE\nTest Estate, Loire\nLD1 Gamay 2022 $120.00/cs\n");
        assert_eq!(first.len(), 1);

        // New page, no headers: the producer from page one still applies.
        let second = seg.feed_page("LD2 Pineau d'Aunis 2021 $140.00/cs\n");
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].producer, "Test Estate, Loire");
        assert_eq!(seg.context().region.as_deref(), Some("LOIRE"));
    }

    #[test]
    fn test_segmenter_section_label_keeps_region() {
        let config = cfg();
        let mut seg = Segmenter::new(&config);
        seg.feed_line("BEAUJOLAIS");
        seg.feed_line("NEW ARRIVALS");
        assert_eq!(seg.context().region.as_deref(), Some("BEAUJOLAIS"));
        assert_eq!(seg.counts().regions_seen, 1);
    }

    #[test]
    fn test_segmenter_counts_skipped_product_lines() {
        let config = cfg();
        let mut seg = Segmenter::new(&config);
        assert!(seg.feed_line("LD77 No Price Here 2020").is_none());
        let counts = seg.counts();
        assert_eq!(counts.product_lines, 1);
        assert_eq!(counts.skipped_product_lines, 1);
    }

    #[test]
    fn test_segmenter_trims_input_lines() {
        let config = cfg();
        let mut seg = Segmenter::new(&config);
        seg.feed_line("   Test Estate, Loire   ");
        assert_eq!(seg.context().producer.as_deref(), Some("Test Estate, Loire"));
    }
}
