//! Whole-document extraction entry points.
//!
//! ## Why synchronous?
//!
//! The parse is strictly sequential by design: each product line's producer
//! attribution depends on every header line seen before it, so pages and
//! lines must be folded in document order and there is nothing useful to
//! overlap. A multi-page list parses in milliseconds once pdfium has read
//! the text. Callers batching many documents can parallelise at the
//! document level; each call here owns its context and shares nothing.

use crate::config::ConversionConfig;
use crate::error::PriceListError;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::{input, pagetext, segment::Segmenter, writer};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Extract product records from a price-list PDF.
///
/// This is the primary entry point for the library.
///
/// # Returns
/// `Ok(ConversionOutput)` whenever the document could be read — even when
/// zero records were found (check `output.records`, or call
/// [`ConversionOutput::into_result`] to treat emptiness as an error).
///
/// # Errors
/// Returns `Err(PriceListError)` only for structural failures:
/// - File not found / permission denied / not a valid PDF
/// - Corrupt or password-protected document
/// - Page selection matching no pages
///
/// # Example
/// ```rust,no_run
/// use pricelist2xlsx::{convert, ConversionConfig};
///
/// let output = convert("january.pdf", &ConversionConfig::default())?;
/// println!("{} products", output.records.len());
/// # Ok::<(), pricelist2xlsx::PriceListError>(())
/// ```
pub fn convert(
    input: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, PriceListError> {
    let total_start = Instant::now();
    let input = input.as_ref();
    info!("Starting extraction: {}", input.display());

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let pdf_path = input::resolve_input(input)?;

    // ── Step 2: Read metadata for the page count ─────────────────────────
    let metadata = pagetext::extract_metadata(&pdf_path, config.password.as_deref())?;
    let total_pages = metadata.page_count;
    info!("PDF has {} pages", total_pages);

    // ── Step 3: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(PriceListError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    debug!("Selected {} pages for parsing", page_indices.len());

    // ── Step 4: Extract page text ────────────────────────────────────────
    let extract_start = Instant::now();
    let texts = pagetext::extract_page_texts(&pdf_path, config, &page_indices)?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;
    info!(
        "Extracted text from {} pages in {}ms",
        texts.len(),
        extract_duration_ms
    );

    // ── Step 5: Fold pages through the segmenter ─────────────────────────
    let mut output = parse_pages(texts.iter().map(|(_, text)| text.as_str()), config);

    // ── Step 6: Finalise metadata and stats ──────────────────────────────
    output.metadata = Some(metadata);
    output.stats.total_pages = total_pages;
    output.stats.extract_duration_ms = extract_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Extraction complete: {} records from {} pages in {}ms",
        output.records.len(),
        output.stats.parsed_pages,
        output.stats.total_duration_ms
    );

    Ok(output)
}

/// Parse pre-extracted page texts into records.
///
/// This is the document parser in isolation: no file, no pdfium, just the
/// segmentation fold over lines. Pages must arrive in document order —
/// producer context carries forward across page boundaries.
///
/// Never fails: data-quality problems degrade to skipped lines, and an
/// input with no product lines yields an output with empty `records`.
///
/// # Example
/// ```rust
/// use pricelist2xlsx::{parse_pages, ConversionConfig};
///
/// let page = "Test Estate, Loire\nLD1234 Domaine Test Rouge 2021 $180.00/cs\n";
/// let output = parse_pages([page], &ConversionConfig::default());
/// assert_eq!(output.records.len(), 1);
/// assert_eq!(output.records[0].producer, "Test Estate, Loire");
/// ```
pub fn parse_pages<I, S>(pages: I, config: &ConversionConfig) -> ConversionOutput
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parse_start = Instant::now();
    let mut segmenter = Segmenter::new(config);
    let mut records = Vec::new();
    let mut parsed_pages = 0usize;
    let mut empty_pages = 0usize;

    for page in pages {
        let text = page.as_ref();
        parsed_pages += 1;
        if text.trim().is_empty() {
            debug!("Page {} has no extractable text; skipping", parsed_pages);
            empty_pages += 1;
            continue;
        }
        records.extend(segmenter.feed_page(text));
    }

    let counts = segmenter.counts();
    let parse_duration_ms = parse_start.elapsed().as_millis() as u64;
    let records_extracted = records.len();

    ConversionOutput {
        records,
        metadata: None,
        stats: ConversionStats {
            total_pages: parsed_pages,
            parsed_pages,
            empty_pages,
            lines_seen: counts.lines_seen,
            product_lines: counts.product_lines,
            skipped_product_lines: counts.skipped_product_lines,
            producers_seen: counts.producers_seen,
            regions_seen: counts.regions_seen,
            records_extracted,
            extract_duration_ms: 0,
            parse_duration_ms,
            total_duration_ms: parse_duration_ms,
        },
    }
}

/// Extract a price-list PDF and write the workbook to a file.
///
/// Treats an empty record set as [`PriceListError::NoRecordsFound`] — a
/// header-only spreadsheet on disk helps nobody. The write is atomic
/// (temp file + rename).
pub fn convert_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, PriceListError> {
    let output = convert(input, config)?.into_result()?;
    writer::write_workbook(&output.records, output_path.as_ref(), &config.sheet_name)?;
    Ok(output.stats)
}

/// Extract records from PDF bytes in memory.
///
/// Internally the bytes are written to a managed [`tempfile`] — pdfium
/// requires a file-system path — and the file is cleaned up on return or
/// panic. Recommended when the PDF comes from an upload or a database blob
/// rather than a file on disk.
///
/// # Example
/// ```rust,no_run
/// use pricelist2xlsx::{convert_from_bytes, ConversionConfig};
///
/// let bytes: Vec<u8> = std::fs::read("january.pdf")?;
/// let output = convert_from_bytes(&bytes, &ConversionConfig::default())?;
/// println!("{} products", output.records.len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn convert_from_bytes(
    bytes: &[u8],
    config: &ConversionConfig,
) -> Result<ConversionOutput, PriceListError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| PriceListError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| PriceListError::Internal(format!("tempfile write: {e}")))?;
    // `tmp` is dropped (and the file deleted) when `convert` returns
    convert(tmp.path(), config)
}

/// Read document metadata without parsing any page text.
pub fn inspect(
    input: impl AsRef<Path>,
    password: Option<&str>,
) -> Result<DocumentMetadata, PriceListError> {
    let pdf_path = input::resolve_input(input.as_ref())?;
    pagetext::extract_metadata(&pdf_path, password)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Category;

    #[test]
    fn test_parse_pages_carries_producer_across_pages() {
        let config = ConversionConfig::default();
        let page1 = "LOIRE\nTest Estate, Loire\nLD1 Gamay Rouge 2022 $120.00/cs\n";
        let page2 = "LD2 Chenin Blanc 2021 $140.00/cs\n";

        let output = parse_pages([page1, page2], &config);

        assert_eq!(output.records.len(), 2);
        assert_eq!(output.records[0].producer, "Test Estate, Loire");
        assert_eq!(output.records[1].producer, "Test Estate, Loire");
        assert_eq!(output.records[1].category, Category::White);
        assert!(output.metadata.is_none());
        assert_eq!(output.stats.parsed_pages, 2);
        assert_eq!(output.stats.producers_seen, 1);
        assert_eq!(output.stats.regions_seen, 1);
        assert_eq!(output.stats.records_extracted, 2);
    }

    #[test]
    fn test_parse_pages_skips_empty_pages() {
        let config = ConversionConfig::default();
        let output = parse_pages(["", "  \n \n", "LD1 Rouge 2020 $100.00/cs"], &config);

        assert_eq!(output.stats.parsed_pages, 3);
        assert_eq!(output.stats.empty_pages, 2);
        assert_eq!(output.records.len(), 1);
    }

    #[test]
    fn test_parse_pages_zero_records_is_ok_until_into_result() {
        let config = ConversionConfig::default();
        let output = parse_pages(["nothing useful here\njust noise\n"], &config);

        assert!(output.records.is_empty());
        assert!(matches!(
            output.into_result(),
            Err(PriceListError::NoRecordsFound { pages: 1 })
        ));
    }

    #[test]
    fn test_parse_pages_preserves_document_order() {
        let config = ConversionConfig::default();
        let page = "A, B\nLD3 Rouge 2020 $90.00/cs\nLD1 Blanc 2021 $95.00/cs\nLD2 Rosé NV $85.00/cs\n";
        let output = parse_pages([page], &config);

        let codes: Vec<&str> = output.records.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["LD3", "LD1", "LD2"]);
    }

    #[test]
    fn test_parse_pages_counts_skipped_lines() {
        let config = ConversionConfig::default();
        let page = "LD1 Broken line without price\nLD2 Rouge 2020 $90.00/cs\n";
        let output = parse_pages([page], &config);

        assert_eq!(output.stats.product_lines, 2);
        assert_eq!(output.stats.skipped_product_lines, 1);
        assert_eq!(output.records.len(), 1);
    }
}
