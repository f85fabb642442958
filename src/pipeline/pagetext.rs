//! Per-page plain-text extraction via pdfium.
//!
//! ## Why the text API, not OCR?
//!
//! Wholesale price lists are born-digital PDFs: the text layer the layout
//! program embedded is the ground truth, and pdfium's text API reads it
//! losslessly. Rasterising and re-recognising the page could only introduce
//! errors into codes and prices, the two fields that must never be wrong.
//!
//! ## Why bind via pdfium-auto?
//!
//! pdfium is a C++ shared library that users rarely have installed. The
//! `pdfium-auto` crate downloads a prebuilt copy into a per-user cache on
//! first use (override with `PDFIUM_LIB_PATH`), so `pricelist2xlsx` works
//! out of the box without a system package. The binding is created per
//! call; binding is cheap once the library file is cached.

use crate::config::ConversionConfig;
use crate::error::PriceListError;
use crate::output::DocumentMetadata;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

/// Bind to a pdfium library, downloading it on first use.
fn bind_pdfium() -> Result<Pdfium, PriceListError> {
    pdfium_auto::bind_pdfium_silent()
        .map_err(|e| PriceListError::PdfiumBindingFailed(e.to_string()))
}

/// Load a document, mapping pdfium's error surface onto the input taxonomy.
fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PriceListError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PriceListError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PriceListError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PriceListError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Extract plain text from the selected pages.
///
/// # Returns
/// A vector of `(page_index_0based, text)` tuples in selection order.
/// A page whose text layer cannot be read yields an empty string (with a
/// warning) rather than failing the document; downstream treats it like a
/// blank page.
pub fn extract_page_texts(
    pdf_path: &Path,
    config: &ConversionConfig,
    page_indices: &[usize],
) -> Result<Vec<(usize, String)>, PriceListError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, config.password.as_deref())?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut results = Vec::with_capacity(page_indices.len());

    for &idx in page_indices {
        if idx >= total_pages {
            warn!(
                "Skipping page {} (out of range, total={})",
                idx + 1,
                total_pages
            );
            continue;
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| PriceListError::TextExtractionFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        let text = match page.text() {
            Ok(t) => t.all(),
            Err(e) => {
                warn!("No readable text layer on page {}: {:?}", idx + 1, e);
                String::new()
            }
        };

        debug!(
            "Extracted page {} → {} chars",
            idx + 1,
            text.chars().count()
        );

        results.push((idx, text));
    }

    Ok(results)
}

/// Extract document metadata from a PDF without reading page text.
pub fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, PriceListError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: Some(format!("{:?}", document.version())),
    })
}
