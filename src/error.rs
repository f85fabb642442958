//! Error types for the pricelist2xlsx library.
//!
//! Only *structural* failures surface here: an input document that cannot
//! be read, a pdfium binding that cannot be established, an output file
//! that cannot be written. Data-quality problems never do — a product line
//! that fails to parse is skipped and the document continues (see
//! [`crate::pipeline::fields`]), and a document that yields zero records is
//! still an `Ok` from [`crate::convert::convert`]. Emptiness becomes
//! [`PriceListError::NoRecordsFound`] only when the caller opts in via
//! [`crate::output::ConversionOutput::into_result`], which the CLI and
//! [`crate::convert::convert_to_file`] do.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pricelist2xlsx library.
#[derive(Debug, Error)]
pub enum PriceListError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error extracting text from a page.
    #[error("Text extraction failed for page {page}: {detail}")]
    TextExtractionFailed { page: usize, detail: String },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The document parsed cleanly but contained no product lines.
    ///
    /// Returned by [`crate::output::ConversionOutput::into_result`] when the
    /// caller wants to treat an empty record set as an error.
    #[error(
        "No product records found in {pages} page(s).\n\
Is this a price list in the expected layout? Product lines must start\n\
with the product-code prefix and carry a '/cs' case price."
    )]
    NoRecordsFound { pages: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or move the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The workbook library rejected the spreadsheet build or save.
    #[error("Failed to build spreadsheet '{path}': {detail}")]
    SpreadsheetWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDFium is normally downloaded automatically on first run.\n\
If the auto-download failed, you can:\n\
  • Check your internet connection and try again.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
