//! Workbook output: ordered records → one `.xlsx` price sheet.
//!
//! The schema is fixed and column order is part of the contract — the
//! sheet feeds downstream import tooling that addresses columns by
//! position. The writer is record-count agnostic: an empty slice produces
//! a header-only sheet, and the decision to treat emptiness as an error
//! belongs to the caller.
//!
//! ## Why write through a temp file?
//!
//! An `.xlsx` file is a ZIP archive; a partial write is not merely
//! truncated but unreadable. Saving to a sibling temp path and renaming
//! into place means the output path either holds the previous file or a
//! complete new one, never a corrupt archive.

use crate::error::PriceListError;
use crate::output::ProductRecord;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Column headers, in sheet order.
pub const COLUMN_HEADERS: [&str; 8] = [
    "Item Code",
    "Producer",
    "Product Name",
    "Vintage",
    "Pack Size",
    "Bottle Size (ml)",
    "Product Type",
    "FOB Case Price",
];

/// Column widths matching the header order.
const COLUMN_WIDTHS: [f64; 8] = [12.0, 35.0, 50.0, 10.0, 10.0, 15.0, 15.0, 15.0];

/// Build the workbook in memory.
fn build_workbook(records: &[ProductRecord], sheet_name: &str) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let price_format = Format::new().set_num_format("0.00");

    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name)?;

    for (col, header) in COLUMN_HEADERS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }

    for (i, rec) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &rec.code)?;
        sheet.write_string(row, 1, &rec.producer)?;
        sheet.write_string(row, 2, &rec.name)?;
        sheet.write_string(row, 3, &rec.vintage)?;
        sheet.write_number(row, 4, rec.pack_size)?;
        sheet.write_number(row, 5, rec.bottle_size_ml)?;
        sheet.write_string(row, 6, rec.category.label())?;
        sheet.write_number_with_format(row, 7, rec.case_price, &price_format)?;
    }

    debug!("Workbook built: {} data rows", records.len());
    Ok(workbook)
}

/// Serialise the workbook to an in-memory `.xlsx` byte buffer.
pub fn workbook_bytes(
    records: &[ProductRecord],
    sheet_name: &str,
) -> Result<Vec<u8>, PriceListError> {
    let mut workbook = build_workbook(records, sheet_name).map_err(|e| {
        PriceListError::SpreadsheetWriteFailed {
            path: PathBuf::from("<buffer>"),
            detail: e.to_string(),
        }
    })?;
    workbook
        .save_to_buffer()
        .map_err(|e| PriceListError::SpreadsheetWriteFailed {
            path: PathBuf::from("<buffer>"),
            detail: e.to_string(),
        })
}

/// Write the workbook to `path` atomically (temp file + rename).
pub fn write_workbook(
    records: &[ProductRecord],
    path: &Path,
    sheet_name: &str,
) -> Result<(), PriceListError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PriceListError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("xlsx.tmp");
    let mut workbook = build_workbook(records, sheet_name).map_err(|e| {
        PriceListError::SpreadsheetWriteFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    })?;
    workbook
        .save(&tmp_path)
        .map_err(|e| PriceListError::SpreadsheetWriteFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    std::fs::rename(&tmp_path, path).map_err(|e| PriceListError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    info!("Wrote {} rows to {}", records.len(), path.display());
    Ok(())
}

/// Derive the default output path: `{stem}_converted.xlsx` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_converted.xlsx"))
}

// ── Tests ────────────────────────────────────────────────────────────────────
