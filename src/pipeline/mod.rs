//! Pipeline stages for price-list extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable; the two
//! parsing stages ([`segment`] and [`fields`]) in particular run on plain
//! strings and never touch a PDF, so the whole core is exercisable without
//! pdfium.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ pagetext ──▶ segment ──▶ fields ──▶ writer
//! (path)    (pdfium)     (classify)  (decompose) (.xlsx)
//! ```
//!
//! 1. [`input`]    — validate the user-supplied path (existence, `%PDF`
//!    magic bytes)
//! 2. [`pagetext`] — extract each selected page's plain text via pdfium
//! 3. [`segment`]  — classify lines, carrying producer/region context in
//!    document order
//! 4. [`fields`]   — decompose each product line into a typed record
//! 5. [`writer`]   — write the ordered records to an `.xlsx` price sheet
//!
//! Stages 3 and 4 are the system's core; everything else is plumbing
//! around them.

pub mod fields;
pub mod input;
pub mod pagetext;
pub mod segment;
pub mod writer;
