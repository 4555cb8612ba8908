//! Bulk import of delimited-text uploads into the item store.
//!
//! # Responsibility
//! - Validate upload file type, text encoding and header structure.
//! - Turn each well-formed data row into an item draft and persist the batch.
//!
//! # Invariants
//! - Structural failures are reported before any row is written.
//! - Rows with an empty `name` or `description` are skipped, never reported
//!   as errors.

mod csv_import;

pub use csv_import::{
    import_into, import_upload, parse_upload, ImportError, ImportOptions, ImportReport,
    ImportResult, ParsedUpload, DEFAULT_DELIMITER, DEFAULT_EXTENSION, REQUIRED_COLUMNS,
};
