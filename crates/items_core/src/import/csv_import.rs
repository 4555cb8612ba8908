//! CSV upload parsing and batch persistence.
//!
//! # Responsibility
//! - Run the linear pipeline: extension check, UTF-8 decode, header check,
//!   per-row filter, persist, report.
//! - Keep the persistence step inside one SQLite transaction.
//!
//! # Invariants
//! - `parse_upload` never touches storage.
//! - Header column names are matched case-sensitively and exactly; the last
//!   occurrence of a repeated column wins.
//! - A missing field in a short row reads as an empty string.

use crate::db::DbError;
use crate::model::item::ItemDraft;
use crate::repo::item_repo::{ItemRepository, RepoError, SqliteItemRepository};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Default field delimiter for uploads.
pub const DEFAULT_DELIMITER: u8 = b',';
/// Default recognized upload file extension (matched case-insensitively).
pub const DEFAULT_EXTENSION: &str = ".csv";
/// Header columns every upload must declare.
pub const REQUIRED_COLUMNS: [&str; 2] = ["name", "description"];

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub type ImportResult<T> = Result<T, ImportError>;

/// Failures that abort a whole import.
#[derive(Debug)]
pub enum ImportError {
    /// Upload name does not end with the recognized extension.
    InvalidFileType {
        file_name: String,
        expected_extension: String,
    },
    /// Upload bytes are not valid UTF-8.
    Decode(csv::Error),
    /// Header row lacks one or both required columns.
    MissingColumns { missing: Vec<&'static str> },
    /// Persisting the accepted rows failed.
    Store(RepoError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFileType {
                file_name,
                expected_extension,
            } => write!(
                f,
                "file `{file_name}` is not a `{expected_extension}` upload"
            ),
            Self::Decode(err) => write!(f, "upload is not valid UTF-8 text: {err}"),
            Self::MissingColumns { missing } => write!(
                f,
                "upload header must contain 'name' and 'description' columns; missing: {}",
                missing.join(", ")
            ),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::InvalidFileType { .. } | Self::MissingColumns { .. } => None,
        }
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<DbError> for ImportError {
    fn from(value: DbError) -> Self {
        Self::Store(value.into())
    }
}

impl From<rusqlite::Error> for ImportError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(value.into())
    }
}

/// Upload format options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Single-byte field delimiter.
    pub delimiter: u8,
    /// Required file name suffix, including the leading dot.
    pub extension: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Rows persisted as new items.
    pub accepted: usize,
    /// Rows dropped because `name` or `description` was empty.
    pub skipped: usize,
}

/// Validated upload content, ready to persist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedUpload {
    pub drafts: Vec<ItemDraft>,
    pub skipped: usize,
}

/// Parses an upload into item drafts without touching storage.
///
/// # Errors
/// - `InvalidFileType` before the content is looked at.
/// - `Decode` for invalid UTF-8 anywhere in the upload.
/// - `MissingColumns` when the header lacks `name` or `description`,
///   including an empty first line.
///
/// An unterminated quoted field runs to the end of input; it is not an error.
pub fn parse_upload(
    file_name: &str,
    bytes: &[u8],
    options: &ImportOptions,
) -> ImportResult<ParsedUpload> {
    if !has_extension(file_name, &options.extension) {
        return Err(ImportError::InvalidFileType {
            file_name: file_name.to_string(),
            expected_extension: options.extension.clone(),
        });
    }

    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if bytes.is_empty() {
        return Ok(ParsedUpload::default());
    }
    if bytes.starts_with(b"\n") || bytes.starts_with(b"\r\n") {
        return Err(ImportError::MissingColumns {
            missing: REQUIRED_COLUMNS.to_vec(),
        });
    }

    // `flexible` keeps ragged rows readable, so on in-memory input the reader
    // only fails on invalid UTF-8.
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers().map_err(ImportError::Decode)?.clone();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(ImportError::Decode)?;
    let (name_idx, description_idx) = locate_required_columns(&headers)?;

    let mut parsed = ParsedUpload::default();
    for record in &records {
        let name = record.get(name_idx).unwrap_or("");
        let description = record.get(description_idx).unwrap_or("");
        match ItemDraft::new(name, description) {
            Ok(draft) => parsed.drafts.push(draft),
            Err(_) => parsed.skipped += 1,
        }
    }

    Ok(parsed)
}

/// Parses an upload and creates one item per accepted row through `repo`.
///
/// Rows are written in file order; nothing is written when parsing fails.
pub fn import_into<R: ItemRepository>(
    repo: &R,
    file_name: &str,
    bytes: &[u8],
    options: &ImportOptions,
) -> ImportResult<ImportReport> {
    let started_at = Instant::now();

    let parsed = match parse_upload(file_name, bytes, options) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!(
                "event=item_import module=import status=rejected bytes={} duration_ms={} error_code={}",
                bytes.len(),
                started_at.elapsed().as_millis(),
                err.kind().code()
            );
            return Err(err);
        }
    };

    for draft in &parsed.drafts {
        repo.create_item(draft)?;
    }

    info!(
        "event=item_import module=import status=ok bytes={} accepted={} skipped={} duration_ms={}",
        bytes.len(),
        parsed.drafts.len(),
        parsed.skipped,
        started_at.elapsed().as_millis()
    );

    Ok(ImportReport {
        accepted: parsed.drafts.len(),
        skipped: parsed.skipped,
    })
}

/// Imports an upload into the database behind `conn` as one transaction.
///
/// A store failure part-way through rolls back every row of this upload.
pub fn import_upload(
    conn: &mut Connection,
    file_name: &str,
    bytes: &[u8],
    options: &ImportOptions,
) -> ImportResult<ImportReport> {
    let tx = conn.transaction()?;
    let report = {
        let repo = SqliteItemRepository::try_new(&tx)?;
        import_into(&repo, file_name, bytes, options)?
    };
    tx.commit()?;
    Ok(report)
}

fn has_extension(file_name: &str, extension: &str) -> bool {
    file_name
        .to_lowercase()
        .ends_with(&extension.to_lowercase())
}

fn locate_required_columns(headers: &csv::StringRecord) -> ImportResult<(usize, usize)> {
    let position = |column: &str| {
        headers
            .iter()
            .enumerate()
            .filter(|(_, header)| *header == column)
            .map(|(idx, _)| idx)
            .last()
    };

    let [name_column, description_column] = REQUIRED_COLUMNS;
    match (position(name_column), position(description_column)) {
        (Some(name_idx), Some(description_idx)) => Ok((name_idx, description_idx)),
        (name_idx, description_idx) => {
            let mut missing = Vec::new();
            if name_idx.is_none() {
                missing.push(name_column);
            }
            if description_idx.is_none() {
                missing.push(description_column);
            }
            Err(ImportError::MissingColumns { missing })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{has_extension, parse_upload, ImportError, ImportOptions};

    fn parse(file_name: &str, body: &str) -> Result<super::ParsedUpload, ImportError> {
        parse_upload(file_name, body.as_bytes(), &ImportOptions::default())
    }

    #[test]
    fn extension_match_ignores_case() {
        assert!(has_extension("items.CSV", ".csv"));
        assert!(has_extension("Report.Csv", ".csv"));
        assert!(!has_extension("items.csv.txt", ".csv"));
        assert!(!has_extension("csv", ".csv"));
    }

    #[test]
    fn rejects_wrong_extension_before_reading_content() {
        let err = parse_upload("items.txt", &[0xff, 0xfe], &ImportOptions::default())
            .expect_err("txt upload must be rejected");
        assert!(matches!(err, ImportError::InvalidFileType { .. }));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = parse_upload("items.csv", b"name,description\n\xff\xfe,x", &ImportOptions::default())
            .expect_err("invalid bytes must be rejected");
        assert!(matches!(err, ImportError::Decode(_)));
    }

    #[test]
    fn invalid_utf8_wins_over_missing_columns() {
        let err = parse_upload("items.csv", b"id,label\n1,\xff\n", &ImportOptions::default())
            .expect_err("invalid bytes must be rejected");
        assert!(matches!(err, ImportError::Decode(_)));
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_input() {
        let parsed = parse("items.csv", "name,description\nDesk,Oak\n\"A,B\n")
            .expect("lenient quoting should parse");
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.drafts[0].name(), "Desk");
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn zero_lines_is_an_empty_success() {
        let parsed = parse("items.csv", "").expect("empty upload should parse");
        assert!(parsed.drafts.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn header_only_is_an_empty_success() {
        let parsed = parse("items.csv", "name,description\n").expect("header-only should parse");
        assert!(parsed.drafts.is_empty());
    }

    #[test]
    fn header_without_columns_reports_both_missing() {
        let err = parse("items.csv", "\nAlice,Engineer\n").expect_err("blank header must fail");
        match err {
            ImportError::MissingColumns { missing } => {
                assert_eq!(missing, vec!["name", "description"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn header_match_is_case_sensitive() {
        let err = parse("items.csv", "Name,description\nAlice,Engineer\n")
            .expect_err("`Name` is not `name`");
        match err {
            ImportError::MissingColumns { missing } => assert_eq!(missing, vec!["name"]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn skips_rows_with_blank_required_fields() {
        let parsed = parse("items.csv", "name,description\nAlice,Engineer\n,Skip\nBob,")
            .expect("upload should parse");
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.drafts[0].name(), "Alice");
        assert_eq!(parsed.drafts[0].description(), "Engineer");
        assert_eq!(parsed.skipped, 2);
    }

    #[test]
    fn short_rows_read_missing_fields_as_empty() {
        let parsed = parse("items.csv", "description,extra,name\nDesk,x\nChair,y,Seat\n")
            .expect("ragged rows should parse");
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.drafts[0].name(), "Seat");
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn ignores_extra_columns_and_trims_values() {
        let parsed = parse(
            "items.csv",
            "id,name,description,price\r\n1,  Lamp ,\" Warm light \",10\r\n",
        )
        .expect("upload should parse");
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.drafts[0].name(), "Lamp");
        assert_eq!(parsed.drafts[0].description(), "Warm light");
    }

    #[test]
    fn honors_custom_delimiter() {
        let options = ImportOptions {
            delimiter: b';',
            ..ImportOptions::default()
        };
        let parsed = parse_upload(
            "items.csv",
            b"name;description\nPen;Blue, fine tip\n",
            &options,
        )
        .expect("semicolon upload should parse");
        assert_eq!(parsed.drafts[0].description(), "Blue, fine tip");
    }

    #[test]
    fn strips_leading_byte_order_mark() {
        let parsed = parse("items.csv", "\u{feff}name,description\nA,B\n")
            .expect("BOM-prefixed upload should parse");
        assert_eq!(parsed.drafts.len(), 1);
    }

    #[test]
    fn blank_data_lines_are_ignored() {
        let parsed = parse("items.csv", "name,description\n\nA,B\n\n")
            .expect("upload should parse");
        assert_eq!(parsed.drafts.len(), 1);
        assert_eq!(parsed.skipped, 0);
    }
}
