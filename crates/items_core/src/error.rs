//! Transport-neutral error classification.
//!
//! # Responsibility
//! - Collapse every core error into one of a small set of kinds that
//!   adapters map to status codes.
//!
//! # Invariants
//! - `StoreFailure` is the only server-fault kind.

use crate::db::DbError;
use crate::import::ImportError;
use crate::model::item::ItemValidationError;
use crate::repo::item_repo::RepoError;

/// Classification of every failure a core operation can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Upload name lacks the recognized extension.
    InvalidFileType,
    /// Upload bytes are not valid UTF-8.
    DecodeError,
    /// Header row lacks `name` and/or `description`.
    MissingColumns,
    /// Create/update input is empty after trimming.
    Validation,
    /// Referenced item id does not exist.
    NotFound,
    /// Storage engine failed or holds invalid data.
    StoreFailure,
}

impl ErrorKind {
    /// Stable machine-readable code used in response bodies.
    pub fn code(self) -> &'static str {
        match self {
            Self::InvalidFileType => "INVALID_FILE_TYPE",
            Self::DecodeError => "DECODE_ERROR",
            Self::MissingColumns => "MISSING_COLUMNS",
            Self::Validation => "VALIDATION_ERROR",
            Self::NotFound => "NOT_FOUND",
            Self::StoreFailure => "INTERNAL_ERROR",
        }
    }

    /// Returns whether the caller caused this failure (bad input or unknown id).
    pub fn is_client_fault(self) -> bool {
        !matches!(self, Self::StoreFailure)
    }
}

impl DbError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::StoreFailure
    }
}

impl ItemValidationError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

impl RepoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Db(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. }
            | Self::InvalidData(_) => ErrorKind::StoreFailure,
        }
    }
}

impl ImportError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidFileType { .. } => ErrorKind::InvalidFileType,
            Self::Decode(_) => ErrorKind::DecodeError,
            Self::MissingColumns { .. } => ErrorKind::MissingColumns,
            Self::Store(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;
    use crate::model::item::ItemId;
    use crate::repo::item_repo::RepoError;

    #[test]
    fn only_store_failure_is_server_fault() {
        assert!(ErrorKind::NotFound.is_client_fault());
        assert!(ErrorKind::MissingColumns.is_client_fault());
        assert!(!ErrorKind::StoreFailure.is_client_fault());
    }

    #[test]
    fn repo_errors_map_to_kinds() {
        assert_eq!(RepoError::NotFound(ItemId(3)).kind(), ErrorKind::NotFound);
        assert_eq!(
            RepoError::InvalidData("bad row".to_string()).kind(),
            ErrorKind::StoreFailure
        );
    }
}
