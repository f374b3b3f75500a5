//! # Core Type Definitions
//!
//! This module contains the record types shared by every gradebook component:
//! - Record identifier (`RecordId`)
//! - Stored record (`StudentRecord`) and its write payload (`StudentDraft`)
//! - Error types (`GradebookError`)
//!
//! Marks are plain `i64` values. No range is enforced: negative marks and
//! marks above any customary maximum are stored as given.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// RECORD IDENTIFIER
// =============================================================================

/// Identifier assigned by the store when a record is inserted.
///
/// Identifiers start at 1, grow monotonically and are never reused, even
/// after the record holding them has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The first identifier handed out by an empty store.
    pub const FIRST: RecordId = RecordId(1);

    /// Get the raw identifier value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// STUDENT RECORD
// =============================================================================

/// One student's stored `(id, name, marks)` tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Store-assigned identifier.
    pub id: RecordId,
    /// Student name, never empty.
    pub name: String,
    /// Score, unbounded.
    pub marks: i64,
}

impl StudentRecord {
    /// Create a record from its parts.
    #[must_use]
    pub fn new(id: RecordId, name: impl Into<String>, marks: i64) -> Self {
        Self {
            id,
            name: name.into(),
            marks,
        }
    }
}

/// The `(name, marks)` payload written by insert and update.
///
/// A draft carries no identifier: insert receives one from the store and
/// update addresses an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentDraft {
    pub name: String,
    pub marks: i64,
}

impl StudentDraft {
    /// Create a new draft. Call [`StudentDraft::validate`] before persisting.
    #[must_use]
    pub fn new(name: impl Into<String>, marks: i64) -> Self {
        Self {
            name: name.into(),
            marks,
        }
    }

    /// Check the draft against the record invariants.
    ///
    /// Only the name is constrained: it must not be empty.
    pub fn validate(&self) -> Result<(), GradebookError> {
        if self.name.is_empty() {
            return Err(GradebookError::Validation(
                "Name must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Attach an identifier, producing the record as it will be stored.
    #[must_use]
    pub fn into_record(self, id: RecordId) -> StudentRecord {
        StudentRecord {
            id,
            name: self.name,
            marks: self.marks,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the gradebook core.
///
/// "Record not found" from update and delete is a boolean outcome, not an
/// error. `NotFound` exists for callers that turn that outcome into a
/// client-facing failure.
#[derive(Debug, Error)]
pub enum GradebookError {
    /// The write payload breaks a record invariant. Nothing was persisted.
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record exists with the given identifier.
    #[error("Student with ID {0} not found")]
    NotFound(RecordId),

    /// The backing store failed to read or write.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored value or an export could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An I/O error outside the store (binding a socket, writing a file).
    #[error("I/O error: {0}")]
    Io(String),
}

impl GradebookError {
    /// Whether the caller caused this error and can fix it by changing the request.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::NotFound(_))
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_name_is_rejected() {
        let draft = StudentDraft::new("", 50);
        assert!(matches!(
            draft.validate(),
            Err(GradebookError::Validation(_))
        ));
    }

    #[test]
    fn marks_are_not_range_checked() {
        assert!(StudentDraft::new("Low", -40).validate().is_ok());
        assert!(StudentDraft::new("High", 1_000).validate().is_ok());
    }

    #[test]
    fn whitespace_name_is_kept_as_is() {
        let draft = StudentDraft::new("  ", 10);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn draft_into_record_keeps_fields() {
        let record = StudentDraft::new("Asha", 72).into_record(RecordId(7));
        assert_eq!(record, StudentRecord::new(RecordId(7), "Asha", 72));
    }

    #[test]
    fn not_found_message_names_the_id() {
        let err = GradebookError::NotFound(RecordId(42));
        assert_eq!(err.to_string(), "Student with ID 42 not found");
        assert!(err.is_client_error());
    }

    #[test]
    fn storage_error_is_not_client_error() {
        assert!(!GradebookError::Storage("disk full".to_string()).is_client_error());
    }

    #[test]
    fn record_id_serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&RecordId(3)).expect("ser"), "3");
        let back: RecordId = serde_json::from_str("3").expect("de");
        assert_eq!(back, RecordId(3));
    }
}
