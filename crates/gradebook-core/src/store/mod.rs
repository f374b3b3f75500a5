//! # Record Store
//!
//! Durable CRUD over [`StudentRecord`].
//!
//! The [`RecordStore`] trait is the seam between the service and its
//! storage. Two backends implement it:
//! - [`RedbStore`]: disk-backed, ACID, the production backend
//! - [`MemoryStore`]: volatile `BTreeMap`, for tests and throwaway runs
//!
//! Both hand out identifiers the same way (start at 1, never reuse) and list
//! records in insertion order.

mod memory;
mod redb_store;

pub use memory::MemoryStore;
pub use redb_store::RedbStore;

use crate::{GradebookError, RecordId, StudentDraft, StudentRecord};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

// =============================================================================
// RECORDSTORE TRAIT
// =============================================================================

/// Operations every record backend provides.
///
/// Each call is one self-contained store transaction. Implementations never
/// hold a transaction open across calls, so callers may share a store
/// between threads and issue calls concurrently; conflicting writes are
/// serialized by the backend.
///
/// "Not found" is reported as `Ok(false)` by [`update`](Self::update) and
/// [`delete`](Self::delete), never as an error.
pub trait RecordStore: Send + Sync + std::fmt::Debug {
    /// Ensure the backing schema exists. Safe to call repeatedly.
    fn initialize(&self) -> Result<(), GradebookError>;

    /// Validate and persist a new record, returning its assigned identifier.
    fn insert(&self, draft: &StudentDraft) -> Result<RecordId, GradebookError>;

    /// Every record, in insertion order.
    fn list_all(&self) -> Result<Vec<StudentRecord>, GradebookError>;

    /// Replace name and marks of an existing record.
    ///
    /// Returns `Ok(false)` when no record has `id`. Invalid drafts fail
    /// before the store is consulted.
    fn update(&self, id: RecordId, draft: &StudentDraft) -> Result<bool, GradebookError>;

    /// Remove a record. Returns whether one was removed.
    fn delete(&self, id: RecordId) -> Result<bool, GradebookError>;

    /// Marks of every record, in insertion order.
    fn marks(&self) -> Result<Vec<i64>, GradebookError> {
        Ok(self.list_all()?.into_iter().map(|r| r.marks).collect())
    }

    /// Number of stored records.
    fn count(&self) -> Result<usize, GradebookError> {
        Ok(self.list_all()?.len())
    }
}

// =============================================================================
// BACKEND SELECTION
// =============================================================================

/// Which [`RecordStore`] implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    /// Disk-backed redb database.
    #[default]
    Redb,
    /// Volatile in-memory map.
    Memory,
}

impl StoreBackend {
    /// Name accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Redb => "redb",
            Self::Memory => "memory",
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoreBackend {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" | "mem" => Ok(Self::Memory),
            other => Err(GradebookError::Validation(format!(
                "Unknown storage backend '{}' (expected 'redb' or 'memory')",
                other
            ))),
        }
    }
}

/// Open and initialize a store.
///
/// `path` is ignored by the memory backend.
pub fn open_store(
    backend: StoreBackend,
    path: impl AsRef<Path>,
) -> Result<Arc<dyn RecordStore>, GradebookError> {
    match backend {
        StoreBackend::Redb => Ok(Arc::new(RedbStore::open(path)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
