//! # redb-backed Record Store
//!
//! A disk-backed record store using the redb embedded database:
//! - ACID transactions
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)
//!
//! ## Layout
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `students` | record id (`u64`) | postcard-encoded [`StudentDraft`] |
//! | `metadata` | `&str` | `u64` (holds `next_id`) |
//!
//! Every operation runs inside its own transaction. A write transaction that
//! is dropped before `commit()` is rolled back, so an early `?` return
//! leaves the database untouched.

use super::RecordStore;
use crate::{GradebookError, RecordId, StudentDraft, StudentRecord};
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;

/// Table for records: RecordId(u64) -> serialized StudentDraft bytes
const STUDENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("students");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

/// Metadata key of the next identifier to hand out.
const NEXT_ID_KEY: &str = "next_id";

fn storage_err(e: impl std::fmt::Display) -> GradebookError {
    GradebookError::Storage(e.to_string())
}

fn encode(draft: &StudentDraft) -> Result<Vec<u8>, GradebookError> {
    postcard::to_allocvec(draft).map_err(|e| GradebookError::Serialization(e.to_string()))
}

fn decode(id: u64, bytes: &[u8]) -> Result<StudentRecord, GradebookError> {
    let draft: StudentDraft = postcard::from_bytes(bytes).map_err(|e| {
        GradebookError::Serialization(format!("Corrupt record {}: {}", id, e))
    })?;
    Ok(draft.into_record(RecordId(id)))
}

/// A disk-backed record store using redb.
pub struct RedbStore {
    db: Database,
}

impl std::fmt::Debug for RedbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbStore").finish_non_exhaustive()
    }
}

impl RedbStore {
    /// Open or create a record database at the given path and make sure its
    /// tables exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GradebookError> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;
        let store = Self { db };
        store.initialize()?;
        Ok(store)
    }
}

// =============================================================================
// RECORDSTORE TRAIT IMPLEMENTATION
// =============================================================================

impl RecordStore for RedbStore {
    fn initialize(&self) -> Result<(), GradebookError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let _ = write_txn.open_table(STUDENTS).map_err(storage_err)?;
        let _ = write_txn.open_table(METADATA).map_err(storage_err)?;
        write_txn.commit().map_err(storage_err)
    }

    fn insert(&self, draft: &StudentDraft) -> Result<RecordId, GradebookError> {
        draft.validate()?;
        let bytes = encode(draft)?;

        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let id = {
            let mut meta_table = write_txn.open_table(METADATA).map_err(storage_err)?;
            let mut students_table = write_txn.open_table(STUDENTS).map_err(storage_err)?;

            let id = meta_table
                .get(NEXT_ID_KEY)
                .map_err(storage_err)?
                .map(|v| v.value())
                .unwrap_or(RecordId::FIRST.0);

            students_table
                .insert(id, bytes.as_slice())
                .map_err(storage_err)?;
            meta_table
                .insert(NEXT_ID_KEY, id.saturating_add(1))
                .map_err(storage_err)?;
            id
        };
        write_txn.commit().map_err(storage_err)?;

        Ok(RecordId(id))
    }

    fn list_all(&self) -> Result<Vec<StudentRecord>, GradebookError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(STUDENTS).map_err(storage_err)?;

        let mut records = Vec::new();
        for entry in table.iter().map_err(storage_err)? {
            let (key, value) = entry.map_err(storage_err)?;
            records.push(decode(key.value(), value.value())?);
        }
        Ok(records)
    }

    fn update(&self, id: RecordId, draft: &StudentDraft) -> Result<bool, GradebookError> {
        draft.validate()?;
        let bytes = encode(draft)?;

        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let existed = {
            let mut table = write_txn.open_table(STUDENTS).map_err(storage_err)?;
            let existed = table.get(id.0).map_err(storage_err)?.is_some();
            if existed {
                table.insert(id.0, bytes.as_slice()).map_err(storage_err)?;
            }
            existed
        };

        if existed {
            write_txn.commit().map_err(storage_err)?;
        } else {
            write_txn.abort().map_err(storage_err)?;
        }
        Ok(existed)
    }

    fn delete(&self, id: RecordId) -> Result<bool, GradebookError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let removed = {
            let mut table = write_txn.open_table(STUDENTS).map_err(storage_err)?;
            table.remove(id.0).map_err(storage_err)?.is_some()
        };

        if removed {
            write_txn.commit().map_err(storage_err)?;
        } else {
            write_txn.abort().map_err(storage_err)?;
        }
        Ok(removed)
    }

    fn count(&self) -> Result<usize, GradebookError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(STUDENTS).map_err(storage_err)?;
        Ok(table.len().map_err(storage_err)? as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn basic_operations() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open db");

        let a = store.insert(&StudentDraft::new("Asha", 81)).expect("insert");
        let b = store.insert(&StudentDraft::new("Bram", 12)).expect("insert");

        assert_ne!(a, b);
        assert_eq!(store.count().expect("count"), 2);
        assert_eq!(
            store.list_all().expect("list"),
            vec![
                StudentRecord::new(a, "Asha", 81),
                StudentRecord::new(b, "Bram", 12),
            ]
        );
    }

    #[test]
    fn initialize_is_idempotent() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        store.insert(&StudentDraft::new("Kept", 50)).expect("insert");

        store.initialize().expect("second initialize");
        store.initialize().expect("third initialize");
        assert_eq!(store.count().expect("count"), 1);
    }

    #[test]
    fn persistence() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");

        {
            let store = RedbStore::open(&db_path).expect("open db");
            store.insert(&StudentDraft::new("Asha", 81)).expect("insert");
            store.insert(&StudentDraft::new("Bram", 12)).expect("insert");
        }

        {
            let store = RedbStore::open(&db_path).expect("reopen db");
            assert_eq!(store.marks().expect("marks"), vec![81, 12]);
        }
    }

    #[test]
    fn ids_are_not_reused_across_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("test.redb");

        let last = {
            let store = RedbStore::open(&db_path).expect("open db");
            store.insert(&StudentDraft::new("A", 1)).expect("insert");
            let last = store.insert(&StudentDraft::new("B", 2)).expect("insert");
            assert!(store.delete(last).expect("delete"));
            last
        };

        let store = RedbStore::open(&db_path).expect("reopen db");
        let next = store.insert(&StudentDraft::new("C", 3)).expect("insert");
        assert!(next > last);
    }

    #[test]
    fn missing_update_and_delete_do_not_write() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        let id = store.insert(&StudentDraft::new("Only", 40)).expect("insert");

        let ghost = RecordId(id.0 + 100);
        assert!(!store.update(ghost, &StudentDraft::new("X", 1)).expect("update"));
        assert!(!store.delete(ghost).expect("delete"));
        assert_eq!(
            store.list_all().expect("list"),
            vec![StudentRecord::new(id, "Only", 40)]
        );
    }

    #[test]
    fn invalid_update_is_rejected_before_lookup() {
        let temp = tempdir().expect("temp dir");
        let store = RedbStore::open(temp.path().join("test.redb")).expect("open db");
        let id = store.insert(&StudentDraft::new("Keep", 40)).expect("insert");

        let result = store.update(id, &StudentDraft::new("", 99));
        assert!(matches!(result, Err(GradebookError::Validation(_))));
        assert_eq!(store.marks().expect("marks"), vec![40]);
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let temp = tempdir().expect("temp dir");
        let result = RedbStore::open(temp.path().join("missing").join("test.redb"));
        assert!(matches!(result, Err(GradebookError::Storage(_))));
    }
}
