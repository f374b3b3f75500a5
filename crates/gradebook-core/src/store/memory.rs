//! In-memory record store.

use super::RecordStore;
use crate::{GradebookError, RecordId, StudentDraft, StudentRecord};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug)]
struct MemoryState {
    records: BTreeMap<RecordId, StudentDraft>,
    next_id: u64,
}

/// A volatile [`RecordStore`] backed by a `BTreeMap`.
///
/// Keys are monotonically assigned, so `BTreeMap` order is insertion order.
#[derive(Debug)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                records: BTreeMap::new(),
                next_id: RecordId::FIRST.0,
            }),
        }
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryState>, GradebookError> {
        self.state
            .read()
            .map_err(|_| GradebookError::Storage("Memory store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryState>, GradebookError> {
        self.state
            .write()
            .map_err(|_| GradebookError::Storage("Memory store lock poisoned".to_string()))
    }
}

impl RecordStore for MemoryStore {
    fn initialize(&self) -> Result<(), GradebookError> {
        Ok(())
    }

    fn insert(&self, draft: &StudentDraft) -> Result<RecordId, GradebookError> {
        draft.validate()?;

        let mut state = self.write()?;
        let id = RecordId(state.next_id);
        state.next_id = state.next_id.saturating_add(1);
        state.records.insert(id, draft.clone());
        Ok(id)
    }

    fn list_all(&self) -> Result<Vec<StudentRecord>, GradebookError> {
        let state = self.read()?;
        Ok(state
            .records
            .iter()
            .map(|(id, draft)| draft.clone().into_record(*id))
            .collect())
    }

    fn update(&self, id: RecordId, draft: &StudentDraft) -> Result<bool, GradebookError> {
        draft.validate()?;

        let mut state = self.write()?;
        match state.records.get_mut(&id) {
            Some(existing) => {
                *existing = draft.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: RecordId) -> Result<bool, GradebookError> {
        let mut state = self.write()?;
        Ok(state.records.remove(&id).is_some())
    }

    fn marks(&self) -> Result<Vec<i64>, GradebookError> {
        let state = self.read()?;
        Ok(state.records.values().map(|d| d.marks).collect())
    }

    fn count(&self) -> Result<usize, GradebookError> {
        Ok(self.read()?.records.len())
    }
}
