//! # Record Ordering
//!
//! Caller-requested orderings over a record set.
//!
//! Every sort here is stable: records that compare equal keep the relative
//! order the store returned them in.

use crate::{GradebookError, StudentRecord};
use std::cmp::Ordering;
use std::str::FromStr;

/// Field to sort records by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    /// Case-insensitive name comparison.
    Name,
    Marks,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl FromStr for SortKey {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "marks" => Ok(Self::Marks),
            other => Err(GradebookError::Validation(format!(
                "Unknown sort key '{}' (expected id, name or marks)",
                other
            ))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = GradebookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(GradebookError::Validation(format!(
                "Unknown sort order '{}' (expected asc or desc)",
                other
            ))),
        }
    }
}

fn compare(key: SortKey, a: &StudentRecord, b: &StudentRecord) -> Ordering {
    match key {
        SortKey::Id => a.id.cmp(&b.id),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Marks => a.marks.cmp(&b.marks),
    }
}

/// Stable-sort records in place.
pub fn sort_records(records: &mut [StudentRecord], key: SortKey, order: SortOrder) {
    records.sort_by(|a, b| match order {
        SortOrder::Ascending => compare(key, a, b),
        SortOrder::Descending => compare(key, a, b).reverse(),
    });
}
