//! # gradebook-core
//!
//! The record logic of the gradebook service - THE LOGIC.
//!
//! This crate owns everything the service knows about student records:
//! - `store`: durable CRUD over records (redb, or in-memory for tests)
//! - `stats`: pass/fail counts and extrema over marks
//! - `export`: CSV rendering with stable marks-descending order
//! - `ordering`: caller-requested record orderings
//! - `config`: the immutable service configuration
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - Every failure is a [`GradebookError`]; nothing here logs or panics
//! - Marks are integers with no enforced range

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod export;
pub mod ordering;
pub mod primitives;
pub mod stats;
pub mod store;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{GradebookError, RecordId, StudentDraft, StudentRecord};

// =============================================================================
// RE-EXPORTS: Components
// =============================================================================

pub use config::ServiceConfig;
pub use export::{CsvExport, export_attachment, export_csv, import_csv};
pub use ordering::{SortKey, SortOrder, sort_records};
pub use stats::{Extremum, Statistics, StatsEngine};
pub use store::{MemoryStore, RecordStore, RedbStore, StoreBackend, open_store};
