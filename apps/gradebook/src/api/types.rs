//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API. Core records
//! cross into wire format only here.

use gradebook_core::{Extremum, Statistics, StudentDraft, StudentRecord};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STUDENT REQUEST
// =============================================================================

/// Body of create and update requests.
///
/// Both fields are optional at the wire level so that a missing field
/// produces the service's own 400 message instead of a deserializer error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub marks: Option<i64>,
}

impl StudentRequest {
    /// Create a request with both fields present.
    pub fn new(name: impl Into<String>, marks: i64) -> Self {
        Self {
            name: Some(name.into()),
            marks: Some(marks),
        }
    }

    /// Convert to a draft.
    ///
    /// Returns `None` when the name is missing or empty, or marks are missing.
    pub fn into_draft(self) -> Option<StudentDraft> {
        match (self.name, self.marks) {
            (Some(name), Some(marks)) if !name.is_empty() => Some(StudentDraft::new(name, marks)),
            _ => None,
        }
    }
}

// =============================================================================
// STUDENT RECORD JSON
// =============================================================================

/// A stored record as returned by `GET /students`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentJson {
    pub id: u64,
    pub name: String,
    pub marks: i64,
}

impl From<StudentRecord> for StudentJson {
    fn from(record: StudentRecord) -> Self {
        Self {
            id: record.id.0,
            name: record.name,
            marks: record.marks,
        }
    }
}

/// Query parameters accepted by `GET /students`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListParams {
    /// `id`, `name` or `marks`. Store order when absent.
    pub sort_by: Option<String>,
    /// `asc` (default) or `desc`.
    pub order: Option<String>,
}

// =============================================================================
// MESSAGE / ERROR RESPONSES
// =============================================================================

/// Success body of create, update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// =============================================================================
// STATS RESPONSE
// =============================================================================

/// Response of `GET /stats`.
///
/// `highest` and `lowest` are integers, or the string `"N/A"` when there are
/// no records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub total: usize,
    pub pass: usize,
    pub fail: usize,
    pub highest: Extremum,
    pub lowest: Extremum,
}

impl From<Statistics> for StatsResponse {
    fn from(stats: Statistics) -> Self {
        Self {
            total: stats.total,
            pass: stats.pass,
            fail: stats.fail,
            highest: stats.highest,
            lowest: stats.lowest,
        }
    }
}
