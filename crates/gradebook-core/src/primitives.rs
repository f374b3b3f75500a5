//! # Service Constants
//!
//! Fixed values shared by the store, the statistics engine, the export
//! formatter and the binary. Runtime overrides go through
//! [`ServiceConfig`](crate::config::ServiceConfig); these are the defaults.

/// Minimum marks counted as a pass.
pub const DEFAULT_PASSING_THRESHOLD: i64 = 33;

/// Port the HTTP server listens on when `PORT` is not set.
pub const DEFAULT_PORT: u16 = 5000;

/// Host the HTTP server binds to by default.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Database file used when no path is given.
pub const DEFAULT_DATABASE: &str = "student_records.redb";

/// Environment variable holding the listening port.
pub const PORT_ENV: &str = "PORT";

/// Placeholder rendered for `highest`/`lowest` when there are no records.
pub const NOT_APPLICABLE: &str = "N/A";

// =============================================================================
// EXPORT FORMAT
// =============================================================================

/// Header row of the CSV export.
pub const EXPORT_HEADER: [&str; 2] = ["Name", "Marks"];

/// Suggested filename for the CSV export attachment.
pub const EXPORT_FILENAME: &str = "student_records.csv";

/// Content type of the CSV export.
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";
