//! # CSV Export
//!
//! Renders a record set as a downloadable CSV document.
//!
//! ## Format
//!
//! ```text
//! Name,Marks
//! Ben,90
//! "Doe, Jane",50
//! ```
//!
//! - Header row `Name,Marks`; identifiers are not exported.
//! - Rows sorted by marks, highest first. Equal marks keep store order.
//! - Fields containing a comma, a double quote or a line break are wrapped in
//!   double quotes with inner quotes doubled, so any conforming CSV reader
//!   recovers the original text.
//! - Rows end with `\n`; the document is UTF-8.
//!
//! [`import_csv`] reads the same format back into drafts.

use crate::ordering::{SortKey, SortOrder, sort_records};
use crate::primitives::{EXPORT_CONTENT_TYPE, EXPORT_FILENAME, EXPORT_HEADER};
use crate::{GradebookError, StudentDraft, StudentRecord};

/// A rendered export, ready to be served as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    /// UTF-8 CSV bytes.
    pub data: Vec<u8>,
    /// Suggested download filename.
    pub filename: &'static str,
    /// MIME type of `data`.
    pub content_type: &'static str,
}

impl CsvExport {
    /// Value for a `Content-Disposition` header offering the export as a download.
    #[must_use]
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

fn csv_err(e: impl std::fmt::Display) -> GradebookError {
    GradebookError::Serialization(format!("CSV export failed: {}", e))
}

/// Render records as CSV bytes, highest marks first.
///
/// The input slice is left untouched; sorting happens on a copy.
pub fn export_csv(records: &[StudentRecord]) -> Result<Vec<u8>, GradebookError> {
    let mut sorted = records.to_vec();
    sort_records(&mut sorted, SortKey::Marks, SortOrder::Descending);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER).map_err(csv_err)?;
    for record in &sorted {
        let marks = record.marks.to_string();
        writer
            .write_record([record.name.as_str(), marks.as_str()])
            .map_err(csv_err)?;
    }

    writer.into_inner().map_err(csv_err)
}

/// Render records as a [`CsvExport`] attachment.
pub fn export_attachment(records: &[StudentRecord]) -> Result<CsvExport, GradebookError> {
    Ok(CsvExport {
        data: export_csv(records)?,
        filename: EXPORT_FILENAME,
        content_type: EXPORT_CONTENT_TYPE,
    })
}

/// Parse a `Name,Marks` CSV document into drafts, in file order.
///
/// The header must match the export header. Every row is validated; the first
/// bad row fails the whole document with its 1-based line number.
pub fn import_csv(data: &[u8]) -> Result<Vec<StudentDraft>, GradebookError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(data);

    let headers = reader
        .headers()
        .map_err(|e| GradebookError::Validation(format!("Unreadable CSV header: {}", e)))?;
    let matches_header = headers.len() == EXPORT_HEADER.len()
        && headers
            .iter()
            .zip(EXPORT_HEADER)
            .all(|(found, expected)| found.trim() == expected);
    if !matches_header {
        return Err(GradebookError::Validation(format!(
            "Expected CSV header '{}'",
            EXPORT_HEADER.join(",")
        )));
    }

    let mut drafts = Vec::new();
    for result in reader.records() {
        let row = result.map_err(|e| GradebookError::Validation(format!("Bad CSV row: {}", e)))?;
        let line = row.position().map_or(0, csv::Position::line);
        let (Some(name), Some(marks)) = (row.get(0), row.get(1)) else {
            return Err(GradebookError::Validation(format!(
                "Line {}: expected name and marks",
                line
            )));
        };
        let marks: i64 = marks.trim().parse().map_err(|_| {
            GradebookError::Validation(format!("Line {}: marks '{}' is not an integer", line, marks))
        })?;
        let draft = StudentDraft::new(name, marks);
        draft.validate().map_err(|e| match e {
            GradebookError::Validation(msg) => {
                GradebookError::Validation(format!("Line {}: {}", line, msg))
            }
            other => other,
        })?;
        drafts.push(draft);
    }
    Ok(drafts)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordId;

    fn record(id: u64, name: &str, marks: i64) -> StudentRecord {
        StudentRecord::new(RecordId(id), name, marks)
    }

    fn render(records: &[StudentRecord]) -> String {
        String::from_utf8(export_csv(records).expect("export")).expect("utf-8")
    }

    #[test]
    fn empty_export_is_header_only() {
        assert_eq!(render(&[]), "Name,Marks\n");
    }

    #[test]
    fn rows_sorted_descending_with_stable_ties() {
        let records = [record(1, "A", 50), record(2, "B", 90), record(3, "C", 50)];
        assert_eq!(render(&records), "Name,Marks\nB,90\nA,50\nC,50\n");
    }

    #[test]
    fn input_order_is_not_modified() {
        let records = vec![record(1, "A", 10), record(2, "B", 20)];
        let before = records.clone();
        let _ = export_csv(&records).expect("export");
        assert_eq!(records, before);
    }

    #[test]
    fn comma_in_name_is_quoted() {
        let out = render(&[record(1, "Doe, Jane", 70)]);
        assert_eq!(out, "Name,Marks\n\"Doe, Jane\",70\n");
    }

    #[test]
    fn quotes_are_doubled() {
        let out = render(&[record(1, "Ann \"Ace\" Lee", 70)]);
        assert_eq!(out, "Name,Marks\n\"Ann \"\"Ace\"\" Lee\",70\n");
    }

    #[test]
    fn newline_in_name_is_quoted() {
        let out = render(&[record(1, "Line\nBreak", 5)]);
        assert_eq!(out, "Name,Marks\n\"Line\nBreak\",5\n");
    }

    #[test]
    fn negative_marks_render_plainly() {
        assert_eq!(render(&[record(1, "Neg", -3)]), "Name,Marks\nNeg,-3\n");
    }

    #[test]
    fn non_ascii_names_are_utf8() {
        let out = render(&[record(1, "Zoë Ñandú", 88)]);
        assert!(out.contains("Zoë Ñandú,88"));
    }

    #[test]
    fn import_reads_export_back() {
        let records = [record(1, "Doe, Jane", 50), record(2, "Ann \"Ace\"", 90)];
        let drafts = import_csv(&export_csv(&records).expect("export")).expect("import");
        assert_eq!(
            drafts,
            vec![
                StudentDraft::new("Ann \"Ace\"", 90),
                StudentDraft::new("Doe, Jane", 50),
            ]
        );
    }

    #[test]
    fn import_rejects_wrong_header() {
        let result = import_csv(b"Student,Score\nA,1\n");
        assert!(matches!(result, Err(GradebookError::Validation(_))));
    }

    #[test]
    fn import_reports_bad_marks_line() {
        let result = import_csv(b"Name,Marks\nA,1\nB,lots\n");
        match result {
            Err(GradebookError::Validation(msg)) => assert!(msg.starts_with("Line 3"), "{msg}"),
            other => unreachable!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn import_rejects_empty_name() {
        let result = import_csv(b"Name,Marks\n,40\n");
        assert!(matches!(result, Err(GradebookError::Validation(_))));
    }

    #[test]
    fn import_header_only_is_empty() {
        assert!(import_csv(b"Name,Marks\n").expect("import").is_empty());
    }

    #[test]
    fn attachment_metadata() {
        let export = export_attachment(&[record(1, "A", 1)]).expect("export");
        assert_eq!(export.filename, "student_records.csv");
        assert_eq!(export.content_type, "text/csv");
        assert_eq!(
            export.content_disposition(),
            "attachment; filename=\"student_records.csv\""
        );
    }
}
