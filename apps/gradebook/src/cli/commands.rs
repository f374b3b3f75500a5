//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands. Every
//! command opens the store once, performs its work and drops the handle.

use crate::api;
use gradebook_core::{
    GradebookError, RecordId, RecordStore, ServiceConfig, SortKey, SortOrder, StatsEngine,
    StoreBackend, StudentDraft, export_csv, import_csv, open_store, sort_records,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum file size for import (10 MB).
const MAX_IMPORT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub database: PathBuf,
    pub backend: StoreBackend,
    pub passing_threshold: i64,
    pub json_mode: bool,
}

impl CommandContext {
    fn open(&self) -> Result<Arc<dyn RecordStore>, GradebookError> {
        open_store(self.backend, &self.database)
    }
}

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

/// Validate output path: the parent directory must exist.
fn validate_output_path(path: &Path) -> Result<PathBuf, GradebookError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let canonical_parent = parent.canonicalize().map_err(|e| {
        GradebookError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    let filename = path
        .file_name()
        .ok_or_else(|| GradebookError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
///
/// The store is opened and initialized before binding; failure there ends
/// the process without serving any request.
pub async fn cmd_server(
    ctx: &CommandContext,
    host: &str,
    port: Option<u16>,
) -> Result<(), GradebookError> {
    let mut config = ServiceConfig::from_env()
        .with_host(host)
        .with_database(&ctx.database)
        .with_backend(ctx.backend)
        .with_passing_threshold(ctx.passing_threshold);
    if let Some(port) = port {
        config = config.with_port(port);
    }

    let store = open_store(config.backend, &config.database)?;

    println!("Gradebook Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:              {}", config.host);
    println!("  Port:              {}", config.port);
    println!("  Backend:           {}", config.backend);
    println!("  Database:          {:?}", config.database);
    println!("  Passing threshold: {}", config.passing_threshold);
    println!();
    println!("Endpoints:");
    println!("  POST   /students      - Add a student");
    println!("  GET    /students      - List students");
    println!("  PUT    /students/{{id}} - Update a student");
    println!("  DELETE /students/{{id}} - Delete a student");
    println!("  GET    /stats         - Statistics");
    println!("  GET    /download      - CSV export");
    println!("  GET    /health        - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config, store).await
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Create the database and its tables.
pub fn cmd_init(ctx: &CommandContext) -> Result<(), GradebookError> {
    let store = ctx.open()?;
    store.initialize()?;
    let count = store.count()?;

    if ctx.json_mode {
        print_json(&serde_json::json!({
            "database": ctx.database.to_string_lossy(),
            "backend": ctx.backend.as_str(),
            "students": count,
        }));
    } else {
        println!("Initialized {:?} ({} students)", ctx.database, count);
    }
    Ok(())
}

// =============================================================================
// LIST COMMAND
// =============================================================================

/// List students.
pub fn cmd_list(
    ctx: &CommandContext,
    sort_by: Option<&str>,
    order: &str,
) -> Result<(), GradebookError> {
    let order: SortOrder = order.parse()?;
    let key = sort_by.map(str::parse::<SortKey>).transpose()?;

    let store = ctx.open()?;
    let mut records = store.list_all()?;
    if let Some(key) = key {
        sort_records(&mut records, key, order);
    }

    if ctx.json_mode {
        let rows: Vec<serde_json::Value> = records
            .iter()
            .map(|r| serde_json::json!({ "id": r.id.0, "name": r.name, "marks": r.marks }))
            .collect();
        print_json(&serde_json::Value::Array(rows));
        return Ok(());
    }

    if records.is_empty() {
        println!("No students");
        return Ok(());
    }

    println!("{:>6}  {:<32}  {:>8}", "ID", "Name", "Marks");
    for record in &records {
        println!("{:>6}  {:<32}  {:>8}", record.id, record.name, record.marks);
    }
    Ok(())
}

// =============================================================================
// ADD / UPDATE / DELETE COMMANDS
// =============================================================================

/// Add a student.
pub fn cmd_add(ctx: &CommandContext, name: String, marks: i64) -> Result<(), GradebookError> {
    let store = ctx.open()?;
    let id = store.insert(&StudentDraft::new(name, marks))?;

    if ctx.json_mode {
        print_json(&serde_json::json!({ "id": id.0 }));
    } else {
        println!("Student added with ID {}", id);
    }
    Ok(())
}

/// Replace a student's name and marks.
pub fn cmd_update(
    ctx: &CommandContext,
    id: u64,
    name: String,
    marks: i64,
) -> Result<(), GradebookError> {
    let store = ctx.open()?;
    if !store.update(RecordId(id), &StudentDraft::new(name, marks))? {
        return Err(GradebookError::NotFound(RecordId(id)));
    }
    println!("Student ID {} updated successfully", id);
    Ok(())
}

/// Delete a student.
pub fn cmd_delete(ctx: &CommandContext, id: u64) -> Result<(), GradebookError> {
    let store = ctx.open()?;
    if !store.delete(RecordId(id))? {
        return Err(GradebookError::NotFound(RecordId(id)));
    }
    println!("Student ID {} deleted successfully", id);
    Ok(())
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Show pass/fail statistics.
pub fn cmd_stats(ctx: &CommandContext) -> Result<(), GradebookError> {
    let store = ctx.open()?;
    let stats = StatsEngine::new(ctx.passing_threshold).compute(&store.marks()?);

    if ctx.json_mode {
        let value = serde_json::to_value(&stats)
            .map_err(|e| GradebookError::Serialization(e.to_string()))?;
        print_json(&value);
        return Ok(());
    }

    println!("Gradebook Statistics");
    println!("====================");
    println!("Passing threshold: {}", ctx.passing_threshold);
    println!();
    println!("Total:   {}", stats.total);
    println!("Pass:    {}", stats.pass);
    println!("Fail:    {}", stats.fail);
    println!("Highest: {}", stats.highest);
    println!("Lowest:  {}", stats.lowest);
    Ok(())
}

// =============================================================================
// EXPORT / IMPORT COMMANDS
// =============================================================================

/// Write the CSV export to a file.
pub fn cmd_export(ctx: &CommandContext, output: &Path) -> Result<(), GradebookError> {
    let validated_output = validate_output_path(output)?;

    let store = ctx.open()?;
    let records = store.list_all()?;
    let data = export_csv(&records)?;

    std::fs::write(&validated_output, &data)
        .map_err(|e| GradebookError::Io(format!("Write export: {}", e)))?;

    println!(
        "Exported {} students ({} bytes) to {:?}",
        records.len(),
        data.len(),
        validated_output
    );
    Ok(())
}

/// Add students from a CSV file.
///
/// Rows are validated before anything is written; a bad row rejects the
/// whole file.
pub fn cmd_import(ctx: &CommandContext, input: &Path) -> Result<(), GradebookError> {
    let metadata = std::fs::metadata(input)
        .map_err(|e| GradebookError::Io(format!("Cannot read '{}': {}", input.display(), e)))?;
    if metadata.len() > MAX_IMPORT_FILE_SIZE {
        return Err(GradebookError::Validation(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_IMPORT_FILE_SIZE
        )));
    }

    let data = std::fs::read(input)
        .map_err(|e| GradebookError::Io(format!("Read import: {}", e)))?;
    let drafts = import_csv(&data)?;

    let store = ctx.open()?;
    for draft in &drafts {
        store.insert(draft)?;
    }

    println!("Imported {} students", drafts.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn context(dir: &Path) -> CommandContext {
        CommandContext {
            database: dir.join("students.redb"),
            backend: StoreBackend::Redb,
            passing_threshold: 33,
            json_mode: true,
        }
    }

    #[test]
    fn add_update_delete_round() {
        let temp = tempdir().expect("temp dir");
        let ctx = context(temp.path());

        cmd_add(&ctx, "Asha".to_string(), 70).expect("add");
        cmd_update(&ctx, 1, "Asha K".to_string(), 75).expect("update");

        let records = ctx.open().expect("open").list_all().expect("list");
        assert_eq!(records[0].name, "Asha K");
        assert_eq!(records[0].marks, 75);

        cmd_delete(&ctx, 1).expect("delete");
        assert!(matches!(
            cmd_delete(&ctx, 1),
            Err(GradebookError::NotFound(RecordId(1)))
        ));
    }

    #[test]
    fn update_missing_is_not_found() {
        let temp = tempdir().expect("temp dir");
        let ctx = context(temp.path());
        let result = cmd_update(&ctx, 7, "Ghost".to_string(), 1);
        assert!(matches!(result, Err(GradebookError::NotFound(RecordId(7)))));
    }

    #[test]
    fn export_then_import_copies_records() {
        let temp = tempdir().expect("temp dir");
        let source = context(temp.path());
        cmd_add(&source, "Doe, Jane".to_string(), 50).expect("add");
        cmd_add(&source, "Bo".to_string(), 90).expect("add");

        let csv_path = temp.path().join("out.csv");
        cmd_export(&source, &csv_path).expect("export");

        let target = CommandContext {
            database: temp.path().join("copy.redb"),
            ..source.clone()
        };
        cmd_import(&target, &csv_path).expect("import");

        let names: Vec<String> = target
            .open()
            .expect("open")
            .list_all()
            .expect("list")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Bo", "Doe, Jane"]);
    }

    #[test]
    fn export_to_missing_directory_fails() {
        let temp = tempdir().expect("temp dir");
        let ctx = context(temp.path());
        let result = cmd_export(&ctx, &temp.path().join("nope").join("out.csv"));
        assert!(matches!(result, Err(GradebookError::Io(_))));
    }

    #[test]
    fn list_rejects_unknown_sort_key() {
        let temp = tempdir().expect("temp dir");
        let ctx = context(temp.path());
        assert!(matches!(
            cmd_list(&ctx, Some("age"), "asc"),
            Err(GradebookError::Validation(_))
        ));
    }
}
