//! Export of the task list to external files
//!
//! JSON exports use the same record schema as the backing file. CSV exports
//! have one header row and one row per task, in list order.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::info;

use super::file::StorageError;
use super::json::to_json;
use crate::domain::{Task, CREATED_FORMAT, DATE_FORMAT};

/// Header row of CSV exports
pub const CSV_HEADER: [&str; 6] = ["task", "completed", "priority", "due_date", "category", "created"];

/// Export file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    /// Guesses the format from a file extension, defaulting to JSON
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => ExportFormat::Csv,
            _ => ExportFormat::Json,
        }
    }
}

/// Writes `tasks` to `path` in the given format
pub fn export(tasks: &[Task], path: &Path, format: ExportFormat) -> Result<(), StorageError> {
    match format {
        ExportFormat::Json => export_json(tasks, path),
        ExportFormat::Csv => export_csv(tasks, path),
    }
}

/// Writes the tasks as a formatted JSON array
pub fn export_json(tasks: &[Task], path: &Path) -> Result<(), StorageError> {
    let json = to_json(tasks)?;
    fs::write(path, json).map_err(|e| StorageError::io(path, e))?;

    info!(path = %path.display(), count = tasks.len(), "exported tasks as JSON");
    Ok(())
}

/// Writes the tasks as CSV
pub fn export_csv(tasks: &[Task], path: &Path) -> Result<(), StorageError> {
    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    write_csv(tasks, file).map_err(|source| StorageError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    info!(path = %path.display(), count = tasks.len(), "exported tasks as CSV");
    Ok(())
}

/// Writes the CSV document for `tasks`: a header row, then one row per task
pub fn write_csv<W: io::Write>(tasks: &[Task], out: W) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_HEADER)?;

    for task in tasks {
        let due = task
            .due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();

        writer.write_record([
            task.description.clone(),
            task.completed.to_string(),
            task.priority.to_string(),
            due,
            task.category.clone(),
            task.created_at().format(CREATED_FORMAT).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{parse_date, Priority};
    use chrono::NaiveDateTime;
    use tempfile::TempDir;

    fn sample() -> Vec<Task> {
        let created = NaiveDateTime::parse_from_str("2025-01-15 10:30:00", CREATED_FORMAT).unwrap();
        let mut done = Task::new("Send invoice").unwrap().with_created_at(created);
        done.toggle();
        vec![
            Task::new("Buy eggs, milk")
                .unwrap()
                .with_priority(Priority::High)
                .with_category("shopping")
                .with_due_date(Some(parse_date("2025-01-20").unwrap()))
                .with_created_at(created),
            done,
        ]
    }

    fn to_csv(tasks: &[Task]) -> String {
        let mut out = Vec::new();
        write_csv(tasks, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn csv_has_header_and_rows_in_order() {
        let csv = to_csv(&sample());
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], CSV_HEADER.join(","));
        assert_eq!(
            lines[1],
            "\"Buy eggs, milk\",false,High,2025-01-20,Shopping,2025-01-15 10:30:00"
        );
        assert_eq!(
            lines[2],
            "Send invoice,true,Medium,,Personal,2025-01-15 10:30:00"
        );
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn quotes_and_line_breaks_are_escaped() {
        let tasks = vec![
            Task::new("say \"hi\"").unwrap(),
            Task::new("two\nlines").unwrap(),
        ];
        let csv = to_csv(&tasks);

        assert!(csv.contains("\n\"say \"\"hi\"\"\",false,"));
        assert!(csv.contains("\n\"two\nlines\",false,"));
    }

    #[test]
    fn json_export_matches_backing_schema() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let tasks = sample();

        export(&tasks, &path, ExportFormat::Json).unwrap();

        let parsed: Vec<Task> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed, tasks);
    }

    #[test]
    fn csv_export_writes_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");

        export(&sample(), &path, ExportFormat::Csv).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with(&CSV_HEADER.join(",")));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("out.csv");

        let err = export_csv(&sample(), &path).unwrap_err();
        assert!(matches!(err, StorageError::Io { .. }));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("a.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("a.json")), ExportFormat::Json);
        assert_eq!(ExportFormat::from_path(Path::new("noext")), ExportFormat::Json);
    }
}
