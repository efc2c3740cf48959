//! CLI integration tests for the todo binary
//!
//! Every test runs in its own temporary directory with an isolated config
//! location, so no user configuration leaks in.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the todo binary, rooted in `dir`
fn todo_cmd(dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("todo"));
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("TODO_FILE")
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn add(dir: &Path, args: &[&str]) {
    todo_cmd(dir).arg("add").args(args).assert().success();
}

fn read_tasks(dir: &Path) -> serde_json::Value {
    let content = fs::read_to_string(dir.join("tasks.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

// =============================================================================
// One-shot Commands
// =============================================================================

#[test]
fn test_list_empty() {
    let dir = TempDir::new().unwrap();

    todo_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found"));
}

#[test]
fn test_add_then_list() {
    let dir = TempDir::new().unwrap();

    todo_cmd(dir.path())
        .args(["add", "Buy milk", "--priority", "high", "--category", "shopping", "--due", "2025-07-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 'Buy milk' added as #1"));

    todo_cmd(dir.path())
        .arg("view")
        .assert()
        .success()
        .stdout(predicate::str::contains("  1. [ ] High   Shopping   2025-07-01 Buy milk"))
        .stdout(predicate::str::contains("1 task(s): 0 done, 1 pending"));

    let tasks = read_tasks(dir.path());
    assert_eq!(tasks[0]["task"], "Buy milk");
    assert_eq!(tasks[0]["priority"], "High");
    assert_eq!(tasks[0]["category"], "Shopping");
    assert_eq!(tasks[0]["due_date"], "2025-07-01");
    assert_eq!(tasks[0]["completed"], false);
}

#[test]
fn test_add_rejects_empty_description() {
    let dir = TempDir::new().unwrap();

    todo_cmd(dir.path())
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be empty"));

    assert!(!dir.path().join("tasks.json").exists());
}

#[test]
fn test_add_rejects_bad_date() {
    let dir = TempDir::new().unwrap();

    todo_cmd(dir.path())
        .args(["add", "Dentist", "--due", "2025-02-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_toggle_and_filter() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["First"]);
    add(dir.path(), &["Second"]);

    todo_cmd(dir.path())
        .args(["toggle", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task #2 marked as completed!"));

    todo_cmd(dir.path())
        .args(["filter", "completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  2. [x]"))
        .stdout(predicate::str::contains("First").not());

    todo_cmd(dir.path())
        .args(["filter", "pending"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  1. [ ]"))
        .stdout(predicate::str::contains("Second").not());
}

#[test]
fn test_filter_by_priority_requires_value() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["First"]);

    todo_cmd(dir.path())
        .args(["filter", "priority"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("needs a value"));

    todo_cmd(dir.path())
        .args(["filter", "priority", "low"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks match this filter."));
}

#[test]
fn test_remove_out_of_range() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["Only task"]);

    todo_cmd(dir.path())
        .args(["remove", "5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid task number 5"));

    todo_cmd(dir.path())
        .args(["remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 'Only task' removed!"));

    assert_eq!(read_tasks(dir.path()), serde_json::json!([]));
}

#[test]
fn test_edit_fields() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["Essay", "--due", "2025-03-03"]);

    todo_cmd(dir.path())
        .args(["edit", "1", "--description", "History essay", "--priority", "3", "--due", "none"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Task #1 updated successfully!"));

    let tasks = read_tasks(dir.path());
    assert_eq!(tasks[0]["task"], "History essay");
    assert_eq!(tasks[0]["priority"], "Low");
    assert_eq!(tasks[0]["due_date"], serde_json::Value::Null);
}

#[test]
fn test_search_is_case_insensitive() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["Buy milk"]);
    add(dir.path(), &["Walk dog"]);
    add(dir.path(), &["buy bread"]);

    todo_cmd(dir.path())
        .args(["search", "BUY"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  1. [ ]"))
        .stdout(predicate::str::contains("  3. [ ]"))
        .stdout(predicate::str::contains("Walk dog").not());
}

#[test]
fn test_sort_by_priority_persists() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["low one", "-p", "low"]);
    add(dir.path(), &["high one", "-p", "high"]);
    add(dir.path(), &["medium one"]);

    todo_cmd(dir.path())
        .args(["sort", "priority"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tasks sorted by priority!"));

    let tasks = read_tasks(dir.path());
    let order: Vec<_> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["task"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(order, ["high one", "medium one", "low one"]);
}

#[test]
fn test_sort_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();

    todo_cmd(dir.path())
        .args(["sort", "colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown sort option"));
}

#[test]
fn test_export_csv_and_json() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["Say \"hi\", then leave", "-c", "work"]);

    todo_cmd(dir.path())
        .args(["export", "out.csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 task(s)"));

    let csv = fs::read_to_string(dir.path().join("out.csv")).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("task,completed,priority,due_date,category,created"));
    assert!(lines
        .next()
        .unwrap()
        .starts_with("\"Say \"\"hi\"\", then leave\",false,Medium,,Work,"));

    todo_cmd(dir.path())
        .args(["export", "backup.dat", "--as", "json"])
        .assert()
        .success();

    let exported: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("backup.dat")).unwrap()).unwrap();
    assert_eq!(exported, read_tasks(dir.path()));
}

#[test]
fn test_json_output_format() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["Walk"]);

    let output = todo_cmd(dir.path())
        .args(["--format", "json", "list"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(items[0]["number"], 1);
    assert_eq!(items[0]["task"], "Walk");
    assert_eq!(items[0]["category"], "Personal");
}

// =============================================================================
// Files and Configuration
// =============================================================================

#[test]
fn test_corrupt_file_warns_and_starts_empty() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), "{ definitely not a task list").unwrap();

    todo_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("Warning:"))
        .stdout(predicate::str::contains("No tasks found"));
}

#[test]
fn test_invalid_utf8_file_warns_and_shell_starts() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), [0x5b, 0xff, 0xfe, 0x5d]).unwrap();

    todo_cmd(dir.path())
        .write_stdin("1\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Warning:"))
        .stdout(predicate::str::contains("No tasks found"))
        .stdout(predicate::str::contains("Goodbye!"));
}

#[test]
fn test_blank_description_in_file_is_not_loaded() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("tasks.json"), r#"[{"task": ""}]"#).unwrap();

    todo_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stderr(predicate::str::contains("cannot be empty"))
        .stdout(predicate::str::contains("No tasks found"));
}

#[test]
fn test_legacy_task_file_without_new_fields() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("tasks.json"),
        r#"[{"task": "Old task", "completed": true, "due_date": "None"}]"#,
    )
    .unwrap();

    todo_cmd(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("[x] Medium Personal   -          Old task"));
}

#[test]
fn test_lines_storage_format() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("todo.txt"), "Water plants|0\nPay bills|1\n").unwrap();

    todo_cmd(dir.path())
        .args(["--storage", "lines", "--file", "todo.txt", "toggle", "1"])
        .assert()
        .success();

    let content = fs::read_to_string(dir.path().join("todo.txt")).unwrap();
    assert_eq!(content, "Water plants|1\nPay bills|1\n");
}

#[test]
fn test_project_config_sets_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("todo.toml"),
        "tasks_file = \"my-tasks.json\"\ndefault_category = \"errands\"\n",
    )
    .unwrap();

    add(dir.path(), &["Post office"]);

    let content = fs::read_to_string(dir.path().join("my-tasks.json")).unwrap();
    let tasks: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(tasks[0]["category"], "Errands");
}

#[test]
fn test_unknown_config_key_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("todo.toml"), "colour = false\n").unwrap();

    todo_cmd(dir.path())
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

// =============================================================================
// Interactive Shell
// =============================================================================

#[test]
fn test_shell_add_and_view() {
    let dir = TempDir::new().unwrap();

    todo_cmd(dir.path())
        .write_stdin("2\nBook flights\n1\n1\n2025-08-01\n1\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Task 'Book flights' added successfully!"))
        .stdout(predicate::str::contains("  1. [ ] High   Work       2025-08-01 Book flights"))
        .stdout(predicate::str::contains("Goodbye!"));

    let tasks = read_tasks(dir.path());
    assert_eq!(tasks[0]["task"], "Book flights");
}

#[test]
fn test_shell_reports_errors_and_continues() {
    let dir = TempDir::new().unwrap();
    add(dir.path(), &["Only task"]);

    todo_cmd(dir.path())
        .arg("shell")
        .write_stdin("3\nabc\n5\n9\nx\n5\n1\nq\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter a valid number"))
        .stdout(predicate::str::contains("Invalid task number 9"))
        .stdout(predicate::str::contains("Invalid choice"))
        .stdout(predicate::str::contains("Task marked as completed!"));

    assert_eq!(read_tasks(dir.path())[0]["completed"], true);
}

#[test]
fn test_shell_exits_on_end_of_input() {
    let dir = TempDir::new().unwrap();

    todo_cmd(dir.path())
        .write_stdin("1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks found"))
        .stdout(predicate::str::contains("Goodbye!"));
}
