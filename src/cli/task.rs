//! One-shot task commands

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::output::Output;
use super::render;
use crate::domain::{
    parse_date, parse_optional_date, FilterKind, Hit, Priority, SortKey, Task, TaskEdit,
};
use crate::storage::{export, Config, ExportFormat, TaskStore};

/// A task together with its 1-based position, as printed in JSON mode
#[derive(Serialize)]
struct NumberedTask<'a> {
    number: usize,
    #[serde(flatten)]
    task: &'a Task,
}

impl<'a> From<Hit<'a>> for NumberedTask<'a> {
    fn from(hit: Hit<'a>) -> Self {
        Self {
            number: hit.number,
            task: hit.task,
        }
    }
}

/// Resolves a category typed on the command line: a menu number or a name
fn resolve_category(config: &Config, input: &str) -> String {
    config
        .category_by_number(input)
        .map(String::from)
        .unwrap_or_else(|| input.to_string())
}

pub fn add(
    store: &mut TaskStore,
    config: &Config,
    output: &Output,
    description: &str,
    priority: Option<Priority>,
    category: Option<&str>,
    due: Option<&str>,
) -> Result<()> {
    let due_date = due.map(parse_date).transpose()?;
    let category = match category {
        Some(c) => resolve_category(config, c),
        None => config.default_category.clone(),
    };

    let task = Task::new(description)?
        .with_priority(priority.unwrap_or_default())
        .with_category(&category)
        .with_due_date(due_date);

    let number = store.len() + 1;
    let task = store.add(task)?;

    if output.is_json() {
        output.data(&NumberedTask { number, task });
    } else {
        output.success(&format!("Task '{}' added as #{}", task.description, number));
    }
    Ok(())
}

pub fn list(store: &TaskStore, output: &Output) -> Result<()> {
    let tasks = store.all();

    if output.is_json() {
        let items: Vec<NumberedTask> = tasks
            .iter()
            .enumerate()
            .map(|(i, task)| NumberedTask { number: i + 1, task })
            .collect();
        output.data(&items);
        return Ok(());
    }

    match render::task_table(tasks, output.palette()) {
        Some(table) => {
            output.text(&table);
            output.text(&format!("{}\n", render::summary(tasks)));
        }
        None => output.text("No tasks found. Add a new task to get started!\n"),
    }
    Ok(())
}

pub fn remove(store: &mut TaskStore, output: &Output, number: i64) -> Result<()> {
    let removed = store.remove(number)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "removed": number,
            "task": removed,
        }));
    } else {
        output.success(&format!("Task '{}' removed!", removed.description));
    }
    Ok(())
}

pub fn toggle(store: &mut TaskStore, output: &Output, number: i64) -> Result<()> {
    let task = store.toggle(number)?;

    if output.is_json() {
        output.data(&NumberedTask { number: number as usize, task });
    } else if task.completed {
        output.success(&format!("Task #{} marked as completed!", number));
    } else {
        output.success(&format!("Task #{} marked as not completed.", number));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn edit(
    store: &mut TaskStore,
    config: &Config,
    output: &Output,
    number: i64,
    description: Option<String>,
    priority: Option<Priority>,
    category: Option<&str>,
    due: Option<&str>,
) -> Result<()> {
    let edit = TaskEdit {
        description,
        priority,
        category: category.map(|c| resolve_category(config, c)),
        due_date: due.map(parse_optional_date).transpose()?,
    };

    if edit.is_empty() {
        anyhow::bail!("Nothing to change: pass at least one of --description, --priority, --category or --due");
    }

    let task = store.edit(number, &edit)?;

    if output.is_json() {
        output.data(&NumberedTask { number: number as usize, task });
    } else {
        output.success(&format!("Task #{} updated successfully!", number));
    }
    Ok(())
}

fn print_hits(output: &Output, hits: Vec<Hit>, empty_message: &str) {
    if output.is_json() {
        let items: Vec<NumberedTask> = hits.into_iter().map(NumberedTask::from).collect();
        output.data(&items);
        return;
    }

    match render::table(hits, output.palette()) {
        Some(table) => output.text(&table),
        None => output.text(&format!("{}\n", empty_message)),
    }
}

pub fn search(store: &TaskStore, output: &Output, keyword: &str) -> Result<()> {
    let hits = crate::domain::search(store.all(), keyword);
    print_hits(output, hits, "No matching tasks found.");
    Ok(())
}

pub fn filter(store: &TaskStore, output: &Output, kind: FilterKind, value: Option<&str>) -> Result<()> {
    let filter = kind.with_value(value)?;
    let hits = crate::domain::filter(store.all(), &filter);
    print_hits(output, hits, "No tasks match this filter.");
    Ok(())
}

pub fn sort(store: &mut TaskStore, output: &Output, key: SortKey) -> Result<()> {
    store.sort(key)?;

    if output.is_json() {
        let items: Vec<NumberedTask> = store
            .all()
            .iter()
            .enumerate()
            .map(|(i, task)| NumberedTask { number: i + 1, task })
            .collect();
        output.data(&items);
    } else {
        output.success(&format!("Tasks sorted by {}!", key.label().to_lowercase()));
    }
    Ok(())
}

pub fn export_to(store: &TaskStore, output: &Output, path: &Path, format: Option<ExportFormat>) -> Result<()> {
    let format = format.unwrap_or_else(|| ExportFormat::from_path(path));
    export(store.all(), path, format)
        .with_context(|| format!("Failed to export tasks to {}", path.display()))?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "exported": store.len(),
            "path": path.display().to_string(),
        }));
    } else {
        output.success(&format!("Exported {} task(s) to {}", store.len(), path.display()));
    }
    Ok(())
}
