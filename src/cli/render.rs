//! Text rendering of tasks
//!
//! Pure string builders shared by the interactive shell and one-shot commands.

use crossterm::style::Color;

use super::output::Palette;
use crate::domain::{Hit, Priority, Task, DATE_FORMAT};

const CATEGORY_WIDTH: usize = 10;

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncate_at = max_len.saturating_sub(3);
        let truncated: String = s.chars().take(truncate_at).collect();
        format!("{}...", truncated)
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

/// Status marker: `[x]` for done, `[ ]` for pending
pub fn status_marker(task: &Task, palette: Palette) -> String {
    if task.completed {
        palette.success("[x]")
    } else {
        palette.error("[ ]")
    }
}

/// One table row. Columns are padded before coloring so escape codes don't break alignment.
pub fn task_row(number: usize, task: &Task, palette: Palette) -> String {
    let due = task
        .due_date
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "{:>3}. {} {} {:<width$} {:<10} {}",
        number,
        status_marker(task, palette),
        palette.paint(format!("{:<6}", task.priority), priority_color(task.priority)),
        truncate_str(&task.category, CATEGORY_WIDTH),
        due,
        task.description,
        width = CATEGORY_WIDTH
    )
}

/// Table header matching [`task_row`]
pub fn table_header(palette: Palette) -> String {
    let header = format!(
        "{:>3}  {} {:<6} {:<width$} {:<10} {}",
        "#",
        "   ",
        "PRIO",
        "CATEGORY",
        "DUE",
        "TASK",
        width = CATEGORY_WIDTH
    );
    palette.bold(header)
}

/// Renders a full table for a list of hits, or `None` if there are none
pub fn table<'a>(hits: impl IntoIterator<Item = Hit<'a>>, palette: Palette) -> Option<String> {
    let rows: Vec<String> = hits
        .into_iter()
        .map(|hit| task_row(hit.number, hit.task, palette))
        .collect();

    if rows.is_empty() {
        return None;
    }

    let mut out = table_header(palette);
    out.push('\n');
    out.push_str(&"-".repeat(60));
    out.push('\n');
    for row in rows {
        out.push_str(&row);
        out.push('\n');
    }
    Some(out)
}

/// Renders every task in list order
pub fn task_table(tasks: &[Task], palette: Palette) -> Option<String> {
    table(
        tasks
            .iter()
            .enumerate()
            .map(|(i, task)| Hit { number: i + 1, task }),
        palette,
    )
}

/// Counts shown under the full list
pub fn summary(tasks: &[Task]) -> String {
    let done = tasks.iter().filter(|t| t.completed).count();
    format!(
        "{} task(s): {} done, {} pending",
        tasks.len(),
        done,
        tasks.len() - done
    )
}
