//! Interactive menu loop
//!
//! Reads one menu choice per iteration and dispatches it to the task store.
//! Every error is reported inline and the loop keeps going; only the exit
//! choice (or end of input) ends it.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::debug;

use super::output::Palette;
use super::render;
use crate::domain::{
    normalize_category, parse_date, parse_number, parse_optional_date, search, FilterKind,
    Priority, SortKey, Task, TaskEdit, DATE_FORMAT,
};
use crate::storage::{export, Config, ExportFormat, TaskStore};

/// Menu entries in display order: (key, label)
const MENU: [(&str, &str); 10] = [
    ("1", "View tasks"),
    ("2", "Add a task"),
    ("3", "Remove a task"),
    ("4", "Edit a task"),
    ("5", "Mark done/undone"),
    ("6", "Search tasks"),
    ("7", "Filter tasks"),
    ("8", "Sort tasks"),
    ("9", "Export tasks"),
    ("0", "Exit"),
];

/// What the loop should do after a menu choice
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// The interactive shell, generic over its input and output streams
pub struct Shell<'a, R, W> {
    store: &'a mut TaskStore,
    config: &'a Config,
    palette: Palette,
    input: R,
    out: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(store: &'a mut TaskStore, config: &'a Config, palette: Palette, input: R, out: W) -> Self {
        Self {
            store,
            config,
            palette,
            input,
            out,
        }
    }

    /// Runs the menu loop until the user exits or input ends
    pub fn run(&mut self) -> io::Result<()> {
        if let Some(warning) = self.store.load_warning() {
            let line = self.palette.warning(format!("Warning: {}", warning));
            writeln!(self.out, "{}", line)?;
        }

        loop {
            self.show_menu()?;

            let choice = match self.prompt("Enter your choice (0-9): ")? {
                Some(choice) => choice,
                None => break,
            };
            debug!(choice = %choice, "menu choice");

            if self.dispatch(&choice)? == Flow::Exit {
                return self.farewell();
            }
        }

        self.farewell()
    }

    fn dispatch(&mut self, choice: &str) -> io::Result<Flow> {
        match choice.to_lowercase().as_str() {
            "1" => self.view()?,
            "2" => self.add()?,
            "3" => self.remove()?,
            "4" => self.edit()?,
            "5" => self.toggle()?,
            "6" => self.search()?,
            "7" => self.filter()?,
            "8" => self.sort()?,
            "9" => self.export()?,
            "0" | "q" | "quit" | "exit" => return Ok(Flow::Exit),
            _ => self.error("Invalid choice. Please choose 0-9.")?,
        }
        Ok(Flow::Continue)
    }

    // --- I/O helpers -------------------------------------------------------

    /// Prints `label` and reads one trimmed line. `None` means end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.out, "{}", label)?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.out)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn success(&mut self, message: &str) -> io::Result<()> {
        let line = self.palette.success(message);
        writeln!(self.out, "{}", line)
    }

    fn error(&mut self, message: impl std::fmt::Display) -> io::Result<()> {
        let line = self.palette.error(message);
        writeln!(self.out, "{}", line)
    }

    fn warning(&mut self, message: &str) -> io::Result<()> {
        let line = self.palette.warning(message);
        writeln!(self.out, "{}", line)
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        let line = self.palette.heading(title);
        writeln!(self.out, "\n{}", line)
    }

    fn farewell(&mut self) -> io::Result<()> {
        self.success("Goodbye!")
    }

    fn show_menu(&mut self) -> io::Result<()> {
        let title = self.palette.bold(self.palette.heading("===== To-Do List Menu ====="));
        writeln!(self.out, "\n{}", title)?;
        for (key, label) in MENU {
            writeln!(self.out, "{}. {}", key, label)?;
        }
        let rule = self.palette.bold(self.palette.heading("============================"));
        writeln!(self.out, "{}", rule)
    }

    fn numbered_list<T: std::fmt::Display>(&mut self, items: impl IntoIterator<Item = T>) -> io::Result<()> {
        for (i, item) in items.into_iter().enumerate() {
            writeln!(self.out, "  {}. {}", i + 1, item)?;
        }
        Ok(())
    }

    /// Prints the list; returns false if it is empty
    fn view_list(&mut self) -> io::Result<bool> {
        match render::task_table(self.store.all(), self.palette) {
            Some(table) => {
                self.heading("--- Your To-Do List ---")?;
                write!(self.out, "{}", table)?;
                writeln!(self.out, "{}", render::summary(self.store.all()))?;
                Ok(true)
            }
            None => {
                self.warning("\nNo tasks found. Add a new task to get started!")?;
                Ok(false)
            }
        }
    }

    /// Asks for a task number and checks it against the list
    fn prompt_task_number(&mut self, action: &str) -> io::Result<Option<i64>> {
        if !self.view_list()? {
            return Ok(None);
        }

        let Some(input) = self.prompt(&format!("\nEnter task number to {}: ", action))? else {
            return Ok(None);
        };

        let checked = parse_number(&input).and_then(|n| self.store.get(n).map(|_| n));
        match checked {
            Ok(number) => Ok(Some(number)),
            Err(e) => {
                self.error(e)?;
                Ok(None)
            }
        }
    }

    // --- menu actions ------------------------------------------------------

    fn view(&mut self) -> io::Result<()> {
        self.view_list().map(|_| ())
    }

    fn add(&mut self) -> io::Result<()> {
        self.heading("Add a new task")?;

        let Some(description) = self.prompt("Task description: ")? else {
            return Ok(());
        };
        let task = match Task::new(description) {
            Ok(task) => task,
            Err(e) => return self.error(e),
        };

        writeln!(self.out, "\nSelect priority:")?;
        self.numbered_list(Priority::ALL)?;
        let Some(priority_input) = self.prompt("Priority (blank for Medium): ")? else {
            return Ok(());
        };
        let priority = if priority_input.is_empty() {
            Priority::default()
        } else {
            match priority_input.parse() {
                Ok(priority) => priority,
                Err(_) => {
                    self.warning("Invalid priority. Defaulting to Medium.")?;
                    Priority::default()
                }
            }
        };

        let Some(category) = self.prompt_category(None)? else {
            return Ok(());
        };

        let Some(due_input) = self.prompt("\nDue date (YYYY-MM-DD) or leave empty: ")? else {
            return Ok(());
        };
        let due_date = if due_input.is_empty() {
            None
        } else {
            match parse_date(&due_input) {
                Ok(date) => Some(date),
                Err(e) => return self.error(format!("{}. Task not added.", e)),
            }
        };

        let task = task
            .with_priority(priority)
            .with_category(&category)
            .with_due_date(due_date);

        match self.store.add(task) {
            Ok(task) => {
                let message = format!("\nTask '{}' added successfully!", task.description);
                self.success(&message)
            }
            Err(e) => self.error(e),
        }
    }

    /// Category by menu number or free text
    ///
    /// With `current = None` (adding), blank input and bad numbers fall back to
    /// the default category. With `Some(current)` (editing), blank keeps the
    /// current value and a bad number is reported and ignored, returned as
    /// an empty string.
    fn prompt_category(&mut self, current: Option<&str>) -> io::Result<Option<String>> {
        writeln!(self.out, "\nSelect category:")?;
        let categories = self.config.categories.clone();
        self.numbered_list(&categories)?;

        let label = match current {
            Some(current) => format!("Category number or name ({}): ", current),
            None => format!("Category number or name (blank for {}): ", self.config.default_category),
        };
        let Some(input) = self.prompt(&label)? else {
            return Ok(None);
        };

        if input.is_empty() {
            return Ok(Some(match current {
                Some(_) => String::new(),
                None => self.config.default_category.clone(),
            }));
        }

        if let Some(category) = self.config.category_by_number(&input) {
            return Ok(Some(category.to_string()));
        }

        if input.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Some(match current {
                Some(current) => {
                    self.error(format!("Invalid category number. Keeping {}.", current))?;
                    String::new()
                }
                None => {
                    let fallback = self.config.default_category.clone();
                    self.warning(&format!("Invalid category. Defaulting to {}.", fallback))?;
                    fallback
                }
            }));
        }

        Ok(Some(normalize_category(&input)))
    }

    fn remove(&mut self) -> io::Result<()> {
        let Some(number) = self.prompt_task_number("remove")? else {
            return Ok(());
        };

        match self.store.remove(number) {
            Ok(removed) => self.success(&format!("\nTask '{}' removed!", removed.description)),
            Err(e) => self.error(e),
        }
    }

    fn edit(&mut self) -> io::Result<()> {
        let Some(number) = self.prompt_task_number("edit")? else {
            return Ok(());
        };
        let current = match self.store.get(number) {
            Ok(task) => task.clone(),
            Err(e) => return self.error(e),
        };

        self.heading("Editing task (leave blank to keep the current value)")?;
        let mut edit = TaskEdit::default();

        let Some(description) = self.prompt(&format!("Description ({}): ", current.description))? else {
            return Ok(());
        };
        if !description.is_empty() {
            edit.description = Some(description);
        }

        let Some(priority) = self.prompt(&format!("Priority [1 High, 2 Medium, 3 Low] ({}): ", current.priority))? else {
            return Ok(());
        };
        if !priority.is_empty() {
            match priority.parse::<Priority>() {
                Ok(priority) => edit.priority = Some(priority),
                Err(e) => self.error(format!("{}. Keeping {}.", e, current.priority))?,
            }
        }

        let Some(category) = self.prompt_category(Some(&current.category))? else {
            return Ok(());
        };
        if !category.is_empty() {
            edit.category = Some(category);
        }

        let current_due = current
            .due_date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "none".to_string());
        let Some(due) = self.prompt(&format!("Due date YYYY-MM-DD or 'none' ({}): ", current_due))? else {
            return Ok(());
        };
        if !due.is_empty() {
            match parse_optional_date(&due) {
                Ok(date) => edit.due_date = Some(date),
                Err(e) => self.error(format!("{}. Keeping {}.", e, current_due))?,
            }
        }

        if edit.is_empty() {
            return self.warning("\nNothing changed.");
        }

        match self.store.edit(number, &edit) {
            Ok(_) => self.success("\nTask updated successfully!"),
            Err(e) => self.error(e),
        }
    }

    fn toggle(&mut self) -> io::Result<()> {
        let Some(number) = self.prompt_task_number("mark done/undone")? else {
            return Ok(());
        };

        match self.store.toggle(number) {
            Ok(task) if task.completed => self.success("\nTask marked as completed!"),
            Ok(_) => self.warning("\nTask marked as not completed."),
            Err(e) => self.error(e),
        }
    }

    fn search(&mut self) -> io::Result<()> {
        let Some(keyword) = self.prompt("\nEnter keyword to search: ")? else {
            return Ok(());
        };

        let table = render::table(search(self.store.all(), &keyword), self.palette);
        match table {
            Some(table) => {
                self.heading(&format!("Search results for '{}':", keyword))?;
                write!(self.out, "{}", table)
            }
            None => self.error("\nNo matching tasks found."),
        }
    }

    fn filter(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nFilter by:")?;
        self.numbered_list(FilterKind::ALL.iter().map(FilterKind::label))?;

        let Some(choice) = self.prompt("\nChoose option: ")? else {
            return Ok(());
        };
        let kind: FilterKind = match choice.parse() {
            Ok(kind) => kind,
            Err(e) => return self.error(e),
        };

        let value = if kind.needs_value() {
            let label = match kind {
                FilterKind::Priority => "Priority (High/Medium/Low): ".to_string(),
                FilterKind::Category => format!("Category ({}): ", self.config.categories.join(", ")),
                FilterKind::DueBy => "Due on or before (YYYY-MM-DD): ".to_string(),
                _ => "Keyword: ".to_string(),
            };
            match self.prompt(&label)? {
                Some(value) => Some(value),
                None => return Ok(()),
            }
        } else {
            None
        };

        let filter = match kind.with_value(value.as_deref()) {
            Ok(filter) => filter,
            Err(e) => return self.error(e),
        };

        let table = render::table(crate::domain::filter(self.store.all(), &filter), self.palette);
        match table {
            Some(table) => {
                self.heading(&format!("Tasks matching {}:", filter))?;
                write!(self.out, "{}", table)
            }
            None => self.warning("\nNo tasks match this filter."),
        }
    }

    fn sort(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nSort by:")?;
        self.numbered_list(SortKey::ALL.iter().map(SortKey::label))?;

        let Some(choice) = self.prompt("\nChoose option: ")? else {
            return Ok(());
        };
        let key: SortKey = match choice.parse() {
            Ok(key) => key,
            Err(_) => return self.error("Invalid sorting option."),
        };

        match self.store.sort(key) {
            Ok(()) => self.success(&format!("\nTasks sorted by {}!", key.label().to_lowercase())),
            Err(e) => self.error(e),
        }
    }

    fn export(&mut self) -> io::Result<()> {
        writeln!(self.out, "\nExport as:")?;
        self.numbered_list(["JSON", "CSV"])?;

        let Some(choice) = self.prompt("\nChoose option: ")? else {
            return Ok(());
        };
        let format = match choice.to_lowercase().as_str() {
            "1" | "json" => ExportFormat::Json,
            "2" | "csv" => ExportFormat::Csv,
            _ => return self.error("Invalid export format."),
        };

        let default_path = match format {
            ExportFormat::Json => "tasks_export.json",
            ExportFormat::Csv => "tasks_export.csv",
        };
        let Some(path) = self.prompt(&format!("File path (blank for {}): ", default_path))? else {
            return Ok(());
        };
        let path = if path.is_empty() {
            PathBuf::from(default_path)
        } else {
            PathBuf::from(path)
        };

        match export(self.store.all(), &path, format) {
            Ok(()) => {
                let message = format!(
                    "\nExported {} task(s) to {}",
                    self.store.len(),
                    path.display()
                );
                self.success(&message)
            }
            Err(e) => self.error(format!("Export failed: {}", e)),
        }
    }
}
