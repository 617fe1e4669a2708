//! Flat file storage adapter for TaskStore
//!
//! One task per line:
//!
//! ```text
//! <id> <title>|<description>|<due date>|<category>|<1 or 0>
//! ```
//!
//! Fields are written verbatim. A `|` or newline inside a field is not
//! escaped and will corrupt that line on the next load.

use regex::Regex;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use planner_core::{Task, TaskStore};

use crate::error::{Result, ServerError};

// Regex pattern is validated at compile time - invalid patterns are programming errors
static TASK_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\d+)\s*([^|]*)\|([^|]*)\|([^|]*)\|([^|]*)\|(.+)$")
        .expect("Invalid regex pattern - this is a compile-time constant")
});

/// Flat file storage adapter
pub struct FlatFileStorage {
    path: PathBuf,
}

impl FlatFileStorage {
    /// Create a new storage adapter for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the storage path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load tasks from the file
    ///
    /// A missing file is an empty store. Lines that are not UTF-8, do not
    /// match the record shape, or carry an id with no successor are skipped.
    pub fn load(&self) -> Result<TaskStore> {
        let mut store = TaskStore::new();

        if !self.path.exists() {
            return Ok(store);
        }

        let file = std::fs::File::open(&self.path)
            .map_err(|e| ServerError::io(format!("Failed to open {}", self.path.display()), e))?;
        let reader = BufReader::new(file);

        for (index, line) in reader.split(b'\n').enumerate() {
            let bytes = line?;

            let line = match String::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => {
                    tracing::debug!(line = index + 1, error = %e, "skipping non UTF-8 task line");
                    continue;
                }
            };

            let result =
                parse_task_line(&line).and_then(|task| store.insert(task).map_err(ServerError::from));
            if let Err(e) = result {
                tracing::debug!(line = index + 1, error = %e, "skipping malformed task line");
            }
        }

        Ok(store)
    }

    /// Overwrite the file with every task in the store, in store order
    pub fn save(&self, store: &TaskStore) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(|e| {
                ServerError::storage_with_source(
                    format!("Failed to open {} for writing", self.path.display()),
                    e,
                )
            })?;

        let mut writer = BufWriter::new(file);
        for task in store.list() {
            writeln!(writer, "{}", format_task_line(task))?;
        }
        writer.flush()?;

        Ok(())
    }
}

/// Parse a stored line into a Task
fn parse_task_line(line: &str) -> Result<Task> {
    let caps = TASK_LINE_REGEX
        .captures(line)
        .ok_or_else(|| ServerError::parse(format!("Invalid task format: {}", line)))?;

    let id = caps
        .get(1)
        .ok_or_else(|| ServerError::parse("Missing task ID"))?
        .as_str()
        .parse::<u32>()
        .map_err(|e| ServerError::parse_with_source("Invalid task ID", e))?;

    let field = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or_default();

    Ok(Task::new(field(2))
        .with_id(id)
        .with_description(field(3))
        .with_due_date(field(4))
        .with_category(field(5))
        .with_completed(field(6) == "1"))
}

/// Format a Task as a stored line
fn format_task_line(task: &Task) -> String {
    format!(
        "{} {}|{}|{}|{}|{}",
        task.id,
        task.title,
        task.description,
        task.due_date,
        task.category,
        if task.completed { "1" } else { "0" }
    )
}
