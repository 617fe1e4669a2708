//! Task domain model
//!
//! Pure domain logic for the task list with no I/O operations.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::categorize;
use crate::date::is_due_soon;
use crate::error::{CoreError, Result};

/// A single to-do item
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Raw `YYYY-MM-DD` text as submitted, empty when unset
    pub due_date: String,
    /// Assigned once at creation, never recomputed
    pub category: String,
    pub completed: bool,
}

impl Task {
    /// Create a new, incomplete task with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: String::new(),
            due_date: String::new(),
            category: String::new(),
            completed: false,
        }
    }

    /// Builder method to set task ID
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Builder method to set the due date text
    pub fn with_due_date(mut self, due_date: impl Into<String>) -> Self {
        self.due_date = due_date.into();
        self
    }

    /// Builder method to set category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Builder method to set completion status
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Toggle completion status
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }

    /// Incomplete and inside the due-soon window
    pub fn needs_reminder(&self, today: NaiveDate) -> bool {
        !self.completed && is_due_soon(&self.due_date, today)
    }
}

/// In-memory, insertion-ordered list of tasks
///
/// Owns id assignment: ids start at 1, increase strictly and are never
/// handed out twice, even after the task holding one is removed.
/// Persistence is handled by storage adapters in consuming crates.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u32,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create a new empty store
    pub fn new() -> Self {
        TaskStore {
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a task, infer its category and append it
    ///
    /// Fails only when the id counter is exhausted; ids never wrap.
    pub fn add(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
    ) -> Result<&Task> {
        let id = self.next_id;
        self.next_id = id
            .checked_add(1)
            .ok_or(CoreError::IdsExhausted { last: id })?;

        let title = title.into();
        let description = description.into();
        let category = categorize(&title, &description);

        let task = Task::new(title)
            .with_id(id)
            .with_description(description)
            .with_due_date(due_date)
            .with_category(category);

        self.tasks.push(task);
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Append an existing task as-is, e.g. one read back from disk
    ///
    /// The id counter is bumped past the task's id so later `add` calls
    /// never collide with it. A task whose id leaves no room for a
    /// successor is rejected and the store is left unchanged.
    pub fn insert(&mut self, task: Task) -> Result<()> {
        if task.id >= self.next_id {
            self.next_id = task
                .id
                .checked_add(1)
                .ok_or(CoreError::IdsExhausted { last: task.id })?;
        }
        self.tasks.push(task);
        Ok(())
    }

    /// Remove the task with the given id. Returns whether one was found.
    pub fn remove(&mut self, id: u32) -> bool {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(pos) => {
                self.tasks.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Flip the completed flag of the task with the given id. Returns whether one was found.
    pub fn toggle_completed(&mut self, id: u32) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.toggle_completed();
                true
            }
            None => false,
        }
    }

    /// All tasks in insertion order
    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    /// Get a task by ID
    pub fn get(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Id the next `add` will assign
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Count total tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if store is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Tasks ordered for display: incomplete first, otherwise insertion order
    pub fn display_order(&self) -> Vec<&Task> {
        let mut list: Vec<&Task> = self.tasks.iter().collect();
        list.sort_by_key(|t| t.completed);
        list
    }

    /// Incomplete tasks inside the due-soon window, in insertion order
    pub fn due_soon(&self, today: NaiveDate) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.needs_reminder(today)).collect()
    }
}

/// Parse the `id` form field of a mutating request
pub fn parse_task_id(raw: Option<&str>) -> Result<u32> {
    let raw = raw.ok_or_else(|| CoreError::validation("id", "missing task id"))?;
    raw.trim()
        .parse::<u32>()
        .map_err(|e| CoreError::parse_with_source(format!("Invalid task id '{}'", raw), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_creation() {
        let task = Task::new("Test task").with_id(1).with_completed(false);

        assert_eq!(task.id, 1);
        assert_eq!(task.title, "Test task");
        assert!(!task.completed);
        assert!(task.due_date.is_empty());
    }

    #[test]
    fn test_task_toggle() {
        let mut task = Task::new("Test");
        assert!(!task.completed);

        task.toggle_completed();
        assert!(task.completed);

        task.toggle_completed();
        assert!(!task.completed);
    }

    #[test]
    fn test_store_add() {
        let mut store = TaskStore::new();

        let task = store.add("Buy milk", "", "2024-01-01").unwrap();
        assert_eq!(task.id, 1);
        assert_eq!(task.category, "Shopping");
        assert_eq!(task.due_date, "2024-01-01");
        assert!(!task.completed);

        let id2 = store.add("Task 2", "", "").unwrap().id;
        assert_eq!(id2, 2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_ids_never_reused() {
        let mut store = TaskStore::new();

        store.add("Task 1", "", "").unwrap();
        let id2 = store.add("Task 2", "", "").unwrap().id;
        let id3 = store.add("Task 3", "", "").unwrap().id;

        assert!(store.remove(id3));
        assert!(store.remove(id2));

        let id_new = store.add("Task 4", "", "").unwrap().id;
        assert_eq!(id_new, 4);
    }

    #[test]
    fn test_ids_strictly_increase_over_mixed_operations() {
        let mut store = TaskStore::new();
        let mut last = 0;

        for round in 0..20u32 {
            let id = store.add(format!("Task {}", round), "", "").unwrap().id;
            assert!(id > last);
            last = id;
            if round % 3 == 0 {
                store.remove(id);
            }
            if round % 5 == 0 {
                store.remove(1);
            }
        }
    }

    #[test]
    fn test_insert_bumps_counter() {
        let mut store = TaskStore::new();
        store.insert(Task::new("Loaded").with_id(7)).unwrap();
        store.insert(Task::new("Older").with_id(3)).unwrap();

        assert_eq!(store.next_id(), 8);
        assert_eq!(store.add("New", "", "").unwrap().id, 8);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut store = TaskStore::new();
        store.add("Task 1", "", "").unwrap();

        assert!(!store.remove(42));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_toggle_completed() {
        let mut store = TaskStore::new();
        let id = store.add("Task 1", "", "").unwrap().id;

        assert!(store.toggle_completed(id));
        assert!(store.get(id).unwrap().completed);
        assert!(store.toggle_completed(id));
        assert!(!store.get(id).unwrap().completed);
        assert!(!store.toggle_completed(99));
    }

    #[test]
    fn test_insert_rejects_id_without_successor() {
        let mut store = TaskStore::new();
        store.insert(Task::new("Kept").with_id(3)).unwrap();

        let result = store.insert(Task::new("Huge").with_id(u32::MAX));
        assert!(matches!(
            result,
            Err(CoreError::IdsExhausted { last: u32::MAX })
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), 4);
    }

    #[test]
    fn test_add_fails_instead_of_wrapping() {
        let mut store = TaskStore::new();
        store.insert(Task::new("Last").with_id(u32::MAX - 1)).unwrap();

        assert_eq!(store.next_id(), u32::MAX);
        let result = store.add("One too many", "", "");
        assert!(matches!(result, Err(CoreError::IdsExhausted { .. })));
        assert_eq!(store.len(), 1);
        assert_eq!(store.next_id(), u32::MAX);
    }

    #[test]
    fn test_display_order_is_stable() {
        let mut store = TaskStore::new();
        store.add("A", "", "").unwrap();
        store.add("B", "", "").unwrap();
        store.add("C", "", "").unwrap();
        store.add("D", "", "").unwrap();
        store.toggle_completed(1);
        store.toggle_completed(3);

        let titles: Vec<&str> = store
            .display_order()
            .iter()
            .map(|t| t.title.as_str())
            .collect();
        assert_eq!(titles, vec!["B", "D", "A", "C"]);

        // underlying order untouched
        let titles: Vec<&str> = store.list().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_due_soon_skips_completed() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let mut store = TaskStore::new();
        store.add("Soon", "", "2024-05-11").unwrap();
        store.add("Done soon", "", "2024-05-11").unwrap();
        store.add("Later", "", "2024-05-20").unwrap();
        store.add("Undated", "", "").unwrap();
        store.toggle_completed(2);

        let due: Vec<u32> = store.due_soon(today).iter().map(|t| t.id).collect();
        assert_eq!(due, vec![1]);
    }

    #[test]
    fn test_parse_task_id() {
        assert_eq!(parse_task_id(Some("12")).unwrap(), 12);
        assert!(matches!(
            parse_task_id(None),
            Err(CoreError::Validation { .. })
        ));
        assert!(matches!(
            parse_task_id(Some("abc")),
            Err(CoreError::Parse { .. })
        ));
        assert!(parse_task_id(Some("")).is_err());
        assert!(parse_task_id(Some("-1")).is_err());
    }
}
