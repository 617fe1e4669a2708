//! Planner Core - Pure domain logic for the task planner
//!
//! This crate contains no I/O operations. Persistence and the HTTP
//! surface are handled by the `planner` server crate.

pub mod category;
pub mod date;
pub mod error;
pub mod task;

pub use category::{categorize, FALLBACK_CATEGORY};
pub use date::is_due_soon;
pub use error::{CoreError, Result};
pub use task::{parse_task_id, Task, TaskStore};
