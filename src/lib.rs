//! Planner - a single-process task list served over HTTP
//!
//! The HTTP layer is hand-rolled: [`http`] decodes the raw request,
//! [`server`] routes it against the task store and [`render`] builds the
//! reply. Tasks are kept in a flat file by [`storage`].

pub mod config;
pub mod error;
pub mod http;
pub mod render;
pub mod server;
pub mod storage;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::{bind, serve, Planner};
pub use storage::FlatFileStorage;
