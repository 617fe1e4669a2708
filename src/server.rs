//! Request dispatch and the connection loop
//!
//! Connections are handled strictly one after another: accept, one read,
//! decode, dispatch, write, close, then the next accept. The task store
//! is owned by the loop, so every mutation and the save that follows it
//! happen without interleaving with another request.

use chrono::{Local, NaiveDate};
use std::future::Future;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use planner_core::{parse_task_id, TaskStore};

use crate::error::{Result, ServerError};
use crate::http::{parse_request, Method, ParsedRequest};
use crate::render::{self, Response};
use crate::storage::FlatFileStorage;

/// Routes that change the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mutation {
    Add,
    Delete,
    Complete,
}

impl Mutation {
    fn from_path(path: &str) -> Option<Self> {
        match path {
            "/add" => Some(Self::Add),
            "/delete" => Some(Self::Delete),
            "/complete" => Some(Self::Complete),
            _ => None,
        }
    }
}

/// Outcome of a mutation before persistence
enum Outcome {
    Changed,
    Unchanged,
}

/// The task store together with the file it is saved to
pub struct Planner {
    store: TaskStore,
    storage: FlatFileStorage,
}

impl Planner {
    /// Wrap an already loaded store
    pub fn new(store: TaskStore, storage: FlatFileStorage) -> Self {
        Self { store, storage }
    }

    /// Load the store from `storage`
    pub fn open(storage: FlatFileStorage) -> Result<Self> {
        let store = storage.load()?;
        Ok(Self::new(store, storage))
    }

    /// Current tasks
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Backing storage
    pub fn storage(&self) -> &FlatFileStorage {
        &self.storage
    }

    /// Route a decoded request and produce its response
    ///
    /// `today` drives the due-soon reminder on the rendered page.
    pub fn handle(&mut self, request: &ParsedRequest, today: NaiveDate) -> Response {
        match (&request.method, Mutation::from_path(&request.path)) {
            (Method::Get, _) => render::page(&self.store, today),
            (Method::Post, Some(mutation)) => self.handle_mutation(mutation, request),
            _ => render::not_found(),
        }
    }

    fn handle_mutation(&mut self, mutation: Mutation, request: &ParsedRequest) -> Response {
        // no header/body separator: nothing to apply
        if request.form.is_none() {
            return render::redirect("/");
        }

        match self.apply(mutation, request) {
            Ok(Outcome::Unchanged) => render::redirect("/"),
            Ok(Outcome::Changed) => match self.commit() {
                Ok(()) => render::redirect("/"),
                Err(e) => {
                    tracing::error!(
                        path = %self.storage.path().display(),
                        error = %e,
                        "failed to save tasks, in-memory change kept"
                    );
                    render::server_error("Failed to save tasks")
                }
            },
            Err(e) if e.is_client_error() => render::bad_request(&e.to_string()),
            Err(e) => {
                tracing::error!(error = %e, "failed to apply request");
                render::server_error("Failed to apply request")
            }
        }
    }

    fn apply(&mut self, mutation: Mutation, request: &ParsedRequest) -> Result<Outcome> {
        let changed = match mutation {
            Mutation::Add => {
                let task = self.store.add(
                    request.field_or_empty("title"),
                    request.field_or_empty("description"),
                    request.field_or_empty("dueDate"),
                )?;
                tracing::info!(id = task.id, category = %task.category, "task added");
                true
            }
            Mutation::Delete => {
                let id = parse_task_id(request.field("id"))?;
                self.store.remove(id)
            }
            Mutation::Complete => {
                let id = parse_task_id(request.field("id"))?;
                self.store.toggle_completed(id)
            }
        };

        Ok(if changed {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        })
    }

    fn commit(&self) -> Result<()> {
        self.storage.save(&self.store)
    }
}

/// Bind the listening socket
pub async fn bind(address: &str) -> Result<TcpListener> {
    TcpListener::bind(address)
        .await
        .map_err(|e| ServerError::bind(address, e))
}

/// Accept and answer connections one at a time until `shutdown` resolves
pub async fn serve(
    listener: TcpListener,
    planner: &mut Planner,
    buffer_size: usize,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("shutting down");
                return Ok(());
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((mut stream, peer)) => {
                        if let Err(e) = handle_connection(&mut stream, planner, buffer_size).await {
                            tracing::warn!(%peer, error = %e, "connection failed");
                        }
                    }
                    Err(e) => tracing::error!(error = %e, "failed to accept connection"),
                }
            }
        }
    }
}

/// Serve a single connection with one fixed-size read
async fn handle_connection(
    stream: &mut TcpStream,
    planner: &mut Planner,
    buffer_size: usize,
) -> Result<()> {
    let mut buffer = vec![0u8; buffer_size];
    let n = stream
        .read(&mut buffer)
        .await
        .map_err(|e| ServerError::io("Failed to read request", e))?;

    if n == 0 {
        tracing::debug!("connection closed without a request");
        return Ok(());
    }

    let request = parse_request(&buffer[..n]);
    let response = planner.handle(&request, Local::now().date_naive());
    tracing::debug!(
        method = %request.method,
        path = %request.path,
        status = response.status,
        "handled request"
    );

    stream
        .write_all(&response.to_bytes())
        .await
        .map_err(|e| ServerError::io("Failed to write response", e))?;
    stream
        .shutdown()
        .await
        .map_err(|e| ServerError::io("Failed to close connection", e))?;

    Ok(())
}
