//! Backend API
//!
//! Remote task service contract and its HTTP implementation.

mod http;

use async_trait::async_trait;

use crate::error::SyncResult;
use crate::models::{Task, TaskId};

pub use http::HttpTaskService;

/// Request/response operations against the backend todo collection.
///
/// Implementations hold no state beyond what they need to reach the backend.
/// Futures are `?Send`: everything runs on one cooperative executor.
#[async_trait(?Send)]
pub trait TaskService {
    /// Full collection in server order, `complete` normalized.
    async fn fetch_all(&self) -> SyncResult<Vec<Task>>;

    /// Ask the backend to flip `complete`; returns the authoritative record.
    async fn toggle(&self, id: &TaskId) -> SyncResult<Task>;

    async fn delete(&self, id: &TaskId) -> SyncResult<()>;

    /// Not used by the controller.
    async fn create(&self, body: &str) -> SyncResult<Task>;
}
