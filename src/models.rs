//! Frontend Models
//!
//! Data structures matching the backend's todo records.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Opaque task identifier assigned by the backend (wire name `_id`).
///
/// Never parsed or interpreted client-side; only compared and echoed back.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Task data structure (matches backend)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TaskRecord")]
pub struct Task {
    #[serde(rename = "_id")]
    pub id: TaskId,
    pub body: String,
    pub complete: bool,
}

/// Task as the backend stores it.
///
/// The flag is missing on freshly created records. Toggled records carry
/// `completed`, and older ones may still hold a stale `complete` next to it.
#[derive(Deserialize)]
struct TaskRecord {
    #[serde(rename = "_id")]
    id: TaskId,
    body: String,
    #[serde(default)]
    complete: Option<bool>,
    #[serde(default)]
    completed: Option<bool>,
}

impl From<TaskRecord> for Task {
    fn from(record: TaskRecord) -> Self {
        Self {
            id: record.id,
            body: record.body,
            complete: record.completed.or(record.complete).unwrap_or(false),
        }
    }
}

impl Task {
    pub fn new(id: impl Into<String>, body: impl Into<String>, complete: bool) -> Self {
        Self {
            id: TaskId::new(id),
            body: body.into(),
            complete,
        }
    }

    /// Overlay `other`'s fields onto `self`. The id is kept.
    pub fn merged_with(&self, other: &Task) -> Task {
        Task {
            id: self.id.clone(),
            body: other.body.clone(),
            complete: other.complete,
        }
    }
}

/// Immutable view of the collection shared with readers.
pub type Snapshot = Arc<Vec<Task>>;
