//! View State Store
//!
//! Reactive mirror of the controller's status, using Leptos reactive_stores
//! for field-level reactivity. Components only read from here; writes come
//! from the controller subscription in `App` and from the context actions.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::models::{Snapshot, TaskId};
use crate::sync::{Phase, SyncStatus};

/// View state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Collection phase (loading indicator / retry affordance)
    pub phase: Phase,
    /// Last cache snapshot (empty until the first successful fetch)
    pub tasks: Snapshot,
    /// Tasks with a mutation in flight or queued
    pub pending: Vec<TaskId>,
    /// Last failed toggle/delete, shown as a banner until dismissed
    pub last_error: Option<String>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Copy a controller status into the store
pub fn store_apply_status(store: &AppStore, status: &SyncStatus) {
    *store.phase().write() = status.phase.clone();
    *store.tasks().write() = status.tasks.clone().unwrap_or_default();
    *store.pending().write() = status.pending.clone();
}

pub fn store_set_error(store: &AppStore, message: Option<String>) {
    *store.last_error().write() = message;
}

pub fn store_phase(store: &AppStore) -> Phase {
    store.phase().get()
}

pub fn store_tasks(store: &AppStore) -> Snapshot {
    store.tasks().get()
}

pub fn store_is_pending(store: &AppStore, id: &TaskId) -> bool {
    store.pending().read().contains(id)
}

pub fn store_last_error(store: &AppStore) -> Option<String> {
    store.last_error().get()
}
