//! Application Context
//!
//! Controller-backed actions provided to components via Leptos Context API.

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpTaskService;
use crate::error::SyncError;
use crate::models::TaskId;
use crate::store::{store_set_error, AppStore};
use crate::sync::SyncController;

pub type TodoController = SyncController<HttpTaskService>;

/// App-wide handle provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// The controller is `Rc`-based, so it lives in local arena storage
    controller: StoredValue<TodoController, LocalStorage>,
    store: AppStore,
}

impl AppContext {
    pub fn new(controller: TodoController, store: AppStore) -> Self {
        Self {
            controller: StoredValue::new_local(controller),
            store,
        }
    }

    fn controller(&self) -> Option<TodoController> {
        self.controller.try_get_value()
    }

    /// Fetch the collection unless it is already loaded
    pub fn load(&self) {
        let Some(controller) = self.controller() else { return };
        spawn_local(async move {
            if let Err(e) = controller.load().await {
                log::debug!("[APP] load finished with: {}", e);
            }
        });
    }

    /// Refetch after a failed load
    pub fn retry(&self) {
        let Some(controller) = self.controller() else { return };
        spawn_local(async move {
            if let Err(e) = controller.reload().await {
                log::debug!("[APP] reload finished with: {}", e);
            }
        });
    }

    pub fn toggle(&self, id: TaskId) {
        let Some(controller) = self.controller() else { return };
        let store = self.store;
        spawn_local(async move {
            let result = controller.request_toggle(&id).await.map(|_| ());
            report(&store, "toggle", &id, result);
        });
    }

    pub fn delete(&self, id: TaskId) {
        let Some(controller) = self.controller() else { return };
        let store = self.store;
        spawn_local(async move {
            let result = controller.request_delete(&id).await;
            report(&store, "delete", &id, result);
        });
    }

    pub fn dismiss_error(&self) {
        store_set_error(&self.store, None);
    }

    /// Stop applying results; called when the view is torn down
    pub fn detach(&self) {
        if let Some(controller) = self.controller() {
            controller.detach();
        }
    }
}

fn report(store: &AppStore, action: &str, id: &TaskId, result: Result<(), SyncError>) {
    match result {
        Ok(()) => {}
        // Nobody is left to show it to.
        Err(SyncError::Detached) => {}
        Err(e) => {
            log::warn!("[APP] {} of task {} failed: {}", action, id, e);
            store_set_error(store, Some(format!("Could not {} task: {}", action, e)));
        }
    }
}
