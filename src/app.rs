//! Todo Frontend App
//!
//! Wires configuration, the sync controller and the view store together.

use leptos::prelude::*;
use reactive_stores::Store;

use crate::api::HttpTaskService;
use crate::components::TaskList;
use crate::config::AppConfig;
use crate::context::AppContext;
use crate::store::{store_apply_status, AppState};
use crate::sync::SyncController;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    log::info!("[APP] using backend {}", config.api_base_url);

    let store = Store::new(AppState::default());
    provide_context(store);

    let controller = SyncController::new(
        HttpTaskService::new(config.api_base_url.as_str()),
        config.mutation_policy,
    );
    // Every controller change is mirrored into the store
    controller.subscribe(move |status| store_apply_status(&store, status));

    let ctx = AppContext::new(controller, store);
    provide_context(ctx);

    // Load the collection on mount; drop late results once unmounted
    ctx.load();
    on_cleanup(move || ctx.detach());

    view! {
        <main class="app-layout">
            <TaskList />
        </main>
    }
}
