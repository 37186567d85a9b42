//! Task Item Component
//!
//! A single task row. Completion is rendered straight from the cached
//! record; there is no local flag to drift from the server.

use leptos::prelude::*;

use crate::context::AppContext;
use crate::models::Task;
use crate::store::{store_is_pending, use_app_store};

#[component]
pub fn TaskItem(task: Task) -> impl IntoView {
    let store = use_app_store();
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    let Task { id, body, complete } = task;
    let toggle_id = id.clone();
    let delete_id = id.clone();
    let pending = move || store_is_pending(&store, &id);
    let delete_pending = pending.clone();
    let row_class = if complete { "task-row completed" } else { "task-row" };

    view! {
        <div class=row_class>
            <span class="task-body">{body}</span>
            {if complete {
                view! { <span class="badge done">"Done"</span> }.into_any()
            } else {
                view! { <span class="badge in-progress">"In Progress"</span> }.into_any()
            }}

            <button
                class="toggle-btn"
                disabled=pending
                on:click=move |_| ctx.toggle(toggle_id.clone())
            >
                {if complete { "✔" } else { "○" }}
            </button>

            <button
                class="delete-btn"
                disabled=delete_pending
                on:click=move |_| ctx.delete(delete_id.clone())
            >
                "×"
            </button>
        </div>
    }
}
