//! Task List Component
//!
//! Loading indicator, load failure with retry, or the task rows.

use leptos::prelude::*;

use crate::components::TaskItem;
use crate::context::AppContext;
use crate::store::{store_last_error, store_phase, store_tasks, use_app_store};
use crate::sync::Phase;

#[component]
pub fn TaskList() -> impl IntoView {
    let store = use_app_store();
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <div class="task-list">
            {move || match store_phase(&store) {
                Phase::Uninitialized | Phase::Loading => {
                    view! { <div class="spinner">"Loading..."</div> }.into_any()
                }
                Phase::Failed(e) => {
                    view! {
                        <div class="load-error">
                            <span>{format!("Could not load tasks: {}", e)}</span>
                            <button class="retry-btn" on:click=move |_| ctx.retry()>"Retry"</button>
                        </div>
                    }
                    .into_any()
                }
                Phase::Ready => view! { <TaskRows /> }.into_any(),
            }}
        </div>
    }
}

#[component]
fn TaskRows() -> impl IntoView {
    let store = use_app_store();
    let ctx = use_context::<AppContext>().expect("AppContext should be provided");

    view! {
        <h1 class="title">"Today's Tasks"</h1>

        {move || store_last_error(&store).map(|message| view! {
            <div class="error-banner">
                <span>{message}</span>
                <button class="dismiss-btn" on:click=move |_| ctx.dismiss_error()>"×"</button>
            </div>
        })}

        <Show
            when=move || !store_tasks(&store).is_empty()
            fallback=|| view! { <p class="empty-state">"All tasks completed!"</p> }
        >
            // Keyed on the flag too, so a reconciled toggle re-renders the row
            <For
                each=move || store_tasks(&store).as_ref().clone()
                key=|task| (task.id.clone(), task.complete)
                children=move |task| view! { <TaskItem task=task /> }
            />
        </Show>
    }
}
