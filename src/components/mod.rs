//! UI Components
//!
//! Presentational Leptos components. They render from the store and call
//! back into `AppContext`; none of them holds task state of its own.

mod task_item;
mod task_list;

pub use task_item::TaskItem;
pub use task_list::TaskList;
