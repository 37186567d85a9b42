//! Todo Frontend Entry Point

mod api;
mod app;
mod cache;
mod components;
mod config;
mod context;
mod error;
mod logging;
mod models;
mod store;
mod sync;

use app::App;
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();
    let config = config::AppConfig::from_env();
    logging::init(config.log_level);
    mount_to_body(move || {
        let config = config.clone();
        view! { <App config=config /> }
    });
}
