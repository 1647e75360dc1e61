mod api;
mod app;
mod browser;
mod chart;
mod components;
mod config;
mod controller;
mod error;
mod logging;
mod model;
mod pages;
mod view_model;

use leptos::prelude::*;

use app::App;
use config::AppConfig;

fn main() {
    console_error_panic_hook::set_once();

    let config = AppConfig::load();
    logging::init(&config.log_level);
    tracing::info!("Starting shift report (api: {})", config.api_base);

    leptos::mount::mount_to_body(move || view! { <App config=config.clone() /> });
}
