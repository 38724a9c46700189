mod app;
mod bridge;
mod config;
mod logging;
mod ui;

pub use app::run_app;
