mod app;
mod config;
mod effects;
mod render;

pub use app::run_app;
