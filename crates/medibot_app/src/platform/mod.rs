//! Terminal front-end: configuration, effect execution and rendering.
mod app;
mod config;
mod effects;
mod input;
mod render;

pub use app::run_app;
