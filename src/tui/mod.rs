//! Terminal preview of a rename plan.

pub mod app;
pub mod events;
pub mod models;
pub mod rendering;

pub use events::run_preview;
