//! Rename a season of TV episode files from epguides.com episode data.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod downloader;
pub mod error;
pub mod executor;
pub mod naming;
pub mod rename_engine;
pub mod season;
pub mod tui;
pub mod workflow;

pub use error::{Error, Result};
