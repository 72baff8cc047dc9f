//! Project Notes - Projects and notes HTTP service
//!
//! Serves projects and their notes from an in-memory repository, reading
//! through a generic TTL cache with key namespacing, bounded capacity and
//! lifecycle events.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::{spawn_sweep_task, SweepHandle};
