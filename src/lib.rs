//! Taskflow library.
//!
//! A minimal task tracker: a SQLite-backed store, an axum HTTP API and a
//! static browser client. Exported for the binary and integration tests.

pub mod api;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod types;
