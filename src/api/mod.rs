//! HTTP API for tasks.
//!
//! Serves the task routes plus the static browser client from the
//! configured directory.

mod payload;
mod server;

pub use payload::Payload;
pub use server::{AppState, ServerHandle, build_router, start_server};
