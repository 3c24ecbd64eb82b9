//! Process-wide resource setup.
//!
//! The logger and the shared HTTP client are created once per run and handed
//! to everything that needs them; no algorithm code builds its own.

mod client;
mod logger;

pub use client::init_client;
pub use logger::init_logger_with;
