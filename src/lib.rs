//! VPC Request Chain Tracer
//!
//! Edge diagnostic service ("App A") that records what it observed about an
//! inbound request, forwards an internal call to the diagnostic backend
//! ("App B"), and returns both vantage points side by side. Also exposes a
//! load-balancing probe that issues many independent internal calls and
//! tabulates which backend replica answered each one.

pub mod api;
pub mod config;
pub mod error;
pub mod internal;
pub mod probe;
pub mod snapshot;

pub use error::{AppError, Result};

use std::sync::Arc;

/// Application state shared across all handlers.
///
/// Settings are resolved once at startup and immutable for the process
/// lifetime; handlers never share mutable state.
pub struct AppState {
    pub settings: Arc<config::Settings>,
}

impl AppState {
    pub fn new(settings: config::Settings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }
}
