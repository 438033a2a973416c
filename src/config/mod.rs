//! Configuration management

pub mod settings;

pub use settings::{InternalServiceConfig, LoggingConfig, ServerConfig, Settings};
