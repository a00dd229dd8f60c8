//! Logging configuration for the reverse proxy.
//!
//! - [`logger`] - structured, color-aware `env_logger` setup

pub mod logger;
