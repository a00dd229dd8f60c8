//! Configuration loading for the reverse proxy.
//!
//! - [`loader`] - reads the YAML config file from disk and validates it

pub mod loader;
