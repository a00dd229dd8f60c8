//! Error types for the reverse proxy core.
//!
//! [`ProxyError`] covers the failure modes a request handler can hit once a
//! request has entered the proxy. Startup-time failures (config load,
//! bind) are reported as plain `Result<_, ConfigError>` / `std::io::Error`
//! and never go through this type.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

/// Failure classification for a single in-flight request.
///
/// Only [`ProxyError::UpstreamUnavailable`] corresponds to the Forwarder's
/// "upstream-failure" outcome and increments `failed_request_count`.
/// [`ProxyError::RouteNotFound`] is the Router's "no match" case and never
/// reaches the Forwarder or updates any metric.
#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("no route matches {path}")]
    RouteNotFound { path: String },

    #[error("upstream unavailable: {reason}")]
    UpstreamUnavailable { reason: String },

    #[error("client aborted the request")]
    ClientAborted,
}

impl ResponseError for ProxyError {
    fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::RouteNotFound { .. } => StatusCode::NOT_FOUND,
            ProxyError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
            ProxyError::ClientAborted => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).finish()
    }
}

/// Failures that can occur while loading and validating the configuration
/// file at startup. Always terminal: the caller logs this and exits 1.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse config file {path} as YAML: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
