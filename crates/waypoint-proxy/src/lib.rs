//! # waypoint-proxy
//!
//! A configurable HTTP reverse proxy: a single listener maps inbound
//! requests to one or more upstream origin servers according to a
//! declarative routing configuration, forwards the request, relays the
//! response, and exposes per-route operational metrics in the Prometheus
//! text exposition format.
//!
//! ## Core pipeline
//!
//! ```text
//! listener -> router -> selector -> forwarder -> (response, metrics update)
//! ```
//!
//! - **[`router`]** resolves an inbound request to a configured route by
//!   exact path (and optional method) match. Pure function of config.
//! - **[`selector`]** holds the round-robin cursor for a route's upstream
//!   pool and picks the next upstream for each request.
//! - **[`forwarder`]** performs the outbound HTTP exchange and classifies
//!   the outcome as success or upstream-failure.
//! - **[`metrics`]** holds the four per-route series (`request_count`,
//!   `successful_request_count`, `failed_request_count`,
//!   `last_response_time`) and renders them as Prometheus text.
//! - **[`gateway`]** ties the above into the [`gateway::Proxy`] aggregate
//!   that owns configuration, runtime state and the metrics registry for
//!   the process lifetime.
//!
//! ## Module organization
//!
//! - **[`config`]** - configuration data model, file loading and validation
//! - **[`models`]** - shared data model and error types
//! - **[`router`]** - request-to-route resolution
//! - **[`selector`]** - per-route round-robin upstream selection
//! - **[`forwarder`]** - outbound HTTP exchange and outcome classification
//! - **[`metrics`]** - per-route counters/gauge and Prometheus rendering
//! - **[`gateway`]** - the top-level `Proxy` aggregate
//! - **[`routes`]** - HTTP handlers wired onto the actix-web listener
//! - **[`logs`]** - structured logging setup

pub mod config;
pub mod forwarder;
pub mod gateway;
pub mod logs;
pub mod metrics;
pub mod models;
pub mod router;
pub mod routes;
pub mod selector;
