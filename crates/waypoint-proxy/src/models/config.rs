//! Configuration data model: [`Configuration`], [`Route`], [`Upstream`].
//!
//! These types are the shape produced by the config loader (see
//! [`crate::config::loader`]) and, once loaded, are treated as immutable for
//! the lifetime of the process.

use serde::Deserialize;

use crate::models::error::ConfigError;

/// Top-level proxy configuration: listener address, metrics path and the
/// ordered route table.
#[derive(Debug, Clone, Deserialize)]
pub struct Configuration {
    pub listen_address: String,

    #[serde(default = "default_metrics_path")]
    pub metrics_path: String,

    pub routes: Vec<Route>,
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

/// A single named route: a request-matching predicate plus its upstream
/// pool and an optional path rewrite.
#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub name: String,
    pub match_path: String,

    #[serde(default)]
    pub match_method: Option<String>,

    pub upstreams: Vec<Upstream>,

    #[serde(default)]
    pub rewrite_path: Option<String>,
}

/// A single upstream origin server.
#[derive(Debug, Clone, Deserialize)]
pub struct Upstream {
    #[serde(default = "default_scheme")]
    pub scheme: String,

    pub host: String,
    pub port: u16,
}

fn default_scheme() -> String {
    "http".to_string()
}

impl Upstream {
    /// The base URL this upstream is reachable at, without a path.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// A valid Prometheus metric name component: `[a-zA-Z_][a-zA-Z0-9_]*`.
fn is_valid_metric_name_component(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl Configuration {
    /// Validates structural and semantic invariants the rest of the proxy
    /// relies on without re-checking. Called once at startup; failure is a
    /// fatal config error, never a panic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.listen_address.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigError::Invalid(format!(
                "listen_address '{}' is not a valid socket address",
                self.listen_address
            )));
        }

        if !self.metrics_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "metrics_path '{}' must start with '/'",
                self.metrics_path
            )));
        }

        if self.routes.is_empty() {
            return Err(ConfigError::Invalid(
                "configuration must declare at least one route".to_string(),
            ));
        }

        let mut seen_names = std::collections::HashSet::new();
        for route in &self.routes {
            route.validate()?;
            if !seen_names.insert(route.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate route name '{}'",
                    route.name
                )));
            }
        }

        Ok(())
    }
}

impl Route {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() || !is_valid_metric_name_component(&self.name) {
            return Err(ConfigError::Invalid(format!(
                "route name '{}' must be a non-empty valid Prometheus metric name component",
                self.name
            )));
        }

        if !self.match_path.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "route '{}': match_path '{}' must start with '/'",
                self.name, self.match_path
            )));
        }

        if let Some(rewrite) = &self.rewrite_path {
            if !rewrite.starts_with('/') {
                return Err(ConfigError::Invalid(format!(
                    "route '{}': rewrite_path '{}' must start with '/'",
                    self.name, rewrite
                )));
            }
        }

        if self.upstreams.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "route '{}' must declare at least one upstream",
                self.name
            )));
        }

        for upstream in &self.upstreams {
            if upstream.scheme != "http" {
                return Err(ConfigError::Invalid(format!(
                    "route '{}': upstream scheme '{}' is not supported, only 'http' is",
                    self.name, upstream.scheme
                )));
            }
        }

        Ok(())
    }

    /// Whether this route matches the given request path and method.
    /// `match_method` absent means "any method".
    pub fn matches(&self, path: &str, method: &str) -> bool {
        if self.match_path != path {
            return false;
        }
        match &self.match_method {
            Some(m) => m.eq_ignore_ascii_case(method),
            None => true,
        }
    }

    /// The path to forward to the upstream: `rewrite_path` if configured,
    /// otherwise the inbound path unchanged.
    pub fn forward_path<'a>(&'a self, inbound_path: &'a str) -> &'a str {
        self.rewrite_path.as_deref().unwrap_or(inbound_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upstream(port: u16) -> Upstream {
        Upstream {
            scheme: "http".to_string(),
            host: "localhost".to_string(),
            port,
        }
    }

    fn route(name: &str) -> Route {
        Route {
            name: name.to_string(),
            match_path: "/index".to_string(),
            match_method: None,
            upstreams: vec![upstream(5000)],
            rewrite_path: None,
        }
    }

    #[test]
    fn valid_configuration_passes() {
        let config = Configuration {
            listen_address: "0.0.0.0:8000".to_string(),
            metrics_path: "/metrics".to_string(),
            routes: vec![route("index")],
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_listen_address() {
        let config = Configuration {
            listen_address: "not-an-address".to_string(),
            metrics_path: "/metrics".to_string(),
            routes: vec![route("index")],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_duplicate_route_names() {
        let config = Configuration {
            listen_address: "0.0.0.0:8000".to_string(),
            metrics_path: "/metrics".to_string(),
            routes: vec![route("index"), route("index")],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_invalid_route_name() {
        let mut r = route("in dex");
        r.name = "in dex".to_string();
        let config = Configuration {
            listen_address: "0.0.0.0:8000".to_string(),
            metrics_path: "/metrics".to_string(),
            routes: vec![r],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_empty_upstreams() {
        let mut r = route("index");
        r.upstreams = vec![];
        let config = Configuration {
            listen_address: "0.0.0.0:8000".to_string(),
            metrics_path: "/metrics".to_string(),
            routes: vec![r],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn exact_path_match_is_strict() {
        let r = route("index");
        assert!(r.matches("/index", "GET"));
        assert!(!r.matches("/index/", "GET"));
        assert!(!r.matches("/indexx", "GET"));
    }

    #[test]
    fn method_match_is_case_insensitive_when_present() {
        let mut r = route("index");
        r.match_method = Some("GET".to_string());
        assert!(r.matches("/index", "get"));
        assert!(!r.matches("/index", "POST"));
    }

    #[test]
    fn absent_method_matches_any() {
        let r = route("index");
        assert!(r.matches("/index", "POST"));
        assert!(r.matches("/index", "DELETE"));
    }

    #[test]
    fn forward_path_prefers_rewrite() {
        let mut r = route("index");
        r.rewrite_path = Some("/index-proxied".to_string());
        assert_eq!(r.forward_path("/index"), "/index-proxied");

        let r2 = route("home");
        assert_eq!(r2.forward_path("/home"), "/home");
    }
}
