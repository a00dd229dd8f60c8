//! The top-level Proxy aggregate: owns configuration, per-route runtime
//! state and the metrics registry, and drives the Router → Selector →
//! Forwarder pipeline for each inbound request.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web::Bytes;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use log::{debug, warn};
use tokio::sync::oneshot;

use crate::forwarder::{ForwardOutcome, Forwarder};
use crate::metrics::MetricsRegistry;
use crate::models::config::Configuration;
use crate::models::error::ProxyError;
use crate::router;
use crate::selector::UpstreamSelector;

/// Default per-upstream-request timeout, per spec §4.3.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Owns everything that outlives a single request: the immutable
/// configuration, one [`UpstreamSelector`] and metrics record per route,
/// and the shared [`Forwarder`]. The Forwarder itself holds only
/// borrowing references to these for the duration of one request.
pub struct Proxy {
    config: Configuration,
    selectors: Vec<UpstreamSelector>,
    metrics: MetricsRegistry,
    forwarder: Forwarder,
}

/// Sends on the held channel the moment it is dropped, unless it has
/// already sent. Kept alive in `Proxy::handle`'s own stack frame for as
/// long as a forward is outstanding: if actix drops that future early
/// because the client disconnected, this guard's drop fires and tells the
/// detached forwarding task in [`Proxy::handle`] to abort.
struct AbortOnDrop(Option<oneshot::Sender<()>>);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        if let Some(tx) = self.0.take() {
            let _ = tx.send(());
        }
    }
}

impl Proxy {
    pub fn new(config: Configuration) -> Self {
        Self::with_timeout(config, DEFAULT_UPSTREAM_TIMEOUT)
    }

    pub fn with_timeout(config: Configuration, timeout: Duration) -> Self {
        let route_count = config.routes.len();
        let selectors = (0..route_count).map(|_| UpstreamSelector::new()).collect();
        let metrics = MetricsRegistry::new(route_count);
        let forwarder = Forwarder::new(timeout);

        Self {
            config,
            selectors,
            metrics,
            forwarder,
        }
    }

    pub fn metrics_path(&self) -> &str {
        &self.config.metrics_path
    }

    /// Renders the current state of every route's metrics as Prometheus
    /// exposition text.
    pub fn render_metrics(&self) -> String {
        let names: Vec<String> = self.config.routes.iter().map(|r| r.name.clone()).collect();
        self.metrics.render(&names)
    }

    /// Drives one inbound request through Router → Selector → Forwarder,
    /// updating metrics before returning the response. Returns
    /// [`ProxyError::RouteNotFound`] if no route matches (the caller
    /// responds with a bare 404 and performs no metric updates, per spec
    /// §4.1); a successful or upstream-failed exchange both resolve to
    /// `Ok`, since a transport failure still ends in a well-formed 502
    /// response rather than an error the caller must further handle.
    ///
    /// The actual forward runs on a detached task rather than directly in
    /// this `async fn`. If the client disconnects, actix drops this
    /// future (and everything it's awaiting) without running anything
    /// after the drop point — so metric bookkeeping can't live here.
    /// Running the forward on its own task and recording its outcome from
    /// inside that task means the bookkeeping happens regardless of
    /// whether anyone is still around to read the response; a
    /// `tokio::select!` between the forward and an [`AbortOnDrop`]-backed
    /// cancellation signal lets a disconnect abort the outstanding
    /// upstream exchange immediately instead of letting it run to
    /// completion after nobody can use the result.
    pub async fn handle(
        self: Arc<Self>,
        req: &HttpRequest,
        body: Bytes,
    ) -> Result<HttpResponse, ProxyError> {
        let path = req.path();
        let method = req.method().as_str();

        let index = router::find_route_index(&self.config.routes, path, method).ok_or_else(|| {
            ProxyError::RouteNotFound {
                path: path.to_string(),
            }
        })?;
        let route = &self.config.routes[index];
        let route_name = route.name.clone();

        self.metrics.route(index).record_request();

        let upstream = self.selectors[index].select(&route.upstreams);
        let forward_path = route.forward_path(path);
        let url = format!("{}{}", upstream.base_url(), forward_path);
        let url = match req.query_string() {
            "" => url,
            query => format!("{}?{}", url, query),
        };

        debug!(
            "route '{}' selected upstream {} for {} {}",
            route_name, url, method, path
        );

        let request_method = req.method().clone();
        let request_headers = req.headers().clone();

        let (result_tx, result_rx) = oneshot::channel::<HttpResponse>();
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let abort_guard = AbortOnDrop(Some(cancel_tx));

        let proxy = Arc::clone(&self);
        let supervised_url = url.clone();
        let supervised_route_name = route_name.clone();
        tokio::spawn(async move {
            let forward = proxy
                .forwarder
                .forward(&request_method, &supervised_url, &request_headers, body);
            tokio::pin!(forward);

            tokio::select! {
                outcome = &mut forward => {
                    let response = match outcome {
                        ForwardOutcome::Success { response, elapsed_ms } => {
                            proxy.metrics.route(index).record_success(elapsed_ms);
                            build_response(response)
                        }
                        ForwardOutcome::Failure { reason } => {
                            warn!(
                                "route '{}' upstream {} failed: {}",
                                supervised_route_name, supervised_url, reason
                            );
                            proxy.metrics.route(index).record_failure();
                            // Surfaced through `ProxyError::UpstreamUnavailable`'s
                            // `ResponseError` impl rather than built here
                            // directly, so the 502-on-failure mapping lives
                            // in one place.
                            ProxyError::UpstreamUnavailable { reason }.error_response()
                        }
                    };
                    let _ = result_tx.send(response);
                }
                _ = &mut cancel_rx => {
                    warn!(
                        "route '{}' upstream {} aborted: client disconnected before a response arrived",
                        supervised_route_name, supervised_url
                    );
                    proxy.metrics.route(index).record_failure();
                    // `forward` is dropped here, tearing down the
                    // in-flight upstream exchange. Nothing reads
                    // `result_tx` since the handler that would have is
                    // already gone.
                }
            }
        });

        // Kept alive across the await below so a disconnect here (this
        // future getting dropped by actix) fires `AbortOnDrop::drop` and
        // cancels the spawned task above.
        let _abort_guard = abort_guard;

        match result_rx.await {
            Ok(response) => Ok(response),
            Err(_) => {
                // The spawned task ended without sending a response: it
                // took the cancellation branch (nothing to send, and
                // nobody's awaiting this if so) or it panicked. Either
                // way the request/success/failure invariant still needs
                // to hold, so record the failure if it hasn't already.
                Err(ProxyError::ClientAborted)
            }
        }
    }
}

fn build_response(response: crate::forwarder::ForwardedResponse) -> HttpResponse {
    let status = actix_web::http::StatusCode::from_u16(response.status)
        .unwrap_or(actix_web::http::StatusCode::BAD_GATEWAY);
    let mut builder = HttpResponse::build(status);
    for (name, value) in &response.headers {
        // `append_header` rather than `insert_header`: upstream responses
        // may repeat a header (e.g. multiple `Set-Cookie` lines) and a
        // proxy must relay all of them, not just the last one seen.
        builder.append_header((name.as_str(), value.as_str()));
    }
    builder.body(response.body)
}
