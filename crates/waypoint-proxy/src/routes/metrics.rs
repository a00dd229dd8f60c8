//! HTTP handler exposing per-route metrics in Prometheus text format.

use actix_web::http::Method;
use actix_web::{web, HttpRequest, HttpResponse};

use crate::gateway::Proxy;

/// Renders the current metrics of every configured route. Registered on
/// the listener at `metrics_path` with `web::route()` (all methods), ahead
/// of the catch-all proxy handler, so this fixed path always takes
/// precedence over any configured route whose `match_path` happens to
/// coincide with it, regardless of the request's method (spec §4.4). Only
/// `GET` renders metrics; every other method gets a bare 405 without
/// touching the registry, matching the rest of `metrics_path`'s contract
/// of never being forwarded anywhere.
pub async fn metrics_endpoint(proxy: web::Data<Proxy>, req: HttpRequest) -> HttpResponse {
    if req.method() != Method::GET {
        return HttpResponse::MethodNotAllowed()
            .insert_header(("Allow", "GET"))
            .finish();
    }

    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(proxy.render_metrics())
}
