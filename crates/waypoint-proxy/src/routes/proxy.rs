//! Catch-all HTTP handler: drives every non-metrics request through the
//! Proxy aggregate's Router → Selector → Forwarder pipeline.

use actix_web::{web, HttpRequest, HttpResponse};

use crate::gateway::Proxy;
use crate::models::error::ProxyError;

/// Looks up a route for the request and forwards it if one matches.
/// `ProxyError`'s `ResponseError` impl turns an unmatched route into a
/// bare 404 with no metric updates, per spec §4.1/§6.
pub async fn proxy_handler(
    proxy: web::Data<Proxy>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ProxyError> {
    proxy.into_inner().handle(&req, body).await
}

/// Registers the catch-all proxy route. The metrics endpoint must be
/// registered separately and before this, since it is not a configurable
/// route but a fixed listener path.
pub fn configure_proxy(cfg: &mut web::ServiceConfig) {
    cfg.default_service(web::route().to(proxy_handler));
}
