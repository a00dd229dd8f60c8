//! Forwards an inbound request to a selected upstream and classifies the
//! outcome as success or upstream-failure.

use std::time::{Duration, Instant};

use actix_web::http::header::HeaderMap;
use actix_web::http::Method;
use actix_web::web::Bytes;

/// Headers that apply only to a single transport hop and must never be
/// relayed by a proxy, per RFC 7230 §6.1.
const HOP_BY_HOP_HEADERS: [&str; 8] = [
    "connection",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailers",
];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP_HEADERS.contains(&name.to_ascii_lowercase().as_str())
}

/// The response relayed back to the client on a successful exchange.
pub struct ForwardedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// The result of a single forwarding attempt.
pub enum ForwardOutcome {
    /// Any response was obtained from the upstream, including 4xx/5xx.
    Success {
        response: ForwardedResponse,
        elapsed_ms: u64,
    },
    /// No response could be obtained (connect refused, DNS failure,
    /// timeout, reset, malformed response).
    Failure { reason: String },
}

/// Performs outbound HTTP exchanges on behalf of inbound requests.
///
/// Single-attempt semantics: on any transport failure the Forwarder does
/// not retry on another upstream. One client is built per process and
/// reused across requests for connection pooling, matching the teacher's
/// upstream-client lifecycle.
pub struct Forwarder {
    client: reqwest::Client,
}

impl Forwarder {
    /// `timeout` bounds the connect+read time of a single outbound
    /// request; the spec default is 30 seconds.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client builds with static configuration");
        Self { client }
    }

    /// Issues `method url` to the upstream, copying `headers` and `body`
    /// minus hop-by-hop headers, and relays the result.
    pub async fn forward(
        &self,
        method: &Method,
        url: &str,
        headers: &HeaderMap,
        body: Bytes,
    ) -> ForwardOutcome {
        let start = Instant::now();

        let reqwest_method = match reqwest::Method::from_bytes(method.as_str().as_bytes()) {
            Ok(m) => m,
            Err(e) => {
                return ForwardOutcome::Failure {
                    reason: format!("unsupported method {}: {}", method, e),
                }
            }
        };

        let mut builder = self.client.request(reqwest_method, url);
        for (name, value) in headers.iter() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            if let Ok(value_str) = value.to_str() {
                builder = builder.header(name.as_str(), value_str);
            }
        }
        builder = builder.body(body.to_vec());

        let response = match builder.send().await {
            Ok(response) => response,
            Err(err) => return ForwardOutcome::Failure { reason: err.to_string() },
        };

        let status = response.status().as_u16();
        let out_headers = response
            .headers()
            .iter()
            .filter(|(name, _)| !is_hop_by_hop(name.as_str()))
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        match response.bytes().await {
            Ok(body_bytes) => {
                let elapsed_ms = start.elapsed().as_millis() as u64;
                ForwardOutcome::Success {
                    response: ForwardedResponse {
                        status,
                        headers: out_headers,
                        body: Bytes::from(body_bytes),
                    },
                    elapsed_ms,
                }
            }
            Err(err) => ForwardOutcome::Failure { reason: err.to_string() },
        }
    }
}
