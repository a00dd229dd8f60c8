//! Request routing: resolves an inbound request to a configured [`Route`].
//!
//! The router is a pure function of the immutable route table and the
//! request's path and method; it holds no state of its own.

use crate::models::config::Route;

/// Scans `routes` in configured order and returns the index of the first
/// one whose `match_path` equals `path` and whose `match_method` is absent
/// or equal to `method`. Query strings must already be stripped from
/// `path` by the caller. The index (rather than a reference) is returned
/// so callers can index the parallel per-route selector and metrics
/// tables by the same position.
pub fn find_route_index(routes: &[Route], path: &str, method: &str) -> Option<usize> {
    routes.iter().position(|route| route.matches(path, method))
}

/// Convenience wrapper over [`find_route_index`] for callers that only
/// need the matched route itself.
pub fn find_route<'a>(routes: &'a [Route], path: &str, method: &str) -> Option<&'a Route> {
    let index = find_route_index(routes, path, method)?;
    Some(&routes[index])
}
