//! Per-route upstream selection via round-robin.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::config::Upstream;

/// Round-robin selection state for a single route's upstream pool.
///
/// The cursor is an atomic counter rather than a mutex-guarded field, so
/// concurrent selections never contend on a lock in the hot path. Each
/// selection atomically reads-and-increments the cursor and indexes into
/// `upstreams` modulo its length.
#[derive(Debug, Default)]
pub struct UpstreamSelector {
    cursor: AtomicUsize,
}

impl UpstreamSelector {
    pub fn new() -> Self {
        Self {
            cursor: AtomicUsize::new(0),
        }
    }

    /// Returns the next upstream in `upstreams`. Never fails: `upstreams`
    /// is guaranteed non-empty by [`crate::models::config::Configuration::validate`].
    pub fn select<'a>(&self, upstreams: &'a [Upstream]) -> &'a Upstream {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % upstreams.len();
        &upstreams[index]
    }
}
