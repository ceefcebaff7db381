//! Session notifications emitted towards the UI layer.
//!
//! When the backend rejects a call with 401 the browser-side code tells
//! every open tab that the session is gone. The gateway does not own that
//! broadcast; it reports the event through this port and the embedding
//! application decides how to deliver it.

use std::sync::Arc;

use crate::observability::metrics;

/// Receiver of session events observed while proxying.
pub trait SessionEvents: Send + Sync {
    /// The upstream answered 401 for `path`.
    fn upstream_unauthorized(&self, path: &str, request_id: &str);
}

/// Default sink: a log line and a counter.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSessionEvents;

impl SessionEvents for LoggingSessionEvents {
    fn upstream_unauthorized(&self, path: &str, request_id: &str) {
        tracing::info!(request_id = %request_id, path = %path, "Upstream rejected session");
        metrics::record_upstream_unauthorized();
    }
}

/// Shared handle stored in application state.
pub type SharedSessionEvents = Arc<dyn SessionEvents>;
