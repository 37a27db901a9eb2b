//! Correlation of in-flight requests with caller-supplied callbacks.

use crate::transport::{RequestId, TransportError};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Success handler: receives the parsed JSON response document.
pub type SuccessCallback = Box<dyn FnOnce(Value) + Send>;

/// Error handler: receives the transport error and its message.
pub type ErrorCallback = Box<dyn FnOnce(TransportError, String) + Send>;

/// The success/error handler pair for one request.
///
/// Both handlers are `FnOnce`: a pair is consumed by exactly one
/// completion.
#[derive(Default)]
pub struct Callbacks {
    on_success: Option<SuccessCallback>,
    on_error: Option<ErrorCallback>,
}

impl Callbacks {
    /// An empty pair (fire-and-forget).
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a success handler.
    pub fn on_success(mut self, handler: impl FnOnce(Value) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(handler));
        self
    }

    /// Attach an error handler.
    pub fn on_error(
        mut self,
        handler: impl FnOnce(TransportError, String) + Send + 'static,
    ) -> Self {
        self.on_error = Some(Box::new(handler));
        self
    }

    /// True when neither handler is present.
    pub fn is_empty(&self) -> bool {
        self.on_success.is_none() && self.on_error.is_none()
    }
}

/// Tracks the callback pair registered for each in-flight request.
///
/// One entry per outstanding request; the entry is removed by whichever
/// completion arrives first, so a duplicate delivery from the transport
/// layer is a no-op.
#[derive(Default)]
pub struct CallbackRegistry {
    pending: HashMap<RequestId, Callbacks>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the pair for a request. Empty pairs are not stored; their
    /// request completes fire-and-forget.
    pub fn register(&mut self, request_id: RequestId, callbacks: Callbacks) {
        if callbacks.is_empty() {
            return;
        }
        self.pending.insert(request_id, callbacks);
    }

    /// Number of requests with a registered pair.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Route a successful response body to the registered success handler
    /// and drop the entry.
    pub fn resolve_success(&mut self, request_id: RequestId, body: &[u8]) {
        let document = parse_document(body);

        match self.pending.remove(&request_id) {
            Some(callbacks) => {
                if let Some(on_success) = callbacks.on_success {
                    on_success(document);
                } else {
                    debug!(%request_id, "Response completed a request that only registered an error handler");
                }
            }
            None => {
                debug!(%request_id, "Received a response with no matching callback");
            }
        }
    }

    /// Route a transport error to the registered error handler and drop
    /// the entry.
    pub fn resolve_error(&mut self, request_id: RequestId, error: TransportError, message: &str) {
        match self.pending.remove(&request_id) {
            Some(callbacks) => {
                if let Some(on_error) = callbacks.on_error {
                    on_error(error, message.to_string());
                } else {
                    debug!(%request_id, %error, "Error completed a request that only registered a success handler");
                }
            }
            None => {
                debug!(%request_id, %error, message, "Received an error response with no matching callback");
            }
        }
    }
}

/// Parse a response body as JSON, tolerating garbage the way the rest of
/// the client does: an unparseable body becomes a null document.
fn parse_document(body: &[u8]) -> Value {
    match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(err) => {
            warn!(%err, "Response body was not valid JSON");
            Value::Null
        }
    }
}
