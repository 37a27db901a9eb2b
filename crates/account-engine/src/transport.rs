//! The HTTP transport seam.
//!
//! The account manager never talks to the network directly: it hands an
//! [`OutboundRequest`] to a [`Transport`] and later receives a
//! [`TransportEvent`] for it. [`HttpTransport`] is the production
//! implementation; tests substitute a recording mock.

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error};
use url::Url;
use uuid::Uuid;

/// Identifies one submitted request across its lifetime.
pub type RequestId = Uuid;

/// HTTP method for an outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Get,
    Post,
    Put,
    Delete,
}

/// A fully built request handed to the transport.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub url: Url,
    pub operation: Operation,
    /// Content-Type header for requests that carry a body.
    pub content_type: Option<String>,
    pub body: Option<Vec<u8>>,
}

/// Network-level failure reported by the transport.
///
/// HTTP responses are delivered as successful outcomes whatever their
/// status, so OAuth error documents reach the grant handler; these
/// variants only cover failures where no response was produced at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection refused")]
    ConnectionRefused,

    #[error("transport failure: {0}")]
    Other(String),
}

/// Outcome of one submitted request.
#[derive(Debug, Clone)]
pub enum TransportOutcome {
    /// A response arrived. `url` is the effective URL after redirects.
    Success { url: Url, body: Vec<u8> },
    /// No response was produced.
    Error {
        error: TransportError,
        message: String,
    },
}

/// Completion event for a submitted request, delivered exactly once.
#[derive(Debug, Clone)]
pub struct TransportEvent {
    pub request_id: RequestId,
    pub outcome: TransportOutcome,
}

/// Submission seam between the account manager and the network.
pub trait Transport: Send + Sync {
    /// Submit a request without blocking.
    ///
    /// Returns the id its completion event will carry, or `None` when the
    /// request could not be submitted at all (no event is ever delivered
    /// for it).
    fn submit(&self, request: OutboundRequest) -> Option<RequestId>;
}

/// reqwest-backed transport reporting completions over a channel.
///
/// Each submission spawns one task. The owner of the receiving end drains
/// events and feeds them into `AccountManager::handle_transport_event`,
/// which keeps every account structure on a single logical owner.
pub struct HttpTransport {
    client: reqwest::Client,
    events: mpsc::UnboundedSender<TransportEvent>,
}

impl HttpTransport {
    /// Create a transport that delivers completions into `events`.
    pub fn new(events: mpsc::UnboundedSender<TransportEvent>) -> Self {
        Self {
            client: reqwest::Client::new(),
            events,
        }
    }

    /// Create a transport together with the receiving end of its event
    /// channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TransportEvent>) {
        let (events, receiver) = mpsc::unbounded_channel();
        (Self::new(events), receiver)
    }
}

impl Transport for HttpTransport {
    fn submit(&self, request: OutboundRequest) -> Option<RequestId> {
        let request_id = Uuid::new_v4();
        let client = self.client.clone();
        let events = self.events.clone();

        tokio::spawn(async move {
            let outcome = execute(&client, request).await;
            if events
                .send(TransportEvent {
                    request_id,
                    outcome,
                })
                .is_err()
            {
                debug!(%request_id, "Transport event receiver dropped before completion");
            }
        });

        Some(request_id)
    }
}

async fn execute(client: &reqwest::Client, request: OutboundRequest) -> TransportOutcome {
    let OutboundRequest {
        url,
        operation,
        content_type,
        body,
    } = request;

    let mut builder = match operation {
        Operation::Get => client.get(url),
        Operation::Post => client.post(url),
        Operation::Put => client.put(url),
        Operation::Delete => client.delete(url),
    };

    if let Some(content_type) = content_type {
        builder = builder.header(reqwest::header::CONTENT_TYPE, content_type);
    }
    if let Some(body) = body {
        builder = builder.body(body);
    }

    match builder.send().await {
        Ok(response) => {
            let url = response.url().clone();
            match response.bytes().await {
                Ok(body) => TransportOutcome::Success {
                    url,
                    body: body.to_vec(),
                },
                Err(err) => TransportOutcome::Error {
                    error: classify(&err),
                    message: err.to_string(),
                },
            }
        }
        Err(err) => {
            error!(%err, "Request failed at the transport level");
            TransportOutcome::Error {
                error: classify(&err),
                message: err.to_string(),
            }
        }
    }
}

fn classify(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::ConnectionRefused
    } else {
        TransportError::Other(err.to_string())
    }
}
