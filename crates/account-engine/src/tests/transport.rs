//! HttpTransport event delivery.

use crate::transport::{
    HttpTransport, Operation, OutboundRequest, Transport, TransportOutcome,
};
use std::time::Duration;
use url::Url;

fn request_to(url: &str) -> OutboundRequest {
    OutboundRequest {
        url: Url::parse(url).unwrap(),
        operation: Operation::Get,
        content_type: None,
        body: None,
    }
}

#[tokio::test]
async fn unreachable_host_delivers_an_error_event() {
    let (transport, mut events) = HttpTransport::channel();

    // nothing listens on the discard port
    let request_id = transport.submit(request_to("http://127.0.0.1:9/")).unwrap();

    let event = tokio::time::timeout(Duration::from_secs(30), events.recv())
        .await
        .expect("no completion within the deadline")
        .expect("event channel closed");

    assert_eq!(event.request_id, request_id);
    assert!(matches!(event.outcome, TransportOutcome::Error { .. }));
}

#[tokio::test]
async fn dropped_receiver_does_not_poison_submission() {
    let (transport, events) = HttpTransport::channel();
    drop(events);

    // completion has nowhere to go; submission itself must still work
    let request_id = transport.submit(request_to("http://127.0.0.1:9/"));
    assert!(request_id.is_some());

    // give the spawned task a moment to hit the closed channel
    tokio::time::sleep(Duration::from_millis(50)).await;
}
