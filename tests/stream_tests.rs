//! Event stream lifecycle tests against a wiremock SSE server.
//!
//! The mock server sends a complete SSE body and then closes the connection,
//! which the engine treats the way a browser EventSource does: server close
//! is a transport error that flips the status to offline and schedules a
//! reconnect after the flat delay.

mod common;

use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agent_chat::{ChatSession, SessionEvent, StreamState};
use agent_chat_protocol::{AgentType, ServerStatus};

use common::{sse_body, wait_for};

fn sse_response(events: &[(&str, &str)]) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(sse_body(events), "text/event-stream")
}

#[tokio::test]
async fn test_events_populate_transcript_and_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(sse_response(&[
            (
                "message_update",
                r#"{"id":1,"role":"user","message":"hi","time":"t"}"#,
            ),
            (
                "message_update",
                r#"{"id":2,"role":"agent","message":"hello","time":"t"}"#,
            ),
            (
                "status_change",
                r#"{"status":"stable","agent_type":"claude"}"#,
            ),
        ]))
        .mount(&server)
        .await;

    let mut session = ChatSession::mount_at(Url::parse(&server.uri()).unwrap());
    wait_for(5, || session.messages().len() == 2).await;
    wait_for(5, || session.server_status() == ServerStatus::Stable).await;
    assert_eq!(session.agent_type(), AgentType::Claude);

    let messages = session.messages();
    assert_eq!(messages[0].id(), Some(1));
    assert_eq!(messages[0].content(), "hi");
    assert_eq!(messages[1].id(), Some(2));
    assert_eq!(messages[1].content(), "hello");

    session.close();
    assert_eq!(session.stream_state(), StreamState::Closed);
}

#[tokio::test]
async fn test_stream_end_goes_offline_then_reconnect_resets_transcript() {
    let server = MockServer::start().await;

    // First connection epoch serves message 1, later epochs serve message 2.
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(sse_response(&[(
            "message_update",
            r#"{"id":1,"role":"agent","message":"first epoch","time":"t"}"#,
        )]))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(sse_response(&[(
            "message_update",
            r#"{"id":2,"role":"agent","message":"second epoch","time":"t"}"#,
        )]))
        .with_priority(2)
        .mount(&server)
        .await;

    let mut session = ChatSession::mount_at(Url::parse(&server.uri()).unwrap());
    let mut events = session.take_events().unwrap();

    wait_for(5, || {
        session.messages().len() == 1 && session.messages()[0].id() == Some(1)
    })
    .await;

    // Server closed after the body: offline, then (>= 3s later) a fresh
    // epoch whose transcript no longer contains message 1.
    wait_for(5, || session.server_status() == ServerStatus::Offline).await;
    wait_for(10, || {
        let messages = session.messages();
        messages.len() == 1 && messages[0].id() == Some(2)
    })
    .await;

    // The offline signal must have been pushed before the new epoch's data.
    let mut saw_offline_before_second_epoch = false;
    let mut saw_offline = false;
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::StatusChanged(ServerStatus::Offline) => saw_offline = true,
            SessionEvent::StreamStateChanged(StreamState::Open) if saw_offline => {
                saw_offline_before_second_epoch = true;
            }
            _ => {}
        }
    }
    assert!(saw_offline, "offline status was never signalled");
    assert!(
        saw_offline_before_second_epoch,
        "reconnect happened without an offline signal first"
    );

    let requests = server.received_requests().await.unwrap();
    assert!(requests.len() >= 2, "expected a reconnect request, got {}", requests.len());
}

#[tokio::test]
async fn test_non_2xx_events_response_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = ChatSession::mount_at(Url::parse(&server.uri()).unwrap());
    wait_for(5, || session.server_status() == ServerStatus::Offline).await;
    assert_eq!(session.stream_state(), StreamState::Reconnecting);
}

#[tokio::test]
async fn test_close_cancels_pending_reconnect() {
    // Nothing listens on this endpoint; the session should park itself in
    // the reconnect wait, and close() must cancel it.
    let mut session = ChatSession::mount_at(Url::parse("http://127.0.0.1:9").unwrap());
    wait_for(5, || session.stream_state() == StreamState::Reconnecting).await;

    session.close();
    assert_eq!(session.stream_state(), StreamState::Closed);

    // A cancelled reconnect never flips the state back.
    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    assert_eq!(session.stream_state(), StreamState::Closed);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_close_racing_the_connect_loop_stays_closed() {
    // close() aborts the stream task, but an abort only lands at the task's
    // next await point; a poll already running on another worker may still
    // finish its write. Whatever the interleaving, Closed must be final.
    for i in 0..50u64 {
        let mut session = ChatSession::mount_at(Url::parse("http://127.0.0.1:9").unwrap());
        tokio::time::sleep(std::time::Duration::from_micros(i * 8)).await;
        session.close();

        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        assert_eq!(
            session.stream_state(),
            StreamState::Closed,
            "iteration {i}: state changed after close()"
        );
    }
}

#[tokio::test]
async fn test_malformed_event_payload_does_not_kill_the_stream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/events"))
        .respond_with(sse_response(&[
            ("message_update", "this is not json"),
            ("unknown_event", "{}"),
            (
                "message_update",
                r#"{"id":3,"role":"agent","message":"still alive","time":"t"}"#,
            ),
        ]))
        .mount(&server)
        .await;

    let session = ChatSession::mount_at(Url::parse(&server.uri()).unwrap());
    wait_for(5, || session.messages().len() == 1).await;
    assert_eq!(session.messages()[0].content(), "still alive");
}
