//! Event stream manager: lifecycle of the long-lived `/events` connection.
//!
//! A single background task owns the SSE transport. Per connection epoch it
//! clears the transcript (the server is the sole source of truth for a
//! connection), then applies incoming events strictly in arrival order. Any
//! transport failure — connect error, non-2xx response, mid-stream error, or
//! the server closing the body — flips the status signal to `Offline` and
//! schedules one reconnect attempt after a flat delay, indefinitely, for as
//! long as the session is mounted.
//!
//! Teardown must not leak: the shutdown signal is raced against both the
//! stream read and the reconnect timer, and closing the handle also aborts
//! the task so the transport and any pending timer die with it.

use std::time::Duration;

use eventsource_stream::Eventsource;
use futures::StreamExt;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use agent_chat_protocol::{
    AgentType, MessageUpdateEvent, ServerStatus, StatusChangeEvent, events,
};

use crate::state::SessionShared;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Flat delay between a transport failure and the next connection attempt.
/// No backoff, no jitter, no retry cap.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(3000);

/// Where the stream manager is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamState {
    /// No endpoint yet; nothing has been attempted.
    #[default]
    Idle,
    /// A connection attempt is in flight.
    Connecting,
    /// The transport is open and events are being applied.
    Open,
    /// Waiting out the reconnect delay after a transport failure.
    Reconnecting,
    /// Torn down; no further transitions.
    Closed,
}

/// Owns the background stream task for one endpoint.
///
/// Dropping the handle shuts the task down; [`StreamHandle::close`] does the
/// same synchronously and records the `Closed` state.
pub(crate) struct StreamHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
    shared: SessionShared,
}

impl StreamHandle {
    /// Spawn the connection loop against `<endpoint>/events`.
    pub fn spawn(client: reqwest::Client, endpoint: &Url, shared: SessionShared) -> Self {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let events_url = format!("{}/events", endpoint.as_str().trim_end_matches('/'));
        // A previous handle for this session latched the state on close.
        shared.reopen();
        let task_shared = shared.clone();
        let task = tokio::spawn(async move {
            run(client, events_url, task_shared, shutdown_rx).await;
        });
        Self {
            shutdown: shutdown_tx,
            task,
            shared,
        }
    }

    /// Close the transport and cancel any pending reconnect timer. No state
    /// transitions happen after this; safe to call more than once.
    pub fn close(&self) {
        // Latch before the abort: an abort lands at the task's next await
        // point, so a poll already executing on another worker can still
        // finish its current write. Recording `Closed` first makes that
        // write a no-op instead of a late transition.
        self.shared.set_stream_state(StreamState::Closed);
        let _ = self.shutdown.send(true);
        self.task.abort();
    }
}

impl Drop for StreamHandle {
    fn drop(&mut self) {
        self.close();
    }
}

// ---------------------------------------------------------------------------
// Connection loop
// ---------------------------------------------------------------------------

async fn run(
    client: reqwest::Client,
    events_url: String,
    shared: SessionShared,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        // Connecting: fresh epoch. Clear the transcript before the first
        // event of the new connection, status back to unknown.
        shared.begin_epoch();
        log::info!("stream: connecting to {events_url}");

        match connect(&client, &events_url).await {
            Ok(stream) => {
                // Transport open. Status is deliberately left alone: an open
                // socket says nothing about agent readiness — wait for an
                // explicit status_change event.
                shared.set_stream_state(StreamState::Open);
                log::info!("stream: connected");

                let mut stream = std::pin::pin!(stream);
                loop {
                    tokio::select! {
                        _ = shutdown.changed() => {
                            log::info!("stream: shutdown while open");
                            return;
                        }
                        item = stream.next() => match item {
                            Some(Ok(event)) => dispatch(&shared, &event.event, &event.data),
                            Some(Err(e)) => {
                                log::warn!("stream: transport error: {e}");
                                break;
                            }
                            None => {
                                // Server closed the body; same recovery path
                                // as a hard transport error.
                                log::warn!("stream: server closed the event stream");
                                break;
                            }
                        }
                    }
                }
            }
            Err(e) => {
                log::warn!("stream: connect failed: {e}");
            }
        }

        // Reconnecting: the peer is unreachable as far as the user is
        // concerned, say so immediately, then wait out the flat delay.
        shared.set_server_status(ServerStatus::Offline);
        shared.set_stream_state(StreamState::Reconnecting);
        tokio::select! {
            _ = shutdown.changed() => {
                log::info!("stream: shutdown while waiting to reconnect");
                return;
            }
            _ = tokio::time::sleep(RECONNECT_DELAY) => {}
        }
    }
}

/// Open the SSE transport. A non-2xx response is a connect failure — there
/// is no event stream to read on an error page.
async fn connect(
    client: &reqwest::Client,
    events_url: &str,
) -> Result<
    impl futures::Stream<
        Item = Result<eventsource_stream::Event, eventsource_stream::EventStreamError<reqwest::Error>>,
    >,
    reqwest::Error,
> {
    let response = client
        .get(events_url)
        .header(reqwest::header::ACCEPT, "text/event-stream")
        .send()
        .await?
        .error_for_status()?;
    Ok(response.bytes_stream().eventsource())
}

/// Apply one inbound event. Malformed payloads and unknown event names are
/// logged and skipped; they must not kill the stream.
fn dispatch(shared: &SessionShared, event_name: &str, data: &str) {
    match event_name {
        events::MESSAGE_UPDATE_EVENT => {
            match serde_json::from_str::<MessageUpdateEvent>(data) {
                Ok(update) => shared.apply_update(update),
                Err(e) => log::error!("stream: bad message_update payload: {e}"),
            }
        }
        events::STATUS_CHANGE_EVENT => {
            match serde_json::from_str::<StatusChangeEvent>(data) {
                Ok(change) => {
                    shared.set_server_status(ServerStatus::from_wire(&change.status));
                    shared.set_agent_type(AgentType::from_wire(&change.agent_type));
                }
                Err(e) => log::error!("stream: bad status_change payload: {e}"),
            }
        }
        other => {
            log::error!("stream: unknown event name: {other}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
