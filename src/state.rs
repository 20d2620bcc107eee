//! Shared session state and the UI-facing event channel.
//!
//! The transcript and status signal are owned exclusively by the stream
//! manager and the command dispatcher; the UI reads snapshots and listens on
//! the [`SessionEvent`] channel. Every mutation goes through a
//! [`SessionShared`] helper that updates the state under the lock and then
//! notifies, so readers never observe a torn update.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

use agent_chat_protocol::{AgentType, MessageUpdateEvent, ServerStatus};

use crate::stream::StreamState;
use crate::transcript::{Transcript, TranscriptEntry};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A transient, user-visible notice (toast-style). Never fatal; the UI may
/// auto-dismiss it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline, e.g. "Failed to send message".
    pub title: String,
    /// Detail line, e.g. the server's structured error summary.
    pub detail: String,
}

/// Pushes from the engine to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The transcript changed; re-read the snapshot.
    TranscriptChanged,
    /// The loading flag flipped.
    LoadingChanged(bool),
    /// The remote agent's liveness signal changed.
    StatusChanged(ServerStatus),
    /// The reported agent implementation changed.
    AgentTypeChanged(AgentType),
    /// The stream manager moved to a new state.
    StreamStateChanged(StreamState),
    /// A transient user-visible notice.
    Notification(Notification),
}

/// Snapshot state behind the session lock.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub transcript: Transcript,
    pub loading: bool,
    pub server_status: ServerStatus,
    pub agent_type: AgentType,
    pub stream_state: StreamState,
}

// ---------------------------------------------------------------------------
// Shared handle
// ---------------------------------------------------------------------------

/// Cloneable handle pairing the locked state with the UI event sender.
///
/// The send side is fire-and-forget: a dropped receiver means no UI is
/// listening, which is fine — state stays readable through the snapshot
/// accessors.
#[derive(Clone)]
pub(crate) struct SessionShared {
    state: Arc<Mutex<SessionState>>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionShared {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let shared = Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            events: tx,
        };
        (shared, rx)
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }

    // --- mutations -------------------------------------------------------
    //
    // `Closed` is a latch. An aborted stream task may still finish the poll
    // it was in the middle of, so every mutation and event after `Closed`
    // is recorded must be dropped, not applied late.

    /// Start a new connection epoch: drop everything a prior connection left
    /// behind before the first event of the new one is applied.
    pub fn begin_epoch(&self) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.transcript.clear();
            state.server_status = ServerStatus::Unknown;
            state.stream_state = StreamState::Connecting;
        }
        self.emit(SessionEvent::TranscriptChanged);
        self.emit(SessionEvent::StatusChanged(ServerStatus::Unknown));
        self.emit(SessionEvent::StreamStateChanged(StreamState::Connecting));
    }

    /// Re-arm a latched session so a replacement stream task can drive it.
    pub fn reopen(&self) {
        self.state.lock().stream_state = StreamState::Idle;
    }

    pub fn set_stream_state(&self, stream_state: StreamState) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.stream_state = stream_state;
        }
        self.emit(SessionEvent::StreamStateChanged(stream_state));
    }

    pub fn set_server_status(&self, status: ServerStatus) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.server_status = status;
        }
        self.emit(SessionEvent::StatusChanged(status));
    }

    pub fn set_agent_type(&self, agent_type: AgentType) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.agent_type = agent_type;
        }
        self.emit(SessionEvent::AgentTypeChanged(agent_type));
    }

    pub fn set_loading(&self, loading: bool) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.loading = loading;
        }
        self.emit(SessionEvent::LoadingChanged(loading));
    }

    pub fn apply_update(&self, update: MessageUpdateEvent) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.transcript.apply_update(update);
        }
        self.emit(SessionEvent::TranscriptChanged);
    }

    pub fn push_draft(&self, content: &str) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.transcript.push_draft(content);
        }
        self.emit(SessionEvent::TranscriptChanged);
    }

    pub fn clear_drafts(&self) {
        {
            let mut state = self.state.lock();
            if state.stream_state == StreamState::Closed {
                return;
            }
            state.transcript.clear_drafts();
        }
        self.emit(SessionEvent::TranscriptChanged);
    }

    pub fn notify(&self, title: impl Into<String>, detail: impl Into<String>) {
        if self.state.lock().stream_state == StreamState::Closed {
            return;
        }
        self.emit(SessionEvent::Notification(Notification {
            title: title.into(),
            detail: detail.into(),
        }));
    }

    // --- snapshots -------------------------------------------------------

    pub fn messages(&self) -> Vec<TranscriptEntry> {
        self.state.lock().transcript.snapshot()
    }

    pub fn loading(&self) -> bool {
        self.state.lock().loading
    }

    pub fn server_status(&self) -> ServerStatus {
        self.state.lock().server_status
    }

    pub fn agent_type(&self) -> AgentType {
        self.state.lock().agent_type
    }

    pub fn stream_state(&self) -> StreamState {
        self.state.lock().stream_state
    }
}
