//! Chat session lifecycle: mount, endpoint change, teardown.
//!
//! [`ChatSession`] wires the pieces together: it resolves the endpoint,
//! spawns the stream task, and exposes the read-only surface plus the two
//! outbound operations to the UI layer. The transcript and status signal are
//! never mutated from outside the stream manager / dispatcher pair.

use tokio::sync::mpsc;
use url::Url;

use agent_chat_input::{InputMode, KeyAction, KeyEvent, encode_key};
use agent_chat_protocol::{AgentType, FileUploadResponse, MessageType, ServerStatus};

use crate::dispatcher::Dispatcher;
use crate::endpoint::{EndpointError, PageContext, resolve};
use crate::state::{SessionEvent, SessionShared};
use crate::stream::{StreamHandle, StreamState};
use crate::transcript::TranscriptEntry;

/// A mounted chat session against one resolved endpoint.
///
/// Must be created inside a tokio runtime: mounting spawns the stream task.
/// Dropping the session closes the transport and cancels any pending
/// reconnect, so nothing outlives an unmount.
pub struct ChatSession {
    endpoint: Url,
    shared: SessionShared,
    events_rx: Option<mpsc::UnboundedReceiver<SessionEvent>>,
    dispatcher: Dispatcher,
    stream: Option<StreamHandle>,
    client: reqwest::Client,
}

impl ChatSession {
    /// Resolve the endpoint from page context and mount.
    ///
    /// The only fatal error in the engine: with no endpoint there is nothing
    /// to connect to and nothing to retry.
    pub fn mount(page: &PageContext) -> Result<Self, EndpointError> {
        let endpoint = resolve(page)?;
        Ok(Self::mount_at(endpoint))
    }

    /// Mount directly against an already-resolved endpoint.
    pub fn mount_at(endpoint: Url) -> Self {
        let client = reqwest::Client::new();
        let (shared, events_rx) = SessionShared::new();
        let stream = StreamHandle::spawn(client.clone(), &endpoint, shared.clone());
        let dispatcher = Dispatcher::new(client.clone(), endpoint.clone(), shared.clone());
        log::info!("session: mounted at {endpoint}");
        Self {
            endpoint,
            shared,
            events_rx: Some(events_rx),
            dispatcher,
            stream: Some(stream),
            client,
        }
    }

    /// Re-resolve against new page context (e.g. the `url` query parameter
    /// changed) and reconnect. The old transport and timer are closed before
    /// the new connection is attempted, so only one transport is ever live.
    pub fn change_endpoint(&mut self, page: &PageContext) -> Result<(), EndpointError> {
        let endpoint = resolve(page)?;
        if endpoint == self.endpoint {
            return Ok(());
        }
        log::info!("session: endpoint changed {} -> {endpoint}", self.endpoint);
        if let Some(stream) = self.stream.take() {
            stream.close();
        }
        self.endpoint = endpoint.clone();
        self.stream = Some(StreamHandle::spawn(
            self.client.clone(),
            &endpoint,
            self.shared.clone(),
        ));
        self.dispatcher = Dispatcher::new(self.client.clone(), endpoint, self.shared.clone());
        Ok(())
    }

    /// Tear the session down: close the transport, cancel any pending
    /// reconnect. Idempotent; also runs on drop.
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            stream.close();
            log::info!("session: closed");
        }
    }

    // --- read-only surface for the UI ------------------------------------

    /// The endpoint this session is bound to.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Snapshot of the transcript in display order.
    pub fn messages(&self) -> Vec<TranscriptEntry> {
        self.shared.messages()
    }

    /// Whether a user send is in flight.
    pub fn loading(&self) -> bool {
        self.shared.loading()
    }

    /// Liveness/readiness of the remote agent process.
    pub fn server_status(&self) -> ServerStatus {
        self.shared.server_status()
    }

    /// Which agent implementation the server reported.
    pub fn agent_type(&self) -> AgentType {
        self.shared.agent_type()
    }

    /// Current stream manager state.
    pub fn stream_state(&self) -> StreamState {
        self.shared.stream_state()
    }

    /// Take the push channel of [`SessionEvent`]s. Yields `None` after the
    /// first call; there is one consumer.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<SessionEvent>> {
        self.events_rx.take()
    }

    // --- operations -------------------------------------------------------

    /// Send a message to the agent. A user send is echoed as an optimistic
    /// draft and holds the loading flag until the request settles, success
    /// or failure; a raw send is fire-and-forget. Whitespace-only user
    /// content is a no-op. Failures surface as notifications on the event
    /// channel, never as errors.
    pub async fn send_message(&self, content: &str, message_type: MessageType) {
        self.dispatcher.send_message(content, message_type).await;
    }

    /// Upload files as a multipart form. Never fails; inspect `ok`.
    pub async fn upload_files(&self, form: reqwest::multipart::Form) -> FileUploadResponse {
        self.dispatcher.upload_files(form).await
    }

    /// Encode a keystroke for the given input mode and, when it maps to a
    /// control sequence, forward it to the agent as a raw send. Returns the
    /// action taken so the UI can handle [`KeyAction::Submit`] and
    /// [`KeyAction::InsertNewline`] itself.
    pub async fn send_key(&self, mode: InputMode, event: KeyEvent) -> KeyAction {
        let action = encode_key(mode, event);
        if let KeyAction::SendRaw(sequence) = &action {
            self.dispatcher
                .send_message(sequence, MessageType::Raw)
                .await;
        }
        action
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}
