//! agent-chat: client-side session synchronization engine for agent chat
//! servers speaking HTTP + Server-Sent Events.
//!
//! The engine keeps a local conversation transcript in sync with a remote
//! agent process that is treated as an untrusted, intermittently-available
//! peer: its event stream may drop at any time and may deliver updates out
//! of order relative to HTTP responses.
//!
//! # Architecture
//!
//! - [`endpoint`] - Resolves the agent API base URL from page context
//! - [`transcript`] - Ordered transcript with optimistic drafts and
//!   replace-by-id reconciliation
//! - [`stream`] - Lifecycle of the long-lived `/events` SSE connection,
//!   including the flat-delay reconnect loop
//! - A command dispatcher for the outbound `/message` and `/upload` calls,
//!   with optimistic echo and rollback
//! - [`session`] - [`ChatSession`], the handle tying it all together, and
//!   the [`SessionEvent`] push channel to the UI
//!
//! Keystroke encoding for the control input mode lives in the
//! `agent-chat-input` crate; wire types in `agent-chat-protocol`.
//!
//! # Example
//!
//! ```ignore
//! use agent_chat::{ChatSession, PageContext};
//! use agent_chat_protocol::MessageType;
//!
//! let page = PageContext {
//!     query_url: Some("https://host.example/api".into()),
//!     base_path: None,
//!     origin: "https://host.example".into(),
//! };
//! let mut session = ChatSession::mount(&page)?;
//! let mut events = session.take_events().unwrap();
//!
//! session.send_message("hello", MessageType::User).await;
//! while let Some(event) = events.recv().await {
//!     // re-render from session.messages() / session.server_status()
//! }
//! ```

pub mod endpoint;
pub mod session;
pub mod stream;
pub mod transcript;

mod dispatcher;
mod state;

// Re-export the main public types at the crate root for convenience
pub use agent_chat_input::{InputMode, Key, KeyAction, KeyEvent, NamedKey};
pub use endpoint::{EndpointError, PageContext, resolve};
pub use session::ChatSession;
pub use state::{Notification, SessionEvent};
pub use stream::{RECONNECT_DELAY, StreamState};
pub use transcript::{DraftMessage, Message, Transcript, TranscriptEntry};
