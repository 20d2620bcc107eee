//! agent-chat-protocol: wire types for the agent chat API.
//!
//! This crate defines the payload shapes exchanged with an agent chat server:
//!
//! - [`events`] - Server-Sent Event payloads (`message_update`, `status_change`)
//! - [`message`] - Message roles and outbound request/response bodies
//! - [`status`] - Server liveness and agent identity enums
//! - [`error_model`] - The structured error body returned on request failure
//!
//! Everything here is plain data with serde derives; the synchronization
//! logic that consumes these types lives in the `agent-chat` crate.

pub mod error_model;
pub mod events;
pub mod message;
pub mod status;

// Re-export the main public types at the crate root for convenience
pub use error_model::{ApiError, ApiErrorDetail};
pub use events::{MessageUpdateEvent, StatusChangeEvent};
pub use message::{FileUploadResponse, MessageType, Role, SendMessageBody};
pub use status::{AgentType, ServerStatus};
