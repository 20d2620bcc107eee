//! Server-Sent Event payloads from `GET /events`.
//!
//! The stream carries two named events: `message_update` with the full
//! current text of a message (not a delta), and `status_change` with the
//! remote process liveness plus the agent implementation behind it.

use serde::{Deserialize, Serialize};

use crate::message::Role;

/// Payload of a `message_update` event.
///
/// `id` is server-assigned and unique, roughly monotonic but not guaranteed
/// gapless. `message` carries the full current content for that id, so a
/// repeated id is a replacement, never an append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageUpdateEvent {
    pub id: i64,
    pub role: Role,
    pub message: String,
    pub time: String,
}

/// Payload of a `status_change` event.
///
/// Both fields arrive as free-form strings; mapping them into the
/// [`crate::ServerStatus`] / [`crate::AgentType`] enums is deliberately left
/// to the consumer so an unrecognized value degrades instead of failing
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    pub status: String,
    #[serde(default)]
    pub agent_type: String,
}

/// Event names used on the wire.
pub const MESSAGE_UPDATE_EVENT: &str = "message_update";
pub const STATUS_CHANGE_EVENT: &str = "status_change";
