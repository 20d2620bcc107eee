//! Server liveness and agent identity enums.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Liveness/readiness of the remote agent process.
///
/// This is distinct from transport connectivity: an open event stream does
/// not imply the agent is ready, so `Stable` and `Running` only ever come
/// from explicit `status_change` events. `Offline` is entered by the stream
/// manager on transport error and never arrives on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    /// Pre-connection default, or a status string this client does not know.
    #[default]
    Unknown,
    /// The agent is idle and ready for input.
    Stable,
    /// The agent is busy processing.
    Running,
    /// The event stream is down; set locally on transport error.
    Offline,
}

impl ServerStatus {
    /// Map a wire status string to the enum. Unrecognized values map to
    /// [`ServerStatus::Unknown`], matching how the UI treats them.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "stable" => ServerStatus::Stable,
            "running" => ServerStatus::Running,
            _ => ServerStatus::Unknown,
        }
    }

    /// Whether the UI should treat the server as reachable and ready.
    /// `Unknown` and `Offline` both collapse to "not ready" for display.
    pub fn is_ready(self) -> bool {
        matches!(self, ServerStatus::Stable | ServerStatus::Running)
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ServerStatus::Unknown => "unknown",
            ServerStatus::Stable => "stable",
            ServerStatus::Running => "running",
            ServerStatus::Offline => "offline",
        };
        write!(f, "{s}")
    }
}

/// Which agent implementation the server is fronting.
///
/// Display metadata carried on `status_change` events; it has no effect on
/// synchronization correctness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgentType {
    Claude,
    Goose,
    Aider,
    Gemini,
    Amp,
    Codex,
    Cursor,
    CursorAgent,
    Copilot,
    Auggie,
    Amazonq,
    Opencode,
    Custom,
    #[default]
    Unknown,
}

impl AgentType {
    /// Map a wire agent-type string to the enum.
    ///
    /// An empty string means the server did not report a type. Strings this
    /// client does not know map to `Custom`, which is how the UI styles any
    /// unrecognized agent.
    pub fn from_wire(agent_type: &str) -> Self {
        match agent_type {
            "" => AgentType::Unknown,
            "claude" => AgentType::Claude,
            "goose" => AgentType::Goose,
            "aider" => AgentType::Aider,
            "gemini" => AgentType::Gemini,
            "amp" => AgentType::Amp,
            "codex" => AgentType::Codex,
            "cursor" => AgentType::Cursor,
            "cursor-agent" => AgentType::CursorAgent,
            "copilot" => AgentType::Copilot,
            "amazonq" => AgentType::Amazonq,
            "auggie" => AgentType::Auggie,
            "opencode" => AgentType::Opencode,
            _ => AgentType::Custom,
        }
    }

    /// Human-readable name for display next to the status indicator.
    pub fn display_name(self) -> &'static str {
        match self {
            AgentType::Claude => "Claude Code",
            AgentType::Goose => "Goose",
            AgentType::Aider => "Aider",
            AgentType::Gemini => "Gemini",
            AgentType::Amp => "Amp",
            AgentType::Codex => "Codex",
            AgentType::Cursor | AgentType::CursorAgent => "Cursor Agent",
            AgentType::Copilot => "Copilot",
            AgentType::Auggie => "Auggie",
            AgentType::Amazonq => "Amazon Q",
            AgentType::Opencode => "Opencode",
            AgentType::Custom => "Custom",
            AgentType::Unknown => "Unknown",
        }
    }
}
