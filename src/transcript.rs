//! Conversation transcript: ordered messages plus optimistic drafts.
//!
//! The transcript is pure data with mutation rules; all I/O lives in the
//! stream manager and the dispatcher. Entries are a tagged union so a draft
//! is distinguished from a confirmed message by its type, not by a sentinel
//! id that could collide with a server-assigned one.

use serde::{Deserialize, Serialize};

use agent_chat_protocol::{MessageUpdateEvent, Role};

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A server-confirmed message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Server-assigned id; unique, roughly monotonic, not gapless.
    pub id: i64,
    pub role: Role,
    /// Full current text, not a delta.
    pub content: String,
}

/// A locally-created entry shown while its send is in flight.
///
/// Drafts have no id and are always user-authored; both facts are enforced
/// by the shape of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftMessage {
    pub content: String,
}

/// One displayed transcript row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TranscriptEntry {
    Draft(DraftMessage),
    Confirmed(Message),
}

impl TranscriptEntry {
    pub fn is_draft(&self) -> bool {
        matches!(self, TranscriptEntry::Draft(_))
    }

    pub fn role(&self) -> Role {
        match self {
            TranscriptEntry::Draft(_) => Role::User,
            TranscriptEntry::Confirmed(m) => m.role,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            TranscriptEntry::Draft(d) => &d.content,
            TranscriptEntry::Confirmed(m) => &m.content,
        }
    }

    /// Server id, if this entry has been confirmed.
    pub fn id(&self) -> Option<i64> {
        match self {
            TranscriptEntry::Draft(_) => None,
            TranscriptEntry::Confirmed(m) => Some(m.id),
        }
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Ordered collection of transcript entries; insertion order = display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile an authoritative `message_update` into the transcript.
    ///
    /// Drafts are stripped first: the server has spoken, so any optimistic
    /// echo is superseded whether or not this particular update confirms it.
    /// Then the confirmed set is keyed by id — a seen id is replaced in
    /// place, an unseen id is appended.
    pub fn apply_update(&mut self, update: MessageUpdateEvent) {
        self.entries.retain(|e| !e.is_draft());

        let confirmed = Message {
            id: update.id,
            role: update.role,
            content: update.message,
        };

        let existing = self
            .entries
            .iter_mut()
            .find(|e| e.id() == Some(confirmed.id));
        match existing {
            Some(entry) => *entry = TranscriptEntry::Confirmed(confirmed),
            None => self.entries.push(TranscriptEntry::Confirmed(confirmed)),
        }
    }

    /// Append an optimistic draft for an in-flight user send.
    pub fn push_draft(&mut self, content: impl Into<String>) {
        self.entries.push(TranscriptEntry::Draft(DraftMessage {
            content: content.into(),
        }));
    }

    /// Remove all drafts. Called when a send settles; a no-op if the stream
    /// already stripped them.
    pub fn clear_drafts(&mut self) {
        self.entries.retain(|e| !e.is_draft());
    }

    /// Drop everything. Called at the start of each connection epoch so no
    /// state from a prior connection lingers.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn snapshot(&self) -> Vec<TranscriptEntry> {
        self.entries.clone()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn draft_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_draft()).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
