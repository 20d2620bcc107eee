//! Key event → action encoder.
//!
//! Control-mode lookups happen in a fixed order that must not be rearranged:
//! named keys first, then Enter, then Ctrl chords, then single printable
//! characters. An unmapped Ctrl chord deliberately falls through to the
//! printable branch and sends its bare character.

use std::fmt;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which input mode the chat input area is in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputMode {
    /// Compose a message; Enter submits, Shift+Enter inserts a newline.
    #[default]
    Text,
    /// Forward keystrokes to the remote terminal as raw control sequences.
    Control,
}

/// A named (non-character) key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    ArrowUp,
    ArrowDown,
    ArrowRight,
    ArrowLeft,
    Enter,
    Escape,
    Tab,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
}

/// The actual key (either a character or a named key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A single character key (e.g., 'a', 'B', '1')
    Character(char),
    /// A named key (e.g., Enter, Escape, ArrowUp)
    Named(NamedKey),
}

/// A key press with its active modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub ctrl: bool,
    pub shift: bool,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            ctrl: false,
            shift: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_shift(mut self) -> Self {
        self.shift = true;
        self
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl".to_string());
        }
        if self.shift {
            parts.push("Shift".to_string());
        }
        match self.key {
            Key::Character(c) => parts.push(c.to_string()),
            Key::Named(n) => parts.push(format!("{n:?}")),
        }
        write!(f, "{}", parts.join("+"))
    }
}

/// What the UI should do with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Send the sequence to the server as a raw message.
    SendRaw(String),
    /// Submit the composed message as a user message.
    Submit,
    /// Insert a literal newline into the composed message.
    InsertNewline,
    /// Leave the event to default text-editing handling.
    Ignored,
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Escape sequence for a named key in control mode, if it has one.
///
/// Enter is intentionally absent: it is handled after this table so that the
/// shift modifier can be consulted.
fn named_key_sequence(key: NamedKey) -> Option<&'static str> {
    match key {
        NamedKey::ArrowUp => Some("\x1b[A"),
        NamedKey::ArrowDown => Some("\x1b[B"),
        NamedKey::ArrowRight => Some("\x1b[C"),
        NamedKey::ArrowLeft => Some("\x1b[D"),
        NamedKey::Escape => Some("\x1b"),
        NamedKey::Tab => Some("\t"),
        NamedKey::Delete => Some("\x1b[3~"),
        NamedKey::Home => Some("\x1b[H"),
        NamedKey::End => Some("\x1b[F"),
        NamedKey::PageUp => Some("\x1b[5~"),
        NamedKey::PageDown => Some("\x1b[6~"),
        NamedKey::Backspace => Some("\x08"),
        NamedKey::Enter => None,
    }
}

/// Control byte for a Ctrl+letter chord, if mapped.
fn ctrl_sequence(c: char) -> Option<&'static str> {
    match c.to_ascii_lowercase() {
        'c' => Some("\x03"), // SIGINT
        'd' => Some("\x04"), // EOF
        'z' => Some("\x1a"), // SIGTSTP
        'l' => Some("\x0c"), // clear screen
        'a' => Some("\x01"), // beginning of line
        'e' => Some("\x05"), // end of line
        'w' => Some("\x17"), // delete word
        'u' => Some("\x15"), // clear line
        'r' => Some("\x12"), // reverse history search
        _ => None,
    }
}

/// Translate a key event into the action the chat input should take.
///
/// Pure and total: every `(mode, event)` pair maps to exactly one
/// [`KeyAction`], and no state is consulted or mutated.
pub fn encode_key(mode: InputMode, event: KeyEvent) -> KeyAction {
    match mode {
        InputMode::Control => encode_control(event),
        InputMode::Text => encode_text(event),
    }
}

fn encode_control(event: KeyEvent) -> KeyAction {
    if let Key::Named(named) = event.key {
        if let Some(seq) = named_key_sequence(named) {
            return KeyAction::SendRaw(seq.to_string());
        }
        // Enter without shift sends a carriage return to the terminal.
        if named == NamedKey::Enter && !event.shift {
            return KeyAction::SendRaw("\r".to_string());
        }
        return KeyAction::Ignored;
    }

    if let Key::Character(c) = event.key {
        if event.ctrl {
            if let Some(seq) = ctrl_sequence(c) {
                return KeyAction::SendRaw(seq.to_string());
            }
            log::debug!("unmapped Ctrl chord, sending bare character: {event}");
        }
        // Single printable character, sent verbatim. Unmapped Ctrl chords
        // fall through to here with their bare character.
        return KeyAction::SendRaw(c.to_string());
    }

    KeyAction::Ignored
}

fn encode_text(event: KeyEvent) -> KeyAction {
    if event.key == Key::Named(NamedKey::Enter) {
        if event.shift {
            return KeyAction::InsertNewline;
        }
        return KeyAction::Submit;
    }
    KeyAction::Ignored
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
