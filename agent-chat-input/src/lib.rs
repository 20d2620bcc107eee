//! agent-chat-input: keystroke encoding for the chat input area.
//!
//! The chat UI has two input modes. In **text** mode, keys compose a message
//! and Enter submits it. In **control** mode, every keystroke is translated
//! into the byte sequence a terminal would produce and forwarded to the
//! remote process as a raw send.
//!
//! The mapping is a deterministic pure function from key event to action; it
//! must be reproduced exactly for compatibility with the terminal-driving
//! protocol on the server side, so the sequence table lives in one place
//! ([`encoder`]) with the table spelled out byte for byte.

pub mod encoder;

pub use encoder::{InputMode, Key, KeyAction, KeyEvent, NamedKey, encode_key};
