//! Message roles and the request/response bodies for the command endpoints.

use serde::{Deserialize, Serialize};

/// Who authored a transcript message.
///
/// The server sends roles as plain strings; anything it grows beyond
/// `"user"` / `"agent"` deserializes to [`Role::Unknown`] instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A message typed by the human user.
    User,
    /// Output from the remote agent process.
    Agent,
    /// A role string this client does not recognize.
    #[serde(other)]
    Unknown,
}

/// How an outbound message body should be interpreted by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// A composed chat message; echoed optimistically and confirmed by the
    /// server over the event stream.
    User,
    /// A raw keystroke or control sequence forwarded to the terminal-like
    /// remote process. Fire-and-forget: no echo, no loading state.
    Raw,
}

/// JSON body for `POST /message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageBody {
    pub content: String,
    #[serde(rename = "type")]
    pub message_type: MessageType,
}

/// Response body for `POST /upload`.
///
/// Request failures are folded into `ok: false` by the dispatcher, so callers
/// always receive a value and never an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileUploadResponse {
    pub ok: bool,
    #[serde(rename = "filePath", skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_role_known_strings() {
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::User);
        assert_eq!(
            serde_json::from_str::<Role>("\"agent\"").unwrap(),
            Role::Agent
        );
    }

    #[test]
    fn test_role_unknown_string_does_not_fail() {
        assert_eq!(
            serde_json::from_str::<Role>("\"screen\"").unwrap(),
            Role::Unknown
        );
    }

    #[test]
    fn test_send_body_wire_shape() {
        let body = SendMessageBody {
            content: "ls -la".to_string(),
            message_type: MessageType::User,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"content": "ls -la", "type": "user"})
        );
    }

    #[test]
    fn test_upload_response_file_path_field() {
        let resp: FileUploadResponse =
            serde_json::from_str(r#"{"ok": true, "filePath": "/workspace/a.txt"}"#).unwrap();
        assert!(resp.ok);
        assert_eq!(resp.file_path.as_deref(), Some("/workspace/a.txt"));
    }

    #[test]
    fn test_upload_response_file_path_optional() {
        let resp: FileUploadResponse = serde_json::from_str(r#"{"ok": true}"#).unwrap();
        assert!(resp.ok);
        assert!(resp.file_path.is_none());
    }
}
