//! Command dispatcher: outbound user actions against the resolved endpoint.
//!
//! Sends are discrete request/response calls, never streamed. A user send is
//! echoed optimistically as a draft and rolled back when the request settles
//! — success or failure — because the authoritative copy only ever arrives
//! through the event stream. Raw sends (single keystrokes driving the remote
//! terminal) skip the echo and the loading flag entirely.

use reqwest::multipart::Form;
use url::Url;

use agent_chat_protocol::{ApiError, FileUploadResponse, MessageType, SendMessageBody};

use crate::state::SessionShared;

/// Dispatches `/message` and `/upload` calls for one session.
#[derive(Clone)]
pub(crate) struct Dispatcher {
    client: reqwest::Client,
    endpoint: Url,
    shared: SessionShared,
}

impl Dispatcher {
    pub fn new(client: reqwest::Client, endpoint: Url, shared: SessionShared) -> Self {
        Self {
            client,
            endpoint,
            shared,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.endpoint.as_str().trim_end_matches('/'))
    }

    /// Send a message to the agent.
    ///
    /// For [`MessageType::User`]: whitespace-only content is a no-op; a
    /// draft is pushed before the request and every draft is removed after
    /// it settles, regardless of outcome. For [`MessageType::Raw`]: fire and
    /// forget, no transcript or loading changes.
    ///
    /// Failures surface as transient notifications on the session event
    /// channel; this method itself never fails.
    pub async fn send_message(&self, content: &str, message_type: MessageType) {
        if message_type == MessageType::User && content.trim().is_empty() {
            return;
        }

        if message_type == MessageType::User {
            self.shared.push_draft(content);
            self.shared.set_loading(true);
        }

        let body = SendMessageBody {
            content: content.to_string(),
            message_type,
        };
        let result = self
            .client
            .post(self.url("message"))
            .json(&body)
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                let status = response.status();
                let error: ApiError = response.json().await.unwrap_or_default();
                log::error!("send failed ({status}): {}", error.summary());
                self.shared
                    .notify("Failed to send message", error.summary());
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("send failed: {e}");
                self.shared.notify("Error sending message", e.to_string());
            }
        }

        // Settled: the optimistic echo goes away no matter what happened.
        // The confirmed message, if any, arrives over the event stream.
        if message_type == MessageType::User {
            self.shared.clear_drafts();
            self.shared.set_loading(false);
        }
    }

    /// Upload files as a multipart form.
    ///
    /// Always returns a result value: any failure is reported as a
    /// notification and folded into `ok: false`.
    pub async fn upload_files(&self, form: Form) -> FileUploadResponse {
        let result = self
            .client
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await;

        match result {
            Ok(response) if !response.status().is_success() => {
                let status = response.status();
                let error: ApiError = response.json().await.unwrap_or_default();
                log::error!("upload failed ({status}): {}", error.summary());
                self.shared
                    .notify("Failed to upload files", error.summary());
                FileUploadResponse {
                    ok: false,
                    file_path: None,
                }
            }
            Ok(response) => match response.json::<FileUploadResponse>().await {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::error!("upload response unreadable: {e}");
                    self.shared.notify("Error uploading files", e.to_string());
                    FileUploadResponse {
                        ok: false,
                        file_path: None,
                    }
                }
            },
            Err(e) => {
                log::error!("upload failed: {e}");
                self.shared.notify("Error uploading files", e.to_string());
                FileUploadResponse {
                    ok: false,
                    file_path: None,
                }
            }
        }
    }
}
