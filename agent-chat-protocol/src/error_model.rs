//! Structured error body returned by the command endpoints on failure.
//!
//! Non-2xx responses from `/message` and `/upload` carry a problem-details
//! style JSON body. Every field is optional on the wire; [`ApiError::summary`]
//! flattens whatever arrived into a single line for a user notification.

use serde::{Deserialize, Serialize};

/// One validation failure inside an [`ApiError`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Structured error response body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub errors: Vec<ApiErrorDetail>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ApiError {
    /// Render `detail` plus the joined per-field messages as a single line:
    /// `"{detail}: {errors[].message joined by ', '}"`.
    pub fn summary(&self) -> String {
        let messages = self
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}: {}", self.detail, messages)
    }
}
