//! WebSocket frame DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// First frame a client sends after the upgrade.
///
/// Only `room_code` is read. Signaling fields that arrive in the same frame
/// are accepted and ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinRequest {
    #[serde(default)]
    pub room_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<Value>,
}

impl JoinRequest {
    pub fn new(room_code: impl Into<String>) -> Self {
        Self {
            room_code: room_code.into(),
            sdp: None,
            candidate: None,
        }
    }
}

/// Type tag of server-originated frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationType {
    Error,
}

/// `{"type":"error","message":"..."}` sent best-effort before the server closes a socket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotification {
    pub r#type: NotificationType,
    pub message: String,
}

impl ErrorNotification {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            r#type: NotificationType::Error,
            message: message.into(),
        }
    }
}
