//! Client-side decisions, kept free of I/O.

use rendezvous_server::infrastructure::dto::websocket::{ErrorNotification, NotificationType};

use crate::error::ClientError;

/// Message the relay sends when a room is at capacity
const ROOM_FULL_MESSAGE: &str = "Room full";

/// Check if the client should exit immediately based on the error type.
///
/// Retrying cannot fix a rejected credential, a full room, or a bad request.
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Unauthorized
            | ClientError::RoomFull(_)
            | ClientError::Rejected(_)
            | ClientError::InvalidRequest(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// `current_attempt` is 0-indexed.
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    current_attempt < max_attempts
}

/// Interpret a text frame as a relay error notification.
///
/// Returns `None` for anything else, including relayed peer frames that
/// happen to be JSON.
pub fn classify_notification(text: &str, room: &str) -> Option<ClientError> {
    let notification: ErrorNotification = serde_json::from_str(text).ok()?;
    if notification.r#type != NotificationType::Error {
        return None;
    }

    if notification.message == ROOM_FULL_MESSAGE {
        Some(ClientError::RoomFull(room.to_string()))
    } else {
        Some(ClientError::Rejected(notification.message))
    }
}

/// Turn an input line into an outgoing text frame.
///
/// Blank lines are skipped; anything else is sent exactly as typed.
pub fn outgoing_frame(line: String) -> Option<String> {
    if line.trim().is_empty() {
        return None;
    }
    Some(line)
}
