//! Frame formatting for the terminal.

use rendezvous_shared::time::millis_to_rfc3339;

/// Formatter for frames shown to the user
pub struct FrameFormatter;

impl FrameFormatter {
    /// Banner printed once the join frame has been sent
    pub fn format_joined(room: &str) -> String {
        format!(
            "\n============================================================\n\
             Joined room '{}'. Each line you type is sent verbatim to the other peers.\n\
             ============================================================\n",
            room
        )
    }

    /// A text frame relayed from another peer
    pub fn format_received_text(text: &str, received_at: i64) -> String {
        format!(
            "\n← {}\n  received at {}\n",
            text,
            millis_to_rfc3339(received_at)
        )
    }

    /// A binary frame relayed from another peer
    pub fn format_received_binary(byte_count: usize, received_at: i64) -> String {
        format!(
            "\n← {} bytes of binary data\n  received at {}\n",
            byte_count,
            millis_to_rfc3339(received_at)
        )
    }

    pub fn format_sent_confirmation(sent_at: i64) -> String {
        format!("sent at {}\n", millis_to_rfc3339(sent_at))
    }
}
