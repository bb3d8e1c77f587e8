//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        self,
        client::IntoClientRequest,
        handshake::client::Request,
        http::{HeaderValue, StatusCode, header::COOKIE},
        protocol::Message,
    },
};

use rendezvous_server::infrastructure::{
    auth::SESSION_COOKIE, dto::websocket::JoinRequest,
};
use rendezvous_shared::time::now_millis;

use crate::{
    domain::{classify_notification, outgoing_frame},
    error::ClientError,
};

use super::{formatter::FrameFormatter, ui::redisplay_prompt};

/// Where to connect and which room to join
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub url: String,
    pub room: String,
    /// Value of the `session_id` cookie, if any
    pub session: Option<String>,
}

/// Build the upgrade request, attaching the session cookie when one is given.
pub fn build_request(url: &str, session: Option<&str>) -> Result<Request, ClientError> {
    let mut request = url
        .into_client_request()
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;

    if let Some(session) = session {
        let cookie = HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE, session))
            .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
        request.headers_mut().insert(COOKIE, cookie);
    }

    Ok(request)
}

fn connect_error(error: tungstenite::Error) -> ClientError {
    match error {
        tungstenite::Error::Http(response) if response.status() == StatusCode::UNAUTHORIZED => {
            ClientError::Unauthorized
        }
        other => ClientError::ConnectionError(other.to_string()),
    }
}

/// Run the WebSocket client session
///
/// Returns `Ok(())` when the user ends input (Ctrl+C / Ctrl+D).
pub async fn run_client_session(options: &ClientOptions) -> Result<(), ClientError> {
    let request = build_request(&options.url, options.session.as_deref())?;
    let (ws_stream, _response) = connect_async(request).await.map_err(connect_error)?;

    tracing::info!("Connected to signaling relay!");

    let (mut write, mut read) = ws_stream.split();

    // The first frame names the room
    let join = serde_json::to_string(&JoinRequest::new(options.room.clone()))
        .map_err(|e| ClientError::InvalidRequest(e.to_string()))?;
    write
        .send(Message::Text(join.into()))
        .await
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;

    print!("{}", FrameFormatter::format_joined(&options.room));

    // Spawn a task to handle incoming frames
    let room_for_read = options.room.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    if let Some(error) = classify_notification(&text, &room_for_read) {
                        return Err(error);
                    }
                    print!("{}", FrameFormatter::format_received_text(&text, now_millis()));
                    redisplay_prompt(&room_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!(
                        "{}",
                        FrameFormatter::format_received_binary(data.len(), now_millis())
                    );
                    redisplay_prompt(&room_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Relay closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }

        Err(ClientError::ConnectionError("Connection lost".to_string()))
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();

    // Spawn a blocking thread for rustyline (synchronous readline)
    let prompt = format!("{}> ", options.room);
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt) {
                Ok(line) => {
                    if let Some(frame) = outgoing_frame(line) {
                        rl.add_history_entry(frame.as_str()).ok();
                        if input_tx.send(frame).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Each input line goes out as one text frame, unmodified
    let room_for_write = options.room.clone();
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            if let Err(e) = write.send(Message::Text(line.into())).await {
                tracing::warn!("Failed to send frame: {}", e);
                return Err(ClientError::ConnectionError("Connection lost".to_string()));
            }

            print!("\n{}", FrameFormatter::format_sent_confirmation(now_millis()));
            redisplay_prompt(&room_for_write);
        }

        write.close().await.ok();
        Ok(())
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        read_result = &mut read_task => {
            write_task.abort();
            read_result.map_err(|e| ClientError::ConnectionError(e.to_string()))?
        }
        write_result = &mut write_task => {
            read_task.abort();
            write_result.map_err(|e| ClientError::ConnectionError(e.to_string()))?
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_attaches_session_cookie() {
        // テスト項目: セッションを指定すると session_id Cookie が付与される
        // given (前提条件):
        let url = "ws://127.0.0.1:8080/ws";

        // when (操作):
        let request = build_request(url, Some("42")).unwrap();

        // then (期待する結果):
        assert_eq!(request.headers().get(COOKIE).unwrap(), "session_id=42");
        assert_eq!(request.uri().path(), "/ws");
    }

    #[test]
    fn test_build_request_without_session_has_no_cookie() {
        // テスト項目: セッション未指定なら Cookie ヘッダーは付かない
        // given (前提条件) / when (操作):
        let request = build_request("ws://127.0.0.1:8080/ws", None).unwrap();

        // then (期待する結果):
        assert!(request.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_build_request_rejects_invalid_url() {
        // テスト項目: 不正な URL は InvalidRequest になる
        // given (前提条件) / when (操作):
        let result = build_request("not a url", None);

        // then (期待する結果):
        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }
}
