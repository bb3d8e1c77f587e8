//! WebSocket connection handlers.
//!
//! One connection walks through authenticate → join → receive loop → leave.
//! Authentication happens on the HTTP request, before the upgrade; the room
//! is named by the first frame after the upgrade.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, SplitStream, StreamExt},
};
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    domain::{Connection, ConnectionId, LeaveOutcome, LifecycleError, Payload, RoomCode},
    infrastructure::{auth::session_token_from_headers, dto::websocket::JoinRequest},
    ui::state::AppState,
};

use super::error::ConnectionError;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let mut connection = Connection::new(ConnectionId::generate());
    track(connection.begin_authentication());

    let token = session_token_from_headers(&headers);
    match state.authenticator.authenticate(token).await {
        Ok(user_id) => {
            track(connection.authenticated(user_id));
            tracing::debug!(
                "Connection '{}' authenticated (user: {:?})",
                connection.id,
                user_id
            );
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection)))
        }
        Err(e) => {
            let error = ConnectionError::from(e);
            tracing::warn!("Rejecting connection '{}': {}", connection.id, error);
            track(connection.closed());
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}

/// Parse the join frame into a room code.
///
/// Text and binary frames are both read as JSON.
pub fn parse_join_frame(payload: &Payload) -> Result<RoomCode, ConnectionError> {
    let request: JoinRequest = match payload {
        Payload::Text(text) => serde_json::from_str(text),
        Payload::Binary(data) => serde_json::from_slice(data),
    }
    .map_err(|_| ConnectionError::InvalidJoinRequest)?;

    RoomCode::new(request.room_code).map_err(|_| ConnectionError::InvalidJoinRequest)
}

/// Convert a data frame into a relay payload; `None` for control frames.
fn into_payload(message: Message) -> Option<Payload> {
    match message {
        Message::Text(text) => Some(Payload::Text(text.to_string())),
        Message::Binary(data) => Some(Payload::Binary(data.to_vec())),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
    }
}

fn into_message(payload: Payload) -> Message {
    match payload {
        Payload::Text(text) => Message::Text(text.into()),
        Payload::Binary(data) => Message::Binary(data.into()),
    }
}

/// Log lifecycle violations; they indicate a bug in this module, not a peer fault.
fn track(result: Result<(), LifecycleError>) {
    if let Err(e) = result {
        tracing::error!("{}", e);
    }
}

/// Wait for the first data frame, skipping ping/pong.
async fn next_data_frame(
    receiver: &mut SplitStream<WebSocket>,
) -> Result<Payload, ConnectionError> {
    while let Some(message) = receiver.next().await {
        let message = message.map_err(|e| ConnectionError::Transport(e.to_string()))?;
        if let Message::Close(_) = message {
            return Err(ConnectionError::Transport(
                "closed before joining".to_string(),
            ));
        }
        if let Some(payload) = into_payload(message) {
            return Ok(payload);
        }
    }
    Err(ConnectionError::Transport(
        "stream ended before joining".to_string(),
    ))
}

async fn read_join_request(
    receiver: &mut SplitStream<WebSocket>,
    join_timeout: Duration,
) -> Result<RoomCode, ConnectionError> {
    let frame = tokio::time::timeout(join_timeout, next_data_frame(receiver))
        .await
        .map_err(|_| ConnectionError::JoinTimeout)??;
    parse_join_frame(&frame)
}

/// Best-effort error notification followed by a close frame.
async fn reject(sender: &mut SplitSink<WebSocket, Message>, error: &ConnectionError) {
    if let Some(notification) = error.notification() {
        match serde_json::to_string(&notification) {
            Ok(json) => {
                if let Err(e) = sender.send(Message::Text(json.into())).await {
                    tracing::debug!("Failed to send error notification: {}", e);
                }
            }
            Err(e) => tracing::error!("Failed to serialize error notification: {}", e),
        }
    }
    if let Err(e) = sender.close().await {
        tracing::debug!("Failed to close socket: {}", e);
    }
}

/// Spawns a task that drains the outbound queue into the WebSocket sink.
///
/// Messages from other peers (via `rx`) are written to this client in queue order.
fn pusher_loop(
    mut rx: mpsc::Receiver<Payload>,
    mut sender: SplitSink<WebSocket, Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if sender.send(into_message(payload)).await.is_err() {
                break;
            }
        }
    })
}

/// Spawns the receive loop: every data frame is relayed to the room's other members.
fn receive_loop(
    mut receiver: SplitStream<WebSocket>,
    state: Arc<AppState>,
    room_code: RoomCode,
    connection_id: ConnectionId,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = receiver.next().await {
            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!("Transport error on connection '{}': {}", connection_id, e);
                    break;
                }
            };

            if let Message::Close(_) = message {
                tracing::info!("Connection '{}' requested close", connection_id);
                break;
            }

            // Ping/pong is handled automatically by the WebSocket protocol
            let Some(payload) = into_payload(message) else {
                continue;
            };

            let reports = state
                .relay_message_usecase
                .execute(&room_code, &connection_id, payload)
                .await;
            let failed = reports.iter().filter(|r| !r.is_delivered()).count();
            if failed > 0 {
                tracing::debug!(
                    "Relay from '{}' in room '{}': {} of {} deliveries failed",
                    connection_id,
                    room_code,
                    failed,
                    reports.len()
                );
            }
        }
    })
}

/// Wait until either task ends, abort the other, then deregister.
///
/// This is the single exit path of a joined connection: whichever side
/// finished first (or panicked), the leave runs exactly once.
async fn supervise(
    state: &AppState,
    connection: &mut Connection,
    room_code: &RoomCode,
    mut send_task: JoinHandle<()>,
    mut recv_task: JoinHandle<()>,
) -> LeaveOutcome {
    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    track(connection.closing());
    let outcome = state
        .leave_room_usecase
        .execute(room_code, &connection.id)
        .await;
    track(connection.closed());

    outcome
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, mut connection: Connection) {
    let (mut sender, mut receiver) = socket.split();

    // Joining: the first frame names the room
    let room_code = match read_join_request(&mut receiver, state.settings.join_timeout).await {
        Ok(room_code) => room_code,
        Err(e) => {
            tracing::warn!("Connection '{}' failed to join: {}", connection.id, e);
            reject(&mut sender, &e).await;
            track(connection.closed());
            return;
        }
    };

    let (tx, rx) = mpsc::channel(state.settings.outbox_capacity);
    let occupancy = match state
        .join_room_usecase
        .execute(room_code.clone(), connection.id, connection.user_id, tx)
        .await
    {
        Ok(occupancy) => occupancy,
        Err(e) => {
            let error = ConnectionError::from(e);
            tracing::warn!(
                "Connection '{}' rejected from room '{}': {}",
                connection.id,
                room_code,
                error
            );
            reject(&mut sender, &error).await;
            track(connection.closed());
            return;
        }
    };

    track(connection.joined(room_code.clone()));
    tracing::info!(
        "Connection '{}' joined room '{}'. Total clients in room: {}",
        connection.id,
        room_code,
        occupancy
    );

    let send_task = pusher_loop(rx, sender);
    let recv_task = receive_loop(receiver, state.clone(), room_code.clone(), connection.id);

    let outcome = supervise(&state, &mut connection, &room_code, send_task, recv_task).await;

    tracing::info!(
        "Connection '{}' disconnected from room '{}'. Total clients in room: {}",
        connection.id,
        room_code,
        outcome.remaining
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ServerConfig,
        domain::{ConnectionState, RoomRepository},
        infrastructure::{
            auth::AnonymousAuthenticator, message_pusher::WebSocketMessagePusher,
            repository::InMemoryRoomRepository,
        },
    };
    use tokio::sync::oneshot;

    #[test]
    fn test_parse_join_frame_text() {
        // テスト項目: テキストの参加フレームからルームコードを取り出せる
        // given (前提条件):
        let frame = Payload::Text(r#"{"room_code":"123456"}"#.to_string());

        // when (操作):
        let result = parse_join_frame(&frame);

        // then (期待する結果):
        assert_eq!(result, Ok(RoomCode::new("123456").unwrap()));
    }

    #[test]
    fn test_parse_join_frame_binary() {
        // テスト項目: バイナリの参加フレームも JSON として読める
        // given (前提条件):
        let frame = Payload::Binary(br#"{"room_code":"abc","sdp":null}"#.to_vec());

        // when (操作):
        let result = parse_join_frame(&frame);

        // then (期待する結果):
        assert_eq!(result, Ok(RoomCode::new("abc").unwrap()));
    }

    #[test]
    fn test_parse_join_frame_rejects_missing_or_empty_code() {
        // テスト項目: ルームコードが無い・空・JSON でない場合はプロトコルエラー
        // given (前提条件):
        let frames = [
            Payload::Text(r#"{"sdp":"offer"}"#.to_string()),
            Payload::Text(r#"{"room_code":""}"#.to_string()),
            Payload::Text(r#"{"room_code":"   "}"#.to_string()),
            Payload::Text("not json".to_string()),
            Payload::Text(r#"{"room_code":42}"#.to_string()),
        ];

        // when (操作) / then (期待する結果):
        for frame in frames {
            assert_eq!(
                parse_join_frame(&frame),
                Err(ConnectionError::InvalidJoinRequest)
            );
        }
    }

    #[test]
    fn test_payload_message_conversion_is_verbatim() {
        // テスト項目: ペイロードとフレームの変換で内容が変わらない
        // given (前提条件):
        let text = Payload::Text(r#"{"sdp":"offer-x"}"#.to_string());
        let binary = Payload::Binary(vec![0, 159, 146, 150]);

        // when (操作):
        let text_back = into_payload(into_message(text.clone()));
        let binary_back = into_payload(into_message(binary.clone()));

        // then (期待する結果):
        assert_eq!(text_back, Some(text));
        assert_eq!(binary_back, Some(binary));
        assert_eq!(into_payload(Message::Ping(vec![1u8].into())), None);
    }

    #[tokio::test]
    async fn test_writer_ending_first_still_deregisters() {
        // テスト項目: 送信側タスクが先に終了した場合も受信側タスクは中断され、ルームから登録解除される
        // given (前提条件):
        let config = ServerConfig::default();
        let repository = Arc::new(InMemoryRoomRepository::new(config.room_capacity));
        let state = AppState::new(
            repository.clone(),
            Arc::new(WebSocketMessagePusher::new(config.send_timeout)),
            Arc::new(AnonymousAuthenticator),
            config.connection_settings(),
        );
        let room_code = RoomCode::new("writer-gone").unwrap();
        let mut connection = Connection::new(ConnectionId::generate());
        connection.begin_authentication().unwrap();
        connection.authenticated(None).unwrap();
        let (tx, _rx) = mpsc::channel(1);
        state
            .join_room_usecase
            .execute(room_code.clone(), connection.id, None, tx)
            .await
            .unwrap();
        connection.joined(room_code.clone()).unwrap();

        // 受信側はピアが何も送らない状態を模して終わらない
        let (alive_tx, alive_rx) = oneshot::channel::<()>();
        let recv_task = tokio::spawn(async move {
            let _alive = alive_tx;
            std::future::pending::<()>().await;
        });
        // 送信側はソケットへの書き込み失敗で終了した状態
        let send_task = tokio::spawn(async {});

        // when (操作):
        let outcome = supervise(&state, &mut connection, &room_code, send_task, recv_task).await;

        // then (期待する結果):
        assert!(outcome.removed);
        assert!(outcome.room_closed);
        assert!(!repository.contains_room(&room_code).await);
        assert_eq!(connection.state(), ConnectionState::Closed);
        assert!(alive_rx.await.is_err(), "receive task was not aborted");
    }
}
