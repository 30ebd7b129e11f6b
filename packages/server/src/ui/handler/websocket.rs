//! WebSocket connection handler.
//!
//! Adapts an axum [`WebSocket`] to the text sink/stream a [`Client`] pumps, and
//! keeps the upgrade task alive until that client has shut down.

use std::{future, sync::Arc};

use axum::{
    extract::{
        Path, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};

use crate::{
    domain::RoomId,
    signaling::{Client, SignalMessage},
    ui::{error::ApiError, state::AppState},
};

pub async fn websocket_handler(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<String>,
    ws: WebSocketUpgrade,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.join_room_usecase.check(&room_id).await?;
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, id)))
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, id: RoomId) {
    let (sink, stream) = socket.split();

    let writer = sink.with(|text: String| {
        future::ready(Ok::<Message, axum::Error>(Message::Text(text.into())))
    });
    // Close frames end the stream; control frames are handled by axum.
    let reader = stream
        .take_while(|frame| future::ready(!matches!(frame, Ok(Message::Close(_)))))
        .filter_map(|frame| {
            future::ready(match frame {
                Ok(Message::Text(text)) => Some(Ok(text.as_str().to_owned())),
                Ok(Message::Binary(bytes)) => {
                    Some(Ok(String::from_utf8_lossy(&bytes).into_owned()))
                }
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
        });

    let client = Client::spawn(writer, reader);
    tracing::info!("Client {} connected to room {}", client.id(), id);

    if let Err(e) = state.join_room_usecase.execute(id, client.clone()).await {
        tracing::warn!("Client {} could not join room {}: {}", client.id(), id, e);
        let _ = client
            .send_message(&SignalMessage::error(e.to_string()))
            .await;
        client.close();
    }

    client.wait().await;
    tracing::info!("Client {} left room {}", client.id(), id);
}
