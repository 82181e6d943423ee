//! Endpoint WebSocket
//!
//! Cada sesión autenticada se une a sus propias salas según su rol y recibe
//! los frames emitidos por el hub. No hay acknowledgment ni replay: un
//! cliente desconectado se pone al día consultando las notificaciones
//! durables.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
    Extension,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};

use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::UserRole;
use crate::realtime::{mechanic_room, user_room, UNASSIGNED_REQUESTS_ROOM};
use crate::state::AppState;

pub async fn ws_handler(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state, user))
}

/// Salas a las que se une una sesión según su identidad
fn session_rooms(user: &AuthenticatedUser) -> Vec<String> {
    let mut rooms = vec![user_room(user.user_id)];
    match user.role {
        UserRole::Mechanic => {
            if let Some(mechanic_id) = user.mechanic_id {
                rooms.push(mechanic_room(mechanic_id));
            }
        }
        UserRole::WorkshopAdmin => {
            rooms.push(UNASSIGNED_REQUESTS_ROOM.to_string());
        }
        UserRole::Customer => {}
    }
    rooms
}

async fn handle_socket(socket: WebSocket, state: AppState, user: AuthenticatedUser) {
    let rooms = session_rooms(&user);
    log::info!(
        "🔌 Sesión realtime abierta para usuario {} ({} salas)",
        user.user_id,
        rooms.len()
    );

    // Un forwarder por sala hacia un canal único de salida
    let (frames_tx, mut frames_rx) = mpsc::channel::<String>(32);
    for room in &rooms {
        let mut rx = state.realtime.join(room).await;
        let frames_tx = frames_tx.clone();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(frame) => {
                        if frames_tx.send(frame).await.is_err() {
                            break;
                        }
                    }
                    // at-most-once: los frames perdidos por lag no se reponen
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }
    drop(frames_tx);

    let (mut sink, mut stream) = socket.split();

    loop {
        tokio::select! {
            frame = frames_rx.recv() => {
                match frame {
                    Some(frame) => {
                        if sink.send(Message::Text(frame)).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    // El canal es solo de bajada; se ignora todo lo demás
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    log::info!("🔌 Sesión realtime cerrada para usuario {}", user.user_id);
}
