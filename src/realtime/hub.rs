//! Hub de salas en tiempo real
//!
//! Un sender de broadcast por sala, creado bajo demanda al unirse. Emitir a
//! una sala sin sesiones conectadas es un no-op. Los servicios reciben el
//! puerto inyectado como `Arc<dyn RealtimePort>` para poder usar dobles en
//! los tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Sala personal de un usuario (cliente o admin de taller)
pub fn user_room(user_id: Uuid) -> String {
    format!("user-{}", user_id)
}

/// Sala personal de un mecánico
pub fn mechanic_room(mechanic_id: Uuid) -> String {
    format!("mechanic-{}", mechanic_id)
}

/// Sala de broadcast para solicitudes nuevas sin taller asignado, a la que
/// se une cualquier sesión de admin
pub const UNASSIGNED_REQUESTS_ROOM: &str = "unassigned-requests";

const ROOM_CAPACITY: usize = 64;

/// Puerto de mensajería en tiempo real
#[async_trait]
pub trait RealtimePort: Send + Sync {
    async fn emit(&self, room: &str, event: &str, payload: Value);
}

#[derive(Clone)]
pub struct RealtimeHub {
    rooms: Arc<RwLock<HashMap<String, broadcast::Sender<String>>>>,
}

impl RealtimeHub {
    pub fn new() -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Unirse a una sala, creándola si no existe
    pub async fn join(&self, room: &str) -> broadcast::Receiver<String> {
        let mut rooms = self.rooms.write().await;
        let sender = rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0);
        sender.subscribe()
    }

    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }
}

impl Default for RealtimeHub {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RealtimePort for RealtimeHub {
    async fn emit(&self, room: &str, event: &str, payload: Value) {
        let frame = json!({ "event": event, "data": payload }).to_string();

        let rooms = self.rooms.read().await;
        if let Some(sender) = rooms.get(room) {
            // send falla solo si no queda ningún receptor; at-most-once
            let _ = sender.send(frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_to_empty_room_is_noop() {
        let hub = RealtimeHub::new();
        hub.emit("user-nobody", "request:new", json!({})).await;
        assert_eq!(hub.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_join_creates_room_and_receives_frames() {
        let hub = RealtimeHub::new();
        let mut rx = hub.join("mechanic-42").await;
        assert_eq!(hub.room_count().await, 1);

        hub.emit("mechanic-42", "request:assigned", json!({ "request_id": "abc" }))
            .await;

        let frame = rx.recv().await.unwrap();
        let parsed: Value = serde_json::from_str(&frame).unwrap();
        assert_eq!(parsed["event"], "request:assigned");
        assert_eq!(parsed["data"]["request_id"], "abc");
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let hub = RealtimeHub::new();
        let mut rx_a = hub.join("user-a").await;
        let mut rx_b = hub.join("user-b").await;

        hub.emit("user-a", "ping", json!(1)).await;

        assert!(rx_a.recv().await.is_ok());
        assert!(matches!(
            rx_b.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn test_room_keys() {
        let id = Uuid::nil();
        assert_eq!(user_room(id), format!("user-{}", id));
        assert_eq!(mechanic_room(id), format!("mechanic-{}", id));
    }
}
