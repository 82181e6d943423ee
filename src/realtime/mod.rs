//! Canal en tiempo real
//!
//! Push con ámbito de sala, at-most-once y fire-and-forget. El almacenamiento
//! durable de notificaciones es la fuente de verdad; este canal es solo una
//! optimización de latencia sin reconciliación entre ambos.

pub mod hub;
pub mod ws;

pub use hub::{mechanic_room, user_room, RealtimeHub, RealtimePort, UNASSIGNED_REQUESTS_ROOM};
