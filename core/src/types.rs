//! Shared primitive types used across the entire economy engine.

/// The single currency unit. Fractional leafs accrue between frames.
pub type Leafs = f64;

/// Elapsed real time, in seconds.
pub type Seconds = f64;

/// A stable, unique identifier for a shop item.
pub type ItemId = String;

/// The canonical play-session identifier.
pub type SessionId = String;

/// Fresh session identifier for a new play session.
pub fn new_session_id() -> SessionId {
    format!("session-{}", uuid::Uuid::new_v4())
}
