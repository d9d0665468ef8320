//! Game events: what happened during a session, in order.
//!
//! The session records events as it runs; the runner drains them and
//! appends them to the event log. Variants are only ever appended.

use crate::{
    clock::Season,
    types::{ItemId, Leafs, Seconds, SessionId},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SessionStarted {
        session_id: SessionId,
        from_save:  bool,
    },
    SeasonChanged {
        elapsed:   Seconds,
        season:    Season,
        rollovers: u32,
    },
    ItemPurchased {
        elapsed:     Seconds,
        item_id:     ItemId,
        cost:        u64,
        new_balance: Leafs,
    },
    PurchaseRejected {
        elapsed: Seconds,
        item_id: ItemId,
        reason:  String,
    },
    GameSaved {
        elapsed:  Seconds,
        balance:  Leafs,
        autosave: bool,
    },
    SaveFailed {
        elapsed: Seconds,
        reason:  String,
    },
    /// The stored save could not be read and a new game was started.
    SaveRecovered {
        reason: String,
    },
}

impl GameEvent {
    /// Stable name for the event_type column in event_log.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::SessionStarted { .. }   => "session_started",
            Self::SeasonChanged { .. }    => "season_changed",
            Self::ItemPurchased { .. }    => "item_purchased",
            Self::PurchaseRejected { .. } => "purchase_rejected",
            Self::GameSaved { .. }        => "game_saved",
            Self::SaveFailed { .. }       => "save_failed",
            Self::SaveRecovered { .. }    => "save_recovered",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub session_id: SessionId,
    pub elapsed:    Seconds,
    pub event_type: String,
    pub payload:    String, // JSON-serialized GameEvent
}
