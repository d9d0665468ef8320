use serde::{Deserialize, Serialize};
use crate::types::ItemId;

/// Player intents a front-end forwards to the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    Purchase { item_id: ItemId },
    Save,
}
