use thiserror::Error;

use crate::types::{ItemId, Leafs};

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Insufficient funds: need {needed:.2} leafs, have {available:.2}")]
    InsufficientFunds { needed: Leafs, available: Leafs },

    #[error("Item '{item_id}' is already owned")]
    AlreadyOwned { item_id: ItemId },

    #[error("Item '{item_id}' not found in catalog")]
    ItemNotFound { item_id: ItemId },

    #[error("Corrupt save document: {0}")]
    CorruptSaveDocument(String),

    #[error("Invalid catalog entry '{item_id}': {reason}")]
    InvalidCatalog { item_id: ItemId, reason: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(f64),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    /// True for the purchase outcomes a player can trigger by clicking.
    /// Everything else is an environment or programming fault.
    pub fn is_purchase_rejection(&self) -> bool {
        matches!(
            self,
            Self::InsufficientFunds { .. } | Self::AlreadyOwned { .. }
        )
    }
}

pub type SimResult<T> = Result<T, SimError>;
