//! Read-only projection of the simulation for presentation.
//!
//! A snapshot is produced every frame. It carries nothing the engine
//! needs back; saving goes through `save::SaveDocument` instead.

use crate::{clock::Season, types::{Leafs, Seconds}};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EconomySnapshot {
    pub balance:                 Leafs,
    pub season:                  Season,
    /// Leafs per second right now.
    pub effective_rate:          f64,
    pub plants_owned:            usize,
    /// 0..=255 intensity of the season change overlay.
    pub season_transition_alpha: u8,
    pub season_progress:         f64,
    pub season_time_left:        Seconds,
    pub flat_rate_bonus:         f64,
    pub multiplier:              f64,
}

impl EconomySnapshot {
    /// Balance as shown on screen: whole leafs only.
    pub fn display_balance(&self) -> u64 {
        self.balance.floor() as u64
    }
}
