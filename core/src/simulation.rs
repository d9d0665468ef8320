//! Economy simulation: balance, production rate, and the season clock.
//!
//! RULES:
//!   - effective_rate = flat_rate_bonus × season_factor × multiplier
//!   - advance(dt) adds effective_rate × dt to the balance.
//!   - The balance only goes down through debit().

use crate::{
    clock::{Season, SeasonClock},
    config::{EconomyConfig, SeasonFactors},
    error::{SimError, SimResult},
    snapshot::EconomySnapshot,
    types::{ItemId, Leafs, Seconds},
};

#[derive(Debug, Clone, PartialEq)]
pub struct EconomySimulation {
    balance:         Leafs,
    clock:           SeasonClock,
    factors:         SeasonFactors,
    flat_rate_bonus: f64,
    multiplier:      f64,
    /// Non-multiplier purchases, newest first.
    owned_items:     Vec<ItemId>,
    display_limit:   usize,
}

impl EconomySimulation {
    pub fn new(config: &EconomyConfig, balance: Leafs) -> Self {
        Self {
            balance: sanitize_balance(balance),
            clock: SeasonClock::new(
                Season::Spring,
                config.season_duration_secs,
                config.transition_secs,
            ),
            factors: config.season_factors,
            flat_rate_bonus: 0.0,
            multiplier: 1.0,
            owned_items: Vec::new(),
            display_limit: config.display_limit,
        }
    }

    /// Restore persisted progress on top of a fresh simulation.
    /// Used by the save loader; values are clamped to their valid ranges.
    pub fn restore(
        mut self,
        season: Season,
        season_elapsed: Seconds,
        flat_rate_bonus: f64,
        multiplier: f64,
        owned_items: Vec<ItemId>,
    ) -> Self {
        self.clock.season = season;
        self.clock.elapsed = if season_elapsed.is_finite() {
            season_elapsed.clamp(0.0, self.clock.season_duration())
        } else {
            0.0
        };
        self.flat_rate_bonus = if flat_rate_bonus.is_finite() { flat_rate_bonus.max(0.0) } else { 0.0 };
        self.multiplier = if multiplier.is_finite() { multiplier.max(1.0) } else { 1.0 };
        self.owned_items = owned_items;
        self
    }

    /// Advance by `dt` seconds. Returns the number of season changes.
    pub fn advance(&mut self, dt: Seconds) -> u32 {
        if !(dt.is_finite() && dt > 0.0) {
            return 0;
        }
        let rollovers = self.clock.advance(dt);
        if rollovers > 0 {
            log::debug!(
                "season changed {rollovers}x, now {} (rate {:.3}/s)",
                self.clock.season.name(),
                self.effective_rate()
            );
        }
        self.balance += self.effective_rate() * dt;
        rollovers
    }

    pub fn effective_rate(&self) -> f64 {
        self.flat_rate_bonus * self.factors.factor(self.clock.season) * self.multiplier
    }

    /// Fold a purchase effect into the production state.
    pub fn apply_purchase_effect(&mut self, flat_rate: f64, multiplier: f64, item_id: Option<&str>) {
        let flat_rate = if flat_rate.is_finite() { flat_rate.max(0.0) } else { 0.0 };
        let multiplier = if multiplier.is_finite() { multiplier.max(1.0) } else { 1.0 };

        self.flat_rate_bonus += flat_rate;
        self.multiplier *= multiplier;
        if let Some(id) = item_id {
            if flat_rate > 0.0 {
                self.owned_items.insert(0, id.to_string());
            }
        }
    }

    /// Subtract `amount` from the balance. Returns the new balance.
    pub fn debit(&mut self, amount: Leafs) -> SimResult<Leafs> {
        if !(amount.is_finite() && amount >= 0.0) {
            return Err(SimError::InvalidAmount(amount));
        }
        if amount > self.balance {
            return Err(SimError::InsufficientFunds {
                needed:    amount,
                available: self.balance,
            });
        }
        self.balance -= amount;
        Ok(self.balance)
    }

    pub fn snapshot(&self) -> EconomySnapshot {
        EconomySnapshot {
            balance:                 self.balance,
            season:                  self.clock.season,
            effective_rate:          self.effective_rate(),
            plants_owned:            self.owned_items.len(),
            season_transition_alpha: self.clock.transition_alpha(),
            season_progress:         self.clock.progress(),
            season_time_left:        self.clock.time_left(),
            flat_rate_bonus:         self.flat_rate_bonus,
            multiplier:              self.multiplier,
        }
    }

    pub fn balance(&self) -> Leafs { self.balance }
    pub fn season(&self) -> Season { self.clock.season }
    pub fn season_elapsed(&self) -> Seconds { self.clock.elapsed }
    pub fn transition_timer(&self) -> Seconds { self.clock.transition_timer }
    pub fn flat_rate_bonus(&self) -> f64 { self.flat_rate_bonus }
    pub fn multiplier(&self) -> f64 { self.multiplier }

    /// Full purchase history, newest first.
    pub fn owned_items(&self) -> &[ItemId] {
        &self.owned_items
    }

    /// The part of the history the plant grid shows.
    pub fn displayed_items(&self) -> &[ItemId] {
        let end = self.owned_items.len().min(self.display_limit);
        &self.owned_items[..end]
    }
}

fn sanitize_balance(balance: Leafs) -> Leafs {
    if balance.is_finite() { balance.max(0.0) } else { 0.0 }
}
