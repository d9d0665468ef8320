//! The game session: one play-through from load to quit.
//!
//! FRAME ORDER (fixed):
//!   1. Presentation samples dt and calls tick(dt).
//!   2. The simulation advances; season changes become events.
//!   3. Autosave runs when its interval has passed.
//!   4. Presentation renders snapshot() and listing().
//!
//! RULES:
//!   - The catalog resolves purchases; the session debits and applies
//!     the effect. The catalog never sees the simulation.
//!   - All I/O goes through the injected FileStore.
//!   - Nothing here is fatal to a running session: failed purchases and
//!     failed autosaves are reported, logged, and the game goes on.

use crate::{
    audio::{AudioNotifier, SoundCue},
    command::PlayerCommand,
    config::GameConfig,
    error::{SimError, SimResult},
    event::GameEvent,
    file_store::FileStore,
    save::{self, SaveDocument, SAVE_FILE},
    shop::{PurchaseReceipt, ShopCatalog, ShopListing},
    simulation::EconomySimulation,
    snapshot::EconomySnapshot,
    types::{new_session_id, Seconds, SessionId},
};
use chrono::Utc;

pub struct GameSession {
    pub session_id: SessionId,
    config:         GameConfig,
    sim:            EconomySimulation,
    catalog:        ShopCatalog,
    store:          Box<dyn FileStore>,
    audio:          Box<dyn AudioNotifier>,
    /// Total simulated time this session.
    elapsed:        Seconds,
    autosave_timer: Seconds,
    events:         Vec<GameEvent>,
}

impl GameSession {
    /// Build a session from an already parsed save document.
    pub fn from_document(
        doc: &SaveDocument,
        config: GameConfig,
        store: Box<dyn FileStore>,
        audio: Box<dyn AudioNotifier>,
    ) -> SimResult<Self> {
        Self::build(doc, config, store, audio, true)
    }

    fn build(
        doc: &SaveDocument,
        config: GameConfig,
        store: Box<dyn FileStore>,
        audio: Box<dyn AudioNotifier>,
        from_save: bool,
    ) -> SimResult<Self> {
        let (sim, catalog) = save::deserialize(doc, &config)?;
        let session_id = new_session_id();
        audio.play_sound(SoundCue::Start);
        Ok(Self {
            events: vec![GameEvent::SessionStarted {
                session_id: session_id.clone(),
                from_save,
            }],
            session_id,
            config,
            sim,
            catalog,
            store,
            audio,
            elapsed: 0.0,
            autosave_timer: 0.0,
        })
    }

    /// Start over from the new game document. Does not touch the store
    /// until the first save.
    pub fn new_game(
        config: GameConfig,
        store: Box<dyn FileStore>,
        audio: Box<dyn AudioNotifier>,
    ) -> SimResult<Self> {
        let doc = SaveDocument::new_game(&config);
        Self::build(&doc, config, store, audio, false)
    }

    /// Continue from the stored save. A missing save starts a new game;
    /// a corrupt one is logged and replaced by a new game.
    pub fn load_or_new(
        config: GameConfig,
        store: Box<dyn FileStore>,
        audio: Box<dyn AudioNotifier>,
    ) -> SimResult<Self> {
        let (doc, from_save, recovered) = match store.read_file(SAVE_FILE)? {
            Some(bytes) => match SaveDocument::from_bytes(&bytes) {
                Ok(doc) => (doc, true, None),
                Err(e) => {
                    log::warn!("{SAVE_FILE} unreadable, starting a new game: {e}");
                    (SaveDocument::new_game(&config), false, Some(e.to_string()))
                }
            },
            None => {
                log::info!("No {SAVE_FILE} found, starting a new game");
                (SaveDocument::new_game(&config), false, None)
            }
        };

        let mut session = Self::build(&doc, config, store, audio, from_save)?;
        if let Some(reason) = recovered {
            session.events.push(GameEvent::SaveRecovered { reason });
        }
        log::info!(
            "Session {} loaded: {:.1} leafs, {} plants, season {}",
            session.session_id,
            session.sim.balance(),
            session.sim.owned_items().len(),
            session.sim.season().name()
        );
        Ok(session)
    }

    /// Advance the session by one frame of `dt` seconds.
    /// Returns every event recorded since the previous call.
    pub fn tick(&mut self, dt: Seconds) -> Vec<GameEvent> {
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
            let rollovers = self.sim.advance(dt);
            if rollovers > 0 {
                self.events.push(GameEvent::SeasonChanged {
                    elapsed: self.elapsed,
                    season: self.sim.season(),
                    rollovers,
                });
            }

            self.autosave_timer += dt;
            let interval = self.config.economy.autosave_interval_secs;
            if interval > 0.0 && self.autosave_timer >= interval {
                self.autosave_timer = 0.0;
                if let Err(e) = self.write_save(true) {
                    log::warn!("Autosave failed: {e}");
                    self.events.push(GameEvent::SaveFailed {
                        elapsed: self.elapsed,
                        reason:  e.to_string(),
                    });
                }
            }
        }

        std::mem::take(&mut self.events)
    }

    /// Buy `item_id` with the current balance.
    ///
    /// On error the balance, the catalog and the production state are
    /// exactly as before the call.
    pub fn purchase(&mut self, item_id: &str) -> SimResult<PurchaseReceipt> {
        match self.catalog.purchase(item_id, self.sim.balance()) {
            Ok(receipt) => {
                self.sim.debit(receipt.cost as f64)?;
                self.sim.apply_purchase_effect(
                    receipt.effect.flat_rate,
                    receipt.effect.multiplier,
                    receipt.effect.grid_item.as_deref(),
                );
                self.audio.play_sound(SoundCue::Select);
                self.events.push(GameEvent::ItemPurchased {
                    elapsed:     self.elapsed,
                    item_id:     receipt.item_id.clone(),
                    cost:        receipt.cost,
                    new_balance: self.sim.balance(),
                });
                Ok(receipt)
            }
            Err(e) => {
                if e.is_purchase_rejection() {
                    self.audio.play_sound(SoundCue::Error);
                } else if let SimError::ItemNotFound { .. } = e {
                    log::warn!("Purchase ignored: {e}");
                }
                self.events.push(GameEvent::PurchaseRejected {
                    elapsed: self.elapsed,
                    item_id: item_id.to_string(),
                    reason:  e.to_string(),
                });
                Err(e)
            }
        }
    }

    pub fn apply_command(&mut self, command: &PlayerCommand) -> SimResult<()> {
        match command {
            PlayerCommand::Purchase { item_id } => self.purchase(item_id).map(|_| ()),
            PlayerCommand::Save => self.save().map(|_| ()),
        }
    }

    /// Write the save document now.
    pub fn save(&mut self) -> SimResult<SaveDocument> {
        self.write_save(false)
    }

    /// Final save at the end of the session.
    pub fn quit(mut self) -> SimResult<SaveDocument> {
        let doc = self.write_save(false)?;
        log::info!("Session {} closed after {:.1}s", self.session_id, self.elapsed);
        Ok(doc)
    }

    fn write_save(&mut self, autosave: bool) -> SimResult<SaveDocument> {
        let mut doc = save::serialize(&self.sim, &self.catalog);
        doc.stamp(Utc::now());
        self.store.write_file(SAVE_FILE, &doc.to_bytes()?)?;
        log::debug!(
            "Saved {SAVE_FILE} ({}): {:.1} leafs",
            if autosave { "autosave" } else { "manual" },
            doc.leafs
        );
        self.events.push(GameEvent::GameSaved {
            elapsed: self.elapsed,
            balance: doc.leafs,
            autosave,
        });
        Ok(doc)
    }

    /// Record a player-facing sound that has no economic effect
    /// (hovering a button, closing a dialog).
    pub fn notify(&self, cue: SoundCue) {
        self.audio.play_sound(cue);
    }

    pub fn snapshot(&self) -> EconomySnapshot {
        self.sim.snapshot()
    }

    pub fn listing(&self) -> Vec<ShopListing> {
        self.catalog.listing(self.sim.balance())
    }

    pub fn simulation(&self) -> &EconomySimulation {
        &self.sim
    }

    pub fn catalog(&self) -> &ShopCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }
}
