//! Leafy Loot economy engine.
//!
//! Leafs accrue over time at a rate set by purchased plants, purchased
//! upgrades, and the current season. The engine owns that arithmetic and
//! the save format; rendering, audio playback and input stay outside and
//! talk to it through `GameSession`, `FileStore` and `AudioNotifier`.

pub mod audio;
pub mod autoplay;
pub mod clock;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod file_store;
pub mod rng;
pub mod save;
pub mod settings;
pub mod shop;
pub mod simulation;
pub mod snapshot;
pub mod store;
pub mod types;
