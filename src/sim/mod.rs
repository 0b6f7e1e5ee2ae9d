//! Gameplay core
//!
//! Everything the game decides lives here. This module must stay engine-free:
//! - Plain data in (events), plain data out (effects)
//! - Seeded RNG only
//! - No rendering, physics or platform dependencies

pub mod contact;
pub mod effect;
pub mod session;
pub mod spawn;
pub mod state;

pub use contact::{Body, Category, Contact, ContactKind, classify};
pub use effect::Effect;
pub use session::{Session, SessionEvent};
pub use spawn::{
    BackgroundTile, Barrier, BirdSpec, Boundary, ObstaclePair, ScoreTriggerZone, ScrollPlan,
};
pub use state::{EntityId, GamePhase, GameState, RngState, TimerId, Tracked, TrackedKind};
