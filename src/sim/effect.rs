//! Requests the session hands to the integration layer
//!
//! The session never touches an engine. Every handler returns a list of
//! effects, in the order they should be applied.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spawn::{BackgroundTile, BirdSpec, Boundary, ObstaclePair, ScoreTriggerZone};
use super::state::{EntityId, TimerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    // === Scene ===
    SpawnBackground(Vec<BackgroundTile>),
    SpawnBird(BirdSpec),
    SpawnBoundary(Boundary),
    SpawnObstacle(ObstaclePair),
    SpawnTrigger(ScoreTriggerZone),
    Despawn(EntityId),

    // === Bird ===
    /// Clear the bird's velocity
    ZeroBirdVelocity,
    /// Apply an impulse to the bird
    ApplyImpulse(Vec2),
    /// Turn physics simulation on/off for the bird
    SetBirdDynamic(bool),
    /// Stop the bird dead and take it out of the simulation
    FreezeBird,
    /// Put the bird back at `position`, at rest, physics off
    ResetBird { position: Vec2 },

    // === World ===
    /// Multiplier on every scrolling action; 0 freezes the scene
    SetScrollSpeed(f32),
    SetInputEnabled(bool),

    // === Timer ===
    ScheduleSpawn { timer: TimerId, interval_secs: f32 },
    CancelSpawn(TimerId),

    // === Alert ===
    PresentGameOver { score: u32 },
    Quit,
}

impl Effect {
    /// Short name for logging
    pub fn name(&self) -> &'static str {
        match self {
            Effect::SpawnBackground(_) => "spawn-background",
            Effect::SpawnBird(_) => "spawn-bird",
            Effect::SpawnBoundary(_) => "spawn-boundary",
            Effect::SpawnObstacle(_) => "spawn-obstacle",
            Effect::SpawnTrigger(_) => "spawn-trigger",
            Effect::Despawn(_) => "despawn",
            Effect::ZeroBirdVelocity => "zero-bird-velocity",
            Effect::ApplyImpulse(_) => "apply-impulse",
            Effect::SetBirdDynamic(_) => "set-bird-dynamic",
            Effect::FreezeBird => "freeze-bird",
            Effect::ResetBird { .. } => "reset-bird",
            Effect::SetScrollSpeed(_) => "set-scroll-speed",
            Effect::SetInputEnabled(_) => "set-input-enabled",
            Effect::ScheduleSpawn { .. } => "schedule-spawn",
            Effect::CancelSpawn(_) => "cancel-spawn",
            Effect::PresentGameOver { .. } => "present-game-over",
            Effect::Quit => "quit",
        }
    }
}
