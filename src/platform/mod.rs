//! Platform abstraction layer
//!
//! The session only produces effects. Adapters for a concrete engine
//! implement these ports and hand effects to [`dispatch`]:
//! - `Engine`: scene graph, bird body, scrolling, input gating
//! - `Scheduler`: repeating spawn timer
//! - `AlertPresenter`: game-over dialog

pub mod headless;

use glam::Vec2;

use crate::sim::{
    BackgroundTile, BirdSpec, Boundary, Effect, EntityId, ObstaclePair, ScoreTriggerZone, TimerId,
};

pub use headless::{Headless, HeadlessEngine, ManualScheduler, RecordingAlerts};

/// Scene graph and physics owned by the host engine
pub trait Engine {
    fn spawn_background(&mut self, tiles: &[BackgroundTile]);
    fn spawn_bird(&mut self, bird: &BirdSpec);
    fn spawn_boundary(&mut self, boundary: &Boundary);
    fn spawn_obstacle(&mut self, pair: &ObstaclePair);
    fn spawn_trigger(&mut self, zone: &ScoreTriggerZone);
    fn despawn(&mut self, id: EntityId);

    fn zero_bird_velocity(&mut self);
    fn apply_bird_impulse(&mut self, impulse: Vec2);
    fn set_bird_dynamic(&mut self, dynamic: bool);
    fn freeze_bird(&mut self);
    fn reset_bird(&mut self, position: Vec2);

    fn set_scroll_speed(&mut self, speed: f32);
    fn set_input_enabled(&mut self, enabled: bool);
    fn request_exit(&mut self);
}

/// Repeating timer service
pub trait Scheduler {
    fn schedule_repeating(&mut self, timer: TimerId, interval_secs: f32);
    fn cancel(&mut self, timer: TimerId);
}

/// Modal game-over dialog. The player's choice comes back as
/// `SessionEvent::PlayAgain` or `SessionEvent::Quit`.
pub trait AlertPresenter {
    fn present_game_over(&mut self, score: u32);
}

/// Apply effects in order
pub fn dispatch<E, S, A>(effects: &[Effect], engine: &mut E, scheduler: &mut S, alerts: &mut A)
where
    E: Engine + ?Sized,
    S: Scheduler + ?Sized,
    A: AlertPresenter + ?Sized,
{
    for effect in effects {
        log::trace!("Applying {}", effect.name());
        match effect {
            Effect::SpawnBackground(tiles) => engine.spawn_background(tiles),
            Effect::SpawnBird(bird) => engine.spawn_bird(bird),
            Effect::SpawnBoundary(boundary) => engine.spawn_boundary(boundary),
            Effect::SpawnObstacle(pair) => engine.spawn_obstacle(pair),
            Effect::SpawnTrigger(zone) => engine.spawn_trigger(zone),
            Effect::Despawn(id) => engine.despawn(*id),
            Effect::ZeroBirdVelocity => engine.zero_bird_velocity(),
            Effect::ApplyImpulse(impulse) => engine.apply_bird_impulse(*impulse),
            Effect::SetBirdDynamic(dynamic) => engine.set_bird_dynamic(*dynamic),
            Effect::FreezeBird => engine.freeze_bird(),
            Effect::ResetBird { position } => engine.reset_bird(*position),
            Effect::SetScrollSpeed(speed) => engine.set_scroll_speed(*speed),
            Effect::SetInputEnabled(enabled) => engine.set_input_enabled(*enabled),
            Effect::ScheduleSpawn {
                timer,
                interval_secs,
            } => scheduler.schedule_repeating(*timer, *interval_secs),
            Effect::CancelSpawn(timer) => scheduler.cancel(*timer),
            Effect::PresentGameOver { score } => alerts.present_game_over(*score),
            Effect::Quit => engine.request_exit(),
        }
    }
}
