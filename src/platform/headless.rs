//! Headless in-memory platform
//!
//! Keeps a node table instead of a scene graph and moves scrolling nodes
//! forward on `step`. No collision detection: contacts are fed in by the
//! caller. Used by the native binary and by tests.

use std::collections::BTreeMap;

use glam::Vec2;

use super::{AlertPresenter, Engine, Scheduler, dispatch};
use crate::consts::NORMAL_SCROLL_SPEED;
use crate::sim::{
    BackgroundTile, BirdSpec, Boundary, Category, Effect, EntityId, ObstaclePair,
    ScoreTriggerZone, SessionEvent, TimerId,
};

/// Downward acceleration applied to a dynamic bird (points/s²)
pub const HEADLESS_GRAVITY: f32 = -980.0;

/// How a node moves
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    Static,
    /// Scroll left one tile width per cycle, then snap back
    Loop { width: f32, cycle_secs: f32, travelled: f32 },
    /// Scroll left `remaining` more points, then get removed
    OneShot { speed: f32, remaining: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub category: Option<Category>,
    pub center: Vec2,
    pub size: Vec2,
    pub motion: Motion,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BirdBody {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub dynamic: bool,
}

/// In-memory engine
#[derive(Debug, Clone)]
pub struct HeadlessEngine {
    pub nodes: BTreeMap<EntityId, Node>,
    pub bird: Option<BirdBody>,
    pub scroll_speed: f32,
    pub input_enabled: bool,
    pub exit_requested: bool,
}

impl Default for HeadlessEngine {
    fn default() -> Self {
        Self {
            nodes: BTreeMap::new(),
            bird: None,
            scroll_speed: NORMAL_SCROLL_SPEED,
            input_enabled: true,
            exit_requested: false,
        }
    }
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes of one category, in id order
    pub fn nodes_of(&self, category: Category) -> impl Iterator<Item = (EntityId, &Node)> {
        self.nodes
            .iter()
            .filter(move |(_, node)| node.category == Some(category))
            .map(|(id, node)| (*id, node))
    }

    fn insert(&mut self, id: EntityId, node: Node) {
        if self.nodes.insert(id, node).is_some() {
            log::warn!("Entity {:?} spawned twice", id);
        }
    }

    /// Advance scrolling and the bird. Returns entities removed after
    /// finishing their scroll.
    pub fn step(&mut self, dt: f32) -> Vec<EntityId> {
        let speed = self.scroll_speed;
        let mut finished = Vec::new();

        for (id, node) in self.nodes.iter_mut() {
            match &mut node.motion {
                Motion::Static => {}
                Motion::Loop {
                    width,
                    cycle_secs,
                    travelled,
                } => {
                    let dx = *width / *cycle_secs * speed * dt;
                    node.center.x -= dx;
                    *travelled += dx;
                    if *travelled >= *width {
                        let wrapped = *travelled % *width;
                        node.center.x += *travelled - wrapped;
                        *travelled = wrapped;
                    }
                }
                Motion::OneShot {
                    speed: node_speed,
                    remaining,
                } => {
                    let dx = (*node_speed * speed * dt).min(*remaining);
                    node.center.x -= dx;
                    *remaining -= dx;
                    if *remaining <= 0.0 {
                        finished.push(*id);
                    }
                }
            }
        }
        for id in &finished {
            self.nodes.remove(id);
        }

        if let Some(bird) = self.bird.as_mut().filter(|b| b.dynamic) {
            bird.velocity.y += HEADLESS_GRAVITY * dt;
            bird.position += bird.velocity * dt;
        }

        finished
    }
}

impl Engine for HeadlessEngine {
    fn spawn_background(&mut self, tiles: &[BackgroundTile]) {
        for tile in tiles {
            self.insert(
                tile.id,
                Node {
                    category: None,
                    center: tile.center,
                    size: tile.size,
                    motion: Motion::Loop {
                        width: tile.size.x,
                        cycle_secs: tile.cycle_secs,
                        travelled: 0.0,
                    },
                },
            );
        }
    }

    fn spawn_bird(&mut self, bird: &BirdSpec) {
        self.bird = Some(BirdBody {
            id: bird.id,
            position: bird.position,
            velocity: Vec2::ZERO,
            dynamic: false,
        });
    }

    fn spawn_boundary(&mut self, boundary: &Boundary) {
        self.insert(
            boundary.id,
            Node {
                category: Some(boundary.category),
                center: boundary.center,
                size: boundary.size,
                motion: Motion::Static,
            },
        );
    }

    fn spawn_obstacle(&mut self, pair: &ObstaclePair) {
        for barrier in [pair.upper, pair.lower] {
            self.insert(
                barrier.id,
                Node {
                    category: Some(ObstaclePair::CATEGORY),
                    center: barrier.center,
                    size: barrier.size,
                    motion: Motion::OneShot {
                        speed: pair.scroll.speed,
                        remaining: pair.scroll.distance,
                    },
                },
            );
        }
    }

    fn spawn_trigger(&mut self, zone: &ScoreTriggerZone) {
        self.insert(
            zone.id,
            Node {
                category: Some(ScoreTriggerZone::CATEGORY),
                center: zone.center,
                size: zone.size,
                motion: Motion::OneShot {
                    speed: zone.scroll.speed,
                    remaining: zone.scroll.distance,
                },
            },
        );
    }

    fn despawn(&mut self, id: EntityId) {
        self.nodes.remove(&id);
    }

    fn zero_bird_velocity(&mut self) {
        if let Some(bird) = self.bird.as_mut() {
            bird.velocity = Vec2::ZERO;
        }
    }

    fn apply_bird_impulse(&mut self, impulse: Vec2) {
        // Unit mass
        if let Some(bird) = self.bird.as_mut().filter(|b| b.dynamic) {
            bird.velocity += impulse;
        }
    }

    fn set_bird_dynamic(&mut self, dynamic: bool) {
        if let Some(bird) = self.bird.as_mut() {
            bird.dynamic = dynamic;
        }
    }

    fn freeze_bird(&mut self) {
        if let Some(bird) = self.bird.as_mut() {
            bird.velocity = Vec2::ZERO;
            bird.dynamic = false;
        }
    }

    fn reset_bird(&mut self, position: Vec2) {
        if let Some(bird) = self.bird.as_mut() {
            bird.position = position;
            bird.velocity = Vec2::ZERO;
            bird.dynamic = false;
        }
    }

    fn set_scroll_speed(&mut self, speed: f32) {
        self.scroll_speed = speed;
    }

    fn set_input_enabled(&mut self, enabled: bool) {
        self.input_enabled = enabled;
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }
}

#[derive(Debug, Clone, Copy)]
struct Repeating {
    timer: TimerId,
    interval_secs: f32,
    elapsed: f32,
}

/// Repeating timers advanced by hand
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    timers: Vec<Repeating>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_armed(&self, timer: TimerId) -> bool {
        self.timers.iter().any(|t| t.timer == timer)
    }

    pub fn armed_count(&self) -> usize {
        self.timers.len()
    }

    /// Advance time; returns one entry per firing, in timer order
    pub fn advance(&mut self, dt: f32) -> Vec<TimerId> {
        let mut fired = Vec::new();
        for repeating in &mut self.timers {
            repeating.elapsed += dt;
            while repeating.elapsed >= repeating.interval_secs {
                repeating.elapsed -= repeating.interval_secs;
                fired.push(repeating.timer);
            }
        }
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&mut self, timer: TimerId, interval_secs: f32) {
        self.cancel(timer);
        if !(interval_secs > 0.0) {
            log::warn!("Refusing to arm {:?} with interval {}", timer, interval_secs);
            return;
        }
        self.timers.push(Repeating {
            timer,
            interval_secs,
            elapsed: 0.0,
        });
    }

    fn cancel(&mut self, timer: TimerId) {
        self.timers.retain(|t| t.timer != timer);
    }
}

/// Remembers every game-over alert
#[derive(Debug, Clone, Default)]
pub struct RecordingAlerts {
    /// Score shown by each alert, oldest first
    pub presented: Vec<u32>,
    showing: bool,
}

impl RecordingAlerts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_showing(&self) -> bool {
        self.showing
    }

    /// Close the alert, as if the player picked an option
    pub fn dismiss(&mut self) {
        self.showing = false;
    }
}

impl AlertPresenter for RecordingAlerts {
    fn present_game_over(&mut self, score: u32) {
        if self.showing {
            log::warn!("Game-over alert already showing");
        }
        self.showing = true;
        self.presented.push(score);
    }
}

/// All three headless ports together
#[derive(Debug, Clone, Default)]
pub struct Headless {
    pub engine: HeadlessEngine,
    pub scheduler: ManualScheduler,
    pub alerts: RecordingAlerts,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, effects: &[Effect]) {
        dispatch(effects, &mut self.engine, &mut self.scheduler, &mut self.alerts);
    }

    /// Advance time and collect the events the session should see
    pub fn step(&mut self, dt: f32) -> Vec<SessionEvent> {
        let mut events: Vec<SessionEvent> = self
            .engine
            .step(dt)
            .into_iter()
            .map(SessionEvent::ScrolledOff)
            .collect();
        events.extend(self.scheduler.advance(dt).into_iter().map(SessionEvent::SpawnTick));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::spawn;

    #[test]
    fn test_scheduler_fires_on_interval() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_repeating(TimerId(1), 3.0);
        assert!(scheduler.advance(2.9).is_empty());
        assert_eq!(scheduler.advance(0.2), vec![TimerId(1)]);
        assert_eq!(scheduler.advance(6.0), vec![TimerId(1), TimerId(1)]);

        scheduler.cancel(TimerId(1));
        assert!(scheduler.advance(10.0).is_empty());
        assert!(!scheduler.is_armed(TimerId(1)));
    }

    #[test]
    fn test_scheduler_rejects_non_positive_interval() {
        let mut scheduler = ManualScheduler::new();
        scheduler.schedule_repeating(TimerId(1), 0.0);
        scheduler.schedule_repeating(TimerId(2), -1.0);
        scheduler.schedule_repeating(TimerId(3), f32::NAN);
        assert_eq!(scheduler.armed_count(), 0);
        assert!(scheduler.advance(5.0).is_empty());
    }

    #[test]
    fn test_background_wraps_on_long_step() {
        let settings = Settings::default();
        let mut engine = HeadlessEngine::new();
        let tiles = spawn::place_background(&settings, &[EntityId(1)]);
        engine.spawn_background(&tiles);
        let start = tiles[0].center.x;
        let width = tiles[0].size.x;

        // Three and a half cycles in one step
        engine.step(tiles[0].cycle_secs * 3.5);
        let node = &engine.nodes[&EntityId(1)];
        assert!((node.center.x - (start - width / 2.0)).abs() < 1.0, "x = {}", node.center.x);
        let Motion::Loop { travelled, .. } = node.motion else {
            panic!("expected loop motion");
        };
        assert!((0.0..width).contains(&travelled));
    }

    #[test]
    fn test_obstacle_scrolls_off_and_is_removed() {
        let settings = Settings::default();
        let mut engine = HeadlessEngine::new();
        let pair = spawn::place_obstacle_pair(&settings, EntityId(1), EntityId(2), 0.0);
        engine.spawn_obstacle(&pair);

        let mut removed = Vec::new();
        let dt = 0.1;
        let steps = (pair.scroll.duration_secs() / dt).ceil() as usize + 1;
        for _ in 0..steps {
            removed.extend(engine.step(dt));
        }
        assert_eq!(removed, vec![EntityId(1), EntityId(2)]);
        assert!(engine.nodes.is_empty());
    }

    #[test]
    fn test_frozen_scroll_holds_position() {
        let settings = Settings::default();
        let mut engine = HeadlessEngine::new();
        let pair = spawn::place_obstacle_pair(&settings, EntityId(1), EntityId(2), 0.0);
        engine.spawn_obstacle(&pair);
        engine.set_scroll_speed(0.0);
        engine.step(1.0);
        assert_eq!(engine.nodes[&EntityId(1)].center, pair.upper.center);
    }

    #[test]
    fn test_background_loops() {
        let settings = Settings::default();
        let mut engine = HeadlessEngine::new();
        let tiles = spawn::place_background(&settings, &[EntityId(1)]);
        engine.spawn_background(&tiles);

        let start = tiles[0].center.x;
        let width = tiles[0].size.x;

        // Half a cycle: half a tile to the left
        for _ in 0..45 {
            engine.step(0.1);
        }
        let x = engine.nodes[&EntityId(1)].center.x;
        assert!((x - (start - width / 2.0)).abs() < 1.0, "x = {x}");

        // Past a full cycle the tile has snapped back
        for _ in 0..50 {
            engine.step(0.1);
        }
        let x = engine.nodes[&EntityId(1)].center.x;
        let expected = start - width * (9.5 / 9.0 - 1.0);
        assert!((x - expected).abs() < 1.0, "x = {x}");
    }

    #[test]
    fn test_bird_needs_dynamic_for_impulse() {
        let settings = Settings::default();
        let mut engine = HeadlessEngine::new();
        engine.spawn_bird(&spawn::place_bird(&settings, EntityId(1)));

        engine.apply_bird_impulse(Vec2::new(0.0, 50.0));
        assert_eq!(engine.bird.unwrap().velocity, Vec2::ZERO);

        engine.set_bird_dynamic(true);
        engine.apply_bird_impulse(Vec2::new(0.0, 50.0));
        assert_eq!(engine.bird.unwrap().velocity.y, 50.0);

        engine.freeze_bird();
        let bird = engine.bird.unwrap();
        assert!(!bird.dynamic);
        assert_eq!(bird.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_dispatch_routes_effects() {
        let mut headless = Headless::new();
        headless.apply(&[
            Effect::ScheduleSpawn {
                timer: TimerId(4),
                interval_secs: 3.0,
            },
            Effect::SetScrollSpeed(0.0),
            Effect::SetInputEnabled(false),
            Effect::PresentGameOver { score: 7 },
            Effect::Quit,
        ]);
        assert!(headless.scheduler.is_armed(TimerId(4)));
        assert_eq!(headless.engine.scroll_speed, 0.0);
        assert!(!headless.engine.input_enabled);
        assert_eq!(headless.alerts.presented, vec![7]);
        assert!(headless.alerts.is_showing());
        assert!(headless.engine.exit_requested);

        headless.apply(&[Effect::CancelSpawn(TimerId(4))]);
        assert_eq!(headless.scheduler.armed_count(), 0);
    }
}
