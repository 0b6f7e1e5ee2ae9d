//! Scene placement
//!
//! Pure geometry: given the settings (and a gap offset for obstacles) work
//! out where every entity goes and how it scrolls. Positions are entity
//! centres in scene coordinates with the origin at the bottom-left.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::contact::Category;
use super::state::EntityId;
use crate::settings::Settings;

/// One-shot leftward scroll; the engine removes the entity at the end
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollPlan {
    /// Distance travelled left (points)
    pub distance: f32,
    /// Speed (points/s)
    pub speed: f32,
}

impl ScrollPlan {
    pub fn duration_secs(&self) -> f32 {
        self.distance / self.speed
    }
}

/// One solid pipe
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Barrier {
    pub id: EntityId,
    pub center: Vec2,
    pub size: Vec2,
}

/// Upper and lower pipe around one gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub upper: Barrier,
    pub lower: Barrier,
    /// Gap centre offset from the scene's vertical middle
    pub offset: f32,
    pub gap_height: f32,
    pub scroll: ScrollPlan,
}

impl ObstaclePair {
    pub const CATEGORY: Category = Category::Solid;

    /// Vertical centre of the gap
    pub fn gap_center_y(&self) -> f32 {
        (self.upper.bottom() + self.lower.top()) / 2.0
    }
}

impl Barrier {
    pub fn top(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }
}

/// Invisible region filling a gap; touching it scores once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreTriggerZone {
    pub id: EntityId,
    pub center: Vec2,
    pub size: Vec2,
    pub scroll: ScrollPlan,
}

impl ScoreTriggerZone {
    pub const CATEGORY: Category = Category::ScoreTrigger;
}

/// A looping background tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundTile {
    pub id: EntityId,
    pub center: Vec2,
    pub size: Vec2,
    /// Seconds to scroll one tile width before snapping back
    pub cycle_secs: f32,
}

/// Static edge of the play area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    pub id: EntityId,
    pub category: Category,
    pub center: Vec2,
    pub size: Vec2,
}

/// Initial bird placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BirdSpec {
    pub id: EntityId,
    pub position: Vec2,
    pub size: Vec2,
    /// Circular body radius
    pub radius: f32,
}

/// Draw a gap offset uniformly from `[-max, max]`
pub fn random_gap_offset<R: Rng>(settings: &Settings, rng: &mut R) -> f32 {
    let max = settings.max_gap_offset();
    if max <= 0.0 {
        return 0.0;
    }
    rng.random_range(-max..=max)
}

/// Obstacles start just past the right edge and travel until their left
/// edge is past `-width`
pub fn obstacle_scroll(settings: &Settings) -> ScrollPlan {
    ScrollPlan {
        distance: settings.viewport.x * 2.0 + settings.pipe_size.x,
        speed: settings.pipe_speed,
    }
}

fn obstacle_start_x(settings: &Settings) -> f32 {
    settings.viewport.x + settings.pipe_size.x
}

/// Place a pipe pair around a gap shifted by `offset`
pub fn place_obstacle_pair(
    settings: &Settings,
    upper_id: EntityId,
    lower_id: EntityId,
    offset: f32,
) -> ObstaclePair {
    let mid_y = settings.center().y;
    let gap = settings.gap_height();
    let pipe = settings.pipe_size;
    let x = obstacle_start_x(settings);

    ObstaclePair {
        upper: Barrier {
            id: upper_id,
            center: Vec2::new(x, mid_y + pipe.y / 2.0 + gap / 2.0 + offset),
            size: pipe,
        },
        lower: Barrier {
            id: lower_id,
            center: Vec2::new(x, mid_y - pipe.y / 2.0 - gap / 2.0 + offset),
            size: pipe,
        },
        offset,
        gap_height: gap,
        scroll: obstacle_scroll(settings),
    }
}

/// Place the trigger zone filling a pair's gap
pub fn place_score_trigger(settings: &Settings, id: EntityId, pair: &ObstaclePair) -> ScoreTriggerZone {
    ScoreTriggerZone {
        id,
        center: Vec2::new(pair.upper.center.x, pair.gap_center_y()),
        size: Vec2::new(settings.pipe_size.x, pair.gap_height),
        scroll: pair.scroll,
    }
}

/// Lay background tiles side by side from the left edge
pub fn place_background(settings: &Settings, ids: &[EntityId]) -> Vec<BackgroundTile> {
    let width = settings.background_tile_width;
    let mid_y = settings.center().y;

    ids.iter()
        .enumerate()
        .map(|(i, &id)| BackgroundTile {
            id,
            center: Vec2::new(width / 2.0 + width * i as f32, mid_y),
            size: Vec2::new(width, settings.viewport.y),
            cycle_secs: settings.background_cycle_secs,
        })
        .collect()
}

/// Ground along the bottom edge
pub fn place_ground(settings: &Settings, id: EntityId) -> Boundary {
    Boundary {
        id,
        category: Category::Solid,
        center: Vec2::new(settings.viewport.x / 2.0, 0.0),
        size: Vec2::new(settings.viewport.x, 1.0),
    }
}

/// Sky along the top edge
pub fn place_sky(settings: &Settings, id: EntityId) -> Boundary {
    Boundary {
        id,
        category: Category::Sky,
        center: Vec2::new(settings.viewport.x / 2.0, settings.viewport.y),
        size: Vec2::new(settings.viewport.x, 1.0),
    }
}

/// Bird start position: scene centre
pub fn bird_start(settings: &Settings) -> Vec2 {
    settings.center()
}

pub fn place_bird(settings: &Settings, id: EntityId) -> BirdSpec {
    BirdSpec {
        id,
        position: bird_start(settings),
        size: settings.bird_size,
        radius: settings.bird_size.y / 2.0,
    }
}
