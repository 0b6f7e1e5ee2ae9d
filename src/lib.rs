//! Flappy Session - engine-agnostic Flappy Bird gameplay core
//!
//! Core modules:
//! - `sim`: Session controller (events in, effects out), placement, contacts
//! - `platform`: Engine/scheduler/alert ports plus a headless implementation
//! - `settings`: Data-driven scene and gameplay tuning

pub mod platform;
pub mod settings;
pub mod sim;

pub use settings::{ConfigError, Settings};
pub use sim::{Effect, GameState, Session, SessionEvent};

/// Default scene configuration constants
pub mod consts {
    /// Scene dimensions (points)
    pub const VIEWPORT_WIDTH: f32 = 768.0;
    pub const VIEWPORT_HEIGHT: f32 = 1024.0;

    /// Bird sprite size
    pub const BIRD_WIDTH: f32 = 68.0;
    pub const BIRD_HEIGHT: f32 = 48.0;

    /// Pipe sprite size
    pub const PIPE_WIDTH: f32 = 104.0;
    pub const PIPE_HEIGHT: f32 = 640.0;

    /// Background texture width; three tiles cover the scroll loop
    pub const BACKGROUND_TILE_WIDTH: f32 = 1024.0;
    pub const BACKGROUND_TILES: u32 = 3;
    /// Seconds for one tile width of background scroll
    pub const BACKGROUND_CYCLE_SECS: f32 = 9.0;

    /// Upward impulse applied on every tap
    pub const FLAP_IMPULSE: f32 = 50.0;
    /// Seconds between obstacle spawns once the first tap arms the timer
    pub const SPAWN_INTERVAL_SECS: f32 = 3.0;
    /// Horizontal obstacle speed (points/s)
    pub const PIPE_SPEED: f32 = 100.0;
    /// Gap between upper and lower pipe, in bird heights
    pub const GAP_BIRD_HEIGHTS: f32 = 4.0;
    /// Max vertical gap offset as a fraction of viewport height
    pub const GAP_OFFSET_FRACTION: f32 = 0.25;

    /// Scene speed while playing; zero freezes all scrolling
    pub const NORMAL_SCROLL_SPEED: f32 = 1.0;
}
