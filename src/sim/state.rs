//! Session state and handle types
//!
//! Everything here is plain data: the controller mutates it, adapters only
//! ever see copies carried inside effects.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Handle for an entity the engine owns on the session's behalf
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Handle for a repeating spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimerId(pub u32);

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Bird parked at the start, waiting for the first tap
    Ready,
    /// Bird is flying and obstacles are spawning
    Flying,
    /// Round ended, waiting for Play Again / Quit
    GameOver,
}

/// Score and round flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GameState {
    /// Gaps passed this round
    pub score: u32,
    /// Set once by the first fatal contact
    pub is_over: bool,
    /// Taps this round; zero means spawning has not started
    pub touch_count: u32,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> GamePhase {
        if self.is_over {
            GamePhase::GameOver
        } else if self.touch_count == 0 {
            GamePhase::Ready
        } else {
            GamePhase::Flying
        }
    }
}

/// What a tracked entity is, for bookkeeping and clean-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackedKind {
    Background,
    Barrier,
    ScoreTrigger,
}

/// An engine entity the session is responsible for removing on restart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tracked {
    pub id: EntityId,
    pub kind: TrackedKind,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn to_rng(&self) -> Pcg32 {
        Pcg32::seed_from_u64(self.seed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        let mut state = GameState::new();
        assert_eq!(state.phase(), GamePhase::Ready);

        state.touch_count = 1;
        assert_eq!(state.phase(), GamePhase::Flying);

        state.is_over = true;
        assert_eq!(state.phase(), GamePhase::GameOver);
    }

    #[test]
    fn test_rng_state_is_reproducible() {
        use rand::Rng;

        let state = RngState::new(42);
        let a: u32 = state.to_rng().random();
        let b: u32 = state.to_rng().random();
        assert_eq!(a, b);
    }
}
