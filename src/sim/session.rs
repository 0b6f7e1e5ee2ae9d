//! Game session controller
//!
//! Turns taps, timer ticks, contacts and alert choices into state changes
//! plus a list of effects for the engine to carry out.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::contact::{Category, Contact, ContactKind};
use super::effect::Effect;
use super::spawn;
use super::state::{EntityId, GamePhase, GameState, RngState, TimerId, Tracked, TrackedKind};
use crate::consts::NORMAL_SCROLL_SPEED;
use crate::settings::Settings;

/// Input delivered to the session by the integration layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Screen touched
    Tap,
    /// A repeating spawn timer fired
    SpawnTick(TimerId),
    /// Two bodies started touching
    Contact(Contact),
    /// The engine removed an entity after it scrolled off-screen
    ScrolledOff(EntityId),
    /// Game-over alert: "Play Again"
    PlayAgain,
    /// Game-over alert: "Quit"
    Quit,
}

/// One player's run of rounds
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    state: GameState,
    rng_state: RngState,
    rng: Pcg32,
    started: bool,
    bird: Option<EntityId>,
    /// Background, pipes and live triggers, in spawn order
    tracked: Vec<Tracked>,
    spawn_timer: Option<TimerId>,
    next_id: u32,
    next_timer: u32,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let rng_state = RngState::new(seed);
        Self {
            rng: rng_state.to_rng(),
            rng_state,
            settings,
            state: GameState::new(),
            started: false,
            bird: None,
            tracked: Vec::new(),
            spawn_timer: None,
            next_id: 1,
            next_timer: 1,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.rng_state.seed
    }

    pub fn bird(&self) -> Option<EntityId> {
        self.bird
    }

    /// Currently armed spawn timer
    pub fn spawn_timer(&self) -> Option<TimerId> {
        self.spawn_timer
    }

    pub fn tracked(&self) -> &[Tracked] {
        &self.tracked
    }

    /// Triggers that can still score
    pub fn live_triggers(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.tracked_of(TrackedKind::ScoreTrigger)
    }

    /// Pipes currently on their way across the screen
    pub fn barriers(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.tracked_of(TrackedKind::Barrier)
    }

    fn tracked_of(&self, kind: TrackedKind) -> impl Iterator<Item = EntityId> + '_ {
        self.tracked
            .iter()
            .filter(move |t| t.kind == kind)
            .map(|t| t.id)
    }

    fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    fn next_timer_id(&mut self) -> TimerId {
        let id = TimerId(self.next_timer);
        self.next_timer += 1;
        id
    }

    fn track(&mut self, id: EntityId, kind: TrackedKind) {
        self.tracked.push(Tracked { id, kind });
    }

    /// Dispatch a single event
    pub fn handle(&mut self, event: SessionEvent) -> Vec<Effect> {
        match event {
            SessionEvent::Tap => self.on_tap(),
            SessionEvent::SpawnTick(timer) => self.on_spawn_tick(timer),
            SessionEvent::Contact(contact) => self.on_contact(contact),
            SessionEvent::ScrolledOff(id) => {
                self.on_scrolled_off(id);
                Vec::new()
            }
            SessionEvent::PlayAgain => self.restart(),
            SessionEvent::Quit => self.quit(),
        }
    }

    /// Build the initial scene: background, bird, ground and sky
    pub fn start(&mut self) -> Vec<Effect> {
        if self.started {
            log::warn!("Session already started, ignoring start");
            return Vec::new();
        }
        self.started = true;

        let mut effects = vec![self.spawn_background()];

        let bird_id = self.next_entity_id();
        self.bird = Some(bird_id);
        effects.push(Effect::SpawnBird(spawn::place_bird(&self.settings, bird_id)));

        let ground_id = self.next_entity_id();
        effects.push(Effect::SpawnBoundary(spawn::place_ground(&self.settings, ground_id)));
        let sky_id = self.next_entity_id();
        effects.push(Effect::SpawnBoundary(spawn::place_sky(&self.settings, sky_id)));

        log::info!("Session started (seed {})", self.rng_state.seed);
        effects
    }

    fn spawn_background(&mut self) -> Effect {
        let ids: Vec<EntityId> = (0..self.settings.background_tiles)
            .map(|_| self.next_entity_id())
            .collect();
        for &id in &ids {
            self.track(id, TrackedKind::Background);
        }
        Effect::SpawnBackground(spawn::place_background(&self.settings, &ids))
    }

    /// Flap. The first tap of a round also wakes the bird and arms spawning.
    pub fn on_tap(&mut self) -> Vec<Effect> {
        if self.state.is_over {
            log::debug!("Tap ignored: round is over");
            return Vec::new();
        }

        let mut effects = Vec::with_capacity(4);

        if self.state.touch_count == 0 {
            let timer = self.next_timer_id();
            self.spawn_timer = Some(timer);
            effects.push(Effect::SetBirdDynamic(true));
            effects.push(Effect::ScheduleSpawn {
                timer,
                interval_secs: self.settings.spawn_interval_secs,
            });
            log::info!("First tap, spawning every {}s", self.settings.spawn_interval_secs);
        }
        self.state.touch_count = self.state.touch_count.saturating_add(1);

        effects.push(Effect::ZeroBirdVelocity);
        effects.push(Effect::ApplyImpulse(glam::Vec2::new(0.0, self.settings.flap_impulse)));
        effects
    }

    /// Spawn one pipe pair and its score trigger
    pub fn on_spawn_tick(&mut self, timer: TimerId) -> Vec<Effect> {
        if self.state.is_over {
            log::debug!("Spawn tick ignored: round is over");
            return Vec::new();
        }
        if self.spawn_timer != Some(timer) {
            log::warn!("Stale spawn tick from {:?} (armed: {:?})", timer, self.spawn_timer);
            return Vec::new();
        }

        let offset = spawn::random_gap_offset(&self.settings, &mut self.rng);
        let upper = self.next_entity_id();
        let lower = self.next_entity_id();
        let trigger = self.next_entity_id();

        let pair = spawn::place_obstacle_pair(&self.settings, upper, lower, offset);
        let zone = spawn::place_score_trigger(&self.settings, trigger, &pair);

        self.track(upper, TrackedKind::Barrier);
        self.track(lower, TrackedKind::Barrier);
        self.track(trigger, TrackedKind::ScoreTrigger);

        log::debug!("Spawned pipes {:?}/{:?} with gap offset {:.1}", upper, lower, offset);
        vec![Effect::SpawnObstacle(pair), Effect::SpawnTrigger(zone)]
    }

    /// React to a new contact between two bodies
    pub fn on_contact(&mut self, contact: Contact) -> Vec<Effect> {
        if self.state.is_over {
            return Vec::new();
        }

        match contact.kind() {
            ContactKind::Score => self.score_trigger(contact),
            ContactKind::Ignore => Vec::new(),
            ContactKind::Fatal => self.game_over(contact),
        }
    }

    fn score_trigger(&mut self, contact: Contact) -> Vec<Effect> {
        let Some(trigger) = contact.find(Category::ScoreTrigger) else {
            return Vec::new();
        };
        let live = self
            .tracked
            .iter()
            .position(|t| t.id == trigger.id && t.kind == TrackedKind::ScoreTrigger);
        let Some(index) = live else {
            log::debug!("Trigger {:?} already consumed", trigger.id);
            return Vec::new();
        };

        self.tracked.remove(index);
        self.state.score = self.state.score.saturating_add(1);
        log::debug!("Score {}", self.state.score);
        vec![Effect::Despawn(trigger.id)]
    }

    fn game_over(&mut self, contact: Contact) -> Vec<Effect> {
        self.state.is_over = true;
        log::info!(
            "Game over: {:?} hit {:?}, score {}",
            contact.a.category,
            contact.b.category,
            self.state.score
        );

        let mut effects = vec![
            Effect::FreezeBird,
            Effect::SetScrollSpeed(0.0),
            Effect::SetInputEnabled(false),
        ];
        if let Some(timer) = self.spawn_timer.take() {
            effects.push(Effect::CancelSpawn(timer));
        }
        effects.push(Effect::PresentGameOver {
            score: self.state.score,
        });
        effects
    }

    /// Forget an entity the engine has already removed
    pub fn on_scrolled_off(&mut self, id: EntityId) {
        let before = self.tracked.len();
        self.tracked.retain(|t| t.id != id);
        if self.tracked.len() == before {
            log::debug!("Scrolled-off entity {:?} was not tracked", id);
        }
    }

    /// Start a fresh round: clear the course, park the bird, reset the score
    pub fn restart(&mut self) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(self.tracked.len() + 5);

        if let Some(timer) = self.spawn_timer.take() {
            effects.push(Effect::CancelSpawn(timer));
        }
        effects.extend(self.tracked.drain(..).map(|t| Effect::Despawn(t.id)));
        effects.push(self.spawn_background());
        effects.push(Effect::ResetBird {
            position: spawn::bird_start(&self.settings),
        });
        effects.push(Effect::SetScrollSpeed(NORMAL_SCROLL_SPEED));
        effects.push(Effect::SetInputEnabled(true));

        self.state = GameState::new();
        log::info!("Round restarted");
        effects
    }

    /// Leave the game
    pub fn quit(&mut self) -> Vec<Effect> {
        log::info!("Quit with score {}", self.state.score);
        vec![Effect::Quit]
    }
}
