//! Session controller
//!
//! Owns the one live [`GameState`], the RNG, the fixed-step clock and the
//! progress store. Input is captured between ticks and applied at the start
//! of the next one; progression results are queued as [`SessionEvent`]s for
//! the UI layer to drain.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::error::{GameError, Result};
use crate::level::Level;
use crate::progress::ProgressStore;
use crate::settings::Settings;
use crate::sim::{self, GameState, TickInput, Viewport};

/// Longest frame delta fed into the clock, in seconds
const MAX_FRAME_DT: f32 = 0.25;

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStepClock {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedStepClock {
    pub fn new(step: f32, max_substeps: u32) -> Self {
        Self {
            step,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed elapsed wall time, returns how many ticks to run
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0;
        }
        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= self.step && substeps < self.max_substeps {
            self.accumulator -= self.step;
            substeps += 1;
        }
        // Drop the backlog instead of spiralling
        if substeps == self.max_substeps {
            self.accumulator = self.accumulator.min(self.step);
        }
        substeps
    }

    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}

impl Default for FixedStepClock {
    fn default() -> Self {
        Self::new(SIM_DT, MAX_SUBSTEPS)
    }
}

/// Notifications for the UI layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionEvent {
    /// The score reached the next level's requirement (once per level, ever)
    LevelAvailable { level_id: u8, name: &'static str },
    /// The session beat the stored best for the first time
    NewBest { level_id: u8, score: u32 },
    /// The ship hit a comet
    GameOver { level_id: u8, score: u32 },
}

/// Render view of one entity
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Sprite {
    pub pos: Vec2,
    pub size: f32,
    /// Degrees
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StarSprite {
    pub pos: Vec2,
    pub size: f32,
    pub brightness: f32,
}

/// Everything the UI needs to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub level_id: u8,
    pub score: u32,
    pub best_score: u32,
    pub resources_remaining: usize,
    pub game_over: bool,
    pub paused: bool,
    pub ship: Sprite,
    /// Uncollected resources only
    pub resources: Vec<Sprite>,
    pub comets: Vec<Sprite>,
    pub planets: Vec<Sprite>,
    pub stars: Vec<StarSprite>,
}

impl Snapshot {
    fn capture(state: &GameState, best_score: u32) -> Self {
        let ship = &state.ship;
        let heading = if ship.vel == Vec2::ZERO {
            0.0
        } else {
            ship.vel.to_angle().to_degrees()
        };
        Self {
            level_id: state.level.id,
            score: state.score,
            best_score,
            resources_remaining: state.uncollected_count(),
            game_over: state.game_over,
            paused: state.paused,
            ship: Sprite {
                pos: ship.pos,
                size: ship.size,
                rotation: heading,
            },
            resources: state
                .resources
                .iter()
                .filter(|r| !r.collected)
                .map(|r| Sprite {
                    pos: r.pos,
                    size: r.size,
                    rotation: r.rotation,
                })
                .collect(),
            comets: state
                .comets
                .iter()
                .map(|c| Sprite {
                    pos: c.pos,
                    size: c.size,
                    rotation: c.rotation,
                })
                .collect(),
            planets: state
                .planets
                .iter()
                .map(|p| Sprite {
                    pos: p.pos,
                    size: p.radius * 2.0,
                    rotation: 0.0,
                })
                .collect(),
            stars: state
                .stars
                .iter()
                .map(|s| StarSprite {
                    pos: s.pos,
                    size: s.size,
                    brightness: s.brightness,
                })
                .collect(),
        }
    }
}

/// One playthrough host: state, clock, input and progress bookkeeping
pub struct Session<S: ProgressStore, R: Rng = Pcg32> {
    store: S,
    rng: R,
    level: &'static Level,
    /// `None` until a usable viewport size is known
    state: Option<GameState>,
    input: TickInput,
    clock: FixedStepClock,
    events: Vec<SessionEvent>,
    new_best_reported: bool,
}

impl<S: ProgressStore> Session<S> {
    /// Session seeded from OS entropy. Fails if `level` is still locked.
    pub fn new(store: S, level: &'static Level) -> Result<Self> {
        Self::with_rng(store, level, Pcg32::from_os_rng())
    }

    /// Session configured from settings. A locked or unknown start level
    /// falls back to level 1.
    pub fn from_settings(store: S, settings: &Settings) -> Self {
        let rng = match settings.seed {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_os_rng(),
        };
        let mut level = settings.level();
        if !store.is_level_unlocked(level.id) {
            log::warn!("Level {} is locked, starting on level 1", level.id);
            level = Level::first();
        }
        let mut session = Self::build(store, level, rng);
        session.clock = FixedStepClock::new(settings.tick_dt(), settings.max_substeps);
        session
    }
}

impl<S: ProgressStore, R: Rng> Session<S, R> {
    /// Session on `level` driven by `rng`. Fails if `level` is still locked.
    pub fn with_rng(store: S, level: &'static Level, rng: R) -> Result<Self> {
        if !store.is_level_unlocked(level.id) {
            return Err(GameError::LevelLocked(level.id));
        }
        Ok(Self::build(store, level, rng))
    }

    fn build(store: S, level: &'static Level, rng: R) -> Self {
        Self {
            store,
            rng,
            level,
            state: None,
            input: TickInput::default(),
            clock: FixedStepClock::default(),
            events: Vec::new(),
            new_best_reported: false,
        }
    }

    // === Input ===

    /// Report the measured viewport size. The first valid size starts the
    /// session; later sizes resize the running one.
    pub fn resize(&mut self, width: f32, height: f32) -> Result<()> {
        let viewport = Viewport::new(width, height)?;
        match self.state.as_mut() {
            Some(state) => sim::resize(state, viewport),
            None => self.start(viewport),
        }
        Ok(())
    }

    /// Steer toward `target` from the next tick on
    pub fn submit_target_point(&mut self, target: Vec2) {
        self.input.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.input.target = None;
    }

    /// Applied at the start of the next tick; ignored after game over
    pub fn set_paused(&mut self, paused: bool) {
        self.input.pause = Some(paused);
    }

    /// Replace the session with a fresh one on `level_id`
    pub fn restart(&mut self, level_id: u8) -> Result<()> {
        let level = Level::by_id(level_id)?;
        if !self.store.is_level_unlocked(level.id) {
            return Err(GameError::LevelLocked(level.id));
        }
        self.level = level;
        if let Some(viewport) = self.state.as_ref().map(|s| s.viewport) {
            self.start(viewport);
        }
        Ok(())
    }

    fn start(&mut self, viewport: Viewport) {
        self.state = Some(sim::initialize(viewport, self.level, &mut self.rng));
        self.input = TickInput::default();
        self.clock.reset();
        self.new_best_reported = false;
        log::info!(
            "Started level {} ({}) on {}x{}",
            self.level.id,
            self.level.name,
            viewport.width(),
            viewport.height()
        );
    }

    // === Clock ===

    /// Run ticks for `dt` seconds of wall time, returns ticks run
    pub fn frame(&mut self, dt: f32) -> u32 {
        let ticks = self.clock.advance(dt);
        for _ in 0..ticks {
            self.tick();
        }
        ticks
    }

    /// Advance one tick and update progress
    pub fn tick(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.game_over {
            return;
        }

        let ticks_before = state.time_ticks;
        sim::tick(state, &self.input, &mut self.rng);
        // Pause requests are one-shot, the target stays until replaced
        self.input.pause = None;

        if state.time_ticks == ticks_before {
            return;
        }
        track_progress(
            &mut self.store,
            state,
            &mut self.events,
            &mut self.new_best_reported,
        );

        if state.game_over {
            self.store.save_score(state.level.id, state.score);
            log::info!(
                "Game over on level {} with score {}",
                state.level.id,
                state.score
            );
            self.events.push(SessionEvent::GameOver {
                level_id: state.level.id,
                score: state.score,
            });
        }
    }

    // === Output ===

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn level(&self) -> &'static Level {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.state.as_ref().map_or(0, |s| s.score)
    }

    pub fn resources_remaining(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.uncollected_count())
    }

    pub fn is_game_over(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.game_over)
    }

    pub fn is_paused(&self) -> bool {
        self.state.as_ref().is_some_and(|s| s.paused)
    }

    pub fn best_score(&self) -> u32 {
        self.store.best_score(self.level.id)
    }

    pub fn snapshot(&self) -> Option<Snapshot> {
        self.state
            .as_ref()
            .map(|state| Snapshot::capture(state, self.best_score()))
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

/// Persist a new best and fire the one-time next-level notification
fn track_progress<S: ProgressStore>(
    store: &mut S,
    state: &GameState,
    events: &mut Vec<SessionEvent>,
    new_best_reported: &mut bool,
) {
    let level = &state.level;

    let best = store.best_score(level.id);
    if state.score > best {
        store.save_score(level.id, state.score);
        if !*new_best_reported {
            *new_best_reported = true;
            events.push(SessionEvent::NewBest {
                level_id: level.id,
                score: state.score,
            });
        }
    }

    let Some(next) = level.next() else {
        return;
    };
    if state.score >= next.required_score && !store.was_notification_shown(level.id) {
        store.unlock_level(next.id);
        store.mark_notification_shown(level.id);
        log::info!("Level {} ({}) is now available", next.id, next.name);
        events.push(SessionEvent::LevelAvailable {
            level_id: next.id,
            name: next.name,
        });
    }
}
