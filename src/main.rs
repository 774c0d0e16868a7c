//! Comet Drift entry point
//!
//! Runs a headless session with a simple autopilot: chase the nearest
//! resource, veer away from comets that get close.
//!
//! Usage: `comet-drift [settings.json]`

use std::path::PathBuf;

use glam::Vec2;

use comet_drift::progress::level_overview;
use comet_drift::sim::GameState;
use comet_drift::{
    JsonProgressStore, MemoryProgressStore, ProgressStore, Session, SessionEvent, Settings,
};

/// Comets closer than this take priority over resources
const DANGER_RADIUS: f32 = 150.0;

fn main() {
    env_logger::init();
    log::info!("Comet Drift (headless) starting...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_or_default(&PathBuf::from(path)),
        None => Settings::default(),
    };

    match settings.progress_path.clone() {
        Some(path) => run(JsonProgressStore::open(path), &settings),
        None => run(MemoryProgressStore::new(), &settings),
    }
}

fn run<S: ProgressStore>(store: S, settings: &Settings) {
    let mut session = Session::from_settings(store, settings);
    if let Err(e) = session.resize(settings.viewport_width, settings.viewport_height) {
        log::error!("Cannot start session: {}", e);
        return;
    }

    let dt = settings.tick_dt();
    let mut ticks = 0;
    while ticks < settings.demo_ticks && !session.is_game_over() {
        if let Some(target) = session.state().and_then(autopilot_target) {
            session.submit_target_point(target);
        }
        ticks += session.frame(dt);

        for event in session.drain_events() {
            match event {
                SessionEvent::LevelAvailable { level_id, name } => {
                    println!("Time to move to Level {}: {}!", level_id, name);
                }
                SessionEvent::NewBest { level_id, score } => {
                    log::info!("New best on level {}: {}", level_id, score);
                }
                SessionEvent::GameOver { score, .. } => {
                    println!("Game over after {} ticks", ticks);
                    log::info!("Final score {}", score);
                }
            }
        }
    }

    println!(
        "Level {} ({}): score {}, best {}, {} resources left",
        session.level().id,
        session.level().name,
        session.score(),
        session.best_score(),
        session.resources_remaining()
    );
    for status in level_overview(session.store()) {
        let lock = if status.unlocked {
            String::from("unlocked")
        } else {
            format!("needs {} pts", status.level.required_score)
        };
        println!(
            "  Level {}: {:<10} best {:>5}  {}",
            status.level.id, status.level.name, status.best_score, lock
        );
    }
}

/// Where the ship should head this tick
fn autopilot_target(state: &GameState) -> Option<Vec2> {
    let ship = state.ship.pos;

    let threat = state
        .comets
        .iter()
        .map(|c| (c, c.pos.distance(ship)))
        .filter(|(_, d)| *d < DANGER_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((comet, _)) = threat {
        // Flee sideways from the comet's path
        let away = (ship - comet.pos).normalize_or_zero();
        let side = comet.vel.perp().normalize_or_zero();
        let side = if side.dot(away) < 0.0 { -side } else { side };
        return Some(ship + (away + side) * 100.0);
    }

    state
        .resources
        .iter()
        .filter(|r| !r.collected)
        .min_by(|a, b| a.pos.distance(ship).total_cmp(&b.pos.distance(ship)))
        .map(|r| r.pos)
}
