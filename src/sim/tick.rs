//! Session setup and the per-tick update
//!
//! Physics is expressed in units per tick; the caller owns the clock.

use glam::Vec2;
use rand::Rng;

use super::collision::{any_comet_hit, collect_resources};
use super::spawn::{generate_planets, generate_stars, spawn_comet, spawn_resource};
use super::state::{GameState, Viewport};
use crate::consts::*;
use crate::level::Level;
use crate::{distance, try_direction};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering target, re-applied every tick while set
    pub target: Option<Vec2>,
    /// Requested pause state, applied once
    pub pause: Option<bool>,
}

/// Build a fresh session for `level` filling `viewport`
pub fn initialize<R: Rng>(viewport: Viewport, level: &Level, rng: &mut R) -> GameState {
    let mut state = GameState::new(viewport, *level);

    state.planets = generate_planets(rng, &viewport, level.planet_count());
    for _ in 0..level.resource_count() {
        spawn_resource(rng, &mut state);
    }
    for _ in 0..level.comet_count() {
        spawn_comet(rng, &mut state);
    }
    state.stars = generate_stars(rng, &viewport, STAR_COUNT);

    log::debug!(
        "Level {} initialized: {} planets, {} resources, {} comets",
        level.id,
        state.planets.len(),
        state.resources.len(),
        state.comets.len()
    );
    state
}

/// Advance the simulation by one tick. Does nothing while paused or after
/// game over.
pub fn update<R: Rng>(state: &mut GameState, rng: &mut R) {
    if !state.is_running() {
        return;
    }
    state.time_ticks += 1;

    // Movement
    state.ship.advance();
    for resource in &mut state.resources {
        resource.advance();
    }
    for comet in &mut state.comets {
        comet.advance();
    }

    state.ship.pos = state.viewport.clamp(state.ship.pos);

    // Despawn comets that drifted away
    let viewport = state.viewport;
    state
        .comets
        .retain(|c| viewport.contains_with_margin(c.pos, COMET_DESPAWN_MARGIN));

    if any_comet_hit(&state.ship, &state.comets) {
        log::debug!("Ship hit a comet at tick {}", state.time_ticks);
        state.game_over = true;
    }

    // A resource picked up on the fatal tick still counts
    let collected = collect_resources(&state.ship, &mut state.resources);
    state.score += collected * RESOURCE_SCORE;

    while state.uncollected_count() < MIN_UNCOLLECTED_RESOURCES {
        spawn_resource(rng, state);
    }
    let comet_floor = state.level.comet_count();
    while state.comets.len() < comet_floor {
        spawn_comet(rng, state);
    }
}

/// Steer the ship toward `target` at full speed, or stop it once it is
/// within the arrival threshold.
pub fn move_ship_towards(state: &mut GameState, target: Vec2) {
    let ship = &mut state.ship;
    let speed = ship.speed;
    ship.vel = if distance(ship.pos, target) > ARRIVAL_THRESHOLD {
        try_direction(ship.pos, target).map_or(Vec2::ZERO, |dir| dir * speed)
    } else {
        Vec2::ZERO
    };
}

/// Adopt a new viewport size, pulling the ship back inside
pub fn resize(state: &mut GameState, viewport: Viewport) {
    state.viewport = viewport;
    state.ship.pos = viewport.clamp(state.ship.pos);
}

/// Apply captured input, then advance one tick
pub fn tick<R: Rng>(state: &mut GameState, input: &TickInput, rng: &mut R) {
    if let Some(paused) = input.pause {
        if !state.game_over {
            state.paused = paused;
        }
    }
    if !state.is_running() {
        return;
    }
    if let Some(target) = input.target {
        move_ship_towards(state, target);
    }
    update(state, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::LEVELS;
    use crate::sim::state::{Comet, Resource};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn viewport() -> Viewport {
        Viewport::new(800.0, 600.0).unwrap()
    }

    /// A level-1 state with no comets or resources near the ship
    fn quiet_state(rng: &mut Pcg32) -> GameState {
        let mut state = initialize(viewport(), Level::first(), rng);
        state.comets.clear();
        state.resources.clear();
        state
    }

    #[test]
    fn test_initialize_level_one() {
        let mut rng = Pcg32::seed_from_u64(12345);
        let state = initialize(viewport(), Level::first(), &mut rng);
        assert_eq!(state.planets.len(), 5);
        assert_eq!(state.resources.len(), 15);
        assert_eq!(state.comets.len(), 3);
        assert_eq!(state.stars.len(), 100);
        assert_eq!(state.ship.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.ship.vel, Vec2::ZERO);
        assert_eq!(state.score, 0);
        assert!(!state.game_over && !state.paused);
        assert!(state.resources.iter().all(|r| !r.collected));
    }

    #[test]
    fn test_initialize_scales_with_difficulty() {
        let mut rng = Pcg32::seed_from_u64(1);
        for level in &LEVELS {
            let state = initialize(viewport(), level, &mut rng);
            assert_eq!(state.planets.len(), level.planet_count());
            assert_eq!(state.resources.len(), level.resource_count());
            assert_eq!(state.comets.len(), level.comet_count());
            for comet in &state.comets {
                assert!((comet.vel.length() - level.comet_speed()).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_comet_collision_ends_game() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut state = quiet_state(&mut rng);
        state.ship.pos = Vec2::new(100.0, 100.0);
        state
            .comets
            .push(Comet::new(900, Vec2::new(110.0, 100.0), Vec2::ZERO));

        update(&mut state, &mut rng);
        assert!(state.game_over);
    }

    #[test]
    fn test_resource_collection_scores() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut state = quiet_state(&mut rng);
        state.ship.pos = Vec2::new(100.0, 100.0);
        state.resources.push(Resource::new(900, Vec2::new(105.0, 100.0)));

        update(&mut state, &mut rng);
        assert!(state.resources[0].collected);
        assert_eq!(state.score, 10);
        assert!(!state.game_over);
    }

    #[test]
    fn test_collection_counts_on_fatal_tick() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut state = quiet_state(&mut rng);
        state.ship.pos = Vec2::new(100.0, 100.0);
        state
            .comets
            .push(Comet::new(900, Vec2::new(120.0, 100.0), Vec2::ZERO));
        state.resources.push(Resource::new(901, Vec2::new(95.0, 100.0)));

        update(&mut state, &mut rng);
        assert!(state.game_over);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_update_tops_up_populations() {
        let mut rng = Pcg32::seed_from_u64(6);
        let mut state = quiet_state(&mut rng);
        update(&mut state, &mut rng);
        assert_eq!(state.uncollected_count(), MIN_UNCOLLECTED_RESOURCES);
        assert_eq!(state.comets.len(), state.level.comet_count());
    }

    #[test]
    fn test_comets_despawn_beyond_margin() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut state = quiet_state(&mut rng);
        let leaving = Comet::new(900, Vec2::new(-99.0, 300.0), Vec2::new(-2.0, 0.0));
        let staying = Comet::new(901, Vec2::new(-50.0, 300.0), Vec2::new(2.0, 0.0));
        state.comets.push(leaving);
        state.comets.push(staying);

        update(&mut state, &mut rng);
        assert!(state.comets.iter().all(|c| c.id != 900));
        assert!(state.comets.iter().any(|c| c.id == 901));
    }

    #[test]
    fn test_ship_clamped_to_viewport() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = quiet_state(&mut rng);
        state.ship.pos = Vec2::new(798.0, 2.0);
        state.ship.vel = Vec2::new(5.0, -5.0);

        update(&mut state, &mut rng);
        assert_eq!(state.ship.pos, Vec2::new(800.0, 0.0));
    }

    #[test]
    fn test_paused_state_is_frozen() {
        let mut rng = Pcg32::seed_from_u64(10);
        let mut state = initialize(viewport(), Level::first(), &mut rng);
        state.ship.vel = Vec2::new(5.0, 0.0);
        state.paused = true;
        let comet_positions: Vec<Vec2> = state.comets.iter().map(|c| c.pos).collect();

        update(&mut state, &mut rng);
        assert_eq!(state.ship.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.time_ticks, 0);
        let after: Vec<Vec2> = state.comets.iter().map(|c| c.pos).collect();
        assert_eq!(comet_positions, after);
    }

    #[test]
    fn test_move_ship_towards() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut state = quiet_state(&mut rng);
        state.ship.pos = Vec2::new(100.0, 100.0);

        move_ship_towards(&mut state, Vec2::new(200.0, 100.0));
        assert!((state.ship.vel - Vec2::new(5.0, 0.0)).length() < 1e-5);

        // Arrival snap
        move_ship_towards(&mut state, Vec2::new(105.0, 100.0));
        assert_eq!(state.ship.vel, Vec2::ZERO);

        state.ship.vel = Vec2::new(3.0, 3.0);
        move_ship_towards(&mut state, Vec2::new(100.0, 100.0));
        assert_eq!(state.ship.vel, Vec2::ZERO);
    }

    #[test]
    fn test_resize_clamps_ship() {
        let mut rng = Pcg32::seed_from_u64(12);
        let mut state = quiet_state(&mut rng);
        state.ship.pos = Vec2::new(700.0, 500.0);
        resize(&mut state, Viewport::new(400.0, 300.0).unwrap());
        assert_eq!(state.ship.pos, Vec2::new(400.0, 300.0));
        assert_eq!(state.viewport.width(), 400.0);
    }

    #[test]
    fn test_tick_pause_input() {
        let mut rng = Pcg32::seed_from_u64(13);
        let mut state = quiet_state(&mut rng);
        let pause = TickInput {
            pause: Some(true),
            ..Default::default()
        };
        tick(&mut state, &pause, &mut rng);
        assert!(state.paused);
        assert_eq!(state.time_ticks, 0);

        let resume = TickInput {
            target: Some(Vec2::new(600.0, 300.0)),
            pause: Some(false),
        };
        tick(&mut state, &resume, &mut rng);
        assert!(!state.paused);
        assert_eq!(state.time_ticks, 1);
        assert!((state.ship.pos - Vec2::new(405.0, 300.0)).length() < 1e-4);
    }

    #[test]
    fn test_determinism() {
        let mut rng1 = Pcg32::seed_from_u64(99999);
        let mut rng2 = Pcg32::seed_from_u64(99999);
        let mut state1 = initialize(viewport(), Level::first(), &mut rng1);
        let mut state2 = initialize(viewport(), Level::first(), &mut rng2);

        let input = TickInput {
            target: Some(Vec2::new(50.0, 50.0)),
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut state1, &input, &mut rng1);
            tick(&mut state2, &input, &mut rng2);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.ship.pos, state2.ship.pos);
        assert_eq!(state1.comets.len(), state2.comets.len());
    }

    proptest! {
        #[test]
        fn prop_tick_invariants(
            seed in any::<u64>(),
            level_idx in 0usize..LEVELS.len(),
            targets in prop::collection::vec((0f32..800.0, 0f32..600.0), 1..8),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let level = &LEVELS[level_idx];
            let mut state = initialize(viewport(), level, &mut rng);

            for (i, &(x, y)) in targets.iter().enumerate() {
                let input = TickInput { target: Some(Vec2::new(x, y)), ..Default::default() };
                for _ in 0..40 {
                    let was_over = state.game_over;
                    let before_score = state.score;
                    let before_ship = state.ship.pos;
                    let before_uncollected = state.uncollected_count();
                    let before_comets: Vec<Vec2> = state.comets.iter().map(|c| c.pos).collect();
                    let before_resources: Vec<Vec2> =
                        state.resources.iter().map(|r| r.pos).collect();

                    tick(&mut state, &input, &mut rng);

                    prop_assert!(state.score >= before_score);
                    prop_assert_eq!((state.score - before_score) % RESOURCE_SCORE, 0);
                    let collected_total =
                        state.resources.iter().filter(|r| r.collected).count() as u32;
                    prop_assert_eq!(state.score, collected_total * RESOURCE_SCORE);

                    if was_over {
                        prop_assert_eq!(state.score, before_score);
                        prop_assert_eq!(state.ship.pos, before_ship);
                        prop_assert_eq!(state.uncollected_count(), before_uncollected);
                        let comets: Vec<Vec2> = state.comets.iter().map(|c| c.pos).collect();
                        let resources: Vec<Vec2> = state.resources.iter().map(|r| r.pos).collect();
                        prop_assert_eq!(comets, before_comets);
                        prop_assert_eq!(resources, before_resources);
                    } else {
                        prop_assert!(state.uncollected_count() >= MIN_UNCOLLECTED_RESOURCES);
                        prop_assert!(state.comets.len() >= level.comet_count());
                    }
                    prop_assert!(state.ship.vel.is_finite());
                    prop_assert!(state.comets.iter().all(|c| c.vel.is_finite()));
                }
                if i % 3 == 2 {
                    let pos = state.ship.pos;
                    move_ship_towards(&mut state, pos);
                }
            }
        }
    }
}
