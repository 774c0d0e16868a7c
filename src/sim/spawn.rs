//! Entity generation
//!
//! Every function takes the RNG explicitly so sessions can run on OS entropy
//! while tests use a seeded `Pcg32`.

use glam::Vec2;
use rand::Rng;

use super::state::{Comet, GameState, Planet, Resource, Star, Viewport};
use crate::consts::*;
use crate::try_direction;

/// One side of the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Left,
    Right,
    Top,
    Bottom,
}

impl Edge {
    pub const ALL: [Edge; 4] = [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom];

    pub fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }

    /// Unit vector pointing from this edge into the viewport
    pub fn inward(self) -> Vec2 {
        match self {
            Edge::Left => Vec2::X,
            Edge::Right => Vec2::NEG_X,
            Edge::Top => Vec2::Y,
            Edge::Bottom => Vec2::NEG_Y,
        }
    }

    /// Point `offset` units beyond this edge, at fraction `t` (0..1) along it
    pub fn point_beyond(self, viewport: &Viewport, t: f32, offset: f32) -> Vec2 {
        let (w, h) = (viewport.width(), viewport.height());
        match self {
            Edge::Left => Vec2::new(-offset, t * h),
            Edge::Right => Vec2::new(w + offset, t * h),
            Edge::Top => Vec2::new(t * w, -offset),
            Edge::Bottom => Vec2::new(t * w, h + offset),
        }
    }
}

/// Uniform point inside the viewport
pub fn random_point<R: Rng>(rng: &mut R, viewport: &Viewport) -> Vec2 {
    Vec2::new(
        rng.random::<f32>() * viewport.width(),
        rng.random::<f32>() * viewport.height(),
    )
}

pub fn generate_planets<R: Rng>(rng: &mut R, viewport: &Viewport, count: usize) -> Vec<Planet> {
    (0..count)
        .map(|_| {
            let radius =
                PLANET_MIN_RADIUS + rng.random::<f32>() * (PLANET_MAX_RADIUS - PLANET_MIN_RADIUS);
            Planet {
                pos: random_point(rng, viewport),
                radius,
            }
        })
        .collect()
}

pub fn generate_stars<R: Rng>(rng: &mut R, viewport: &Viewport, count: usize) -> Vec<Star> {
    (0..count)
        .map(|_| {
            let pos = random_point(rng, viewport);
            let brightness =
                STAR_MIN_BRIGHTNESS + rng.random::<f32>() * (1.0 - STAR_MIN_BRIGHTNESS);
            Star {
                pos,
                size: STAR_SIZE,
                brightness,
            }
        })
        .collect()
}

/// Add one uncollected resource at a uniform position
pub fn spawn_resource<R: Rng>(rng: &mut R, state: &mut GameState) {
    let pos = random_point(rng, &state.viewport);
    let id = state.next_entity_id();
    state.resources.push(Resource::new(id, pos));
}

/// Start position and velocity for a comet crossing the viewport.
///
/// The comet starts just beyond a random edge and heads for a random point
/// just beyond the opposite edge. Opposite edges are always at least
/// `2 * COMET_SPAWN_OFFSET` apart, but the zero-length case still falls back
/// to the edge's inward normal instead of producing NaN.
pub fn comet_trajectory<R: Rng>(rng: &mut R, viewport: &Viewport, speed: f32) -> (Vec2, Vec2) {
    let edge = Edge::ALL[rng.random_range(0..Edge::ALL.len())];
    let start = edge.point_beyond(viewport, rng.random::<f32>(), COMET_SPAWN_OFFSET);
    let target = edge
        .opposite()
        .point_beyond(viewport, rng.random::<f32>(), COMET_SPAWN_OFFSET);
    let dir = try_direction(start, target).unwrap_or_else(|| edge.inward());
    (start, dir * speed)
}

/// Add one comet using the edge-spawn rule
pub fn spawn_comet<R: Rng>(rng: &mut R, state: &mut GameState) {
    let (pos, vel) = comet_trajectory(rng, &state.viewport, state.level.comet_speed());
    let id = state.next_entity_id();
    state.comets.push(Comet::new(id, pos, vel));
}
