//! Collision detection between the ship and other entities
//!
//! Everything is a circle of diameter `size`. Counts are in the tens, so a
//! straight scan over all entities per tick is enough.

use glam::Vec2;

use super::state::{Comet, Resource, Ship};
use crate::distance;

/// Strict circle overlap: touching circles do not collide
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    distance(a, b) < a_radius + b_radius
}

pub fn ship_hits_comet(ship: &Ship, comet: &Comet) -> bool {
    circles_overlap(ship.pos, ship.radius(), comet.pos, comet.radius())
}

pub fn ship_reaches_resource(ship: &Ship, resource: &Resource) -> bool {
    circles_overlap(ship.pos, ship.radius(), resource.pos, resource.radius())
}

/// Mark every uncollected resource touching the ship as collected.
/// Returns how many were collected.
pub fn collect_resources(ship: &Ship, resources: &mut [Resource]) -> u32 {
    let mut collected = 0;
    for resource in resources.iter_mut().filter(|r| !r.collected) {
        if ship_reaches_resource(ship, resource) {
            resource.collected = true;
            collected += 1;
        }
    }
    collected
}

/// Whether any comet touches the ship
pub fn any_comet_hit(ship: &Ship, comets: &[Comet]) -> bool {
    comets.iter().any(|comet| ship_hits_comet(ship, comet))
}
