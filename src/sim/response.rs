//! Collision response
//!
//! The generic path corrects penetration, reflects, then damps unless the
//! surface is rigid. Spinner, jelly and bouncy materials replace it
//! entirely; movable shapes take the generic path and get pushed.

use glam::Vec2;
use rand::Rng;

use super::collision::{CollisionResult, reflect_velocity};
use super::shape::{Material, Shape, ShapeKind};
use super::state::Ball;
use crate::audio::Cue;
use crate::polar_to_cartesian;
use crate::tuning::Tuning;

/// Generic response: positional correction, reflection, optional damping
pub fn resolve_collision(ball: &mut Ball, hit: &CollisionResult, rigid: bool, damping: f32) {
    if !hit.hit {
        return;
    }

    // Move ball out of the shape
    ball.pos += hit.normal * hit.depth;

    ball.vel = reflect_velocity(ball.vel, hit.normal);

    if !rigid {
        ball.vel *= damping;
    }
}

/// Material-aware response for a ball that hit `shape`
///
/// Returns the audio cue the hit should play, if any.
pub fn respond<R: Rng>(
    ball: &mut Ball,
    shape: &mut Shape,
    hit: &CollisionResult,
    tuning: &Tuning,
    rng: &mut R,
) -> Option<Cue> {
    if !hit.hit {
        return None;
    }

    match shape.material {
        Material::Spinner => {
            let angle = rng.random_range(0.0..std::f32::consts::TAU);
            ball.vel = polar_to_cartesian(tuning.spinner_speed, angle);
            Some(Cue::Bounce)
        }
        Material::Jelly => {
            ball.vel = -ball.vel * tuning.jelly_gain;
            Some(Cue::Bounce)
        }
        Material::Bouncy => {
            let speed = match shape.kind {
                ShapeKind::Rectangle(_) => tuning.bouncy_rect_speed,
                ShapeKind::Triangle(_) => tuning.bouncy_triangle_speed,
            };
            let away = radial_direction(ball.pos, shape.center(), hit.normal);
            ball.vel = away * speed;
            Some(Cue::Bounce)
        }
        Material::Movable => {
            shape.motion.vel = ball.vel * tuning.movable_transfer;
            shape.motion.angular_vel = ball.vel.x * tuning.movable_spin_transfer;
            resolve_collision(ball, hit, false, tuning.collision_damping);
            None
        }
        Material::Solid | Material::Barrier | Material::None => {
            // Invisible walls never bleed speed
            let rigid = shape.material.is_rigid() || shape.invisible;
            resolve_collision(ball, hit, rigid, tuning.collision_damping);
            None
        }
    }
}

/// Unit vector from `center` to `pos`, falling back to the contact normal
/// when the two coincide
fn radial_direction(pos: Vec2, center: Vec2, fallback: Vec2) -> Vec2 {
    let dir = (pos - center).normalize_or_zero();
    if dir == Vec2::ZERO {
        fallback.normalize_or(Vec2::NEG_Y)
    } else {
        dir
    }
}
