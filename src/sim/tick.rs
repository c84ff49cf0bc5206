//! Fixed-step simulation tick
//!
//! One call per display frame. Level animations always run; physics only
//! runs while the ball is in play.

use super::collision::{detect_collision, detect_vertex_proximity};
use super::machine::{come_to_rest, win};
use super::response::respond;
use super::state::{Ball, GameEvent, GamePhase, SimulationState};
use crate::levels::{Level, animate};
use crate::tuning::Tuning;

/// Advance the level session by one frame
pub fn tick(state: &mut SimulationState, level: &Level, tuning: &Tuning) {
    state.time += tuning.frame_time;
    animate(
        &level.animations,
        &mut state.shapes,
        state.time,
        tuning.frame_time,
        tuning,
        &mut state.rng,
    );

    if state.phase != GamePhase::Playing {
        return;
    }

    // Semi-implicit Euler, one frame per step
    state.ball.vel.y += level.gravity(tuning);
    state.ball.pos += state.ball.vel;

    state.on_ground = apply_boundaries(&mut state.ball, level.has_walls, tuning);

    if state.on_ground {
        state.ball.vel *= tuning.ground_friction;
    }

    sweep_collisions(state, tuning);

    if !level.no_vertex_pop {
        check_vertex_pop(state, tuning);
    }

    if state.phase == GamePhase::Playing && is_at_rest(state, tuning) {
        come_to_rest(state);
    }
}

/// Keep the ball inside the playfield. Returns true when it touched the floor.
///
/// Without walls the ball wraps horizontally with its velocity untouched.
pub fn apply_boundaries(ball: &mut Ball, has_walls: bool, tuning: &Tuning) -> bool {
    let r = ball.radius;
    let width = tuning.playfield_width;
    let height = tuning.playfield_height;
    let restitution = tuning.wall_restitution;

    if has_walls {
        if ball.pos.x - r < 0.0 {
            ball.pos.x = r;
            ball.vel.x *= -restitution;
        }
        if ball.pos.x + r > width {
            ball.pos.x = width - r;
            ball.vel.x *= -restitution;
        }
    } else if ball.pos.x < 0.0 {
        ball.pos.x = width;
    } else if ball.pos.x > width {
        ball.pos.x = 0.0;
    }

    if ball.pos.y - r < 0.0 {
        ball.pos.y = r;
        ball.vel.y *= -restitution;
    }

    let mut grounded = false;
    if ball.pos.y + r > height {
        ball.pos.y = height - r;
        ball.vel.y *= -restitution;
        grounded = true;
    }
    grounded
}

/// Test the ball against every shape in declaration order, resolving each
/// hit independently
fn sweep_collisions(state: &mut SimulationState, tuning: &Tuning) {
    let SimulationState {
        ball,
        shapes,
        rng,
        on_ground,
        events,
        ..
    } = state;

    for shape in shapes.iter_mut() {
        let hit = detect_collision(ball.pos, ball.radius, shape);
        if !hit.hit {
            continue;
        }

        // Sampled before the response reflects it
        let falling = ball.vel.y > 0.0;

        if let Some(cue) = respond(ball, shape, &hit, tuning, rng) {
            events.push(GameEvent::Cue(cue));
        }

        // Landed on a mostly-horizontal top face (normal points up in y-down space)
        if falling && hit.normal.y < -tuning.ledge_normal_y {
            *on_ground = true;
        }
    }
}

/// Win if the ball reaches any in-bounds vertex of a poppable, visible shape
fn check_vertex_pop(state: &mut SimulationState, tuning: &Tuning) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let ball = &state.ball;
    let popped = state
        .shapes
        .iter()
        .filter(|shape| shape.can_pop())
        .flat_map(|shape| shape.vertices())
        .any(|vertex| {
            tuning.in_playfield(vertex)
                && detect_vertex_proximity(ball.pos, ball.radius, vertex, tuning.pop_buffer)
        });

    if popped {
        win(state, tuning);
    }
}

/// Slow on both axes and grounded
pub fn is_at_rest(state: &SimulationState, tuning: &Tuning) -> bool {
    state.on_ground
        && state.ball.vel.x.abs() < tuning.rest_threshold
        && state.ball.vel.y.abs() < tuning.rest_threshold
}
