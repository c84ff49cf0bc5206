//! Ready / Pulling / Playing / Won transitions
//!
//! Pointer handlers only set fields (phase, ball velocity, pointer) that the
//! next tick reads. They never integrate physics themselves.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, SimulationState, StatusMessage};
use crate::audio::Cue;
use crate::levels::Level;
use crate::tuning::Tuning;

/// Stars for a win on the given attempt
///
/// 3 for a first-attempt win, 2 before the last allowed attempt, 1 on the
/// last one, 0 beyond it.
pub fn star_rating(attempts: u32, max_attempts: u32) -> u8 {
    if attempts <= 1 {
        3
    } else if attempts < max_attempts {
        2
    } else if attempts == max_attempts {
        1
    } else {
        0
    }
}

/// Slingshot launch velocity for a release at `release`
///
/// The ball flies from the release point back through its own center, with
/// speed `min(distance / launch_scale, max_launch_speed)`. Pulls no longer
/// than `min_pull_distance` return `None`.
pub fn launch_velocity(ball_pos: Vec2, release: Vec2, tuning: &Tuning) -> Option<Vec2> {
    let pull = ball_pos - release;
    let distance = pull.length();
    if distance <= tuning.min_pull_distance {
        return None;
    }
    let speed = (distance / tuning.launch_scale).min(tuning.max_launch_speed);
    Some(pull / distance * speed)
}

/// Pointer pressed at `pos` (internal coordinates)
pub fn pointer_down(state: &mut SimulationState, pos: Vec2, tuning: &Tuning) {
    if state.phase != GamePhase::Ready {
        return;
    }

    if state.attempts >= tuning.max_attempts {
        state.push_event(GameEvent::OutOfAttempts);
        return;
    }

    state.pointer = pos;
    if pos.distance(state.ball.pos) < state.ball.radius + tuning.grab_slop {
        state.ball.dragging = true;
        state.phase = GamePhase::Pulling;
        state.push_event(GameEvent::Cue(Cue::Stretch));
    }
}

/// Pointer moved to `pos`
pub fn pointer_move(state: &mut SimulationState, pos: Vec2) {
    state.pointer = pos;
}

/// Pointer released at `pos`: launch, or cancel a pull that was too short
pub fn pointer_up(state: &mut SimulationState, pos: Vec2, tuning: &Tuning) {
    if !state.ball.dragging || state.phase != GamePhase::Pulling {
        return;
    }

    state.ball.dragging = false;
    state.pointer = pos;

    match launch_velocity(state.ball.pos, pos, tuning) {
        Some(vel) => {
            state.ball.vel = vel;
            state.attempts += 1;
            state.on_ground = false;
            state.phase = GamePhase::Playing;
            state.push_event(GameEvent::Cue(Cue::Snap));
            state.push_event(GameEvent::Status(StatusMessage::Go));
            log::debug!(
                "Launch {} on level {}: vel=({:.2}, {:.2})",
                state.attempts,
                state.level_index + 1,
                vel.x,
                vel.y
            );
        }
        None => {
            state.phase = GamePhase::Ready;
            state.push_event(GameEvent::Status(StatusMessage::PullBack));
        }
    }
}

/// Ball stopped on the ground: hand control back, ball stays where it is
pub fn come_to_rest(state: &mut SimulationState) {
    if state.phase != GamePhase::Playing {
        return;
    }
    state.phase = GamePhase::Ready;
    state.ball.vel = Vec2::ZERO;
    state.push_event(GameEvent::Status(StatusMessage::TryAgain));
    log::debug!(
        "Ball at rest at ({:.1}, {:.1}) after attempt {}",
        state.ball.pos.x,
        state.ball.pos.y,
        state.attempts
    );
}

/// Vertex popped. Only the first pop counts.
pub fn win(state: &mut SimulationState, tuning: &Tuning) {
    if state.phase != GamePhase::Playing {
        return;
    }

    state.phase = GamePhase::Won;
    let stars = star_rating(state.attempts, tuning.max_attempts);
    state.best_stars = state.best_stars.max(stars);

    state.push_event(GameEvent::Cue(Cue::Pop));
    state.push_event(GameEvent::Won {
        level: state.level_index,
        stars,
        best_stars: state.best_stars,
        attempts: state.attempts,
        completed: stars > 0,
    });
    log::info!(
        "Level {} popped on attempt {} ({} stars, best {})",
        state.level_index + 1,
        state.attempts,
        stars,
        state.best_stars
    );
}

/// Start the level over from its authored layout
pub fn retry(state: &mut SimulationState, level: &Level) {
    state.restart(level);
    log::info!("Level {} restarted", state.level_index + 1);
}
