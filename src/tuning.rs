//! Data-driven game balance
//!
//! Every physics and scoring constant the simulation reads lives here so a
//! JSON file can retune the game without a rebuild. Missing fields fall back
//! to the values in [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GameError, GameResult};

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Level animation clock step (seconds per tick)
    pub frame_time: f32,
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub ball_radius: f32,
    /// Used when a level has no gravity override
    pub gravity: f32,

    // === Launch ===
    pub max_attempts: u32,
    pub launch_scale: f32,
    pub max_launch_speed: f32,
    pub min_pull_distance: f32,
    pub grab_slop: f32,

    // === Contact ===
    pub wall_restitution: f32,
    pub collision_damping: f32,
    pub ground_friction: f32,
    pub rest_threshold: f32,
    pub ledge_normal_y: f32,
    pub pop_buffer: f32,

    // === Materials ===
    pub spinner_speed: f32,
    pub jelly_gain: f32,
    pub bouncy_rect_speed: f32,
    pub bouncy_triangle_speed: f32,
    pub movable_transfer: f32,
    pub movable_spin_transfer: f32,
    pub movable_linear_decay: f32,
    pub movable_angular_decay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            frame_time: FRAME_TIME,
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            ball_radius: BALL_RADIUS,
            gravity: DEFAULT_GRAVITY,

            max_attempts: MAX_ATTEMPTS,
            launch_scale: LAUNCH_SCALE,
            max_launch_speed: MAX_LAUNCH_SPEED,
            min_pull_distance: MIN_PULL_DISTANCE,
            grab_slop: GRAB_SLOP,

            wall_restitution: WALL_RESTITUTION,
            collision_damping: COLLISION_DAMPING,
            ground_friction: GROUND_FRICTION,
            rest_threshold: REST_THRESHOLD,
            ledge_normal_y: LEDGE_NORMAL_Y,
            pop_buffer: POP_BUFFER,

            spinner_speed: SPINNER_SPEED,
            jelly_gain: JELLY_GAIN,
            bouncy_rect_speed: BOUNCY_RECT_SPEED,
            bouncy_triangle_speed: BOUNCY_TRIANGLE_SPEED,
            movable_transfer: MOVABLE_TRANSFER,
            movable_spin_transfer: MOVABLE_SPIN_TRANSFER,
            movable_linear_decay: MOVABLE_LINEAR_DECAY,
            movable_angular_decay: MOVABLE_ANGULAR_DECAY,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file
    pub fn from_json(json: &str) -> GameResult<Self> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> GameResult<()> {
        let positive = [
            ("frame_time", self.frame_time),
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("ball_radius", self.ball_radius),
            ("launch_scale", self.launch_scale),
            ("max_launch_speed", self.max_launch_speed),
        ];
        for (name, value) in positive {
            if !(value > 0.0) {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        let non_negative = [
            ("gravity", self.gravity),
            ("min_pull_distance", self.min_pull_distance),
            ("grab_slop", self.grab_slop),
            ("rest_threshold", self.rest_threshold),
            ("pop_buffer", self.pop_buffer),
            ("spinner_speed", self.spinner_speed),
            ("jelly_gain", self.jelly_gain),
            ("bouncy_rect_speed", self.bouncy_rect_speed),
            ("bouncy_triangle_speed", self.bouncy_triangle_speed),
            ("movable_transfer", self.movable_transfer),
            ("movable_spin_transfer", self.movable_spin_transfer),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must not be negative, got {value}"
                )));
            }
        }

        let unit = [
            ("wall_restitution", self.wall_restitution),
            ("collision_damping", self.collision_damping),
            ("ground_friction", self.ground_friction),
            ("movable_linear_decay", self.movable_linear_decay),
            ("movable_angular_decay", self.movable_angular_decay),
            ("ledge_normal_y", self.ledge_normal_y),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidTuning(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }

        if self.max_attempts == 0 {
            return Err(GameError::InvalidTuning(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Playfield size as a vector
    #[inline]
    pub fn playfield(&self) -> Vec2 {
        Vec2::new(self.playfield_width, self.playfield_height)
    }

    /// Whether a point lies on or inside the playfield
    #[inline]
    pub fn in_playfield(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.playfield_width && p.y >= 0.0 && p.y <= self.playfield_height
    }
}
