//! Vertex Pop - a slingshot physics puzzle
//!
//! Core modules:
//! - `sim`: Simulation core (geometry, collisions, integrator, state machine)
//! - `levels`: The fixed level catalogue and its per-tick animations
//! - `session`: Driver that ties the simulation to input, audio and progress
//! - `progress`: Best-result bookkeeping and persistence
//! - `tuning`: Data-driven game balance
//! - `platform`: Coordinate conversion and the browser frame loop

pub mod audio;
pub mod error;
pub mod levels;
pub mod platform;
pub mod progress;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, GameResult};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration in seconds (level animation clock)
    pub const FRAME_TIME: f32 = 0.016;

    /// Playfield dimensions (internal coordinate space, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 1366.0;
    pub const PLAYFIELD_HEIGHT: f32 = 768.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 30.0;
    /// Downward acceleration per tick² unless a level overrides it
    pub const DEFAULT_GRAVITY: f32 = 0.5;

    /// Attempts allowed per level before the retry screen
    pub const MAX_ATTEMPTS: u32 = 4;
    /// Pull distance divided by this gives launch speed
    pub const LAUNCH_SCALE: f32 = 12.0;
    /// Launch speed cap
    pub const MAX_LAUNCH_SPEED: f32 = 40.0;
    /// Shorter pulls are treated as cancelled
    pub const MIN_PULL_DISTANCE: f32 = 5.0;
    /// Extra grab radius around the ball for pointer-down
    pub const GRAB_SLOP: f32 = 10.0;

    /// Velocity kept (and flipped) on a wall bounce
    pub const WALL_RESTITUTION: f32 = 0.8;
    /// Velocity kept after a non-rigid shape bounce
    pub const COLLISION_DAMPING: f32 = 0.8;
    /// Per-tick velocity scale while touching the ground
    pub const GROUND_FRICTION: f32 = 0.985;
    /// Both velocity components under this (and grounded) ends an attempt
    pub const REST_THRESHOLD: f32 = 0.3;
    /// Collision normals steeper than this count as standing on a ledge
    pub const LEDGE_NORMAL_Y: f32 = 0.7;

    /// Slack added to the ball radius for vertex pops
    pub const POP_BUFFER: f32 = 5.0;

    /// Material responses
    pub const SPINNER_SPEED: f32 = 15.0;
    pub const JELLY_GAIN: f32 = 1.2;
    pub const BOUNCY_RECT_SPEED: f32 = 20.0;
    pub const BOUNCY_TRIANGLE_SPEED: f32 = 22.0;
    pub const MOVABLE_TRANSFER: f32 = 0.3;
    pub const MOVABLE_SPIN_TRANSFER: f32 = 0.05;
    pub const MOVABLE_LINEAR_DECAY: f32 = 0.99;
    pub const MOVABLE_ANGULAR_DECAY: f32 = 0.98;
}

/// Rotate a vector by an angle in degrees (counter-clockwise in a y-up frame)
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Rotate `point` about `pivot` by an angle in degrees
#[inline]
pub fn rotate_about(point: Vec2, pivot: Vec2, degrees: f32) -> Vec2 {
    pivot + rotate_deg(point - pivot, degrees)
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}
