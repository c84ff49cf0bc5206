//! Game state and core simulation types
//!
//! Everything a level session mutates lives in `SimulationState`. Input
//! transitions and the per-tick step both take it by `&mut`; nothing is
//! global.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::shape::Shape;
use crate::audio::Cue;
use crate::levels::Level;
use crate::tuning::Tuning;

/// Current phase of a level session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball at rest, waiting for a pull
    Ready,
    /// Ball grabbed under the pointer
    Pulling,
    /// Physics active
    Playing,
    /// A vertex was popped
    Won,
}

/// Player-facing status line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusMessage {
    PullBack,
    Go,
    TryAgain,
}

impl StatusMessage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusMessage::PullBack => "Pull back the ball and release!",
            StatusMessage::Go => "Go!",
            StatusMessage::TryAgain => "Try again! Pull back the ball.",
        }
    }
}

/// Something the session driver or the presentation layer must react to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play an audio cue
    Cue(Cue),
    /// Replace the status line
    Status(StatusMessage),
    /// Level won (zero stars is presented as a loss)
    Won {
        level: usize,
        stars: u8,
        best_stars: u8,
        attempts: u32,
        completed: bool,
    },
    /// Pointer-down with no attempts left
    OutOfAttempts,
}

/// The player's ball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Held under the pointer
    pub dragging: bool,
    /// Level start position, restored on retry
    pub start: Vec2,
}

impl Ball {
    pub fn new(start: Vec2, radius: f32) -> Self {
        Self {
            pos: start,
            vel: Vec2::ZERO,
            radius,
            dragging: false,
            start,
        }
    }

    /// Back to the start position, at rest
    pub fn reset(&mut self) {
        self.pos = self.start;
        self.vel = Vec2::ZERO;
        self.dragging = false;
    }
}

/// Complete state of one level session
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Catalogue index (0-based)
    pub level_index: usize,
    /// Launches made this session
    pub attempts: u32,
    /// Best stars ever earned on this level (persisted externally)
    pub best_stars: u8,
    pub phase: GamePhase,
    pub ball: Ball,
    /// Working copy of the level's shapes, mutated by animations and pushes
    pub shapes: Vec<Shape>,
    /// Level animation clock (seconds)
    pub time: f32,
    /// Ball touched the floor (or stood on a ledge) this tick
    pub on_ground: bool,
    /// Last pointer position (internal coordinates)
    pub pointer: Vec2,
    /// Spinner and teleport randomness
    pub rng: Pcg32,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl SimulationState {
    /// Fresh session for `level`
    pub fn new(level_index: usize, level: &Level, tuning: &Tuning, seed: u64) -> Self {
        let mut state = Self {
            level_index,
            attempts: 0,
            best_stars: 0,
            phase: GamePhase::Ready,
            ball: Ball::new(level.ball_start, tuning.ball_radius),
            shapes: level.shapes.clone(),
            time: 0.0,
            on_ground: false,
            pointer: level.ball_start,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
        };
        state.push_event(GameEvent::Status(StatusMessage::PullBack));
        state
    }

    /// Retry: attempts back to zero, ball and shapes back to the authored layout
    pub fn restart(&mut self, level: &Level) {
        self.attempts = 0;
        self.phase = GamePhase::Ready;
        self.ball.start = level.ball_start;
        self.ball.reset();
        self.shapes = level.shapes.clone();
        self.time = 0.0;
        self.on_ground = false;
        self.pointer = level.ball_start;
        self.push_event(GameEvent::Status(StatusMessage::PullBack));
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn attempts_left(&self, tuning: &Tuning) -> u32 {
        tuning.max_attempts.saturating_sub(self.attempts)
    }
}
