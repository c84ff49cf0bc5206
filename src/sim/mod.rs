//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Shapes processed in declaration order
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod machine;
pub mod response;
pub mod shape;
pub mod state;
pub mod tick;

pub use collision::{CollisionResult, detect_collision, detect_vertex_proximity, reflect_velocity};
pub use machine::{
    come_to_rest, launch_velocity, pointer_down, pointer_move, pointer_up, retry, star_rating, win,
};
pub use response::{resolve_collision, respond};
pub use shape::{Material, Motion, Rectangle, Shape, ShapeKind, Triangle};
pub use state::{Ball, GameEvent, GamePhase, SimulationState, StatusMessage};
pub use tick::{apply_boundaries, is_at_rest, tick};
