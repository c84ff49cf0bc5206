//! Level catalogue
//!
//! Eight fixed layouts. Levels are plain data; anything that moves does so
//! through a tagged `Animation` that `animate` applies to the session's own
//! copy of the shapes each tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GameError, GameResult};
use crate::polar_to_cartesian;
use crate::sim::shape::{Material, Shape};
use crate::tuning::Tuning;

const PURPLE: u32 = 0x7d00c8;
const BLUE: u32 = 0x007dc8;
const RED: u32 = 0xe13636;
const BLACK: u32 = 0x000000;

/// Per-tick shape animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Animation {
    /// Rotate a shape in place
    Spin { shape: usize, degrees_per_sec: f32 },
    /// Carry a shape around a circle, turning it as it goes
    Orbit {
        shape: usize,
        center: Vec2,
        radius: f32,
        degrees_per_sec: f32,
    },
    /// Every `interval` seconds, drop every shape at a random point in [min, max)
    Teleport { interval: f32, min: Vec2, max: Vec2 },
    /// Integrate the push velocity of movable shapes
    MovableDrift,
}

/// One level layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub ball_start: Vec2,
    pub shapes: Vec<Shape>,
    /// Overrides the default gravity
    #[serde(default)]
    pub gravity: Option<f32>,
    /// Side walls bounce; otherwise the ball wraps around horizontally
    #[serde(default = "default_true")]
    pub has_walls: bool,
    /// Disables winning by vertex pop
    #[serde(default)]
    pub no_vertex_pop: bool,
    #[serde(default)]
    pub animations: Vec<Animation>,
}

fn default_true() -> bool {
    true
}

impl Level {
    pub fn new(ball_start: Vec2, shapes: Vec<Shape>) -> Self {
        Self {
            ball_start,
            shapes,
            gravity: None,
            has_walls: true,
            no_vertex_pop: false,
            animations: Vec::new(),
        }
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn wrap_around(mut self) -> Self {
        self.has_walls = false;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animations.push(animation);
        self
    }

    /// Gravity in effect for this level
    pub fn gravity(&self, tuning: &Tuning) -> f32 {
        self.gravity.unwrap_or(tuning.gravity)
    }

    /// Parse and validate a level file
    pub fn from_json(json: &str) -> GameResult<Self> {
        let level: Level = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    /// Reject layouts the animation code cannot run
    pub fn validate(&self) -> GameResult<()> {
        if let Some(gravity) = self.gravity {
            if !gravity.is_finite() {
                return Err(GameError::InvalidLevel(format!(
                    "gravity must be finite, got {gravity}"
                )));
            }
        }

        for animation in &self.animations {
            match *animation {
                Animation::Spin {
                    degrees_per_sec, ..
                } if !degrees_per_sec.is_finite() => {
                    return Err(GameError::InvalidLevel(
                        "spin speed must be finite".to_string(),
                    ));
                }
                Animation::Orbit {
                    radius,
                    degrees_per_sec,
                    ..
                } if !radius.is_finite() || !degrees_per_sec.is_finite() => {
                    return Err(GameError::InvalidLevel(
                        "orbit radius and speed must be finite".to_string(),
                    ));
                }
                Animation::Teleport { interval, min, max } => {
                    if !(interval > 0.0) || !interval.is_finite() {
                        return Err(GameError::InvalidLevel(format!(
                            "teleport interval must be positive, got {interval}"
                        )));
                    }
                    if !teleport_range_ok(min, max) {
                        return Err(GameError::InvalidLevel(format!(
                            "teleport range is empty: min {min} max {max}"
                        )));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// A non-empty, finite sampling box
fn teleport_range_ok(min: Vec2, max: Vec2) -> bool {
    min.is_finite() && max.is_finite() && min.x < max.x && min.y < max.y
}

/// Ordered, fixed set of levels
#[derive(Debug, Clone, PartialEq)]
pub struct Catalogue {
    levels: Vec<Level>,
}

impl Catalogue {
    pub fn new(levels: Vec<Level>) -> Self {
        Self { levels }
    }

    /// The shipped eight levels
    pub fn standard() -> Self {
        Self::new(standard_levels())
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Advance all of a level's animations by one tick
///
/// `time` is the level clock after this tick; `dt` is the tick length.
pub fn animate<R: Rng>(
    animations: &[Animation],
    shapes: &mut [Shape],
    time: f32,
    dt: f32,
    tuning: &Tuning,
    rng: &mut R,
) {
    for animation in animations {
        match *animation {
            Animation::Spin {
                shape,
                degrees_per_sec,
            } => {
                if let Some(shape) = shapes.get_mut(shape) {
                    shape.set_rotation((time * degrees_per_sec) % 360.0);
                }
            }
            Animation::Orbit {
                shape,
                center,
                radius,
                degrees_per_sec,
            } => {
                if let Some(shape) = shapes.get_mut(shape) {
                    let degrees = time * degrees_per_sec;
                    shape.move_to(center + polar_to_cartesian(radius, degrees.to_radians()));
                    shape.set_rotation(degrees % 360.0);
                }
            }
            Animation::Teleport { interval, min, max } => {
                if !(interval > 0.0) || !teleport_range_ok(min, max) {
                    continue;
                }
                let crossed = (time / interval).floor() != ((time - dt) / interval).floor();
                if crossed {
                    for shape in shapes.iter_mut() {
                        let target = Vec2::new(
                            rng.random_range(min.x..max.x),
                            rng.random_range(min.y..max.y),
                        );
                        shape.move_to(target);
                    }
                }
            }
            Animation::MovableDrift => {
                for shape in shapes.iter_mut() {
                    if shape.material == Material::Movable {
                        shape.drift(tuning.movable_linear_decay, tuning.movable_angular_decay);
                    }
                }
            }
        }
    }
}

fn standard_levels() -> Vec<Level> {
    let start = Vec2::new(100.0, 384.0);

    vec![
        // 1: a wedge on the floor and a diamond
        Level::new(
            start,
            vec![
                Shape::triangle(
                    [
                        Vec2::new(533.0, 768.0),
                        Vec2::new(653.0, 558.0),
                        Vec2::new(913.0, 648.0),
                    ],
                    Vec2::new(700.0, 658.0),
                    0.0,
                    PURPLE,
                ),
                Shape::rectangle(Vec2::new(980.0, 260.0), 220.0, 220.0, 45.0, BLUE),
            ],
        ),
        // 2: ramp that can't be popped
        Level::new(
            start,
            vec![
                Shape::triangle(
                    [
                        Vec2::new(833.0, 788.0),
                        Vec2::new(1386.0, 324.0),
                        Vec2::new(1386.0, 788.0),
                    ],
                    Vec2::new(1200.0, 633.0),
                    0.0,
                    PURPLE,
                )
                .not_poppable(),
                Shape::rectangle(Vec2::new(840.0, 230.0), 280.0, 120.0, 0.0, BLUE),
            ],
        ),
        // 3: wrap-around behind a slanted barrier
        Level::new(
            start,
            vec![
                Shape::triangle(
                    [
                        Vec2::new(870.0, 190.0),
                        Vec2::new(1215.0, 260.0),
                        Vec2::new(1020.0, 380.0),
                    ],
                    Vec2::new(1035.0, 277.0),
                    0.0,
                    PURPLE,
                ),
                Shape::rectangle(Vec2::new(683.0, 384.0), 900.0, 120.0, 70.0, BLUE)
                    .not_poppable()
                    .with_material(Material::Barrier),
            ],
        )
        .wrap_around(),
        // 4: spinning bat
        Level::new(
            start,
            vec![
                Shape::triangle(
                    [
                        Vec2::new(943.0, 384.0),
                        Vec2::new(1113.0, 314.0),
                        Vec2::new(1113.0, 454.0),
                    ],
                    Vec2::new(1023.0, 384.0),
                    0.0,
                    PURPLE,
                ),
                Shape::rectangle(Vec2::new(643.0, 384.0), 50.0, 380.0, 0.0, BLUE)
                    .not_poppable()
                    .with_material(Material::Spinner),
            ],
        )
        .with_animation(Animation::Spin {
            shape: 1,
            degrees_per_sec: 120.0,
        }),
        // 5: spinning triangle with an orbiting jelly
        Level::new(
            start,
            vec![
                Shape::triangle(
                    [
                        Vec2::new(743.0, 414.0),
                        Vec2::new(623.0, 414.0),
                        Vec2::new(683.0, 324.0),
                    ],
                    Vec2::new(683.0, 384.0),
                    0.0,
                    PURPLE,
                ),
                Shape::rectangle(Vec2::new(833.0, 234.0), 60.0, 120.0, 0.0, RED)
                    .not_poppable()
                    .with_material(Material::Jelly),
            ],
        )
        .with_animation(Animation::Spin {
            shape: 0,
            degrees_per_sec: 60.0,
        })
        .with_animation(Animation::Orbit {
            shape: 1,
            center: Vec2::new(683.0, 384.0),
            radius: 150.0,
            degrees_per_sec: -60.0,
        }),
        // 6: teleporting shapes
        Level::new(
            start,
            vec![
                Shape::triangle(
                    [
                        Vec2::new(600.0, 300.0),
                        Vec2::new(670.0, 370.0),
                        Vec2::new(530.0, 370.0),
                    ],
                    Vec2::new(600.0, 347.0),
                    0.0,
                    PURPLE,
                ),
                Shape::rectangle(Vec2::new(800.0, 400.0), 130.0, 50.0, 0.0, BLUE),
            ],
        )
        .with_animation(Animation::Teleport {
            interval: 1.5,
            min: Vec2::new(300.0, 200.0),
            max: Vec2::new(1100.0, 600.0),
        }),
        // 7: low gravity, shapes get pushed around
        Level::new(
            start,
            vec![
                Shape::triangle(
                    [
                        Vec2::new(1133.0, 314.0),
                        Vec2::new(953.0, 714.0),
                        Vec2::new(1253.0, 614.0),
                    ],
                    Vec2::new(1113.0, 547.0),
                    0.0,
                    PURPLE,
                )
                .with_material(Material::Movable),
                Shape::rectangle(Vec2::new(533.0, 234.0), 250.0, 120.0, 75.0, BLUE)
                    .with_material(Material::Movable),
            ],
        )
        .with_gravity(0.08)
        .with_animation(Animation::MovableDrift),
        // 8: bouncy ramp under a shelf
        Level::new(
            Vec2::new(1150.0, 534.0),
            vec![
                Shape::triangle(
                    [
                        Vec2::new(513.0, 264.0),
                        Vec2::new(413.0, 868.0),
                        Vec2::new(1153.0, 868.0),
                    ],
                    Vec2::new(693.0, 667.0),
                    0.0,
                    PURPLE,
                )
                .with_material(Material::Bouncy),
                Shape::rectangle(Vec2::new(1166.0, 408.0), 400.0, 30.0, 0.0, BLACK)
                    .not_poppable()
                    .with_material(Material::Barrier),
                Shape::rectangle(Vec2::new(1043.0, 244.0), 120.0, 120.0, 25.0, RED),
            ],
        ),
    ]
}
