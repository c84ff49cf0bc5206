//! Obstacle shapes
//!
//! Two kinds of obstacle exist:
//! - rectangles: center, width, height, rotation about the center
//! - triangles: three authored vertices plus the pivot they rotate about
//!
//! Rotation is stored in degrees and never wrapped; trig takes care of it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{rotated_rect_vertices, rotated_triangle_vertices};

/// Collision behavior of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Material {
    #[default]
    None,
    /// Bats the ball off in a random direction
    Spinner,
    /// Throws the ball back faster than it came
    Jelly,
    /// Launches the ball radially away from the shape center
    Bouncy,
    /// Gets pushed around by the ball
    Movable,
    /// Lossless bounce
    Solid,
    /// Lossless bounce (level walls)
    Barrier,
}

impl Material {
    /// Whether a plain bounce off this material keeps full speed
    pub fn is_rigid(&self) -> bool {
        matches!(self, Material::Solid | Material::Barrier)
    }
}

/// A rotated rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
    /// Degrees
    pub rotation: f32,
}

impl Rectangle {
    pub fn new(center: Vec2, width: f32, height: f32, rotation: f32) -> Self {
        Self {
            center,
            width,
            height,
            rotation,
        }
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// A triangle rotated about `centroid`
///
/// `centroid` is the authored pivot, not necessarily the arithmetic mean of
/// the points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub points: [Vec2; 3],
    pub centroid: Vec2,
    /// Degrees
    pub rotation: f32,
}

impl Triangle {
    pub fn new(points: [Vec2; 3], centroid: Vec2, rotation: f32) -> Self {
        Self {
            points,
            centroid,
            rotation,
        }
    }

    /// Move the triangle so its pivot lands on `target`
    pub fn move_to(&mut self, target: Vec2) {
        let delta = target - self.centroid;
        self.translate(delta);
    }

    pub fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
        self.centroid += delta;
    }
}

/// Geometry of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShapeKind {
    Rectangle(Rectangle),
    Triangle(Triangle),
}

/// Drift state of a movable shape
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Motion {
    pub vel: Vec2,
    /// Degrees per tick
    pub angular_vel: f32,
}

/// An obstacle in a level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    /// 0xRRGGBB
    pub color: u32,
    #[serde(default)]
    pub material: Material,
    /// Whether touching a vertex of this shape wins the level
    #[serde(default = "default_poppable")]
    pub poppable: bool,
    /// Collides but is never drawn or popped
    #[serde(default)]
    pub invisible: bool,
    #[serde(default)]
    pub motion: Motion,
}

fn default_poppable() -> bool {
    true
}

impl Shape {
    pub fn rectangle(center: Vec2, width: f32, height: f32, rotation: f32, color: u32) -> Self {
        Self::from_kind(
            ShapeKind::Rectangle(Rectangle::new(center, width, height, rotation)),
            color,
        )
    }

    pub fn triangle(points: [Vec2; 3], centroid: Vec2, rotation: f32, color: u32) -> Self {
        Self::from_kind(
            ShapeKind::Triangle(Triangle::new(points, centroid, rotation)),
            color,
        )
    }

    fn from_kind(kind: ShapeKind, color: u32) -> Self {
        Self {
            kind,
            color,
            material: Material::None,
            poppable: true,
            invisible: false,
            motion: Motion::default(),
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn not_poppable(mut self) -> Self {
        self.poppable = false;
        self
    }

    pub fn invisible(mut self) -> Self {
        self.invisible = true;
        self
    }

    /// Rotation pivot (rectangle center or triangle centroid)
    pub fn center(&self) -> Vec2 {
        match &self.kind {
            ShapeKind::Rectangle(r) => r.center,
            ShapeKind::Triangle(t) => t.centroid,
        }
    }

    pub fn rotation(&self) -> f32 {
        match &self.kind {
            ShapeKind::Rectangle(r) => r.rotation,
            ShapeKind::Triangle(t) => t.rotation,
        }
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        match &mut self.kind {
            ShapeKind::Rectangle(r) => r.rotation = degrees,
            ShapeKind::Triangle(t) => t.rotation = degrees,
        }
    }

    /// Move the shape's pivot to `target`, carrying its vertices along
    pub fn move_to(&mut self, target: Vec2) {
        match &mut self.kind {
            ShapeKind::Rectangle(r) => r.center = target,
            ShapeKind::Triangle(t) => t.move_to(target),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match &mut self.kind {
            ShapeKind::Rectangle(r) => r.center += delta,
            ShapeKind::Triangle(t) => t.translate(delta),
        }
    }

    /// World-space corners with rotation applied
    pub fn vertices(&self) -> Vec<Vec2> {
        match &self.kind {
            ShapeKind::Rectangle(r) => rotated_rect_vertices(r).to_vec(),
            ShapeKind::Triangle(t) => rotated_triangle_vertices(t).to_vec(),
        }
    }

    /// Whether this shape's vertices can trigger a win
    pub fn can_pop(&self) -> bool {
        self.poppable && !self.invisible
    }

    /// Integrate the movable drift for one tick
    pub fn drift(&mut self, linear_decay: f32, angular_decay: f32) {
        let motion = self.motion;
        self.translate(motion.vel);
        self.set_rotation(self.rotation() + motion.angular_vel);
        self.motion.vel *= linear_decay;
        self.motion.angular_vel *= angular_decay;
    }
}
