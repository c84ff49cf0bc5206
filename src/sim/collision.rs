//! Ball-vs-shape narrow phase
//!
//! Both shape kinds report the same `CollisionResult` so the response code
//! never needs to know which kind it hit.

use glam::Vec2;

use super::geometry::{
    closest_point_on_rotated_rect, closest_point_on_triangle_edge, rect_local_to_world,
    rect_local_to_world_dir, rotated_triangle_vertices,
};
use super::shape::{Rectangle, Shape, ShapeKind, Triangle};

/// Below this separation the contact normal is unreliable
const MIN_SEPARATION: f32 = 1e-6;

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the shape boundary (if hit)
    pub point: Vec2,
    /// Unit normal from the contact point toward the ball center
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub depth: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            depth: 0.0,
        }
    }
}

/// Check a ball against any shape
pub fn detect_collision(ball_pos: Vec2, ball_radius: f32, shape: &Shape) -> CollisionResult {
    match &shape.kind {
        ShapeKind::Rectangle(rect) => ball_rect_collision(ball_pos, ball_radius, rect),
        ShapeKind::Triangle(tri) => ball_triangle_collision(ball_pos, ball_radius, tri),
    }
}

/// Check a ball against a rotated rectangle
///
/// The search runs in the rectangle's local frame; the normal and contact
/// point are rotated back to world space.
pub fn ball_rect_collision(ball_pos: Vec2, ball_radius: f32, rect: &Rectangle) -> CollisionResult {
    let proj = closest_point_on_rotated_rect(ball_pos, rect);
    let offset = proj.offset();
    let distance = offset.length();

    if distance >= ball_radius {
        return CollisionResult::miss();
    }

    if distance > MIN_SEPARATION {
        return CollisionResult {
            hit: true,
            point: rect_local_to_world(rect, proj.closest_local),
            normal: rect_local_to_world_dir(rect, offset / distance),
            depth: ball_radius - distance,
        };
    }

    // Center inside (or exactly on) the rectangle: push out through the
    // nearest face
    let half = rect.half_extents();
    let local = proj.local;
    let gap = half - local.abs();
    let (normal_local, surface_local, face_gap) = if gap.x < gap.y {
        let sx = local.x.signum();
        (Vec2::new(sx, 0.0), Vec2::new(sx * half.x, local.y), gap.x)
    } else {
        let sy = local.y.signum();
        (Vec2::new(0.0, sy), Vec2::new(local.x, sy * half.y), gap.y)
    };

    CollisionResult {
        hit: true,
        point: rect_local_to_world(rect, surface_local),
        normal: rect_local_to_world_dir(rect, normal_local),
        depth: ball_radius + face_gap,
    }
}

/// Check a ball against the three edges of a triangle
pub fn ball_triangle_collision(ball_pos: Vec2, ball_radius: f32, tri: &Triangle) -> CollisionResult {
    let proj = closest_point_on_triangle_edge(ball_pos, tri);

    if proj.distance >= ball_radius {
        return CollisionResult::miss();
    }

    if proj.distance > MIN_SEPARATION {
        return CollisionResult {
            hit: true,
            point: proj.closest,
            normal: (ball_pos - proj.closest) / proj.distance,
            depth: ball_radius - proj.distance,
        };
    }

    // Ball center sits on the edge - use the edge perpendicular facing away
    // from the pivot
    let verts = rotated_triangle_vertices(tri);
    let edge = verts[(proj.edge + 1) % 3] - verts[proj.edge];
    let perp = edge.perp().normalize_or_zero();
    let normal = if perp == Vec2::ZERO {
        Vec2::NEG_Y
    } else if perp.dot(proj.closest - tri.centroid) < 0.0 {
        -perp
    } else {
        perp
    };

    CollisionResult {
        hit: true,
        point: proj.closest,
        normal,
        depth: ball_radius,
    }
}

/// Whether the ball is close enough to a vertex to pop it
#[inline]
pub fn detect_vertex_proximity(ball_pos: Vec2, ball_radius: f32, vertex: Vec2, buffer: f32) -> bool {
    ball_pos.distance(vertex) < ball_radius + buffer
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::Shape;
    use proptest::prelude::*;

    fn square() -> Rectangle {
        Rectangle::new(Vec2::new(500.0, 500.0), 100.0, 100.0, 0.0)
    }

    #[test]
    fn test_rect_face_hit() {
        // Ball above the top face, overlapping by 10
        let result = ball_rect_collision(Vec2::new(500.0, 430.0), 30.0, &square());
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert!((result.depth - 10.0).abs() < 1e-4);
        assert!((result.point - Vec2::new(500.0, 450.0)).length() < 1e-4);
    }

    #[test]
    fn test_rect_miss() {
        let result = ball_rect_collision(Vec2::new(500.0, 400.0), 30.0, &square());
        assert!(!result.hit);
    }

    #[test]
    fn test_rect_corner_normal_is_diagonal() {
        let result = ball_rect_collision(Vec2::new(565.0, 565.0), 30.0, &square());
        assert!(result.hit);
        let expected = Vec2::new(1.0, 1.0).normalize();
        assert!((result.normal - expected).length() < 1e-5);
    }

    #[test]
    fn test_rotated_rect_normal_in_world_space() {
        // 90° rotation swaps the extents: 100 wide, 20 tall becomes 20 wide, 100 tall
        let rect = Rectangle::new(Vec2::ZERO, 100.0, 20.0, 90.0);
        let result = ball_rect_collision(Vec2::new(35.0, 0.0), 30.0, &rect);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(1.0, 0.0)).length() < 1e-4);
        assert!((result.depth - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_rect_center_inside_pushes_through_nearest_face() {
        // 10 below the top face, 40 from the sides
        let result = ball_rect_collision(Vec2::new(510.0, 460.0), 30.0, &square());
        assert!(result.hit);
        assert!(result.normal.is_finite());
        assert!((result.normal - Vec2::new(0.0, -1.0)).length() < 1e-5);
        assert!((result.depth - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_rect_exact_center_is_finite() {
        let result = ball_rect_collision(Vec2::new(500.0, 500.0), 30.0, &square());
        assert!(result.hit);
        assert!(result.normal.is_finite());
        assert!((result.normal.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_triangle_edge_hit() {
        let tri = Triangle::new(
            [
                Vec2::new(0.0, 100.0),
                Vec2::new(100.0, 100.0),
                Vec2::new(50.0, 0.0),
            ],
            Vec2::new(50.0, 66.0),
            0.0,
        );
        // Ball just below the bottom edge
        let result = ball_triangle_collision(Vec2::new(50.0, 120.0), 30.0, &tri);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, 1.0)).length() < 1e-5);
        assert!((result.depth - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_triangle_is_boundary_only() {
        let tri = Triangle::new(
            [
                Vec2::new(0.0, 400.0),
                Vec2::new(400.0, 400.0),
                Vec2::new(200.0, 0.0),
            ],
            Vec2::new(200.0, 266.0),
            0.0,
        );
        // Deep inside, more than a radius from every edge
        let result = ball_triangle_collision(Vec2::new(200.0, 300.0), 30.0, &tri);
        assert!(!result.hit);
    }

    #[test]
    fn test_triangle_center_on_edge_points_away_from_pivot() {
        let tri = Triangle::new(
            [
                Vec2::new(0.0, 100.0),
                Vec2::new(100.0, 100.0),
                Vec2::new(50.0, 0.0),
            ],
            Vec2::new(50.0, 66.0),
            0.0,
        );
        let result = ball_triangle_collision(Vec2::new(50.0, 100.0), 30.0, &tri);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, 1.0)).length() < 1e-5);
        assert_eq!(result.depth, 30.0);
    }

    #[test]
    fn test_detect_collision_dispatch() {
        let shape = Shape::rectangle(Vec2::new(500.0, 500.0), 100.0, 100.0, 0.0, 0);
        assert!(detect_collision(Vec2::new(500.0, 430.0), 30.0, &shape).hit);
        assert!(!detect_collision(Vec2::new(100.0, 100.0), 30.0, &shape).hit);
    }

    #[test]
    fn test_vertex_proximity_buffer() {
        let vertex = Vec2::new(100.0, 0.0);
        assert!(detect_vertex_proximity(Vec2::ZERO, 96.0, vertex, 5.0));
        assert!(!detect_vertex_proximity(Vec2::ZERO, 95.0, vertex, 5.0));
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(Vec2::new(100.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-100.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    proptest! {
        #[test]
        fn prop_reflection_flips_normal_keeps_tangent(
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
            angle in 0.0f32..std::f32::consts::TAU,
        ) {
            let v = Vec2::new(vx, vy);
            let n = Vec2::from_angle(angle);
            let t = n.perp();
            let r = reflect_velocity(v, n);
            prop_assert!((r.dot(t) - v.dot(t)).abs() < 1e-3);
            prop_assert!((r.dot(n) + v.dot(n)).abs() < 1e-3);
        }

        #[test]
        fn prop_rect_hit_normal_is_unit(
            x in 400.0f32..600.0,
            y in 400.0f32..600.0,
            rotation in 0.0f32..360.0,
        ) {
            let rect = Rectangle::new(Vec2::new(500.0, 500.0), 120.0, 60.0, rotation);
            let result = ball_rect_collision(Vec2::new(x, y), 30.0, &rect);
            if result.hit {
                prop_assert!((result.normal.length() - 1.0).abs() < 1e-3);
                prop_assert!(result.depth > 0.0);
            }
        }
    }
}
