//! Closest-point primitives for rotated rectangles and triangles
//!
//! Rectangles are handled in their own rotated frame, where the closest point
//! is just a clamp to the half-extents. Triangles are treated as three edges
//! (boundaries, not filled regions).

use glam::Vec2;

use super::shape::{Rectangle, Triangle};
use crate::{rotate_about, rotate_deg};

/// Query point and its closest rectangle point, both in rectangle-local space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectProjection {
    pub local: Vec2,
    pub closest_local: Vec2,
}

impl RectProjection {
    /// Local-space offset from the closest point to the query point
    #[inline]
    pub fn offset(&self) -> Vec2 {
        self.local - self.closest_local
    }
}

/// Closest point on a triangle's boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeProjection {
    /// Edge `i` runs from vertex `i` to vertex `(i + 1) % 3`
    pub edge: usize,
    pub closest: Vec2,
    pub distance: f32,
}

/// Transform `point` into the rectangle's frame and clamp to its extents
pub fn closest_point_on_rotated_rect(point: Vec2, rect: &Rectangle) -> RectProjection {
    let local = rotate_deg(point - rect.center, -rect.rotation);
    let half = rect.half_extents();
    RectProjection {
        local,
        closest_local: local.clamp(-half, half),
    }
}

/// Rectangle-local vector back to world orientation (no translation)
#[inline]
pub fn rect_local_to_world_dir(rect: &Rectangle, v: Vec2) -> Vec2 {
    rotate_deg(v, rect.rotation)
}

/// Rectangle-local point back to world space
#[inline]
pub fn rect_local_to_world(rect: &Rectangle, p: Vec2) -> Vec2 {
    rect.center + rotate_deg(p, rect.rotation)
}

/// Closest point on a segment using the clamped parametric projection
#[inline]
pub fn closest_point_on_segment(point: Vec2, a: Vec2, b: Vec2) -> Vec2 {
    let edge = b - a;
    let len_sq = edge.length_squared();
    if len_sq < 1e-8 {
        return a; // Degenerate segment
    }
    let t = ((point - a).dot(edge) / len_sq).clamp(0.0, 1.0);
    a + edge * t
}

/// Closest point over all three (rotated) edges of a triangle
pub fn closest_point_on_triangle_edge(point: Vec2, tri: &Triangle) -> EdgeProjection {
    let verts = rotated_triangle_vertices(tri);

    let mut best = EdgeProjection {
        edge: 0,
        closest: verts[0],
        distance: f32::MAX,
    };
    for i in 0..3 {
        let closest = closest_point_on_segment(point, verts[i], verts[(i + 1) % 3]);
        let distance = point.distance(closest);
        if distance < best.distance {
            best = EdgeProjection {
                edge: i,
                closest,
                distance,
            };
        }
    }
    best
}

/// Four world-space corners, in order (-x,-y), (+x,-y), (+x,+y), (-x,+y) local
pub fn rotated_rect_vertices(rect: &Rectangle) -> [Vec2; 4] {
    let h = rect.half_extents();
    [
        Vec2::new(-h.x, -h.y),
        Vec2::new(h.x, -h.y),
        Vec2::new(h.x, h.y),
        Vec2::new(-h.x, h.y),
    ]
    .map(|corner| rect_local_to_world(rect, corner))
}

/// Triangle vertices rotated about the centroid
pub fn rotated_triangle_vertices(tri: &Triangle) -> [Vec2; 3] {
    if tri.rotation == 0.0 {
        return tri.points;
    }
    tri.points
        .map(|p| rotate_about(p, tri.centroid, tri.rotation))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_projection_axis_aligned() {
        let rect = Rectangle::new(Vec2::new(100.0, 100.0), 40.0, 20.0, 0.0);
        let proj = closest_point_on_rotated_rect(Vec2::new(150.0, 100.0), &rect);
        assert_eq!(proj.local, Vec2::new(50.0, 0.0));
        assert_eq!(proj.closest_local, Vec2::new(20.0, 0.0));
        assert_eq!(proj.offset(), Vec2::new(30.0, 0.0));
    }

    #[test]
    fn test_rect_projection_rotated_90() {
        // Tall after rotation: the 40-wide side now runs along y
        let rect = Rectangle::new(Vec2::ZERO, 40.0, 20.0, 90.0);
        let proj = closest_point_on_rotated_rect(Vec2::new(0.0, 50.0), &rect);
        assert!((proj.closest_local.x - 20.0).abs() < 1e-4);
        assert!(proj.closest_local.y.abs() < 1e-4);
        let world = rect_local_to_world(&rect, proj.closest_local);
        assert!((world - Vec2::new(0.0, 20.0)).length() < 1e-4);
    }

    #[test]
    fn test_rect_inside_point_clamps_to_itself() {
        let rect = Rectangle::new(Vec2::ZERO, 40.0, 20.0, 30.0);
        let proj = closest_point_on_rotated_rect(Vec2::new(1.0, 2.0), &rect);
        assert!(proj.offset().length() < 1e-5);
    }

    #[test]
    fn test_rotated_rect_vertices_45() {
        let rect = Rectangle::new(Vec2::new(980.0, 260.0), 220.0, 220.0, 45.0);
        let verts = rotated_rect_vertices(&rect);
        let diag = 110.0 * std::f32::consts::SQRT_2;
        // (-h, -h) rotated by 45° points straight up (y-down screen)
        assert!((verts[0] - Vec2::new(980.0, 260.0 - diag)).length() < 1e-3);
        assert!((verts[2] - Vec2::new(980.0, 260.0 + diag)).length() < 1e-3);
        for v in verts {
            assert!((v.distance(rect.center) - diag).abs() < 1e-3);
        }
    }

    #[test]
    fn test_triangle_edge_picks_globally_closest() {
        let tri = Triangle::new(
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(100.0, 0.0),
                Vec2::new(0.0, 100.0),
            ],
            Vec2::new(33.0, 33.0),
            0.0,
        );
        // Near the hypotenuse, far from the first edge
        let proj = closest_point_on_triangle_edge(Vec2::new(60.0, 60.0), &tri);
        assert_eq!(proj.edge, 1);
        assert!((proj.closest - Vec2::new(50.0, 50.0)).length() < 1e-4);
        assert!((proj.distance - 200.0_f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_triangle_edge_clamps_to_endpoint() {
        let tri = Triangle::new(
            [
                Vec2::new(0.0, 0.0),
                Vec2::new(100.0, 0.0),
                Vec2::new(0.0, 100.0),
            ],
            Vec2::new(33.0, 33.0),
            0.0,
        );
        let proj = closest_point_on_triangle_edge(Vec2::new(130.0, -40.0), &tri);
        assert!((proj.closest - Vec2::new(100.0, 0.0)).length() < 1e-4);
        assert!((proj.distance - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_triangle_rotation_about_centroid() {
        let tri = Triangle::new(
            [
                Vec2::new(10.0, 0.0),
                Vec2::new(0.0, 10.0),
                Vec2::new(-10.0, 0.0),
            ],
            Vec2::ZERO,
            180.0,
        );
        let verts = rotated_triangle_vertices(&tri);
        assert!((verts[0] - Vec2::new(-10.0, 0.0)).length() < 1e-4);
        assert!((verts[1] - Vec2::new(0.0, -10.0)).length() < 1e-4);
    }

    #[test]
    fn test_degenerate_segment() {
        let p = closest_point_on_segment(Vec2::new(5.0, 5.0), Vec2::ONE, Vec2::ONE);
        assert_eq!(p, Vec2::ONE);
    }
}
