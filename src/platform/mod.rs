//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Pointer coordinates (device pixels to playfield space)
//! - The per-frame callback (requestAnimationFrame on web)

use glam::Vec2;

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Maps pointer positions from the displayed canvas rectangle into the
/// internal playfield coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Top-left of the displayed canvas in client coordinates
    pub origin: Vec2,
    /// Displayed size in client pixels
    pub display_size: Vec2,
    /// Internal (drawing buffer) size
    pub internal_size: Vec2,
}

impl Viewport {
    pub fn new(origin: Vec2, display_size: Vec2, internal_size: Vec2) -> Self {
        Self {
            origin,
            display_size,
            internal_size,
        }
    }

    /// Canvas shown at its internal size with no offset
    pub fn identity(internal_size: Vec2) -> Self {
        Self::new(Vec2::ZERO, internal_size, internal_size)
    }

    /// Per-axis internal units per client pixel. A collapsed axis maps 1:1.
    pub fn scale(&self) -> Vec2 {
        let axis = |internal: f32, display: f32| {
            if display > 0.0 { internal / display } else { 1.0 }
        };
        Vec2::new(
            axis(self.internal_size.x, self.display_size.x),
            axis(self.internal_size.y, self.display_size.y),
        )
    }

    /// Client coordinates to internal coordinates
    pub fn to_internal(&self, client: Vec2) -> Vec2 {
        (client - self.origin) * self.scale()
    }

    /// The canvas was moved or resized
    pub fn resize(&mut self, origin: Vec2, display_size: Vec2) {
        self.origin = origin;
        self.display_size = display_size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_passthrough() {
        let vp = Viewport::identity(Vec2::new(1366.0, 768.0));
        assert_eq!(vp.to_internal(Vec2::new(200.0, 300.0)), Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_scaled_and_offset_canvas() {
        // Canvas shown at half size, 20px from the left, 10px from the top
        let vp = Viewport::new(
            Vec2::new(20.0, 10.0),
            Vec2::new(683.0, 384.0),
            Vec2::new(1366.0, 768.0),
        );
        assert_eq!(vp.to_internal(Vec2::new(20.0, 10.0)), Vec2::ZERO);
        assert_eq!(vp.to_internal(Vec2::new(120.0, 202.0)), Vec2::new(200.0, 384.0));
    }

    #[test]
    fn test_zero_size_display_does_not_divide_by_zero() {
        let mut vp = Viewport::identity(Vec2::new(1366.0, 768.0));
        vp.resize(Vec2::ZERO, Vec2::ZERO);
        let p = vp.to_internal(Vec2::new(5.0, 6.0));
        assert!(p.is_finite());
        assert_eq!(p, Vec2::new(5.0, 6.0));
    }
}
