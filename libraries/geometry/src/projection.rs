use core::ops::Range;
use glam::Mat4;

/// A perspective projection that can follow surface resizes.
pub struct Projection {
    fov_y: f32,
    aspect: f32,
    depth: Range<f32>,
}

impl Projection {
    /// # Panics
    ///
    /// Panics if `surface_dimensions` has a zero component.
    #[expect(clippy::cast_precision_loss, reason = "surface sizes are small")]
    #[must_use]
    pub fn new_perspective(
        surface_dimensions: (u32, u32),
        fov_y: f32,
        depth: Range<f32>,
    ) -> Self {
        let (width, height) = surface_dimensions;
        assert!(width > 0 && height > 0, "surface must not be empty");

        Self {
            fov_y,
            aspect: width as f32 / height as f32,
            depth,
        }
    }

    #[expect(clippy::cast_precision_loss, reason = "surface sizes are small")]
    pub fn set_surface_dimensions(&mut self, surface_dimensions: (u32, u32)) {
        let (width, height) = surface_dimensions;
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }

    #[must_use]
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.depth.start, self.depth.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_updates_aspect() {
        let mut projection =
            Projection::new_perspective((800, 600), 45_f32.to_radians(), 0.1..1000.0);
        let before = projection.matrix();
        projection.set_surface_dimensions((600, 600));
        assert_ne!(before, projection.matrix());
    }

    #[test]
    fn empty_resize_is_ignored() {
        let mut projection =
            Projection::new_perspective((800, 600), 45_f32.to_radians(), 0.1..1000.0);
        let before = projection.matrix();
        projection.set_surface_dimensions((0, 600));
        assert_eq!(before, projection.matrix());
    }
}
