use glam::{Mat4, Vec3};

/// A right-handed look-at camera.
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
}

impl Camera {
    #[must_use]
    pub fn new(eye: Vec3, center: Vec3) -> Self {
        Self {
            position: eye,
            look_at: center,
            up: Vec3::Y,
        }
    }

    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.look_at, self.up)
    }

    /// Distance from which an object of `max_dimension` exactly fills the
    /// vertical field of view `fov_y` (radians).
    #[must_use]
    pub fn fit_distance(max_dimension: f32, fov_y: f32) -> f32 {
        max_dimension / (2.0 * (fov_y / 2.0).tan())
    }

    /// Moves the eye along its current view direction so that it sits
    /// `distance` away from the look-at point.
    pub fn set_distance(&mut self, distance: f32) {
        let direction = (self.position - self.look_at).normalize_or(Vec3::Z);
        self.position = self.look_at + direction * distance;
    }

    #[must_use]
    pub fn distance(&self) -> f32 {
        (self.position - self.look_at).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_distance_fills_vertical_fov() {
        let fov_y = 90_f32.to_radians();
        let distance = Camera::fit_distance(2.0, fov_y);
        // tan(45°) == 1, so a 2-unit object fits exactly at distance 1
        assert!((distance - 1.0).abs() < 1e-6);
    }

    #[test]
    fn set_distance_preserves_direction() {
        let mut camera = Camera::new(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO);
        camera.set_distance(2.0);
        assert!((camera.position - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
        assert!((camera.distance() - 2.0).abs() < 1e-6);
    }
}
