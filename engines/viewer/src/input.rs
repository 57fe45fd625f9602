//! Pointer, touch-drag and pinch input for the showcase viewer.
//!
//! The showcase never snaps to the input. Every input source only moves a
//! rotation *target*; the visible rotation eases toward that target by a
//! fixed fraction per frame, which gives the scene its floaty feel.

use glam::Vec2;

/// Fraction of the remaining distance covered per frame.
const DAMPING: f32 = 0.05;
/// How far the pointer offset from the window center tilts the model.
const POINTER_SENSITIVITY: f32 = 0.5;
/// Radians of target rotation per pixel of touch drag.
const DRAG_SENSITIVITY: f32 = 0.005;
/// Idle rotation added to the target every frame, yaw and pitch.
const AUTO_SPIN_YAW: f32 = 0.003;
const AUTO_SPIN_PITCH: f32 = 0.002;

/// Damped two-axis rotation fed by pointer position, touch drags and an
/// optional idle auto-spin.
pub struct RotationInput {
    /// x: pitch, y: yaw, both in radians.
    current: Vec2,
    target: Vec2,
    auto_spin: bool,
}

impl RotationInput {
    #[must_use]
    pub fn new(auto_spin: bool) -> Self {
        Self {
            current: Vec2::ZERO,
            target: Vec2::ZERO,
            auto_spin,
        }
    }

    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.current.x
    }

    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.current.y
    }

    /// Pointer position as an offset from the window center, each axis
    /// normalized to `[-1, 1]`. Sets the target absolutely.
    pub fn point_to(&mut self, normalized_offset: Vec2) {
        self.target = Vec2::new(normalized_offset.y, normalized_offset.x) * POINTER_SENSITIVITY;
    }

    /// Touch drag by `delta` pixels. Moves the target relatively.
    pub fn drag(&mut self, delta: Vec2) {
        self.target += Vec2::new(delta.y, delta.x) * DRAG_SENSITIVITY;
    }

    /// One frame of easing toward the target.
    pub fn advance(&mut self) {
        if self.auto_spin {
            self.target += Vec2::new(AUTO_SPIN_PITCH, AUTO_SPIN_YAW);
        }
        self.current += (self.target - self.current) * DAMPING;
    }
}

/// Two-finger pinch mapped onto the camera distance.
///
/// The scale factor is the ratio of the finger separation at gesture start
/// to the current separation, clamped to `[0.6, 2.5]`. The clamp is
/// relative to the distance at gesture start, so consecutive pinches can
/// still walk the camera further in or out.
pub struct PinchZoom {
    distance: f32,
    gesture: Option<Gesture>,
}

struct Gesture {
    initial_separation: f32,
    initial_distance: f32,
}

impl PinchZoom {
    pub const MIN_SCALE: f32 = 0.6;
    pub const MAX_SCALE: f32 = 2.5;

    #[must_use]
    pub fn new(distance: f32) -> Self {
        Self {
            distance,
            gesture: None,
        }
    }

    /// Camera distance after all pinches so far.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn begin(&mut self, separation: f32) {
        if separation <= f32::EPSILON {
            return;
        }
        self.gesture = Some(Gesture {
            initial_separation: separation,
            initial_distance: self.distance,
        });
    }

    pub fn update(&mut self, separation: f32) {
        let Some(gesture) = self.gesture.as_ref() else {
            return;
        };
        if separation <= f32::EPSILON {
            return;
        }
        let scale =
            (gesture.initial_separation / separation).clamp(Self::MIN_SCALE, Self::MAX_SCALE);
        self.distance = gesture.initial_distance * scale;
    }

    pub fn end(&mut self) {
        self.gesture = None;
    }
}
