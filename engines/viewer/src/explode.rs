//! Exploded-view animation over a model's parts.
//!
//! Part positions are always computed from the rest positions captured at
//! load time, never from the current positions, so applying any progress
//! value is idempotent and progress `0.0` restores the assembled model
//! exactly.

use crate::easing::ease_in_out_cubic;
use glam::Vec3;
use lib_mesh_model::Model;
use log::debug;
use std::f32::consts::TAU;
use std::time::{Duration, Instant};

/// Direction a part travels when the model explodes.
///
/// Parts move radially away from the model's bounds center. A part whose
/// rest position sits on that center has no radial direction; those get
/// evenly spaced directions around the XY circle so they still separate.
#[must_use]
pub fn explode_direction(
    rest_position: Vec3,
    center: Vec3,
    part_index: usize,
    part_count: usize,
) -> Vec3 {
    let radial = rest_position - center;
    if radial.length_squared() > f32::EPSILON {
        return radial.normalize();
    }
    #[expect(clippy::cast_precision_loss, reason = "part counts are small")]
    let angle = part_index as f32 / part_count.max(1) as f32 * TAU;
    Vec3::new(angle.cos(), angle.sin(), 0.0)
}

/// Places every part at `rest + direction * distance * ease(progress)`,
/// with directions taken from the model's bounds center. Models whose
/// geometry is not centered at the origin still fly apart outward.
///
/// `progress` is clamped to `[0, 1]`; `0.0` is the assembled model and
/// `1.0` the fully exploded one.
pub fn apply(model: &mut Model, distance: f32, progress: f32) {
    let eased = ease_in_out_cubic(progress.clamp(0.0, 1.0));
    let center = model.bounds().center();
    let part_count = model.parts().len();
    for (index, part) in model.parts_mut().iter_mut().enumerate() {
        let rest = part.rest_position();
        let direction = explode_direction(rest, center, index, part_count);
        part.position = rest + direction * distance * eased;
    }
}

/// Where the explode animation currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplodePhase {
    Resting,
    Exploding,
    Exploded,
    Imploding,
}

/// Start of the currently running transition.
#[derive(Debug, Clone, Copy)]
struct Anchor {
    time: Instant,
    progress: f32,
}

/// Drives the explode progress through its four phases.
///
/// Transitions are triggered by visibility changes and advance on every
/// frame tick. A trigger while already moving toward (or settled in) the
/// requested state is ignored; a trigger reversing a running transition
/// resumes from the current progress, so a half-finished explode implodes
/// in half the configured duration.
pub struct ExplodeDriver {
    phase: ExplodePhase,
    duration: Duration,
    progress: f32,
    anchor: Option<Anchor>,
}

impl ExplodeDriver {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            phase: ExplodePhase::Resting,
            duration,
            progress: 0.0,
            anchor: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> ExplodePhase {
        self.phase
    }

    /// Raw (un-eased) progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn trigger_explode(&mut self, now: Instant) {
        match self.phase {
            ExplodePhase::Exploding | ExplodePhase::Exploded => {}
            ExplodePhase::Resting | ExplodePhase::Imploding => {
                debug!("explode triggered at progress {}", self.progress);
                self.phase = ExplodePhase::Exploding;
                self.anchor = Some(Anchor {
                    time: now,
                    progress: self.progress,
                });
            }
        }
    }

    pub fn trigger_implode(&mut self, now: Instant) {
        match self.phase {
            ExplodePhase::Imploding | ExplodePhase::Resting => {}
            ExplodePhase::Exploding | ExplodePhase::Exploded => {
                debug!("implode triggered at progress {}", self.progress);
                self.phase = ExplodePhase::Imploding;
                self.anchor = Some(Anchor {
                    time: now,
                    progress: self.progress,
                });
            }
        }
    }

    /// Advances the animation to `now` and returns the current progress.
    /// Settles into `Exploded` or `Resting` when the endpoint is reached.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let Some(anchor) = self.anchor else {
            return self.progress;
        };

        let elapsed = now.saturating_duration_since(anchor.time).as_secs_f32();
        let step = elapsed / self.duration.as_secs_f32().max(f32::EPSILON);

        match self.phase {
            ExplodePhase::Exploding => {
                self.progress = (anchor.progress + step).min(1.0);
                if self.progress >= 1.0 {
                    self.phase = ExplodePhase::Exploded;
                    self.anchor = None;
                }
            }
            ExplodePhase::Imploding => {
                self.progress = (anchor.progress - step).max(0.0);
                if self.progress <= 0.0 {
                    self.phase = ExplodePhase::Resting;
                    self.anchor = None;
                }
            }
            ExplodePhase::Resting | ExplodePhase::Exploded => {
                self.anchor = None;
            }
        }

        self.progress
    }
}
