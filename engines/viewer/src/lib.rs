//! Viewer cores for the portfolio's 3D scenes.
//!
//! Two independent viewers share the same rendering plumbing:
//!
//! - [`ExploderScene`] loads a model once and drives a visibility-triggered
//!   explode/implode animation over its parts, auto-rotating continuously.
//! - [`ShowcaseScene`] renders one model with the dithering shader and
//!   follows pointer/touch input with damped rotation and pinch zoom.
//!
//! All animation state is owned by one scene instance and mutated only on
//! the frame callback; there is no cross-thread sharing.

mod config;
mod dither;
mod easing;
mod explode;
mod input;
mod renderer;
mod scene;
mod visibility;

pub use config::{Color, ColorParseError, ViewerConfig};
pub use dither::{threshold_lookup, threshold_recursive, BAYER_4X4};
pub use easing::ease_in_out_cubic;
pub use explode::{explode_direction, ExplodeDriver, ExplodePhase};
pub use renderer::{SceneRenderer, SceneRendererBuilder};
pub use scene::{ExploderScene, Scene, ShowcaseScene};
pub use visibility::{VisibilityEdge, VisibilityObserver};
