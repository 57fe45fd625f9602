//! Shared geometric primitives: a look-at camera with model-fitting
//! helpers, a resizable perspective projection and an axis-aligned
//! bounding box.

mod aabb;
mod camera;
mod projection;

pub use aabb::Aabb;
pub use camera::Camera;
pub use projection::Projection;
