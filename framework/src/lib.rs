//! Window and GPU-surface plumbing for the portfolio viewers.
//!
//! The [`application::Application`] owns the winit window and the wgpu
//! surface; scene-specific drawing hides behind the [`renderer`] traits.
//! A surface that becomes unusable degrades gracefully: rendering is
//! skipped until the surface can be reconfigured, never panicking.

pub mod application;
pub mod logging;
pub mod renderer;
