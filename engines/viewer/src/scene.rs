//! The two viewer scenes and the seam the renderer drives them through.

use crate::config::ViewerConfig;
use crate::explode::{self, ExplodeDriver, ExplodePhase};
use crate::input::{PinchZoom, RotationInput};
use crate::visibility::{VisibilityEdge, VisibilityObserver};
use glam::{Mat4, Vec2, Vec3};
use lib_geometry::{Camera, Projection};
use lib_mesh_model::{Model, Palette};
use std::time::Instant;
use winit::dpi::PhysicalPosition;
use winit::event::{Touch, TouchPhase, WindowEvent};

/// Radians of idle rotation per frame in the exploded view.
const EXPLODER_SPIN: f32 = 0.005;
/// The exploded view pulls the camera back a little further than a tight
/// fit so the parts stay in frame at full spread.
const EXPLODER_DISTANCE_FACTOR: f32 = 1.5;
/// The showcase leaves a small margin around a tight fit.
const SHOWCASE_DISTANCE_FACTOR: f32 = 1.2;

const EXPLODER_FOV_Y: f32 = 45.0 * (std::f32::consts::PI / 180.0);
const SHOWCASE_FOV_Y: f32 = 75.0 * (std::f32::consts::PI / 180.0);

const DEPTH_RANGE: std::ops::Range<f32> = 0.1..1000.0;

/// What a scene exposes to the renderer: geometry once, camera and
/// per-part placement every frame.
pub trait Scene {
    fn model(&self) -> &Model;
    fn palette(&self) -> Palette;
    fn background(&self) -> wgpu::Color;
    fn camera(&self) -> &Camera;
    fn projection(&self) -> &Projection;

    /// World matrix per part, in part order.
    fn part_matrices(&self) -> Vec<Mat4>;

    /// Advances animation state to `now`. Called once per frame.
    fn advance(&mut self, now: Instant);

    fn window_event(&mut self, event: &WindowEvent) {
        let _ = event;
    }

    fn set_surface_dimensions(&mut self, dimensions: (u32, u32));
}

fn palette_from(config: &ViewerConfig) -> Palette {
    Palette {
        color_a: config.color_accent.to_vec4(),
        color_b: config.color_shadow.to_vec4(),
        color_c: config.color_highlight.to_vec4(),
        params: glam::Vec4::new(
            config.dither_scale,
            if config.dithering { 1.0 } else { 0.0 },
            0.0,
            0.0,
        ),
        ..Palette::default()
    }
}

/// Auto-rotating exploded view. Explodes when the viewer becomes visible,
/// reassembles when it leaves the screen.
pub struct ExploderScene {
    model: Model,
    config: ViewerConfig,
    driver: ExplodeDriver,
    observer: VisibilityObserver,
    camera: Camera,
    projection: Projection,
    center: Vec3,
    yaw: f32,
}

impl ExploderScene {
    #[must_use]
    pub fn new(model: Model, config: ViewerConfig) -> Self {
        let bounds = model.bounds();
        let center = bounds.center();
        let camera = Camera::new(
            center + Vec3::ONE * bounds.max_dimension() * EXPLODER_DISTANCE_FACTOR,
            center,
        );
        let driver = ExplodeDriver::new(config.animation_duration());
        Self {
            model,
            config,
            driver,
            observer: VisibilityObserver::default(),
            camera,
            projection: Projection::new_perspective((1, 1), EXPLODER_FOV_Y, DEPTH_RANGE),
            center,
            yaw: 0.0,
        }
    }

    /// Feeds a visibility sample, typically from the embedding page.
    /// Crossing the threshold starts the matching transition.
    pub fn set_visible_fraction(&mut self, fraction: f32, now: Instant) {
        match self.observer.update(fraction) {
            Some(VisibilityEdge::Entered) => self.driver.trigger_explode(now),
            Some(VisibilityEdge::Exited) => self.driver.trigger_implode(now),
            None => {}
        }
    }

    #[must_use]
    pub fn phase(&self) -> ExplodePhase {
        self.driver.phase()
    }
}

impl Scene for ExploderScene {
    fn model(&self) -> &Model {
        &self.model
    }

    fn palette(&self) -> Palette {
        palette_from(&self.config)
    }

    fn background(&self) -> wgpu::Color {
        self.config.background.to_wgpu()
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn projection(&self) -> &Projection {
        &self.projection
    }

    fn part_matrices(&self) -> Vec<Mat4> {
        // spin about the bounds center, not the world origin
        let turntable = Mat4::from_translation(self.center)
            * Mat4::from_rotation_y(self.yaw)
            * Mat4::from_translation(-self.center);
        self.model
            .parts()
            .iter()
            .map(|part| turntable * Mat4::from_translation(part.position))
            .collect()
    }

    fn advance(&mut self, now: Instant) {
        if self.config.auto_rotate {
            self.yaw += EXPLODER_SPIN;
        }
        let progress = self.driver.tick(now);
        explode::apply(&mut self.model, self.config.explode_distance, progress);
    }

    fn window_event(&mut self, event: &WindowEvent) {
        // a standalone window is either fully on screen or not at all
        if let WindowEvent::Occluded(occluded) = event {
            let fraction = if *occluded { 0.0 } else { 1.0 };
            self.set_visible_fraction(fraction, Instant::now());
        }
    }

    fn set_surface_dimensions(&mut self, dimensions: (u32, u32)) {
        self.projection.set_surface_dimensions(dimensions);
    }
}

/// One active touch point.
struct ActiveTouch {
    id: u64,
    position: Vec2,
}

/// Interactive dithered showcase. The model follows the pointer with
/// damped rotation, touch drags rotate it directly and a two-finger pinch
/// zooms the camera.
pub struct ShowcaseScene {
    model: Model,
    config: ViewerConfig,
    rotation: RotationInput,
    pinch: PinchZoom,
    camera: Camera,
    projection: Projection,
    surface: (u32, u32),
    touches: Vec<ActiveTouch>,
}

impl ShowcaseScene {
    #[must_use]
    pub fn new(model: Model, config: ViewerConfig) -> Self {
        let max_dimension = model.bounds().max_dimension();
        let distance =
            Camera::fit_distance(max_dimension, SHOWCASE_FOV_Y) * SHOWCASE_DISTANCE_FACTOR;
        let camera = Camera::new(Vec3::new(0.0, 0.0, distance), Vec3::ZERO);
        let rotation = RotationInput::new(config.auto_rotate);
        Self {
            model,
            config,
            rotation,
            pinch: PinchZoom::new(distance),
            camera,
            projection: Projection::new_perspective((1, 1), SHOWCASE_FOV_Y, DEPTH_RANGE),
            surface: (1, 1),
            touches: Vec::new(),
        }
    }

    fn separation(&self) -> Option<f32> {
        match self.touches.as_slice() {
            [first, second, ..] => Some((first.position - second.position).length()),
            _ => None,
        }
    }

    fn pointer_moved(&mut self, position: PhysicalPosition<f64>) {
        let (width, height) = self.surface;
        if width == 0 || height == 0 {
            return;
        }
        #[expect(clippy::cast_possible_truncation, reason = "window coordinates fit in f32")]
        let offset = Vec2::new(
            (position.x as f32 / width as f32).mul_add(2.0, -1.0),
            (position.y as f32 / height as f32).mul_add(2.0, -1.0),
        );
        self.rotation.point_to(offset);
    }

    fn touch(&mut self, touch: &Touch) {
        #[expect(clippy::cast_possible_truncation, reason = "window coordinates fit in f32")]
        let position = Vec2::new(touch.location.x as f32, touch.location.y as f32);
        match touch.phase {
            TouchPhase::Started => {
                self.touches.push(ActiveTouch {
                    id: touch.id,
                    position,
                });
                if let Some(separation) = self.separation() {
                    self.pinch.begin(separation);
                }
            }
            TouchPhase::Moved => {
                if self.touches.len() == 1 {
                    if let Some(previous) = self.touches.first() {
                        self.rotation.drag(position - previous.position);
                    }
                }
                if let Some(active) = self.touches.iter_mut().find(|entry| entry.id == touch.id) {
                    active.position = position;
                }
                if let Some(separation) = self.separation() {
                    self.pinch.update(separation);
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.retain(|entry| entry.id != touch.id);
                if self.touches.len() < 2 {
                    self.pinch.end();
                }
            }
        }
    }
}

impl Scene for ShowcaseScene {
    fn model(&self) -> &Model {
        &self.model
    }

    fn palette(&self) -> Palette {
        palette_from(&self.config)
    }

    fn background(&self) -> wgpu::Color {
        self.config.background.to_wgpu()
    }

    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn projection(&self) -> &Projection {
        &self.projection
    }

    fn part_matrices(&self) -> Vec<Mat4> {
        let orientation = Mat4::from_rotation_x(self.rotation.pitch())
            * Mat4::from_rotation_y(self.rotation.yaw());
        self.model
            .parts()
            .iter()
            .map(|part| orientation * Mat4::from_translation(part.position))
            .collect()
    }

    fn advance(&mut self, _now: Instant) {
        self.rotation.advance();
        self.camera.set_distance(self.pinch.distance());
    }

    fn window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.pointer_moved(*position),
            WindowEvent::Touch(touch) => self.touch(touch),
            _ => {}
        }
    }

    fn set_surface_dimensions(&mut self, dimensions: (u32, u32)) {
        self.surface = dimensions;
        self.projection.set_surface_dimensions(dimensions);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_mesh_model::{MeshData, Part, Vertex};
    use std::time::Duration;

    fn unit_cube_mesh() -> MeshData {
        let normal = Vec3::Z;
        MeshData {
            vertices: vec![
                Vertex::new(Vec3::new(-0.5, -0.5, 0.0), normal),
                Vertex::new(Vec3::new(0.5, -0.5, 0.0), normal),
                Vertex::new(Vec3::new(0.0, 0.5, 0.0), normal),
            ],
            indices: vec![0, 1, 2],
        }
    }

    fn model() -> Model {
        Model::from_parts(vec![
            Part::new("a".into(), unit_cube_mesh(), Vec3::new(-1.0, 0.0, 0.0)),
            Part::new("b".into(), unit_cube_mesh(), Vec3::new(1.0, 0.0, 0.0)),
        ])
    }

    fn config() -> ViewerConfig {
        ViewerConfig {
            animation_duration_ms: 1000,
            auto_rotate: false,
            ..ViewerConfig::default()
        }
    }

    #[test]
    fn becoming_visible_runs_the_explode_to_completion() {
        let start = Instant::now();
        let mut scene = ExploderScene::new(model(), config());
        assert_eq!(scene.phase(), ExplodePhase::Resting);

        scene.set_visible_fraction(1.0, start);
        assert_eq!(scene.phase(), ExplodePhase::Exploding);

        scene.advance(start + Duration::from_secs(1));
        assert_eq!(scene.phase(), ExplodePhase::Exploded);
        let part = &scene.model().parts()[0];
        assert_eq!(
            part.position,
            part.rest_position() + Vec3::NEG_X * scene.config.explode_distance
        );
    }

    #[test]
    fn repeated_visibility_samples_do_not_restart_the_animation() {
        let start = Instant::now();
        let mut scene = ExploderScene::new(model(), config());
        scene.set_visible_fraction(1.0, start);
        scene.advance(start + Duration::from_secs(1));
        assert_eq!(scene.phase(), ExplodePhase::Exploded);

        scene.set_visible_fraction(0.9, start + Duration::from_secs(2));
        assert_eq!(scene.phase(), ExplodePhase::Exploded);
    }

    #[test]
    fn leaving_the_screen_reassembles_the_model() {
        let start = Instant::now();
        let mut scene = ExploderScene::new(model(), config());
        scene.set_visible_fraction(1.0, start);
        scene.advance(start + Duration::from_secs(1));

        scene.set_visible_fraction(0.0, start + Duration::from_secs(1));
        scene.advance(start + Duration::from_secs(2));
        assert_eq!(scene.phase(), ExplodePhase::Resting);
        let part = &scene.model().parts()[0];
        assert_eq!(part.position, part.rest_position());
    }

    #[test]
    fn off_center_model_is_framed_and_exploded_around_its_bounds_center() {
        let start = Instant::now();
        let off_center = Model::from_parts(vec![
            Part::new("near".into(), unit_cube_mesh(), Vec3::new(9.0, 0.0, 0.0)),
            Part::new("far".into(), unit_cube_mesh(), Vec3::new(11.0, 0.0, 0.0)),
        ]);
        let center = off_center.bounds().center();
        let mut scene = ExploderScene::new(off_center, config());
        assert_eq!(scene.camera().look_at, center);

        scene.set_visible_fraction(1.0, start);
        scene.advance(start + Duration::from_secs(1));

        // the near part separates away from the center, not toward it
        let near = &scene.model().parts()[0];
        assert_eq!(
            near.position,
            near.rest_position() + Vec3::NEG_X * scene.config.explode_distance
        );
    }

    #[test]
    fn showcase_camera_starts_at_a_padded_fit_distance() {
        let scene = ShowcaseScene::new(model(), config());
        let max_dimension = scene.model().bounds().max_dimension();
        let expected = Camera::fit_distance(max_dimension, SHOWCASE_FOV_Y) * 1.2;
        assert!((scene.camera().distance() - expected).abs() < 1e-5);
    }

    #[test]
    fn pinch_zoom_moves_the_camera() {
        let mut scene = ShowcaseScene::new(model(), config());
        let before = scene.camera().distance();

        let finger = |id, phase, x: f32| {
            WindowEvent::Touch(Touch {
                device_id: winit::event::DeviceId::dummy(),
                phase,
                location: PhysicalPosition::new(f64::from(x), 0.0),
                force: None,
                id,
            })
        };
        scene.window_event(&finger(0, TouchPhase::Started, 0.0));
        scene.window_event(&finger(1, TouchPhase::Started, 100.0));
        scene.window_event(&finger(1, TouchPhase::Moved, 200.0));
        scene.advance(Instant::now());

        assert!((scene.camera().distance() - before * 0.6).abs() < 1e-4);
    }
}
