use crate::renderer::{self, Renderer as _};
use log::{debug, error, info, trace, warn};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use winit::{
    application::ApplicationHandler,
    event::{KeyEvent, WindowEvent},
    event_loop::ActiveEventLoop,
    keyboard::{Key, NamedKey},
    window::{Window, WindowAttributes, WindowId},
};

/// Everything wgpu-side that lives exactly as long as the window surface.
struct GpuState {
    surface: wgpu::Surface<'static>,
    adapter: wgpu::Adapter,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
}

impl GpuState {
    /// Returns `None` when no usable rendering context exists; every
    /// failure is logged, none of them panics.
    fn new(window: Arc<Window>) -> Option<Self> {
        let size = window.inner_size();
        debug!("window size: {size:?}");

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        debug!("create wgpu surface for window");
        let surface = match instance.create_surface(window) {
            Ok(surface) => surface,
            Err(create_error) => {
                error!("surface creation failed: {create_error}");
                return None;
            }
        };

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: Some(&surface),
        }));
        let Some(adapter) = adapter else {
            error!("no compatible graphics adapter found");
            return None;
        };

        let adapter_info = adapter.get_info();
        info!("using {} ({:?})", adapter_info.name, adapter_info.backend);

        let required_limits =
            wgpu::Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits());
        let device_and_queue = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
            },
            None,
        ));
        let (device, queue) = match device_and_queue {
            Ok(pair) => pair,
            Err(request_error) => {
                error!("device request failed: {request_error}");
                return None;
            }
        };

        let Some(mut config) =
            surface.get_default_config(&adapter, size.width.max(1), size.height.max(1))
        else {
            error!("surface is not supported by the adapter");
            return None;
        };
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);

        Some(Self {
            surface,
            adapter,
            device,
            queue,
            config,
        })
    }
}

/// Owns the window, the wgpu surface and one scene renderer. Runs the
/// continuous redraw loop and degrades to a static state when the
/// rendering context is unusable, resuming when it comes back.
pub struct Application<Builder: renderer::RendererBuilder> {
    title: String,
    renderer_builder: Option<Builder>,
    renderer: Option<Builder::Renderer>,
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    /// Set when the surface or device is lost beyond reconfiguration;
    /// cleared when a usable surface is re-established.
    degraded: bool,
    frame_counter: u32,
    frame_time: Instant,
}

impl<Builder: renderer::RendererBuilder> Application<Builder> {
    #[must_use]
    pub fn new(title: String, renderer_builder: Builder) -> Self {
        Self {
            title,
            renderer_builder: Some(renderer_builder),
            renderer: None,
            window: None,
            gpu: None,
            degraded: false,
            frame_counter: 0,
            frame_time: Instant::now(),
        }
    }

    fn update_fps(&mut self) {
        self.frame_counter += 1;
        let span = self.frame_time.elapsed();
        if span >= Duration::from_secs(1) {
            #[expect(clippy::cast_precision_loss, reason = "frame counts are small")]
            let fps = (self.frame_counter as f32) / span.as_secs_f32();
            debug!("{} fps", fps.round());
            self.frame_counter = 0;
            self.frame_time += span;
        }
    }

    fn try_restore_surface(&mut self) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        match GpuState::new(Arc::clone(window)) {
            Some(gpu) => {
                info!("rendering context restored");
                self.degraded = false;
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(&gpu.device, &gpu.queue, &gpu.config);
                }
                self.gpu = Some(gpu);
                window.request_redraw();
            }
            None => {
                warn!("rendering context still unavailable; staying degraded");
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(gpu), Some(renderer)) = (self.gpu.as_mut(), self.renderer.as_mut()) else {
            return;
        };

        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("surface lost, reconfiguring");
                gpu.surface.configure(&gpu.device, &gpu.config);
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => {
                trace!("surface frame timed out, skipping");
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
                return;
            }
            Err(error) => {
                error!("rendering context lost ({error}); degrading to a static state");
                self.degraded = true;
                self.gpu = None;
                return;
            }
        };

        let texture_view = frame.texture.create_view(&wgpu::TextureViewDescriptor {
            format: Some(gpu.config.view_formats.first().copied().unwrap_or(gpu.config.format)),
            ..wgpu::TextureViewDescriptor::default()
        });

        renderer.update();
        renderer.render(&texture_view, &gpu.device, &gpu.queue);

        frame.present();
        self.update_fps();

        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

impl<Builder: renderer::RendererBuilder> ApplicationHandler for Application<Builder> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = WindowAttributes::default().with_title(&self.title);
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(os_error) => {
                error!("window creation failed: {os_error}");
                event_loop.exit();
                return;
            }
        };

        match GpuState::new(Arc::clone(&window)) {
            Some(gpu) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    // the surface may have changed size while suspended
                    renderer.resize(&gpu.device, &gpu.queue, &gpu.config);
                } else if let Some(builder) = self.renderer_builder.take() {
                    // first-time init of the scene
                    self.renderer.replace(builder.build(
                        &gpu.adapter,
                        &gpu.device,
                        &gpu.queue,
                        &gpu.config,
                    ));
                }
                self.gpu = Some(gpu);
                self.degraded = false;
                window.request_redraw();
            }
            None => {
                warn!("no usable rendering context; window stays static");
                self.degraded = true;
            }
        }

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::Resized(size) => {
                trace!("WindowEvent::Resized({size:?})");
                if self.degraded {
                    self.try_restore_surface();
                }
                if size.width == 0 || size.height == 0 {
                    trace!("surface would be empty");
                    return;
                }
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.config.width = size.width;
                    gpu.config.height = size.height;
                    gpu.surface.configure(&gpu.device, &gpu.config);
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.resize(&gpu.device, &gpu.queue, &gpu.config);
                    }
                }
                if let Some(window) = self.window.as_ref() {
                    window.request_redraw();
                }
            }

            WindowEvent::CloseRequested => {
                trace!("WindowEvent::CloseRequested()");
                event_loop.exit();
            }

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        ..
                    },
                ..
            } => {
                event_loop.exit();
            }

            WindowEvent::RedrawRequested => {
                if self.degraded {
                    return;
                }
                self.redraw();
            }

            other => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.window_event(&other);
                }
            }
        }
    }

    fn suspended(&mut self, _event_loop: &ActiveEventLoop) {
        trace!("window event loop was suspended");
        // drop the surface with the window; a fresh one is built on resume
        self.gpu = None;
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        trace!("window event loop is exiting");
        // explicit disposal: release GPU resources before the window goes
        self.renderer = None;
        self.gpu = None;
    }
}
