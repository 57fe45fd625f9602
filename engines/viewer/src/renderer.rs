//! Bridges a [`Scene`] onto the window surface.

use crate::scene::Scene;
use lib_mesh_model::{MeshRenderer, DITHER_SHADER};
use std::borrow::Cow;
use std::time::Instant;
use viewer_framework::renderer;
use winit::event::WindowEvent;

/// Defers GPU resource creation until the surface exists.
pub struct SceneRendererBuilder<S: Scene> {
    scene: S,
}

impl<S: Scene> SceneRendererBuilder<S> {
    #[must_use]
    pub fn new(scene: S) -> Self {
        Self { scene }
    }
}

impl<S: Scene> renderer::RendererBuilder for SceneRendererBuilder<S> {
    type Renderer = SceneRenderer<S>;

    #[must_use]
    fn build(
        self,
        _adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) -> SceneRenderer<S> {
        let mut scene = self.scene;
        scene.set_surface_dimensions((surface.width, surface.height));

        let view_format = surface
            .view_formats
            .first()
            .copied()
            .unwrap_or(surface.format);
        let depth_map = DepthTexture::create(device, surface);
        let mesh_renderer = MeshRenderer::new(
            device,
            view_format,
            Cow::Borrowed(DITHER_SHADER),
            DepthTexture::depth_stencil_state(),
            scene.model(),
            &scene.palette(),
        );

        SceneRenderer {
            scene,
            mesh_renderer,
            depth_map,
        }
    }
}

/// Owns the GPU-side resources of one scene and draws it once per frame.
pub struct SceneRenderer<S: Scene> {
    scene: S,
    mesh_renderer: MeshRenderer,
    depth_map: DepthTexture,
}

impl<S: Scene> renderer::Renderer for SceneRenderer<S> {
    fn update(&mut self) {
        self.scene.advance(Instant::now());
    }

    fn window_event(&mut self, event: &WindowEvent) {
        self.scene.window_event(event);
    }

    fn resize(
        &mut self,
        device: &wgpu::Device,
        _queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) {
        self.scene
            .set_surface_dimensions((surface.width, surface.height));
        self.depth_map = DepthTexture::create(device, surface);
    }

    fn render(
        &mut self,
        texture_view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) {
        let mut encoder =
            device.create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        let color_attachment = wgpu::RenderPassColorAttachment {
            view: texture_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.scene.background()),
                store: wgpu::StoreOp::Store,
            },
        };
        let depth_attachment = wgpu::RenderPassDepthStencilAttachment {
            view: &self.depth_map.view,
            depth_ops: Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(1.0),
                store: wgpu::StoreOp::Store,
            }),
            stencil_ops: None,
        };
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: None,
                color_attachments: &[Some(color_attachment)],
                depth_stencil_attachment: Some(depth_attachment),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let world_matrices = self.scene.part_matrices();
            self.mesh_renderer.update_palette(queue, &self.scene.palette());
            self.mesh_renderer.render(
                queue,
                &mut render_pass,
                &world_matrices,
                self.scene.camera(),
                self.scene.projection(),
            );
        }

        queue.submit(Some(encoder.finish()));
    }
}

struct DepthTexture {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthTexture {
    const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    fn create(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> Self {
        let size = wgpu::Extent3d {
            width: config.width.max(1),
            height: config.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth map"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            _texture: texture,
            view,
        }
    }

    fn depth_stencil_state() -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}
