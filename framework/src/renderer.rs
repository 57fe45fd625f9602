//! Seams between the surface owner and a scene renderer.

use winit::event::WindowEvent;

pub trait RendererBuilder {
    type Renderer: Renderer;

    fn build(
        self,
        adapter: &wgpu::Adapter,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    ) -> Self::Renderer;
}

pub trait Renderer {
    /// Advances animation state by one frame. Called once per redraw,
    /// before [`Renderer::render`].
    fn update(&mut self);

    /// Raw window events (pointer, touch, focus). Default: ignored.
    fn window_event(&mut self, event: &WindowEvent) {
        let _ = event;
    }

    fn resize(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: &wgpu::SurfaceConfiguration,
    );

    fn render(
        &mut self,
        texture_view: &wgpu::TextureView,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    );
}
