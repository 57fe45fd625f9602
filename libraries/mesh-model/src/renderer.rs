use crate::model::{Model, Vertex};
use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3, Vec4};
use lib_geometry::{Camera, Projection};
use std::borrow::Cow;
use wgpu::util::DeviceExt;

/// Fragment-shader palette and dithering parameters.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub struct Palette {
    pub color_a: Vec4,
    pub color_b: Vec4,
    pub color_c: Vec4,
    pub light_direction: Vec4,
    /// x: dither scale in pixels, y: dithering enabled (0 or 1)
    pub params: Vec4,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            color_a: Vec4::new(0.902, 0.224, 0.275, 1.0), // #E63946
            color_b: Vec4::new(0.039, 0.039, 0.039, 1.0), // #0A0A0A
            color_c: Vec4::new(0.961, 0.961, 0.941, 1.0), // #F5F5F0
            light_direction: (Vec3::ONE.normalize(), 0.0).into(),
            params: Vec4::new(8.0, 1.0, 0.0, 0.0),
        }
    }
}

struct GpuPart {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
    world_matrix_buf: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Uploads a [`Model`]'s parts to the GPU and draws them with per-part
/// world matrices through the dithering pipeline.
pub struct MeshRenderer {
    pipeline: wgpu::RenderPipeline,
    shared_bind_group: wgpu::BindGroup,
    camera_matrix_buf: wgpu::Buffer,
    projection_matrix_buf: wgpu::Buffer,
    palette_buf: wgpu::Buffer,
    parts: Vec<GpuPart>,
}

impl MeshRenderer {
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        view_format: wgpu::TextureFormat,
        shader_source: Cow<'_, str>,
        depth_stencil_state: wgpu::DepthStencilState,
        model: &Model,
        palette: &Palette,
    ) -> Self {
        let matrix_binding_type = wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(64),
        };

        let shared_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shared uniforms"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: matrix_binding_type,
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: matrix_binding_type,
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            size_of::<Palette>() as wgpu::BufferAddress
                        ),
                    },
                    count: None,
                },
            ],
        });
        let part_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("per-part uniforms"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: matrix_binding_type,
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&shared_layout, &part_layout],
            push_constant_ranges: &[],
        });

        let uniform = |label: &str, contents: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            })
        };

        let camera_matrix_buf = uniform("camera matrix", &[0_u8; size_of::<[f32; 16]>()]);
        let projection_matrix_buf = uniform("projection matrix", &[0_u8; size_of::<[f32; 16]>()]);
        let palette_buf = uniform("palette", bytemuck::bytes_of(palette));

        let shared_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shared_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_matrix_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: projection_matrix_buf.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: palette_buf.as_entire_binding(),
                },
            ],
            label: Some("shared uniforms"),
        });

        let parts = model
            .parts()
            .iter()
            .map(|part| {
                let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} vertex buffer", part.name())),
                    contents: bytemuck::cast_slice(&part.mesh().vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{} index buffer", part.name())),
                    contents: bytemuck::cast_slice(&part.mesh().indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                let world_matrix_buf =
                    uniform("part world matrix", &[0_u8; size_of::<[f32; 16]>()]);
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    layout: &part_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: world_matrix_buf.as_entire_binding(),
                    }],
                    label: Some(&format!("{} uniforms", part.name())),
                });

                GpuPart {
                    vertex_buf,
                    index_buf,
                    index_count: u32::try_from(part.mesh().indices.len()).unwrap_or(u32::MAX),
                    world_matrix_buf,
                    bind_group,
                }
            })
            .collect();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("dither shader"),
            source: wgpu::ShaderSource::Wgsl(shader_source),
        });

        let pipeline = Self::create_pipeline(
            device,
            &pipeline_layout,
            &shader,
            view_format,
            depth_stencil_state,
        );

        Self {
            pipeline,
            shared_bind_group,
            camera_matrix_buf,
            projection_matrix_buf,
            palette_buf,
            parts,
        }
    }

    /// Draws every part with its matching entry of `world_matrices`.
    /// Extra matrices are ignored; missing ones skip the part.
    pub fn render(
        &mut self,
        queue: &wgpu::Queue,
        render_pass: &mut wgpu::RenderPass<'_>,
        world_matrices: &[Mat4],
        camera: &Camera,
        projection: &Projection,
    ) {
        let camera_matrix = camera.matrix();
        queue.write_buffer(
            &self.camera_matrix_buf,
            0,
            bytemuck::cast_slice(camera_matrix.as_ref()),
        );
        let projection_matrix = projection.matrix();
        queue.write_buffer(
            &self.projection_matrix_buf,
            0,
            bytemuck::cast_slice(projection_matrix.as_ref()),
        );

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.shared_bind_group, &[]);

        for (part, world_matrix) in self.parts.iter().zip(world_matrices) {
            queue.write_buffer(
                &part.world_matrix_buf,
                0,
                bytemuck::cast_slice(world_matrix.as_ref()),
            );
            render_pass.set_bind_group(1, &part.bind_group, &[]);
            render_pass.set_index_buffer(part.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.set_vertex_buffer(0, part.vertex_buf.slice(..));
            render_pass.draw_indexed(0..part.index_count, 0, 0..1);
        }
    }

    pub fn update_palette(&self, queue: &wgpu::Queue, palette: &Palette) {
        queue.write_buffer(&self.palette_buf, 0, bytemuck::bytes_of(palette));
    }

    fn create_pipeline(
        device: &wgpu::Device,
        pipeline_layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        view_format: wgpu::TextureFormat,
        depth_stencil_state: wgpu::DepthStencilState,
    ) -> wgpu::RenderPipeline {
        let vertex = wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers: &[Vertex::buffer_layout()],
        };

        let fragment_state = wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(view_format.into())],
        };

        let primitive = wgpu::PrimitiveState {
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(pipeline_layout),
            vertex,
            fragment: Some(fragment_state),
            primitive,
            depth_stencil: Some(depth_stencil_state),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }
}
