//! The wgpu sprite renderer.
//!
//! One pipeline draws everything: a shared unit quad, instanced with a 3x3
//! transform per sprite, textured by the bound material. Geometry and
//! materials are registered up front and addressed by handle; per-frame work
//! is one instance-buffer upload and one render pass per draw call.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::error::{Error, Result};
use crate::render::gpu::GpuContext;
use crate::render::shader::sprite_shader_source;
use crate::render::{GeometryHandle, InstanceTransform, MaterialHandle, RenderBackend};

/// A vertex of the shared quad: position in unit-quad space plus UV.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2],
    };
}

/// Unit quad as two triangles. Instance transforms stretch it to sprite size.
pub const QUAD_VERTICES: [QuadVertex; 6] = [
    QuadVertex { position: [0.0, 0.0], uv: [0.0, 0.0] },
    QuadVertex { position: [1.0, 0.0], uv: [1.0, 0.0] },
    QuadVertex { position: [0.0, 1.0], uv: [0.0, 1.0] },
    QuadVertex { position: [0.0, 1.0], uv: [0.0, 1.0] },
    QuadVertex { position: [1.0, 0.0], uv: [1.0, 0.0] },
    QuadVertex { position: [1.0, 1.0], uv: [1.0, 1.0] },
];

/// Per-instance data: a column-major 3x3 transform as three vec3 attributes.
const INSTANCE_LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
    array_stride: std::mem::size_of::<InstanceTransform>() as wgpu::BufferAddress,
    step_mode: wgpu::VertexStepMode::Instance,
    attributes: &wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32x3, 4 => Float32x3],
};

struct Geometry {
    vertex_buffer: wgpu::Buffer,
    vertex_count: u32,
}

struct Material {
    bind_group: wgpu::BindGroup,
}

struct Frame {
    surface_texture: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
}

/// The production [`RenderBackend`]: instanced sprite drawing over wgpu.
pub struct WgpuRenderer {
    gpu: GpuContext,
    pipeline: wgpu::RenderPipeline,
    texture_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    geometries: Vec<Geometry>,
    materials: Vec<Material>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    frame: Option<Frame>,
}

impl WgpuRenderer {
    const INITIAL_INSTANCE_CAPACITY: usize = 256;

    pub fn new(gpu: GpuContext) -> Result<Self> {
        let device = &gpu.device;

        let source = sprite_shader_source()?;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("sprite shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let texture_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("texture bind group layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("sprite pipeline layout"),
            bind_group_layouts: &[&texture_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("sprite pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[QuadVertex::LAYOUT, INSTANCE_LAYOUT],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.surface_format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None, // 2D sprites are double-sided
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Shared sampler for all sprite textures. Nearest keeps pixel art
        // crisp.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sprite sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance buffer"),
            size: (Self::INITIAL_INSTANCE_CAPACITY * std::mem::size_of::<InstanceTransform>())
                as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            gpu,
            pipeline,
            texture_bind_group_layout,
            sampler,
            geometries: Vec::new(),
            materials: Vec::new(),
            instance_buffer,
            instance_capacity: Self::INITIAL_INSTANCE_CAPACITY,
            frame: None,
        })
    }

    /// Register the shared unit-quad geometry.
    pub fn create_quad_geometry(&mut self) -> GeometryHandle {
        let vertex_buffer = self
            .gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("quad vertex buffer"),
                contents: bytemuck::cast_slice(&QUAD_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });
        self.geometries.push(Geometry {
            vertex_buffer,
            vertex_count: QUAD_VERTICES.len() as u32,
        });
        GeometryHandle(self.geometries.len() - 1)
    }

    /// Upload RGBA pixels as a sprite texture and register a material for it.
    pub fn create_sprite_material(
        &mut self,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> MaterialHandle {
        let texture = self.gpu.device.create_texture_with_data(
            &self.gpu.queue,
            &wgpu::TextureDescriptor {
                label: Some("sprite texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = self.gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("sprite material bind group"),
            layout: &self.texture_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        self.materials.push(Material { bind_group });
        MaterialHandle(self.materials.len() - 1)
    }

    /// Acquire the surface texture for this frame. Surface errors propagate
    /// so the window runner can reconfigure or bail.
    pub fn begin_frame(&mut self) -> std::result::Result<(), wgpu::SurfaceError> {
        let surface_texture = self.gpu.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.frame = Some(Frame {
            surface_texture,
            view,
        });
        Ok(())
    }

    /// Present the frame acquired by [`begin_frame`](Self::begin_frame).
    pub fn end_frame(&mut self) {
        if let Some(frame) = self.frame.take() {
            frame.surface_texture.present();
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(width, height);
    }

    fn frame_view(&self) -> Result<&wgpu::TextureView> {
        self.frame
            .as_ref()
            .map(|f| &f.view)
            .ok_or_else(|| Error::Render("draw call outside begin_frame/end_frame".to_string()))
    }

    fn grow_instance_buffer(&mut self, count: usize) {
        if count <= self.instance_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        self.instance_buffer = self.gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("instance buffer"),
            size: (capacity * std::mem::size_of::<InstanceTransform>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.instance_capacity = capacity;
    }
}

impl RenderBackend for WgpuRenderer {
    fn surface_size(&self) -> (u32, u32) {
        self.gpu.surface_size()
    }

    fn clear(&mut self, color: [f64; 4]) -> Result<()> {
        let view = self.frame_view()?;
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("clear encoder"),
            });
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("clear pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color {
                        r: color[0],
                        g: color[1],
                        b: color[2],
                        a: color[3],
                    }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        self.gpu.queue.submit(Some(encoder.finish()));
        Ok(())
    }

    fn draw_instanced(
        &mut self,
        geometry: GeometryHandle,
        material: MaterialHandle,
        transforms: &[InstanceTransform],
    ) -> Result<()> {
        if transforms.is_empty() {
            return Ok(());
        }

        self.grow_instance_buffer(transforms.len());
        self.gpu
            .queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(transforms));

        let geometry = self
            .geometries
            .get(geometry.0)
            .ok_or_else(|| Error::Render(format!("unknown geometry handle {}", geometry.0)))?;
        let material = self
            .materials
            .get(material.0)
            .ok_or_else(|| Error::Render(format!("unknown material handle {}", material.0)))?;

        let view = self
            .frame
            .as_ref()
            .map(|f| &f.view)
            .ok_or_else(|| Error::Render("draw call outside begin_frame/end_frame".to_string()))?;

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("sprite encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Earlier passes this frame (the clear, other
                        // layers) must not be wiped.
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &material.bind_group, &[]);
            pass.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            pass.draw(0..geometry.vertex_count, 0..transforms.len() as u32);
        }
        self.gpu.queue.submit(Some(encoder.finish()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_covers_unit_square() {
        for vertex in &QUAD_VERTICES {
            assert!(vertex.position[0] >= 0.0 && vertex.position[0] <= 1.0);
            assert!(vertex.position[1] >= 0.0 && vertex.position[1] <= 1.0);
            // UVs mirror positions for the unit quad.
            assert_eq!(vertex.position, vertex.uv);
        }
    }

    #[test]
    fn instance_layout_is_three_vec3_columns() {
        assert_eq!(
            INSTANCE_LAYOUT.array_stride,
            std::mem::size_of::<InstanceTransform>() as wgpu::BufferAddress
        );
        assert_eq!(INSTANCE_LAYOUT.attributes.len(), 3);
        assert_eq!(INSTANCE_LAYOUT.step_mode, wgpu::VertexStepMode::Instance);
    }
}
