use crate::mesh::{Vertex, cube_mesh};
use crate::shaders::{self, ShaderSet};
use crate::texture::GpuTexture;
use crate::uniforms::{self, CameraUniform, InstanceData, LightingUniform, OutlineUniform};
use glam::Mat4;
use lumen_render::{FrameUniforms, SceneLayout};
use wgpu::util::DeviceExt;

pub const DEPTH_STENCIL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24PlusStencil8;

/// Stencil value written under every lit cube.
const OUTLINE_STENCIL_REF: u32 = 1;

/// Diffuse and specular maps shared by all lit cubes.
pub struct MaterialTextures {
    pub diffuse: GpuTexture,
    pub specular: GpuTexture,
}

/// Instance buffer holding a fixed set of model matrices.
struct InstanceBatch {
    buffer: wgpu::Buffer,
    count: u32,
}

impl InstanceBatch {
    fn new(device: &wgpu::Device, label: &str, models: &[Mat4]) -> Self {
        let data: Vec<InstanceData> = models.iter().map(InstanceData::from).collect();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(&data),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            buffer,
            count: data.len() as u32,
        }
    }
}

/// Lit cubes: depth tested, and every covered pixel gets the outline stencil value.
fn lit_depth_stencil() -> wgpu::DepthStencilState {
    let face = wgpu::StencilFaceState {
        compare: wgpu::CompareFunction::Always,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Keep,
        pass_op: wgpu::StencilOperation::Replace,
    };
    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState {
            front: face,
            back: face,
            read_mask: 0xFF,
            write_mask: 0xFF,
        },
        bias: Default::default(),
    }
}

/// Outlines: drawn over everything, but only where no lit cube wrote the stencil.
fn outline_depth_stencil() -> wgpu::DepthStencilState {
    let face = wgpu::StencilFaceState {
        compare: wgpu::CompareFunction::NotEqual,
        fail_op: wgpu::StencilOperation::Keep,
        depth_fail_op: wgpu::StencilOperation::Keep,
        pass_op: wgpu::StencilOperation::Keep,
    };
    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: false,
        depth_compare: wgpu::CompareFunction::Always,
        stencil: wgpu::StencilState {
            front: face,
            back: face,
            read_mask: 0xFF,
            write_mask: 0x00,
        },
        bias: Default::default(),
    }
}

/// Light markers: plain depth testing, stencil untouched.
fn marker_depth_stencil() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_STENCIL_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: Default::default(),
    }
}

struct PipelineDesc<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    source: &'a str,
    vs_entry: &'a str,
    fs_entry: &'a str,
    depth_stencil: wgpu::DepthStencilState,
}

fn create_pipeline(
    device: &wgpu::Device,
    surface_format: wgpu::TextureFormat,
    desc: PipelineDesc<'_>,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(desc.label),
        source: wgpu::ShaderSource::Wgsl(desc.source.into()),
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(desc.layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(desc.vs_entry),
            compilation_options: Default::default(),
            buffers: &[
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &Vertex::ATTRIBUTES,
                },
                wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<InstanceData>() as u64,
                    step_mode: wgpu::VertexStepMode::Instance,
                    attributes: &wgpu::vertex_attr_array![
                        3 => Float32x4,
                        4 => Float32x4,
                        5 => Float32x4,
                        6 => Float32x4,
                    ],
                },
            ],
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(desc.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(desc.depth_stencil),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

fn texture_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: wgpu::TextureViewDimension::D2,
            multisampled: false,
        },
        count: None,
    }
}

/// wgpu renderer for the cube scene.
///
/// Each frame is one render pass: lit cubes (marking the stencil), then
/// enlarged outline cubes where the stencil is unmarked, then the light
/// markers.
pub struct WgpuRenderer {
    lit_pipeline: wgpu::RenderPipeline,
    outline_pipeline: wgpu::RenderPipeline,
    marker_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    lighting_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
    material: MaterialTextures,
    cube_vertex_buffer: wgpu::Buffer,
    cube_index_buffer: wgpu::Buffer,
    cube_index_count: u32,
    cubes: InstanceBatch,
    outlines: InstanceBatch,
    markers: InstanceBatch,
    depth_stencil: wgpu::TextureView,
    clear_color: wgpu::Color,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        shaders: &ShaderSet,
        scene: &SceneLayout,
        material: MaterialTextures,
    ) -> Self {
        // Per-frame uniforms
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform::new(Mat4::IDENTITY, Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let lighting_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("lighting_buffer"),
            size: std::mem::size_of::<LightingUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let outline_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("outline_buffer"),
            contents: bytemuck::bytes_of(&OutlineUniform {
                color: scene.outline_color,
            }),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
                uniform_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lighting_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: outline_buffer.as_entire_binding(),
                },
            ],
        });

        // Material textures
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                texture_entry(0),
                texture_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(material.diffuse.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(material.specular.view()),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(material.diffuse.sampler()),
                },
            ],
        });

        let lit_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("lit_pipeline_layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let flat_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flat_pipeline_layout"),
            bind_group_layouts: &[&frame_layout],
            push_constant_ranges: &[],
        });

        let lit_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "lit_pipeline",
                layout: &lit_layout,
                source: &shaders.basic,
                vs_entry: shaders::BASIC_VS,
                fs_entry: shaders::BASIC_FS,
                depth_stencil: lit_depth_stencil(),
            },
        );
        let outline_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "outline_pipeline",
                layout: &flat_layout,
                source: &shaders.outline,
                vs_entry: shaders::OUTLINE_VS,
                fs_entry: shaders::OUTLINE_FS,
                depth_stencil: outline_depth_stencil(),
            },
        );
        let marker_pipeline = create_pipeline(
            device,
            surface_format,
            PipelineDesc {
                label: "marker_pipeline",
                layout: &flat_layout,
                source: &shaders.light,
                vs_entry: shaders::LIGHT_VS,
                fs_entry: shaders::LIGHT_FS,
                depth_stencil: marker_depth_stencil(),
            },
        );

        // Cube mesh
        let (cube_verts, cube_indices) = cube_mesh();
        let cube_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_vertex_buffer"),
            contents: bytemuck::cast_slice(&cube_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("cube_index_buffer"),
            contents: bytemuck::cast_slice(&cube_indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let cube_index_count = cube_indices.len() as u32;

        // The layout is fixed, so instance data is uploaded once.
        let cubes = InstanceBatch::new(device, "cube_instances", &scene.cube_models());
        let outlines = InstanceBatch::new(device, "outline_instances", &scene.outline_models());
        let markers = InstanceBatch::new(device, "marker_instances", &scene.light_marker_models());

        let depth_stencil = Self::create_depth_stencil(device, width, height);
        let [r, g, b, a] = scene.clear_color;

        tracing::debug!(
            cubes = cubes.count,
            markers = markers.count,
            "renderer ready"
        );

        Self {
            lit_pipeline,
            outline_pipeline,
            marker_pipeline,
            camera_buffer,
            lighting_buffer,
            frame_bind_group,
            material_bind_group,
            material,
            cube_vertex_buffer,
            cube_index_buffer,
            cube_index_count,
            cubes,
            outlines,
            markers,
            depth_stencil,
            clear_color: wgpu::Color { r, g, b, a },
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_stencil = Self::create_depth_stencil(device, width, height);
    }

    /// Upload this frame's uniforms and draw the scene into `view`.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
        frame: &FrameUniforms,
    ) {
        let (camera, lighting) = uniforms::frame_uniforms(frame);
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&camera));
        queue.write_buffer(&self.lighting_buffer, 0, bytemuck::bytes_of(&lighting));

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_stencil,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(0),
                        store: wgpu::StoreOp::Store,
                    }),
                }),
                ..Default::default()
            });

            pass.set_stencil_reference(OUTLINE_STENCIL_REF);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_vertex_buffer(0, self.cube_vertex_buffer.slice(..));
            pass.set_index_buffer(self.cube_index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            // Lit cubes
            pass.set_pipeline(&self.lit_pipeline);
            pass.set_bind_group(1, &self.material_bind_group, &[]);
            self.draw_batch(&mut pass, &self.cubes);

            // Outlines
            pass.set_pipeline(&self.outline_pipeline);
            self.draw_batch(&mut pass, &self.outlines);

            // Light markers
            pass.set_pipeline(&self.marker_pipeline);
            self.draw_batch(&mut pass, &self.markers);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn draw_batch(&self, pass: &mut wgpu::RenderPass<'_>, batch: &InstanceBatch) {
        if batch.count == 0 {
            return;
        }
        pass.set_vertex_buffer(1, batch.buffer.slice(..));
        pass.draw_indexed(0..self.cube_index_count, 0, 0..batch.count);
    }

    /// Free the material textures.
    pub fn release(self) {
        let MaterialTextures { diffuse, specular } = self.material;
        diffuse.release();
        specular.release();
    }

    fn create_depth_stencil(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_stencil_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_STENCIL_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}
