use std::collections::BTreeMap;
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::assets::{SceneTextures, TextureData};
use crate::config::TextConfig;
use crate::core::GpuContext;
use crate::error::{RenderError, SceneError};
use crate::scene::{self, GeometryId, Material, MaterialId, Materials, SceneGraphStore, Shading, Side, TextureSlot};
use crate::traits::{RenderFrame, SceneRenderer};
use crate::types::{CameraUniform, InstanceRaw, MaterialUniform, Vertex, SHADING_BASIC, SHADING_MATCAP};
use crate::ui::OverlayFrame;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const MIN_INSTANCE_CAPACITY: usize = 16;

/// Which pipeline a material draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    /// Outside faces, back faces culled.
    Front,
    /// Inside faces, front faces culled.
    Back,
    /// Edge lines, no culling.
    Wireframe,
}

impl PipelineKind {
    pub fn for_material(material: &Material) -> Self {
        if material.wireframe {
            PipelineKind::Wireframe
        } else {
            match material.side {
                Side::Front => PipelineKind::Front,
                Side::Back => PipelineKind::Back,
            }
        }
    }
}

pub fn material_uniform(material: &Material) -> MaterialUniform {
    let [r, g, b] = material.color.to_linear();
    MaterialUniform {
        color: [r, g, b, 1.0],
        shading: match material.shading {
            Shading::Basic => SHADING_BASIC,
            Shading::Matcap => SHADING_MATCAP,
        },
        use_texture: material.texture.is_some() as u32,
        _pad: [0; 2],
    }
}

/// Filtering for a material's texture. The matcap is smoothly shaded; the
/// pattern keeps hard texel edges, as does the 1x1 white fallback.
pub fn sampler_filter(slot: Option<TextureSlot>) -> wgpu::FilterMode {
    match slot {
        Some(TextureSlot::Matcap) => wgpu::FilterMode::Linear,
        Some(TextureSlot::Pattern) | None => wgpu::FilterMode::Nearest,
    }
}

/// Rejects textures the device cannot hold.
pub fn check_texture_size(label: &str, data: &TextureData, max_dimension: u32) -> Result<(), SceneError> {
    if data.width == 0 || data.height == 0 || data.width > max_dimension || data.height > max_dimension {
        return Err(SceneError::TextureSize {
            label: label.to_string(),
            width: data.width,
            height: data.height,
            max: max_dimension,
        });
    }
    Ok(())
}

/// Instance transforms grouped by what they draw with, in draw order.
pub fn build_batches(store: &SceneGraphStore) -> BTreeMap<(GeometryId, MaterialId), Vec<InstanceRaw>> {
    let mut batches: BTreeMap<(GeometryId, MaterialId), Vec<InstanceRaw>> = BTreeMap::new();
    for entry in store.entries() {
        batches
            .entry((entry.geometry, entry.material))
            .or_default()
            .push(InstanceRaw {
                model: entry.model_matrix().to_cols_array_2d(),
            });
    }
    batches
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    fill_indices: wgpu::Buffer,
    fill_count: u32,
    edge_indices: wgpu::Buffer,
    edge_count: u32,
}

impl GpuMesh {
    /// `None` for a mesh with no triangles; wgpu rejects empty buffer slices.
    fn new(device: &wgpu::Device, geometry: GeometryId, text: &TextConfig) -> Option<Self> {
        let mesh = scene::build_mesh(geometry, text);
        let label = format!("{:?}", geometry);
        if mesh.indices.is_empty() {
            log::warn!("mesh {} is empty and will not be drawn", label);
            return None;
        }
        let edges = mesh.edge_indices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertices", label)),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let fill_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", label)),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edge_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Edges", label)),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });
        log::debug!(
            "mesh {}: {} vertices, {} triangles, {} edges",
            label,
            mesh.vertices.len(),
            mesh.triangle_count(),
            edges.len() / 2
        );
        Some(Self {
            vertex_buffer,
            fill_indices,
            fill_count: mesh.indices.len() as u32,
            edge_indices,
            edge_count: edges.len() as u32,
        })
    }
}

struct InstanceBatch {
    buffer: wgpu::Buffer,
    capacity: usize,
    count: u32,
}

struct GpuMaterial {
    uniform: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Forward renderer: instanced meshes, depth buffer, egui overlay.
pub struct WgpuRenderer {
    gpu: GpuContext,
    depth_view: wgpu::TextureView,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    front_pipeline: wgpu::RenderPipeline,
    back_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
    meshes: BTreeMap<GeometryId, GpuMesh>,
    batches: BTreeMap<(GeometryId, MaterialId), InstanceBatch>,
    materials: Vec<GpuMaterial>,
    store_revision: Option<u64>,
    materials_revision: Option<u64>,
    egui_renderer: egui_wgpu::Renderer,
    overlay: Option<OverlayFrame>,
}

impl WgpuRenderer {
    pub async fn new(
        window: Arc<Window>,
        surface_size: (u32, u32),
        text: &TextConfig,
        textures: &SceneTextures,
        materials: &Materials,
    ) -> Result<Self, SceneError> {
        let gpu = GpuContext::new(window, surface_size.0, surface_size.1).await?;
        let device = gpu.device();

        let depth_view = Self::create_depth_view(device, gpu.size());

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Buffer"),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let camera_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &camera_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let material_layout = Self::create_material_layout(device);
        let gpu_materials = Self::create_materials(&gpu, &material_layout, textures, materials)?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_layout, &material_layout],
            push_constant_ranges: &[],
        });
        let format = gpu.format();
        let front_pipeline = Self::create_pipeline(device, &pipeline_layout, &shader, format, PipelineKind::Front);
        let back_pipeline = Self::create_pipeline(device, &pipeline_layout, &shader, format, PipelineKind::Back);
        let wireframe_pipeline =
            Self::create_pipeline(device, &pipeline_layout, &shader, format, PipelineKind::Wireframe);

        let meshes = GeometryId::ALL
            .into_iter()
            .filter_map(|id| GpuMesh::new(device, id, text).map(|mesh| (id, mesh)))
            .collect();

        let egui_renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        log::info!("renderer initialized: {}x{} {:?}", gpu.size().0, gpu.size().1, format);

        Ok(Self {
            gpu,
            depth_view,
            camera_buffer,
            camera_bind_group,
            front_pipeline,
            back_pipeline,
            wireframe_pipeline,
            meshes,
            batches: BTreeMap::new(),
            materials: gpu_materials,
            store_revision: None,
            materials_revision: None,
            egui_renderer,
            overlay: None,
        })
    }

    /// Overlay to composite on the next rendered frame.
    pub fn set_overlay(&mut self, overlay: OverlayFrame) {
        self.overlay = Some(overlay);
    }

    pub fn surface_size(&self) -> (u32, u32) {
        self.gpu.size()
    }

    fn create_depth_view(device: &wgpu::Device, (width, height): (u32, u32)) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    fn upload_texture(gpu: &GpuContext, label: &str, data: &TextureData) -> Result<wgpu::TextureView, SceneError> {
        check_texture_size(label, data, gpu.device().limits().max_texture_dimension_2d)?;
        let size = wgpu::Extent3d {
            width: data.width,
            height: data.height,
            depth_or_array_layers: 1,
        };
        let texture = gpu.device().create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        gpu.queue().write_texture(
            texture.as_image_copy(),
            &data.pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * data.width),
                rows_per_image: Some(data.height),
            },
            size,
        );
        Ok(texture.create_view(&wgpu::TextureViewDescriptor::default()))
    }

    fn create_materials(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        textures: &SceneTextures,
        materials: &Materials,
    ) -> Result<Vec<GpuMaterial>, SceneError> {
        let device = gpu.device();
        let matcap_view = Self::upload_texture(gpu, "Matcap Texture", &textures.matcap)?;
        let pattern_view = Self::upload_texture(gpu, "Pattern Texture", &textures.pattern)?;
        let white = TextureData {
            width: 1,
            height: 1,
            pixels: vec![255; 4],
        };
        let white_view = Self::upload_texture(gpu, "White Texture", &white)?;

        let make_sampler = |filter: wgpu::FilterMode| {
            device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(&format!("{:?} Sampler", filter)),
                mag_filter: filter,
                min_filter: filter,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            })
        };
        let linear = make_sampler(wgpu::FilterMode::Linear);
        let nearest = make_sampler(wgpu::FilterMode::Nearest);

        let gpu_materials = materials
            .iter()
            .map(|(id, material)| {
                let view = match material.texture {
                    Some(TextureSlot::Matcap) => &matcap_view,
                    Some(TextureSlot::Pattern) => &pattern_view,
                    None => &white_view,
                };
                let sampler = if sampler_filter(material.texture) == wgpu::FilterMode::Linear {
                    &linear
                } else {
                    &nearest
                };
                let uniform = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{:?} Material", id)),
                    contents: bytemuck::bytes_of(&material_uniform(material)),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                });
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{:?} Material Bind Group", id)),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: uniform.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                    ],
                });
                GpuMaterial { uniform, bind_group }
            })
            .collect();
        Ok(gpu_materials)
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        surface_format: wgpu::TextureFormat,
        kind: PipelineKind,
    ) -> wgpu::RenderPipeline {
        let (topology, cull_mode) = match kind {
            PipelineKind::Front => (wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Back)),
            PipelineKind::Back => (wgpu::PrimitiveTopology::TriangleList, Some(wgpu::Face::Front)),
            PipelineKind::Wireframe => (wgpu::PrimitiveTopology::LineList, None),
        };

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{:?} Pipeline", kind)),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout(), InstanceRaw::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn sync_instances(&mut self, store: &SceneGraphStore) {
        if self.store_revision == Some(store.revision()) {
            return;
        }
        let device = self.gpu.device();
        let queue = self.gpu.queue();
        let batches = build_batches(store);
        self.batches.retain(|key, _| batches.contains_key(key));

        for (key, instances) in batches {
            let needed = instances.len();
            let grow = self.batches.get(&key).map_or(true, |b| b.capacity < needed);
            if grow {
                let capacity = needed.next_power_of_two().max(MIN_INSTANCE_CAPACITY);
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(&format!("{:?}/{:?} Instances", key.0, key.1)),
                    size: (capacity * std::mem::size_of::<InstanceRaw>()) as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                self.batches.insert(key, InstanceBatch { buffer, capacity, count: 0 });
            }
            if let Some(batch) = self.batches.get_mut(&key) {
                queue.write_buffer(&batch.buffer, 0, bytemuck::cast_slice(&instances));
                batch.count = needed as u32;
            }
        }
        self.store_revision = Some(store.revision());
    }

    fn sync_materials(&mut self, materials: &Materials) {
        if self.materials_revision == Some(materials.revision()) {
            return;
        }
        for (id, material) in materials.iter() {
            if let Some(gpu_material) = self.materials.get(id.index()) {
                self.gpu.queue().write_buffer(
                    &gpu_material.uniform,
                    0,
                    bytemuck::bytes_of(&material_uniform(material)),
                );
            }
        }
        self.materials_revision = Some(materials.revision());
    }

    fn draw_scene(&self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView, materials: &Materials) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Scene Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        pass.set_bind_group(0, &self.camera_bind_group, &[]);

        for ((geometry, material_id), batch) in &self.batches {
            let (Some(mesh), Some(gpu_material)) = (self.meshes.get(geometry), self.materials.get(material_id.index()))
            else {
                continue;
            };
            if batch.count == 0 {
                continue;
            }
            let kind = PipelineKind::for_material(materials.get(*material_id));
            let (pipeline, indices, count) = match kind {
                PipelineKind::Front => (&self.front_pipeline, &mesh.fill_indices, mesh.fill_count),
                PipelineKind::Back => (&self.back_pipeline, &mesh.fill_indices, mesh.fill_count),
                PipelineKind::Wireframe => (&self.wireframe_pipeline, &mesh.edge_indices, mesh.edge_count),
            };
            if count == 0 {
                continue;
            }
            pass.set_pipeline(pipeline);
            pass.set_bind_group(1, &gpu_material.bind_group, &[]);
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_vertex_buffer(1, batch.buffer.slice(..));
            pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..count, 0, 0..batch.count);
        }
    }

    fn draw_overlay(&mut self, encoder: &mut wgpu::CommandEncoder, target: &wgpu::TextureView, overlay: &OverlayFrame) {
        let (width, height) = self.gpu.size();
        let screen = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [width, height],
            pixels_per_point: overlay.pixels_per_point,
        };
        self.egui_renderer
            .update_buffers(self.gpu.device(), self.gpu.queue(), encoder, &overlay.primitives, &screen);

        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            })
            .forget_lifetime();
        self.egui_renderer.render(&mut pass, &overlay.primitives, &screen);
    }

    fn upload_overlay_textures(&mut self, overlay: &OverlayFrame) {
        for (id, image_delta) in &overlay.textures_delta.set {
            self.egui_renderer
                .update_texture(self.gpu.device(), self.gpu.queue(), *id, image_delta);
        }
    }

    fn free_overlay_textures(&mut self, overlay: &OverlayFrame) {
        for id in &overlay.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

impl SceneRenderer for WgpuRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        self.sync_instances(frame.store);
        self.sync_materials(frame.materials);
        self.gpu
            .queue()
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[frame.camera.to_uniform()]));

        // Texture deltas arrive once; apply them even if this frame is dropped.
        let overlay = self.overlay.take();
        if let Some(overlay) = &overlay {
            self.upload_overlay_textures(overlay);
        }

        let output = match self.gpu.acquire() {
            Ok(output) => output,
            Err(err) => {
                let err = RenderError::from(err);
                if err == RenderError::SurfaceLost {
                    self.gpu.reconfigure();
                }
                if let Some(overlay) = &overlay {
                    self.free_overlay_textures(overlay);
                }
                return Err(err);
            }
        };
        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self.gpu.device().create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Scene Encoder"),
        });
        self.draw_scene(&mut encoder, &view, frame.materials);
        if let Some(overlay) = &overlay {
            self.draw_overlay(&mut encoder, &view, overlay);
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        output.present();

        if let Some(overlay) = &overlay {
            self.free_overlay_textures(overlay);
        }
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if self.gpu.resize(width, height) {
            self.depth_view = Self::create_depth_view(self.gpu.device(), self.gpu.size());
            log::debug!("surface resized to {}x{}", width, height);
        }
    }
}
