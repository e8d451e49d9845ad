use std::collections::HashMap;

use anyhow::Context;
use lustre::{Blend, Material, MeshId, Scene, Side, ViewerState};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::depth::DepthTexture;
use crate::gpu_mesh::{BufferExt, GpuMesh, Vertex};
use crate::msaa::{self, MsaaTarget};
use crate::uniforms::{GlobalsUniform, NodeUniform};

pub const GLOBALS_BINDING: u32 = 0;
pub const NODE_BINDING: u32 = 0;

/// Everything about a material that has to be baked into a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PipelineKey {
    pub side: Side,
    pub blend: Blend,
    pub depth_write: bool,
}

impl From<&Material> for PipelineKey {
    fn from(material: &Material) -> Self {
        Self {
            side: material.side(),
            blend: material.blend(),
            depth_write: material.depth_write(),
        }
    }
}

impl PipelineKey {
    fn cull_mode(&self) -> Option<wgpu::Face> {
        match self.side {
            Side::Front => Some(wgpu::Face::Back),
            Side::Back => Some(wgpu::Face::Front),
            Side::Double => None,
        }
    }

    fn blend_state(&self) -> wgpu::BlendState {
        match self.blend {
            Blend::Opaque => wgpu::BlendState::REPLACE,
            Blend::Alpha => wgpu::BlendState::ALPHA_BLENDING,
            Blend::Additive => wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::SrcAlpha,
                    dst_factor: wgpu::BlendFactor::One,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent::OVER,
            },
        }
    }
}

struct NodeSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One draw call, recorded whenever the scene changes.
struct Draw {
    mesh: MeshId,
    pipeline: PipelineKey,
    slot: usize,
}

pub struct Renderer {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    window: Window,
    depth: DepthTexture,
    msaa: MsaaTarget,
    shader: wgpu::ShaderModule,
    pipeline_layout: wgpu::PipelineLayout,
    pipelines: HashMap<PipelineKey, wgpu::RenderPipeline>,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    node_layout: wgpu::BindGroupLayout,
    node_slots: Vec<NodeSlot>,
    meshes: HashMap<MeshId, GpuMesh>,
    draws: Vec<Draw>,
    // Scene revision the draws and node uniforms were built from.
    revision: Option<u64>,
}

fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl Renderer {
    // Creating some of the wgpu types requires async code
    pub async fn new(window: Window) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // Backends::all => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            dx12_shader_compiler: Default::default(),
        });

        // # Safety
        //
        // The surface needs to live as long as the window that created it.
        // Renderer owns the window so this should be safe.
        let surface = unsafe { instance.create_surface(&window) }?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can draw to this window")?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    // WebGL doesn't support all of wgpu's features, so if
                    // we're building for the web we'll have to disable some.
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    },
                    label: None,
                },
                None, // Trace path
            )
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Colors are linear and the shader does no encoding, so prefer an
        // sRGB surface and let the hardware convert on write.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no texture formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let sample_count = msaa::sample_count(
            adapter.get_texture_format_features(config.format).flags,
            adapter
                .get_texture_format_features(DepthTexture::FORMAT)
                .flags,
        );
        log::info!("rendering with {sample_count} samples per pixel");
        let depth = DepthTexture::new(&device, config.width, config.height, sample_count);
        let msaa = MsaaTarget::new(
            &device,
            config.width,
            config.height,
            config.format,
            sample_count,
        );

        let globals_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Globals Buffer"),
            contents: bytemuck::bytes_of(&<GlobalsUniform as bytemuck::Zeroable>::zeroed()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        // The bind group is how we can identify this buffer within our shader.
        //
        // Ex:
        //     @group(0) @binding(0)
        //     var<uniform> globals: Globals;
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_layout_entry(GLOBALS_BINDING)],
            label: Some("globals_bind_group_layout"),
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: GLOBALS_BINDING,
                resource: globals_buffer.as_entire_binding(),
            }],
            label: Some("globals_bind_group"),
        });
        let node_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_layout_entry(NODE_BINDING)],
            label: Some("node_bind_group_layout"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[
                /* bind_group = 0 */ &globals_layout,
                /* bind_group = 1 */ &node_layout,
            ],
            push_constant_ranges: &[],
        });
        let shader = device.create_shader_module(wgpu::include_wgsl!("scene.wgsl"));

        Ok(Self {
            surface,
            device,
            queue,
            config,
            size,
            window,
            depth,
            msaa,
            shader,
            pipeline_layout,
            pipelines: HashMap::new(),
            globals_buffer,
            globals_bind_group,
            node_layout,
            node_slots: Vec::new(),
            meshes: HashMap::new(),
            draws: Vec::new(),
            revision: None,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> winit::dpi::PhysicalSize<u32> {
        self.size
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.size = new_size;
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth
                .resize(&self.device, new_size.width, new_size.height);
            self.msaa
                .resize(&self.device, new_size.width, new_size.height);
        }
    }

    fn create_pipeline(&self, key: PipelineKey) -> wgpu::RenderPipeline {
        log::debug!("creating pipeline for {key:?}");
        self.device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&self.pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: "vs_main",
                    buffers: &[Vertex::desc()],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(key.blend_state()),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: key.cull_mode(),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DepthTexture::FORMAT,
                    depth_write_enabled: key.depth_write,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState {
                    count: self.msaa.sample_count(),
                    mask: !0,
                    alpha_to_coverage_enabled: false,
                },
                multiview: None,
            })
    }

    fn create_slot(&self) -> NodeSlot {
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Node Buffer"),
            size: std::mem::size_of::<NodeUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.node_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: NODE_BINDING,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("node_bind_group"),
        });
        NodeSlot { buffer, bind_group }
    }

    /// Brings meshes, pipelines and node uniforms up to date with `scene`.
    ///
    /// Meshes never change once added, so they are uploaded only once.
    fn sync(&mut self, scene: &Scene) {
        if self.revision == Some(scene.revision()) {
            return;
        }

        for (id, mesh) in scene.meshes() {
            if !self.meshes.contains_key(&id) {
                log::debug!("uploading mesh with {} vertices", mesh.vertex_count());
                self.meshes.insert(id, GpuMesh::upload(&self.device, mesh));
            }
        }

        self.draws.clear();
        for (slot, node) in scene.draw_order().into_iter().enumerate() {
            let key = PipelineKey::from(&node.material);
            if !self.pipelines.contains_key(&key) {
                let pipeline = self.create_pipeline(key);
                self.pipelines.insert(key, pipeline);
            }
            if slot == self.node_slots.len() {
                let new_slot = self.create_slot();
                self.node_slots.push(new_slot);
            }
            let heights = self
                .meshes
                .get(&node.mesh)
                .map(|m| m.heights)
                .unwrap_or((0.0, 0.0));
            self.queue.write_buffer(
                &self.node_slots[slot].buffer,
                0,
                bytemuck::bytes_of(&NodeUniform::new(node, heights)),
            );
            self.draws.push(Draw {
                mesh: node.mesh,
                pipeline: key,
                slot,
            });
        }
        self.revision = Some(scene.revision());
    }

    pub fn render(&mut self, state: &ViewerState) -> Result<(), wgpu::SurfaceError> {
        let scene = state.scene();
        self.sync(scene);
        self.queue.write_buffer(
            &self.globals_buffer,
            0,
            bytemuck::bytes_of(&GlobalsUniform::new(state.camera(), scene)),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let background = scene.background();
        let (target, resolve_target) = self.msaa.attachment(&view);
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: background.r as f64,
                            g: background.g as f64,
                            b: background.b as f64,
                            a: 1.0,
                        }),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            for draw in &self.draws {
                let (Some(pipeline), Some(mesh)) =
                    (self.pipelines.get(&draw.pipeline), self.meshes.get(&draw.mesh))
                else {
                    continue;
                };
                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(1, &self.node_slots[draw.slot].bind_group, &[]);
                mesh.draw(&mut render_pass);
            }
        }

        // submit will accept anything that implements IntoIter
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lustre::{AppearanceMode, Color};

    #[test]
    fn ink_culls_front_faces() {
        let key = PipelineKey::from(&Material::ink(Color::BLACK));
        assert_eq!(Some(wgpu::Face::Front), key.cull_mode());
        assert!(key.depth_write);
    }

    #[test]
    fn glow_blends_without_depth_writes() {
        let spec = AppearanceMode::metallic(lustre::GOLD).spec();
        let key = PipelineKey::from(&spec.outer.unwrap());
        assert!(!key.depth_write);
        assert_eq!(wgpu::BlendState::ALPHA_BLENDING, key.blend_state());

        let base = PipelineKey::from(&spec.base);
        assert_eq!(None, base.cull_mode());
        assert_ne!(key, base);
    }
}
