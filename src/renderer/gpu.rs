use std::{collections::HashMap, mem, num::NonZeroU64, path::Path, sync::Arc};

use bitflags::bitflags;
use bytemuck::Zeroable;
use wgpu::util::DeviceExt;
use winit::{dpi::PhysicalSize, window::Window};

use super::environment_map::{capture_sky, upload_capture, CaptureLevel, EnvironmentCapture};
use super::primitives::cube_mesh;
use super::texture::Texture;
use super::{
    CameraUniform, Depth, EnvironmentBaker, FrameInputs, FrameOutcome, ProxyInstance,
    ReflectionMap, RenderBackend, SkyUniform, Vertex, WaterUniform,
};
use crate::error::RenderError;
use crate::scene::NodeSnapshot;
use crate::settings::RenderSettings;

const INITIAL_INSTANCE_CAPACITY: u32 = 16;

const PROXY_PALETTE: [[f32; 4]; 4] = [
    [0.80, 0.62, 0.42, 1.0],
    [0.55, 0.35, 0.25, 1.0],
    [0.30, 0.35, 0.45, 1.0],
    [0.85, 0.85, 0.80, 1.0],
];

bitflags! {
    /// Bind groups that must be rebuilt before the next draw.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct BindingsDirty: u8 {
        const GLOBALS = 1 << 0;
        const INSTANCES = 1 << 1;
    }
}

/// wgpu backend: a fullscreen sky and water pass followed by instanced node proxies.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth: Depth,
    exposure: f32,
    environment_resolution: u32,

    ocean_pipeline: wgpu::RenderPipeline,
    proxy_pipeline: wgpu::RenderPipeline,

    camera_buf: wgpu::Buffer,
    sky_buf: wgpu::Buffer,
    water_buf: wgpu::Buffer,
    last_sky: Option<SkyUniform>,

    globals_layout: wgpu::BindGroupLayout,
    globals_group: wgpu::BindGroup,
    normal_map: Texture,
    environment_sampler: wgpu::Sampler,
    fallback_environment: wgpu::TextureView,
    environments: HashMap<u64, wgpu::Texture>,
    bound_environment: Option<u64>,
    next_environment_id: u64,

    cube_vertices: wgpu::Buffer,
    cube_indices: wgpu::Buffer,
    cube_index_count: u32,

    instances_layout: wgpu::BindGroupLayout,
    instances_buf: wgpu::Buffer,
    instances_capacity: u32,
    instances_group: wgpu::BindGroup,
    instances_scratch: Vec<ProxyInstance>,

    dirty: BindingsDirty,
}

impl Renderer {
    pub async fn new(
        window: Arc<Window>,
        settings: &RenderSettings,
        normal_map_path: &Path,
    ) -> Result<Self, RenderError> {
        let size = window.inner_size();
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let surface = instance.create_surface(window)?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: settings.present_mode(&surface_caps.present_modes),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth = Depth::new(&device, size);

        let camera_buf = uniform_buffer(&device, "CameraBuffer", &CameraUniform::new());
        let sky_buf = uniform_buffer(&device, "SkyBuffer", &SkyUniform::zeroed());
        let water_buf = uniform_buffer(&device, "WaterBuffer", &WaterUniform::zeroed());

        let normal_map = match Texture::from_path(&device, &queue, normal_map_path) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!(
                    "Water normal map {:?} unavailable ({}). Using a flat normal.",
                    normal_map_path,
                    err
                );
                Texture::flat_normal(&device, &queue)
            }
        };

        let environment_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("EnvironmentSampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let fallback_capture = EnvironmentCapture {
            levels: vec![CaptureLevel {
                width: 1,
                height: 1,
                texels: vec![[0.5, 0.6, 0.7, 1.0]],
            }],
        };
        let fallback_environment = upload_capture(&device, &queue, &fallback_capture)
            .create_view(&wgpu::TextureViewDescriptor::default());

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("GlobalsLayout"),
            entries: &[
                uniform_entry::<CameraUniform>(0),
                uniform_entry::<SkyUniform>(1),
                uniform_entry::<WaterUniform>(2),
                texture_entry(3),
                sampler_entry(4),
                texture_entry(5),
                sampler_entry(6),
            ],
        });

        let instances_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("InstancesLayout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let instances_capacity = INITIAL_INSTANCE_CAPACITY;
        let instances_buf = instance_buffer(&device, instances_capacity);
        let instances_group = instance_group(&device, &instances_layout, &instances_buf);

        let (vertices, indices) = cube_mesh();
        let cube_vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ProxyVertices"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let cube_indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ProxyIndices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("OceanShader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("ocean.wgsl").into()),
        });

        let ocean_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("OceanPipelineLayout"),
            bind_group_layouts: &[&globals_layout],
            push_constant_ranges: &[],
        });
        let proxy_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("ProxyPipelineLayout"),
            bind_group_layouts: &[&globals_layout, &instances_layout],
            push_constant_ranges: &[],
        });

        let depth_state = wgpu::DepthStencilState {
            format: depth.format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        };
        let color_target = [Some(wgpu::ColorTargetState {
            format: config.format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        let ocean_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("OceanPipeline"),
            layout: Some(&ocean_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_fullscreen"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_ocean"),
                targets: &color_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(depth_state.clone()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let proxy_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ProxyPipeline"),
            layout: Some(&proxy_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_proxy"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_proxy"),
                targets: &color_target,
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                front_face: wgpu::FrontFace::Ccw,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
                strip_index_format: None,
            },
            depth_stencil: Some(depth_state),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let globals_group = globals_group(
            &device,
            &globals_layout,
            [&camera_buf, &sky_buf, &water_buf],
            &normal_map,
            &fallback_environment,
            &environment_sampler,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth,
            exposure: settings.exposure,
            environment_resolution: settings.environment_resolution,
            ocean_pipeline,
            proxy_pipeline,
            camera_buf,
            sky_buf,
            water_buf,
            last_sky: None,
            globals_layout,
            globals_group,
            normal_map,
            environment_sampler,
            fallback_environment,
            environments: HashMap::new(),
            bound_environment: None,
            next_environment_id: 1,
            cube_vertices,
            cube_indices,
            cube_index_count: indices.len() as u32,
            instances_layout,
            instances_buf,
            instances_capacity,
            instances_group,
            instances_scratch: Vec::with_capacity(INITIAL_INSTANCE_CAPACITY as usize),
            dirty: BindingsDirty::empty(),
        })
    }

    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.config.width, self.config.height)
    }

    fn write_uniforms(&mut self, frame: &FrameInputs<'_>) {
        let camera = CameraUniform::from_matrix(
            frame.camera.view_proj(),
            frame.camera.position(),
            self.exposure,
        );
        self.queue
            .write_buffer(&self.camera_buf, 0, bytemuck::bytes_of(&camera));

        if self.last_sky.as_ref() != Some(frame.sky) {
            self.queue
                .write_buffer(&self.sky_buf, 0, bytemuck::bytes_of(frame.sky));
            self.last_sky = Some(*frame.sky);
        }

        self.queue
            .write_buffer(&self.water_buf, 0, bytemuck::bytes_of(&frame.water));

        let wanted = frame.environment.map(ReflectionMap::id);
        if wanted != self.bound_environment {
            self.bound_environment = wanted;
            self.dirty |= BindingsDirty::GLOBALS;
        }
    }

    fn write_instances(&mut self, nodes: &[NodeSnapshot]) {
        self.instances_scratch.clear();
        self.instances_scratch.extend(nodes.iter().map(|node| {
            let color = PROXY_PALETTE[node.id.0 as usize % PROXY_PALETTE.len()];
            ProxyInstance::new(
                node.transform.matrix() * node.model.bounds.unit_cube_matrix(),
                color,
            )
        }));

        let required = self.instances_scratch.len() as u32;
        if required > self.instances_capacity {
            let new_capacity = required.max(self.instances_capacity * 2);
            log::info!(
                "Growing proxy instance buffer: {} -> {}",
                self.instances_capacity,
                new_capacity
            );
            self.instances_buf = instance_buffer(&self.device, new_capacity);
            self.instances_capacity = new_capacity;
            self.dirty |= BindingsDirty::INSTANCES;
        }

        if !self.instances_scratch.is_empty() {
            self.queue.write_buffer(
                &self.instances_buf,
                0,
                bytemuck::cast_slice(&self.instances_scratch),
            );
        }
    }

    fn rebuild_dirty_bindings(&mut self) {
        if self.dirty.contains(BindingsDirty::GLOBALS) {
            let bound_view = self
                .bound_environment
                .and_then(|id| self.environments.get(&id))
                .map(|texture| texture.create_view(&wgpu::TextureViewDescriptor::default()));
            let environment = bound_view.as_ref().unwrap_or(&self.fallback_environment);
            self.globals_group = globals_group(
                &self.device,
                &self.globals_layout,
                [&self.camera_buf, &self.sky_buf, &self.water_buf],
                &self.normal_map,
                environment,
                &self.environment_sampler,
            );
        }
        if self.dirty.contains(BindingsDirty::INSTANCES) {
            self.instances_group =
                instance_group(&self.device, &self.instances_layout, &self.instances_buf);
        }
        self.dirty = BindingsDirty::empty();
    }
}

impl EnvironmentBaker for Renderer {
    fn bake_environment(&mut self, sky: &SkyUniform) -> ReflectionMap {
        let capture = capture_sky(sky, self.environment_resolution);
        let texture = upload_capture(&self.device, &self.queue, &capture);

        let id = self.next_environment_id;
        self.next_environment_id += 1;
        let map = ReflectionMap::new(id, capture.width(), capture.levels.len() as u32);
        log::debug!(
            "Baked environment {} ({}x{}, {} mips)",
            id,
            capture.width(),
            capture.height(),
            map.mip_levels()
        );
        self.environments.insert(id, texture);
        map
    }

    fn release_environment(&mut self, map: ReflectionMap) {
        match self.environments.remove(&map.id()) {
            Some(texture) => texture.destroy(),
            None => log::warn!("Released unknown environment map {}", map.id()),
        }
        if self.bound_environment == Some(map.id()) {
            self.bound_environment = None;
            self.dirty |= BindingsDirty::GLOBALS;
        }
    }
}

impl RenderBackend for Renderer {
    fn submit(&mut self, frame: &FrameInputs<'_>) -> Result<FrameOutcome, RenderError> {
        let output = match self.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(FrameOutcome::Skipped);
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Surface acquire timed out; skipping frame");
                return Ok(FrameOutcome::Skipped);
            }
            Err(err) => return Err(err.into()),
        };

        self.write_uniforms(frame);
        self.write_instances(frame.nodes);
        self.rebuild_dirty_bindings();

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("FrameEncoder"),
            });

        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("OceanPass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            rpass.set_bind_group(0, &self.globals_group, &[]);

            rpass.set_pipeline(&self.ocean_pipeline);
            rpass.draw(0..3, 0..1);

            let instance_count = self.instances_scratch.len() as u32;
            if instance_count > 0 {
                rpass.set_pipeline(&self.proxy_pipeline);
                rpass.set_bind_group(1, &self.instances_group, &[]);
                rpass.set_vertex_buffer(0, self.cube_vertices.slice(..));
                rpass.set_index_buffer(self.cube_indices.slice(..), wgpu::IndexFormat::Uint16);
                rpass.draw_indexed(0..self.cube_index_count, 0, 0..instance_count);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        output.present();
        Ok(FrameOutcome::Presented)
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth = Depth::new(&self.device, PhysicalSize::new(width, height));
    }
}

fn uniform_buffer<T: bytemuck::Pod>(device: &wgpu::Device, label: &str, value: &T) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(value),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn instance_buffer(device: &wgpu::Device, capacity: u32) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("ProxyInstances"),
        size: (capacity as usize * mem::size_of::<ProxyInstance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn instance_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("InstancesGroup"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}

fn globals_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    [camera, sky, water]: [&wgpu::Buffer; 3],
    normal_map: &Texture,
    environment: &wgpu::TextureView,
    environment_sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("GlobalsGroup"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: camera.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: sky.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: water.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::TextureView(&normal_map.view),
            },
            wgpu::BindGroupEntry {
                binding: 4,
                resource: wgpu::BindingResource::Sampler(&normal_map.sampler),
            },
            wgpu::BindGroupEntry {
                binding: 5,
                resource: wgpu::BindingResource::TextureView(environment),
            },
            wgpu::BindGroupEntry {
                binding: 6,
                resource: wgpu::BindingResource::Sampler(environment_sampler),
            },
        ],
    })
}

fn uniform_entry<T>(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: NonZeroU64::new(mem::size_of::<T>() as u64),
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

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}
