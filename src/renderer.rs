use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::loaders::StationModel;
use crate::nav::{ObjectId, SceneSink};
use crate::types::{LineVertex, MeshVertex, ModelUniform};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Background gray of the station scene (0x808080), expressed in linear
/// terms for the srgb surface.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.216,
    g: 0.216,
    b: 0.216,
    a: 1.0,
};

/// Error line shown when both dropdowns name the same location.
pub const SAME_ENDPOINT_MESSAGE: &str = "Please select different start and end points";

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Dropdown and error-line state shared with the egui closure.
pub struct NavPanelState {
    pub start: String,
    pub end: String,
    pub error: Option<String>,
    pub request: Option<(String, String)>,
}

enum Geometry {
    Mesh {
        vertices: wgpu::Buffer,
        indices: wgpu::Buffer,
        index_count: u32,
    },
    Line {
        vertices: wgpu::Buffer,
        vertex_count: u32,
    },
}

struct SceneObject {
    geometry: Geometry,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    position: Vec3,
    color: [f32; 3],
    unlit: bool,
}

/// wgpu viewer for the station scene, drawing lit meshes (station model,
/// marker sphere) and flat route polylines under the egui overlay. Scene
/// content is managed through the [`SceneSink`] impl.
pub struct Viewer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    size: winit::dpi::PhysicalSize<u32>,
    mesh_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_bind_group_layout: wgpu::BindGroupLayout,
    depth_view: wgpu::TextureView,
    objects: HashMap<ObjectId, SceneObject>,
    next_object_id: u64,
    station_name: String,
    location_labels: Vec<String>,
    panel: Arc<Mutex<NavPanelState>>,
    show_ui: bool,
    egui_renderer: egui_wgpu::Renderer,
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,
}

impl Viewer {
    pub async fn new(
        window: Arc<Window>,
        station_name: String,
        location_labels: Vec<String>,
        show_ui: bool,
    ) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size);
        surface.configure(&device, &surface_config);

        let camera_buffer = Self::create_camera_buffer(&device, size);

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("model_bind_group_layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let mesh_pipeline = Self::create_pipeline(
            &device,
            &pipeline_layout,
            surface_config.format,
            include_str!("station.wgsl"),
            "Station Pipeline",
            MeshVertex::layout(),
            wgpu::PrimitiveTopology::TriangleList,
        );

        let line_pipeline = Self::create_pipeline(
            &device,
            &pipeline_layout,
            surface_config.format,
            include_str!("path.wgsl"),
            "Path Pipeline",
            LineVertex::layout(),
            wgpu::PrimitiveTopology::LineStrip,
        );

        let depth_view = Self::create_depth_texture(&device, size);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(
            &device,
            surface_config.format,
            egui_wgpu::RendererOptions::default(),
        );

        let panel = NavPanelState {
            start: location_labels.first().cloned().unwrap_or_default(),
            end: location_labels.last().cloned().unwrap_or_default(),
            error: None,
            request: None,
        };

        println!(
            "Viewer initialized: station {:?}, {} locations",
            station_name,
            location_labels.len()
        );

        Ok(Self {
            device,
            queue,
            surface,
            surface_config,
            size,
            mesh_pipeline,
            line_pipeline,
            camera_buffer,
            camera_bind_group,
            model_bind_group_layout,
            depth_view,
            objects: HashMap::new(),
            next_object_id: 0,
            station_name,
            location_labels,
            panel: Arc::new(Mutex::new(panel)),
            show_ui,
            egui_renderer,
            egui_state,
            egui_ctx,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| "Failed to find appropriate adapter".into())
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| e.into())
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::SurfaceConfiguration {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);

        wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        }
    }

    fn create_camera_buffer(
        device: &wgpu::Device,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::Buffer {
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let camera_uniform = Camera::new().to_uniform(aspect);

        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[camera_uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    fn create_depth_texture(
        device: &wgpu::Device,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
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

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        surface_format: wgpu::TextureFormat,
        shader_source: &str,
        label: &str,
        vertex_layout: wgpu::VertexBufferLayout<'_>,
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader_source.into()),
        });

        // The route line reads depth but never writes it, so it cannot carve
        // gaps into geometry drawn after it.
        let depth_write = topology == wgpu::PrimitiveTopology::TriangleList;

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[vertex_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
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
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: depth_write,
                depth_compare: wgpu::CompareFunction::LessEqual,
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

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth_view = Self::create_depth_texture(&self.device, new_size);
    }

    /// Upload a loaded station model as a static scene object.
    pub fn add_model(&mut self, model: &StationModel) -> ObjectId {
        self.insert_mesh(
            &model.vertices,
            &model.indices,
            Vec3::ZERO,
            [1.0, 1.0, 1.0],
            false,
        )
    }

    fn insert_mesh(
        &mut self,
        vertices: &[MeshVertex],
        indices: &[u32],
        position: Vec3,
        color: [f32; 3],
        unlit: bool,
    ) -> ObjectId {
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Vertices"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Mesh Indices"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let geometry = Geometry::Mesh {
            vertices: vertex_buffer,
            indices: index_buffer,
            index_count: indices.len() as u32,
        };
        self.insert_object(geometry, position, color, unlit)
    }

    fn insert_object(
        &mut self,
        geometry: Geometry,
        position: Vec3,
        color: [f32; 3],
        unlit: bool,
    ) -> ObjectId {
        let uniform = ModelUniform::new(Mat4::from_translation(position), color, unlit);
        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Model Uniform"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("model_bind_group"),
        });

        self.next_object_id += 1;
        let id = ObjectId(self.next_object_id);
        self.objects.insert(
            id,
            SceneObject {
                geometry,
                uniform_buffer,
                bind_group,
                position,
                color,
                unlit,
            },
        );
        id
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Take the pending "Show Path" request, if the user submitted one.
    pub fn take_path_request(&self) -> Option<(String, String)> {
        self.panel.lock().unwrap().request.take()
    }

    /// Surface a resolution failure on the panel's error line.
    pub fn set_nav_error(&self, message: String) {
        self.panel.lock().unwrap().error = Some(message);
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        window: &Window,
        fps: f32,
        marker: Option<Vec3>,
    ) -> std::result::Result<(), wgpu::SurfaceError> {
        let aspect = self.size.width.max(1) as f32 / self.size.height.max(1) as f32;
        let camera_uniform = camera.to_uniform(aspect);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
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

            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);

            render_pass.set_pipeline(&self.mesh_pipeline);
            for object in self.objects.values() {
                if let Geometry::Mesh {
                    vertices,
                    indices,
                    index_count,
                } = &object.geometry
                {
                    render_pass.set_bind_group(1, &object.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, vertices.slice(..));
                    render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    render_pass.draw_indexed(0..*index_count, 0, 0..1);
                }
            }

            render_pass.set_pipeline(&self.line_pipeline);
            for object in self.objects.values() {
                if let Geometry::Line {
                    vertices,
                    vertex_count,
                } = &object.geometry
                {
                    render_pass.set_bind_group(1, &object.bind_group, &[]);
                    render_pass.set_vertex_buffer(0, vertices.slice(..));
                    render_pass.draw(0..*vertex_count, 0..1);
                }
            }
        }

        let raw_input = self.egui_state.take_egui_input(window);
        let panel = self.panel.clone();
        let labels = self.location_labels.clone();
        let station_name = self.station_name.clone();
        let object_count = self.object_count();
        let resolution = (self.size.width, self.size.height);
        let show_ui = self.show_ui;
        let eye = camera.eye();

        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            if !show_ui {
                return;
            }

            egui::Window::new("Navigation")
                .title_bar(true)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .default_width(220.0)
                .show(ctx, |ui| {
                    let mut panel = panel.lock().unwrap();

                    ui.label("Your Location:");
                    egui::ComboBox::from_id_salt("start_location")
                        .selected_text(panel.start.clone())
                        .show_ui(ui, |ui| {
                            for name in &labels {
                                ui.selectable_value(&mut panel.start, name.clone(), name);
                            }
                        });

                    ui.add_space(5.0);
                    ui.label("Destination:");
                    egui::ComboBox::from_id_salt("end_location")
                        .selected_text(panel.end.clone())
                        .show_ui(ui, |ui| {
                            for name in &labels {
                                ui.selectable_value(&mut panel.end, name.clone(), name);
                            }
                        });

                    ui.add_space(10.0);
                    if ui.button("Show Path").clicked() {
                        if panel.start == panel.end {
                            panel.error = Some(SAME_ENDPOINT_MESSAGE.to_string());
                        } else {
                            let pair = (panel.start.clone(), panel.end.clone());
                            panel.request = Some(pair);
                            panel.error = None;
                        }
                    }

                    if let Some(error) = panel.error.clone() {
                        ui.add_space(5.0);
                        ui.colored_label(egui::Color32::from_rgb(255, 120, 120), error);
                    }
                });

            egui::Window::new("Viewer")
                .title_bar(true)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 230.0))
                .default_width(220.0)
                .show(ctx, |ui| {
                    ui.heading(
                        egui::RichText::new(format!("{:.0} FPS", fps))
                            .size(28.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );

                    let frame_time_ms = if fps > 0.0 { 1000.0 / fps } else { 0.0 };
                    ui.label(
                        egui::RichText::new(format!("{:.2} ms", frame_time_ms))
                            .size(12.0)
                            .color(egui::Color32::GRAY),
                    );

                    ui.add_space(5.0);
                    ui.separator();
                    ui.add_space(5.0);

                    ui.monospace(format!("Station: {}", station_name));
                    ui.monospace(format!("Objects: {}", object_count));
                    ui.monospace(format!("Eye: ({:.1}, {:.1}, {:.1})", eye.x, eye.y, eye.z));
                    match marker {
                        Some(pos) => ui.monospace(format!(
                            "Marker: ({:.2}, {:.2}, {:.2})",
                            pos.x, pos.y, pos.z
                        )),
                        None => ui.monospace("Marker: idle".to_string()),
                    };
                    ui.monospace(format!("Resolution: {}x{}", resolution.0, resolution.1));
                });
        });

        self.egui_state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .egui_ctx
            .tessellate(full_output.shapes, self.egui_ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.egui_renderer
                .update_texture(&self.device, &self.queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.size.width, self.size.height],
            pixels_per_point: window.scale_factor() as f32,
        };

        self.egui_renderer.update_buffers(
            &self.device,
            &self.queue,
            &mut encoder,
            &tris,
            &screen_descriptor,
        );

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
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
            });

            // SAFETY: The render pass lifetime is actually tied to the encoder,
            // but egui-wgpu requires 'static. This is safe because we drop the
            // render pass before using the encoder again.
            let render_pass_static = unsafe {
                std::mem::transmute::<&mut wgpu::RenderPass<'_>, &mut wgpu::RenderPass<'static>>(
                    &mut render_pass,
                )
            };

            self.egui_renderer
                .render(render_pass_static, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.egui_state.on_window_event(window, event).consumed
    }
}

impl SceneSink for Viewer {
    fn add_polyline(&mut self, points: &[Vec3], color: [f32; 3]) -> ObjectId {
        let vertices: Vec<LineVertex> = points
            .iter()
            .map(|p| LineVertex {
                position: p.to_array(),
                color,
            })
            .collect();

        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Path Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let geometry = Geometry::Line {
            vertices: vertex_buffer,
            vertex_count: vertices.len() as u32,
        };
        self.insert_object(geometry, Vec3::ZERO, [1.0, 1.0, 1.0], true)
    }

    fn add_marker(&mut self, position: Vec3, radius: f32, color: [f32; 3]) -> ObjectId {
        let (vertices, indices) = sphere_mesh(radius, color);
        self.insert_mesh(&vertices, &indices, position, [1.0, 1.0, 1.0], true)
    }

    fn set_position(&mut self, id: ObjectId, position: Vec3) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.position = position;
            let uniform = ModelUniform::new(
                Mat4::from_translation(position),
                object.color,
                object.unlit,
            );
            self.queue
                .write_buffer(&object.uniform_buffer, 0, bytemuck::cast_slice(&[uniform]));
        }
    }

    fn remove(&mut self, id: ObjectId) {
        self.objects.remove(&id);
    }
}

/// UV sphere for the walking marker.
fn sphere_mesh(radius: f32, color: [f32; 3]) -> (Vec<MeshVertex>, Vec<u32>) {
    const STACKS: u32 = 16;
    const SECTORS: u32 = 24;

    let mut vertices = Vec::new();
    for stack in 0..=STACKS {
        let phi = std::f32::consts::PI * stack as f32 / STACKS as f32;
        let y = phi.cos();
        let ring = phi.sin();
        for sector in 0..=SECTORS {
            let theta = std::f32::consts::TAU * sector as f32 / SECTORS as f32;
            let normal = Vec3::new(ring * theta.cos(), y, ring * theta.sin());
            vertices.push(MeshVertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                color,
            });
        }
    }

    let stride = SECTORS + 1;
    let mut indices = Vec::new();
    for stack in 0..STACKS {
        for sector in 0..SECTORS {
            let a = stack * stride + sector;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_mesh_is_a_closed_triangle_list() {
        let (vertices, indices) = sphere_mesh(0.5, [1.0, 0.0, 0.0]);

        assert!(!vertices.is_empty());
        assert_eq!(indices.len() % 3, 0);
        let max_index = *indices.iter().max().unwrap() as usize;
        assert!(max_index < vertices.len());
    }

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let radius = 0.5;
        let (vertices, _) = sphere_mesh(radius, [1.0, 0.0, 0.0]);
        for v in &vertices {
            let distance = Vec3::from_array(v.position).length();
            assert!((distance - radius).abs() < 1e-4);
        }
    }
}
