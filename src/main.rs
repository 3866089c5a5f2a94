use std::sync::Arc;
use std::time::Instant;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use station_nav::camera::Camera;
use station_nav::cli::Cli;
use station_nav::loaders::load_station_model;
use station_nav::nav::{NavigationController, StationMap};
use station_nav::renderer::Viewer;

// === Constants ===

const FPS_UPDATE_INTERVAL: f32 = 1.0;
const INITIAL_WINDOW_WIDTH: u32 = 800;
const INITIAL_WINDOW_HEIGHT: u32 = 600;

// === Type Aliases ===

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

// === Application ===

struct App {
    cli: Cli,
    window: Option<Arc<Window>>,
    viewer: Option<Viewer>,
    controller: Option<NavigationController>,
    camera: Camera,
    mouse_down: bool,
    last_cursor: Option<(f64, f64)>,
    last_frame_time: Instant,
    frame_count: u32,
    fps: f32,
    fps_update_timer: f32,
}

impl App {
    fn new(cli: Cli) -> Self {
        Self {
            cli,
            window: None,
            viewer: None,
            controller: None,
            camera: Camera::new(),
            mouse_down: false,
            last_cursor: None,
            last_frame_time: Instant::now(),
            frame_count: 0,
            fps: 0.0,
            fps_update_timer: 0.0,
        }
    }

    fn load_station(&self) -> anyhow::Result<StationMap> {
        match &self.cli.station {
            Some(path) => StationMap::from_path(path),
            None => Ok(StationMap::bundled()),
        }
    }

    fn update_fps(&mut self, delta: f32) {
        self.frame_count += 1;
        self.fps_update_timer += delta;

        if self.fps_update_timer >= FPS_UPDATE_INTERVAL {
            self.fps = self.frame_count as f32 / self.fps_update_timer;
            self.frame_count = 0;
            self.fps_update_timer = 0.0;
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title("Station Navigator")
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            let station = match self.load_station() {
                Ok(station) => station,
                Err(e) => {
                    eprintln!("Failed to load station: {:#}", e);
                    event_loop.exit();
                    return;
                }
            };
            let (locations, routes) = match station.build() {
                Ok(parts) => parts,
                Err(e) => {
                    eprintln!("Invalid station description: {:#}", e);
                    event_loop.exit();
                    return;
                }
            };
            let controller = match self.cli.step {
                Some(step) => NavigationController::with_step_size(locations, routes, step),
                None => NavigationController::new(locations, routes),
            };
            let labels: Vec<String> = controller.location_names().map(str::to_owned).collect();

            let mut viewer = match pollster::block_on(Viewer::new(
                window.clone(),
                station.name.clone(),
                labels,
                !self.cli.no_ui,
            )) {
                Ok(v) => v,
                Err(e) => {
                    eprintln!("Failed to initialize viewer: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            if let Some(path) = &self.cli.model {
                match load_station_model(path) {
                    Ok(model) => {
                        viewer.add_model(&model);
                    }
                    Err(e) => log::warn!("continuing without a station model: {:#}", e),
                }
            }

            self.window = Some(window);
            self.viewer = Some(viewer);
            self.controller = Some(controller);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        // Let egui handle the event first
        if let (Some(viewer), Some(window)) = (&mut self.viewer, &self.window) {
            if viewer.handle_event(window, &event) {
                return; // egui consumed the event
            }
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput { event, .. } => self.camera.process_keyboard(&event),
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.mouse_down = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some((last_x, last_y)) = self.last_cursor {
                    if self.mouse_down {
                        let dx = (position.x - last_x) as f32;
                        let dy = (position.y - last_y) as f32;
                        self.camera.drag(dx, dy);
                    }
                }
                self.last_cursor = Some((position.x, position.y));
            }
            WindowEvent::MouseWheel { delta, .. } => self.camera.process_scroll(&delta),
            WindowEvent::Resized(new_size) => {
                if let Some(viewer) = &mut self.viewer {
                    viewer.resize(new_size);
                }
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta = now.duration_since(self.last_frame_time).as_secs_f32();
                self.last_frame_time = now;

                self.update_fps(delta);
                self.camera.update();

                if let (Some(viewer), Some(controller), Some(window)) =
                    (&mut self.viewer, &mut self.controller, &self.window)
                {
                    controller.tick(viewer);
                    let marker = controller.marker_position();

                    match viewer.render(&self.camera, window, self.fps, marker) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                            viewer.resize(window.inner_size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            eprintln!("Render error: out of memory");
                            event_loop.exit();
                        }
                        Err(e) => eprintln!("Render error: {}", e),
                    }

                    // Requests submitted through the panel this frame.
                    if let Some((start, end)) = viewer.take_path_request() {
                        if let Err(e) = controller.request_path(&start, &end, viewer) {
                            viewer.set_nav_error(e.to_string());
                        }
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let event_loop = EventLoop::new()?;
    let mut app = App::new(cli);

    println!(
        "Station Navigator - Controls: drag to orbit, scroll to zoom, W/S A/D Q/E, arrows to pan, Escape to quit"
    );
    event_loop.run_app(&mut app)?;

    Ok(())
}
