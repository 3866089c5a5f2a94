use glam::{Mat4, Vec3};
use winit::event::{KeyEvent, MouseScrollDelta};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::types::CameraUniform;

pub const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 1000.0;

pub const ORBIT_KEY_SPEED: f32 = 0.02;
pub const ZOOM_KEY_SPEED: f32 = 0.5;
pub const PAN_KEY_SPEED: f32 = 0.4;
pub const DRAG_SENSITIVITY: f32 = 0.005;
pub const ZOOM_STEP: f32 = 1.1;

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
const MIN_RADIUS: f32 = 2.0;
const MAX_RADIUS: f32 = 400.0;

#[derive(Default, Clone, Copy)]
pub struct MovementState {
    pub orbit_left: bool,
    pub orbit_right: bool,
    pub pitch_up: bool,
    pub pitch_down: bool,
    pub zoom_in: bool,
    pub zoom_out: bool,
    pub pan_left: bool,
    pub pan_right: bool,
    pub pan_forward: bool,
    pub pan_back: bool,
}

impl MovementState {
    const fn to_direction(&self, positive: bool, negative: bool) -> f32 {
        match (positive, negative) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }

    const fn velocity(&self) -> (f32, f32, f32) {
        (
            self.to_direction(self.orbit_right, self.orbit_left),
            self.to_direction(self.pitch_up, self.pitch_down),
            self.to_direction(self.zoom_in, self.zoom_out),
        )
    }

    const fn pan_velocity(&self) -> (f32, f32) {
        (
            self.to_direction(self.pan_right, self.pan_left),
            self.to_direction(self.pan_forward, self.pan_back),
        )
    }
}

/// Orbit camera circling a target point, the way the station is meant to be
/// inspected: yaw/pitch around the look-at point, radius as zoom. Arrow keys
/// slide the target across the floor plane.
pub struct Camera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub radius: f32,
    pub movement: MovementState,
}

impl Camera {
    pub fn new() -> Self {
        Self::looking_from(Vec3::new(0.0, 30.0, 50.0), Vec3::ZERO)
    }

    /// Derive orbit parameters from an explicit eye point.
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length().clamp(MIN_RADIUS, MAX_RADIUS);
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            radius,
            movement: MovementState::default(),
        }
    }

    pub fn eye(&self) -> Vec3 {
        let direction = Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        );
        self.target + direction * self.radius
    }

    /// Per-frame integration of the held-key state.
    pub fn update(&mut self) {
        let (yaw_dir, pitch_dir, zoom_dir) = self.movement.velocity();
        let (pan_x, pan_z) = self.movement.pan_velocity();

        self.yaw += yaw_dir * ORBIT_KEY_SPEED;
        self.pitch = (self.pitch + pitch_dir * ORBIT_KEY_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.radius = (self.radius - zoom_dir * ZOOM_KEY_SPEED).clamp(MIN_RADIUS, MAX_RADIUS);

        if pan_x != 0.0 || pan_z != 0.0 {
            // Pan in the horizontal view frame so the floor stays level.
            let forward = Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos());
            let right = forward.cross(Vec3::Y);
            self.target += (right * pan_x + forward * pan_z) * PAN_KEY_SPEED;
        }
    }

    /// Mouse-drag orbit, in physical pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * DRAG_SENSITIVITY;
        self.pitch = (self.pitch + dy * DRAG_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    pub fn process_scroll(&mut self, delta: &MouseScrollDelta) {
        let lines = match delta {
            MouseScrollDelta::LineDelta(_, y) => *y,
            MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 50.0,
        };
        self.radius = (self.radius * ZOOM_STEP.powf(-lines)).clamp(MIN_RADIUS, MAX_RADIUS);
    }

    pub fn process_keyboard(&mut self, event: &KeyEvent) {
        let is_pressed = event.state.is_pressed();
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match keycode {
                KeyCode::KeyW => self.movement.zoom_in = is_pressed,
                KeyCode::KeyS => self.movement.zoom_out = is_pressed,
                KeyCode::KeyA => self.movement.orbit_left = is_pressed,
                KeyCode::KeyD => self.movement.orbit_right = is_pressed,
                KeyCode::KeyQ => self.movement.pitch_up = is_pressed,
                KeyCode::KeyE => self.movement.pitch_down = is_pressed,
                KeyCode::ArrowLeft => self.movement.pan_left = is_pressed,
                KeyCode::ArrowRight => self.movement.pan_right = is_pressed,
                KeyCode::ArrowUp => self.movement.pan_forward = is_pressed,
                KeyCode::ArrowDown => self.movement.pan_back = is_pressed,
                _ => {}
            }
        }
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let projection = Mat4::perspective_rh(FOV_Y, aspect, Z_NEAR, Z_FAR);
        let view = Mat4::look_at_rh(self.eye(), self.target, Vec3::Y);
        projection * view
    }

    pub fn to_uniform(&self, aspect: f32) -> CameraUniform {
        CameraUniform::new(self.view_proj(aspect), self.eye())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
