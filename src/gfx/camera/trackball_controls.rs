//! Trackball style camera controls
//!
//! Pointer drags rotate the camera around its target (left button or `A`),
//! zoom it (middle button, `S` or the wheel) and pan it (right button or `D`).
//! Input handlers only record where the pointer went; [`TrackballControls::update`]
//! applies the accumulated motion to a [`PerspectiveCamera`] once per frame.

use cgmath::{InnerSpace, Quaternion, Rad, Rotation, Rotation3, Vector2, Vector3, Zero};
use winit::{
    dpi::PhysicalPosition,
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use super::perspective_camera::PerspectiveCamera;
use crate::config::ControlsConfig;

const EPS: f32 = 0.000001;

/// Interaction currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlState {
    None,
    Rotate,
    Zoom,
    Pan,
}

/// Region of the window the controls react to, in physical pixels.
/// Fixed at construction; window resizes do not change it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Screen {
    left: f32,
    top: f32,
    width: f32,
    height: f32,
}

pub struct TrackballControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub no_rotate: bool,
    pub no_zoom: bool,
    pub no_pan: bool,
    pub static_moving: bool,
    pub dynamic_damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub target: Vector3<f32>,

    screen: Screen,
    state: ControlState,
    prev_state: ControlState,
    cursor: PhysicalPosition<f64>,

    eye: Vector3<f32>,
    move_prev: Vector2<f32>,
    move_curr: Vector2<f32>,
    last_axis: Vector3<f32>,
    last_angle: f32,
    zoom_start: Vector2<f32>,
    zoom_end: Vector2<f32>,
    pan_start: Vector2<f32>,
    pan_end: Vector2<f32>,
    last_position: Vector3<f32>,
}

impl TrackballControls {
    pub fn new(config: &ControlsConfig, width: u32, height: u32) -> Self {
        Self {
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pan_speed: config.pan_speed,
            no_rotate: config.no_rotate,
            no_zoom: config.no_zoom,
            no_pan: config.no_pan,
            static_moving: config.static_moving,
            dynamic_damping_factor: config.dynamic_damping_factor,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
            target: Vector3::zero(),
            screen: Screen {
                left: 0.0,
                top: 0.0,
                width: width.max(1) as f32,
                height: height.max(1) as f32,
            },
            state: ControlState::None,
            prev_state: ControlState::None,
            cursor: PhysicalPosition::new(0.0, 0.0),
            eye: Vector3::zero(),
            move_prev: Vector2::zero(),
            move_curr: Vector2::zero(),
            last_axis: Vector3::zero(),
            last_angle: 0.0,
            zoom_start: Vector2::zero(),
            zoom_end: Vector2::zero(),
            pan_start: Vector2::zero(),
            pan_end: Vector2::zero(),
            last_position: Vector3::zero(),
        }
    }

    /// Feeds a window event to the controls. Returns true if it was consumed.
    pub fn process_window_event(&mut self, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = *position;
                self.pointer_move(position.x as f32, position.y as f32);
                self.state != ControlState::None
            }
            WindowEvent::MouseInput { state, button, .. } => {
                match state {
                    ElementState::Pressed => {
                        self.pointer_down(*button, self.cursor.x as f32, self.cursor.y as f32)
                    }
                    ElementState::Released => self.pointer_up(),
                }
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.wheel(*delta);
                true
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed if !*repeat => self.key_down(*code),
                ElementState::Released => {
                    self.key_up();
                    false
                }
                _ => false,
            },
            _ => false,
        }
    }

    /// Holding `A`, `S` or `D` selects rotate, zoom or pan for the next drag.
    pub fn key_down(&mut self, key: KeyCode) -> bool {
        self.prev_state = self.state;
        if self.state != ControlState::None {
            return false;
        }
        self.state = match key {
            KeyCode::KeyA if !self.no_rotate => ControlState::Rotate,
            KeyCode::KeyS if !self.no_zoom => ControlState::Zoom,
            KeyCode::KeyD if !self.no_pan => ControlState::Pan,
            _ => return false,
        };
        true
    }

    pub fn key_up(&mut self) {
        self.state = self.prev_state;
    }

    pub fn pointer_down(&mut self, button: MouseButton, x: f32, y: f32) {
        if self.state == ControlState::None {
            self.state = match button {
                MouseButton::Left => ControlState::Rotate,
                MouseButton::Middle => ControlState::Zoom,
                MouseButton::Right => ControlState::Pan,
                _ => ControlState::None,
            };
        }

        match self.state {
            ControlState::Rotate if !self.no_rotate => {
                self.move_curr = self.mouse_on_circle(x, y);
                self.move_prev = self.move_curr;
            }
            ControlState::Zoom if !self.no_zoom => {
                self.zoom_start = self.mouse_on_screen(x, y);
                self.zoom_end = self.zoom_start;
            }
            ControlState::Pan if !self.no_pan => {
                self.pan_start = self.mouse_on_screen(x, y);
                self.pan_end = self.pan_start;
            }
            _ => {}
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        match self.state {
            ControlState::Rotate if !self.no_rotate => {
                self.move_prev = self.move_curr;
                self.move_curr = self.mouse_on_circle(x, y);
            }
            ControlState::Zoom if !self.no_zoom => self.zoom_end = self.mouse_on_screen(x, y),
            ControlState::Pan if !self.no_pan => self.pan_end = self.mouse_on_screen(x, y),
            _ => {}
        }
    }

    pub fn pointer_up(&mut self) {
        self.state = ControlState::None;
    }

    pub fn wheel(&mut self, delta: MouseScrollDelta) {
        if self.no_zoom {
            return;
        }
        // Positive winit deltas scroll up, which zooms in.
        match delta {
            MouseScrollDelta::LineDelta(_, y) => self.zoom_start.y += y * 0.01,
            MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => {
                self.zoom_start.y += y as f32 * 0.00025
            }
        }
    }

    /// Applies pending input to `camera` and re-aims it at the target.
    /// Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        self.eye = camera.position - self.target;

        if !self.no_rotate {
            self.rotate_camera(camera);
        }
        if !self.no_zoom {
            self.zoom_camera();
        }
        if !self.no_pan {
            self.pan_camera(camera);
        }

        camera.position = self.target + self.eye;
        self.check_distances(camera);
        camera.look_at(self.target);

        if (self.last_position - camera.position).magnitude2() > EPS {
            self.last_position = camera.position;
            true
        } else {
            false
        }
    }

    fn mouse_on_screen(&self, x: f32, y: f32) -> Vector2<f32> {
        Vector2::new(
            (x - self.screen.left) / self.screen.width,
            (y - self.screen.top) / self.screen.height,
        )
    }

    fn mouse_on_circle(&self, x: f32, y: f32) -> Vector2<f32> {
        Vector2::new(
            (x - self.screen.width * 0.5 - self.screen.left) / (self.screen.width * 0.5),
            (self.screen.height + 2.0 * (self.screen.top - y)) / self.screen.width,
        )
    }

    fn rotate_camera(&mut self, camera: &mut PerspectiveCamera) {
        let delta = self.move_curr - self.move_prev;
        let mut angle = delta.magnitude();

        if angle > 0.0 {
            self.eye = camera.position - self.target;
            let eye_direction = normalize_or_zero(self.eye);
            let up_direction = normalize_or_zero(camera.up);
            let sideways_direction = normalize_or_zero(up_direction.cross(eye_direction));

            let move_direction =
                set_length(up_direction, delta.y) + set_length(sideways_direction, delta.x);
            let axis = normalize_or_zero(move_direction.cross(self.eye));
            if axis.is_zero() {
                self.move_prev = self.move_curr;
                return;
            }

            angle *= self.rotate_speed;
            let quaternion = Quaternion::from_axis_angle(axis, Rad(angle));
            self.eye = quaternion.rotate_vector(self.eye);
            camera.up = quaternion.rotate_vector(camera.up);

            self.last_axis = axis;
            self.last_angle = angle;
        } else if !self.static_moving && self.last_angle != 0.0 {
            self.last_angle *= (1.0 - self.dynamic_damping_factor).sqrt();
            self.eye = camera.position - self.target;
            let quaternion = Quaternion::from_axis_angle(self.last_axis, Rad(self.last_angle));
            self.eye = quaternion.rotate_vector(self.eye);
            camera.up = quaternion.rotate_vector(camera.up);
        }

        self.move_prev = self.move_curr;
    }

    fn zoom_camera(&mut self) {
        let factor = 1.0 + (self.zoom_end.y - self.zoom_start.y) * self.zoom_speed;
        if factor != 1.0 && factor > 0.0 {
            self.eye *= factor;
        }

        if self.static_moving {
            self.zoom_start = self.zoom_end;
        } else {
            self.zoom_start.y +=
                (self.zoom_end.y - self.zoom_start.y) * self.dynamic_damping_factor;
        }
    }

    fn pan_camera(&mut self, camera: &mut PerspectiveCamera) {
        let mouse_change = self.pan_end - self.pan_start;
        if mouse_change.magnitude2() == 0.0 {
            return;
        }

        let mouse_change = mouse_change * (self.eye.magnitude() * self.pan_speed);
        let pan = set_length(self.eye.cross(camera.up), mouse_change.x)
            + set_length(camera.up, mouse_change.y);

        camera.position += pan;
        self.target += pan;

        if self.static_moving {
            self.pan_start = self.pan_end;
        } else {
            self.pan_start += (self.pan_end - self.pan_start) * self.dynamic_damping_factor;
        }
    }

    fn check_distances(&mut self, camera: &mut PerspectiveCamera) {
        if self.no_zoom && self.no_pan {
            return;
        }

        if self.eye.magnitude2() > self.max_distance * self.max_distance {
            self.eye = set_length(self.eye, self.max_distance);
            camera.position = self.target + self.eye;
            self.zoom_start = self.zoom_end;
        }

        if self.eye.magnitude2() < self.min_distance * self.min_distance {
            self.eye = set_length(self.eye, self.min_distance);
            camera.position = self.target + self.eye;
            self.zoom_start = self.zoom_end;
        }
    }
}

fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    let length = v.magnitude();
    if length > 0.0 {
        v / length
    } else {
        Vector3::zero()
    }
}

fn set_length(v: Vector3<f32>, length: f32) -> Vector3<f32> {
    normalize_or_zero(v) * length
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (TrackballControls, PerspectiveCamera) {
        let controls = TrackballControls::new(&ControlsConfig::default(), 800, 600);
        let mut camera = PerspectiveCamera::new(75.0, 800.0 / 600.0, 1.0, 10000.0);
        camera.set_position(Vector3::new(0.0, 60.0, 50.0));
        camera.look_at(Vector3::zero());
        (controls, camera)
    }

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!((a - b).magnitude() < 1e-3, "{a:?} != {b:?}");
    }

    #[test]
    fn idle_update_leaves_camera_alone() {
        let (mut controls, mut camera) = setup();
        controls.update(&mut camera);
        assert_close(camera.position, Vector3::new(0.0, 60.0, 50.0));
        assert_close(camera.target, Vector3::zero());
    }

    #[test]
    fn left_drag_rotates_at_constant_distance() {
        let (mut controls, mut camera) = setup();
        let distance = camera.position.magnitude();

        controls.pointer_down(MouseButton::Left, 400.0, 300.0);
        controls.pointer_move(480.0, 300.0);
        controls.update(&mut camera);
        controls.pointer_up();

        assert!((camera.position.magnitude() - distance).abs() < 1e-2);
        assert!(camera.position.x.abs() > 1.0);
        assert_eq!(controls.state, ControlState::None);
    }

    #[test]
    fn static_moving_stops_when_input_stops() {
        let (mut controls, mut camera) = setup();
        controls.pointer_down(MouseButton::Left, 400.0, 300.0);
        controls.pointer_move(450.0, 320.0);
        controls.update(&mut camera);
        let after_drag = camera.position;

        controls.update(&mut camera);
        assert_close(camera.position, after_drag);
    }

    #[test]
    fn dynamic_moving_keeps_rotating_after_release() {
        let (mut controls, mut camera) = setup();
        controls.static_moving = false;
        controls.pointer_down(MouseButton::Left, 400.0, 300.0);
        controls.pointer_move(450.0, 300.0);
        controls.update(&mut camera);
        controls.pointer_up();
        let after_drag = camera.position;

        controls.update(&mut camera);
        assert!((camera.position - after_drag).magnitude() > 1e-3);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let (mut controls, mut camera) = setup();
        let distance = camera.position.magnitude();
        controls.wheel(MouseScrollDelta::LineDelta(0.0, 3.0));
        controls.update(&mut camera);
        assert!(camera.position.magnitude() < distance);
    }

    #[test]
    fn right_drag_pans_target_and_position_together() {
        let (mut controls, mut camera) = setup();
        let offset = camera.position - controls.target;

        controls.pointer_down(MouseButton::Right, 400.0, 300.0);
        controls.pointer_move(420.0, 300.0);
        controls.update(&mut camera);

        assert!(controls.target.magnitude() > 0.1);
        assert_close(camera.position - controls.target, offset);
        assert_close(camera.target, controls.target);
    }

    #[test]
    fn keys_select_mode_until_released() {
        let (mut controls, _) = setup();
        assert!(controls.key_down(KeyCode::KeyS));
        assert_eq!(controls.state, ControlState::Zoom);
        controls.key_up();
        assert_eq!(controls.state, ControlState::None);

        controls.no_pan = true;
        assert!(!controls.key_down(KeyCode::KeyD));
        assert_eq!(controls.state, ControlState::None);
    }

    #[test]
    fn max_distance_clamps_zoom_out() {
        let (mut controls, mut camera) = setup();
        controls.max_distance = 70.0;
        controls.wheel(MouseScrollDelta::LineDelta(0.0, -50.0));
        controls.update(&mut camera);
        assert!((camera.position.magnitude() - 70.0).abs() < 1e-3);
    }
}
