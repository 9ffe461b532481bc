//! Camera component and the first-person controller that steers its node.

use crate::input::InputState;
use crate::math::{degrees_to_radians, Mat4, Vec3};
use winit::keyboard::KeyCode;

const WORLD_UP: Vec3 = Vec3::Y;
const PITCH_LIMIT_DEGREES: f32 = 89.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Vertical field of view in degrees.
    Perspective { fov: f32 },
    Orthographic { scale: f32 },
}

/// View and projection captured from the active camera for the rest of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub view: Mat4,
    pub projection: Mat4,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    projection: Projection,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    projection_matrix: Mat4,
    view_matrix: Mat4,
    forward: Vec3,
    right: Vec3,
}

impl Camera {
    #[must_use]
    pub fn perspective(aspect_ratio: f32, fov: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Perspective { fov }, aspect_ratio, near, far)
    }

    #[must_use]
    pub fn orthographic(scale: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Orthographic { scale }, 1.0, near, far)
    }

    fn with_projection(projection: Projection, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            projection,
            aspect_ratio,
            near,
            far,
            projection_matrix: Mat4::identity(),
            view_matrix: Mat4::identity(),
            forward: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::X,
        };
        camera.rebuild_projection();
        camera
    }

    fn rebuild_projection(&mut self) {
        self.projection_matrix = match self.projection {
            Projection::Perspective { fov } => Mat4::perspective(
                self.aspect_ratio,
                degrees_to_radians(fov),
                self.near,
                self.far,
            ),
            // Fixed unit view volume; the scale sets the visible extent.
            Projection::Orthographic { scale } => {
                Mat4::orthographic(scale, 0.0, 1.0, 0.0, 1.0, self.near, self.far)
            }
        };
    }

    /// Changes the field of view of a perspective camera. Orthographic cameras are
    /// left untouched and return `None`.
    pub fn set_fov(&mut self, fov: f32) -> Option<f32> {
        match &mut self.projection {
            Projection::Perspective { fov: current } => {
                *current = fov;
                self.rebuild_projection();
                Some(fov)
            }
            Projection::Orthographic { .. } => None,
        }
    }

    /// Changes the scale of an orthographic camera. Perspective cameras are left
    /// untouched and return `None`.
    pub fn set_scale(&mut self, scale: f32) -> Option<f32> {
        match &mut self.projection {
            Projection::Orthographic { scale: current } => {
                *current = scale;
                self.rebuild_projection();
                Some(scale)
            }
            Projection::Perspective { .. } => None,
        }
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.rebuild_projection();
    }

    /// Takes the node's global transform as the view matrix and derives the basis
    /// vectors used for movement.
    pub fn observe(&mut self, view: &Mat4) {
        self.view_matrix = *view;
        self.forward = -Vec3::new(view[(2, 0)], view[(2, 1)], view[(2, 2)]);
        self.right = WORLD_UP.cross(&self.forward).normalize();
    }

    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    #[must_use]
    pub fn fov(&self) -> Option<f32> {
        match self.projection {
            Projection::Perspective { fov } => Some(fov),
            Projection::Orthographic { .. } => None,
        }
    }

    #[must_use]
    pub fn scale(&self) -> Option<f32> {
        match self.projection {
            Projection::Orthographic { scale } => Some(scale),
            Projection::Perspective { .. } => None,
        }
    }

    #[must_use]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[must_use]
    pub fn far(&self) -> f32 {
        self.far
    }

    #[must_use]
    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.right
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view_matrix
    }

    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_matrix * self.projection_matrix
    }

    #[must_use]
    pub fn view_state(&self) -> CameraView {
        CameraView {
            view: self.view_matrix,
            projection: self.projection_matrix,
        }
    }
}

/// Rotation and translation a controller wants applied to its node this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub yaw: f32,
    pub pitch: f32,
    pub translation: Vec3,
}

/// Mouse-look and WASD movement.
#[derive(Debug, Clone, PartialEq)]
pub struct FirstPersonController {
    pub turn_speed: f32,
    pub move_speed: f32,
    last_mouse: Option<(f32, f32)>,
}

impl FirstPersonController {
    #[must_use]
    pub fn new(turn_speed: f32, move_speed: f32) -> Self {
        Self {
            turn_speed,
            move_speed,
            last_mouse: None,
        }
    }

    /// Turns this frame's input into a motion relative to the camera's last
    /// observed basis.
    pub fn update(&mut self, camera: &Camera, input: &InputState, delta_time: f32) -> Motion {
        let mouse = input.mouse_position();
        let (last_x, last_y) = self.last_mouse.unwrap_or((mouse.x, mouse.y));
        self.last_mouse = Some((mouse.x, mouse.y));

        let limit = degrees_to_radians(PITCH_LIMIT_DEGREES);
        let mut yaw = (mouse.x - last_x) * self.turn_speed;
        let mut pitch = ((mouse.y - last_y) * self.turn_speed).clamp(-limit, limit);
        if input.is_key_down(KeyCode::KeyR) {
            yaw = 0.0;
            pitch = 0.0;
        }

        let axis = |positive: &[KeyCode], negative: &[KeyCode]| -> f32 {
            let held = |keys: &[KeyCode]| keys.iter().any(|&k| input.is_key_pressed(k));
            f32::from(u8::from(held(positive))) - f32::from(u8::from(held(negative)))
        };
        let move_x = axis(&[KeyCode::KeyA], &[KeyCode::KeyD]);
        let move_y = axis(
            &[KeyCode::Space],
            &[KeyCode::ControlLeft, KeyCode::ControlRight],
        );
        let move_z = axis(&[KeyCode::KeyW], &[KeyCode::KeyS]);

        let mut movement = camera.right() * move_x + camera.forward() * move_z;
        movement.y = move_y;

        Motion {
            yaw,
            pitch,
            translation: -movement.normalize() * self.move_speed * delta_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fov_only_applies_to_perspective() {
        let mut perspective = Camera::perspective(4.0 / 3.0, 75.0, 0.01, 1000.0);
        let before = perspective.projection_matrix();
        assert_eq!(perspective.set_fov(60.0), Some(60.0));
        assert_ne!(perspective.projection_matrix(), before);
        assert_eq!(perspective.set_scale(2.0), None);
        assert_eq!(perspective.fov(), Some(60.0));

        let mut ortho = Camera::orthographic(1.0, 0.1, 10.0);
        assert_eq!(ortho.set_fov(60.0), None);
        assert_eq!(ortho.set_scale(2.0), Some(2.0));
        assert_eq!(ortho.projection_matrix()[(0, 0)], 2.0);
        assert_eq!(ortho.scale(), Some(2.0));
    }

    #[test]
    fn aspect_ratio_rebuilds_projection() {
        let mut camera = Camera::perspective(1.0, 90.0, 0.1, 100.0);
        let square = camera.projection_matrix()[(0, 0)];
        camera.set_aspect_ratio(2.0);
        assert!((camera.projection_matrix()[(0, 0)] - square / 2.0).abs() < 1e-6);
    }

    #[test]
    fn observe_derives_basis_from_view() {
        let mut camera = Camera::perspective(1.0, 75.0, 0.01, 1000.0);
        assert_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0));

        camera.observe(&Mat4::identity());
        assert_eq!(camera.forward(), Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(camera.right(), Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(camera.view_matrix(), Mat4::identity());
    }

    #[test]
    fn controller_moves_along_camera_basis() {
        let mut camera = Camera::perspective(1.0, 75.0, 0.01, 1000.0);
        camera.observe(&Mat4::identity());
        let mut controller = FirstPersonController::new(0.01, 2.0);

        let mut input = InputState::new();
        input.key_pressed(KeyCode::KeyW);
        let motion = controller.update(&camera, &input, 0.5);
        assert_eq!(motion.yaw, 0.0);
        assert_eq!(motion.pitch, 0.0);
        // forward is -Z, the node moves against the normalised direction.
        assert_eq!(motion.translation, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn controller_turns_with_mouse_and_clamps_pitch() {
        let camera = Camera::perspective(1.0, 75.0, 0.01, 1000.0);
        let mut controller = FirstPersonController::new(0.01, 2.0);
        let mut input = InputState::new();

        controller.update(&camera, &input, 0.016);
        input.mouse_moved(10.0, 100_000.0);
        let motion = controller.update(&camera, &input, 0.016);
        assert!((motion.yaw - 0.1).abs() < 1e-6);
        assert!((motion.pitch - degrees_to_radians(89.0)).abs() < 1e-6);
        assert_eq!(motion.translation, Vec3::zero());
    }

    #[test]
    fn reset_key_cancels_turning() {
        let camera = Camera::perspective(1.0, 75.0, 0.01, 1000.0);
        let mut controller = FirstPersonController::new(0.01, 2.0);
        let mut input = InputState::new();
        controller.update(&camera, &input, 0.016);

        input.mouse_moved(50.0, 50.0);
        input.key_pressed(KeyCode::KeyR);
        input.begin_frame();
        let motion = controller.update(&camera, &input, 0.016);
        assert_eq!((motion.yaw, motion.pitch), (0.0, 0.0));
    }
}
