use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::config::CameraConfig;
use crate::types::CameraUniform;

/// Angular rate of the base positional sway, rad/s.
pub const SWAY_RATE: f32 = 2.5;
/// Angular rate of the base yaw wobble, rad/s.
pub const YAW_RATE: f32 = 10.0;
pub const YAW_AMPLITUDE: f32 = 2.0;
pub const SWAY_DISTANCE: f32 = 5.0;

/// Base camera pose for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    /// Euler y in radians; x and z stay zero.
    pub rotation_y: f32,
}

/// Closed-form base motion. Pure: the same `t` always gives the same pose.
pub fn pose_at(elapsed: f32) -> CameraPose {
    let sway = (SWAY_RATE * elapsed).sin();
    CameraPose {
        position: Vec3::new(sway, -sway, sway + SWAY_DISTANCE),
        rotation_y: (YAW_RATE * elapsed).sin() * YAW_AMPLITUDE,
    }
}

/// Perspective camera with a free orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub orientation: Quat,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::from_array(config.initial_position),
            orientation: Quat::IDENTITY,
            fov_y: config.fov_degrees.to_radians(),
            aspect,
            near: config.near,
            far: config.far,
        }
    }

    pub fn apply_pose(&mut self, pose: &CameraPose) {
        self.position = pose.position;
        self.orientation = Quat::from_euler(EulerRot::XYZ, 0.0, pose.rotation_y, 0.0);
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Orients the camera so -Z points at `target`.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = target - self.position;
        if forward.length_squared() < f32::EPSILON {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        self.orientation = rotation;
    }

    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn to_uniform(&self) -> CameraUniform {
        let view = self.view_matrix();
        CameraUniform {
            view_proj: (self.projection_matrix() * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
        }
    }
}
