use std::f32::consts::{PI, TAU};

use glam::Vec3;

use super::controller::{Button, Controller};
use crate::camera::PerspectiveCamera;
use crate::config::OrbitConfig;

const PHI_EPSILON: f32 = 1e-6;
const MIN_RADIUS: f32 = 1e-3;
/// Radius multiplier per wheel line at zoom speed 1.
const ZOOM_STEP: f32 = 0.95;

/// Angles around the orbit target: `theta` about +Y from +Z, `phi` from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < f32::EPSILON {
            return Self::default();
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(&self) -> Vec3 {
        let sin_phi = self.phi.sin();
        Vec3::new(
            self.radius * sin_phi * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * sin_phi * self.theta.cos(),
        )
    }
}

/// Damped orbit around a fixed target.
///
/// Drag and wheel input accumulate into a pending delta; `update` applies a
/// `damping_factor` share of it each frame and decays the rest, which gives
/// the inertia-smoothed feel. Without damping the whole delta applies at once.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enabled: bool,
    pub damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
}

impl OrbitControls {
    pub fn new(config: &OrbitConfig) -> Self {
        Self {
            target: Vec3::ZERO,
            enabled: config.enabled,
            damping: config.damping,
            damping_factor: config.damping_factor,
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
        }
    }

    /// Feeds one frame of pointer input. `viewport_height` is in the same
    /// units as the pointer delta.
    pub fn handle_input(&mut self, input: &dyn Controller, viewport_height: f32) {
        if !self.enabled || viewport_height <= 0.0 {
            return;
        }
        if input.is_down(Button::MouseLeft) {
            let delta = input.pointer_delta();
            self.rotate_left(TAU * delta.x / viewport_height * self.rotate_speed);
            self.rotate_up(TAU * delta.y / viewport_height * self.rotate_speed);
        }
        let wheel = input.wheel_delta();
        if wheel != 0.0 {
            self.pending_scale *= ZOOM_STEP.powf(self.zoom_speed * wheel);
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.pending_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.pending_phi -= angle;
    }

    pub fn has_pending_motion(&self) -> bool {
        self.pending_theta.abs() > 1e-6 || self.pending_phi.abs() > 1e-6 || (self.pending_scale - 1.0).abs() > 1e-6
    }

    /// Re-positions the camera on its orbit and aims it at the target.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        if !self.enabled {
            return;
        }
        let mut spherical = Spherical::from_offset(camera.position - self.target);
        if spherical.radius < f32::EPSILON {
            return;
        }

        let share = if self.damping { self.damping_factor } else { 1.0 };
        spherical.theta += self.pending_theta * share;
        spherical.phi = (spherical.phi + self.pending_phi * share).clamp(PHI_EPSILON, PI - PHI_EPSILON);
        spherical.radius = (spherical.radius * self.pending_scale).max(MIN_RADIUS);

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.damping {
            self.pending_theta *= 1.0 - self.damping_factor;
            self.pending_phi *= 1.0 - self.damping_factor;
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
        }
        self.pending_scale = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::core::controller::tests::MockController;
    use glam::Vec2;

    fn camera_at(position: Vec3) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(&CameraConfig::default(), 1.0);
        camera.position = position;
        camera
    }

    #[test]
    fn test_spherical_round_trip_direction() {
        let offset = Vec3::new(1.0, -1.0, 6.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!((back - offset).length() < 1e-4);
    }

    #[test]
    fn test_idle_update_only_aims_at_target() {
        let mut controls = OrbitControls::new(&OrbitConfig::default());
        let start = Vec3::new(0.5, -0.5, 5.5);
        let mut camera = camera_at(start);
        controls.update(&mut camera);
        assert!((camera.position - start).length() < 1e-4);
        let expected = (-start).normalize();
        assert!((camera.forward() - expected).length() < 1e-4);
    }

    #[test]
    fn test_damped_rotation_decays() {
        let mut controls = OrbitControls::new(&OrbitConfig::default());
        controls.rotate_left(1.0);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.update(&mut camera);
        // One frame applies damping_factor of the pending angle.
        let theta = Spherical::from_offset(camera.position).theta;
        assert!((theta + 0.05).abs() < 1e-4, "theta = {theta}");
        assert!((controls.pending_theta + 0.95).abs() < 1e-5);

        for _ in 0..500 {
            controls.update(&mut camera);
        }
        assert!(!controls.has_pending_motion());
    }

    #[test]
    fn test_undamped_applies_everything_once() {
        let config = OrbitConfig {
            damping: false,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(&config);
        controls.rotate_left(0.5);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.update(&mut camera);
        let theta = Spherical::from_offset(camera.position).theta;
        assert!((theta + 0.5).abs() < 1e-4);
        assert!(!controls.has_pending_motion());
    }

    #[test]
    fn test_wheel_zooms_in() {
        let mut controls = OrbitControls::new(&OrbitConfig::default());
        let input = MockController {
            wheel: 1.0,
            ..Default::default()
        };
        controls.handle_input(&input, 600.0);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.update(&mut camera);
        assert!((camera.position.length() - 5.0 * ZOOM_STEP).abs() < 1e-4);
    }

    #[test]
    fn test_drag_requires_left_button() {
        let mut controls = OrbitControls::new(&OrbitConfig::default());
        let hover = MockController {
            pointer: Vec2::new(100.0, 0.0),
            ..Default::default()
        };
        controls.handle_input(&hover, 600.0);
        assert!(!controls.has_pending_motion());

        let drag = MockController {
            pressed: vec![Button::MouseLeft],
            pointer: Vec2::new(100.0, 0.0),
            ..Default::default()
        };
        controls.handle_input(&drag, 600.0);
        assert!(controls.has_pending_motion());
    }

    #[test]
    fn test_phi_is_clamped_at_poles() {
        let config = OrbitConfig {
            damping: false,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(&config);
        controls.rotate_up(10.0);
        let mut camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        controls.update(&mut camera);
        assert!(camera.position.is_finite());
        assert!(camera.position.y > 4.99);
    }

    #[test]
    fn test_disabled_leaves_camera_alone() {
        let config = OrbitConfig {
            enabled: false,
            ..OrbitConfig::default()
        };
        let mut controls = OrbitControls::new(&config);
        let mut camera = camera_at(Vec3::new(1.0, 2.0, 3.0));
        let before = camera.clone();
        controls.rotate_left(1.0);
        controls.update(&mut camera);
        assert_eq!(camera, before);
    }
}
