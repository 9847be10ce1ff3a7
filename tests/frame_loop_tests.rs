use glam::{Vec2, Vec3};
use scatter_scene::camera::{pose_at, PerspectiveCamera};
use scatter_scene::core::{Button, Controller};
use scatter_scene::traits::{RenderFrame, SceneRenderer};
use scatter_scene::{AppState, FrameLoop, FrameOutcome, RenderError, SceneConfig, Viewport};

/// Records the camera it was asked to draw with and fails on demand.
#[derive(Default)]
struct RecordingRenderer {
    cameras: Vec<PerspectiveCamera>,
    object_counts: Vec<usize>,
    /// (frame number, perf sampling, frames measured before this one)
    perf_at_render: Vec<(u64, bool, u64)>,
    fail_with: Option<RenderError>,
}

impl SceneRenderer for RecordingRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        self.cameras.push(frame.camera.clone());
        self.object_counts.push(frame.store.len());
        self.perf_at_render
            .push((frame.info.number, frame.perf.is_sampling(), frame.perf.total_frames()));
        match self.fail_with.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn resize(&mut self, _width: u32, _height: u32) {}
}

struct Drag {
    delta: Vec2,
}

impl Controller for Drag {
    fn is_down(&self, button: Button) -> bool {
        button == Button::MouseLeft
    }

    fn pointer_delta(&self) -> Vec2 {
        self.delta
    }

    fn wheel_delta(&self) -> f32 {
        0.0
    }
}

fn state_with_orbit(enabled: bool) -> AppState {
    let mut config = SceneConfig::default();
    config.population.seed = Some(21);
    config.population.initial = 10;
    config.orbit.enabled = enabled;
    AppState::new(config, Viewport::new(800.0, 600.0, 1.0, 2.0))
}

#[cfg(test)]
mod frame_loop_tests {
    use super::*;

    #[test]
    fn test_camera_follows_base_motion() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();
        let mut renderer = RecordingRenderer::default();

        for t in [0.0_f32, 0.25, 1.0, 3.7] {
            let outcome = frame_loop.advance(t, &mut state, None, &mut renderer);
            assert!(matches!(outcome, FrameOutcome::Presented(_)));
            let camera = renderer.cameras.last().unwrap();
            let expected = pose_at(t).position;
            assert!((camera.position - expected).length() < 1e-3, "t={}", t);
        }
    }

    #[test]
    fn test_orbit_orients_camera_at_origin() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();
        let mut renderer = RecordingRenderer::default();

        frame_loop.advance(0.6, &mut state, None, &mut renderer);
        let camera = &renderer.cameras[0];
        let to_origin = (Vec3::ZERO - camera.position).normalize();
        assert!(camera.forward().dot(to_origin) > 0.999);
    }

    #[test]
    fn test_disabled_orbit_keeps_base_yaw() {
        let mut state = state_with_orbit(false);
        let mut frame_loop = FrameLoop::new();
        let mut renderer = RecordingRenderer::default();

        let t = 0.1;
        frame_loop.advance(t, &mut state, Some(&Drag { delta: Vec2::new(50.0, 0.0) }), &mut renderer);
        let camera = &renderer.cameras[0];
        let yaw = pose_at(t).rotation_y;
        let expected = glam::Quat::from_rotation_y(yaw);
        assert!(camera.orientation.dot(expected).abs() > 0.9999);
        assert!((camera.position - pose_at(t).position).length() < 1e-5);
    }

    #[test]
    fn test_drag_moves_camera_off_base_pose() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();
        let mut renderer = RecordingRenderer::default();

        let drag = Drag { delta: Vec2::new(120.0, 0.0) };
        frame_loop.advance(0.5, &mut state, Some(&drag), &mut renderer);
        let camera = &renderer.cameras[0];
        let base = pose_at(0.5).position;
        assert!((camera.position - base).length() > 1e-3);
        // Orbiting preserves the distance to the target.
        assert!((camera.position.length() - base.length()).abs() < 1e-3);
    }

    #[test]
    fn test_frames_are_numbered_and_measured() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();
        let mut renderer = RecordingRenderer::default();

        let mut numbers = Vec::new();
        for i in 0..5 {
            if let FrameOutcome::Presented(info) = frame_loop.advance(i as f32 * 0.016, &mut state, None, &mut renderer) {
                numbers.push(info.number);
            }
        }
        assert_eq!(numbers, vec![0, 1, 2, 3, 4]);
        assert_eq!(frame_loop.frame_number(), 5);
        assert_eq!(frame_loop.perf().total_frames(), 5);
        assert_eq!(renderer.object_counts, vec![22; 5]);
    }

    #[test]
    fn test_perf_sample_brackets_render() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();
        let mut renderer = RecordingRenderer::default();

        for i in 0..3 {
            frame_loop.advance(i as f32 * 0.016, &mut state, None, &mut renderer);
            assert!(!frame_loop.perf().is_sampling());
            assert_eq!(frame_loop.perf().total_frames(), i + 1);
        }
        // Begun before render, ended after: open during the draw, and the
        // current frame not yet counted.
        assert_eq!(renderer.perf_at_render, vec![(0, true, 0), (1, true, 1), (2, true, 2)]);
    }

    #[test]
    fn test_failed_render_still_closes_perf_sample() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();
        let mut renderer = RecordingRenderer {
            fail_with: Some(RenderError::Timeout),
            ..Default::default()
        };
        frame_loop.advance(0.0, &mut state, None, &mut renderer);
        assert_eq!(renderer.perf_at_render, vec![(0, true, 0)]);
        assert!(!frame_loop.perf().is_sampling());
        assert_eq!(frame_loop.perf().total_frames(), 1);
    }

    #[test]
    fn test_recoverable_errors_skip_one_frame() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();

        for err in [RenderError::SurfaceLost, RenderError::Timeout] {
            let mut renderer = RecordingRenderer {
                fail_with: Some(err.clone()),
                ..Default::default()
            };
            let outcome = frame_loop.advance(1.0, &mut state, None, &mut renderer);
            assert!(outcome.should_continue());
            assert!(matches!(outcome, FrameOutcome::Skipped(_, ref e) if *e == err));

            let next = frame_loop.advance(1.1, &mut state, None, &mut renderer);
            assert!(matches!(next, FrameOutcome::Presented(_)));
        }
    }

    #[test]
    fn test_fatal_errors_stop_the_loop() {
        let mut state = state_with_orbit(true);
        let mut frame_loop = FrameLoop::new();

        for err in [RenderError::OutOfMemory, RenderError::Other("device lost".into())] {
            let mut renderer = RecordingRenderer {
                fail_with: Some(err.clone()),
                ..Default::default()
            };
            let outcome = frame_loop.advance(2.0, &mut state, None, &mut renderer);
            assert!(!outcome.should_continue());
            assert_eq!(outcome, FrameOutcome::Stopped(err));
        }
    }
}
