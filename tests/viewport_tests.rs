use scatter_scene::error::RenderError;
use scatter_scene::traits::{RenderFrame, SceneRenderer};
use scatter_scene::{AppState, SceneConfig, Viewport};

/// Remembers every surface size it was asked to take.
#[derive(Default)]
struct SurfaceLog {
    sizes: Vec<(u32, u32)>,
}

impl SceneRenderer for SurfaceLog {
    fn render(&mut self, _frame: &RenderFrame<'_>) -> Result<(), RenderError> {
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.sizes.push((width, height));
    }
}

fn state(dpr: f64) -> AppState {
    let mut config = SceneConfig::default();
    config.population.seed = Some(2);
    config.population.initial = 1;
    AppState::new(config, Viewport::new(800.0, 600.0, dpr, config_max()))
}

fn config_max() -> f64 {
    SceneConfig::default().window.max_pixel_ratio
}

#[cfg(test)]
mod viewport_tests {
    use super::*;

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut state = state(1.0);
        assert!((state.camera.aspect - 4.0 / 3.0).abs() < 1e-4);

        let surface = state.resize_logical(1600.0, 900.0);
        assert_eq!(surface, Some((1600, 900)));
        assert!((state.camera.aspect - 16.0 / 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_pixel_ratio_is_clamped() {
        let state = state(3.0);
        assert_eq!(state.viewport.pixel_ratio(), 2.0);
        assert_eq!(state.viewport.surface_size(), (1600, 1200));
    }

    #[test]
    fn test_physical_resize_scales_by_device_ratio() {
        let mut state = state(2.0);
        let surface = state.resize_physical(2000, 1000);
        assert_eq!(surface, Some((2000, 1000)));
        assert_eq!(state.viewport.logical_size(), (1000.0, 500.0));
        assert!((state.camera.aspect - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_zero_size_is_ignored() {
        let mut state = state(1.0);
        assert_eq!(state.resize_physical(0, 600), None);
        assert_eq!(state.resize_logical(800.0, 0.0), None);
        assert!((state.camera.aspect - 4.0 / 3.0).abs() < 1e-4);
        assert_eq!(state.viewport.surface_size(), (800, 600));
    }

    #[test]
    fn test_scale_factor_change_reaches_renderer() {
        let mut state = state(1.0);
        let mut renderer = SurfaceLog::default();
        state.apply_scale_factor(1.5, &mut renderer);
        state.apply_scale_factor(3.0, &mut renderer);
        assert_eq!(renderer.sizes, vec![(1200, 900), (1600, 1200)]);
    }

    #[test]
    fn test_window_resize_reaches_renderer() {
        let mut state = state(2.0);
        let mut renderer = SurfaceLog::default();
        state.apply_resize(2000, 1000, &mut renderer);
        state.apply_resize(0, 1000, &mut renderer);
        assert_eq!(renderer.sizes, vec![(2000, 1000)]);
    }

    #[test]
    fn test_scale_factor_change_resizes_surface() {
        let mut state = state(1.0);
        assert_eq!(state.set_scale_factor(1.5), (1200, 900));
        assert_eq!(state.set_scale_factor(4.0), (1600, 1200));
        assert!((state.camera.aspect - 4.0 / 3.0).abs() < 1e-4);
    }
}
