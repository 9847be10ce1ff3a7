use crate::camera::PerspectiveCamera;
use crate::config::SceneConfig;
use crate::core::OrbitControls;
use crate::panel::PopulationCounter;
use crate::scene::{GeometryId, MaterialId, Materials, ObjectEntry, Palette, PopulateReport, Populator, SceneGraphStore};
use crate::traits::SceneRenderer;
use crate::viewport::Viewport;

/// Everything one frame reads or a panel command writes.
pub struct AppState {
    pub config: SceneConfig,
    pub palette: Palette,
    pub materials: Materials,
    pub store: SceneGraphStore,
    pub populator: Populator,
    pub counter: PopulationCounter,
    pub camera: PerspectiveCamera,
    pub orbit: OrbitControls,
    pub viewport: Viewport,
}

impl AppState {
    /// Builds the scene: boundary sphere, text, then the initial population.
    ///
    /// The initial population does not count toward the populate counter.
    pub fn new(config: SceneConfig, viewport: Viewport) -> Self {
        let palette = config.palette;
        let materials = Materials::new(&palette);
        let mut store = SceneGraphStore::new(config.population.max_objects);
        let populator = Populator::new(config.population.seed);
        let counter = PopulationCounter::new(config.population.advisory_threshold);
        let camera = PerspectiveCamera::new(&config.camera, viewport.aspect());
        let orbit = OrbitControls::new(&config.orbit);

        store.insert_fixed(ObjectEntry::fixed(GeometryId::BoundarySphere, MaterialId::Boundary));
        store.insert_fixed(ObjectEntry::fixed(GeometryId::Text, MaterialId::Text));

        let mut state = Self {
            config,
            palette,
            materials,
            store,
            populator,
            counter,
            camera,
            orbit,
            viewport,
        };
        let initial = state.config.population.initial;
        let report = state.populate(initial);
        log::info!(
            "scene ready: {} objects ({} toruses, {} spheres), cap {}",
            state.store.len(),
            report.toruses,
            report.spheres,
            state.store.max_populated()
        );
        state
    }

    /// Scatters `count` torus/sphere pairs without touching the counter.
    pub fn populate(&mut self, count: usize) -> PopulateReport {
        self.populator.populate(&mut self.store, count)
    }

    /// Applies a window resize in physical pixels. Returns the new surface
    /// size, or `None` when the resize was ignored.
    pub fn resize_physical(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        if !self.viewport.resize_physical(width, height) {
            return None;
        }
        self.camera.set_aspect(self.viewport.aspect());
        Some(self.viewport.surface_size())
    }

    pub fn resize_logical(&mut self, width: f64, height: f64) -> Option<(u32, u32)> {
        if !self.viewport.resize_logical(width, height) {
            return None;
        }
        self.camera.set_aspect(self.viewport.aspect());
        Some(self.viewport.surface_size())
    }

    pub fn set_scale_factor(&mut self, scale_factor: f64) -> (u32, u32) {
        self.viewport.set_device_pixel_ratio(scale_factor);
        self.viewport.surface_size()
    }

    /// Window resize, reapplied to the renderer's surface.
    pub fn apply_resize(&mut self, width: u32, height: u32, renderer: &mut dyn SceneRenderer) {
        if let Some((surface_w, surface_h)) = self.resize_physical(width, height) {
            renderer.resize(surface_w, surface_h);
        }
    }

    /// Pixel-density change, reapplied to the renderer's surface without
    /// waiting for a follow-up resize event.
    pub fn apply_scale_factor(&mut self, scale_factor: f64, renderer: &mut dyn SceneRenderer) {
        let (surface_w, surface_h) = self.set_scale_factor(scale_factor);
        renderer.resize(surface_w, surface_h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_config() -> SceneConfig {
        let mut config = SceneConfig::default();
        config.population.seed = Some(3);
        config
    }

    #[test]
    fn test_setup_order() {
        let state = AppState::new(seeded_config(), Viewport::new(800.0, 600.0, 1.0, 2.0));
        let entries = state.store.entries();
        assert_eq!(entries[0].geometry, GeometryId::BoundarySphere);
        assert_eq!(entries[1].geometry, GeometryId::Text);
        assert_eq!(entries[2].geometry, GeometryId::Torus);
        assert_eq!(entries[3].geometry, GeometryId::Sphere);
        assert_eq!(state.store.len(), 2 + 200);
        assert_eq!(state.counter.count(), 0);
    }

    #[test]
    fn test_camera_starts_at_configured_position() {
        let state = AppState::new(seeded_config(), Viewport::new(800.0, 600.0, 1.0, 2.0));
        assert_eq!(state.camera.position, glam::Vec3::new(1.0, 1.0, 2.0));
        assert!((state.camera.aspect - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_updates_camera_aspect() {
        let mut state = AppState::new(seeded_config(), Viewport::new(800.0, 600.0, 1.0, 2.0));
        assert_eq!(state.resize_logical(1600.0, 900.0), Some((1600, 900)));
        assert!((state.camera.aspect - 1.778).abs() < 1e-3);
        assert_eq!(state.resize_physical(0, 900), None);
        assert!((state.camera.aspect - 1.778).abs() < 1e-3);
    }
}
