use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::SceneError;
use crate::scene::{text, Palette};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Pairs generated once the text is placed.
    pub initial: usize,
    /// Pairs generated per "Populate" action.
    pub batch: usize,
    /// Hard cap on populated objects (toruses + spheres).
    pub max_objects: usize,
    /// The advisory fires once the populate counter exceeds this.
    pub advisory_threshold: u32,
    /// Fixed RNG seed; entropy when absent.
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial: 100,
            batch: 100,
            max_objects: 10_000,
            advisory_threshold: 7,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    pub initial_position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            initial_position: [1.0, 1.0, 2.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub enabled: bool,
    pub damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub content: String,
    pub size: f32,
    pub depth: f32,
    pub bevel_enabled: bool,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "ERROR".to_string(),
            size: 0.8,
            depth: 0.2,
            bevel_enabled: true,
            bevel_thickness: 0.03,
            bevel_size: 0.02,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub matcap: Option<PathBuf>,
    pub pattern: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub max_pixel_ratio: f64,
    pub show_ui: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Scatter Scene".to_string(),
            width: 800,
            height: 600,
            max_pixel_ratio: 2.0,
            show_ui: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub population: PopulationConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub palette: Palette,
    pub text: TextConfig,
    pub assets: AssetConfig,
    pub window: WindowConfig,
}

impl SceneConfig {
    pub fn from_file(path: &Path) -> Result<Self, SceneError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SceneError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| SceneError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Config file (if any) with command-line flags layered on top.
    pub fn load(cli: &Cli) -> Result<Self, SceneError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(seed) = cli.seed {
            self.population.seed = Some(seed);
        }
        if let Some(max) = cli.max_population {
            self.population.max_objects = max;
        }
        if let Some(path) = &cli.matcap {
            self.assets.matcap = Some(path.clone());
        }
        if let Some(path) = &cli.pattern {
            self.assets.pattern = Some(path.clone());
        }
        if cli.no_ui {
            self.window.show_ui = false;
        }
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(SceneError::ConfigInvalid(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(SceneError::ConfigInvalid(format!(
                "camera planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !(0.0..=1.0).contains(&self.orbit.damping_factor) {
            return Err(SceneError::ConfigInvalid(format!(
                "orbit.damping_factor must be in [0, 1], got {}",
                self.orbit.damping_factor
            )));
        }
        if self.window.max_pixel_ratio <= 0.0 {
            return Err(SceneError::ConfigInvalid(format!(
                "window.max_pixel_ratio must be positive, got {}",
                self.window.max_pixel_ratio
            )));
        }
        if self.text.size <= 0.0 || self.text.depth < 0.0 {
            return Err(SceneError::ConfigInvalid(
                "text.size must be positive and text.depth non-negative".to_string(),
            ));
        }
        if !text::has_glyphs(&self.text.content) {
            return Err(SceneError::ConfigInvalid(format!(
                "text.content {:?} has no character the block font can draw",
                self.text.content
            )));
        }
        Ok(())
    }
}
