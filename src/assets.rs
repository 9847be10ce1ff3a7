//! Texture inputs: PNG files when configured, procedural defaults otherwise.

use std::path::Path;

use glam::Vec3;

use crate::config::AssetConfig;
use crate::error::SceneError;

pub const MATCAP_SIZE: u32 = 128;
pub const CHECKER_CELLS: u32 = 8;

/// Tightly packed RGBA8 pixels, sRGB encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl TextureData {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * self.width + x) * 4) as usize;
        [self.pixels[i], self.pixels[i + 1], self.pixels[i + 2], self.pixels[i + 3]]
    }
}

/// The matcap for the text and the pattern for the toruses.
#[derive(Debug, Clone)]
pub struct SceneTextures {
    pub matcap: TextureData,
    pub pattern: TextureData,
}

impl SceneTextures {
    /// A configured path that fails to load is an error, never a fallback.
    pub fn load(config: &AssetConfig) -> Result<Self, SceneError> {
        let matcap = match &config.matcap {
            Some(path) => load_png(path)?,
            None => procedural_matcap(MATCAP_SIZE),
        };
        let pattern = match &config.pattern {
            Some(path) => load_png(path)?,
            None => checkerboard(CHECKER_CELLS),
        };
        log::info!(
            "textures: matcap {}x{}, pattern {}x{}",
            matcap.width,
            matcap.height,
            pattern.width,
            pattern.height
        );
        Ok(Self { matcap, pattern })
    }
}

pub fn load_png(path: &Path) -> Result<TextureData, SceneError> {
    let img = image::open(path)
        .map_err(|source| SceneError::Asset {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    Ok(TextureData {
        width,
        height,
        pixels: img.into_raw(),
    })
}

/// Grey lit-sphere: soft diffuse key light from the upper left plus a
/// tight highlight. Tinted by the material color at draw time.
pub fn procedural_matcap(size: u32) -> TextureData {
    let light = Vec3::new(-0.4, 0.6, 0.7).normalize();
    let half = (light + Vec3::Z).normalize();
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    for j in 0..size {
        for i in 0..size {
            let x = (i as f32 + 0.5) / size as f32 * 2.0 - 1.0;
            let y = 1.0 - (j as f32 + 0.5) / size as f32 * 2.0;
            let r2 = x * x + y * y;
            let normal = if r2 < 1.0 {
                Vec3::new(x, y, (1.0 - r2).sqrt())
            } else {
                Vec3::new(x, y, 0.0).normalize()
            };
            let diffuse = normal.dot(light).max(0.0);
            let specular = normal.dot(half).max(0.0).powi(40);
            let value = (0.15 + 0.7 * diffuse + 0.4 * specular).clamp(0.0, 1.0);
            let v = (value * 255.0).round() as u8;
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    TextureData {
        width: size,
        height: size,
        pixels,
    }
}

/// `cells`×`cells` pixel checkerboard, white in the top-left corner.
pub fn checkerboard(cells: u32) -> TextureData {
    let mut pixels = Vec::with_capacity((cells * cells * 4) as usize);
    for y in 0..cells {
        for x in 0..cells {
            let v = if (x + y) % 2 == 0 { 255 } else { 0 };
            pixels.extend_from_slice(&[v, v, v, 255]);
        }
    }
    TextureData {
        width: cells,
        height: cells,
        pixels,
    }
}
