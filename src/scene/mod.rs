pub mod geometry;
pub mod materials;
pub mod palette;
pub mod populator;
pub mod store;
pub mod text;

pub use geometry::MeshData;
pub use materials::{Material, MaterialId, Materials, Shading, Side, TextureSlot};
pub use palette::{Palette, PaletteSlot};
pub use populator::{PopulateReport, Populator};
pub use store::{GeometryId, InsertReport, ObjectEntry, SceneGraphStore};

use crate::config::TextConfig;

/// Builds the shared mesh for one geometry kind.
pub fn build_mesh(geometry: GeometryId, text: &TextConfig) -> MeshData {
    match geometry {
        GeometryId::BoundarySphere => {
            let (w, h) = geometry::BOUNDARY_SEGMENTS;
            geometry::sphere(geometry::BOUNDARY_RADIUS, w, h)
        }
        GeometryId::Text => text::block_text(text),
        GeometryId::Torus => {
            let (radial, tubular) = geometry::TORUS_SEGMENTS;
            geometry::torus(geometry::TORUS_RADIUS, geometry::TORUS_TUBE, radial, tubular)
        }
        GeometryId::Sphere => {
            let (w, h) = geometry::SPHERE_SEGMENTS;
            geometry::sphere(geometry::SPHERE_RADIUS, w, h)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_mesh_sizes() {
        let text = TextConfig::default();
        let boundary = build_mesh(GeometryId::BoundarySphere, &text).bounds().unwrap();
        assert!((boundary.size().x - 2.0 * geometry::BOUNDARY_RADIUS).abs() < 1e-2);

        let torus = build_mesh(GeometryId::Torus, &text).bounds().unwrap();
        let outer = 2.0 * (geometry::TORUS_RADIUS + geometry::TORUS_TUBE);
        assert!((torus.size().x - outer).abs() < 1e-4);

        for id in GeometryId::ALL {
            assert!(build_mesh(id, &text).triangle_count() > 0, "{:?}", id);
        }
    }
}
