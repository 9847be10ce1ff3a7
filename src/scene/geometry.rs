//! CPU-side mesh generation.
//!
//! Parameterizations follow the usual UV-sphere and torus layouts so the
//! pattern texture wraps the same way a scene-graph library would wrap it.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::math::AABB;
use crate::types::Vertex;

pub const BOUNDARY_RADIUS: f32 = 100.0;
pub const BOUNDARY_SEGMENTS: (u32, u32) = (32, 32);
pub const TORUS_RADIUS: f32 = 0.3;
pub const TORUS_TUBE: f32 = 0.2;
pub const TORUS_SEGMENTS: (u32, u32) = (16, 32);
pub const SPHERE_RADIUS: f32 = 0.2;
pub const SPHERE_SEGMENTS: (u32, u32) = (8, 8);

/// Indexed triangle mesh, counter-clockwise front faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(self.vertices.iter().map(|v| Vec3::from_array(v.position)))
    }

    /// Unique triangle edges as a line list.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if seen.insert(key) {
                    lines.push(a);
                    lines.push(b);
                }
            }
        }
        lines
    }

    pub fn translate(&mut self, offset: Vec3) {
        for v in &mut self.vertices {
            v.position = (Vec3::from_array(v.position) + offset).to_array();
        }
    }

    /// Moves the mesh so its bounding box is centered on the origin.
    pub fn center(&mut self) {
        if let Some(bounds) = self.bounds() {
            self.translate(-bounds.center());
        }
    }

    pub fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }
}

fn vertex(position: Vec3, normal: Vec3, uv: Vec2) -> Vertex {
    Vertex {
        position: position.to_array(),
        normal: normal.to_array(),
        uv: uv.to_array(),
    }
}

/// UV sphere with `width` segments around and `height` segments pole to pole.
pub fn sphere(radius: f32, width: u32, height: u32) -> MeshData {
    let width = width.max(3);
    let height = height.max(2);
    let mut mesh = MeshData::default();

    for iy in 0..=height {
        let v = iy as f32 / height as f32;
        for ix in 0..=width {
            let u = ix as f32 / width as f32;
            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            let normal = position.normalize_or_zero();
            mesh.vertices.push(vertex(position, normal, Vec2::new(u, 1.0 - v)));
        }
    }

    let row = width + 1;
    for iy in 0..height {
        for ix in 0..width {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // Pole rows collapse to a single triangle per quad.
            if iy != 0 {
                mesh.indices.extend([a, b, d]);
            }
            if iy != height - 1 {
                mesh.indices.extend([b, c, d]);
            }
        }
    }
    mesh
}

/// Torus in the XY plane around the Z axis.
pub fn torus(radius: f32, tube: f32, radial: u32, tubular: u32) -> MeshData {
    let radial = radial.max(3);
    let tubular = tubular.max(3);
    let mut mesh = MeshData::default();

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * TAU;
        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * TAU;
            let position = Vec3::new(
                (radius + tube * v.cos()) * u.cos(),
                (radius + tube * v.cos()) * u.sin(),
                tube * v.sin(),
            );
            let ring_center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            let normal = (position - ring_center).normalize_or_zero();
            let uv = Vec2::new(i as f32 / tubular as f32, j as f32 / radial as f32);
            mesh.vertices.push(vertex(position, normal, uv));
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend([a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Axis-aligned box between `min` and `max`, one quad per face.
pub fn cuboid(min: Vec3, max: Vec3) -> MeshData {
    let faces: [(Vec3, [Vec3; 4]); 6] = [
        (
            Vec3::X,
            [
                Vec3::new(max.x, min.y, max.z),
                Vec3::new(max.x, min.y, min.z),
                Vec3::new(max.x, max.y, min.z),
                Vec3::new(max.x, max.y, max.z),
            ],
        ),
        (
            Vec3::NEG_X,
            [
                Vec3::new(min.x, min.y, min.z),
                Vec3::new(min.x, min.y, max.z),
                Vec3::new(min.x, max.y, max.z),
                Vec3::new(min.x, max.y, min.z),
            ],
        ),
        (
            Vec3::Y,
            [
                Vec3::new(min.x, max.y, max.z),
                Vec3::new(max.x, max.y, max.z),
                Vec3::new(max.x, max.y, min.z),
                Vec3::new(min.x, max.y, min.z),
            ],
        ),
        (
            Vec3::NEG_Y,
            [
                Vec3::new(min.x, min.y, min.z),
                Vec3::new(max.x, min.y, min.z),
                Vec3::new(max.x, min.y, max.z),
                Vec3::new(min.x, min.y, max.z),
            ],
        ),
        (
            Vec3::Z,
            [
                Vec3::new(min.x, min.y, max.z),
                Vec3::new(max.x, min.y, max.z),
                Vec3::new(max.x, max.y, max.z),
                Vec3::new(min.x, max.y, max.z),
            ],
        ),
        (
            Vec3::NEG_Z,
            [
                Vec3::new(max.x, min.y, min.z),
                Vec3::new(min.x, min.y, min.z),
                Vec3::new(min.x, max.y, min.z),
                Vec3::new(max.x, max.y, min.z),
            ],
        ),
    ];
    let uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut mesh = MeshData::default();
    for (normal, corners) in faces {
        let base = mesh.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            mesh.vertices.push(vertex(corner, normal, uv));
        }
        mesh.indices.extend([base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_outward_winding(mesh: &MeshData, center: Vec3) {
        for tri in mesh.indices.chunks_exact(3) {
            let p: Vec<Vec3> = tri
                .iter()
                .map(|&i| Vec3::from_array(mesh.vertices[i as usize].position))
                .collect();
            let face_normal = (p[1] - p[0]).cross(p[2] - p[0]);
            if face_normal.length() < 1e-9 {
                continue;
            }
            let centroid = (p[0] + p[1] + p[2]) / 3.0;
            assert!(face_normal.dot(centroid - center) > 0.0, "inward face {:?}", tri);
        }
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = sphere(1.0, 8, 8);
        assert_eq!(mesh.vertices.len(), 9 * 9);
        // Two pole rows contribute one triangle per quad.
        assert_eq!(mesh.triangle_count(), 8 * 8 * 2 - 2 * 8);
    }

    #[test]
    fn test_sphere_radius_and_winding() {
        let mesh = sphere(SPHERE_RADIUS, SPHERE_SEGMENTS.0, SPHERE_SEGMENTS.1);
        for v in &mesh.vertices {
            assert!((Vec3::from_array(v.position).length() - SPHERE_RADIUS).abs() < 1e-5);
        }
        assert_outward_winding(&mesh, Vec3::ZERO);
    }

    #[test]
    fn test_torus_counts_and_extent() {
        let mesh = torus(TORUS_RADIUS, TORUS_TUBE, TORUS_SEGMENTS.0, TORUS_SEGMENTS.1);
        assert_eq!(mesh.vertices.len(), 17 * 33);
        assert_eq!(mesh.triangle_count(), 16 * 32 * 2);
        let bounds = mesh.bounds().unwrap();
        let outer = TORUS_RADIUS + TORUS_TUBE;
        assert!((bounds.max.x - outer).abs() < 1e-5);
        assert!((bounds.max.z - TORUS_TUBE).abs() < 1e-5);
    }

    #[test]
    fn test_cuboid_winding() {
        let mesh = cuboid(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_outward_winding(&mesh, Vec3::ZERO);
    }

    #[test]
    fn test_edges_are_unique() {
        let mesh = cuboid(Vec3::ZERO, Vec3::ONE);
        let edges = mesh.edge_indices();
        // 6 faces * (4 border + 1 diagonal); face vertices are not shared.
        assert_eq!(edges.len() / 2, 30);
    }

    #[test]
    fn test_center_moves_bounds_to_origin() {
        let mut mesh = cuboid(Vec3::new(1.0, 2.0, 3.0), Vec3::new(3.0, 4.0, 5.0));
        mesh.center();
        let bounds = mesh.bounds().unwrap();
        assert!(bounds.center().length() < 1e-6);
        assert_eq!(bounds.size(), Vec3::splat(2.0));
    }

    #[test]
    fn test_append_offsets_indices() {
        let mut a = cuboid(Vec3::ZERO, Vec3::ONE);
        let b = cuboid(Vec3::ONE, Vec3::splat(2.0));
        a.append(b);
        assert_eq!(a.vertices.len(), 48);
        assert_eq!(*a.indices.iter().max().unwrap(), 47);
    }
}
