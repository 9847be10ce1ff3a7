use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use super::materials::MaterialId;

/// Shared mesh an object instance draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeometryId {
    BoundarySphere,
    Text,
    Torus,
    Sphere,
}

impl GeometryId {
    pub const ALL: [GeometryId; 4] = [
        GeometryId::BoundarySphere,
        GeometryId::Text,
        GeometryId::Torus,
        GeometryId::Sphere,
    ];
}

/// One placed object. Immutable once inserted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectEntry {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub position: Vec3,
    /// Euler x/y in radians; z is always zero.
    pub rotation: Vec2,
    /// Uniform across all three axes.
    pub scale: f32,
}

impl ObjectEntry {
    /// Identity transform at the origin.
    pub fn fixed(geometry: GeometryId, material: MaterialId) -> Self {
        Self {
            geometry,
            material,
            position: Vec3::ZERO,
            rotation: Vec2::ZERO,
            scale: 1.0,
        }
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0),
            self.position,
        )
    }
}

/// Outcome of appending a generated batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertReport {
    pub requested: usize,
    pub inserted: usize,
}

impl InsertReport {
    pub fn capped(&self) -> bool {
        self.inserted < self.requested
    }
}

/// Append-only store of scene objects.
///
/// Fixed objects (boundary, text) do not count toward the population cap;
/// generated objects do. `revision` bumps on every insertion so renderers
/// can detect when instance data needs re-uploading.
#[derive(Debug, Clone)]
pub struct SceneGraphStore {
    entries: Vec<ObjectEntry>,
    populated: usize,
    max_populated: usize,
    revision: u64,
}

impl SceneGraphStore {
    pub fn new(max_populated: usize) -> Self {
        Self {
            entries: Vec::new(),
            populated: 0,
            max_populated,
            revision: 0,
        }
    }

    pub fn insert_fixed(&mut self, entry: ObjectEntry) {
        self.entries.push(entry);
        self.revision += 1;
    }

    /// Appends generated objects, dropping whatever would exceed the cap.
    pub fn insert_generated(&mut self, batch: impl IntoIterator<Item = ObjectEntry>) -> InsertReport {
        let mut report = InsertReport { requested: 0, inserted: 0 };
        for entry in batch {
            report.requested += 1;
            if self.populated < self.max_populated {
                self.entries.push(entry);
                self.populated += 1;
                report.inserted += 1;
            }
        }
        if report.inserted > 0 {
            self.revision += 1;
        }
        report
    }

    /// Generated objects still accepted before the cap.
    pub fn remaining_capacity(&self) -> usize {
        self.max_populated.saturating_sub(self.populated)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn populated_len(&self) -> usize {
        self.populated
    }

    pub fn max_populated(&self) -> usize {
        self.max_populated
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn entries(&self) -> &[ObjectEntry] {
        &self.entries
    }

    pub fn iter_geometry(&self, geometry: GeometryId) -> impl Iterator<Item = &ObjectEntry> {
        self.entries.iter().filter(move |e| e.geometry == geometry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn torus_at(x: f32) -> ObjectEntry {
        ObjectEntry {
            geometry: GeometryId::Torus,
            material: MaterialId::Torus,
            position: Vec3::new(x, 0.0, 0.0),
            rotation: Vec2::ZERO,
            scale: 0.5,
        }
    }

    #[test]
    fn test_fixed_entries_do_not_count_toward_cap() {
        let mut store = SceneGraphStore::new(2);
        store.insert_fixed(ObjectEntry::fixed(GeometryId::BoundarySphere, MaterialId::Boundary));
        store.insert_fixed(ObjectEntry::fixed(GeometryId::Text, MaterialId::Text));
        assert_eq!(store.len(), 2);
        assert_eq!(store.populated_len(), 0);
        assert_eq!(store.remaining_capacity(), 2);
    }

    #[test]
    fn test_cap_drops_overflow() {
        let mut store = SceneGraphStore::new(3);
        let report = store.insert_generated((0..5).map(|i| torus_at(i as f32)));
        assert_eq!(report, InsertReport { requested: 5, inserted: 3 });
        assert!(report.capped());
        assert_eq!(store.populated_len(), 3);

        let report = store.insert_generated([torus_at(9.0)]);
        assert_eq!(report.inserted, 0);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_revision_tracks_insertions() {
        let mut store = SceneGraphStore::new(1);
        assert_eq!(store.revision(), 0);
        store.insert_generated([torus_at(0.0)]);
        assert_eq!(store.revision(), 1);
        store.insert_generated([torus_at(1.0)]);
        assert_eq!(store.revision(), 1, "nothing inserted, nothing changed");
    }

    #[test]
    fn test_model_matrix_uniform_scale() {
        let entry = ObjectEntry {
            scale: 2.0,
            rotation: Vec2::new(0.3, 1.1),
            ..torus_at(1.0)
        };
        let (scale, _, translation) = entry.model_matrix().to_scale_rotation_translation();
        assert!((scale - Vec3::splat(2.0)).abs().max_element() < 1e-5);
        assert_eq!(translation, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_iter_geometry_filters() {
        let mut store = SceneGraphStore::new(10);
        store.insert_fixed(ObjectEntry::fixed(GeometryId::Text, MaterialId::Text));
        store.insert_generated([torus_at(0.0), torus_at(1.0)]);
        assert_eq!(store.iter_geometry(GeometryId::Torus).count(), 2);
        assert_eq!(store.iter_geometry(GeometryId::Sphere).count(), 0);
    }
}
