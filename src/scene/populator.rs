use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::materials::MaterialId;
use super::store::{GeometryId, ObjectEntry, SceneGraphStore};

/// Side of the origin-centered cube objects are scattered in.
pub const SCATTER_EXTENT: f32 = 10.0;
pub const TORUS_MAX_SCALE: f32 = 1.0;
pub const SPHERE_MAX_SCALE: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopulateReport {
    /// Pairs asked for.
    pub requested: usize,
    pub toruses: usize,
    pub spheres: usize,
}

impl PopulateReport {
    pub fn added(&self) -> usize {
        self.toruses + self.spheres
    }

    /// True when the population cap cut the batch short.
    pub fn capped(&self) -> bool {
        self.toruses < self.requested
    }
}

/// Scatters toruses and spheres with random transforms.
pub struct Populator {
    rng: StdRng,
}

impl Populator {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }

    /// Appends `count` torus/sphere pairs, interleaved.
    ///
    /// Only whole pairs are added; when the store's cap is too close, the
    /// batch shrinks to what fits.
    pub fn populate(&mut self, store: &mut SceneGraphStore, count: usize) -> PopulateReport {
        let pairs = count.min(store.remaining_capacity() / 2);
        let rng = &mut self.rng;
        let batch: Vec<ObjectEntry> = (0..pairs)
            .flat_map(|_| [random_torus(rng), random_sphere(rng)])
            .collect();
        let inserted = store.insert_generated(batch);
        debug_assert_eq!(inserted.inserted, pairs * 2);

        let report = PopulateReport {
            requested: count,
            toruses: pairs,
            spheres: pairs,
        };
        if report.capped() {
            log::warn!(
                "population cap of {} reached: added {} of {} requested pairs",
                store.max_populated(),
                pairs,
                count
            );
        } else {
            log::debug!("populated {} objects ({} total)", report.added(), store.len());
        }
        report
    }
}

pub fn random_torus<R: Rng + ?Sized>(rng: &mut R) -> ObjectEntry {
    random_entry(rng, GeometryId::Torus, MaterialId::Torus, TORUS_MAX_SCALE)
}

pub fn random_sphere<R: Rng + ?Sized>(rng: &mut R) -> ObjectEntry {
    random_entry(rng, GeometryId::Sphere, MaterialId::Sphere, SPHERE_MAX_SCALE)
}

fn random_entry<R: Rng + ?Sized>(
    rng: &mut R,
    geometry: GeometryId,
    material: MaterialId,
    max_scale: f32,
) -> ObjectEntry {
    let mut axis = || (rng.gen::<f32>() - 0.5) * SCATTER_EXTENT;
    let position = Vec3::new(axis(), axis(), axis());
    let rotation = Vec2::new(rng.gen::<f32>() * PI, rng.gen::<f32>() * PI);
    let scale = rng.gen::<f32>() * max_scale;

    ObjectEntry {
        geometry,
        material,
        position,
        rotation,
        scale,
    }
}
