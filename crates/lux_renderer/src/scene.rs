//! Scene: a material arena plus the list of objects that reference it.

use crate::{HitRecord, Hittable, HittableList, Material, MaterialId, Ray, Sphere};
use lux_math::{Interval, Vec3};

/// Everything a render needs to intersect: objects and the materials they use.
///
/// Materials live in an append-only arena and are referenced by
/// [`MaterialId`], so many primitives can share one material without shared
/// ownership.
#[derive(Default)]
pub struct Scene {
    materials: Vec<Box<dyn Material>>,
    objects: HittableList,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a material and return its handle.
    pub fn add_material<M: Material + 'static>(&mut self, material: M) -> MaterialId {
        self.materials.push(Box::new(material));
        MaterialId(self.materials.len() - 1)
    }

    /// Look up a material by handle.
    pub fn material(&self, id: MaterialId) -> Option<&dyn Material> {
        self.materials.get(id.0).map(|m| m.as_ref())
    }

    /// Add any hittable object.
    pub fn add(&mut self, object: Box<dyn Hittable>) {
        self.objects.add(object);
    }

    /// Add a sphere bound to a material from this scene.
    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: MaterialId) {
        debug_assert!(material.0 < self.materials.len(), "material {material:?} is not in this scene");
        self.add(Box::new(Sphere::new(center, radius, material)));
    }

    /// Remove all objects, keeping the materials.
    pub fn clear_objects(&mut self) {
        self.objects.clear();
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        self.objects.hit(ray, ray_t)
    }
}
