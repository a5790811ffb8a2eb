//! Material trait for surface scattering.
//!
//! Every material turns one incoming ray into exactly one outgoing ray and
//! carries a fixed albedo that attenuates whatever light comes back along it.

use crate::{hittable::HitRecord, Ray};
use lux_math::{random_in_unit_sphere, reflect, Vec3, Vec3Ext};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Reflectance above which a dielectric mirrors a ray arriving from outside
/// instead of refracting it.
pub const REFLECTANCE_THRESHOLD: f32 = 0.3;

/// Handle to a material stored in a [`Scene`](crate::Scene).
///
/// Geometry stores handles instead of owning materials, so one material can
/// be shared by any number of primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

impl MaterialId {
    /// Position of the material in its scene's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray into a single outgoing ray leaving `rec.p`.
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Ray;

    /// Attenuation applied to light returning along the scattered ray.
    fn albedo(&self) -> Color;
}

/// Lambertian (diffuse) material.
#[derive(Debug, Clone)]
pub struct Lambertian {
    albedo: Color,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }
}

impl Material for Lambertian {
    fn scatter(&self, _ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Ray {
        // Aim at a random point in the unit sphere sitting on the normal's tip
        let mut scatter_direction = rec.normal + random_in_unit_sphere(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Ray::new(rec.p, scatter_direction)
    }

    fn albedo(&self) -> Color {
        self.albedo
    }
}

/// Metal (specular) material.
#[derive(Debug, Clone)]
pub struct Metal {
    albedo: Color,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn fuzz(&self) -> f32 {
        self.fuzz
    }
}

impl Material for Metal {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, rng: &mut dyn RngCore) -> Ray {
        let reflected = reflect(ray_in.direction(), rec.normal);
        let direction = if self.fuzz > 0.0 {
            reflected + self.fuzz * random_in_unit_sphere(rng)
        } else {
            reflected
        };
        Ray::new(rec.p, direction)
    }

    fn albedo(&self) -> Color {
        self.albedo
    }
}

/// Dielectric (glass) material.
///
/// Refracts by Snell's law, except that rays arriving from outside with a
/// reflectance above [`REFLECTANCE_THRESHOLD`] are mirrored, and rays past the
/// critical angle inside the medium are totally internally reflected. An
/// index of 1.0 passes every ray straight through.
#[derive(Debug, Clone)]
pub struct Dielectric {
    /// Index of refraction
    refractive_index: f32,
    albedo: Color,
}

impl Dielectric {
    /// Create a new Dielectric material.
    ///
    /// - `refractive_index`: 1.0 = air, 1.5 = glass, 2.4 = diamond
    pub fn new(refractive_index: f32) -> Self {
        Self {
            refractive_index,
            albedo: Color::splat(0.98),
        }
    }

    /// Replace the default near-white tint.
    pub fn with_albedo(mut self, albedo: Color) -> Self {
        self.albedo = albedo;
        self
    }

    pub fn refractive_index(&self) -> f32 {
        self.refractive_index
    }

    /// Schlick's approximation for reflectance
    fn reflectance(n1: f32, n2: f32, theta1: f32) -> f32 {
        let r0 = ((n1 - n2) / (n1 + n2)).powi(2);
        r0 + (1.0 - r0) * (1.0 - theta1.cos()).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(&self, ray_in: &Ray, rec: &HitRecord, _rng: &mut dyn RngCore) -> Ray {
        let (n1, n2) = if rec.front_face {
            (1.0, self.refractive_index)
        } else {
            (self.refractive_index, 1.0)
        };

        let direction = ray_in.direction();
        let theta1 = (-direction).angle_to(rec.normal);

        // Matching media never reflect, however grazing the ray
        if rec.front_face
            && n1 != n2
            && Self::reflectance(n1, n2, theta1) > REFLECTANCE_THRESHOLD
        {
            return Ray::new(rec.p, reflect(direction, rec.normal));
        }

        // Total internal reflection
        let sin_theta2 = (n1 / n2) * theta1.sin();
        if sin_theta2 > 1.0 {
            return Ray::new(rec.p, reflect(direction, rec.normal));
        }

        let theta2 = sin_theta2.asin();

        // In-surface component of the incoming direction; zero at normal incidence
        let tangent = (direction + direction.length() * theta1.cos() * rec.normal).normalize_or_zero();
        let refracted = -theta2.cos() * rec.normal + theta2.sin() * tangent;

        Ray::new(rec.p, refracted)
    }

    fn albedo(&self) -> Color {
        self.albedo
    }
}
