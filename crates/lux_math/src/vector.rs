//! Vector helpers and random sampling on top of `glam::Vec3`.
//!
//! `Vec3` doubles as point, direction and RGB color. glam already covers the
//! arithmetic operators, dot/cross, length, normalization and componentwise
//! `powf`; this module adds what a path tracer needs on top. All sampling
//! takes an explicit generator so every worker thread can own its own seeded
//! stream.

use glam::Vec3;
use rand::distributions::{Distribution, Standard};
use rand::RngCore;

/// Draw a uniform `f32` in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    Standard.sample(rng)
}

/// Draw a uniform `f32` in `[min, max)`.
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Extra operations on `Vec3` used by the renderer.
pub trait Vec3Ext: Sized {
    /// Componentwise square root (gamma 2 correction).
    fn component_sqrt(self) -> Self;

    /// Angle in radians between two nonzero vectors.
    fn angle_to(self, other: Self) -> f32;

    /// Vector with each component uniform in `[0, 1)`.
    fn random(rng: &mut dyn RngCore) -> Self;

    /// Vector with each component uniform in `[min, max)`.
    fn random_range(rng: &mut dyn RngCore, min: f32, max: f32) -> Self;
}

impl Vec3Ext for Vec3 {
    #[inline]
    fn component_sqrt(self) -> Self {
        Vec3::new(self.x.sqrt(), self.y.sqrt(), self.z.sqrt())
    }

    #[inline]
    fn angle_to(self, other: Self) -> f32 {
        self.normalize().dot(other.normalize()).clamp(-1.0, 1.0).acos()
    }

    fn random(rng: &mut dyn RngCore) -> Self {
        Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng))
    }

    fn random_range(rng: &mut dyn RngCore, min: f32, max: f32) -> Self {
        Vec3::new(
            gen_range(rng, min, max),
            gen_range(rng, min, max),
            gen_range(rng, min, max),
        )
    }
}

/// Uniform point strictly inside the unit sphere, by rejection sampling.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::random_range(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Uniform point strictly inside the unit disk in the z = 0 plane.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(gen_range(rng, -1.0, 1.0), gen_range(rng, -1.0, 1.0), 0.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Mirror `v` about the normal `n`.
#[inline]
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}
