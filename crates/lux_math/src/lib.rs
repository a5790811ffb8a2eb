// Re-export glam for convenience
pub use glam::*;

// Lux math types
mod interval;
mod ray;
mod vector;

pub use interval::Interval;
pub use ray::Ray;
pub use vector::{
    gen_f32, gen_range, random_in_unit_disk, random_in_unit_sphere, reflect, Vec3Ext,
};
