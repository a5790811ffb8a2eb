//! Lux - CPU Path Tracing
//!
//! A Monte Carlo path tracer for spheres with diffuse, metal and glass
//! materials, a thin-lens camera, and a multi-threaded renderer that splits
//! the sample budget across workers with progress reporting and cooperative
//! cancellation.

mod camera;
mod error;
mod hittable;
mod material;
mod renderer;
mod scene;
mod sphere;

pub use camera::Camera;
pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{
    Color, Dielectric, Lambertian, Material, MaterialId, Metal, REFLECTANCE_THRESHOLD,
};
pub use renderer::{
    color_to_rgb, ray_color, Framebuffer, RenderConfig, RenderControl, RenderOutcome, Renderer,
    T_MIN,
};
pub use scene::Scene;
pub use sphere::Sphere;

/// Re-export Vec3 and common math types from lux_math
pub use lux_math::{Interval, Ray, Vec3, Vec3Ext};
