//! Thin-lens camera for ray generation.
//!
//! The image plane sits at the focus distance, so points on that plane are
//! sharp and blur grows with distance from it in proportion to the lens
//! radius. The camera can be re-aimed, re-focused and panned between renders;
//! every mutator re-derives the image-plane vectors before returning.

use lux_math::{random_in_unit_disk, Vec3};
use rand::RngCore;

use crate::Ray;

/// Camera for generating rays into the scene.
#[derive(Debug, Clone)]
pub struct Camera {
    // Lens settings
    aspect_ratio: f32,
    vfov: f32, // Vertical field of view in degrees
    lens_radius: f32,

    // View basis
    origin: Vec3,
    view_dir: Vec3,
    right: Vec3,
    up: Vec3,

    // Focus plane
    focus_dist: f32,
    viewport_width: f32,
    viewport_height: f32,

    // Image plane, derived from everything above
    horizontal: Vec3,
    vertical: Vec3,
    lower_left_corner: Vec3,
}

impl Camera {
    /// Create a camera at `lookfrom` aimed at `lookat`, focused on the plane
    /// through `focusat`.
    ///
    /// - `vup`: up hint, must not be parallel to the view direction
    /// - `vfov`: vertical field of view in degrees
    /// - `aperture`: lens diameter, 0.0 = pinhole (everything in focus)
    pub fn new(
        lookfrom: Vec3,
        lookat: Vec3,
        focusat: Vec3,
        vup: Vec3,
        aspect_ratio: f32,
        vfov: f32,
        aperture: f32,
    ) -> Self {
        let mut camera = Self {
            aspect_ratio,
            vfov,
            lens_radius: aperture / 2.0,
            origin: lookfrom,
            view_dir: Vec3::NEG_Z,
            right: Vec3::X,
            up: Vec3::Y,
            focus_dist: 1.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
            horizontal: Vec3::ZERO,
            vertical: Vec3::ZERO,
            lower_left_corner: Vec3::ZERO,
        };

        camera.set_basis(lookfrom, lookat, vup);
        camera.set_focus_distance(focusat);
        camera.set_viewport();
        camera.set_image_plane();
        camera
    }

    /// Re-aim the camera. Focus distance and viewport size are kept.
    pub fn orient(&mut self, lookfrom: Vec3, lookat: Vec3, vup: Vec3) {
        self.set_basis(lookfrom, lookat, vup);
        self.set_image_plane();
    }

    /// Re-focus on the plane through `focusat`, keeping the current aim.
    pub fn focus(&mut self, focusat: Vec3) {
        self.set_focus_distance(focusat);
        self.set_viewport();
        self.set_image_plane();
    }

    /// Slide the camera `amount` units along `direction` without turning it.
    pub fn pan(&mut self, direction: Vec3, amount: f32) {
        self.origin += amount * direction.normalize();
        self.set_image_plane();
    }

    /// Generate a ray through the image plane at `(u, v)`, both in `[0, 1]`
    /// from the lower-left corner.
    pub fn get_ray(&self, u: f32, v: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius <= 0.0 {
            Vec3::ZERO
        } else {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.right * rd.x + self.up * rd.y
        };

        let ray_origin = self.origin + offset;
        let target = self.lower_left_corner + u * self.horizontal + v * self.vertical;
        Ray::new(ray_origin, target - ray_origin)
    }

    /// Image height matching this camera's aspect ratio for a given width,
    /// rounded to the nearest pixel and never zero.
    pub fn image_height(&self, image_width: u32) -> u32 {
        ((image_width as f32 / self.aspect_ratio).round() as u32).max(1)
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn view_dir(&self) -> Vec3 {
        self.view_dir
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn focus_dist(&self) -> f32 {
        self.focus_dist
    }

    pub fn lens_radius(&self) -> f32 {
        self.lens_radius
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn vfov(&self) -> f32 {
        self.vfov
    }

    /// Viewport width and height on the focus plane.
    pub fn viewport_size(&self) -> (f32, f32) {
        (self.viewport_width, self.viewport_height)
    }

    pub fn horizontal(&self) -> Vec3 {
        self.horizontal
    }

    pub fn vertical(&self) -> Vec3 {
        self.vertical
    }

    pub fn lower_left_corner(&self) -> Vec3 {
        self.lower_left_corner
    }

    fn set_basis(&mut self, lookfrom: Vec3, lookat: Vec3, vup: Vec3) {
        self.origin = lookfrom;
        self.view_dir = (lookat - lookfrom).normalize();
        self.right = self.view_dir.cross(vup).normalize();
        // Re-orthogonalized; the hint only picks the plane
        self.up = (-self.right).cross(-self.view_dir);
    }

    fn set_focus_distance(&mut self, focusat: Vec3) {
        self.focus_dist = (focusat - self.origin).dot(self.view_dir);
    }

    fn set_viewport(&mut self) {
        let h = (self.vfov.to_radians() / 2.0).tan();
        self.viewport_height = 2.0 * h * self.focus_dist;
        self.viewport_width = self.aspect_ratio * self.viewport_height;
    }

    fn set_image_plane(&mut self) {
        self.horizontal = self.right * self.viewport_width;
        self.vertical = self.up * self.viewport_height;
        self.lower_left_corner = self.origin + self.focus_dist * self.view_dir
            - self.horizontal / 2.0
            - self.vertical / 2.0;
    }
}

impl Default for Camera {
    /// Pinhole camera at the origin looking down -Z with a 16:9 frame.
    fn default() -> Self {
        Self::new(
            Vec3::ZERO,
            Vec3::NEG_Z,
            Vec3::NEG_Z,
            Vec3::Y,
            16.0 / 9.0,
            90.0,
            0.0,
        )
    }
}
