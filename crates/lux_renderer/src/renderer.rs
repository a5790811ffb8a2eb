//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Iterative ray bouncing with a configurable depth budget
//! - Gamma correction per worker partial average
//! - A sample budget split evenly across a fixed pool of worker threads
//! - Scanline progress reporting and per-pixel cooperative cancellation

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Instant;

use lux_math::{gen_f32, Interval, Vec3Ext};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::{Camera, Color, Hittable, Ray, RenderError, RenderResult, Scene};

/// Smallest accepted hit distance. Keeps a bounced ray from re-hitting the
/// surface it just left due to floating-point error.
pub const T_MIN: f32 = 0.001;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels
    pub image_width: u32,
    /// Output height in pixels
    pub image_height: u32,
    /// Samples per pixel, summed over all workers
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Number of worker threads
    pub workers: usize,
    /// Background color when ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Base seed; worker `i` uses `seed + i`
    pub seed: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 400,
            image_height: 225,
            samples_per_pixel: 100,
            max_depth: 50,
            workers: rayon::current_num_threads().max(1),
            background: Color::ONE,
            use_sky_gradient: false,
            seed: 0,
        }
    }
}

impl RenderConfig {
    /// Default configuration sized for `camera` at the given width.
    pub fn for_camera(image_width: u32, camera: &Camera) -> Self {
        Self::default().with_resolution(image_width, camera.image_height(image_width))
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set quality settings.
    pub fn with_quality(mut self, samples_per_pixel: u32, max_depth: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self.max_depth = max_depth;
        self
    }

    /// Set the worker thread count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }

    /// Use the white-to-blue sky instead of the flat background.
    pub fn with_sky_gradient(mut self, enabled: bool) -> Self {
        self.use_sky_gradient = enabled;
        self
    }

    /// Set the base random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check that the configuration can be rendered.
    pub fn validate(&self) -> RenderResult<()> {
        if self.workers == 0 {
            return Err(RenderError::NoWorkers);
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::NoSamples);
        }
        if (self.samples_per_pixel as usize) < self.workers {
            return Err(RenderError::TooFewSamples {
                samples: self.samples_per_pixel,
                workers: self.workers,
            });
        }
        if self.image_width == 0 || self.image_height == 0 {
            return Err(RenderError::EmptyImage {
                width: self.image_width,
                height: self.image_height,
            });
        }
        Ok(())
    }

    /// Samples each worker traces per pixel.
    pub fn samples_per_worker(&self) -> u32 {
        self.samples_per_pixel / self.workers.max(1) as u32
    }
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It follows the ray through the
/// scene for at most `depth` bounces, multiplying in each surface's albedo.
/// Running out of bounces yields black; escaping the scene yields the
/// background.
///
/// `depth` counts intersection tests, the first one included: depth 0 is
/// black without looking at the scene, and depth 1 returns the background on
/// a miss but black on any hit.
pub fn ray_color(
    ray: &Ray,
    scene: &Scene,
    depth: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut ray = *ray;
    let mut throughput = Color::ONE;

    for _ in 0..depth {
        let Some(rec) = scene.hit(&ray, Interval::new(T_MIN, f32::INFINITY)) else {
            return throughput * background(&ray, config);
        };

        // A handle from another scene absorbs everything
        let Some(material) = scene.material(rec.material) else {
            return Color::ZERO;
        };

        throughput *= material.albedo();
        ray = material.scatter(&ray, &rec, rng);
    }

    Color::ZERO
}

fn background(ray: &Ray, config: &RenderConfig) -> Color {
    if config.use_sky_gradient {
        sky_gradient(ray)
    } else {
        config.background
    }
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0). Negative channels become black.
#[inline]
fn gamma_correct(linear: Color) -> Color {
    linear.max(Color::ZERO).component_sqrt()
}

/// Quantize an already gamma-corrected color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.999 * Interval::UNIT.clamp(c)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Accumulated pixel colors, row-major from the top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Framebuffer {
    /// Create a new framebuffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] = color;
    }

    /// Add to the pixel at (x, y).
    pub fn add(&mut self, x: u32, y: u32, color: Color) {
        let index = self.index(x, y);
        self.pixels[index] += color;
    }

    /// Add every pixel of a same-sized buffer into this one.
    pub fn accumulate(&mut self, other: &Framebuffer) {
        debug_assert_eq!((self.width, self.height), (other.width, other.height));
        for (dst, src) in self.pixels.iter_mut().zip(&other.pixels) {
            *dst += *src;
        }
    }

    /// Reset every pixel to black.
    pub fn clear(&mut self) {
        self.pixels.fill(Color::ZERO);
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Convert to packed RGB bytes (for display or saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgb(*c)).collect()
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}

/// Shared progress counter and cancellation flag for a running render.
///
/// Hand the same control to [`Renderer::render_with_control`] and to the
/// thread that wants to watch or stop it.
#[derive(Debug, Default)]
pub struct RenderControl {
    scanlines_done: AtomicUsize,
    scanlines_total: AtomicUsize,
    cancelled: AtomicBool,
}

impl RenderControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask every worker to stop after the pixel it is working on.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Clear the cancellation flag and progress so the control can be reused.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
        self.scanlines_done.store(0, Ordering::Relaxed);
    }

    /// Scanlines finished so far, summed over all workers.
    pub fn scanlines_done(&self) -> usize {
        self.scanlines_done.load(Ordering::Relaxed)
    }

    /// Percentage of the current render completed, in `[0, 100]`.
    pub fn progress(&self) -> f32 {
        let total = self.scanlines_total.load(Ordering::Relaxed);
        if total == 0 {
            return 0.0;
        }
        self.scanlines_done() as f32 / total as f32 * 100.0
    }

    fn begin(&self, total_scanlines: usize) {
        self.scanlines_done.store(0, Ordering::Relaxed);
        self.scanlines_total.store(total_scanlines, Ordering::Relaxed);
    }

    fn finish_scanline(&self) {
        self.scanlines_done.fetch_add(1, Ordering::Relaxed);
    }
}

/// How a render call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    Completed,
    /// Cancelled through [`RenderControl::cancel`]; some pixels were skipped.
    Cancelled,
}

/// A scene, a camera and the settings to render them with.
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    config: RenderConfig,
}

impl Renderer {
    /// Create a renderer, rejecting unusable configurations up front.
    pub fn new(scene: Scene, camera: Camera, config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self {
            scene,
            camera,
            config,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera access for re-aiming between renders.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the configuration, keeping the old one if the new is invalid.
    pub fn set_config(&mut self, config: RenderConfig) -> RenderResult<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Allocate a black framebuffer of the configured size.
    pub fn framebuffer(&self) -> Framebuffer {
        Framebuffer::new(self.config.image_width, self.config.image_height)
    }

    /// Render into a freshly allocated framebuffer.
    pub fn render_image(&self) -> RenderResult<Framebuffer> {
        let mut framebuffer = self.framebuffer();
        self.render(&mut framebuffer)?;
        Ok(framebuffer)
    }

    /// Render the scene, adding the result into `framebuffer`.
    ///
    /// Blocks until every worker has finished. The buffer is only ever added
    /// to, so clear it first unless accumulating on purpose.
    pub fn render(&self, framebuffer: &mut Framebuffer) -> RenderResult<RenderOutcome> {
        self.render_with_control(framebuffer, &RenderControl::new())
    }

    /// Render with an externally owned progress counter and cancel flag.
    pub fn render_with_control(
        &self,
        framebuffer: &mut Framebuffer,
        control: &RenderControl,
    ) -> RenderResult<RenderOutcome> {
        let config = &self.config;
        let expected = (config.image_width, config.image_height);
        let actual = (framebuffer.width(), framebuffer.height());
        if expected != actual {
            return Err(RenderError::FramebufferMismatch { expected, actual });
        }

        let workers = config.workers;
        let samples = config.samples_per_worker();
        let dropped = config.samples_per_pixel - samples * workers as u32;
        if dropped > 0 {
            log::warn!(
                "{} samples per pixel do not split evenly across {} workers, rendering {}",
                config.samples_per_pixel,
                workers,
                samples * workers as u32
            );
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("lux-worker-{i}"))
            .build()?;

        log::info!(
            "Rendering {}x{} @ {} spp, depth {}, on {} workers",
            config.image_width,
            config.image_height,
            samples * workers as u32,
            config.max_depth,
            workers
        );
        let start = Instant::now();
        control.begin(workers * config.image_height as usize);

        // One partial image per worker; each is written by exactly one thread
        let mut partials: Vec<Framebuffer> = (0..workers).map(|_| self.framebuffer()).collect();
        pool.scope(|scope| {
            for (index, partial) in partials.iter_mut().enumerate() {
                scope.spawn(move |_| self.render_worker(index, samples, partial, control));
            }
        });

        for partial in &partials {
            framebuffer.accumulate(partial);
        }

        if control.is_cancelled() {
            log::warn!(
                "Render cancelled at {:.1}% after {:?}",
                control.progress(),
                start.elapsed()
            );
            Ok(RenderOutcome::Cancelled)
        } else {
            log::info!("Rendered in {:?}", start.elapsed());
            Ok(RenderOutcome::Completed)
        }
    }

    /// Render the whole image at `samples` per pixel into `out`, pre-scaled
    /// by the worker count so the partials sum to the final average.
    fn render_worker(
        &self,
        index: usize,
        samples: u32,
        out: &mut Framebuffer,
        control: &RenderControl,
    ) {
        let mut rng = StdRng::seed_from_u64(self.config.seed.wrapping_add(index as u64));
        let weight = 1.0 / self.config.workers as f32;

        for y in 0..self.config.image_height {
            for x in 0..self.config.image_width {
                if control.is_cancelled() {
                    log::debug!("Worker {index} stopping at row {y}");
                    return;
                }
                let color = self.render_pixel(x, y, samples, &mut rng);
                out.set(x, y, color * weight);
            }
            control.finish_scanline();
        }

        log::debug!("Worker {index} finished");
    }

    /// Gamma-corrected average of `samples` paths through pixel (x, y), with
    /// y counted down from the top row.
    fn render_pixel(&self, x: u32, y: u32, samples: u32, rng: &mut dyn RngCore) -> Color {
        let width = self.config.image_width as f32;
        let height = self.config.image_height as f32;
        let row_from_bottom = (self.config.image_height - 1 - y) as f32;

        let mut pixel_color = Color::ZERO;
        for _ in 0..samples {
            let u = (x as f32 + gen_f32(rng)) / width;
            let v = (row_from_bottom + gen_f32(rng)) / height;
            let ray = self.camera.get_ray(u, v, rng);
            pixel_color += ray_color(&ray, &self.scene, self.config.max_depth, &self.config, rng);
        }

        gamma_correct(pixel_color / samples as f32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, MaterialId, Sphere, Vec3};

    /// Diffuse sphere resting on a huge ground sphere, camera at the origin.
    fn two_sphere_scene() -> Scene {
        let mut scene = Scene::new();
        let matte = scene.add_material(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
        scene.add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, matte);
        scene.add_sphere(Vec3::new(0.0, -100.5, -1.0), 100.0, matte);
        scene
    }

    fn camera(aspect_ratio: f32) -> Camera {
        Camera::new(
            Vec3::ZERO,
            Vec3::NEG_Z,
            Vec3::NEG_Z,
            Vec3::Y,
            aspect_ratio,
            90.0,
            0.0,
        )
    }

    fn config(width: u32, height: u32, samples: u32, depth: u32, workers: usize) -> RenderConfig {
        RenderConfig::default()
            .with_resolution(width, height)
            .with_quality(samples, depth)
            .with_workers(workers)
    }

    fn mean_squared_error(a: &Framebuffer, b: &Framebuffer) -> f32 {
        let total: f32 = a
            .pixels()
            .iter()
            .zip(b.pixels())
            .map(|(p, q)| (*p - *q).length_squared())
            .sum();
        total / a.pixels().len() as f32
    }

    fn mean_brightness(image: &Framebuffer) -> f32 {
        let total: f32 = image.pixels().iter().map(|p| p.x + p.y + p.z).sum();
        total / (3 * image.pixels().len()) as f32
    }

    #[test]
    fn test_sky_gradient() {
        // Ray pointing up should be more blue (less red than white)
        let up_color = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0)));
        // Ray pointing down should be white
        let down_color = sky_gradient(&Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 0.0)));

        assert!(up_color.x < down_color.x);
        assert_eq!(down_color, Color::ONE);
    }

    #[test]
    fn test_gamma_correct() {
        assert_eq!(gamma_correct(Color::new(0.0, 1.0, 0.25)), Color::new(0.0, 1.0, 0.5));
        assert_eq!(gamma_correct(Color::new(-1.0, 0.0625, 4.0)), Color::new(0.0, 0.25, 2.0));
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::new(0.0, 0.5, 1.0)), [0, 127, 255]);
        assert_eq!(color_to_rgb(Color::new(-0.2, 1.7, 0.999)), [0, 255, 255]);
    }

    #[test]
    fn test_framebuffer_layout() {
        let mut image = Framebuffer::new(3, 2);
        image.set(2, 0, Color::new(1.0, 0.0, 0.0));
        image.add(0, 1, Color::splat(0.25));
        image.add(0, 1, Color::splat(0.25));

        assert_eq!(image.get(0, 1), Color::splat(0.5));
        let bytes = image.to_rgb8();
        assert_eq!(bytes.len(), 3 * 2 * 3);
        assert_eq!(&bytes[6..9], &[255, 0, 0]);
        assert_eq!(&bytes[9..12], &[127, 127, 127]);

        image.clear();
        assert!(image.pixels().iter().all(|p| *p == Color::ZERO));
    }

    #[test]
    fn test_ray_color_miss_returns_background() {
        let scene = Scene::new();
        let config = RenderConfig::default().with_background(Color::new(0.2, 0.3, 0.4));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert_eq!(ray_color(&ray, &scene, 5, &config, &mut rng), Color::new(0.2, 0.3, 0.4));

        let sky = config.with_sky_gradient(true);
        let up = Ray::new(Vec3::ZERO, Vec3::Y);
        assert_eq!(ray_color(&up, &scene, 5, &sky, &mut rng), Color::new(0.5, 0.7, 1.0));
    }

    #[test]
    fn test_ray_color_single_bounce_off_convex_sphere() {
        let mut scene = Scene::new();
        let matte = scene.add_material(Lambertian::new(Color::new(0.5, 0.25, 1.0)));
        scene.add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5, matte);
        let config = RenderConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);

        // A diffuse bounce off a lone sphere always escapes to the background
        for _ in 0..50 {
            assert_eq!(ray_color(&ray, &scene, 2, &config, &mut rng), Color::new(0.5, 0.25, 1.0));
        }

        // One bounce of budget is spent on the hit itself
        assert_eq!(ray_color(&ray, &scene, 1, &config, &mut rng), Color::ZERO);
        assert_eq!(ray_color(&ray, &scene, 0, &config, &mut rng), Color::ZERO);
    }

    #[test]
    fn test_ray_color_unknown_material_absorbs() {
        let mut scene = Scene::new();
        scene.add(Box::new(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, MaterialId(9))));
        let mut rng = StdRng::seed_from_u64(1);

        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let color = ray_color(&ray, &scene, 10, &RenderConfig::default(), &mut rng);
        assert_eq!(color, Color::ZERO);
    }

    #[test]
    fn test_config_validation() {
        let base = config(8, 4, 4, 5, 2);
        assert!(base.validate().is_ok());

        assert!(matches!(base.clone().with_workers(0).validate(), Err(RenderError::NoWorkers)));
        assert!(matches!(base.clone().with_quality(0, 5).validate(), Err(RenderError::NoSamples)));
        assert!(matches!(
            base.clone().with_quality(3, 5).with_workers(4).validate(),
            Err(RenderError::TooFewSamples { samples: 3, workers: 4 })
        ));
        assert!(matches!(
            base.clone().with_resolution(0, 4).validate(),
            Err(RenderError::EmptyImage { .. })
        ));

        let renderer = Renderer::new(Scene::new(), camera(2.0), base.with_workers(0));
        assert!(renderer.is_err());
    }

    #[test]
    fn test_config_for_camera() {
        let config = RenderConfig::for_camera(400, &camera(2.0));
        assert_eq!(config.image_width, 400);
        assert_eq!(config.image_height, 200);
    }

    #[test]
    fn test_samples_split_across_workers() {
        assert_eq!(config(1, 1, 100, 1, 4).samples_per_worker(), 25);
        assert_eq!(config(1, 1, 10, 1, 4).samples_per_worker(), 2);
    }

    #[test]
    fn test_framebuffer_size_mismatch() {
        let renderer = Renderer::new(two_sphere_scene(), camera(2.0), config(8, 4, 1, 1, 1)).unwrap();
        let mut wrong = Framebuffer::new(4, 8);

        let err = renderer.render(&mut wrong).unwrap_err();
        assert!(matches!(
            err,
            RenderError::FramebufferMismatch { expected: (8, 4), actual: (4, 8) }
        ));
    }

    #[test]
    fn test_depth_zero_renders_black() {
        let renderer = Renderer::new(two_sphere_scene(), camera(2.0), config(20, 10, 1, 0, 1)).unwrap();
        let image = renderer.render_image().unwrap();

        assert!(image.pixels().iter().all(|p| *p == Color::ZERO));
    }

    #[test]
    fn test_empty_scene_renders_background() {
        for workers in [1, 2, 4] {
            let renderer = Renderer::new(Scene::new(), camera(2.0), config(8, 4, 4, 5, workers)).unwrap();
            let image = renderer.render_image().unwrap();
            assert!(image.pixels().iter().all(|p| *p == Color::ONE), "workers = {workers}");
        }

        // Stored values are gamma corrected
        let dim = config(4, 2, 2, 5, 1).with_background(Color::new(0.25, 0.0, 1.0));
        let image = Renderer::new(Scene::new(), camera(2.0), dim).unwrap().render_image().unwrap();
        assert!(image.pixels().iter().all(|p| *p == Color::new(0.5, 0.0, 1.0)));
    }

    #[test]
    fn test_render_adds_into_framebuffer() {
        let renderer = Renderer::new(Scene::new(), camera(2.0), config(4, 2, 1, 1, 1)).unwrap();
        let mut image = renderer.framebuffer();
        renderer.render(&mut image).unwrap();
        renderer.render(&mut image).unwrap();

        assert!(image.pixels().iter().all(|p| *p == Color::splat(2.0)));
    }

    #[test]
    fn test_top_row_sees_sky_and_bottom_row_sees_ground() {
        let scene = two_sphere_scene();
        let config = config(16, 8, 16, 10, 2).with_sky_gradient(true);
        let image = Renderer::new(scene, camera(2.0), config).unwrap().render_image().unwrap();

        // Top-left is open sky, bottom-center is shadowed ground
        let top = image.get(0, 0);
        let bottom = image.get(8, 7);
        assert!(top.length() > bottom.length());
    }

    #[test]
    fn test_progress_reaches_one_hundred() {
        let renderer = Renderer::new(two_sphere_scene(), camera(2.0), config(8, 4, 4, 3, 2)).unwrap();
        let control = RenderControl::new();
        let mut image = renderer.framebuffer();

        let outcome = renderer.render_with_control(&mut image, &control).unwrap();

        assert_eq!(outcome, RenderOutcome::Completed);
        assert_eq!(control.scanlines_done(), 2 * 4);
        assert_eq!(control.progress(), 100.0);
    }

    #[test]
    fn test_cancel_before_start_leaves_buffer_untouched() {
        let renderer = Renderer::new(two_sphere_scene(), camera(2.0), config(8, 4, 4, 3, 2)).unwrap();
        let control = RenderControl::new();
        control.cancel();
        let mut image = renderer.framebuffer();

        let outcome = renderer.render_with_control(&mut image, &control).unwrap();

        assert_eq!(outcome, RenderOutcome::Cancelled);
        assert_eq!(control.progress(), 0.0);
        assert!(image.pixels().iter().all(|p| *p == Color::ZERO));

        control.reset();
        assert!(!control.is_cancelled());
        let outcome = renderer.render_with_control(&mut image, &control).unwrap();
        assert_eq!(outcome, RenderOutcome::Completed);
    }

    #[test]
    fn test_cancel_from_another_thread() {
        let renderer = Renderer::new(two_sphere_scene(), camera(1.0), config(200, 200, 64, 50, 2)).unwrap();
        let control = RenderControl::new();
        let mut image = renderer.framebuffer();

        let outcome = std::thread::scope(|s| {
            let handle = s.spawn(|| renderer.render_with_control(&mut image, &control));
            while control.progress() == 0.0 {
                std::thread::yield_now();
            }
            control.cancel();
            handle.join().expect("render thread panicked")
        })
        .unwrap();

        assert_eq!(outcome, RenderOutcome::Cancelled);
        assert!(control.progress() < 100.0);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let render = |seed: u64| {
            let config = config(8, 4, 8, 5, 4).with_seed(seed);
            Renderer::new(two_sphere_scene(), camera(2.0), config)
                .unwrap()
                .render_image()
                .unwrap()
        };

        assert_eq!(render(3), render(3));
        assert_ne!(render(3), render(4));
    }

    #[test]
    fn test_more_samples_reduce_error() {
        let render = |samples: u32, seed: u64| {
            let config = config(8, 4, samples, 8, 1).with_seed(seed);
            Renderer::new(two_sphere_scene(), camera(2.0), config)
                .unwrap()
                .render_image()
                .unwrap()
        };

        let reference = render(1024, 100);
        let coarse = render(4, 1);
        let fine = render(64, 2);

        assert!(mean_squared_error(&fine, &reference) < mean_squared_error(&coarse, &reference));
    }

    #[test]
    fn test_worker_count_does_not_change_expected_image() {
        let render = |workers: usize| {
            let config = config(16, 8, 64, 8, workers).with_seed(9);
            Renderer::new(two_sphere_scene(), camera(2.0), config)
                .unwrap()
                .render_image()
                .unwrap()
        };

        let single = render(1);
        let many = render(4);

        assert!((mean_brightness(&single) - mean_brightness(&many)).abs() < 0.03);
        assert!(mean_squared_error(&single, &many) < 0.02);
    }
}
