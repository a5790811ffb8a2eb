//! Simple path tracer example.
//!
//! Renders four spheres on a yellow ground and saves to PPM format.
//! Set `RUST_LOG=debug` to see per-worker progress.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::time::Duration;

use anyhow::Context;
use lux_renderer::{
    Camera, Color, Framebuffer, Lambertian, Metal, RenderConfig, RenderControl, RenderOutcome,
    Renderer, Scene, Vec3,
};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let lookfrom = Vec3::new(-2.0, 0.0, 1.0);
    let lookat = Vec3::new(-2.0, 0.0, -1.0);
    let camera = Camera::new(lookfrom, lookat, lookat, Vec3::Y, 16.0 / 9.0, 70.0, 0.25);

    let config = RenderConfig::for_camera(400, &camera).with_quality(50, 50);
    let renderer = Renderer::new(build_scene(), camera, config)?;

    let mut image = renderer.framebuffer();
    let control = RenderControl::new();

    let outcome = std::thread::scope(|s| {
        let render = s.spawn(|| renderer.render_with_control(&mut image, &control));
        while !render.is_finished() {
            log::debug!("{:.0}% done", control.progress());
            std::thread::sleep(Duration::from_millis(250));
        }
        render.join().map_err(|_| anyhow::anyhow!("render thread panicked"))
    })??;

    if outcome == RenderOutcome::Cancelled {
        anyhow::bail!("render was cancelled");
    }

    let filename = "output.ppm";
    save_ppm(&image, filename).with_context(|| format!("failed to write {filename}"))?;
    log::info!("Saved to {filename}");
    Ok(())
}

fn build_scene() -> Scene {
    let mut scene = Scene::new();

    let ground = scene.add_material(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let center = scene.add_material(Lambertian::new(Color::splat(0.4)));
    let left = scene.add_material(Metal::new(Color::new(0.8, 0.8, 0.8), 0.1));
    let right = scene.add_material(Metal::new(Color::new(0.8, 0.6, 0.2), 0.2));

    let l = std::f32::consts::FRAC_PI_4.cos();
    scene.add_sphere(Vec3::new(0.0, -100.5 * l, -1.0), 100.0 * l, ground);
    scene.add_sphere(Vec3::new(0.0, 0.0, -1.0), 0.45 * l, center);
    scene.add_sphere(Vec3::new(-l, 0.0, -1.0), 0.5 * l, left);
    scene.add_sphere(Vec3::new(l, 0.0, -1.0), 0.5 * l, right);

    log::info!("Created {} objects", scene.object_count());
    scene
}

fn save_ppm(image: &Framebuffer, filename: &str) -> std::io::Result<()> {
    let file = File::create(filename)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width(), image.height())?;
    writeln!(writer, "255")?;

    for rgb in image.to_rgb8().chunks_exact(3) {
        writeln!(writer, "{} {} {}", rgb[0], rgb[1], rgb[2])?;
    }

    writer.flush()
}
