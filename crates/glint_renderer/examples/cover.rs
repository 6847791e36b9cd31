//! Cover scene path tracer example.
//!
//! Builds the classic random-sphere scene, renders it in parallel, and
//! saves the result as a PNG.

use anyhow::Result;
use glint_renderer::{
    random_vec3_range, render, Camera, CameraConfig, Color, HittableList, Material, RenderConfig,
    Sphere, Vec3,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = RenderConfig {
        image_width: 1200,
        image_height: 800,
        samples_per_pixel: 100,
        max_depth: 50,
        threads: 0,
    };

    let camera = Camera::new(&CameraConfig {
        look_from: Vec3::new(13.0, 2.0, 3.0),
        look_at: Vec3::ZERO,
        vup: Vec3::Y,
        vfov: 20.0,
        aspect_ratio: config.image_width as f32 / config.image_height as f32,
        aperture: 0.1,
        focus_dist: 10.0,
    });

    let start = Instant::now();
    let world = build_scene();
    log::info!("built scene with {} objects in {:?}", world.len(), start.elapsed());

    let frame = render(&camera, &world, &config)?;

    let (width, height) = (frame.width, frame.height);
    let encoded = image::RgbImage::from_raw(width, height, frame.into_raw())
        .ok_or_else(|| anyhow::anyhow!("render output does not match {width}x{height}"))?;
    encoded.save("cover.png")?;
    log::info!("saved cover.png");

    Ok(())
}

fn build_scene() -> HittableList {
    let mut world = HittableList::new();
    let mut rng = SmallRng::from_entropy();

    let ground = Arc::new(Material::lambertian(Color::new(0.5, 0.5, 0.5)));
    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        ground,
    )));

    // All glass spheres share one material
    let glass = Arc::new(Material::dielectric(1.5));

    for a in -11..11 {
        for b in -11..11 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            // Keep the area around the big metal sphere clear
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_material: f32 = rng.gen();
            let material = if choose_material < 0.8 {
                // diffuse
                let albedo =
                    random_vec3_range(&mut rng, 0.0, 1.0) * random_vec3_range(&mut rng, 0.0, 1.0);
                Arc::new(Material::lambertian(albedo))
            } else if choose_material < 0.95 {
                // metal
                let albedo = random_vec3_range(&mut rng, 0.5, 1.0);
                let fuzz = 0.5 * rng.gen::<f32>();
                Arc::new(Material::metal(albedo, fuzz))
            } else {
                // glass
                Arc::clone(&glass)
            };
            world.add(Box::new(Sphere::new(center, 0.2, material)));
        }
    }

    world.add(Box::new(Sphere::new(
        Vec3::new(0.0, 1.0, 0.0),
        1.0,
        Arc::clone(&glass),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::lambertian(Color::new(0.4, 0.2, 0.1))),
    )));
    world.add(Box::new(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.0)),
    )));

    world
}
