//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Gamma correction
//! - Anti-aliasing via multi-sampling
//! - Row-based parallel scheduling over a fixed thread pool

use crate::camera::Camera;
use crate::hittable::Hittable;
use crate::material::Color;
use crate::rows::{Rgb8, RowQueue};
use crate::sampling::gen_f32;
use glint_math::{Interval, Ray};
use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use thiserror::Error;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output image width in pixels
    pub image_width: u32,
    /// Output image height in pixels
    pub image_height: u32,
    /// Samples per pixel for anti-aliasing
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    /// Worker thread count; 0 uses all available hardware parallelism
    pub threads: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            samples_per_pixel: 100,
            max_depth: 50,
            threads: 0,
        }
    }
}

/// Errors surfaced by the parallel renderer.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("rendered row count of {rendered} should be {expected}")]
    IncompleteRender { rendered: usize, expected: usize },
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It bounces the ray through the
/// scene, multiplying in each surface's attenuation, until the bounce
/// budget runs out, the ray is absorbed, or it escapes into the sky.
pub fn ray_color(ray: &Ray, world: &dyn Hittable, depth: u32, rng: &mut dyn RngCore) -> Color {
    // Out of bounce budget - no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    // The interval starts at 0.001 to avoid shadow acne from rays
    // re-intersecting the surface they just left
    if let Some(rec) = world.hit(ray, Interval::new(0.001, f32::INFINITY)) {
        return match rec.material.scatter(ray, &rec, rng) {
            Some(result) => {
                result.attenuation * ray_color(&result.scattered, world, depth - 1, rng)
            }
            None => Color::ZERO,
        };
    }

    sky_gradient(ray)
}

/// Compute sky gradient background.
fn sky_gradient(ray: &Ray) -> Color {
    let unit_direction = ray.direction().normalize();
    let a = 0.5 * (unit_direction.y + 1.0);
    let white = Color::new(1.0, 1.0, 1.0);
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Clamp a value to [0, 1] range.
#[inline]
pub fn clamp_01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Convert an averaged linear color to a display-ready 8-bit RGB pixel.
pub fn color_to_rgb(color: Color) -> Rgb8 {
    // Apply gamma correction and convert to 0-255
    let r = (255.0 * clamp_01(linear_to_gamma(color.x))) as u8;
    let g = (255.0 * clamp_01(linear_to_gamma(color.y))) as u8;
    let b = (255.0 * clamp_01(linear_to_gamma(color.z))) as u8;
    [r, g, b]
}

/// Render a single pixel with multi-sampling.
///
/// Returns the averaged linear-light color, before tone mapping. Pixel
/// (0, 0) is the top-left corner of the image.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let mut pixel_color = Color::ZERO;

    for _ in 0..config.samples_per_pixel {
        // Jitter each sample inside the pixel footprint; t is flipped so
        // that row 0 lands at the top of the image
        let s = (x as f32 + gen_f32(rng)) / (config.image_width - 1) as f32;
        let t = ((config.image_height - 1 - y) as f32 + gen_f32(rng))
            / (config.image_height - 1) as f32;
        let ray = camera.get_ray(s, t, rng);
        pixel_color += ray_color(&ray, world, config.max_depth, rng);
    }

    // Average the samples
    pixel_color / config.samples_per_pixel as f32
}

/// Finalized render output: a row-major grid of 8-bit RGB pixels.
///
/// Row 0 is the top of the image.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb8>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0]; width as usize * height as usize],
        }
    }

    /// Get the pixel at (x, y); (0, 0) is the top-left corner.
    pub fn get(&self, x: u32, y: u32) -> Rgb8 {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Iterate rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Rgb8]> {
        self.pixels.chunks(self.width as usize)
    }

    /// Flatten into raw RGB bytes (row-major, for encoders).
    pub fn into_raw(self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for pixel in &self.pixels {
            bytes.extend_from_slice(pixel);
        }
        bytes
    }
}

/// Render the entire scene in parallel.
///
/// Worker threads repeatedly claim image rows through a shared atomic
/// counter; a claimed row is rendered completely (every sample of every
/// pixel, tone map included) before the worker claims the next one. Each
/// worker owns an independent random generator seeded from OS entropy.
/// The call returns only after every worker has finished, with the number
/// of rendered rows checked against the image height.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    config: &RenderConfig,
) -> Result<ImageBuffer, RenderError> {
    let width = config.image_width as usize;
    let height = config.image_height as usize;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    log::info!(
        "spawned {} render threads (hardware supports {})",
        pool.current_num_threads(),
        std::thread::available_parallelism().map_or(1, |n| n.get())
    );
    log::info!(
        "rendering {} x {} image at {} samples per pixel",
        config.image_width,
        config.image_height,
        config.samples_per_pixel
    );

    let mut image = ImageBuffer::new(config.image_width, config.image_height);
    let rendered_rows = AtomicUsize::new(0);
    let start = Instant::now();

    {
        let queue = RowQueue::new(&mut image.pixels, width, height);
        pool.broadcast(|_| {
            let mut rng = SmallRng::from_entropy();
            while let Some((row, cells)) = queue.claim() {
                for (x, cell) in cells.iter_mut().enumerate() {
                    let color =
                        render_pixel(camera, world, x as u32, row as u32, config, &mut rng);
                    *cell = color_to_rgb(color);
                }
                rendered_rows.fetch_add(1, Ordering::SeqCst);
            }
        });
    }

    let rendered = rendered_rows.load(Ordering::SeqCst);
    if rendered != height {
        return Err(RenderError::IncompleteRender {
            rendered,
            expected: height,
        });
    }

    let seconds = start.elapsed().as_secs_f64();
    log::info!(
        "finished rendering in {:.3} seconds ({} pixels per second)",
        seconds,
        ((width * height) as f64 / seconds) as u64
    );

    Ok(image)
}
