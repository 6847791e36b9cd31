//! Glint - CPU path tracing renderer.
//!
//! A Monte Carlo path tracer over spheres: a thin-lens camera generates
//! rays, a recursive integrator bounces them through three material kinds
//! (diffuse, metal, glass), and a lock-free row scheduler spreads the
//! per-pixel sampling across a fixed pool of worker threads.

mod sampling;
mod material;
mod hittable;
mod sphere;
mod camera;
mod rows;
mod renderer;

pub use sampling::{
    gen_f32, gen_f32_range, random_in_hemisphere, random_in_unit_disk, random_in_unit_sphere,
    random_unit_vector, random_vec3_range,
};
pub use material::{Color, Material, ScatterResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use sphere::Sphere;
pub use camera::{Camera, CameraConfig};
pub use rows::{Rgb8, RowQueue};
pub use renderer::{
    color_to_rgb, ray_color, render, render_pixel, ImageBuffer, RenderConfig, RenderError,
};

/// Re-export common math types from glint_math
pub use glint_math::{Interval, Ray, Vec3};
