//! Random sampling helpers for ray tracing.
//!
//! Every function takes the generator as `&mut dyn RngCore`, so callers
//! choose the algorithm (fast per-thread generators for rendering, seeded
//! generators for tests) while the sampling code only relies on uniformity.

use glint_math::Vec3;
use rand::{Rng, RngCore};

/// Generate a uniform random f32 in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen()
}

/// Generate a uniform random f32 in [min, max).
#[inline]
pub fn gen_f32_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Generate a Vec3 with each component uniform in [min, max).
pub fn random_vec3_range(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_f32_range(rng, min, max),
        gen_f32_range(rng, min, max),
        gen_f32_range(rng, min, max),
    )
}

/// Sample a random point inside the unit sphere by rejection sampling.
pub fn random_in_unit_sphere(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = random_vec3_range(rng, -1.0, 1.0);
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Sample a random unit vector uniformly distributed on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let a = gen_f32_range(rng, 0.0, 2.0 * std::f32::consts::PI);
    let z = gen_f32_range(rng, -1.0, 1.0);
    let r = (1.0 - z * z).sqrt();
    Vec3::new(r * a.cos(), r * a.sin(), z)
}

/// Sample a random point inside the unit sphere, flipped into the
/// hemisphere around `normal`.
pub fn random_in_hemisphere(rng: &mut dyn RngCore, normal: Vec3) -> Vec3 {
    let in_unit_sphere = random_in_unit_sphere(rng);
    if in_unit_sphere.dot(normal) > 0.0 {
        in_unit_sphere
    } else {
        -in_unit_sphere
    }
}

/// Sample a random point inside the unit disk (z = 0) by rejection sampling.
pub fn random_in_unit_disk(rng: &mut dyn RngCore) -> Vec3 {
    loop {
        let p = Vec3::new(
            gen_f32_range(rng, -1.0, 1.0),
            gen_f32_range(rng, -1.0, 1.0),
            0.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}
