//! Material kinds and surface scattering.
//!
//! Materials are a closed set of three kinds, modeled as one enum and
//! dispatched by pattern match: Lambertian (diffuse), Metal (specular
//! with roughness), and Dielectric (transparent with refraction).

use crate::hittable::HitRecord;
use crate::sampling::{gen_f32, random_in_unit_sphere, random_unit_vector};
use glint_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Outcome of a successful scatter: the surface tint applied to whatever
/// the scattered ray goes on to see, and the scattered ray itself.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Surface material kinds.
#[derive(Debug, Clone, Copy)]
pub enum Material {
    /// Lambertian diffuse material for matte surfaces.
    Lambertian {
        /// Surface color/reflectance.
        albedo: Color,
    },

    /// Metallic material with specular reflection.
    Metal {
        /// Metal color.
        albedo: Color,
        /// Surface roughness (0.0 = mirror, 1.0 = very rough).
        fuzz: f32,
    },

    /// Dielectric (transparent) material with refraction.
    Dielectric {
        /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond).
        refraction_index: f32,
    },
}

impl Material {
    /// Create a Lambertian material with the given albedo color.
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    /// Create a Metal material. Fuzz is clamped to [0, 1].
    pub fn metal(albedo: Color, fuzz: f32) -> Self {
        Material::Metal {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// Create a Dielectric material with the given index of refraction.
    pub fn dielectric(refraction_index: f32) -> Self {
        Material::Dielectric { refraction_index }
    }

    /// Scatter an incoming ray at a surface hit.
    ///
    /// Returns the attenuation and scattered ray, or None if the ray
    /// is absorbed.
    pub fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        match *self {
            Material::Lambertian { albedo } => scatter_lambertian(albedo, rec, rng),
            Material::Metal { albedo, fuzz } => scatter_metal(albedo, fuzz, ray_in, rec, rng),
            Material::Dielectric { refraction_index } => {
                scatter_dielectric(refraction_index, ray_in, rec, rng)
            }
        }
    }
}

/// Diffuse scattering: bounce into a random direction biased around the
/// normal. Always scatters.
fn scatter_lambertian(albedo: Color, rec: &HitRecord, rng: &mut dyn RngCore) -> Option<ScatterResult> {
    let mut scatter_direction = rec.normal + random_unit_vector(rng);

    // Catch degenerate scatter direction
    if scatter_direction.length_squared() < 1e-8 {
        scatter_direction = rec.normal;
    }

    Some(ScatterResult {
        attenuation: albedo,
        scattered: Ray::new(rec.p, scatter_direction),
    })
}

/// Specular reflection, roughened by `fuzz`. Absorbs the ray when the
/// perturbed reflection would point into the surface.
fn scatter_metal(
    albedo: Color,
    fuzz: f32,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let reflected = reflect(ray_in.direction().normalize(), rec.normal);
    let scattered_dir = reflected + fuzz * random_in_unit_sphere(rng);

    if scattered_dir.dot(rec.normal) > 0.0 {
        Some(ScatterResult {
            attenuation: albedo,
            scattered: Ray::new(rec.p, scattered_dir),
        })
    } else {
        None
    }
}

/// Refraction with reflection fallback. The medium does not absorb, so
/// attenuation is always white and the ray always continues.
fn scatter_dielectric(
    refraction_index: f32,
    ray_in: &Ray,
    rec: &HitRecord,
    rng: &mut dyn RngCore,
) -> Option<ScatterResult> {
    let refraction_ratio = if rec.front_face {
        1.0 / refraction_index
    } else {
        refraction_index
    };

    let unit_direction = ray_in.direction().normalize();
    let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
    let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();

    // Check for total internal reflection
    let cannot_refract = refraction_ratio * sin_theta > 1.0;

    let direction = if cannot_refract || reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
        reflect(unit_direction, rec.normal)
    } else {
        refract(unit_direction, rec.normal, refraction_ratio)
    };

    Some(ScatterResult {
        attenuation: Color::ONE,
        scattered: Ray::new(rec.p, direction),
    })
}

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface using Snell's law.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

/// Schlick's approximation for reflectance.
fn reflectance(cosine: f32, refraction_ratio: f32) -> f32 {
    let r0 = ((1.0 - refraction_ratio) / (1.0 + refraction_ratio)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hit_at_origin(material: &Material, normal: Vec3, front_face: bool) -> HitRecord<'_> {
        HitRecord {
            p: Vec3::ZERO,
            normal,
            material,
            t: 1.0,
            front_face,
        }
    }

    #[test]
    fn test_lambertian_always_scatters() {
        let material = Material::lambertian(Color::new(0.8, 0.3, 0.3));
        let rec = hit_at_origin(&material, Vec3::Y, true);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.3));
            assert_eq!(result.scattered.origin(), rec.p);
            // Direction must never be degenerate
            assert!(result.scattered.direction().length_squared() >= 1e-8);
        }
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Material::metal(Color::new(0.9, 0.9, 0.9), 0.0);
        let rec = hit_at_origin(&material, Vec3::Y, true);
        // 45 degree incoming ray in the xz=0 plane
        let ray_in = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
        let dir = result.scattered.direction().normalize();
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((dir - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_absorbs_below_horizon() {
        let material = Material::metal(Color::ONE, 0.0);
        // A hit whose normal points along the incoming ray: the mirror
        // reflection lands on the wrong side of the surface
        let rec = hit_at_origin(&material, Vec3::Y, true);
        let ray_in = Ray::new(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        assert!(material.scatter(&ray_in, &rec, &mut rng).is_none());
    }

    #[test]
    fn test_metal_fuzz_clamped() {
        match Material::metal(Color::ONE, 7.0) {
            Material::Metal { fuzz, .. } => assert_eq!(fuzz, 1.0),
            _ => unreachable!(),
        }
        match Material::metal(Color::ONE, -2.0) {
            Material::Metal { fuzz, .. } => assert_eq!(fuzz, 0.0),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_dielectric_always_scatters_white() {
        let material = Material::dielectric(1.5);
        let rec = hit_at_origin(&material, Vec3::Y, true);
        let ray_in = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, -1.0, 0.2));
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::ONE);
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        let material = Material::dielectric(1.5);
        // Back-face hit (leaving the glass) at a grazing angle:
        // sin(theta) = 0.8, ratio = 1.5, so 1.2 > 1 forces reflection
        let rec = hit_at_origin(&material, Vec3::Y, false);
        let ray_in = Ray::new(Vec3::new(-0.8, 0.6, 0.0), Vec3::new(0.8, -0.6, 0.0));
        let mut rng = StdRng::seed_from_u64(42);

        let result = material.scatter(&ray_in, &rec, &mut rng).unwrap();
        let expected = Vec3::new(0.8, 0.6, 0.0);
        assert!((result.scattered.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_reflectance_endpoints() {
        // Normal incidence on glass: r0 = ((1-1.5)/(1+1.5))^2 = 0.04
        assert!((reflectance(1.0, 1.5) - 0.04).abs() < 1e-6);
        // Grazing incidence approaches full reflection
        assert!((reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_refract_straight_through() {
        // Normal incidence with matched indices passes straight through
        let refracted = refract(Vec3::new(0.0, -1.0, 0.0), Vec3::Y, 1.0);
        assert!((refracted - Vec3::new(0.0, -1.0, 0.0)).length() < 1e-6);
    }
}
