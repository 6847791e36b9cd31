//! Sphere primitive for ray tracing.

use crate::hittable::{HitRecord, Hittable};
use crate::material::Material;
use glint_math::{Interval, Ray, Vec3};
use std::sync::Arc;

/// A sphere primitive.
///
/// The material is shared: many spheres may hold the same `Arc`.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            material,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'_>> {
        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let p = ray.at(root);
        let outward_normal = (p - self.center) / self.radius;
        let mut rec = HitRecord {
            p,
            normal: outward_normal,
            material: self.material.as_ref(),
            t: root,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);

        Some(rec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Color;

    fn test_sphere(center: Vec3, radius: f32) -> Sphere {
        Sphere::new(
            center,
            radius,
            Arc::new(Material::lambertian(Color::new(0.5, 0.5, 0.5))),
        )
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let interval = Interval::new(0.001, f32::INFINITY);

        let rec = sphere.hit(&ray, interval).expect("should hit");
        assert!((rec.t - 0.5).abs() < 0.001); // Should hit at t=0.5
        assert!(rec.front_face);
        assert!((rec.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-4);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let interval = Interval::new(0.001, f32::INFINITY);

        assert!(sphere.hit(&ray, interval).is_none());
    }

    #[test]
    fn test_hit_point_matches_ray_at() {
        let sphere = test_sphere(Vec3::new(1.0, 2.0, -3.0), 1.25);
        let ray = Ray::new(Vec3::new(0.5, 1.0, 4.0), Vec3::new(0.1, 0.2, -1.4));
        let interval = Interval::new(0.001, f32::INFINITY);

        let rec = sphere.hit(&ray, interval).expect("should hit");
        assert!((ray.at(rec.t) - rec.p).length() < 1e-4);
        // Accepted parameter lies strictly inside the interval
        assert!(interval.surrounds(rec.t));
    }

    #[test]
    fn test_hit_from_inside_flips_normal() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);

        // Ray starts at the sphere center, so it must hit the back face
        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::new(0.0, 0.0, -1.0));
        let interval = Interval::new(0.001, f32::INFINITY);

        let rec = sphere.hit(&ray, interval).expect("should hit");
        assert!(!rec.front_face);
        assert!((rec.t - 0.5).abs() < 1e-4);
        // Normal points against the ray even on a back-face hit
        assert!(rec.normal.dot(ray.direction()) < 0.0);
    }

    #[test]
    fn test_near_root_excluded_selects_far_root() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        // Roots are at t=0.5 and t=1.5; exclude the near one
        let rec = sphere
            .hit(&ray, Interval::new(1.0, f32::INFINITY))
            .expect("should hit far root");
        assert!((rec.t - 1.5).abs() < 1e-4);
        assert!(!rec.front_face);
    }

    #[test]
    fn test_both_roots_outside_interval() {
        let sphere = test_sphere(Vec3::new(0.0, 0.0, -1.0), 0.5);
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!(sphere.hit(&ray, Interval::new(2.0, f32::INFINITY)).is_none());
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.25)).is_none());
    }

    #[test]
    fn test_shared_material_reference() {
        let material = Arc::new(Material::metal(Color::new(0.7, 0.6, 0.5), 0.1));
        let a = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, Arc::clone(&material));
        let b = Sphere::new(Vec3::new(0.0, 0.0, -5.0), 0.5, Arc::clone(&material));

        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));
        let interval = Interval::new(0.001, f32::INFINITY);

        let rec_a = a.hit(&ray, interval).expect("should hit");
        let rec_b = b.hit(&ray, interval).expect("should hit");

        // Both records borrow the same shared material value
        assert!(std::ptr::eq(rec_a.material, rec_b.material));
    }
}
