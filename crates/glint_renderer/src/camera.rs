//! Thin-lens camera for ray generation.

use crate::sampling::random_in_unit_disk;
use glint_math::{Ray, Vec3};
use rand::RngCore;

/// Camera construction parameters.
#[derive(Debug, Clone, Copy)]
pub struct CameraConfig {
    /// Eye position
    pub look_from: Vec3,
    /// Point the camera faces
    pub look_at: Vec3,
    /// View-up direction used to orient the image plane
    pub vup: Vec3,
    /// Vertical field of view in degrees
    pub vfov: f32,
    /// Width over height of the image
    pub aspect_ratio: f32,
    /// Lens diameter; 0 disables depth of field
    pub aperture: f32,
    /// Distance from the eye to the plane of perfect focus
    pub focus_dist: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            aspect_ratio: 16.0 / 9.0,
            aperture: 0.0,
            focus_dist: 1.0,
        }
    }
}

/// Camera for generating rays into the scene.
///
/// Immutable after construction; one instance is shared read-only by all
/// render workers.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    lower_left_corner: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
    u: Vec3,
    v: Vec3,
    lens_radius: f32,
}

impl Camera {
    /// Build a camera from its configuration.
    ///
    /// Derives the orthonormal basis (w, u, v) from the look direction and
    /// view-up vector, then scales the viewport onto the focus plane so
    /// that defocused rays converge exactly at `focus_dist`.
    pub fn new(config: &CameraConfig) -> Self {
        let theta = config.vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = config.aspect_ratio * viewport_height;

        let w = (config.look_from - config.look_at).normalize();
        let u = config.vup.cross(w).normalize();
        let v = w.cross(u);

        let origin = config.look_from;
        let horizontal = config.focus_dist * viewport_width * u;
        let vertical = config.focus_dist * viewport_height * v;
        let lower_left_corner =
            origin - horizontal / 2.0 - vertical / 2.0 - config.focus_dist * w;

        Self {
            origin,
            lower_left_corner,
            horizontal,
            vertical,
            u,
            v,
            lens_radius: config.aperture / 2.0,
        }
    }

    /// Generate a ray through image-plane coordinates (s, t).
    ///
    /// s runs left to right and t bottom to top, nominally in [0, 1];
    /// values outside that range extrapolate beyond the viewport edges.
    /// With a non-zero aperture the ray origin is jittered inside the lens
    /// disk, which is the only case that consumes random draws.
    pub fn get_ray(&self, s: f32, t: f32, rng: &mut dyn RngCore) -> Ray {
        let offset = if self.lens_radius > 0.0 {
            let rd = self.lens_radius * random_in_unit_disk(rng);
            self.u * rd.x + self.v * rd.y
        } else {
            Vec3::ZERO
        };

        Ray::new(
            self.origin + offset,
            self.lower_left_corner + s * self.horizontal + t * self.vertical
                - self.origin
                - offset,
        )
    }
}
