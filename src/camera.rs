use crate::ray::Ray;
use crate::vector::Vec3;

/// Tolerance used when checking whether `up` is (nearly) collinear with `forward`.
const COLLINEAR_EPS: f64 = 1e-6;

/// An orthonormal look-at basis: `right`, `up`, `forward` (in that row order, matching the
/// reference implementation's 3×3 matrix).
#[derive(Debug, Copy, Clone)]
pub struct Basis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

/// A pinhole camera: a position plus the basis and field of view needed to turn a pixel
/// coordinate into a world-space ray.
#[derive(Debug, Copy, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub basis: Basis,
    pub tan_half_fov: f64,
    pub width: u32,
    pub height: u32,
}

impl Camera {
    /// Builds a look-at camera. `up` is the desired world-up; `fallback_up` disambiguates the
    /// degenerate case where `up` is (nearly) parallel to the look direction.
    pub fn look_at(
        from: Vec3,
        to: Vec3,
        up: Vec3,
        fallback_up: Vec3,
        fov: f64,
        width: u32,
        height: u32,
    ) -> Self {
        let forward = (from - to).normalised();

        let right = if up.dot(forward).abs() > 1.0 - COLLINEAR_EPS {
            fallback_up.cross(forward)
        } else {
            up.cross(forward)
        }
        .normalised();

        let new_up = forward.cross(right);

        Camera {
            position: from,
            basis: Basis {
                right,
                up: new_up,
                forward,
            },
            tan_half_fov: (fov / 2.0).tan(),
            width,
            height,
        }
    }

    /// The fallback-up rule: `(0, 0, -1)` when looking from exactly `(0, 2, 0)`, `(0, 0, 1)`
    /// otherwise. Retained verbatim for fidelity to the reference implementation; callers who want
    /// a cleaner default should just pass `(0, 0, 1)` directly.
    pub fn default_fallback_up(look_from: Vec3) -> Vec3 {
        if look_from == Vec3::new(0.0, 2.0, 0.0) {
            Vec3::new(0.0, 0.0, -1.0)
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        }
    }

    /// Converts a pixel coordinate (column `j`, row `i`) into a primary ray.
    pub fn pixel_to_ray(&self, j: u32, i: u32) -> Ray {
        let w = self.width as f64;
        let h = self.height as f64;

        let x = (2.0 * (j as f64 + 0.5) / w - 1.0) * (w / h) * self.tan_half_fov;
        let y = (1.0 - 2.0 * (i as f64 + 0.5) / h) * self.tan_half_fov;

        let screen = Vec3::new(x, y, -1.0);
        let basis = [self.basis.right, self.basis.up, self.basis.forward];

        let mut world_dir = Vec3::new(0.0, 0.0, 0.0);
        for k in 0..3 {
            for (axis, b) in basis.iter().enumerate() {
                world_dir[k] += screen[axis] * b[k];
            }
        }

        Ray::new(self.position, world_dir.normalised())
    }
}
