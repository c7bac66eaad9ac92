use crate::primitives::{Sphere, Triangle};
use crate::ray::Ray;
use crate::vector::Vec3;

/// Epsilon used by the quadratic/cubic root classification below.
const EPS: f64 = 1e-12;

/// A hit record: surface point, outward-facing (direction-convention-dependent) normal, and the
/// ray parameter `t` at which it occurred. Normals returned here are normalized.
#[derive(Debug, Copy, Clone)]
pub struct Intersection {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f64,
}

impl Intersection {
    fn new(point: Vec3, normal: Vec3, distance: f64) -> Self {
        Intersection {
            point,
            normal: normal.normalised(),
            distance,
        }
    }
}

/// Ray/sphere intersection. `ray.direction` must be unit length.
pub fn ray_sphere(ray: &Ray, sphere: &Sphere) -> Option<Intersection> {
    let co = ray.origin - sphere.center;

    let b = 2.0 * ray.direction.dot(co);
    let c = co.len_squared() - sphere.radius * sphere.radius;
    let discriminant = b * b - 4.0 * c;

    if discriminant >= EPS {
        let root = discriminant.sqrt();
        let t1 = (-b + root) / 2.0;
        let t2 = (-b - root) / 2.0;

        if t2 <= -EPS && t1 > EPS {
            // origin is inside the sphere: inward-pointing normal
            let point = ray.point_at(t1);
            let normal = -(point - sphere.center);
            Some(Intersection::new(point, normal, t1))
        } else if t2 > EPS && t1 > EPS {
            let point = ray.point_at(t2);
            let normal = point - sphere.center;
            Some(Intersection::new(point, normal, t2))
        } else {
            None
        }
    } else if discriminant.abs() < EPS {
        let t = -b / 2.0;
        let point = ray.point_at(t);
        let normal = point - sphere.center;
        Some(Intersection::new(point, normal, t))
    } else {
        None
    }
}

/// Ray/triangle intersection via Moller-Trumbore. Does not account for per-vertex smooth
/// normals — that replacement happens once the closest hit across the whole scene is known
/// (`scene::closest_intersection`).
pub fn ray_triangle(ray: &Ray, triangle: &Triangle) -> Option<Intersection> {
    let e1 = triangle.b - triangle.a;
    let e2 = triangle.c - triangle.a;
    let h = ray.direction.cross(e2);
    let a = e1.dot(h);

    if a.abs() < EPS {
        return None; // ray parallel to the triangle's plane
    }

    let s = ray.origin - triangle.a;
    let u = s.dot(h) / a;
    if u < -EPS || u > 1.0 + EPS {
        return None;
    }

    let q = s.cross(e1);
    let v = ray.direction.dot(q) / a;
    if v < -EPS || u + v > 1.0 + EPS {
        return None;
    }

    let t = e2.dot(q) / a;
    if t <= EPS {
        return None;
    }

    let point = ray.point_at(t);
    let mut normal = e1.cross(e2);
    if normal.dot(ray.direction) > 0.0 {
        normal = -normal;
    }
    Some(Intersection::new(point, normal, t))
}
