use crate::intersect::{self, Intersection};
use crate::primitives::{Sphere, Triangle};
use crate::ray::Ray;
use crate::shading::barycentric;
use crate::vector::Vec3;
use crate::material::Material;

/// A triangle in the scene, optionally carrying one normal per vertex for smooth shading.
#[derive(Debug, Clone)]
pub struct TriangleObject {
    pub material: usize,
    pub triangle: Triangle,
    pub normals: Option<[Vec3; 3]>,
}

/// A sphere in the scene.
#[derive(Debug, Clone)]
pub struct SphereObject {
    pub material: usize,
    pub sphere: Sphere,
}

/// A point light.
#[derive(Debug, Copy, Clone)]
pub struct Light {
    pub position: Vec3,
    pub intensity: Vec3,
}

/// The full scene: geometry, lights and an immutable material table.
///
/// Objects hold a `usize` index into `materials` rather than the reference implementation's raw
/// pointer into a hash table, indices stay valid for the scene's whole lifetime because the
/// table is built once by the parser and never mutated afterward.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub triangles: Vec<TriangleObject>,
    pub spheres: Vec<SphereObject>,
    pub lights: Vec<Light>,
    pub materials: Vec<Material>,
}

impl Scene {
    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }
}

/// The winning hit of a `closest_intersection` scan.
pub struct ClosestHit<'a> {
    pub intersection: Intersection,
    pub material: &'a Material,
    pub is_sphere: bool,
}

/// Scans every triangle then every sphere in the scene, keeping the smallest positive `t`
/// (first-seen wins on ties). When the winning hit is a triangle carrying per-vertex normals,
/// its face normal is replaced by the barycentric-weighted, ray-facing interpolation of those
/// normals.
pub fn closest_intersection<'a>(ray: &Ray, scene: &'a Scene) -> Option<ClosestHit<'a>> {
    let mut best: Option<(Intersection, &Material, bool)> = None;
    let mut best_triangle: Option<&TriangleObject> = None;

    for object in &scene.triangles {
        if let Some(hit) = intersect::ray_triangle(ray, &object.triangle) {
            let better = match &best {
                Some((closest, _, _)) => hit.distance < closest.distance,
                None => true,
            };
            if better {
                best_triangle = Some(object);
                best = Some((hit, scene.material(object.material), false));
            }
        }
    }

    for object in &scene.spheres {
        if let Some(hit) = intersect::ray_sphere(ray, &object.sphere) {
            let better = match &best {
                Some((closest, _, _)) => hit.distance < closest.distance,
                None => true,
            };
            if better {
                best_triangle = None;
                best = Some((hit, scene.material(object.material), true));
            }
        }
    }

    let (mut hit, material, is_sphere) = best?;

    if let Some(object) = best_triangle {
        if let Some(normals) = object.normals {
            let (wa, wb, wc) = barycentric(&object.triangle, hit.point);
            let mut smooth = normals[0] * wa + normals[1] * wb + normals[2] * wc;
            if smooth.dot(ray.direction) > 0.0 {
                smooth = -smooth;
            }
            hit.normal = smooth.normalised();
        }
    }

    Some(ClosestHit {
        intersection: hit,
        material,
        is_sphere,
    })
}
