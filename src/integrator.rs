use crate::ray::Ray;
use crate::scene::{closest_intersection, Scene};
use crate::shading::{lambertian, phong, reflect, refract};
use crate::vector::Vec3;

/// Surface offset and shadow-ray identity tolerance.
const EPS: f64 = 1e-4;

/// Hard safety cap on recursion depth, independent of `max_depth`.
const SAFETY_DEPTH: u32 = 64;

/// Recursively shades a ray against the scene.
///
/// `inside_object` tracks whether the ray currently travels inside a refractive sphere; `depth` is
/// the number of bounces already taken, and recursion stops once it reaches `max_depth` or the
/// hard-coded safety cap, whichever comes first.
pub fn shade(scene: &Scene, ray: &Ray, inside_object: bool, depth: u32, max_depth: u32) -> Vec3 {
    if depth >= SAFETY_DEPTH {
        return Vec3::new(0.0, 0.0, 0.0);
    }

    let hit = match closest_intersection(ray, scene) {
        Some(hit) => hit,
        None => return Vec3::new(0.0, 0.0, 0.0),
    };

    let material = hit.material;
    let point = hit.intersection.point;
    let normal = hit.intersection.normal;

    let mut out = material.ambient_color + material.emitted_intensity;

    let view = -ray.direction;
    for light in &scene.lights {
        let to_light = (light.position - point).normalised();

        // shadow ray: from the light toward the hit, must re-hit the same point
        let shadow_ray = Ray::new(light.position, -to_light);
        let occluded = match closest_intersection(&shadow_ray, scene) {
            Some(shadow_hit) => {
                (shadow_hit.intersection.point.x - point.x).abs() > EPS
                    || (shadow_hit.intersection.point.y - point.y).abs() > EPS
                    || (shadow_hit.intersection.point.z - point.z).abs() > EPS
            }
            None => true,
        };
        if occluded {
            continue;
        }

        let reflected_light = reflect(-to_light, normal);

        out += lambertian(material.diffuse_color, light.intensity, normal, to_light)
            * material.albedo.diffuse;
        out += phong(
            material.specular_color,
            light.intensity,
            material.specular_exponent,
            view,
            reflected_light,
        ) * material.albedo.diffuse;
    }

    if depth < max_depth {
        if inside_object && hit.is_sphere {
            let eta = material.refraction_index / 1.0;
            if let Some(refracted) = refract(ray.direction, normal, eta) {
                let next = Ray::new(point - normal * EPS, refracted);
                out += shade(scene, &next, false, depth + 1, max_depth);
            }
        } else if !inside_object && hit.is_sphere {
            let reflected_ray = Ray::new(point + normal * EPS, reflect(ray.direction, normal));
            out += shade(scene, &reflected_ray, false, depth + 1, max_depth) * material.albedo.reflect;

            let eta = 1.0 / material.refraction_index;
            if let Some(refracted) = refract(ray.direction, normal, eta) {
                let refracted_ray = Ray::new(point - normal * EPS, refracted);
                out +=
                    shade(scene, &refracted_ray, true, depth + 1, max_depth) * material.albedo.refract;
            }
        } else if !inside_object && !hit.is_sphere {
            let reflected_ray = Ray::new(point + normal * EPS, reflect(ray.direction, normal));
            out += shade(scene, &reflected_ray, false, depth + 1, max_depth) * material.albedo.reflect;

            let eta = 1.0 / material.refraction_index;
            if let Some(refracted) = refract(ray.direction, normal, eta) {
                let refracted_ray = Ray::new(point - normal * EPS, refracted);
                out += shade(scene, &refracted_ray, false, depth + 1, max_depth)
                    * material.albedo.refract;
            }
        }
        // inside_object=true, !is_sphere: no recursive contribution, triangles have no interior
    }

    out
}
