use std::time::Instant;

use image::{Rgb, RgbImage};
use rayon::prelude::*;

use crate::camera::Camera;
use crate::integrator::shade;
use crate::scene::{closest_intersection, Scene};
use crate::vector::Vec3;

/// Which per-pixel quantity the renderer produces.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RenderMode {
    Depth,
    Normal,
    Full,
}

/// Options the core rendering pass needs, independent of how they were parsed.
#[derive(Debug, Copy, Clone)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub max_depth: u32,
}

/// The 8-bit-with-clamp-to-255 quantization, shared by all three render modes.
fn quantize(y: f64) -> u8 {
    (y * 256.0).floor().clamp(0.0, 255.0) as u8
}

/// Renders `scene` through `camera` according to `options`, parallelizing over scanlines with
/// `rayon`. Prints coarse stage timing to stdout in the manner of the teacher's own render
/// loop.
pub fn render(scene: &Scene, camera: &Camera, options: RenderOptions) -> RgbImage {
    let render_time = Instant::now();
    let image = match options.mode {
        RenderMode::Depth => render_depth(scene, camera),
        RenderMode::Normal => render_normal(scene, camera),
        RenderMode::Full => render_full(scene, camera, options.max_depth),
    };
    println!("Render took {:?}", render_time.elapsed());
    image
}

fn for_each_pixel<T: Send + Default + Copy>(
    camera: &Camera,
    f: impl Fn(u32, u32) -> T + Sync,
) -> Vec<T> {
    let width = camera.width as usize;
    let height = camera.height as usize;
    let mut buffer = vec![T::default(); width * height];

    buffer
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(i, row)| {
            for (j, pixel) in row.iter_mut().enumerate() {
                *pixel = f(j as u32, i as u32);
            }
        });

    buffer
}

fn render_depth(scene: &Scene, camera: &Camera) -> RgbImage {
    let distances: Vec<Option<f64>> = for_each_pixel(camera, |j, i| {
        let ray = camera.pixel_to_ray(j, i);
        closest_intersection(&ray, scene).map(|hit| hit.intersection.distance)
    });

    let d_max = distances
        .iter()
        .filter_map(|d| *d)
        .fold(0.0_f64, f64::max);

    let mut image = RgbImage::new(camera.width, camera.height);
    for (index, distance) in distances.into_iter().enumerate() {
        let x = (index % camera.width as usize) as u32;
        let y = (index / camera.width as usize) as u32;
        let pixel = match distance {
            None => Rgb([255, 255, 255]),
            Some(_) if d_max == 0.0 => Rgb([255, 255, 255]),
            Some(d) => {
                let v = quantize(d / d_max);
                Rgb([v, v, v])
            }
        };
        image.put_pixel(x, y, pixel);
    }
    image
}

fn render_normal(scene: &Scene, camera: &Camera) -> RgbImage {
    let normals: Vec<Option<Vec3>> = for_each_pixel(camera, |j, i| {
        let ray = camera.pixel_to_ray(j, i);
        closest_intersection(&ray, scene).map(|hit| hit.intersection.normal)
    });

    let mut image = RgbImage::new(camera.width, camera.height);
    for (index, normal) in normals.into_iter().enumerate() {
        let x = (index % camera.width as usize) as u32;
        let y = (index / camera.width as usize) as u32;
        let pixel = match normal {
            None => Rgb([0, 0, 0]),
            Some(n) => Rgb([
                quantize(n.x / 2.0 + 0.5),
                quantize(n.y / 2.0 + 0.5),
                quantize(n.z / 2.0 + 0.5),
            ]),
        };
        image.put_pixel(x, y, pixel);
    }
    image
}

fn render_full(scene: &Scene, camera: &Camera, max_depth: u32) -> RgbImage {
    let colors: Vec<Vec3> = for_each_pixel(camera, |j, i| {
        let ray = camera.pixel_to_ray(j, i);
        shade(scene, &ray, false, 0, max_depth)
    });

    let c_max = colors.iter().fold(0.0_f64, |m, c| m.max(c.max_component()));

    let mut image = RgbImage::new(camera.width, camera.height);
    for (index, color) in colors.into_iter().enumerate() {
        let x = (index % camera.width as usize) as u32;
        let y = (index / camera.width as usize) as u32;
        let pixel = if c_max == 0.0 {
            Rgb([0, 0, 0])
        } else {
            let tone_map = |x: f64| {
                let y = x * (1.0 + x / (c_max * c_max)) / (1.0 + x);
                y.powf(1.0 / 2.2)
            };
            Rgb([
                quantize(tone_map(color.x)),
                quantize(tone_map(color.y)),
                quantize(tone_map(color.z)),
            ])
        };
        image.put_pixel(x, y, pixel);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::primitives::Sphere;
    use crate::scene::SphereObject;

    fn single_sphere_scene() -> Scene {
        let mut scene = Scene::default();
        scene.materials.push(Material::unnamed("mat"));
        scene.spheres.push(SphereObject {
            material: 0,
            sphere: Sphere::new(Vec3::new(0.0, 0.0, 0.0), 1.0),
        });
        scene
    }

    fn test_camera() -> Camera {
        Camera::look_at(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            std::f64::consts::FRAC_PI_2,
            16,
            16,
        )
    }

    #[test]
    fn depth_mode_misses_are_white() {
        let scene = Scene::default();
        let camera = test_camera();
        let image = render_depth(&scene, &camera);
        assert_eq!(*image.get_pixel(0, 0), Rgb([255, 255, 255]));
    }

    #[test]
    fn depth_mode_center_pixel_is_not_white_when_hit() {
        let scene = single_sphere_scene();
        let camera = test_camera();
        let image = render_depth(&scene, &camera);
        let center = *image.get_pixel(8, 8);
        assert_ne!(center, Rgb([255, 255, 255]));
    }

    #[test]
    fn normal_mode_misses_are_black() {
        let scene = Scene::default();
        let camera = test_camera();
        let image = render_normal(&scene, &camera);
        assert_eq!(*image.get_pixel(0, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn full_mode_with_no_lights_and_black_materials_is_all_black() {
        let scene = single_sphere_scene();
        let camera = test_camera();
        let image = render_full(&scene, &camera, 4);
        for pixel in image.pixels() {
            assert_eq!(*pixel, Rgb([0, 0, 0]));
        }
    }

    #[test]
    fn quantize_clamps_to_255() {
        assert_eq!(quantize(10.0), 255);
        assert_eq!(quantize(0.0), 0);
    }
}
