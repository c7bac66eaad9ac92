use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::parser::mtl;
use crate::primitives::{Sphere, Triangle};
use crate::scene::{Light, Scene, SphereObject, TriangleObject};
use crate::vector::Vec3;

/// Resolves a 1-based or negative OBJ-style index against a list's *current* length.
fn resolve_index(raw: i64, len: usize) -> Result<usize> {
    if raw > 0 {
        let index = raw as usize - 1;
        anyhow::ensure!(index < len, "index {} out of range (have {})", raw, len);
        Ok(index)
    } else if raw < 0 {
        let offset = (-raw) as usize;
        anyhow::ensure!(offset <= len, "index {} out of range (have {})", raw, len);
        Ok(len - offset)
    } else {
        anyhow::bail!("index 0 is not a valid OBJ index");
    }
}

/// One `(vertex[, texture][, normal])` token from a face line.
struct FaceVertex {
    vertex: i64,
    normal: Option<i64>,
}

fn parse_face_vertex(token: &str) -> Result<FaceVertex> {
    let mut parts = token.split('/');
    let vertex = parts
        .next()
        .filter(|s| !s.is_empty())
        .with_context(|| format!("face token {:?} missing a vertex index", token))?
        .parse::<i64>()
        .with_context(|| format!("face token {:?} has a non-numeric vertex index", token))?;

    let texture = parts.next();
    let normal = parts.next();

    let normal = match normal {
        Some(n) if !n.is_empty() => Some(
            n.parse::<i64>()
                .with_context(|| format!("face token {:?} has a non-numeric normal index", token))?,
        ),
        _ => None,
    };
    let _ = texture; // texture coordinates are parsed but unused: no texture mapping in this renderer

    Ok(FaceVertex { vertex, normal })
}

fn parse_real(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .with_context(|| format!("expected a number, found {:?}", token))
}

fn parse_reals<const N: usize>(tokens: &[&str]) -> Result<[f64; N]> {
    anyhow::ensure!(
        tokens.len() == N,
        "expected {} numbers, found {}",
        N,
        tokens.len()
    );
    let mut out = [0.0; N];
    for (slot, token) in out.iter_mut().zip(tokens) {
        *slot = parse_real(token)?;
    }
    Ok(out)
}

/// Loads a `.obj`-style scene file.
pub fn load(path: &Path) -> Result<Scene> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scene file {}", path.display()))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let mut vertices: Vec<Vec3> = Vec::new();
    let mut normals: Vec<Vec3> = Vec::new();

    let mut scene = Scene::default();
    let mut material_table: HashMap<String, usize> = HashMap::new();
    let mut active_material: Option<usize> = None;

    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let directive = tokens.next().unwrap();
        let rest: Vec<&str> = tokens.collect();
        let context = || format!("{}:{}", path.display(), line_no);

        match directive {
            "v" => {
                let [x, y, z] = parse_reals::<3>(&rest).with_context(context)?;
                vertices.push(Vec3::new(x, y, z));
            }
            "vn" => {
                let [x, y, z] = parse_reals::<3>(&rest).with_context(context)?;
                normals.push(Vec3::new(x, y, z));
            }
            "f" => {
                anyhow::ensure!(
                    rest.len() >= 3,
                    "face needs at least 3 vertices, found {} ({})",
                    rest.len(),
                    context()
                );
                let material = active_material
                    .with_context(|| format!("face declared before any usemtl ({})", context()))?;

                let face_vertices: Vec<FaceVertex> = rest
                    .iter()
                    .map(|t| parse_face_vertex(t))
                    .collect::<Result<_>>()
                    .with_context(context)?;

                let has_normals = face_vertices[0].normal.is_some();

                let positions: Vec<Vec3> = face_vertices
                    .iter()
                    .map(|fv| {
                        resolve_index(fv.vertex, vertices.len()).map(|i| vertices[i])
                    })
                    .collect::<Result<_>>()
                    .with_context(context)?;

                let vertex_normals: Option<Vec<Vec3>> = if has_normals {
                    Some(
                        face_vertices
                            .iter()
                            .map(|fv| {
                                let n = fv.normal.with_context(|| {
                                    format!("face mixes normal and normal-less vertices ({})", context())
                                })?;
                                resolve_index(n, normals.len()).map(|i| normals[i])
                            })
                            .collect::<Result<_>>()
                            .with_context(context)?,
                    )
                } else {
                    None
                };

                // fan triangulation anchored at vertex 0
                for i in 0..positions.len() - 2 {
                    let triangle = Triangle::new(positions[0], positions[i + 1], positions[i + 2]);
                    let object_normals = vertex_normals
                        .as_ref()
                        .map(|n| [n[0], n[i + 1], n[i + 2]]);
                    scene.triangles.push(TriangleObject {
                        material,
                        triangle,
                        normals: object_normals,
                    });
                }
            }
            "P" => {
                let [x, y, z, r, g, b] = parse_reals::<6>(&rest).with_context(context)?;
                scene.lights.push(Light {
                    position: Vec3::new(x, y, z),
                    intensity: Vec3::new(r, g, b),
                });
            }
            "S" => {
                let [x, y, z, radius] = parse_reals::<4>(&rest).with_context(context)?;
                let material = active_material
                    .with_context(|| format!("sphere declared before any usemtl ({})", context()))?;
                scene.spheres.push(SphereObject {
                    material,
                    sphere: Sphere::new(Vec3::new(x, y, z), radius),
                });
            }
            "mtllib" => {
                let file = rest
                    .first()
                    .with_context(|| format!("mtllib missing a filename ({})", context()))?;
                let mtl_path = base_dir.join(file);
                let loaded = mtl::load(&mtl_path).with_context(context)?;
                for material in loaded {
                    let index = scene.materials.len();
                    material_table.insert(material.name.clone(), index);
                    scene.materials.push(material);
                }
            }
            "usemtl" => {
                let name = rest
                    .first()
                    .with_context(|| format!("usemtl missing a name ({})", context()))?;
                let index = material_table
                    .get(*name)
                    .copied()
                    .with_context(|| format!("usemtl references unknown material {:?} ({})", name, context()))?;
                active_material = Some(index);
            }
            _ => {
                // unknown directives are ignored
            }
        }
    }

    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tempfile_path {
        use std::fs;
        use std::path::{Path, PathBuf};

        pub struct TempDir(pub PathBuf);

        impl TempDir {
            pub fn new(tag: &str) -> Self {
                let mut path = std::env::temp_dir();
                path.push(format!(
                    "whitted-raytrace-test-dir-{:?}-{}",
                    std::thread::current().id(),
                    tag
                ));
                fs::create_dir_all(&path).expect("failed to create temp dir");
                TempDir(path)
            }

            pub fn write(&self, name: &str, contents: &str) -> PathBuf {
                let path = self.0.join(name);
                fs::write(&path, contents).expect("failed to write temp file");
                path
            }

            pub fn as_path(&self) -> &Path {
                &self.0
            }
        }

        impl Drop for TempDir {
            fn drop(&mut self) {
                let _ = fs::remove_dir_all(&self.0);
            }
        }
    }

    use tempfile_path::TempDir;

    #[test]
    fn loads_triangle_and_sphere_with_materials() {
        let dir = TempDir::new("basic");
        dir.write("scene.mtl", "newmtl red\nKd 1 0 0\nnewmtl white\nKd 1 1 1\n");
        let scene_path = dir.write(
            "scene.obj",
            "mtllib scene.mtl\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             usemtl red\n\
             f 1 2 3\n\
             usemtl white\n\
             S 0 0 5 1\n\
             P 0 5 0 1 1 1\n",
        );

        let scene = load(&scene_path).expect("should parse");
        assert_eq!(scene.triangles.len(), 1);
        assert_eq!(scene.spheres.len(), 1);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.material(scene.triangles[0].material).name, "red");
        assert_eq!(scene.material(scene.spheres[0].material).name, "white");
    }

    #[test]
    fn quad_face_fan_triangulates_into_two_triangles() {
        let dir = TempDir::new("quad");
        dir.write("scene.mtl", "newmtl m\nKd 1 1 1\n");
        let scene_path = dir.write(
            "scene.obj",
            "mtllib scene.mtl\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 1 1 0\n\
             v 0 1 0\n\
             usemtl m\n\
             f 1 2 3 4\n",
        );
        let scene = load(&scene_path).expect("should parse");
        assert_eq!(scene.triangles.len(), 2);
    }

    #[test]
    fn negative_indices_resolve_against_current_list_length() {
        let dir = TempDir::new("negidx");
        dir.write("scene.mtl", "newmtl m\nKd 1 1 1\n");
        let scene_path = dir.write(
            "scene.obj",
            "mtllib scene.mtl\n\
             usemtl m\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             f -3 -2 -1\n",
        );
        let scene = load(&scene_path).expect("should parse");
        assert_eq!(scene.triangles.len(), 1);
        assert_eq!(scene.triangles[0].triangle.a, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(scene.triangles[0].triangle.c, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn face_with_normals_carries_per_vertex_normals() {
        let dir = TempDir::new("normals");
        dir.write("scene.mtl", "newmtl m\nKd 1 1 1\n");
        let scene_path = dir.write(
            "scene.obj",
            "mtllib scene.mtl\n\
             v 0 0 0\n\
             v 1 0 0\n\
             v 0 1 0\n\
             vn 0 0 1\n\
             vn 0 0 1\n\
             vn 0 0 1\n\
             usemtl m\n\
             f 1//1 2//2 3//3\n",
        );
        let scene = load(&scene_path).expect("should parse");
        assert!(scene.triangles[0].normals.is_some());
    }

    #[test]
    fn face_before_usemtl_is_a_parse_error() {
        let dir = TempDir::new("nomtl");
        let scene_path = dir.write(
            "scene.obj",
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        assert!(load(&scene_path).is_err());
    }

    #[test]
    fn usemtl_with_unknown_name_is_a_parse_error() {
        let dir = TempDir::new("unknownmtl");
        dir.write("scene.mtl", "newmtl m\nKd 1 1 1\n");
        let scene_path = dir.write(
            "scene.obj",
            "mtllib scene.mtl\nusemtl nope\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
        );
        assert!(load(&scene_path).is_err());
    }
}
