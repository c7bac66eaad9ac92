use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::material::{Albedo, Material};
use crate::vector::Vec3;

fn parse_real(token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .with_context(|| format!("expected a number, found {:?}", token))
}

fn parse_vec3(tokens: &[&str]) -> Result<Vec3> {
    anyhow::ensure!(tokens.len() == 3, "expected 3 numbers, found {}", tokens.len());
    Ok(Vec3::new(
        parse_real(tokens[0])?,
        parse_real(tokens[1])?,
        parse_real(tokens[2])?,
    ))
}

/// Loads a `.mtl`-style material library.
pub fn load(path: &Path) -> Result<Vec<Material>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading material file {}", path.display()))?;

    let mut materials = Vec::new();
    let mut current: Option<Material> = None;

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
            "newmtl" => {
                if let Some(material) = current.take() {
                    materials.push(material);
                }
                let name = rest
                    .first()
                    .with_context(|| format!("newmtl missing a name ({})", context()))?;
                current = Some(Material::unnamed(*name));
            }
            "Ka" => {
                let material = current
                    .as_mut()
                    .with_context(|| format!("Ka before newmtl ({})", context()))?;
                material.ambient_color = parse_vec3(&rest).with_context(context)?;
            }
            "Kd" => {
                let material = current
                    .as_mut()
                    .with_context(|| format!("Kd before newmtl ({})", context()))?;
                material.diffuse_color = parse_vec3(&rest).with_context(context)?;
            }
            "Ks" => {
                let material = current
                    .as_mut()
                    .with_context(|| format!("Ks before newmtl ({})", context()))?;
                material.specular_color = parse_vec3(&rest).with_context(context)?;
            }
            "Ke" => {
                let material = current
                    .as_mut()
                    .with_context(|| format!("Ke before newmtl ({})", context()))?;
                material.emitted_intensity = parse_vec3(&rest).with_context(context)?;
            }
            "Ns" => {
                let material = current
                    .as_mut()
                    .with_context(|| format!("Ns before newmtl ({})", context()))?;
                let value = rest
                    .first()
                    .with_context(|| format!("Ns missing a value ({})", context()))?;
                material.specular_exponent = parse_real(value).with_context(context)?;
            }
            "Ni" => {
                let material = current
                    .as_mut()
                    .with_context(|| format!("Ni before newmtl ({})", context()))?;
                let value = rest
                    .first()
                    .with_context(|| format!("Ni missing a value ({})", context()))?;
                material.refraction_index = parse_real(value).with_context(context)?;
            }
            "al" => {
                let material = current
                    .as_mut()
                    .with_context(|| format!("al before newmtl ({})", context()))?;
                let v = parse_vec3(&rest).with_context(context)?;
                material.albedo = Albedo {
                    diffuse: v.x,
                    reflect: v.y,
                    refract: v.z,
                };
            }
            _ => {
                // unknown directives are ignored, matching the permissive OBJ/MTL convention
            }
        }
    }

    if let Some(material) = current.take() {
        materials.push(material);
    }

    Ok(materials)
}
