use crate::vector::Vec3;

/// Albedo triple: diffuse / reflective / refractive weights applied to the corresponding shading
/// contributions in the integrator.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Albedo {
    pub diffuse: f64,
    pub reflect: f64,
    pub refract: f64,
}

impl Default for Albedo {
    fn default() -> Self {
        Albedo {
            diffuse: 1.0,
            reflect: 0.0,
            refract: 0.0,
        }
    }
}

/// A surface material, named so the scene's geometry can reference it by a stable key.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient_color: Vec3,
    pub diffuse_color: Vec3,
    pub specular_color: Vec3,
    pub emitted_intensity: Vec3,
    pub specular_exponent: f64,
    pub refraction_index: f64,
    pub albedo: Albedo,
}

impl Material {
    /// A fresh, named material at the default values.
    pub fn unnamed(name: impl Into<String>) -> Self {
        Material {
            name: name.into(),
            ambient_color: Vec3::default(),
            diffuse_color: Vec3::default(),
            specular_color: Vec3::default(),
            emitted_intensity: Vec3::default(),
            specular_exponent: 1.0,
            refraction_index: 1.0,
            albedo: Albedo::default(),
        }
    }
}
