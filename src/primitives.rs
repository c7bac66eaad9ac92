use crate::vector::Vec3;

/// A sphere, defined by center and radius.
#[derive(Debug, Copy, Clone)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f64) -> Self {
        Sphere { center, radius }
    }
}

/// A triangle, defined by three ordered vertices.
#[derive(Debug, Copy, Clone)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Triangle { a, b, c }
    }

    /// ½‖(b−a)×(c−a)‖
    pub fn area(&self) -> f64 {
        (self.b - self.a).cross(self.c - self.a).len() / 2.0
    }
}
