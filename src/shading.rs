use crate::primitives::Triangle;
use crate::vector::Vec3;

/// Mirror-reflects `incident` about unit normal `normal`.
///
/// Built the way the reference implementation builds it (perpendicular component negated, then
/// added back twice) rather than the shorter `i - 2*(i.n)*n` so the two stay numerically identical.
pub fn reflect(incident: Vec3, normal: Vec3) -> Vec3 {
    let perp = -normal * incident.dot(normal);
    let to_add = incident + perp;
    perp + to_add
}

/// Snell refraction. `eta` is n_from/n_to. Returns `None` on total internal reflection.
pub fn refract(incident: Vec3, normal: Vec3, eta: f64) -> Option<Vec3> {
    let perp = -normal * incident.dot(normal);
    let t_perp = incident + perp;
    let sin_theta_1 = t_perp.len();
    let sin_theta_2 = eta * sin_theta_1;

    if sin_theta_2 > 1.0 {
        return None;
    }

    let cos_theta_2 = (1.0 - sin_theta_2 * sin_theta_2).sqrt();
    Some(t_perp * eta - normal * cos_theta_2)
}

/// Barycentric weights of `point` with respect to `triangle`, assuming `point` lies on the
/// triangle's plane. Returns (w_a, w_b, w_c).
pub fn barycentric(triangle: &Triangle, point: Vec3) -> (f64, f64, f64) {
    let area = triangle.area();
    let p = point - triangle.a;
    let v = (triangle.b - triangle.a).cross(p).len() / (2.0 * area);
    let u = (triangle.c - triangle.a).cross(p).len() / (2.0 * area);
    (1.0 - u - v, u, v)
}

/// Lambertian diffuse term: Kd ⊙ I · max(0, N·L).
pub fn lambertian(kd: Vec3, light_intensity: Vec3, normal: Vec3, to_light: Vec3) -> Vec3 {
    let cos_theta = normal.dot(to_light).max(0.0);
    kd * light_intensity * cos_theta
}

/// Phong specular term: Ks ⊙ I · max(0, V·R)^Ns.
pub fn phong(ks: Vec3, light_intensity: Vec3, exponent: f64, view: Vec3, reflected: Vec3) -> Vec3 {
    let cos_alpha = view.dot(reflected).max(0.0);
    ks * light_intensity * cos_alpha.powf(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reflect_known_case() {
        // S4
        let r = reflect(Vec3::new(1.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(r.x, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.y, 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn reflect_preserves_length() {
        let i = Vec3::new(0.3, -0.7, 0.2);
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = reflect(i, n);
        assert_abs_diff_eq!(r.len(), i.len(), epsilon = 1e-9);
    }

    #[test]
    fn reflect_is_involution() {
        let i = Vec3::new(0.3, -0.7, 0.2);
        let n = Vec3::new(0.0, 1.0, 0.0);
        let r = reflect(reflect(i, n), n);
        assert_abs_diff_eq!(r.x, i.x, epsilon = 1e-9);
        assert_abs_diff_eq!(r.y, i.y, epsilon = 1e-9);
        assert_abs_diff_eq!(r.z, i.z, epsilon = 1e-9);
    }

    #[test]
    fn refract_identity_at_unit_eta() {
        // S5
        let t = refract(Vec3::new(0.0, -1.0, 0.0), Vec3::new(0.0, 1.0, 0.0), 1.0).unwrap();
        assert_abs_diff_eq!(t.x, 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.y, -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(t.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn refract_total_internal_reflection() {
        // S6
        let i = Vec3::new(1.0, -1.0, 0.0) / 2.0_f64.sqrt();
        let n = Vec3::new(0.0, 1.0, 0.0);
        assert!(refract(i, n, 2.0).is_none());
    }

    #[test]
    fn refract_round_trip_through_interface() {
        // law 4: Refract composed with the inverse eta returns the original direction
        let i = Vec3::new(0.4, -0.9, 0.0).normalised();
        let n = Vec3::new(0.0, 1.0, 0.0);
        let eta = 1.0 / 1.5;
        let refracted = refract(i, n, eta).expect("should refract");
        let back = refract(refracted, n, 1.0 / eta).expect("should refract back");
        assert_abs_diff_eq!(back.x, i.x, epsilon = 1e-9);
        assert_abs_diff_eq!(back.y, i.y, epsilon = 1e-9);
    }

    #[test]
    fn barycentric_known_case() {
        // S3
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let (wa, wb, wc) = barycentric(&tri, Vec3::new(0.25, 0.25, 0.0));
        assert_abs_diff_eq!(wa, 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(wb, 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(wc, 0.25, epsilon = 1e-9);
    }

    #[test]
    fn barycentric_weights_sum_to_one_and_reconstruct() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 1.0),
            Vec3::new(0.0, 3.0, -1.0),
        );
        let p = tri.a * 0.2 + tri.b * 0.5 + tri.c * 0.3;
        let (wa, wb, wc) = barycentric(&tri, p);
        assert_abs_diff_eq!(wa + wb + wc, 1.0, epsilon = 1e-9);
        let reconstructed = tri.a * wa + tri.b * wb + tri.c * wc;
        assert_abs_diff_eq!(reconstructed.x, p.x, epsilon = 1e-9);
        assert_abs_diff_eq!(reconstructed.y, p.y, epsilon = 1e-9);
        assert_abs_diff_eq!(reconstructed.z, p.z, epsilon = 1e-9);
    }
}
