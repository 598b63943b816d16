//! Low-discrepancy sampling and tangent-frame helpers shared by the
//! importance-sampled kernels.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

/// Van der Corput radical inverse in base 2.
pub fn radical_inverse_vdc(bits: u32) -> f32 {
    let mut b = bits;
    b = (b << 16) | (b >> 16);
    b = ((b & 0x5555_5555) << 1) | ((b & 0xAAAA_AAAA) >> 1);
    b = ((b & 0x3333_3333) << 2) | ((b & 0xCCCC_CCCC) >> 2);
    b = ((b & 0x0F0F_0F0F) << 4) | ((b & 0xF0F0_F0F0) >> 4);
    b = ((b & 0x00FF_00FF) << 8) | ((b & 0xFF00_FF00) >> 8);
    (b as f32) * 2.328_306_4e-10
}

/// The i-th point of the n-point Hammersley set.
pub fn hammersley(i: u32, n: u32) -> Vec2 {
    Vec2::new(i as f32 / n as f32, radical_inverse_vdc(i))
}

/// Rotate a tangent-space vector into the frame around `normal`.
pub fn tangent_to_world(normal: Vec3, vec: Vec3) -> Vec3 {
    let up = if normal.z.abs() < 0.999 { Vec3::Z } else { Vec3::X };
    let tangent = normal.cross(up).normalize();
    let bitangent = normal.cross(tangent);
    tangent * vec.x + bitangent * vec.y + normal * vec.z
}

/// GGX-distributed half vector around `normal` for a 2D sample point.
///
/// `alpha` is the linear roughness (perceptual roughness squared).
pub fn importance_sample_ggx(normal: Vec3, xi: Vec2, alpha: f32) -> Vec3 {
    let a = alpha.max(0.001);
    let phi = TAU * xi.x;
    let cos_theta = ((1.0 - xi.y) / (1.0 + (a * a - 1.0) * xi.y)).sqrt();
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let h = Vec3::new(phi.cos() * sin_theta, phi.sin() * sin_theta, cos_theta);
    tangent_to_world(normal, h)
}

/// GGX/Trowbridge-Reitz normal distribution function.
pub fn distribution_ggx(n_dot_h: f32, alpha: f32) -> f32 {
    let a2 = alpha * alpha;
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    a2 / (std::f32::consts::PI * denom * denom)
}

/// Mirror reflection of `v` about `n`.
pub fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radical_inverse_first_values() {
        assert_eq!(radical_inverse_vdc(0), 0.0);
        assert!((radical_inverse_vdc(1) - 0.5).abs() < 1e-7);
        assert!((radical_inverse_vdc(2) - 0.25).abs() < 1e-7);
        assert!((radical_inverse_vdc(3) - 0.75).abs() < 1e-7);
    }

    #[test]
    fn test_hammersley_stays_in_unit_square() {
        for i in 0..64 {
            let p = hammersley(i, 64);
            assert!((0.0..1.0).contains(&p.x), "x out of range: {p:?}");
            assert!((0.0..1.0).contains(&p.y), "y out of range: {p:?}");
        }
    }

    #[test]
    fn test_tangent_to_world_preserves_normal() {
        for normal in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, -0.5).normalize()] {
            let out = tangent_to_world(normal, Vec3::Z);
            assert!(
                (out - normal).length() < 1e-5,
                "tangent z should map to normal: {out:?} vs {normal:?}"
            );
        }
    }

    #[test]
    fn test_ggx_samples_concentrate_for_low_roughness() {
        let normal = Vec3::Z;
        let mut min_cos: f32 = 1.0;
        for i in 0..256 {
            let h = importance_sample_ggx(normal, hammersley(i, 256), 0.01);
            min_cos = min_cos.min(h.dot(normal));
        }
        assert!(
            min_cos > 0.9,
            "smooth surface samples should hug the normal, min cos {min_cos}"
        );
    }

    #[test]
    fn test_reflect() {
        let r = reflect(Vec3::new(1.0, -1.0, 0.0).normalize(), Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }
}
