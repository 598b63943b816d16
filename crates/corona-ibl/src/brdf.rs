//! Split-sum BRDF integration for the DFG lookup table.

use corona_cubemap::Image;
use glam::{Vec3, Vec2};

use crate::sampling::{hammersley, importance_sample_ggx, reflect};

const SAMPLE_COUNT: u32 = 1024;

/// Schlick-GGX geometry term for a single direction.
fn geometry_schlick_ggx(n_dot: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = (r * r) / 8.0;
    n_dot / (n_dot * (1.0 - k) + k)
}

/// Smith's method combining view and light geometry terms.
fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

/// Integrate the split-sum BRDF terms for one LUT cell.
fn integrate(n_dot_v: f32, roughness: f32, multiscatter: bool) -> Vec2 {
    let v = Vec3::new((1.0 - n_dot_v * n_dot_v).max(0.0).sqrt(), 0.0, n_dot_v);
    let alpha = roughness * roughness;
    let mut a = 0.0f32;
    let mut b = 0.0f32;
    for i in 0..SAMPLE_COUNT {
        let xi = hammersley(i, SAMPLE_COUNT);
        let h = importance_sample_ggx(Vec3::Z, xi, alpha);
        let l = reflect(-v, h);
        let n_dot_l = l.z.max(0.0);
        let n_dot_h = h.z.max(0.0);
        let v_dot_h = v.dot(h).max(0.0);
        if n_dot_l > 0.0 {
            let g = geometry_smith(n_dot_v, n_dot_l, roughness);
            let g_vis = (g * v_dot_h) / (n_dot_h * n_dot_v).max(1e-4);
            let fc = (1.0 - v_dot_h).powi(5);
            if multiscatter {
                // Energy-compensation form: x holds the Fresnel-weighted
                // term, y the full visibility sum.
                a += fc * g_vis;
                b += g_vis;
            } else {
                a += (1.0 - fc) * g_vis;
                b += fc * g_vis;
            }
        }
    }
    let scale = 1.0 / SAMPLE_COUNT as f32;
    Vec2::new(a * scale, b * scale)
}

/// Fill a square image with the DFG terms.
///
/// Row `y` holds roughness `(y + 0.5) / size`, column `x` holds
/// `NoV = (x + 0.5) / size`. The two integration terms land in the red and
/// green channels; blue stays zero. Serialization order (including the
/// bottom-up flip for GL) is the caller's concern.
pub fn integrate_brdf(dst: &mut Image, multiscatter: bool) {
    let size = dst.width();
    debug_assert_eq!(size, dst.height());
    for y in 0..size {
        let roughness = (y as f32 + 0.5) / size as f32;
        for x in 0..size {
            let n_dot_v = (x as f32 + 0.5) / size as f32;
            let dfg = integrate(n_dot_v, roughness, multiscatter);
            dst.set_pixel(x, y, Vec3::new(dfg.x, dfg.y, 0.0));
        }
    }
}
