//! Real spherical harmonics: projection of a cubemap onto N bands,
//! cosine-lobe convolution for irradiance, the pre-scaled 3-band shader
//! basis, and rasterization back into a cubemap for inspection.
//!
//! All projection math runs in f64; coefficients only drop to f32 when a
//! visualization cubemap is rendered.

use corona_cubemap::{Cubemap, Face};
use glam::DVec3;

/// Coefficient index for band `l`, order `m`: `l² + l + m`.
pub fn sh_index(l: usize, m: i64) -> usize {
    ((l * l + l) as i64 + m) as usize
}

/// Number of coefficients for a band count: `num_bands²`.
pub fn num_sh_coefficients(num_bands: usize) -> usize {
    num_bands * num_bands
}

/// Polynomial shader basis constants for the pre-scaled 3-band form.
///
/// `PRESCALE[i] * poly_i(dir) == Y_i(dir)` where `poly` is
/// `[1, y, z, x, xy, yz, 3z²−1, xz, x²−y²]` and `Y` matches
/// [`sh_basis`] (Condon-Shortley phase included). A shader evaluating the
/// raw polynomial against pre-scaled coefficients reproduces the SH sum.
const PRESCALE: [f64; 9] = [
    0.282_094_791_773_878,
    -0.488_602_511_902_920,
    0.488_602_511_902_920,
    -0.488_602_511_902_920,
    1.092_548_430_592_079,
    -1.092_548_430_592_079,
    0.315_391_565_252_520,
    -1.092_548_430_592_079,
    0.546_274_215_296_040,
];

fn factorial(n: usize) -> f64 {
    (2..=n).map(|i| i as f64).product()
}

/// Associated Legendre polynomial P_l^m(x) for m ≥ 0.
fn legendre(l: usize, m: usize, x: f64) -> f64 {
    let mut pmm = 1.0;
    if m > 0 {
        let somx2 = ((1.0 - x) * (1.0 + x)).sqrt();
        let mut fact = 1.0;
        for _ in 1..=m {
            pmm *= -fact * somx2;
            fact += 2.0;
        }
    }
    if l == m {
        return pmm;
    }
    let mut pmmp1 = x * (2 * m + 1) as f64 * pmm;
    if l == m + 1 {
        return pmmp1;
    }
    let mut pll = 0.0;
    for ll in (m + 2)..=l {
        pll = ((2 * ll - 1) as f64 * x * pmmp1 - (ll + m - 1) as f64 * pmm) / (ll - m) as f64;
        pmm = pmmp1;
        pmmp1 = pll;
    }
    pll
}

/// SH normalization constant K_l^m.
fn normalization(l: usize, m: usize) -> f64 {
    let num = (2 * l + 1) as f64 * factorial(l - m);
    let den = 4.0 * std::f64::consts::PI * factorial(l + m);
    (num / den).sqrt()
}

/// Evaluate the real SH basis at a unit direction into `out`
/// (length `num_bands²`, indexed by [`sh_index`]).
pub fn sh_basis(dir: DVec3, num_bands: usize, out: &mut [f64]) {
    debug_assert_eq!(out.len(), num_sh_coefficients(num_bands));
    let z = dir.z.clamp(-1.0, 1.0);
    let phi = dir.y.atan2(dir.x);
    let sqrt2 = std::f64::consts::SQRT_2;
    for l in 0..num_bands {
        out[sh_index(l, 0)] = normalization(l, 0) * legendre(l, 0, z);
        for m in 1..=l {
            let k = normalization(l, m) * legendre(l, m, z);
            out[sh_index(l, m as i64)] = sqrt2 * k * (m as f64 * phi).cos();
            out[sh_index(l, -(m as i64))] = sqrt2 * k * (m as f64 * phi).sin();
        }
    }
}

/// Band factors of the clamped cosine lobe, normalized so that band 0 of an
/// irradiance projection directly scales reflected radiance.
///
/// Odd bands above 1 vanish; even bands alternate in sign and decay fast,
/// which is why 3 bands suffice for irradiance.
pub fn cosine_lobe(l: usize) -> f64 {
    match l {
        0 => 1.0,
        1 => 2.0 / 3.0,
        _ if l % 2 == 1 => 0.0,
        _ => {
            let half = l / 2;
            let sign = if (half - 1) % 2 == 0 { 1.0 } else { -1.0 };
            let binom = factorial(l) / (2f64.powi(l as i32) * factorial(half) * factorial(half));
            2.0 * sign / ((l + 2) as f64 * (l - 1) as f64) * binom
        }
    }
}

/// Project a cubemap onto `num_bands` SH bands with per-texel solid-angle
/// weights; optionally convolve with the cosine lobe for irradiance.
pub fn compute_sh(cm: &Cubemap, num_bands: usize, irradiance: bool) -> Vec<DVec3> {
    tracing::debug!(dim = cm.dim(), num_bands, irradiance, "sh projection");
    let n = num_sh_coefficients(num_bands);
    let mut sh = vec![DVec3::ZERO; n];
    let mut basis = vec![0.0; n];
    for face in Face::ALL {
        for y in 0..cm.dim() {
            for x in 0..cm.dim() {
                let dir = cm.direction64(face, x, y);
                let weight = cm.texel_solid_angle(x, y);
                sh_basis(dir, num_bands, &mut basis);
                let color = cm.texel(face, x, y).as_dvec3() * weight;
                for i in 0..n {
                    sh[i] += color * basis[i];
                }
            }
        }
    }
    if irradiance {
        for l in 0..num_bands {
            let factor = cosine_lobe(l);
            for m in -(l as i64)..=(l as i64) {
                sh[sh_index(l, m)] *= factor;
            }
        }
    }
    sh
}

/// 3-band irradiance coefficients pre-multiplied by the polynomial shader
/// basis constants, ready for direct polynomial evaluation in a shader.
pub fn compute_sh3_prescaled(cm: &Cubemap) -> Vec<DVec3> {
    let mut sh = compute_sh(cm, 3, true);
    for (c, k) in sh.iter_mut().zip(PRESCALE) {
        *c *= k;
    }
    sh
}

/// Rasterize raw SH coefficients into a cubemap.
pub fn render_sh(dst: &mut Cubemap, sh: &[DVec3], num_bands: usize) {
    let n = num_sh_coefficients(num_bands).min(sh.len());
    let mut basis = vec![0.0; num_sh_coefficients(num_bands)];
    for face in Face::ALL {
        for y in 0..dst.dim() {
            for x in 0..dst.dim() {
                let dir = dst.direction64(face, x, y);
                sh_basis(dir, num_bands, &mut basis);
                let mut color = DVec3::ZERO;
                for i in 0..n {
                    color += sh[i] * basis[i];
                }
                dst.set_texel(face, x, y, color.as_vec3());
            }
        }
    }
}

/// Rasterize pre-scaled 3-band coefficients by evaluating the raw
/// polynomial basis, exactly as a shader would.
pub fn render_sh3_prescaled(dst: &mut Cubemap, sh: &[DVec3]) {
    debug_assert!(sh.len() >= 9);
    for face in Face::ALL {
        for y in 0..dst.dim() {
            for x in 0..dst.dim() {
                let d = dst.direction64(face, x, y);
                let poly = [
                    1.0,
                    d.y,
                    d.z,
                    d.x,
                    d.x * d.y,
                    d.y * d.z,
                    3.0 * d.z * d.z - 1.0,
                    d.x * d.z,
                    d.x * d.x - d.y * d.y,
                ];
                let mut color = DVec3::ZERO;
                for i in 0..9 {
                    color += sh[i] * poly[i];
                }
                dst.set_texel(face, x, y, color.as_vec3());
            }
        }
    }
}
