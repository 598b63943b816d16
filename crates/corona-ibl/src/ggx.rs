//! GGX importance-sampled specular prefilter.

use corona_cubemap::{Cubemap, Face};
use glam::Vec3;
use std::f32::consts::PI;
use tracing::debug;

use crate::sampling::{distribution_ggx, hammersley, importance_sample_ggx, reflect};

/// Prefilter the mip chain into `dst` for one roughness value.
///
/// Uses the split-sum approximation with N = V = R: for every destination
/// texel the half vectors are GGX-importance-sampled around the texel
/// direction and the lit directions are fetched from the source chain. The
/// source mip for each sample is chosen by comparing the sample's solid
/// angle (from the GGX pdf) against the base level's texel solid angle,
/// which is what keeps low-sample counts usable on the rough levels.
///
/// `linear_roughness == 0` degenerates to a passthrough resample of the
/// chain level matching the destination resolution.
pub fn roughness_filter(
    dst: &mut Cubemap,
    chain: &[Cubemap],
    linear_roughness: f64,
    num_samples: u32,
) {
    debug_assert!(!chain.is_empty());
    let alpha = linear_roughness as f32;
    let base_dim = chain[0].dim();
    debug!(
        dim = dst.dim(),
        alpha, num_samples, "ggx prefilter pass"
    );

    if alpha <= 0.0 {
        let level = (base_dim as f32 / dst.dim() as f32).log2().round().max(0.0) as usize;
        let level = level.min(chain.len() - 1);
        mirror_resample(dst, &chain[level]);
        return;
    }

    // Solid angle of one texel of the sharpest source level.
    let sa_texel = 4.0 * PI / (6.0 * (base_dim * base_dim) as f32);
    let max_level = (chain.len() - 1) as f32;

    for face in Face::ALL {
        for y in 0..dst.dim() {
            for x in 0..dst.dim() {
                let n = dst.direction(face, x, y);
                let mut color = Vec3::ZERO;
                let mut weight = 0.0f32;
                for i in 0..num_samples {
                    let xi = hammersley(i, num_samples);
                    let h = importance_sample_ggx(n, xi, alpha);
                    let l = reflect(-n, h).normalize();
                    let n_dot_l = n.dot(l).max(0.0);
                    if n_dot_l <= 0.0 {
                        continue;
                    }
                    let n_dot_h = n.dot(h).max(0.0);
                    // With N = V the pdf over L collapses to D/4.
                    let pdf = (distribution_ggx(n_dot_h, alpha) * 0.25).max(1e-8);
                    let sa_sample = 1.0 / (num_samples as f32 * pdf);
                    let lod = (0.5 * (sa_sample / sa_texel).log2()).clamp(0.0, max_level);
                    let src = &chain[lod.round() as usize];
                    color += src.sample_bilinear(l) * n_dot_l;
                    weight += n_dot_l;
                }
                if weight > 0.0 {
                    color /= weight;
                }
                dst.set_texel(face, x, y, color);
            }
        }
    }
}

/// Copy `src` into `dst` by direction, bilinearly.
fn mirror_resample(dst: &mut Cubemap, src: &Cubemap) {
    for face in Face::ALL {
        for y in 0..dst.dim() {
            for x in 0..dst.dim() {
                let dir = dst.direction(face, x, y);
                dst.set_texel(face, x, y, src.sample_bilinear(dir));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant_chain(base_dim: u32, value: f32) -> Vec<Cubemap> {
        let mut chain = Vec::new();
        let mut dim = base_dim;
        loop {
            let mut cm = Cubemap::new(dim);
            for face in Face::ALL {
                for y in 0..dim {
                    for x in 0..dim {
                        cm.set_texel(face, x, y, Vec3::splat(value));
                    }
                }
            }
            chain.push(cm);
            if dim == 1 {
                break;
            }
            dim /= 2;
        }
        chain
    }

    #[test]
    fn test_constant_environment_is_preserved() {
        let chain = constant_chain(8, 0.5);
        for linear_roughness in [0.0, 0.25, 1.0] {
            let mut dst = Cubemap::new(4);
            roughness_filter(&mut dst, &chain, linear_roughness, 64);
            for face in Face::ALL {
                for y in 0..4 {
                    for x in 0..4 {
                        let p = dst.texel(face, x, y);
                        assert!(
                            (p - Vec3::splat(0.5)).length() < 1e-4,
                            "roughness {linear_roughness}: {p:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_roughness_resamples_matching_level() {
        // Mark the level whose dimension matches the destination.
        let mut chain = constant_chain(8, 0.0);
        let level1_dim = chain[1].dim();
        assert_eq!(level1_dim, 4);
        for face in Face::ALL {
            for y in 0..level1_dim {
                for x in 0..level1_dim {
                    chain[1].set_texel(face, x, y, Vec3::splat(7.0));
                }
            }
        }
        let mut dst = Cubemap::new(4);
        roughness_filter(&mut dst, &chain, 0.0, 16);
        assert_eq!(dst.texel(Face::PosZ, 2, 2), Vec3::splat(7.0));
    }

    #[test]
    fn test_rough_filter_spreads_a_point_light() {
        // A single bright texel on +Z should bleed into neighbors when rough.
        let mut chain = constant_chain(8, 0.0);
        let mid = chain[0].dim() / 2;
        for c in chain.iter_mut() {
            let m = c.dim() / 2;
            c.set_texel(Face::PosZ, m, m, Vec3::splat(8.0));
        }
        let mut sharp = Cubemap::new(8);
        let mut rough = Cubemap::new(8);
        roughness_filter(&mut sharp, &chain, 0.01, 256);
        roughness_filter(&mut rough, &chain, 0.6, 256);
        let off_center = sharp.texel(Face::PosZ, mid + 2, mid).x;
        let off_center_rough = rough.texel(Face::PosZ, mid + 2, mid).x;
        assert!(
            off_center_rough > off_center,
            "rough filter should spread energy: {off_center_rough} vs {off_center}"
        );
    }
}
