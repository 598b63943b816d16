//! Numeric kernels for IBL baking: box downsampling, seam repair, spherical
//! harmonics, GGX roughness prefiltering, and split-sum BRDF integration.
//!
//! The bake pipeline consumes these through the [`Kernels`] trait so its
//! scheduling logic can be unit-tested with stub filters; [`CpuKernels`] is
//! the production implementation.

mod brdf;
mod convert;
mod cpu;
mod downsample;
mod ggx;
mod sampling;
mod seamless;
mod sh;

use corona_cubemap::{Cubemap, Image};
use glam::DVec3;

pub use convert::{cross_to_cubemap, equirect_to_cubemap};
pub use cpu::CpuKernels;
pub use sh::{num_sh_coefficients, sh_index};

/// The numeric kernels the bake pipeline schedules work onto.
///
/// Implementations must be deterministic: the pipeline's outputs are
/// expected to be reproducible bit-for-bit for a given input and config.
pub trait Kernels {
    /// Box-downsample `src` into `dst`, which has half its dimension.
    fn downsample_box(&self, dst: &mut Cubemap, src: &Cubemap);

    /// Repair face-edge seams in place after downsampling.
    fn make_seamless(&self, cm: &mut Cubemap);

    /// Project the cubemap onto `num_bands` SH bands.
    ///
    /// Returns `num_bands²` RGB coefficients indexed by
    /// [`sh_index`]`(l, m)`. With `irradiance` set, the radiance
    /// coefficients are convolved with the truncated cosine lobe.
    fn compute_sh(&self, cm: &Cubemap, num_bands: usize, irradiance: bool) -> Vec<DVec3>;

    /// Fixed 3-band irradiance coefficients pre-scaled by the polynomial
    /// shader basis constants.
    fn compute_sh3_prescaled(&self, cm: &Cubemap) -> Vec<DVec3>;

    /// Rasterize raw SH coefficients back into a cubemap.
    fn render_sh(&self, dst: &mut Cubemap, sh: &[DVec3], num_bands: usize);

    /// Rasterize pre-scaled 3-band coefficients back into a cubemap.
    fn render_sh3_prescaled(&self, dst: &mut Cubemap, sh: &[DVec3]);

    /// GGX importance-sampled specular prefilter.
    ///
    /// `chain` is the full source mip chain (index 0 sharpest); the kernel
    /// picks a source level per sample direction to bound variance.
    fn roughness_filter(
        &self,
        dst: &mut Cubemap,
        chain: &[Cubemap],
        linear_roughness: f64,
        num_samples: u32,
    );

    /// Fill a square image with the split-sum DFG terms in its first two
    /// channels.
    fn integrate_brdf(&self, dst: &mut Image, multiscatter: bool);
}
