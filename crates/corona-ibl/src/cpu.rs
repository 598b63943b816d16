//! The production CPU implementation of the kernel set.

use corona_cubemap::{Cubemap, Image};
use glam::DVec3;

use crate::{Kernels, brdf, downsample, ggx, seamless, sh};

/// Single-threaded CPU kernels. Stateless; construct freely.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuKernels;

impl Kernels for CpuKernels {
    fn downsample_box(&self, dst: &mut Cubemap, src: &Cubemap) {
        downsample::downsample_box(dst, src);
    }

    fn make_seamless(&self, cm: &mut Cubemap) {
        seamless::make_seamless(cm);
    }

    fn compute_sh(&self, cm: &Cubemap, num_bands: usize, irradiance: bool) -> Vec<DVec3> {
        sh::compute_sh(cm, num_bands, irradiance)
    }

    fn compute_sh3_prescaled(&self, cm: &Cubemap) -> Vec<DVec3> {
        sh::compute_sh3_prescaled(cm)
    }

    fn render_sh(&self, dst: &mut Cubemap, sh: &[DVec3], num_bands: usize) {
        sh::render_sh(dst, sh, num_bands);
    }

    fn render_sh3_prescaled(&self, dst: &mut Cubemap, sh: &[DVec3]) {
        sh::render_sh3_prescaled(dst, sh);
    }

    fn roughness_filter(
        &self,
        dst: &mut Cubemap,
        chain: &[Cubemap],
        linear_roughness: f64,
        num_samples: u32,
    ) {
        ggx::roughness_filter(dst, chain, linear_roughness, num_samples);
    }

    fn integrate_brdf(&self, dst: &mut Image, multiscatter: bool) {
        brdf::integrate_brdf(dst, multiscatter);
    }
}
