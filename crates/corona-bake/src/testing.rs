//! Stub kernels for exercising the pipeline scheduling without running
//! the real filters.

use std::cell::RefCell;

use corona_cubemap::{Cubemap, Face, Image};
use corona_ibl::Kernels;
use glam::{DVec3, Vec3};

/// Records every kernel call and produces cheap deterministic data.
#[derive(Default)]
pub struct StubKernels {
    downsample: RefCell<Vec<u32>>,
    seamless: RefCell<Vec<u32>>,
    filters: RefCell<Vec<FilterCall>>,
}

/// One recorded `roughness_filter` invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCall {
    pub dim: u32,
    pub linear_roughness: f64,
    pub num_samples: u32,
    pub chain_len: usize,
}

impl StubKernels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destination dimensions of recorded downsamples, in call order.
    pub fn downsample_dims(&self) -> Vec<u32> {
        self.downsample.borrow().clone()
    }

    /// Dimensions passed to seam repair, in call order.
    pub fn seamless_dims(&self) -> Vec<u32> {
        self.seamless.borrow().clone()
    }

    /// Recorded prefilter invocations, in call order.
    pub fn filter_calls(&self) -> Vec<FilterCall> {
        self.filters.borrow().clone()
    }
}

impl Kernels for StubKernels {
    fn downsample_box(&self, dst: &mut Cubemap, src: &Cubemap) {
        assert_eq!(dst.dim() * 2, src.dim());
        self.downsample.borrow_mut().push(dst.dim());
    }

    fn make_seamless(&self, cm: &mut Cubemap) {
        self.seamless.borrow_mut().push(cm.dim());
    }

    fn compute_sh(&self, _cm: &Cubemap, num_bands: usize, irradiance: bool) -> Vec<DVec3> {
        let bias = if irradiance { 0.5 } else { 0.0 };
        (0..num_bands * num_bands)
            .map(|i| DVec3::splat(i as f64 + bias))
            .collect()
    }

    fn compute_sh3_prescaled(&self, _cm: &Cubemap) -> Vec<DVec3> {
        (0..9).map(|i| DVec3::splat(i as f64 * 0.1)).collect()
    }

    fn render_sh(&self, dst: &mut Cubemap, sh: &[DVec3], _num_bands: usize) {
        fill(dst, sh[0].as_vec3());
    }

    fn render_sh3_prescaled(&self, dst: &mut Cubemap, sh: &[DVec3]) {
        fill(dst, sh[0].as_vec3());
    }

    fn roughness_filter(
        &self,
        dst: &mut Cubemap,
        chain: &[Cubemap],
        linear_roughness: f64,
        num_samples: u32,
    ) {
        self.filters.borrow_mut().push(FilterCall {
            dim: dst.dim(),
            linear_roughness,
            num_samples,
            chain_len: chain.len(),
        });
    }

    fn integrate_brdf(&self, dst: &mut Image, _multiscatter: bool) {
        // A gradient keyed on the row index, so serialization order is
        // observable in tests.
        let size = dst.width();
        for y in 0..size {
            for x in 0..size {
                let v = Vec3::new(
                    x as f32 / size as f32,
                    y as f32 / size as f32,
                    0.0,
                );
                dst.set_pixel(x, y, v);
            }
        }
    }
}

fn fill(cm: &mut Cubemap, value: Vec3) {
    for face in Face::ALL {
        for y in 0..cm.dim() {
            for x in 0..cm.dim() {
                cm.set_texel(face, x, y, value);
            }
        }
    }
}
