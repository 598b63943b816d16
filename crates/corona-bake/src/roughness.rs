//! Roughness prefilter schedule and execution.
//!
//! One output level per mip of the target size, with roughness spread
//! linearly across levels and sample counts growing as the levels
//! shrink, so the deep (rough) levels keep their variance in check.

use std::path::Path;

use corona_cubemap::Cubemap;
use corona_ibl::Kernels;
use tracing::info;

use crate::config::{BakeConfig, DEFAULT_PREFILTER_SIZE};
use crate::error::BakeError;
use crate::writer;

/// One level of the prefilter schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct RoughnessLevel {
    /// Mip level index; 0 is the sharpest.
    pub level: u32,
    /// Face dimension of this level.
    pub dim: u32,
    /// Perceptual roughness assigned to this level, in `[0, 1]`.
    pub roughness: f64,
    /// `roughness²`, what the GGX lobe actually takes.
    pub linear_roughness: f64,
    /// Importance samples per texel.
    pub num_samples: u32,
}

/// Compute the prefilter schedule for a target face size.
///
/// `output_size` must be a power of two; the schedule has
/// `log2(output_size) + 1` levels, from `output_size` down to 1. Level
/// `i` gets roughness `i / (levels - 1)`; the sample count starts at
/// `base_samples` and doubles on every level from the third onward.
pub fn roughness_schedule(
    output_size: u32,
    base_samples: u32,
) -> Result<Vec<RoughnessLevel>, BakeError> {
    if output_size == 0 || !output_size.is_power_of_two() {
        return Err(BakeError::NotPowerOfTwo { size: output_size });
    }
    let base_exp = output_size.trailing_zeros();
    let num_levels = base_exp + 1;
    let mut num_samples = base_samples;
    let mut schedule = Vec::with_capacity(num_levels as usize);
    for level in 0..num_levels {
        if level >= 2 {
            num_samples *= 2;
        }
        let roughness = if num_levels > 1 {
            (level as f64 / (num_levels - 1) as f64).clamp(0.0, 1.0)
        } else {
            0.0
        };
        schedule.push(RoughnessLevel {
            level,
            dim: 1 << (base_exp - level),
            roughness,
            linear_roughness: roughness * roughness,
            num_samples,
        });
    }
    Ok(schedule)
}

/// Run the prefilter over the whole schedule and write each level's
/// faces as `m{level}_{face}{ext}` under `{root}/{base_name}/`.
pub fn prefilter<K: Kernels>(
    kernels: &K,
    chain: &[Cubemap],
    config: &BakeConfig,
    root: &Path,
    base_name: &str,
) -> Result<(), BakeError> {
    if chain.is_empty() {
        return Err(BakeError::EmptyChain);
    }
    let output_size = config
        .validated_output_size()?
        .unwrap_or(DEFAULT_PREFILTER_SIZE);
    let schedule = roughness_schedule(output_size, config.num_samples)?;
    let dir = writer::asset_dir(root, base_name)?;
    for entry in &schedule {
        if !config.quiet {
            info!(
                "level {}: roughness = {:.3}, roughness(lin) = {:.3}, {} samples",
                entry.level, entry.roughness, entry.linear_roughness, entry.num_samples
            );
        }
        let mut dst = Cubemap::new(entry.dim);
        kernels.roughness_filter(&mut dst, chain, entry.linear_roughness, entry.num_samples);
        if config.debug {
            writer::write_cross_debug(
                &dir.join(format!("{base_name}_roughness_m{}.png", entry.level)),
                &dst,
            )?;
        }
        writer::write_faces(&dir, &format!("m{}_", entry.level), &dst, config)?;
    }
    Ok(())
}
