//! Mip chain construction and the raw mip dump.

use std::path::Path;

use corona_cubemap::Cubemap;
use corona_ibl::Kernels;

use crate::config::BakeConfig;
use crate::error::BakeError;
use crate::writer;

/// Build the full mip chain down to a 1x1 face, starting from `base`.
///
/// Each level is a box-filtered half of the previous one, with seams
/// repaired after the filter. The base dimension must be a power of two
/// so the chain lands exactly on 1.
pub fn build_mip_chain<K: Kernels>(kernels: &K, base: Cubemap) -> Result<Vec<Cubemap>, BakeError> {
    let base_dim = base.dim();
    if base_dim == 0 || !base_dim.is_power_of_two() {
        return Err(BakeError::NotPowerOfTwo { size: base_dim });
    }
    let num_levels = base_dim.trailing_zeros() as usize + 1;
    let mut chain = Vec::with_capacity(num_levels);
    chain.push(base);
    let mut dim = base_dim;
    while dim > 1 {
        dim >>= 1;
        let mut next = Cubemap::new(dim);
        kernels.downsample_box(&mut next, &chain[chain.len() - 1]);
        kernels.make_seamless(&mut next);
        chain.push(next);
    }
    Ok(chain)
}

/// Write every chain level's faces as `is_m{level}_{face}{ext}` under
/// `{root}/{base_name}/`, plus a cross PNG per level in debug mode.
pub fn dump_mip_chain(
    chain: &[Cubemap],
    config: &BakeConfig,
    root: &Path,
    base_name: &str,
) -> Result<(), BakeError> {
    let dir = writer::asset_dir(root, base_name)?;
    for (level, cm) in chain.iter().enumerate() {
        if config.debug {
            writer::write_cross_debug(&dir.join(format!("{base_name}_is_m{level}.png")), cm)?;
        }
        writer::write_faces(&dir, &format!("is_m{level}_"), cm, config)?;
    }
    Ok(())
}
