//! The bake driver: load the input, classify its layout, and run the
//! configured stages in order.

use std::path::{Path, PathBuf};

use corona_bake::{
    BakeConfig, BakeError, bake_dfg, bake_sh, base_name, build_mip_chain, dump_mip_chain,
    extract_faces, prefilter, ShSink,
};
use corona_cubemap::{Cubemap, CubemapError, Face, decode};
use corona_ibl::{CpuKernels, Kernels, cross_to_cubemap, equirect_to_cubemap};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Bake(#[from] BakeError),

    #[error(transparent)]
    Cubemap(#[from] CubemapError),

    #[error("input {path} is {width}x{height}; expected a 2:1 panorama or a 4:3 cross")]
    UnsupportedLayout {
        path: PathBuf,
        width: u32,
        height: u32,
    },

    #[error("an input image is required for the requested stages")]
    MissingInput,
}

/// Resolve the effective config: the `--config` file if given, with CLI
/// flags layered on top.
pub fn build_config(args: &crate::args::CliArgs) -> Result<BakeConfig, BakeError> {
    let mut config = match &args.config {
        Some(path) => BakeConfig::load(path)?,
        None => BakeConfig::new(),
    };
    args.apply_overrides(&mut config);
    Ok(config)
}

/// Run every configured stage.
pub fn run(args: &crate::args::CliArgs, config: &BakeConfig) -> Result<(), AppError> {
    let kernels = CpuKernels;

    if let Some(dfg) = &config.dfg {
        info!("integrating {}x{} DFG table", dfg.size, dfg.size);
        bake_dfg(&kernels, dfg, config.compression.as_deref())?;
    }

    let needs_input = config.sh.is_some()
        || config.mipmap_dir.is_some()
        || config.prefilter_dir.is_some()
        || config.extract.is_some();
    if !needs_input {
        return Ok(());
    }

    let input = args.input.as_ref().ok_or(AppError::MissingInput)?;
    let base = load_environment(&kernels, input, config)?;
    let name = base_name(input);
    info!("loaded {} ({} texels per face)", input.display(), base.dim());

    bake_sh(&kernels, &base, config, &sh_debug_dir(config), &name)?;

    if let Some(extract) = &config.extract {
        extract_faces(&base, config, extract, &name)?;
    }

    if config.mipmap_dir.is_some() || config.prefilter_dir.is_some() {
        debug!("building mip chain from {} texels", base.dim());
        let chain = build_mip_chain(&kernels, base)?;
        if let Some(dir) = &config.mipmap_dir {
            dump_mip_chain(&chain, config, dir, &name)?;
        }
        if let Some(dir) = &config.prefilter_dir {
            prefilter(&kernels, &chain, config, dir, &name)?;
        }
    }

    Ok(())
}

/// Decode the input and turn it into a seam-repaired cubemap.
///
/// A 2:1 image is treated as an equirectangular panorama, a 4:3 image
/// as a horizontal cross; anything else is rejected.
fn load_environment<K: Kernels>(
    kernels: &K,
    input: &Path,
    config: &BakeConfig,
) -> Result<Cubemap, AppError> {
    let img = decode(input)?;
    let (w, h) = (img.width(), img.height());
    let size_override = config.validated_output_size()?;

    let mut base = if w == 2 * h {
        let dim = size_override.unwrap_or(w / 4);
        equirect_to_cubemap(&img, dim, config.mirror)?
    } else if w % 4 == 0 && w / 4 * 3 == h {
        let cm = cross_to_cubemap(img, config.mirror)?;
        match size_override {
            Some(dim) if dim != cm.dim() => resample(&cm, dim),
            _ => cm,
        }
    } else {
        return Err(AppError::UnsupportedLayout {
            path: input.to_path_buf(),
            width: w,
            height: h,
        });
    };

    kernels.make_seamless(&mut base);
    Ok(base)
}

/// Bilinear resample a cubemap to a new face dimension.
fn resample(src: &Cubemap, dim: u32) -> Cubemap {
    let mut dst = Cubemap::new(dim);
    for face in Face::ALL {
        for y in 0..dim {
            for x in 0..dim {
                let dir = dst.direction(face, x, y);
                dst.set_texel(face, x, y, src.sample_bilinear(dir));
            }
        }
    }
    dst
}

/// Debug renders land next to the SH sink when there is one, in the
/// working directory otherwise.
fn sh_debug_dir(config: &BakeConfig) -> PathBuf {
    let sink = config.sh.as_ref().map(|sh| &sh.sink);
    match sink {
        Some(ShSink::Cross(path) | ShSink::Text(path)) => match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        },
        _ => PathBuf::from("."),
    }
}
