//! Spherical harmonics baking: decomposition, the text coefficient
//! table, the rendered-SH cross, and the debug visualizations.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use corona_cubemap::{Cubemap, OutputFormat};
use corona_ibl::{Kernels, sh_index};
use glam::DVec3;

use crate::config::{BakeConfig, ShConfig, ShSink};
use crate::error::BakeError;
use crate::writer;

/// Run the SH stage if the config enables it.
///
/// Returns the computed coefficients, or `None` when the stage is
/// disabled. The coefficient flavor follows the config: raw radiance,
/// cosine-convolved irradiance, or the pre-scaled 3-band shader basis.
pub fn bake_sh<K: Kernels>(
    kernels: &K,
    cm: &Cubemap,
    config: &BakeConfig,
    debug_dir: &Path,
    base_name: &str,
) -> Result<Option<Vec<DVec3>>, BakeError> {
    let Some(sh_config) = &config.sh else {
        return Ok(None);
    };

    let coefficients = if sh_config.shader_basis {
        kernels.compute_sh3_prescaled(cm)
    } else {
        kernels.compute_sh(cm, sh_config.bands, sh_config.irradiance)
    };

    if sh_config.stdout {
        let stdout = io::stdout();
        write_sh_text(&mut stdout.lock(), &coefficients, sh_config).map_err(|source| {
            BakeError::Write {
                path: PathBuf::from("<stdout>"),
                source,
            }
        })?;
    }

    match &sh_config.sink {
        ShSink::None => {}
        ShSink::Text(path) => {
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                writer::ensure_dir(parent)?;
            }
            let file = File::create(path).map_err(|source| BakeError::Write {
                path: path.clone(),
                source,
            })?;
            let mut out = BufWriter::new(file);
            write_sh_text(&mut out, &coefficients, sh_config)
                .and_then(|()| out.flush())
                .map_err(|source| BakeError::Write {
                    path: path.clone(),
                    source,
                })?;
        }
        ShSink::Cross(path) => {
            let dim = render_dim(cm, config);
            let mut rendered = Cubemap::new(dim);
            if sh_config.shader_basis {
                kernels.render_sh3_prescaled(&mut rendered, &coefficients);
            } else {
                kernels.render_sh(&mut rendered, &coefficients, sh_config.bands);
            }
            writer::write_cross(
                path,
                rendered.image(),
                OutputFormat::from_path(path),
                config.compression.as_deref(),
            )?;
        }
    }

    if config.debug {
        write_debug_renders(kernels, cm, config, sh_config, &coefficients, debug_dir, base_name)?;
    }

    Ok(Some(coefficients))
}

/// Render both debug visualizations: the irradiance reconstruction
/// (`_sh_i`) and the radiance reconstruction (`_sh_r`).
///
/// Whichever flavor the main pass already produced is reused; only the
/// other one costs a second decomposition.
fn write_debug_renders<K: Kernels>(
    kernels: &K,
    cm: &Cubemap,
    config: &BakeConfig,
    sh_config: &ShConfig,
    coefficients: &[DVec3],
    debug_dir: &Path,
    base_name: &str,
) -> Result<(), BakeError> {
    let bands = sh_config.bands;
    let (sh_i, sh_r) = if sh_config.shader_basis {
        (
            kernels.compute_sh(cm, bands, true),
            kernels.compute_sh(cm, bands, false),
        )
    } else if sh_config.irradiance {
        (coefficients.to_vec(), kernels.compute_sh(cm, bands, false))
    } else {
        (kernels.compute_sh(cm, bands, true), coefficients.to_vec())
    };

    let dim = render_dim(cm, config);
    writer::ensure_dir(debug_dir)?;
    for (suffix, sh) in [("_sh_i", &sh_i), ("_sh_r", &sh_r)] {
        let mut rendered = Cubemap::new(dim);
        kernels.render_sh(&mut rendered, sh, bands);
        writer::write_cross_debug(
            &debug_dir.join(format!("{base_name}{suffix}.png")),
            &rendered,
        )?;
    }
    Ok(())
}

fn render_dim(cm: &Cubemap, config: &BakeConfig) -> u32 {
    config.output_size.unwrap_or_else(|| cm.dim())
}

/// Serialize SH coefficients as one text line per coefficient:
///
/// ```text
/// ( 0.123456789012345,  ...,  ...); // L1-1, irradiance
/// ```
fn write_sh_text<W: Write>(
    out: &mut W,
    coefficients: &[DVec3],
    sh_config: &ShConfig,
) -> io::Result<()> {
    let num_bands = if sh_config.shader_basis {
        3
    } else {
        sh_config.bands
    };
    for l in 0..num_bands {
        for m in -(l as i64)..=(l as i64) {
            let c = coefficients[sh_index(l, m)];
            write!(
                out,
                "({:18.15}, {:18.15}, {:18.15}); // L{}{}",
                c.x, c.y, c.z, l, m
            )?;
            if sh_config.irradiance {
                write!(out, ", irradiance")?;
            }
            if sh_config.shader_basis {
                write!(out, ", pre-scaled base")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}
