//! DFG lookup table baking and serialization.
//!
//! The table can land either in an image (any codec extension) or in a
//! C-style text table for embedding. The text form stores half-float
//! bits in GL order, so rows are written bottom-up.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use corona_cubemap::{Image, OutputFormat, encode_linear};
use corona_ibl::Kernels;
use half::f16;

use crate::config::DfgConfig;
use crate::error::BakeError;
use crate::writer;

/// Integrate the DFG terms and write them to the configured path.
pub fn bake_dfg<K: Kernels>(
    kernels: &K,
    config: &DfgConfig,
    compression: Option<&str>,
) -> Result<(), BakeError> {
    let size = config.size;
    let mut image = Image::new(size, size, 3);
    kernels.integrate_brdf(&mut image, config.multiscatter);

    if let Some(parent) = config.path.parent()
        && !parent.as_os_str().is_empty()
    {
        writer::ensure_dir(parent)?;
    }

    if is_text_file(&config.path) {
        let file = File::create(&config.path).map_err(|source| BakeError::Write {
            path: config.path.clone(),
            source,
        })?;
        let mut out = BufWriter::new(file);
        write_dfg_table(&mut out, &image, &config.path)
            .and_then(|()| out.flush())
            .map_err(|source| BakeError::Write {
                path: config.path.clone(),
                source,
            })?;
        Ok(())
    } else {
        encode_linear(
            &config.path,
            &image,
            OutputFormat::from_path(&config.path),
            compression,
        )?;
        Ok(())
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Source-code extensions get the text serialization.
fn is_text_file(path: &Path) -> bool {
    matches!(
        extension(path).as_deref(),
        Some("h" | "hpp" | "c" | "cpp" | "inc" | "txt")
    )
}

/// `.inc` files are bare value lists meant for splicing into an
/// existing array definition; everything else gets the array wrapper.
fn is_include_file(path: &Path) -> bool {
    extension(path).as_deref() == Some("inc")
}

fn write_dfg_table<W: Write>(out: &mut W, image: &Image, path: &Path) -> io::Result<()> {
    let is_include = is_include_file(path);
    writeln!(out, "// generated with: corona --ibl-dfg={}", path.display())?;
    writeln!(out, "// DFG LUT stored as an RG16F texture, in GL order")?;
    if !is_include {
        write!(out, "const uint16_t DFG_LUT[] = {{")?;
    }
    let size = image.width();
    for y in 0..size {
        for x in 0..size {
            if x % 4 == 0 {
                write!(out, "\n    ")?;
            }
            // GL orders rows bottom-up.
            let texel = image.pixel(x, size - 1 - y);
            let r = f16::from_f32(texel.x).to_bits();
            let g = f16::from_f32(texel.y).to_bits();
            write!(out, "0x{r:04x}, 0x{g:04x}, ")?;
        }
    }
    if !is_include {
        write!(out, "\n}};\n")?;
    }
    writeln!(out)?;
    Ok(())
}
