//! Command-line argument parsing.
//!
//! CLI values override settings loaded from a `--config` RON file, so a
//! checked-in bake description can still be tweaked per invocation.

use std::path::PathBuf;

use clap::Parser;
use corona_bake::{BakeConfig, DfgConfig, ExtractConfig, ShConfig, ShSink};
use corona_cubemap::OutputFormat;

/// IBL asset baker: prefiltered environments, irradiance SH, and the
/// DFG lookup table from a single panorama or cross image.
#[derive(Parser, Debug)]
#[command(name = "corona", about = "Image-based lighting asset baker")]
pub struct CliArgs {
    /// Input environment: a 2:1 equirectangular panorama or a 4:3
    /// horizontal cross. Optional when only `--ibl-dfg` runs.
    pub input: Option<PathBuf>,

    /// Bake description in RON format; flags below override it.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output image format for faces (png, hdr, exr).
    #[arg(short, long, value_parser = parse_format)]
    pub format: Option<OutputFormat>,

    /// Compression hint passed to the encoder.
    #[arg(short, long)]
    pub compression: Option<String>,

    /// Face dimension of generated cubemaps (must be a power of two).
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Base sample count for the roughness prefilter.
    #[arg(long)]
    pub samples: Option<u32>,

    /// Mirror the environment horizontally at load time.
    #[arg(short, long)]
    pub mirror: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Write intermediate visualizations next to the artifacts.
    #[arg(short, long)]
    pub debug: bool,

    /// Compute this many spherical harmonics bands.
    #[arg(long, value_name = "BANDS")]
    pub sh: Option<usize>,

    /// Convolve the SH coefficients with the cosine lobe (irradiance).
    #[arg(long)]
    pub sh_irradiance: bool,

    /// Compute the pre-scaled 3-band shader basis instead of raw SH.
    #[arg(long)]
    pub sh_shader: bool,

    /// Echo the SH coefficient table to standard output.
    #[arg(long)]
    pub sh_text: bool,

    /// Write the SH result here: a text table for source-code
    /// extensions, a rendered cross image otherwise.
    #[arg(long, value_name = "PATH")]
    pub sh_output: Option<PathBuf>,

    /// Dump the raw mip chain under this directory.
    #[arg(long, value_name = "DIR")]
    pub ibl_is_mipmap: Option<PathBuf>,

    /// Write the prefiltered specular levels under this directory.
    #[arg(long, value_name = "DIR")]
    pub ibl_ld: Option<PathBuf>,

    /// Bake the DFG lookup table to this path.
    #[arg(long, value_name = "PATH")]
    pub ibl_dfg: Option<PathBuf>,

    /// Integrate the multiscatter form of the DFG terms.
    #[arg(long)]
    pub ibl_dfg_multiscatter: bool,

    /// DFG table edge size in texels.
    #[arg(long, value_name = "SIZE")]
    pub ibl_dfg_size: Option<u32>,

    /// Extract the plain cubemap faces under this directory.
    #[arg(long, value_name = "DIR")]
    pub extract: Option<PathBuf>,

    /// Box-blur radius in texels applied to extracted faces.
    #[arg(long, value_name = "RADIUS")]
    pub extract_blur: Option<u32>,
}

fn parse_format(name: &str) -> Result<OutputFormat, String> {
    OutputFormat::from_name(name).ok_or_else(|| format!("unknown format `{name}`"))
}

/// Source-code extensions select the text SH sink; anything else gets
/// the rendered cross.
fn sh_sink_for(path: PathBuf) -> ShSink {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("h" | "hpp" | "c" | "cpp" | "inc" | "txt") => ShSink::Text(path),
        _ => ShSink::Cross(path),
    }
}

impl CliArgs {
    /// Apply CLI overrides onto a loaded config.
    pub fn apply_overrides(&self, config: &mut BakeConfig) {
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(ref compression) = self.compression {
            config.compression = Some(compression.clone());
        }
        if let Some(size) = self.size {
            config.output_size = Some(size);
        }
        if let Some(samples) = self.samples {
            config.num_samples = samples;
        }
        if self.mirror {
            config.mirror = true;
        }
        if self.quiet {
            config.quiet = true;
        }
        if self.debug {
            config.debug = true;
        }

        if self.sh.is_some()
            || self.sh_irradiance
            || self.sh_shader
            || self.sh_text
            || self.sh_output.is_some()
        {
            let sh = config.sh.get_or_insert_with(ShConfig::default);
            if let Some(bands) = self.sh {
                sh.bands = bands;
            }
            if self.sh_irradiance {
                sh.irradiance = true;
            }
            if self.sh_shader {
                sh.shader_basis = true;
            }
            if self.sh_text {
                sh.stdout = true;
            }
            if let Some(ref path) = self.sh_output {
                sh.sink = sh_sink_for(path.clone());
            }
        }

        if let Some(ref dir) = self.ibl_is_mipmap {
            config.mipmap_dir = Some(dir.clone());
        }
        if let Some(ref dir) = self.ibl_ld {
            config.prefilter_dir = Some(dir.clone());
        }

        if self.ibl_dfg.is_some() || self.ibl_dfg_multiscatter || self.ibl_dfg_size.is_some() {
            let dfg = config.dfg.get_or_insert_with(DfgConfig::default);
            if let Some(ref path) = self.ibl_dfg {
                dfg.path = path.clone();
            }
            if self.ibl_dfg_multiscatter {
                dfg.multiscatter = true;
            }
            if let Some(size) = self.ibl_dfg_size {
                dfg.size = size;
            }
        }

        if self.extract.is_some() || self.extract_blur.is_some() {
            let extract = config.extract.get_or_insert_with(ExtractConfig::default);
            if let Some(ref dir) = self.extract {
                extract.dir = dir.clone();
            }
            if let Some(blur) = self.extract_blur {
                extract.blur = blur;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("corona").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_flags_leaves_config_untouched() {
        let args = parse(&["env.hdr"]);
        let mut config = BakeConfig::new();
        args.apply_overrides(&mut config);
        assert_eq!(config, BakeConfig::new());
        assert_eq!(args.input.as_deref(), Some(std::path::Path::new("env.hdr")));
    }

    #[test]
    fn test_core_overrides() {
        let args = parse(&["env.hdr", "-f", "hdr", "-s", "128", "--samples", "64", "-m"]);
        let mut config = BakeConfig::new();
        args.apply_overrides(&mut config);
        assert_eq!(config.format, OutputFormat::Hdr);
        assert_eq!(config.output_size, Some(128));
        assert_eq!(config.num_samples, 64);
        assert!(config.mirror);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let result =
            CliArgs::try_parse_from(["corona", "env.hdr", "--format", "tiff"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_sh_flags_enable_the_stage() {
        let args = parse(&["env.hdr", "--sh", "2", "--sh-irradiance", "--sh-output", "sh.txt"]);
        let mut config = BakeConfig::new();
        args.apply_overrides(&mut config);
        let sh = config.sh.unwrap();
        assert_eq!(sh.bands, 2);
        assert!(sh.irradiance);
        assert_eq!(sh.sink, ShSink::Text(PathBuf::from("sh.txt")));
    }

    #[test]
    fn test_sh_output_extension_picks_sink() {
        assert_eq!(
            sh_sink_for(PathBuf::from("out/sh.h")),
            ShSink::Text(PathBuf::from("out/sh.h"))
        );
        assert_eq!(
            sh_sink_for(PathBuf::from("out/sh.png")),
            ShSink::Cross(PathBuf::from("out/sh.png"))
        );
        assert_eq!(
            sh_sink_for(PathBuf::from("out/sh.exr")),
            ShSink::Cross(PathBuf::from("out/sh.exr"))
        );
    }

    #[test]
    fn test_dfg_flags_enable_the_stage() {
        let args = parse(&["--ibl-dfg", "dfg.inc", "--ibl-dfg-multiscatter", "--ibl-dfg-size", "64"]);
        let mut config = BakeConfig::new();
        args.apply_overrides(&mut config);
        let dfg = config.dfg.unwrap();
        assert_eq!(dfg.path, PathBuf::from("dfg.inc"));
        assert!(dfg.multiscatter);
        assert_eq!(dfg.size, 64);
        assert!(args.input.is_none());
    }

    #[test]
    fn test_flags_override_loaded_config() {
        let mut config = BakeConfig::new();
        config.num_samples = 32;
        config.sh = Some(ShConfig {
            bands: 2,
            ..ShConfig::default()
        });
        let args = parse(&["env.hdr", "--sh", "3"]);
        args.apply_overrides(&mut config);
        // The flag replaces the band count but keeps the rest.
        assert_eq!(config.sh.unwrap().bands, 3);
        assert_eq!(config.num_samples, 32);
    }
}
