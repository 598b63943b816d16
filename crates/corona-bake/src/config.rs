//! Bake configuration with RON persistence.
//!
//! A [`BakeConfig`] fully describes one invocation of the pipeline: which
//! stages run, where their artifacts land, and the knobs each stage reads.
//! Stages that produce files are represented as `Option` sub-configs so
//! "stage disabled" is unrepresentable as a half-filled struct.

use std::path::{Path, PathBuf};

use corona_cubemap::OutputFormat;
use serde::{Deserialize, Serialize};

use crate::error::BakeError;

/// Default face dimension for prefiltered output when no output size
/// override is given, independent of the source dimension.
pub const DEFAULT_PREFILTER_SIZE: u32 = 256;

/// Top-level configuration for one bake run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BakeConfig {
    /// Format for baked image artifacts.
    pub format: OutputFormat,
    /// Encoder compression hint, passed through to the codec.
    pub compression: Option<String>,
    /// Suppress per-level progress output.
    pub quiet: bool,
    /// Write intermediate visualizations next to the artifacts.
    pub debug: bool,
    /// Face dimension override for generated cubemaps. Must be a power
    /// of two. Defaults to the input's face dimension.
    pub output_size: Option<u32>,
    /// Base sample count for the roughness prefilter.
    pub num_samples: u32,
    /// Mirror the environment horizontally at load time.
    pub mirror: bool,
    /// Spherical harmonics stage.
    pub sh: Option<ShConfig>,
    /// Directory for the raw mip chain dump, if requested.
    pub mipmap_dir: Option<PathBuf>,
    /// Directory for the prefiltered specular levels, if requested.
    pub prefilter_dir: Option<PathBuf>,
    /// DFG lookup table stage.
    pub dfg: Option<DfgConfig>,
    /// Plain face extraction stage.
    pub extract: Option<ExtractConfig>,
}

/// Spherical harmonics decomposition settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShConfig {
    /// Number of SH bands to compute.
    pub bands: usize,
    /// Fold the cosine lobe in so coefficients encode irradiance.
    pub irradiance: bool,
    /// Compute the 3-band shader basis with prescaled coefficients
    /// instead of raw SH. The basis is cosine-convolved by construction;
    /// the `irradiance` flag only controls the text suffix in this mode.
    pub shader_basis: bool,
    /// Echo the coefficient table to standard output.
    pub stdout: bool,
    /// Where the coefficients go besides stdout.
    pub sink: ShSink,
}

/// Destination for baked SH coefficients.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum ShSink {
    /// Compute only; nothing written.
    #[default]
    None,
    /// Render the coefficients back into a cubemap and write it as a
    /// horizontal cross image at this path.
    Cross(PathBuf),
    /// Write the coefficient table as text at this path.
    Text(PathBuf),
}

/// DFG lookup table settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DfgConfig {
    /// Output path. A source-code extension (`.h`, `.inc`, ...) selects
    /// the text serialization, anything else an image.
    pub path: PathBuf,
    /// LUT edge size in texels.
    pub size: u32,
    /// Integrate the multiscatter energy-compensation form.
    pub multiscatter: bool,
}

/// Plain cubemap face extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExtractConfig {
    /// Directory the face files go under.
    pub dir: PathBuf,
    /// Box-blur radius in texels applied to each face before writing.
    pub blur: u32,
}

impl Default for BakeConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Png,
            compression: None,
            quiet: false,
            debug: false,
            output_size: None,
            num_samples: 1024,
            mirror: false,
            sh: None,
            mipmap_dir: None,
            prefilter_dir: None,
            dfg: None,
            extract: None,
        }
    }
}

impl Default for ShConfig {
    fn default() -> Self {
        Self {
            bands: 3,
            irradiance: false,
            shader_basis: false,
            stdout: false,
            sink: ShSink::None,
        }
    }
}

impl Default for DfgConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dfg.h"),
            size: 128,
            multiscatter: false,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            blur: 0,
        }
    }
}

impl BakeConfig {
    /// Returns a default configuration with the stages disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a RON file.
    pub fn load(path: &Path) -> Result<Self, BakeError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BakeError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(|source| BakeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Validated output size: `None` means "use the input dimension",
    /// anything else must be a power of two.
    pub fn validated_output_size(&self) -> Result<Option<u32>, BakeError> {
        match self.output_size {
            Some(size) if size == 0 || !size.is_power_of_two() => {
                Err(BakeError::NotPowerOfTwo { size })
            }
            other => Ok(other),
        }
    }
}
