//! Error type for the bake pipeline.

use std::path::PathBuf;

use corona_cubemap::CubemapError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BakeError {
    #[error("failed to create output directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read config {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("output size {size} is not a power of two")]
    NotPowerOfTwo { size: u32 },

    #[error("the roughness prefilter needs a non-empty mip chain")]
    EmptyChain,

    #[error(transparent)]
    Cubemap(#[from] CubemapError),
}
