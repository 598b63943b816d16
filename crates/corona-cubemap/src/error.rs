//! Cubemap and codec error types.

use std::path::PathBuf;

/// Errors that can occur while decoding, encoding, or assembling cubemaps.
#[derive(Debug, thiserror::Error)]
pub enum CubemapError {
    /// Failed to decode a source image from disk.
    #[error("failed to decode {path}: {source}")]
    Decode {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode an output image to disk.
    #[error("failed to encode {path}: {source}")]
    Encode {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying codec error.
        #[source]
        source: image::ImageError,
    },

    /// Raw I/O failure on an image stream.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The image dimensions do not form a 4:3 horizontal cross.
    #[error("image is not a horizontal cubemap cross: {width}x{height}")]
    NotCross {
        /// Source width in pixels.
        width: u32,
        /// Source height in pixels.
        height: u32,
    },

    /// An operation required a specific channel count.
    #[error("expected a {expected}-channel image, got {actual} channels")]
    ChannelCount {
        /// Required channel count.
        expected: u32,
        /// Channel count actually present.
        actual: u32,
    },
}
