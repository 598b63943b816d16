//! Cubemap and image data model for the Corona IBL baker.
//!
//! Provides the flat float [`Image`] buffer, the [`Cubemap`] whose six faces
//! are carved out of one horizontal-cross image, the [`Face`] enumeration
//! used for on-disk naming, and the image codec used by every output stage.

mod codec;
mod cubemap;
mod error;
mod face;
mod image_buf;

pub use codec::{OutputFormat, decode, encode, encode_linear, linear_to_srgb, srgb_to_linear};
pub use cubemap::Cubemap;
pub use error::CubemapError;
pub use face::Face;
pub use image_buf::Image;
