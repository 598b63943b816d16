//! Image decode/encode for pipeline inputs and baked artifacts.
//!
//! All pipeline images are linear float RGB. Decoding removes the sRGB
//! transfer from 8-bit sources; HDR and EXR sources are already linear.
//! The compression hint of the encoder contract is accepted for
//! compatibility but ignored: none of the encoders used here expose a
//! compression knob.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::hdr::HdrEncoder;
use image::{DynamicImage, Rgb, Rgb32FImage, RgbImage};
use serde::{Deserialize, Serialize};

use crate::error::CubemapError;
use crate::image_buf::Image;

/// Output image formats supported by the baker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// 8-bit sRGB PNG (16-bit linear for LUT data).
    #[default]
    Png,
    /// Radiance RGBE.
    Hdr,
    /// OpenEXR, 32-bit float.
    Exr,
}

impl OutputFormat {
    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => ".png",
            OutputFormat::Hdr => ".hdr",
            OutputFormat::Exr => ".exr",
        }
    }

    /// Pick a format from a file name's extension. Unknown extensions
    /// fall back to PNG.
    pub fn from_path(path: &Path) -> OutputFormat {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("hdr") => OutputFormat::Hdr,
            Some("exr") => OutputFormat::Exr,
            _ => OutputFormat::Png,
        }
    }

    /// Parse a format name as given on the command line.
    pub fn from_name(name: &str) -> Option<OutputFormat> {
        match name.to_ascii_lowercase().as_str() {
            "png" => Some(OutputFormat::Png),
            "hdr" | "rgbe" => Some(OutputFormat::Hdr),
            "exr" => Some(OutputFormat::Exr),
            _ => None,
        }
    }
}

/// Remove the sRGB transfer function from one channel.
pub fn srgb_to_linear(v: f32) -> f32 {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Apply the sRGB transfer function to one channel.
pub fn linear_to_srgb(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

/// Decode a source image into a linear float RGB [`Image`].
pub fn decode(path: &Path) -> Result<Image, CubemapError> {
    let decoded = image::open(path).map_err(|source| CubemapError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    // Float sources are linear already; everything else carries sRGB.
    let linear = matches!(
        decoded,
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_)
    );
    let rgb = decoded.to_rgb32f();
    let mut out = Image::new(rgb.width(), rgb.height(), 3);
    for (i, v) in rgb.as_raw().iter().enumerate() {
        out.data_mut()[i] = if linear { *v } else { srgb_to_linear(*v) };
    }
    Ok(out)
}

/// Encode a linear float image as a color artifact.
///
/// PNG output applies the sRGB transfer and quantizes to 8 bits; HDR and
/// EXR are written as-is. `_compression` is the encoder contract's
/// compression hint, accepted and ignored.
pub fn encode(
    path: &Path,
    img: &Image,
    format: OutputFormat,
    _compression: Option<&str>,
) -> Result<(), CubemapError> {
    img.require_channels(3)?;
    match format {
        OutputFormat::Png => {
            let mut out = RgbImage::new(img.width(), img.height());
            for y in 0..img.height() {
                for x in 0..img.width() {
                    let p = img.pixel(x, y);
                    out.put_pixel(
                        x,
                        y,
                        Rgb([
                            (linear_to_srgb(p.x).clamp(0.0, 1.0) * 255.0).round() as u8,
                            (linear_to_srgb(p.y).clamp(0.0, 1.0) * 255.0).round() as u8,
                            (linear_to_srgb(p.z).clamp(0.0, 1.0) * 255.0).round() as u8,
                        ]),
                    );
                }
            }
            out.save(path).map_err(|source| CubemapError::Encode {
                path: path.to_path_buf(),
                source,
            })
        }
        OutputFormat::Hdr => encode_hdr(path, img),
        OutputFormat::Exr => encode_exr(path, img),
    }
}

/// Encode a linear float image without a transfer function.
///
/// Used for LUT data where the texel values are coefficients, not colors:
/// PNG output stays linear and is widened to 16 bits per channel so the
/// quantization stays below half-float precision.
pub fn encode_linear(
    path: &Path,
    img: &Image,
    format: OutputFormat,
    _compression: Option<&str>,
) -> Result<(), CubemapError> {
    img.require_channels(3)?;
    match format {
        OutputFormat::Png => {
            let mut out = image::ImageBuffer::<Rgb<u16>, Vec<u16>>::new(img.width(), img.height());
            for y in 0..img.height() {
                for x in 0..img.width() {
                    let p = img.pixel(x, y);
                    out.put_pixel(
                        x,
                        y,
                        Rgb([
                            (p.x.clamp(0.0, 1.0) * 65535.0).round() as u16,
                            (p.y.clamp(0.0, 1.0) * 65535.0).round() as u16,
                            (p.z.clamp(0.0, 1.0) * 65535.0).round() as u16,
                        ]),
                    );
                }
            }
            out.save(path).map_err(|source| CubemapError::Encode {
                path: path.to_path_buf(),
                source,
            })
        }
        OutputFormat::Hdr => encode_hdr(path, img),
        OutputFormat::Exr => encode_exr(path, img),
    }
}

fn encode_hdr(path: &Path, img: &Image) -> Result<(), CubemapError> {
    let file = File::create(path).map_err(|source| CubemapError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let pixels: Vec<Rgb<f32>> = (0..img.height())
        .flat_map(|y| (0..img.width()).map(move |x| (x, y)))
        .map(|(x, y)| {
            let p = img.pixel(x, y);
            Rgb([p.x, p.y, p.z])
        })
        .collect();
    HdrEncoder::new(BufWriter::new(file))
        .encode(&pixels, img.width() as usize, img.height() as usize)
        .map_err(|source| CubemapError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

fn encode_exr(path: &Path, img: &Image) -> Result<(), CubemapError> {
    let mut out = Rgb32FImage::new(img.width(), img.height());
    for y in 0..img.height() {
        for x in 0..img.width() {
            let p = img.pixel(x, y);
            out.put_pixel(x, y, Rgb([p.x, p.y, p.z]));
        }
    }
    DynamicImage::ImageRgb32F(out)
        .save(path)
        .map_err(|source| CubemapError::Encode {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            OutputFormat::from_path(Path::new("a/b/face.hdr")),
            OutputFormat::Hdr
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("face.EXR")),
            OutputFormat::Exr
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("face.png")),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(Path::new("no_extension")),
            OutputFormat::Png
        );
    }

    #[test]
    fn test_format_from_name() {
        assert_eq!(OutputFormat::from_name("PNG"), Some(OutputFormat::Png));
        assert_eq!(OutputFormat::from_name("rgbe"), Some(OutputFormat::Hdr));
        assert_eq!(OutputFormat::from_name("tiff"), None);
    }

    #[test]
    fn test_srgb_transfer_roundtrip() {
        for i in 0..=100 {
            let v = i as f32 / 100.0;
            let rt = srgb_to_linear(linear_to_srgb(v));
            assert!((rt - v).abs() < 1e-5, "roundtrip of {v} gave {rt}");
        }
    }

    #[test]
    fn test_png_encode_decode_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");
        let mut img = Image::new(4, 2, 3);
        for y in 0..2 {
            for x in 0..4 {
                img.set_pixel(x, y, Vec3::splat((x + y) as f32 / 8.0));
            }
        }
        encode(&path, &img, OutputFormat::Png, None).unwrap();
        let back = decode(&path).unwrap();
        assert_eq!(back.width(), 4);
        assert_eq!(back.height(), 2);
        // 8-bit quantization through the sRGB transfer stays within ~1%.
        for y in 0..2 {
            for x in 0..4 {
                let a = img.pixel(x, y);
                let b = back.pixel(x, y);
                assert!((a.x - b.x).abs() < 0.01, "({x},{y}): {a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_hdr_encode_decode_preserves_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bright.hdr");
        let mut img = Image::new(2, 2, 3);
        img.set_pixel(0, 0, Vec3::new(8.0, 4.0, 2.0));
        encode(&path, &img, OutputFormat::Hdr, None).unwrap();
        let back = decode(&path).unwrap();
        let p = back.pixel(0, 0);
        assert!((p.x - 8.0).abs() / 8.0 < 0.02, "got {p:?}");
        assert!((p.y - 4.0).abs() / 4.0 < 0.02, "got {p:?}");
    }

    #[test]
    fn test_encode_rejects_bad_channel_count() {
        let dir = tempfile::tempdir().unwrap();
        let img = Image::new(2, 2, 4);
        let result = encode(
            &dir.path().join("bad.png"),
            &img,
            OutputFormat::Png,
            None,
        );
        assert!(matches!(
            result,
            Err(CubemapError::ChannelCount {
                expected: 3,
                actual: 4
            })
        ));
    }
}
