//! Plain cubemap face extraction.

use std::path::Path;

use corona_cubemap::{Cubemap, Face, Image};
use glam::Vec3;

use crate::config::{BakeConfig, ExtractConfig};
use crate::error::BakeError;
use crate::writer;

/// Write the six faces of `cm` under `{extract.dir}/{base_name}/` as
/// `{face}{ext}`, optionally box-blurring each face first.
pub fn extract_faces(
    cm: &Cubemap,
    config: &BakeConfig,
    extract: &ExtractConfig,
    base_name: &str,
) -> Result<(), BakeError> {
    let dir = writer::asset_dir(&extract.dir, base_name)?;
    if extract.blur == 0 {
        return writer::write_faces(&dir, "", cm, config);
    }
    let mut blurred = Cubemap::new(cm.dim());
    for face in Face::ALL {
        let soft = box_blur(&cm.face_image(face), extract.blur);
        for y in 0..cm.dim() {
            for x in 0..cm.dim() {
                blurred.set_texel(face, x, y, soft.pixel(x, y));
            }
        }
    }
    writer::write_faces(&dir, "", &blurred, config)
}

/// Separable box blur with edge clamping.
fn box_blur(img: &Image, radius: u32) -> Image {
    let horizontal = blur_pass(img, radius, true);
    blur_pass(&horizontal, radius, false)
}

fn blur_pass(img: &Image, radius: u32, horizontal: bool) -> Image {
    let (w, h) = (img.width(), img.height());
    let r = radius as i64;
    let mut out = Image::new(w, h, img.channels());
    for y in 0..h {
        for x in 0..w {
            let mut sum = Vec3::ZERO;
            for offset in -r..=r {
                let (sx, sy) = if horizontal {
                    ((x as i64 + offset).clamp(0, w as i64 - 1), y as i64)
                } else {
                    (x as i64, (y as i64 + offset).clamp(0, h as i64 - 1))
                };
                sum += img.pixel(sx as u32, sy as u32);
            }
            out.set_pixel(x, y, sum / (2 * r + 1) as f32);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_writes_bare_face_names() {
        let dir = tempfile::tempdir().unwrap();
        let cm = Cubemap::new(4);
        let config = BakeConfig::new();
        let extract = ExtractConfig {
            dir: dir.path().to_path_buf(),
            blur: 0,
        };
        extract_faces(&cm, &config, &extract, "studio").unwrap();
        for face in ["px", "nx", "py", "ny", "pz", "nz"] {
            assert!(dir.path().join(format!("studio/{face}.png")).exists());
        }
    }

    #[test]
    fn test_box_blur_preserves_uniform_image() {
        let mut img = Image::new(4, 4, 3);
        for y in 0..4 {
            for x in 0..4 {
                img.set_pixel(x, y, Vec3::splat(0.5));
            }
        }
        let blurred = box_blur(&img, 2);
        for y in 0..4 {
            for x in 0..4 {
                assert!((blurred.pixel(x, y).x - 0.5).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_box_blur_spreads_impulse() {
        let mut img = Image::new(5, 5, 3);
        img.set_pixel(2, 2, Vec3::splat(1.0));
        let blurred = box_blur(&img, 1);
        let center = blurred.pixel(2, 2).x;
        let neighbor = blurred.pixel(1, 2).x;
        assert!(center > 0.0 && neighbor > 0.0);
        assert!((center - 1.0 / 9.0).abs() < 1e-6);
        assert!((neighbor - center).abs() < 1e-6);
    }

    #[test]
    fn test_extract_with_blur_still_writes_six_faces() {
        let dir = tempfile::tempdir().unwrap();
        let cm = Cubemap::new(4);
        let config = BakeConfig::new();
        let extract = ExtractConfig {
            dir: PathBuf::from(dir.path()),
            blur: 1,
        };
        extract_faces(&cm, &config, &extract, "env").unwrap();
        assert_eq!(
            std::fs::read_dir(dir.path().join("env")).unwrap().count(),
            6
        );
    }
}
