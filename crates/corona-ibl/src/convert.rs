//! Source image to cubemap conversion (equirectangular and horizontal
//! cross), with the optional horizontal mirror applied at conversion time.

use corona_cubemap::{Cubemap, CubemapError, Face, Image};
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Convert a 2:1 equirectangular environment into a cubemap of the given
/// face dimension.
pub fn equirect_to_cubemap(
    src: &Image,
    dim: u32,
    mirror: bool,
) -> Result<Cubemap, CubemapError> {
    src.require_channels(3)?;
    let mut cm = Cubemap::new(dim);
    for face in Face::ALL {
        for y in 0..dim {
            for x in 0..dim {
                let mut dir = cm.direction(face, x, y);
                if mirror {
                    dir.x = -dir.x;
                }
                cm.set_texel(face, x, y, sample_equirect(src, dir));
            }
        }
    }
    Ok(cm)
}

/// Convert a 4:3 horizontal-cross image into a cubemap.
pub fn cross_to_cubemap(src: Image, mirror: bool) -> Result<Cubemap, CubemapError> {
    let cm = Cubemap::from_cross(src)?;
    if !mirror {
        return Ok(cm);
    }
    let mut out = Cubemap::new(cm.dim());
    for face in Face::ALL {
        for y in 0..out.dim() {
            for x in 0..out.dim() {
                let mut dir = out.direction(face, x, y);
                dir.x = -dir.x;
                out.set_texel(face, x, y, cm.sample_nearest(dir));
            }
        }
    }
    Ok(out)
}

/// Bilinear equirectangular lookup: wraps in longitude, clamps in latitude.
fn sample_equirect(img: &Image, dir: Vec3) -> Vec3 {
    let d = dir.normalize();
    let theta = d.y.clamp(-1.0, 1.0).acos();
    let phi = d.z.atan2(d.x);
    let u = (phi + PI) / TAU;
    let v = theta / PI;
    let x = u * (img.width() as f32 - 1.0);
    let y = v * (img.height() as f32 - 1.0);
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = x - x0;
    let ty = y - y0;

    let ix0 = x0.rem_euclid(img.width() as f32) as u32;
    let ix1 = (x0 + 1.0).rem_euclid(img.width() as f32) as u32;
    let iy0 = y0.clamp(0.0, (img.height() - 1) as f32) as u32;
    let iy1 = (y0 + 1.0).clamp(0.0, (img.height() - 1) as f32) as u32;

    let c00 = img.pixel(ix0, iy0);
    let c10 = img.pixel(ix1, iy0);
    let c01 = img.pixel(ix0, iy1);
    let c11 = img.pixel(ix1, iy1);

    let top = c00 * (1.0 - tx) + c10 * tx;
    let bot = c01 * (1.0 - tx) + c11 * tx;
    top * (1.0 - ty) + bot * ty
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_equirect_gives_uniform_cubemap() {
        let mut src = Image::new(16, 8, 3);
        for y in 0..8 {
            for x in 0..16 {
                src.set_pixel(x, y, Vec3::splat(0.3));
            }
        }
        let cm = equirect_to_cubemap(&src, 4, false).unwrap();
        for face in Face::ALL {
            for y in 0..4 {
                for x in 0..4 {
                    assert_eq!(cm.texel(face, x, y), Vec3::splat(0.3));
                }
            }
        }
    }

    #[test]
    fn test_zenith_maps_to_top_face() {
        // Paint the top rows of the panorama; only +Y should pick it up
        // strongly at its center.
        let mut src = Image::new(32, 16, 3);
        for y in 0..2 {
            for x in 0..32 {
                src.set_pixel(x, y, Vec3::new(1.0, 0.0, 0.0));
            }
        }
        let cm = equirect_to_cubemap(&src, 8, false).unwrap();
        let top = cm.texel(Face::PosY, 4, 4);
        let side = cm.texel(Face::PosZ, 4, 4);
        assert!(top.x > 0.5, "zenith color should land on +Y: {top:?}");
        assert!(side.x < 0.1, "+Z center should not see the zenith: {side:?}");
    }

    #[test]
    fn test_mirror_swaps_x_faces() {
        let mut src = Image::new(32, 16, 3);
        // Color the +X direction (phi = 0 maps to u = 0.5).
        for y in 7..9 {
            for x in 15..17 {
                src.set_pixel(x, y, Vec3::new(0.0, 1.0, 0.0));
            }
        }
        let plain = equirect_to_cubemap(&src, 8, false).unwrap();
        let mirrored = equirect_to_cubemap(&src, 8, true).unwrap();
        let px_plain = plain.texel(Face::PosX, 4, 4).y;
        let nx_mirrored = mirrored.texel(Face::NegX, 4, 4).y;
        assert!(px_plain > 0.2, "+X center should see the marker: {px_plain}");
        assert!(
            (px_plain - nx_mirrored).abs() < 1e-5,
            "mirroring should move the marker to -X: {px_plain} vs {nx_mirrored}"
        );
    }

    #[test]
    fn test_cross_to_cubemap_requires_cross_aspect() {
        assert!(cross_to_cubemap(Image::new(16, 8, 3), false).is_err());
        assert!(cross_to_cubemap(Image::new(16, 12, 3), false).is_ok());
    }
}
