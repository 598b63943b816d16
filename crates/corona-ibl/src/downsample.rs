//! 2×2 box-filter cubemap downsampling.

use corona_cubemap::{Cubemap, Face};

/// Average each 2×2 source block into one destination texel.
///
/// `dst.dim()` must be exactly half of `src.dim()`.
pub fn downsample_box(dst: &mut Cubemap, src: &Cubemap) {
    debug_assert_eq!(dst.dim() * 2, src.dim());
    for face in Face::ALL {
        for y in 0..dst.dim() {
            for x in 0..dst.dim() {
                let sum = src.texel(face, 2 * x, 2 * y)
                    + src.texel(face, 2 * x + 1, 2 * y)
                    + src.texel(face, 2 * x, 2 * y + 1)
                    + src.texel(face, 2 * x + 1, 2 * y + 1);
                dst.set_texel(face, x, y, sum * 0.25);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_box_average() {
        let mut src = Cubemap::new(2);
        src.set_texel(Face::PosX, 0, 0, Vec3::splat(1.0));
        src.set_texel(Face::PosX, 1, 0, Vec3::splat(2.0));
        src.set_texel(Face::PosX, 0, 1, Vec3::splat(3.0));
        src.set_texel(Face::PosX, 1, 1, Vec3::splat(6.0));
        let mut dst = Cubemap::new(1);
        downsample_box(&mut dst, &src);
        assert_eq!(dst.texel(Face::PosX, 0, 0), Vec3::splat(3.0));
        assert_eq!(dst.texel(Face::NegZ, 0, 0), Vec3::ZERO);
    }

    #[test]
    fn test_constant_faces_stay_constant() {
        let mut src = Cubemap::new(4);
        for (i, face) in Face::ALL.iter().enumerate() {
            for y in 0..4 {
                for x in 0..4 {
                    src.set_texel(*face, x, y, Vec3::splat(i as f32));
                }
            }
        }
        let mut dst = Cubemap::new(2);
        downsample_box(&mut dst, &src);
        for (i, face) in Face::ALL.iter().enumerate() {
            for y in 0..2 {
                for x in 0..2 {
                    assert_eq!(dst.texel(*face, x, y), Vec3::splat(i as f32));
                }
            }
        }
    }
}
