//! Edge-seam repair so downsampled cubemaps filter without visible
//! discontinuities at face borders.

use corona_cubemap::{Cubemap, Face};
use glam::Vec3;

/// Blend every border texel with its nearest neighbor across the seam.
///
/// The neighbor is found by extending the texel grid one step past the face
/// edge and projecting that direction back onto the cube. All reads happen
/// before any write so the result does not depend on face order.
pub fn make_seamless(cm: &mut Cubemap) {
    let dim = cm.dim();
    if dim <= 1 {
        return;
    }
    let mut edits: Vec<(Face, u32, u32, Vec3)> = Vec::new();
    for face in Face::ALL {
        for i in 0..dim {
            let border: [(u32, u32, f32, f32); 4] = [
                (0, i, -1.0, i as f32),
                (dim - 1, i, dim as f32, i as f32),
                (i, 0, i as f32, -1.0),
                (i, dim - 1, i as f32, dim as f32),
            ];
            for (x, y, ox, oy) in border {
                let outside = cm.direction_at(face, ox, oy);
                let neighbor = cm.sample_nearest(outside);
                let blended = (cm.texel(face, x, y) + neighbor) * 0.5;
                edits.push((face, x, y, blended));
            }
        }
    }
    for (face, x, y, value) in edits {
        cm.set_texel(face, x, y, value);
    }
}
