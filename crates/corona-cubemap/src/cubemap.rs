//! Cubemap carved out of a single horizontal-cross image.

use glam::Vec3;

use crate::error::CubemapError;
use crate::face::Face;
use crate::image_buf::Image;

/// Six square faces of equal dimension backed by one 4×3 cross image.
///
/// Layout of the backing image (each cell is `dim`×`dim` texels):
///
/// ```text
///        +----+
///        | py |
///   +----+----+----+----+
///   | nx | pz | px | nz |
///   +----+----+----+----+
///        | ny |
///        +----+
/// ```
///
/// Texels outside the six faces stay zero; debug dumps encode the whole
/// cross so the unfolded map can be inspected directly.
#[derive(Clone, Debug)]
pub struct Cubemap {
    dim: u32,
    image: Image,
}

impl Cubemap {
    /// Allocate a zero-filled cubemap of the given face dimension.
    pub fn new(dim: u32) -> Cubemap {
        Cubemap {
            dim,
            image: Image::new(4 * dim, 3 * dim, 3),
        }
    }

    /// Build a cubemap from an existing 4:3 horizontal-cross image.
    pub fn from_cross(image: Image) -> Result<Cubemap, CubemapError> {
        image.require_channels(3)?;
        let (w, h) = (image.width(), image.height());
        if w % 4 != 0 || w / 4 * 3 != h {
            return Err(CubemapError::NotCross {
                width: w,
                height: h,
            });
        }
        Ok(Cubemap { dim: w / 4, image })
    }

    /// Face dimension in texels.
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// The backing cross image.
    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Origin of a face inside the backing cross image.
    fn face_origin(&self, face: Face) -> (u32, u32) {
        let d = self.dim;
        match face {
            Face::PosX => (2 * d, d),
            Face::NegX => (0, d),
            Face::PosY => (d, 0),
            Face::NegY => (d, 2 * d),
            Face::PosZ => (d, d),
            Face::NegZ => (3 * d, d),
        }
    }

    /// Read one texel of a face.
    pub fn texel(&self, face: Face, x: u32, y: u32) -> Vec3 {
        let (ox, oy) = self.face_origin(face);
        self.image.pixel(ox + x, oy + y)
    }

    /// Write one texel of a face.
    pub fn set_texel(&mut self, face: Face, x: u32, y: u32, value: Vec3) {
        let (ox, oy) = self.face_origin(face);
        self.image.set_pixel(ox + x, oy + y, value);
    }

    /// Copy one face out into a standalone `dim`×`dim` image.
    pub fn face_image(&self, face: Face) -> Image {
        let (ox, oy) = self.face_origin(face);
        self.image.window(ox, oy, self.dim, self.dim)
    }

    /// World-space direction through the center of a face texel (normalized).
    pub fn direction(&self, face: Face, x: u32, y: u32) -> Vec3 {
        self.direction_at(face, x as f32, y as f32)
    }

    /// Direction for continuous (possibly out-of-face) texel coordinates.
    ///
    /// Coordinates outside `[0, dim)` address points past the face edge,
    /// which is how seam repair finds across-the-seam neighbors.
    pub fn direction_at(&self, face: Face, x: f32, y: f32) -> Vec3 {
        let a = 2.0 * (x + 0.5) / self.dim as f32 - 1.0;
        let b = 2.0 * (y + 0.5) / self.dim as f32 - 1.0;
        match face {
            Face::PosX => Vec3::new(1.0, -b, -a),
            Face::NegX => Vec3::new(-1.0, -b, a),
            Face::PosY => Vec3::new(a, 1.0, b),
            Face::NegY => Vec3::new(a, -1.0, -b),
            Face::PosZ => Vec3::new(a, -b, 1.0),
            Face::NegZ => Vec3::new(-a, -b, -1.0),
        }
        .normalize()
    }

    /// Double-precision texel-center direction, for SH projection.
    pub fn direction64(&self, face: Face, x: u32, y: u32) -> glam::DVec3 {
        let a = 2.0 * (x as f64 + 0.5) / self.dim as f64 - 1.0;
        let b = 2.0 * (y as f64 + 0.5) / self.dim as f64 - 1.0;
        match face {
            Face::PosX => glam::DVec3::new(1.0, -b, -a),
            Face::NegX => glam::DVec3::new(-1.0, -b, a),
            Face::PosY => glam::DVec3::new(a, 1.0, b),
            Face::NegY => glam::DVec3::new(a, -1.0, -b),
            Face::PosZ => glam::DVec3::new(a, -b, 1.0),
            Face::NegZ => glam::DVec3::new(-a, -b, -1.0),
        }
        .normalize()
    }

    /// Map a direction to the face it hits and continuous texel coordinates.
    ///
    /// The returned coordinates are in `[-0.5, dim - 0.5]`; a texel center
    /// maps back to exactly `(x, y)` of [`Cubemap::direction`].
    pub fn project(&self, dir: Vec3) -> (Face, f32, f32) {
        let ax = dir.x.abs();
        let ay = dir.y.abs();
        let az = dir.z.abs();
        let (face, a, b) = if ax >= ay && ax >= az {
            if dir.x > 0.0 {
                (Face::PosX, -dir.z / ax, -dir.y / ax)
            } else {
                (Face::NegX, dir.z / ax, -dir.y / ax)
            }
        } else if ay >= az {
            if dir.y > 0.0 {
                (Face::PosY, dir.x / ay, dir.z / ay)
            } else {
                (Face::NegY, dir.x / ay, -dir.z / ay)
            }
        } else if dir.z > 0.0 {
            (Face::PosZ, dir.x / az, -dir.y / az)
        } else {
            (Face::NegZ, -dir.x / az, -dir.y / az)
        };
        let d = self.dim as f32;
        let x = (a + 1.0) * 0.5 * d - 0.5;
        let y = (b + 1.0) * 0.5 * d - 0.5;
        (face, x, y)
    }

    /// Sample the nearest texel along a direction.
    pub fn sample_nearest(&self, dir: Vec3) -> Vec3 {
        let (face, x, y) = self.project(dir);
        let max = self.dim - 1;
        let xi = (x.round().max(0.0) as u32).min(max);
        let yi = (y.round().max(0.0) as u32).min(max);
        self.texel(face, xi, yi)
    }

    /// Bilinearly sample along a direction, clamped within the hit face.
    pub fn sample_bilinear(&self, dir: Vec3) -> Vec3 {
        let (face, x, y) = self.project(dir);
        let max = (self.dim - 1) as f32;
        let x = x.clamp(0.0, max);
        let y = y.clamp(0.0, max);
        let x0 = x.floor();
        let y0 = y.floor();
        let x1 = (x0 + 1.0).min(max);
        let y1 = (y0 + 1.0).min(max);
        let tx = x - x0;
        let ty = y - y0;
        let c00 = self.texel(face, x0 as u32, y0 as u32);
        let c10 = self.texel(face, x1 as u32, y0 as u32);
        let c01 = self.texel(face, x0 as u32, y1 as u32);
        let c11 = self.texel(face, x1 as u32, y1 as u32);
        let top = c00 * (1.0 - tx) + c10 * tx;
        let bot = c01 * (1.0 - tx) + c11 * tx;
        top * (1.0 - ty) + bot * ty
    }

    /// Solid angle subtended by a face texel, in steradians.
    ///
    /// Computed from the spherical area element at the texel's corners; the
    /// six faces together sum to 4π.
    pub fn texel_solid_angle(&self, x: u32, y: u32) -> f64 {
        let d = self.dim as f64;
        let x0 = 2.0 * x as f64 / d - 1.0;
        let y0 = 2.0 * y as f64 / d - 1.0;
        let x1 = 2.0 * (x + 1) as f64 / d - 1.0;
        let y1 = 2.0 * (y + 1) as f64 / d - 1.0;
        area_element(x1, y1) - area_element(x0, y1) - area_element(x1, y0) + area_element(x0, y0)
    }
}

/// Area of the spherical projection of the rectangle `[0,x]×[0,y]` on a
/// unit-distance cube face.
fn area_element(x: f64, y: f64) -> f64 {
    (x * y).atan2((x * x + y * y + 1.0).sqrt())
}
