//! Flat float pixel buffer backing cubemaps and 2D LUTs.

use glam::Vec3;

use crate::error::CubemapError;

/// A row-major floating-point pixel buffer.
///
/// All pipeline images are 3-channel linear RGB; the channel count is kept
/// explicit so precondition violations surface as errors rather than silent
/// misreads.
#[derive(Clone, Debug)]
pub struct Image {
    width: u32,
    height: u32,
    channels: u32,
    data: Vec<f32>,
}

impl Image {
    /// Allocate a zero-filled image.
    pub fn new(width: u32, height: u32, channels: u32) -> Image {
        Image {
            width,
            height,
            channels,
            data: vec![0.0; (width * height * channels) as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of channels per pixel.
    pub fn channels(&self) -> u32 {
        self.channels
    }

    /// The raw pixel data, row-major, `channels` floats per pixel.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable access to the raw pixel data.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns an error unless the image has exactly `expected` channels.
    pub fn require_channels(&self, expected: u32) -> Result<(), CubemapError> {
        if self.channels == expected {
            Ok(())
        } else {
            Err(CubemapError::ChannelCount {
                expected,
                actual: self.channels,
            })
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        debug_assert!(x < self.width && y < self.height);
        ((y * self.width + x) * self.channels) as usize
    }

    /// Read the first three channels of a pixel as a vector.
    pub fn pixel(&self, x: u32, y: u32) -> Vec3 {
        let i = self.offset(x, y);
        Vec3::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Write the first three channels of a pixel.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: Vec3) {
        let i = self.offset(x, y);
        self.data[i] = value.x;
        self.data[i + 1] = value.y;
        self.data[i + 2] = value.z;
    }

    /// Copy a rectangular window out into a new image.
    pub fn window(&self, x0: u32, y0: u32, width: u32, height: u32) -> Image {
        debug_assert!(x0 + width <= self.width && y0 + height <= self.height);
        let mut out = Image::new(width, height, self.channels);
        let c = self.channels as usize;
        for y in 0..height {
            let src = self.offset(x0, y0 + y);
            let dst = ((y * width) * self.channels) as usize;
            out.data[dst..dst + width as usize * c]
                .copy_from_slice(&self.data[src..src + width as usize * c]);
        }
        out
    }
}
