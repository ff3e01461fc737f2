// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixel buffer — interleaved 8-bit samples plus dimensions. Every algorithm
// in this crate reads and writes this type.

use docbin_core::error::{EnhancerError, Result};
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};

/// Interleaved 8-bit image samples.
///
/// `samples.len() == width * height * channels` holds for every value of this
/// type; the only way to build one is through [`PixelBuffer::new`], which
/// checks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    samples: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap `samples`, rejecting a length that does not match the dimensions.
    pub fn new(width: u32, height: u32, channels: u8, samples: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * channels as usize;
        if samples.len() != expected {
            return Err(EnhancerError::BufferLength {
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            width,
            height,
            channels,
            samples,
        })
    }

    /// A buffer with every sample set to `value`.
    pub fn filled(width: u32, height: u32, channels: u8, value: u8) -> Self {
        let len = width as usize * height as usize * channels as usize;
        Self {
            width,
            height,
            channels,
            samples: vec![value; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Number of pixels (not samples).
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    // -- image crate interop --------------------------------------------------

    /// Convert a decoded image, keeping 8-bit L/LA/RGB/RGBA at their native
    /// channel count. Wider sample types are narrowed to 8-bit RGB(A).
    pub fn from_dynamic(image: DynamicImage) -> Self {
        let (width, height) = (image.width(), image.height());
        let (channels, samples) = match image {
            DynamicImage::ImageLuma8(img) => (1, img.into_raw()),
            DynamicImage::ImageLumaA8(img) => (2, img.into_raw()),
            DynamicImage::ImageRgb8(img) => (3, img.into_raw()),
            DynamicImage::ImageRgba8(img) => (4, img.into_raw()),
            other if other.color().has_alpha() => (4, other.to_rgba8().into_raw()),
            other => (3, other.to_rgb8().into_raw()),
        };
        Self {
            width,
            height,
            channels,
            samples,
        }
    }

    /// Convert back into a `DynamicImage` for encoding.
    pub fn into_dynamic(self) -> Result<DynamicImage> {
        let (w, h) = (self.width, self.height);
        let mismatch = |actual: usize, channels: u8| EnhancerError::BufferLength {
            expected: w as usize * h as usize * channels as usize,
            actual,
        };
        let len = self.samples.len();
        let image = match self.channels {
            1 => GrayImage::from_raw(w, h, self.samples)
                .map(DynamicImage::ImageLuma8)
                .ok_or_else(|| mismatch(len, 1))?,
            2 => GrayAlphaImage::from_raw(w, h, self.samples)
                .map(DynamicImage::ImageLumaA8)
                .ok_or_else(|| mismatch(len, 2))?,
            3 => RgbImage::from_raw(w, h, self.samples)
                .map(DynamicImage::ImageRgb8)
                .ok_or_else(|| mismatch(len, 3))?,
            4 => RgbaImage::from_raw(w, h, self.samples)
                .map(DynamicImage::ImageRgba8)
                .ok_or_else(|| mismatch(len, 4))?,
            other => return Err(EnhancerError::InvalidChannelCount(other)),
        };
        Ok(image)
    }
}
