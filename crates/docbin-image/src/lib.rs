// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docbin-image — Per-image processing for docbin.
//
// Provides the pixel buffer every algorithm works on, the codec seam to the
// `image` crate, and the scanning pipeline (parallel grayscale reduction,
// integral image, adaptive thresholding).

pub mod buffer;
pub mod codec;
pub mod scan;

// Re-export the primary structs so callers can use `docbin_image::PixelBuffer` etc.
pub use buffer::PixelBuffer;
pub use codec::{ImageCodec, ImageCrateCodec};
pub use scan::{AdaptiveThresholder, DocumentEnhancer, GrayscaleReducer, IntegralImage};
