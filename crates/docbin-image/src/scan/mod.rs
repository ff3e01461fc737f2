// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scanning pipeline — grayscale reduction, integral images, adaptive
// binarization, and the enhancer that chains them.

pub mod enhance;
pub mod grayscale;
pub mod integral;
pub mod threshold;

pub use enhance::DocumentEnhancer;
pub use grayscale::GrayscaleReducer;
pub use integral::IntegralImage;
pub use threshold::AdaptiveThresholder;
