// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan enhancement pipeline — grayscale reduction and adaptive binarization
// chained over one exclusively-owned pixel buffer.

use std::path::Path;

use docbin_core::error::{EnhancerError, Result};
use docbin_core::{OperationKind, OutputFormat, ThresholdParams};
use tracing::{info, instrument, warn};

use crate::buffer::PixelBuffer;
use crate::codec::ImageCodec;
use crate::scan::grayscale::GrayscaleReducer;
use crate::scan::threshold::AdaptiveThresholder;

/// Enhances one scanned document image.
///
/// Each step consumes `self` and returns the transformed enhancer, so a
/// pipeline reads top to bottom:
///
/// ```ignore
/// DocumentEnhancer::open(path, &ImageCrateCodec)?
///     .binarize(4, ThresholdParams::default())?
///     .save(&out, OutputFormat::Png, &ImageCrateCodec)?;
/// ```
pub struct DocumentEnhancer {
    buffer: PixelBuffer,
}

impl DocumentEnhancer {
    // -- Construction ---------------------------------------------------------

    /// Decode `path` with `codec`.
    pub fn open(path: &Path, codec: &dyn ImageCodec) -> Result<Self> {
        let buffer = codec.load(path)?;
        info!(
            path = %path.display(),
            width = buffer.width(),
            height = buffer.height(),
            channels = buffer.channels(),
            "Scan image loaded"
        );
        Ok(Self { buffer })
    }

    /// Wrap an existing buffer.
    pub fn from_buffer(buffer: PixelBuffer) -> Self {
        Self { buffer }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn as_buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn into_buffer(self) -> PixelBuffer {
        self.buffer
    }

    // -- Pipeline steps -------------------------------------------------------

    /// Reduce to one luminance channel using `workers` threads.
    ///
    /// A buffer that is already single-channel is passed through unchanged.
    #[instrument(skip(self))]
    pub fn grayscale(mut self, workers: usize) -> Result<Self> {
        match GrayscaleReducer::new(workers).apply(&mut self.buffer) {
            Ok(()) => Ok(self),
            Err(EnhancerError::InvalidChannelCount(1)) => {
                warn!("Image is already grayscale; keeping it as-is");
                Ok(self)
            }
            Err(err) => Err(err),
        }
    }

    /// Binarize with integral-image adaptive thresholding. Colour input is
    /// reduced to grayscale first using `grayscale_workers` threads.
    #[instrument(skip(self))]
    pub fn binarize(mut self, grayscale_workers: usize, params: ThresholdParams) -> Result<Self> {
        AdaptiveThresholder::new(params, grayscale_workers).apply(&mut self.buffer)?;
        Ok(self)
    }

    /// Run the pipeline selected by `kind`.
    pub fn run(self, kind: OperationKind, workers: usize, params: ThresholdParams) -> Result<Self> {
        match kind {
            OperationKind::Grayscale => self.grayscale(workers),
            OperationKind::AdaptiveThreshold => self.binarize(workers, params),
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current buffer to `path`.
    pub fn save(&self, path: &Path, format: OutputFormat, codec: &dyn ImageCodec) -> Result<()> {
        codec.save(&self.buffer, path, format)
    }
}
