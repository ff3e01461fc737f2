// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Adaptive thresholding — binarizes each pixel against the mean of a square
// window around it, looked up in O(1) from an integral image.

use docbin_core::ThresholdParams;
use docbin_core::error::{EnhancerError, Result};
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;
use crate::scan::grayscale::GrayscaleReducer;
use crate::scan::integral::IntegralImage;

/// Foreground (paper) value.
pub const WHITE: u8 = 255;
/// Background (ink) value.
pub const BLACK: u8 = 0;

/// Local-mean binarization with a window sized relative to the image width.
///
/// A pixel becomes white when `pixel * count > window_sum * (1 - threshold)`,
/// where `count` is `(x2 - x1) * (y2 - y1)` for the clamped window corners.
/// The comparison is done in integers except for the scaled window sum, which
/// is truncated, so the output is fully deterministic.
#[derive(Debug, Clone, Copy)]
pub struct AdaptiveThresholder {
    params: ThresholdParams,
    grayscale: GrayscaleReducer,
}

impl AdaptiveThresholder {
    /// `grayscale_workers` is only used when the input still has colour.
    pub fn new(params: ThresholdParams, grayscale_workers: usize) -> Self {
        Self {
            params,
            grayscale: GrayscaleReducer::new(grayscale_workers),
        }
    }

    pub fn params(&self) -> ThresholdParams {
        self.params
    }

    /// Binarize `buffer` in place, converting it to grayscale first when it
    /// has more than one channel.
    pub fn apply(&self, buffer: &mut PixelBuffer) -> Result<()> {
        if buffer.channels() > 1 {
            self.grayscale.apply(buffer)?;
        }
        let binary = self.binarize(buffer)?;
        *buffer = binary;
        Ok(())
    }

    /// Produce the binary version of a single-channel buffer.
    #[instrument(skip_all, fields(
        width = gray.width(),
        height = gray.height(),
        window_width = self.params.window_width,
        threshold = self.params.threshold_percentage,
    ))]
    pub fn binarize(&self, gray: &PixelBuffer) -> Result<PixelBuffer> {
        if gray.channels() != 1 {
            return Err(EnhancerError::InvalidChannelCount(gray.channels()));
        }

        let integral = IntegralImage::build(gray)?;
        let (width, height) = (gray.width(), gray.height());

        let window = (width as f64 * self.params.window_width) as u32;
        let half = window / 2;
        let keep = 1.0 - self.params.threshold_percentage;

        let samples = gray.samples();
        let mut binary = vec![BLACK; samples.len()];

        for row in 0..height {
            let y1 = row.saturating_sub(half);
            let y2 = (row + half).min(height - 1);
            for col in 0..width {
                let x1 = col.saturating_sub(half);
                let x2 = (col + half).min(width - 1);

                let count = (x2 - x1) as u64 * (y2 - y1) as u64;
                let window_sum = integral.window_sum(x1, y1, x2, y2);

                let index = row as usize * width as usize + col as usize;
                let scaled_pixel = samples[index] as u64 * count;
                let scaled_mean = (window_sum as f64 * keep) as u64;

                if scaled_pixel > scaled_mean {
                    binary[index] = WHITE;
                }
            }
        }

        debug!(window, half, "Adaptive thresholding complete");
        PixelBuffer::new(width, height, 1, binary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(window_width: f64, threshold_percentage: f64) -> ThresholdParams {
        ThresholdParams {
            window_width,
            threshold_percentage,
        }
    }

    fn noisy(width: u32, height: u32) -> PixelBuffer {
        let samples = (0..width * height)
            .map(|i| (i.wrapping_mul(2654435761) >> 24) as u8)
            .collect();
        PixelBuffer::new(width, height, 1, samples).unwrap()
    }

    #[test]
    fn striped_rows_match_hand_computed_result() {
        let row = [10u8, 200, 10, 200];
        let samples: Vec<u8> = row.iter().copied().cycle().take(16).collect();
        let gray = PixelBuffer::new(4, 4, 1, samples).unwrap();

        let binary = AdaptiveThresholder::new(params(1.0, 0.0), 1)
            .binarize(&gray)
            .unwrap();

        let expected: Vec<u8> = [0u8, 255, 0, 255].iter().copied().cycle().take(16).collect();
        assert_eq!(binary.samples(), expected.as_slice());
    }

    #[test]
    fn output_is_strictly_binary() {
        let gray = noisy(40, 30);
        for (w, t) in [(0.125, 0.15), (0.5, 0.0), (1.0, 1.0), (0.0, 0.5)] {
            let binary = AdaptiveThresholder::new(params(w, t), 1)
                .binarize(&gray)
                .unwrap();
            assert!(
                binary.samples().iter().all(|&v| v == WHITE || v == BLACK),
                "non-binary sample for window {w}, threshold {t}"
            );
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let gray = noisy(64, 48);
        let thresholder = AdaptiveThresholder::new(params(0.125, 0.15), 1);
        let first = thresholder.binarize(&gray).unwrap();
        let second = thresholder.binarize(&gray).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn uniform_image_is_white_for_positive_threshold() {
        let gray = PixelBuffer::filled(16, 12, 1, 128);
        for t in [0.01, 0.15, 0.5, 1.0] {
            let binary = AdaptiveThresholder::new(params(0.5, t), 1)
                .binarize(&gray)
                .unwrap();
            assert!(binary.samples().iter().all(|&v| v == WHITE), "threshold {t}");
        }
    }

    #[test]
    fn uniform_image_is_black_at_zero_threshold() {
        // Each pixel equals its local mean exactly, and the comparison is strict.
        let gray = PixelBuffer::filled(16, 12, 1, 128);
        let binary = AdaptiveThresholder::new(params(0.5, 0.0), 1)
            .binarize(&gray)
            .unwrap();
        assert!(binary.samples().iter().all(|&v| v == BLACK));
    }

    #[test]
    fn degenerate_window_yields_black() {
        // A window narrower than two pixels has a zero pixel count.
        let gray = PixelBuffer::filled(10, 10, 1, 200);
        let binary = AdaptiveThresholder::new(params(0.0, 0.15), 1)
            .binarize(&gray)
            .unwrap();
        assert!(binary.samples().iter().all(|&v| v == BLACK));
    }

    #[test]
    fn colour_input_is_converted_first() {
        let mut rgb = PixelBuffer::filled(8, 8, 3, 90);
        AdaptiveThresholder::new(params(0.5, 0.15), 2)
            .apply(&mut rgb)
            .unwrap();
        assert_eq!(rgb.channels(), 1);
        assert_eq!((rgb.width(), rgb.height()), (8, 8));
    }

    #[test]
    fn gray_alpha_input_is_rejected() {
        let mut la = PixelBuffer::filled(4, 4, 2, 90);
        let err = AdaptiveThresholder::new(params(0.5, 0.15), 1)
            .apply(&mut la)
            .unwrap_err();
        assert!(matches!(err, EnhancerError::InvalidChannelCount(2)));
    }

    #[test]
    fn empty_image_is_fine() {
        let gray = PixelBuffer::new(0, 0, 1, Vec::new()).unwrap();
        let binary = AdaptiveThresholder::new(params(0.5, 0.15), 1)
            .binarize(&gray)
            .unwrap();
        assert!(binary.samples().is_empty());
    }
}
