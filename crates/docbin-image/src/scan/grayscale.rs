// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale reduction — collapses an RGB(A) buffer to one luminance channel,
// fanning the pixel range out over a dedicated thread pool.

use std::ops::Range;

use docbin_core::error::{EnhancerError, Result};
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;

/// Reduces multi-channel buffers to single-channel luminance.
///
/// Each output sample is `(R + G + B) / channels`, so for RGBA input the sum
/// of three channels is divided by four. The pixel range is split into one
/// contiguous chunk per worker; the result does not depend on the worker
/// count.
#[derive(Debug, Clone, Copy)]
pub struct GrayscaleReducer {
    workers: usize,
}

impl GrayscaleReducer {
    /// A reducer using `workers` threads (0 is treated as 1).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Replace `buffer` with its single-channel reduction.
    ///
    /// Fails with [`EnhancerError::InvalidChannelCount`] when the buffer has
    /// fewer than three channels; the buffer is left untouched in that case.
    pub fn apply(&self, buffer: &mut PixelBuffer) -> Result<()> {
        let gray = self.reduce(buffer)?;
        *buffer = gray;
        Ok(())
    }

    /// Compute the single-channel reduction of `buffer` into a new buffer.
    #[instrument(skip_all, fields(
        width = buffer.width(),
        height = buffer.height(),
        channels = buffer.channels(),
        workers = self.workers,
    ))]
    pub fn reduce(&self, buffer: &PixelBuffer) -> Result<PixelBuffer> {
        let channels = buffer.channels();
        if channels < 3 {
            return Err(EnhancerError::InvalidChannelCount(channels));
        }

        let pixel_count = buffer.pixel_count();
        let mut gray = vec![0u8; pixel_count];
        let ranges = partition(pixel_count, self.workers);
        let chunks = split_chunks(buffer.samples(), &mut gray, &ranges, channels as usize);

        if self.workers == 1 || pixel_count == 0 {
            for (src, dst) in chunks {
                reduce_range(src, dst, channels);
            }
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.workers)
                .thread_name(|i| format!("docbin-gray-{i}"))
                .build()
                .map_err(|err| EnhancerError::ThreadPool(err.to_string()))?;

            // The scope is the join barrier: it returns once every chunk is written.
            pool.scope(|scope| {
                for (src, dst) in chunks {
                    scope.spawn(move |_| reduce_range(src, dst, channels));
                }
            });
        }

        debug!(chunks = ranges.len(), "Grayscale reduction complete");
        PixelBuffer::new(buffer.width(), buffer.height(), 1, gray)
    }
}

/// Split `pixel_count` pixel indices into `workers` contiguous ranges.
///
/// Every range holds `pixel_count / workers` pixels except the first, which
/// also takes the remainder. The ranges are disjoint, ordered, and cover
/// `0..pixel_count` exactly.
pub fn partition(pixel_count: usize, workers: usize) -> Vec<Range<usize>> {
    let workers = workers.max(1);
    let per_worker = pixel_count / workers;
    let leftover = pixel_count % workers;

    (0..workers)
        .map(|i| {
            if i == 0 {
                0..per_worker + leftover
            } else {
                let start = leftover + i * per_worker;
                start..start + per_worker
            }
        })
        .collect()
}

/// Pair each pixel range with its input samples and output slot.
fn split_chunks<'a>(
    src: &'a [u8],
    dst: &'a mut [u8],
    ranges: &[Range<usize>],
    channels: usize,
) -> Vec<(&'a [u8], &'a mut [u8])> {
    let mut chunks = Vec::with_capacity(ranges.len());
    let mut src_rest = src;
    let mut dst_rest = dst;

    for range in ranges {
        let len = range.len();
        let (src_chunk, src_tail) = src_rest.split_at(len * channels);
        let (dst_chunk, dst_tail) = std::mem::take(&mut dst_rest).split_at_mut(len);
        chunks.push((src_chunk, dst_chunk));
        src_rest = src_tail;
        dst_rest = dst_tail;
    }

    chunks
}

fn reduce_range(src: &[u8], dst: &mut [u8], channels: u8) {
    let divisor = channels as u32;
    for (pixel, out) in src.chunks_exact(channels as usize).zip(dst.iter_mut()) {
        let sum = pixel[0] as u32 + pixel[1] as u32 + pixel[2] as u32;
        *out = (sum / divisor) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic pseudo-random RGB(A) test pattern.
    fn pattern(width: u32, height: u32, channels: u8) -> PixelBuffer {
        let len = width as usize * height as usize * channels as usize;
        let samples = (0..len)
            .map(|i| ((i * 7919 + 13) % 251) as u8)
            .collect();
        PixelBuffer::new(width, height, channels, samples).unwrap()
    }

    #[test]
    fn partition_covers_range_without_overlap() {
        for (pixels, workers) in [(10, 3), (7, 7), (3, 8), (0, 4), (1000, 1)] {
            let ranges = partition(pixels, workers);
            assert_eq!(ranges.len(), workers);
            let mut next = 0;
            for range in &ranges {
                assert_eq!(range.start, next, "gap or overlap at {range:?}");
                next = range.end;
            }
            assert_eq!(next, pixels);
        }
    }

    #[test]
    fn remainder_goes_to_first_chunk() {
        let ranges = partition(10, 3);
        assert_eq!(ranges, vec![0..4, 4..7, 7..10]);
    }

    #[test]
    fn output_is_single_channel_with_same_dimensions() {
        let input = pattern(17, 9, 3);
        let gray = GrayscaleReducer::new(4).reduce(&input).unwrap();
        assert_eq!(gray.channels(), 1);
        assert_eq!((gray.width(), gray.height()), (17, 9));
        assert_eq!(gray.samples().len(), 17 * 9);
    }

    #[test]
    fn result_is_independent_of_worker_count() {
        for channels in [3u8, 4] {
            let input = pattern(31, 23, channels);
            let reference = GrayscaleReducer::new(1).reduce(&input).unwrap();
            for workers in [2, 4, 8] {
                let gray = GrayscaleReducer::new(workers).reduce(&input).unwrap();
                assert_eq!(gray, reference, "workers = {workers}, channels = {channels}");
            }
        }
    }

    #[test]
    fn more_workers_than_pixels_still_works() {
        let input = pattern(2, 1, 3);
        let gray = GrayscaleReducer::new(8).reduce(&input).unwrap();
        assert_eq!(gray, GrayscaleReducer::new(1).reduce(&input).unwrap());
    }

    #[test]
    fn rgba_divides_by_four() {
        let input = PixelBuffer::new(1, 1, 4, vec![100, 100, 100, 255]).unwrap();
        let gray = GrayscaleReducer::new(1).reduce(&input).unwrap();
        assert_eq!(gray.samples(), &[75]);
    }

    #[test]
    fn rgb_averages_channels() {
        let input = PixelBuffer::new(2, 1, 3, vec![255, 255, 255, 10, 20, 31]).unwrap();
        let gray = GrayscaleReducer::new(2).reduce(&input).unwrap();
        assert_eq!(gray.samples(), &[255, 20]);
    }

    #[test]
    fn too_few_channels_leaves_buffer_untouched() {
        let mut buffer = PixelBuffer::filled(4, 4, 1, 42);
        let before = buffer.clone();
        let err = GrayscaleReducer::new(2).apply(&mut buffer).unwrap_err();
        assert!(matches!(err, EnhancerError::InvalidChannelCount(1)));
        assert_eq!(buffer, before);
    }
}
