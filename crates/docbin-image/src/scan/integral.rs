// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Integral image (summed-area table) over a single-channel buffer.

use docbin_core::error::{EnhancerError, Result};

use crate::buffer::PixelBuffer;

/// Prefix sums over a single-channel buffer.
///
/// `sums[r * width + c]` holds the sum of every sample with row <= r and
/// column <= c. Accumulators are 64-bit so large bright scans cannot overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegralImage {
    width: u32,
    height: u32,
    sums: Vec<u64>,
}

impl IntegralImage {
    /// Build the table column by column, carrying a running column sum.
    pub fn build(gray: &PixelBuffer) -> Result<Self> {
        if gray.channels() != 1 {
            return Err(EnhancerError::InvalidChannelCount(gray.channels()));
        }

        let width = gray.width() as usize;
        let height = gray.height() as usize;
        let data = gray.samples();
        let mut sums = vec![0u64; width * height];

        for column in 0..width {
            let mut column_sum = 0u64;
            for row in 0..height {
                let index = row * width + column;
                column_sum += data[index] as u64;
                sums[index] = if column == 0 {
                    column_sum
                } else {
                    column_sum + sums[index - 1]
                };
            }
        }

        Ok(Self {
            width: gray.width(),
            height: gray.height(),
            sums,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Sum of the rectangle (0, 0)..=(row, col).
    pub fn at(&self, row: u32, col: u32) -> u64 {
        self.sums[row as usize * self.width as usize + col as usize]
    }

    /// Inclusion-exclusion over the corners `(y1, x1)` and `(y2, x2)`:
    /// `I[y2,x2] - I[y1,x2] - I[y2,x1] + I[y1,x1]`.
    ///
    /// This is the sum over rows `y1+1..=y2` and columns `x1+1..=x2`; the
    /// corner row and column themselves are excluded.
    pub fn window_sum(&self, x1: u32, y1: u32, x2: u32, y2: u32) -> u64 {
        // Adding before subtracting keeps every intermediate non-negative.
        (self.at(y2, x2) + self.at(y1, x1)) - self.at(y1, x2) - self.at(y2, x1)
    }

    /// Raw row-major table.
    pub fn as_slice(&self) -> &[u64] {
        &self.sums
    }
}
