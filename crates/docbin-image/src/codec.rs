// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image codec seam — decoding files into pixel buffers and encoding them back
// as JPEG, PNG or BMP.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use docbin_core::OutputFormat;
use docbin_core::error::{EnhancerError, Result};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, instrument};

use crate::buffer::PixelBuffer;

/// JPEG quality used for every JPEG output.
pub const JPEG_QUALITY: u8 = 100;

/// Load and save capability used by the batch scheduler.
///
/// Implementations are shared by every worker thread, so they must not keep
/// per-file state.
pub trait ImageCodec: Send + Sync {
    /// Decode the file at `path`.
    fn load(&self, path: &Path) -> Result<PixelBuffer>;

    /// Encode `buffer` into `path` using `format`.
    fn save(&self, buffer: &PixelBuffer, path: &Path, format: OutputFormat) -> Result<()>;
}

/// Codec backed by the `image` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    #[instrument(skip_all, fields(path = %path.display()))]
    fn load(&self, path: &Path) -> Result<PixelBuffer> {
        let image = image::open(path).map_err(|err| EnhancerError::Load {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        debug!(
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Image decoded"
        );
        Ok(PixelBuffer::from_dynamic(image))
    }

    #[instrument(skip_all, fields(path = %path.display(), ?format))]
    fn save(&self, buffer: &PixelBuffer, path: &Path, format: OutputFormat) -> Result<()> {
        let save_error = |reason: String| EnhancerError::Save {
            path: path.to_path_buf(),
            reason,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| save_error(err.to_string()))?;
        }

        let image = buffer.clone().into_dynamic()?;
        match format {
            OutputFormat::Jpeg => {
                let file = File::create(path).map_err(|err| save_error(err.to_string()))?;
                let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    BufWriter::new(file),
                    JPEG_QUALITY,
                );
                strip_alpha(image)
                    .write_with_encoder(encoder)
                    .map_err(|err| save_error(format!("JPEG encoding failed: {err}")))?;
            }
            OutputFormat::Png => image
                .save_with_format(path, ImageFormat::Png)
                .map_err(|err| save_error(err.to_string()))?,
            OutputFormat::Bmp => image
                .save_with_format(path, ImageFormat::Bmp)
                .map_err(|err| save_error(err.to_string()))?,
        }

        debug!("Image written");
        Ok(())
    }
}

/// JPEG has no alpha channel; drop it while keeping gray images gray.
fn strip_alpha(image: DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLumaA8(_) => DynamicImage::ImageLuma8(image.to_luma8()),
        DynamicImage::ImageRgba8(_) => DynamicImage::ImageRgb8(image.to_rgb8()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_format_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PixelBuffer::filled(12, 7, 3, 77);
        let codec = ImageCrateCodec;

        for format in [OutputFormat::Jpeg, OutputFormat::Png, OutputFormat::Bmp] {
            let path = dir.path().join(format!("page.{}", format.extension()));
            codec.save(&buffer, &path, format).unwrap();
            let loaded = codec.load(&path).unwrap();
            assert_eq!((loaded.width(), loaded.height()), (12, 7), "{format:?}");
            assert_eq!(loaded.channels(), 3, "{format:?}");
        }
    }

    #[test]
    fn png_is_lossless_for_binary_output() {
        let dir = tempfile::tempdir().unwrap();
        let samples = (0..64).map(|i| if i % 3 == 0 { 255 } else { 0 }).collect();
        let buffer = PixelBuffer::new(8, 8, 1, samples).unwrap();
        let path = dir.path().join("bin.png");

        ImageCrateCodec.save(&buffer, &path, OutputFormat::Png).unwrap();
        assert_eq!(ImageCrateCodec.load(&path).unwrap(), buffer);
    }

    #[test]
    fn rgba_can_be_written_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = PixelBuffer::filled(4, 4, 4, 200);
        let path = dir.path().join("alpha.jpg");
        ImageCrateCodec.save(&buffer, &path, OutputFormat::Jpeg).unwrap();
        assert_eq!(ImageCrateCodec.load(&path).unwrap().channels(), 3);
    }

    #[test]
    fn save_creates_missing_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.bmp");
        ImageCrateCodec
            .save(&PixelBuffer::filled(2, 2, 1, 0), &path, OutputFormat::Bmp)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn corrupt_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(
            ImageCrateCodec.load(&path),
            Err(EnhancerError::Load { .. })
        ));
    }
}
