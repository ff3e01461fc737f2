// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for docbin.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File extensions accepted as batch input (compared case-insensitively).
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["jpg", "png", "bmp"];

/// Whether `extension` (with or without a leading dot) names a supported
/// input file type.
pub fn is_supported_extension(extension: &str) -> bool {
    let ext = extension.trim_start_matches('.');
    SUPPORTED_EXTENSIONS
        .iter()
        .any(|supported| supported.eq_ignore_ascii_case(ext))
}

/// Which pipeline a batch runs over each file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationKind {
    /// Collapse to single-channel luminance only.
    Grayscale,
    /// Grayscale (if needed) followed by integral-image adaptive thresholding.
    AdaptiveThreshold,
}

impl OperationKind {
    /// Suffix appended to the file stem of every output.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Grayscale => "_grayscale",
            Self::AdaptiveThreshold => "_binarized",
        }
    }
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Grayscale => write!(f, "grayscale conversion"),
            Self::AdaptiveThreshold => write!(f, "adaptive thresholding"),
        }
    }
}

/// Output container written by the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Bmp,
}

impl OutputFormat {
    /// Resolve a format from a file extension such as `"JPG"` or `".png"`.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let ext = extension.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" => Some(Self::Bmp),
            _ => None,
        }
    }

    /// Resolve a format from the extension of `path`.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical extension (without dot) used for output file names.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Bmp => "bmp",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s).ok_or_else(|| format!("unsupported output format: {s}"))
    }
}

/// Severity of a progress notification. Reporters decide how to render it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// Parameters of the adaptive thresholding step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Window width as a fraction of the image width, in `[0, 1]`.
    pub window_width: f64,
    /// How far below the local mean a pixel may fall and still count as
    /// foreground, in `[0, 1]`.
    pub threshold_percentage: f64,
}

impl Default for ThresholdParams {
    fn default() -> Self {
        Self {
            window_width: 0.125,
            threshold_percentage: 0.15,
        }
    }
}

/// One discovered input file and the operation to run on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub path: PathBuf,
    pub kind: OperationKind,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>, kind: OperationKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// `<stem><suffix>.<ext>`, where the extension comes from `format` or,
    /// when `None`, from the input file's own format.
    pub fn output_file_name(&self, format: Option<OutputFormat>) -> String {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = format
            .or_else(|| OutputFormat::from_path(&self.path))
            .unwrap_or(OutputFormat::Jpeg)
            .extension();
        format!("{stem}{}.{ext}", self.kind.suffix())
    }

    /// Container format the output will be written in.
    pub fn output_format(&self, format: Option<OutputFormat>) -> OutputFormat {
        format
            .or_else(|| OutputFormat::from_path(&self.path))
            .unwrap_or(OutputFormat::Jpeg)
    }
}
