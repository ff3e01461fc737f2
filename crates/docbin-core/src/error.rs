// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for docbin.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all docbin operations.
#[derive(Debug, Error)]
pub enum EnhancerError {
    // -- Per-file errors (never abort a batch) --
    #[error("failed to load {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("failed to save {path}: {reason}")]
    Save { path: PathBuf, reason: String },

    // -- Pixel buffer errors --
    #[error("grayscale conversion needs at least 3 channels, buffer has {0}")]
    InvalidChannelCount(u8),

    #[error("pixel buffer holds {actual} samples, expected {expected}")]
    BufferLength { expected: usize, actual: usize },

    // -- Batch setup --
    #[error("could not create output directory {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration:\n{0}")]
    InvalidConfig(String),

    #[error("thread pool could not be built: {0}")]
    ThreadPool(String),

    #[error("benchmark report failed: {0}")]
    Report(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, EnhancerError>;
