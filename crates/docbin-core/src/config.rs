// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{EnhancerError, Result};
use crate::types::{OperationKind, OutputFormat, ThresholdParams};

/// Settings for one batch (or benchmark) run.
///
/// Every field has a default, so a JSON file only needs to name what it
/// changes. Values are checked by [`EnhancerConfig::validate`] before any
/// file is touched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Folder containing the scanned images.
    pub input_path: PathBuf,
    /// Name of the output folder, created inside `input_path`.
    pub output_directory: String,
    /// Window width as a fraction of each image's width.
    pub window_width: f64,
    /// Threshold percentage below the local mean.
    pub threshold_percentage: f64,
    /// Worker threads for the per-file loop.
    pub outer_threads: usize,
    /// Worker threads for grayscale conversion inside one image.
    pub inner_threads: usize,
    /// Print a notification for every processed file.
    pub verbose: bool,
    /// Run the thread-count benchmark instead of a single batch.
    pub benchmark: bool,
    /// Operation applied to every file.
    pub operation: OperationKind,
    /// Force an output container; `None` keeps each input's format.
    pub output_format: Option<OutputFormat>,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        let threads = num_cpus::get().max(1);
        let params = ThresholdParams::default();
        Self {
            input_path: PathBuf::new(),
            output_directory: String::new(),
            window_width: params.window_width,
            threshold_percentage: params.threshold_percentage,
            outer_threads: threads,
            inner_threads: threads,
            verbose: true,
            benchmark: false,
            operation: OperationKind::AdaptiveThreshold,
            output_format: None,
        }
    }
}

impl EnhancerConfig {
    /// Read a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Thresholding parameters carried by this configuration.
    pub fn threshold_params(&self) -> ThresholdParams {
        ThresholdParams {
            window_width: self.window_width,
            threshold_percentage: self.threshold_percentage,
        }
    }

    /// Full path of the output folder.
    pub fn output_path(&self) -> PathBuf {
        self.input_path.join(&self.output_directory)
    }

    /// Check every value and report all problems at once.
    pub fn validate(&self) -> Result<()> {
        let mut problems = Vec::new();

        if self.input_path.as_os_str().is_empty() {
            problems.push("Input path can't be empty.".to_string());
        } else if !self.input_path.exists() {
            problems.push(format!(
                "The specified folder does not exist: {}",
                self.input_path.display()
            ));
        } else if !self.input_path.is_dir() {
            problems.push(format!(
                "The specified path is not a directory: {}",
                self.input_path.display()
            ));
        }

        if self.output_directory.trim().is_empty() {
            problems.push("An output directory must be specified.".to_string());
        }

        if !(0.0..=1.0).contains(&self.window_width) {
            problems.push(
                "Window width needs to be a floating point number between 0 and 1.".to_string(),
            );
        }

        if !(0.0..=1.0).contains(&self.threshold_percentage) {
            problems.push(
                "Threshold percentage needs to be a floating point number between 0 and 1."
                    .to_string(),
            );
        }

        if self.outer_threads == 0 || self.inner_threads == 0 {
            problems.push("Number of threads must be positive.".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(EnhancerError::InvalidConfig(problems.join("\n")))
        }
    }
}
