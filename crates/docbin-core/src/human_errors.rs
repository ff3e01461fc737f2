// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command line.
//
// Every technical error is mapped to a plain English summary with a clear
// suggestion of what to try next.

use crate::error::EnhancerError;

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (printed as the first line).
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether the rest of the batch can still run.
    pub recoverable: bool,
}

/// Convert an `EnhancerError` into a `HumanError`.
pub fn humanize_error(err: &EnhancerError) -> HumanError {
    match err {
        EnhancerError::Load { path, .. } => HumanError {
            message: format!("{} could not be read as an image.", path.display()),
            suggestion: "The file may be damaged or not really a JPG, PNG or BMP. Open it in an image viewer to check.".into(),
            recoverable: true,
        },

        EnhancerError::Save { path, .. } => HumanError {
            message: format!("{} could not be saved.", path.display()),
            suggestion: "Check that the output folder is writable and the disk is not full.".into(),
            recoverable: true,
        },

        EnhancerError::InvalidChannelCount(channels) => HumanError {
            message: format!("This image has {channels} colour channel(s) and can't be converted to grayscale."),
            suggestion: "It may already be a grayscale image; it will be processed as-is where possible.".into(),
            recoverable: true,
        },

        EnhancerError::BufferLength { .. } => HumanError {
            message: "The decoded image data was incomplete.".into(),
            suggestion: "Try re-exporting the scan from your scanning software.".into(),
            recoverable: true,
        },

        EnhancerError::DirectoryCreate { path, .. } => HumanError {
            message: format!("The output folder {} could not be created.", path.display()),
            suggestion: "Check the folder permissions, or choose a different output folder name.".into(),
            recoverable: true,
        },

        EnhancerError::InvalidConfig(detail) => HumanError {
            message: "Invalid, missing or unknown arguments were detected.".into(),
            suggestion: format!("{detail}\nRun with --help to see the expected syntax."),
            recoverable: false,
        },

        EnhancerError::ThreadPool(_) => HumanError {
            message: "Worker threads could not be started.".into(),
            suggestion: "Try a smaller number of threads.".into(),
            recoverable: false,
        },

        EnhancerError::Report(_) => HumanError {
            message: "The benchmark results could not be written.".into(),
            suggestion: "Check that the current folder is writable.".into(),
            recoverable: false,
        },

        EnhancerError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The folder or file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Check the path and try again.".into(),
                    recoverable: false,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "docbin doesn't have permission to access that location.".into(),
                    suggestion: "Check the folder permissions, or copy the scans somewhere you own.".into(),
                    recoverable: false,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your storage may be full.".into(),
                    recoverable: false,
                }
            }
        }

        EnhancerError::Serialization(_) => HumanError {
            message: "The configuration file could not be understood.".into(),
            suggestion: "Make sure it is valid JSON with the documented field names.".into(),
            recoverable: false,
        },
    }
}
