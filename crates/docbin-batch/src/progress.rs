// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress reporting — the shared processed-file counter and the reporter
// seam that renders notifications.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use docbin_core::Severity;
use tracing::{error, info};

/// Receives user-facing notifications. Formatting and colour are up to the
/// implementation.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, message: &str, severity: Severity);
}

/// Forwards notifications to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn report(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info | Severity::Success => info!(target: "docbin::progress", "{message}"),
            Severity::Error => error!(target: "docbin::progress", "{message}"),
        }
    }
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {
    fn report(&self, _message: &str, _severity: Severity) {}
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Saved { output: PathBuf },
    LoadFailed { input: PathBuf, reason: String },
    ProcessFailed { input: PathBuf, reason: String },
    SaveFailed { output: PathBuf, reason: String },
}

impl FileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// One-line notification for this outcome.
    pub fn message(&self) -> String {
        match self {
            Self::Saved { output } => format!("{} has been saved successfully.", file_name(output)),
            Self::LoadFailed { input, reason } => {
                format!("Image failed to load at path: {} ({reason})", input.display())
            }
            Self::ProcessFailed { input, reason } => {
                format!("{} could not be processed: {reason}", file_name(input))
            }
            Self::SaveFailed { output, reason } => {
                format!("{} could not be saved: {reason}", file_name(output))
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Snapshot of a batch's progress.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Mutex-guarded count of finished files.
///
/// The only mutation is [`ProgressCounter::record`], which bumps the count
/// and emits the matching notification while holding the lock, so lines from
/// different workers never interleave.
#[derive(Debug)]
pub struct ProgressCounter {
    total: usize,
    tally: Mutex<Tally>,
}

impl ProgressCounter {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            tally: Mutex::new(Tally::default()),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Count `outcome` and, when a reporter is given, announce it.
    /// Returns the number of files processed so far, this one included.
    pub fn record(&self, outcome: &FileOutcome, reporter: Option<&dyn ProgressReporter>) -> usize {
        let mut tally = self.tally.lock().unwrap_or_else(PoisonError::into_inner);
        tally.processed += 1;
        if outcome.is_success() {
            tally.succeeded += 1;
        } else {
            tally.failed += 1;
        }

        if let Some(reporter) = reporter {
            reporter.report(
                &format!("{} / {} ", tally.processed, self.total),
                Severity::Info,
            );
            let severity = if outcome.is_success() {
                Severity::Success
            } else {
                Severity::Error
            };
            reporter.report(&outcome.message(), severity);
        }

        tally.processed
    }

    pub fn snapshot(&self) -> Tally {
        *self.tally.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    /// Collects every notification in order.
    #[derive(Default)]
    struct Recording(Mutex<Vec<(String, Severity)>>);

    impl ProgressReporter for Recording {
        fn report(&self, message: &str, severity: Severity) {
            self.0.lock().unwrap().push((message.to_string(), severity));
        }
    }

    fn saved(name: &str) -> FileOutcome {
        FileOutcome::Saved {
            output: PathBuf::from("out").join(name),
        }
    }

    #[test]
    fn record_counts_and_reports_in_pairs() {
        let counter = ProgressCounter::new(2);
        let reporter = Recording::default();

        assert_eq!(counter.record(&saved("a_binarized.jpg"), Some(&reporter)), 1);
        let failure = FileOutcome::SaveFailed {
            output: "out/b_binarized.jpg".into(),
            reason: "disk full".into(),
        };
        assert_eq!(counter.record(&failure, Some(&reporter)), 2);

        let log = reporter.0.lock().unwrap();
        assert_eq!(log.len(), 4);
        assert_eq!(log[0], ("1 / 2 ".to_string(), Severity::Info));
        assert_eq!(log[1].1, Severity::Success);
        assert!(log[1].0.contains("a_binarized.jpg has been saved"));
        assert_eq!(log[3].1, Severity::Error);
        assert_eq!(
            counter.snapshot(),
            Tally {
                processed: 2,
                succeeded: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn silent_record_still_counts() {
        let counter = ProgressCounter::new(1);
        counter.record(&saved("x.png"), None);
        assert_eq!(counter.snapshot().processed, 1);
    }

    #[test]
    fn notifications_stay_paired_across_threads() {
        let counter = Arc::new(ProgressCounter::new(400));
        let reporter = Arc::new(Recording::default());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let counter = Arc::clone(&counter);
                let reporter = Arc::clone(&reporter);
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        counter.record(&saved("p.png"), Some(reporter.as_ref()));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(counter.snapshot().processed, 400);
        let log = reporter.0.lock().unwrap();
        for (i, pair) in log.chunks(2).enumerate() {
            assert_eq!(pair[0].0, format!("{} / 400 ", i + 1));
            assert_eq!(pair[1].1, Severity::Success);
        }
    }
}
