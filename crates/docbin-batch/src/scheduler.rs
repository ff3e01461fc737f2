// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch scheduler — runs the enhancement pipeline over every supported file
// in a folder on a pool of workers that claim files one at a time.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use docbin_core::error::{EnhancerError, Result};
use docbin_core::{EnhancerConfig, FileTask, OperationKind, Severity};
use docbin_image::{DocumentEnhancer, ImageCodec, ImageCrateCodec};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::discovery::{discover, ensure_output_dir, output_collisions};
use crate::progress::{FileOutcome, ProgressCounter, ProgressReporter};

/// Result of one pass over a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Supported files found in the input folder.
    pub discovered: usize,
    /// Files attempted (always equal to `discovered` on return).
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Wall-clock time from directory setup to the last file.
    pub elapsed: Duration,
}

/// Processes whole folders through the enhancement pipeline.
///
/// Files are handed out dynamically: each worker claims the next unprocessed
/// index from a shared atomic cursor until the list is exhausted, so a few
/// large scans cannot leave other workers idle. Failures are counted and
/// reported per file and never stop the batch.
pub struct BatchScheduler {
    codec: Arc<dyn ImageCodec>,
    reporter: Arc<dyn ProgressReporter>,
}

impl BatchScheduler {
    pub fn new(codec: Arc<dyn ImageCodec>, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self { codec, reporter }
    }

    /// Scheduler using the `image` crate codec.
    pub fn with_reporter(reporter: Arc<dyn ProgressReporter>) -> Self {
        Self::new(Arc::new(ImageCrateCodec), reporter)
    }

    pub fn reporter(&self) -> &dyn ProgressReporter {
        self.reporter.as_ref()
    }

    /// Run `kind` over every supported file in `config.input_path`, writing
    /// results into `config.output_path()`.
    ///
    /// Returns an error only when the input folder cannot be listed or the
    /// worker pool cannot be started; everything else is reported per file.
    #[instrument(skip_all, fields(
        input = %config.input_path.display(),
        %kind,
        outer_threads = config.outer_threads,
        inner_threads = config.inner_threads,
    ))]
    pub fn process_folder(&self, config: &EnhancerConfig, kind: OperationKind) -> Result<BatchSummary> {
        let started = Instant::now();
        let output_dir = config.output_path();

        match ensure_output_dir(&output_dir) {
            Ok(true) if config.verbose => self.reporter.report(
                &format!("Created the output directory: {}", output_dir.display()),
                Severity::Success,
            ),
            Ok(_) => {}
            Err(err) => {
                warn!(error = %err, "Output directory unavailable; saves will fail individually");
                self.reporter.report(&err.to_string(), Severity::Error);
            }
        }

        let tasks = discover(&config.input_path, kind)?;
        for (first, second) in output_collisions(&tasks, config.output_format) {
            warn!(
                first = %first.path.display(),
                second = %second.path.display(),
                "Inputs share an output name; the later save overwrites the earlier one"
            );
            if config.verbose {
                self.reporter.report(
                    &format!(
                        "{} and {} write to the same output file",
                        first.path.display(),
                        second.path.display()
                    ),
                    Severity::Error,
                );
            }
        }
        let counter = ProgressCounter::new(tasks.len());
        let reporter = config.verbose.then_some(self.reporter.as_ref());
        let workers = config.outer_threads.max(1).min(tasks.len());

        if workers > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(workers)
                .thread_name(|i| format!("docbin-batch-{i}"))
                .build()
                .map_err(|err| EnhancerError::ThreadPool(err.to_string()))?;

            let cursor = AtomicUsize::new(0);
            let (cursor, tasks, counter) = (&cursor, &tasks, &counter);
            let output_dir = output_dir.as_path();

            // Every worker loops "claim next or exit"; the scope joins them all.
            pool.scope(|scope| {
                for _ in 0..workers {
                    scope.spawn(move |_| {
                        while let Some(task) = tasks.get(cursor.fetch_add(1, Ordering::Relaxed)) {
                            let outcome = self.process_file_isolated(task, config, output_dir);
                            counter.record(&outcome, reporter);
                        }
                    });
                }
            });
        }

        let tally = counter.snapshot();
        let summary = BatchSummary {
            discovered: counter.total(),
            processed: tally.processed,
            succeeded: tally.succeeded,
            failed: tally.failed,
            elapsed: started.elapsed(),
        };
        info!(
            discovered = summary.discovered,
            succeeded = summary.succeeded,
            failed = summary.failed,
            seconds = summary.elapsed.as_secs_f64(),
            "Batch finished"
        );
        Ok(summary)
    }

    /// [`Self::process_file`] with any panic turned into a failed outcome,
    /// so one bad file cannot stop the remaining ones.
    fn process_file_isolated(&self, task: &FileTask, config: &EnhancerConfig, output_dir: &Path) -> FileOutcome {
        catch_unwind(AssertUnwindSafe(|| self.process_file(task, config, output_dir)))
            .unwrap_or_else(|payload| {
                let reason = format!("panicked: {}", panic_message(payload.as_ref()));
                error!(path = %task.path.display(), %reason, "File processing panicked");
                FileOutcome::ProcessFailed {
                    input: task.path.clone(),
                    reason,
                }
            })
    }

    /// Load, enhance and save one file.
    fn process_file(&self, task: &FileTask, config: &EnhancerConfig, output_dir: &Path) -> FileOutcome {
        let codec = self.codec.as_ref();

        let enhancer = match DocumentEnhancer::open(&task.path, codec) {
            Ok(enhancer) => enhancer,
            Err(err) => {
                warn!(path = %task.path.display(), error = %err, "Skipping unreadable file");
                return FileOutcome::LoadFailed {
                    input: task.path.clone(),
                    reason: err.to_string(),
                };
            }
        };

        let enhanced = match enhancer.run(task.kind, config.inner_threads, config.threshold_params()) {
            Ok(enhanced) => enhanced,
            Err(err) => {
                warn!(path = %task.path.display(), error = %err, "Pipeline failed");
                return FileOutcome::ProcessFailed {
                    input: task.path.clone(),
                    reason: err.to_string(),
                };
            }
        };

        let output = output_dir.join(task.output_file_name(config.output_format));
        let format = task.output_format(config.output_format);
        match enhanced.save(&output, format, codec) {
            Ok(()) => FileOutcome::Saved { output },
            Err(err) => {
                warn!(path = %output.display(), error = %err, "Save failed");
                FileOutcome::SaveFailed {
                    output,
                    reason: err.to_string(),
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
