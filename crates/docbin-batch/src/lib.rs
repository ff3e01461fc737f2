// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docbin-batch — Folder-level processing for docbin.
//
// Discovers supported scans in a folder, runs the enhancement pipeline over
// them on a dynamically load-balanced worker pool, reports progress, and
// benchmarks the pipeline across thread counts.

pub mod benchmark;
pub mod discovery;
pub mod progress;
pub mod scheduler;

pub use benchmark::{BenchmarkConfiguration, BenchmarkHarness, BenchmarkRow, CsvReportSink, ReportSink};
pub use discovery::{discover, ensure_output_dir, output_collisions};
pub use progress::{FileOutcome, ProgressCounter, ProgressReporter, SilentReporter, TracingReporter};
pub use scheduler::{BatchScheduler, BatchSummary};
