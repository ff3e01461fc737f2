// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Thread-count benchmark — reruns the batch scheduler across worker counts
// for three parallelisation layouts and records the wall-clock time of each.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

use docbin_core::error::{EnhancerError, Result};
use docbin_core::{EnhancerConfig, OperationKind, Severity};
use serde::Serialize;
use tracing::{info, instrument};

use crate::scheduler::BatchScheduler;

/// Which level(s) of parallelism a sweep varies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BenchmarkConfiguration {
    /// Files one at a time, grayscale conversion on `n` threads.
    ParallelGrayscale,
    /// `n` files at once, each converted on a single thread.
    ParallelThreshold,
    /// `n` files at once, each converted on `n` threads.
    AllParallel,
}

impl BenchmarkConfiguration {
    pub const ALL: [Self; 3] = [Self::ParallelGrayscale, Self::ParallelThreshold, Self::AllParallel];

    pub fn operation(self) -> OperationKind {
        match self {
            Self::ParallelGrayscale => OperationKind::Grayscale,
            Self::ParallelThreshold | Self::AllParallel => OperationKind::AdaptiveThreshold,
        }
    }

    /// `(outer, inner)` thread counts for sweep step `n`.
    pub fn threads(self, n: usize) -> (usize, usize) {
        match self {
            Self::ParallelGrayscale => (1, n),
            Self::ParallelThreshold => (n, 1),
            Self::AllParallel => (n, n),
        }
    }

    /// Appended to the configured output folder name so sweeps don't mix.
    pub fn output_suffix(self) -> &'static str {
        match self {
            Self::ParallelGrayscale => "_parallelGrayscale_benchmark",
            Self::ParallelThreshold => "_parallelAdaptiveSequentialGrayscale_benchmark",
            Self::AllParallel => "_parallelAdaptiveParallelGrayscale_benchmark",
        }
    }

    /// File name used by [`CsvReportSink`].
    pub fn report_file_name(self) -> &'static str {
        match self {
            Self::ParallelGrayscale => "threads_benchmark_grayscaleconversion.csv",
            Self::ParallelThreshold => "threads_benchmark_adaptivethresholding.csv",
            Self::AllParallel => "threads_benchmark_allparallelized.csv",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ParallelGrayscale => "Parallelized grayscale conversion only",
            Self::ParallelThreshold => {
                "Parallelized adaptive thresholding and single-core grayscale conversion"
            }
            Self::AllParallel => {
                "Parallelized adaptive thresholding and parallelized grayscale conversion"
            }
        }
    }
}

/// One timed run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkRow {
    pub configuration: BenchmarkConfiguration,
    pub threads: usize,
    pub seconds: f64,
}

/// Destination for benchmark timings.
pub trait ReportSink {
    fn record(&mut self, row: &BenchmarkRow) -> Result<()>;

    /// Called once after the last row.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ReportSink for Vec<BenchmarkRow> {
    fn record(&mut self, row: &BenchmarkRow) -> Result<()> {
        self.push(*row);
        Ok(())
    }
}

#[derive(Serialize)]
struct CsvRecord {
    number_of_threads: usize,
    runtime_in_seconds: f64,
}

/// Writes one CSV file per configuration into a folder.
pub struct CsvReportSink {
    writers: BTreeMap<BenchmarkConfiguration, csv::Writer<File>>,
}

impl CsvReportSink {
    /// Create (or truncate) the three report files inside `dir`. Headers are
    /// written immediately so a sweep that never runs still leaves valid files.
    pub fn create(dir: &Path) -> Result<Self> {
        let mut writers = BTreeMap::new();
        for configuration in BenchmarkConfiguration::ALL {
            let path = dir.join(configuration.report_file_name());
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_path(&path)
                .map_err(report_error)?;
            writer
                .write_record(["number_of_threads", "runtime_in_seconds"])
                .map_err(report_error)?;
            writers.insert(configuration, writer);
        }
        Ok(Self { writers })
    }
}

impl ReportSink for CsvReportSink {
    fn record(&mut self, row: &BenchmarkRow) -> Result<()> {
        let writer = self
            .writers
            .get_mut(&row.configuration)
            .ok_or_else(|| EnhancerError::Report(format!("no writer for {:?}", row.configuration)))?;
        writer
            .serialize(CsvRecord {
                number_of_threads: row.threads,
                runtime_in_seconds: row.seconds,
            })
            .map_err(report_error)
    }

    fn finish(&mut self) -> Result<()> {
        for writer in self.writers.values_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

fn report_error(err: csv::Error) -> EnhancerError {
    EnhancerError::Report(err.to_string())
}

/// Sweeps thread counts from 1 to `max_threads` for every
/// [`BenchmarkConfiguration`].
pub struct BenchmarkHarness<'a> {
    scheduler: &'a BatchScheduler,
    max_threads: usize,
}

impl<'a> BenchmarkHarness<'a> {
    /// Harness sweeping up to twice the logical core count.
    pub fn new(scheduler: &'a BatchScheduler) -> Self {
        Self {
            scheduler,
            max_threads: num_cpus::get().max(1) * 2,
        }
    }

    pub fn with_max_threads(mut self, max_threads: usize) -> Self {
        self.max_threads = max_threads.max(1);
        self
    }

    pub fn max_threads(&self) -> usize {
        self.max_threads
    }

    /// Run all sweeps. Per-file output is silenced while they run and
    /// `config` is restored afterwards, whether or not a run failed.
    #[instrument(skip_all, fields(max_threads = self.max_threads))]
    pub fn run(&self, config: &mut EnhancerConfig, sink: &mut dyn ReportSink) -> Result<Vec<BenchmarkRow>> {
        let original = config.clone();
        let result = self.sweep(config, &original.output_directory, sink);
        *config = original;
        result
    }

    fn sweep(
        &self,
        config: &mut EnhancerConfig,
        base_output: &str,
        sink: &mut dyn ReportSink,
    ) -> Result<Vec<BenchmarkRow>> {
        let reporter = self.scheduler.reporter();
        let mut rows = Vec::with_capacity(BenchmarkConfiguration::ALL.len() * self.max_threads);
        config.verbose = false;

        for (index, configuration) in BenchmarkConfiguration::ALL.into_iter().enumerate() {
            reporter.report(
                &format!("Starting benchmark {}: {}", index + 1, configuration.title()),
                Severity::Success,
            );
            config.output_directory = format!("{base_output}{}", configuration.output_suffix());

            for n in 1..=self.max_threads {
                let (outer, inner) = configuration.threads(n);
                config.outer_threads = outer;
                config.inner_threads = inner;

                let started = Instant::now();
                self.scheduler.process_folder(config, configuration.operation())?;
                let row = BenchmarkRow {
                    configuration,
                    threads: n,
                    seconds: started.elapsed().as_secs_f64(),
                };
                info!(?configuration, threads = n, seconds = row.seconds, "Benchmark step");
                sink.record(&row)?;
                rows.push(row);
            }
        }

        sink.finish()?;
        reporter.report("Benchmarks are completed", Severity::Success);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_layouts_match_configuration() {
        assert_eq!(BenchmarkConfiguration::ParallelGrayscale.threads(6), (1, 6));
        assert_eq!(BenchmarkConfiguration::ParallelThreshold.threads(6), (6, 1));
        assert_eq!(BenchmarkConfiguration::AllParallel.threads(6), (6, 6));
        assert_eq!(
            BenchmarkConfiguration::ParallelGrayscale.operation(),
            OperationKind::Grayscale
        );
    }

    #[test]
    fn csv_sink_writes_header_once_per_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = CsvReportSink::create(dir.path()).unwrap();
        for threads in 1..=2 {
            sink.record(&BenchmarkRow {
                configuration: BenchmarkConfiguration::AllParallel,
                threads,
                seconds: 0.5,
            })
            .unwrap();
        }
        sink.finish().unwrap();

        let all = std::fs::read_to_string(dir.path().join("threads_benchmark_allparallelized.csv")).unwrap();
        assert_eq!(all, "number_of_threads,runtime_in_seconds\n1,0.5\n2,0.5\n");

        let gray = std::fs::read_to_string(dir.path().join("threads_benchmark_grayscaleconversion.csv")).unwrap();
        assert_eq!(gray, "number_of_threads,runtime_in_seconds\n");
    }
}
