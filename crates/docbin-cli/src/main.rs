// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// docbin — batch enhancement of scanned documents
//
// Entry point. Initialises logging, resolves the run configuration from
// flags, a JSON file or prompts, then runs one batch or the benchmark sweep.

mod cli;
mod interactive;
mod reporter;

use std::io::IsTerminal;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use docbin_batch::{BatchScheduler, BenchmarkHarness, CsvReportSink, ProgressReporter, TracingReporter};
use docbin_core::EnhancerConfig;
use docbin_core::error::Result;
use docbin_core::human_errors::humanize_error;

use cli::Cli;
use reporter::ConsoleReporter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_from(cli::expand_legacy_flags(std::env::args_os()));
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "docbin stopped");
            let human = humanize_error(&err);
            eprintln!("{}", human.message.red().bold());
            eprintln!("{}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = resolve_config(cli)?;
    config.validate()?;

    // Piped output gets plain log lines instead of colour codes.
    let reporter: Arc<dyn ProgressReporter> = if std::io::stdout().is_terminal() {
        Arc::new(ConsoleReporter)
    } else {
        Arc::new(TracingReporter)
    };
    let scheduler = BatchScheduler::with_reporter(reporter);

    if config.benchmark {
        let mut sink = CsvReportSink::create(Path::new("."))?;
        let harness = BenchmarkHarness::new(&scheduler);
        tracing::info!(max_threads = harness.max_threads(), "Starting benchmark sweep");
        let rows = harness.run(&mut config, &mut sink)?;
        tracing::debug!(report = %serde_json::to_string(&rows)?, "Benchmark results");
        return Ok(());
    }

    let summary = scheduler.process_folder(&config, config.operation)?;
    println!(
        "{}",
        format!("Finished processing in {} seconds", summary.elapsed.as_secs_f64()).green()
    );
    if summary.failed > 0 {
        println!(
            "{}",
            format!("{} of {} files could not be processed.", summary.failed, summary.discovered).red()
        );
    }
    Ok(())
}

fn resolve_config(cli: &Cli) -> Result<EnhancerConfig> {
    let config = cli.to_config()?;
    if !cli.interactive {
        return Ok(config);
    }

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    // Prompted answers replace the flag values they ask about.
    Ok(interactive::prompt_config(&mut stdin.lock(), &mut stdout, config)?)
}
