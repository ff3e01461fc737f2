// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Coloured terminal output for progress notifications.

use colored::Colorize;
use docbin_batch::ProgressReporter;
use docbin_core::Severity;

/// Prints notifications to stdout: progress counts without a newline,
/// successes in green, errors in red.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn report(&self, message: &str, severity: Severity) {
        match severity {
            // "3 / 10 " prefixes the outcome line that follows it.
            Severity::Info => print!("{}", message.bright_black()),
            Severity::Success => println!("{}", message.green()),
            Severity::Error => println!("{}", message.red()),
        }
    }
}
