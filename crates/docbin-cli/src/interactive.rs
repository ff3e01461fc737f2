// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Interactive prompts. Each question repeats until the answer is usable;
// an empty answer keeps the value already in the configuration where that
// value is valid.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use docbin_core::EnhancerConfig;

use crate::cli::parse_switch;

/// Fill `config` from answers read on `input`, writing questions to `output`.
pub fn prompt_config<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    mut config: EnhancerConfig,
) -> io::Result<EnhancerConfig> {
    config.input_path = ask(input, output, "Folder containing the scans: ", |answer| {
        let path = PathBuf::from(answer);
        if path.is_dir() {
            Ok(path)
        } else {
            Err(format!("The specified folder does not exist: {answer}"))
        }
    })?;

    let current = config.output_directory.clone();
    config.output_directory = ask(input, output, "Name of the output folder: ", |answer| {
        match (answer.is_empty(), current.is_empty()) {
            (false, _) => Ok(answer.to_string()),
            (true, false) => Ok(current.clone()),
            (true, true) => Err("An output directory must be specified.".to_string()),
        }
    })?;

    let default_window = config.window_width;
    config.window_width = ask(
        input,
        output,
        &format!("Window width between 0 and 1 [{default_window}]: "),
        |answer| fraction(answer, default_window, "Window width"),
    )?;

    let default_threshold = config.threshold_percentage;
    config.threshold_percentage = ask(
        input,
        output,
        &format!("Threshold percentage between 0 and 1 [{default_threshold}]: "),
        |answer| fraction(answer, default_threshold, "Threshold percentage"),
    )?;

    let default_verbose = config.verbose;
    config.verbose = ask(
        input,
        output,
        &format!("Show every processed file? (y/n) [{}]: ", if default_verbose { "y" } else { "n" }),
        |answer| {
            if answer.is_empty() {
                Ok(default_verbose)
            } else {
                parse_switch(answer)
            }
        },
    )?;

    Ok(config)
}

fn fraction(answer: &str, default: f64, what: &str) -> Result<f64, String> {
    if answer.is_empty() {
        return Ok(default);
    }
    match answer.parse::<f64>() {
        Ok(value) if (0.0..=1.0).contains(&value) => Ok(value),
        _ => Err(format!("{what} needs to be a floating point number between 0 and 1.")),
    }
}

fn ask<R, W, T, F>(input: &mut R, output: &mut W, question: &str, mut accept: F) -> io::Result<T>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<T, String>,
{
    let mut line = String::new();
    loop {
        write!(output, "{question}")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        match accept(line.trim()) {
            Ok(value) => return Ok(value),
            Err(problem) => writeln!(output, "{problem}")?,
        }
    }
}
