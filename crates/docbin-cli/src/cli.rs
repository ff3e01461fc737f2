// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments and their mapping onto `EnhancerConfig`.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use docbin_core::error::Result;
use docbin_core::{EnhancerConfig, OperationKind, OutputFormat};

#[derive(Parser, Debug)]
#[command(
    name = "docbin",
    version,
    about = "Enhance folders of scanned documents with adaptive thresholding"
)]
pub struct Cli {
    /// Folder containing the scanned images (JPG, PNG or BMP)
    #[arg(short, long, alias = "inputPath")]
    pub input_path: Option<PathBuf>,

    /// Name of the output folder, created inside the input folder
    #[arg(short, long, aliases = ["outputDirectory", "outputFolder"])]
    pub output_directory: Option<String>,

    /// Window width as a fraction of the image width [default: 0.125]
    #[arg(short, long, alias = "windowWidth")]
    pub window_width: Option<f64>,

    /// Threshold percentage below the local mean [default: 0.15]
    #[arg(short, long, alias = "thresholdPercentage")]
    pub threshold_percentage: Option<f64>,

    /// Worker threads for both the file loop and grayscale conversion
    #[arg(short = 'n', long, alias = "numberOfThreads")]
    pub threads: Option<usize>,

    /// Worker threads for the file loop (overrides --threads)
    #[arg(long)]
    pub outer_threads: Option<usize>,

    /// Worker threads for grayscale conversion (overrides --threads)
    #[arg(long)]
    pub inner_threads: Option<usize>,

    /// Print a line for every processed file: true/false/y/n [default: true]
    #[arg(short, long, value_parser = parse_switch)]
    pub verbose: Option<bool>,

    /// Run the thread-count benchmark instead of a single batch
    #[arg(short, long)]
    pub benchmark: bool,

    /// Convert to grayscale only, without thresholding
    #[arg(long)]
    pub grayscale_only: bool,

    /// Force the output format: jpg, png or bmp [default: same as input]
    #[arg(short = 'f', long = "format", value_parser = parse_format)]
    pub output_format: Option<OutputFormat>,

    /// JSON configuration file; flags given here override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Ask for the settings on the terminal
    #[arg(long)]
    pub interactive: bool,
}

impl Cli {
    /// Starting configuration: the JSON file if one was given, defaults
    /// otherwise, with every explicit flag applied on top.
    pub fn to_config(&self) -> Result<EnhancerConfig> {
        let mut config = match &self.config {
            Some(path) => EnhancerConfig::load(path)?,
            None => EnhancerConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Overwrite the fields of `config` that were given on the command line.
    pub fn apply(&self, config: &mut EnhancerConfig) {
        if let Some(path) = &self.input_path {
            config.input_path = path.clone();
        }
        if let Some(name) = &self.output_directory {
            config.output_directory = name.clone();
        }
        if let Some(w) = self.window_width {
            config.window_width = w;
        }
        if let Some(t) = self.threshold_percentage {
            config.threshold_percentage = t;
        }
        if let Some(n) = self.threads {
            config.outer_threads = n;
            config.inner_threads = n;
        }
        if let Some(n) = self.outer_threads {
            config.outer_threads = n;
        }
        if let Some(n) = self.inner_threads {
            config.inner_threads = n;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }
        if self.benchmark {
            config.benchmark = true;
        }
        if self.grayscale_only {
            config.operation = OperationKind::Grayscale;
        }
        if self.output_format.is_some() {
            config.output_format = self.output_format;
        }
    }
}

/// Rewrite the two-letter short flags older scripts pass (`-nt`, `-bm`),
/// which clap cannot declare, into their long forms.
pub fn expand_legacy_flags<I>(args: I) -> impl Iterator<Item = OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter().map(|arg| match arg.to_str() {
        Some("-nt") => OsString::from("--threads"),
        Some("-bm") => OsString::from("--benchmark"),
        _ => arg,
    })
}

/// Accepts the spellings the interactive prompt also understands.
pub fn parse_switch(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "y" | "yes" | "1" => Ok(true),
        "false" | "n" | "no" | "0" => Ok(false),
        other => Err(format!("expected true/false or y/n, got '{other}'")),
    }
}

fn parse_format(value: &str) -> std::result::Result<OutputFormat, String> {
    value.parse()
}
