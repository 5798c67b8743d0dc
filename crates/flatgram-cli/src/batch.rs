// Flatgram - Hierarchical Flat-File Record Grammar
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Batch validation of many record files against one grammar.
//!
//! Files are processed serially below a configurable threshold and on the
//! rayon thread pool above it. Every file gets its own [`FileResult`]; one
//! failing file never stops the others.
//!
//! # Examples
//!
//! ```rust,no_run
//! use flatgram_cli::batch::{BatchConfig, BatchProcessor, ValidationOperation};
//! use flatgram_cli::grammar_file::load_grammar;
//! use std::path::{Path, PathBuf};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grammar = load_grammar(Path::new("batches.yaml"))?;
//! let files = vec![PathBuf::from("monday.csv"), PathBuf::from("tuesday.csv")];
//!
//! let processor = BatchProcessor::new(BatchConfig::default());
//! let results = processor.process(&files, ValidationOperation { grammar }, true)?;
//!
//! println!(
//!     "{} of {} files valid",
//!     results.success_count(),
//!     results.total_files()
//! );
//! # Ok(())
//! # }
//! ```

use crate::commands::validate_file;
use crate::error::CliError;
use crate::grammar_file::LoadedGrammar;
use colored::Colorize;
use flatgram::Summary;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;
use tracing::debug;

/// Configuration for batch processing.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Minimum number of files before the thread pool is used.
    pub parallel_threshold: usize,

    /// Thread count for the global rayon pool; `None` keeps rayon's default.
    pub max_threads: Option<usize>,

    /// Report progress every N files. 0 disables progress lines.
    pub progress_interval: usize,

    /// Print one line per file instead of aggregate counters.
    pub verbose: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 10,
            max_threads: None,
            progress_interval: 1,
            verbose: false,
        }
    }
}

/// Outcome of one file in a batch.
#[derive(Debug, Clone)]
pub struct FileResult<T> {
    pub path: PathBuf,
    pub result: Result<T, CliError>,
}

impl<T> FileResult<T> {
    pub fn success(path: PathBuf, value: T) -> Self {
        Self {
            path,
            result: Ok(value),
        }
    }

    pub fn failure(path: PathBuf, error: CliError) -> Self {
        Self {
            path,
            result: Err(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// All file results of a batch, in input order.
#[derive(Debug, Clone)]
pub struct BatchResults<T> {
    pub results: Vec<FileResult<T>>,
    /// Wall-clock time of the whole batch in milliseconds.
    pub elapsed_ms: u128,
}

impl<T> BatchResults<T> {
    pub fn new(results: Vec<FileResult<T>>, elapsed_ms: u128) -> Self {
        Self {
            results,
            elapsed_ms,
        }
    }

    pub fn total_files(&self) -> usize {
        self.results.len()
    }

    pub fn success_count(&self) -> usize {
        self.successes().count()
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    pub fn all_succeeded(&self) -> bool {
        self.results.iter().all(FileResult::is_success)
    }

    pub fn has_failures(&self) -> bool {
        self.results.iter().any(FileResult::is_failure)
    }

    pub fn successes(&self) -> impl Iterator<Item = &FileResult<T>> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileResult<T>> {
        self.results.iter().filter(|r| r.is_failure())
    }

    /// Files per second, or 0.0 when no time elapsed.
    pub fn throughput(&self) -> f64 {
        if self.elapsed_ms == 0 {
            0.0
        } else {
            self.total_files() as f64 / (self.elapsed_ms as f64 / 1000.0)
        }
    }
}

/// An operation applied to every file of a batch.
///
/// Implementations must be `Send + Sync`; parallel batches share one
/// operation across the worker threads.
pub trait BatchOperation: Send + Sync {
    /// Value produced for a file that was processed successfully.
    type Output: Send;

    fn process_file(&self, path: &Path) -> Result<Self::Output, CliError>;

    /// Name shown in the batch summary.
    fn name(&self) -> &str;
}

/// Lock-free progress counters shared by the workers.
#[derive(Debug)]
struct ProgressTracker {
    total: usize,
    processed: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    interval: usize,
    verbose: bool,
    start_time: Instant,
}

impl ProgressTracker {
    fn new(total: usize, interval: usize, verbose: bool) -> Self {
        Self {
            total,
            processed: AtomicUsize::new(0),
            succeeded: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            interval,
            verbose,
            start_time: Instant::now(),
        }
    }

    fn record<T>(&self, path: &Path, result: &Result<T, CliError>) {
        let processed = self.processed.fetch_add(1, Ordering::Relaxed) + 1;
        match result {
            Ok(_) => {
                self.succeeded.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.failed.fetch_add(1, Ordering::Relaxed);
                if self.verbose {
                    eprintln!("{} {} - {}", "✗".red().bold(), path.display(), e);
                }
            }
        }
        if self.should_report(processed) {
            self.report_progress(path, result.is_ok());
        }
    }

    fn should_report(&self, processed: usize) -> bool {
        self.interval > 0 && (processed % self.interval == 0 || processed == self.total)
    }

    fn rate(&self, processed: usize) -> f64 {
        let secs = self.start_time.elapsed().as_secs_f64();
        if secs > 0.0 {
            processed as f64 / secs
        } else {
            0.0
        }
    }

    fn report_progress(&self, current_file: &Path, success: bool) {
        let processed = self.processed.load(Ordering::Relaxed);
        let rate = self.rate(processed);

        if self.verbose {
            let status = if success {
                "✓".green().bold()
            } else {
                "✗".red().bold()
            };
            eprintln!(
                "{} [{}/{}] {} ({:.1} files/s)",
                status,
                processed,
                self.total,
                current_file.display(),
                rate
            );
        } else {
            eprintln!(
                "Progress: [{}/{}] {} succeeded, {} failed ({:.1} files/s)",
                processed,
                self.total,
                self.succeeded.load(Ordering::Relaxed),
                self.failed.load(Ordering::Relaxed),
                rate
            );
        }
    }

    fn print_summary(&self, operation_name: &str) {
        let processed = self.processed.load(Ordering::Relaxed);
        let rule = "═".repeat(60);

        println!();
        println!("{}", rule.bright_blue());
        println!(
            "{} {}",
            "Batch Operation:".bright_blue().bold(),
            operation_name.bright_white()
        );
        println!("{}", rule.bright_blue());
        println!("  {} {}", "Total files:".bright_cyan(), processed);
        println!(
            "  {} {}",
            "Succeeded:".green().bold(),
            self.succeeded.load(Ordering::Relaxed)
        );
        println!(
            "  {} {}",
            "Failed:".red().bold(),
            self.failed.load(Ordering::Relaxed)
        );
        println!(
            "  {} {:.2}s",
            "Elapsed:".bright_cyan(),
            self.start_time.elapsed().as_secs_f64()
        );
        println!(
            "  {} {:.1} files/s",
            "Throughput:".bright_cyan(),
            self.rate(processed)
        );
        println!("{}", rule.bright_blue());
    }
}

/// Runs a [`BatchOperation`] over a list of files.
#[derive(Debug, Clone)]
pub struct BatchProcessor {
    config: BatchConfig,
}

impl BatchProcessor {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn default_config() -> Self {
        Self::new(BatchConfig::default())
    }

    /// Process every file in `files` with `operation`.
    ///
    /// Per-file failures are collected in the returned [`BatchResults`]; the
    /// outer `Result` is reserved for failures of the batch machinery itself.
    pub fn process<O>(
        &self,
        files: &[PathBuf],
        operation: O,
        show_progress: bool,
    ) -> Result<BatchResults<O::Output>, CliError>
    where
        O: BatchOperation,
    {
        let start_time = Instant::now();
        if files.is_empty() {
            return Ok(BatchResults::new(Vec::new(), 0));
        }

        if let Some(max_threads) = self.config.max_threads {
            // The global pool can only be built once per process.
            if let Err(e) = rayon::ThreadPoolBuilder::new()
                .num_threads(max_threads)
                .build_global()
            {
                debug!(error = %e, "keeping existing thread pool");
            }
        }

        let tracker = show_progress.then(|| {
            ProgressTracker::new(
                files.len(),
                self.config.progress_interval,
                self.config.verbose,
            )
        });
        let run = |path: &PathBuf| {
            let result = operation.process_file(path);
            if let Some(t) = &tracker {
                t.record(path, &result);
            }
            FileResult {
                path: path.clone(),
                result,
            }
        };

        let parallel = files.len() >= self.config.parallel_threshold;
        debug!(
            files = files.len(),
            parallel,
            operation = operation.name(),
            "starting batch"
        );
        let results: Vec<FileResult<O::Output>> = if parallel {
            files.par_iter().map(run).collect()
        } else {
            files.iter().map(run).collect()
        };

        if let Some(t) = &tracker {
            t.print_summary(operation.name());
        }
        Ok(BatchResults::new(results, start_time.elapsed().as_millis()))
    }
}

/// Validates each file against one shared grammar.
#[derive(Debug, Clone)]
pub struct ValidationOperation {
    pub grammar: LoadedGrammar,
}

impl BatchOperation for ValidationOperation {
    type Output = Summary;

    fn process_file(&self, path: &Path) -> Result<Self::Output, CliError> {
        validate_file(&self.grammar, path, false)
    }

    fn name(&self) -> &str {
        "validate"
    }
}
