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
//! Batch commands - validate many files against one grammar

use crate::batch::{BatchConfig, BatchProcessor, ValidationOperation};
use crate::error::CliError;
use crate::grammar_file::load_grammar;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Validate every file in `files` against the grammar file at `grammar`.
///
/// The grammar is loaded once and shared. Without `parallel` the files are
/// processed in order on the calling thread. Failures are listed after the
/// summary.
///
/// # Errors
///
/// Returns [`CliError::BatchFailed`] if any file failed, or the grammar's
/// load error.
pub fn batch_validate(
    files: Vec<PathBuf>,
    grammar: &Path,
    parallel: bool,
    verbose: bool,
) -> Result<(), CliError> {
    let grammar = load_grammar(grammar)?;
    let processor = BatchProcessor::new(BatchConfig {
        parallel_threshold: if parallel { 1 } else { usize::MAX },
        verbose,
        ..Default::default()
    });

    let results = processor.process(&files, ValidationOperation { grammar }, true)?;

    if results.has_failures() {
        eprintln!();
        eprintln!("{}", "Validation failures:".red().bold());
        for failure in results.failures() {
            eprintln!("  {} {}", "✗".red(), failure.path.display());
            if let Err(e) = &failure.result {
                eprintln!("    {}", e.to_string().dimmed());
            }
        }
        return Err(CliError::BatchFailed {
            failed: results.failure_count(),
            total: results.total_files(),
        });
    }
    Ok(())
}
