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

//! Validate command - check a record file against a grammar

use super::open_input;
use crate::error::CliError;
use crate::grammar_file::{load_grammar, LoadedGrammar};
use colored::Colorize;
use flatgram::{GrammarReader, Summary};
use std::path::Path;
use tracing::debug;

/// Validate one file against an already loaded grammar.
///
/// With `trace`, each accepted record is printed as `line: path`.
pub fn validate_file(grammar: &LoadedGrammar, file: &Path, trace: bool) -> Result<Summary, CliError> {
    let input = open_input(file)?;
    let source = grammar
        .format
        .open(input, &grammar.reader)
        .map_err(|e| CliError::from_stream(file, e))?;
    debug!(file = %file.display(), format = grammar.format.name(), "validating");

    let mut reader = GrammarReader::with_config(&grammar.tree, source, &grammar.reader);
    for accepted in reader.by_ref() {
        let accepted = accepted.map_err(|e| CliError::from_stream(file, e))?;
        if trace {
            println!(
                "{:>6}: {}",
                accepted.line.to_string().dimmed(),
                grammar.tree.path(accepted.node)
            );
        }
    }
    reader.finish().map_err(|e| CliError::from_stream(file, e))
}

/// Validate a record file against the grammar file at `grammar`.
///
/// # Examples
///
/// ```no_run
/// use flatgram_cli::commands::validate;
/// use std::path::Path;
///
/// # fn main() -> Result<(), flatgram_cli::error::CliError> {
/// validate(Path::new("batches.csv"), Path::new("batches.yaml"), false)?;
/// # Ok(())
/// # }
/// ```
///
/// # Output
///
/// Prints ✓ or ✗ with the file name, then the record and pass counts, or the
/// violation and its line.
pub fn validate(file: &Path, grammar: &Path, trace: bool) -> Result<(), CliError> {
    let loaded = load_grammar(grammar)?;

    match validate_file(&loaded, file, trace) {
        Ok(summary) => {
            println!("{} {}", "✓".green().bold(), file.display());
            println!("  Grammar: {}", loaded.tree.name(loaded.tree.root()));
            println!("  Format: {}", loaded.format.name());
            println!("  Records: {}", summary.records);
            println!("  Passes: {}", summary.passes);
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✗".red().bold(), file.display());
            if let Some(line) = e.line() {
                println!("  Line: {}", line);
            }
            Err(e)
        }
    }
}
