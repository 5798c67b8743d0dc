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
//! Single-file commands: validate and inspect.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum CoreCommands {
    /// Validate a record file against a grammar
    ///
    /// Reads the file with the tokenizer named in the grammar file and
    /// checks the record sequence. Stops at the first violation and reports
    /// its line.
    Validate {
        /// Record file to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Grammar file (YAML, or JSON with a .json extension)
        #[arg(short, long, value_name = "GRAMMAR")]
        grammar: PathBuf,

        /// Print the grammar path of every accepted record
        #[arg(short, long)]
        trace: bool,
    },

    /// Print a grammar as a tree
    ///
    /// Shows every group and record with its occurrence bounds, order and
    /// identification criteria.
    Inspect {
        /// Grammar file (YAML, or JSON with a .json extension)
        #[arg(short, long, value_name = "GRAMMAR")]
        grammar: PathBuf,

        /// Also print node counts and depth
        #[arg(short, long)]
        stats: bool,
    },
}

impl CoreCommands {
    pub fn execute(self) -> Result<(), CliError> {
        match self {
            CoreCommands::Validate {
                file,
                grammar,
                trace,
            } => commands::validate(&file, &grammar, trace),
            CoreCommands::Inspect { grammar, stats } => commands::inspect(&grammar, stats),
        }
    }
}
