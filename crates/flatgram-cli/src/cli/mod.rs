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
//! Command-line definitions.
//!
//! Subcommands are grouped by category and flattened into one top-level
//! command list:
//!
//! ```text
//! Commands
//! ├── Core (validate, inspect)
//! ├── Batch (batch-validate)
//! └── Utility (completion)
//! ```

mod batch;
mod core;
mod utility;

use crate::error::CliError;
use clap::{Parser, Subcommand};

pub use batch::BatchCommands;
pub use core::CoreCommands;
pub use utility::UtilityCommands;

/// Flatgram - hierarchical grammars for flat record files
///
/// Validates CSV, delimited and fixed-length files against a record grammar
/// and reports the first structural violation with its line number.
#[derive(Parser)]
#[command(name = "flatgram")]
#[command(author, version, about = "Flatgram - hierarchical grammars for flat record files", long_about = None)]
pub struct Cli {
    /// Verbose output: debug logging and per-file batch progress
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn execute(self) -> Result<(), CliError> {
        self.command.execute(self.verbose)
    }
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    #[command(flatten)]
    Core(CoreCommands),

    #[command(flatten)]
    Batch(BatchCommands),

    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Run the command. `verbose` is the global `--verbose` flag.
    pub fn execute(self, verbose: bool) -> Result<(), CliError> {
        match self {
            Commands::Core(cmd) => cmd.execute(),
            Commands::Batch(cmd) => cmd.execute(verbose),
            Commands::Utility(cmd) => cmd.execute(),
        }
    }
}
