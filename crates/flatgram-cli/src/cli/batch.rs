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
//! Batch processing commands.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use std::path::PathBuf;

/// Commands that apply one grammar to many files.
#[derive(Subcommand)]
pub enum BatchCommands {
    /// Validate many record files against one grammar
    ///
    /// Every file is validated independently; the command fails if any file
    /// fails and lists each failure with its reason.
    BatchValidate {
        /// Record files to validate
        #[arg(value_name = "FILES", num_args = 1.., required = true)]
        files: Vec<PathBuf>,

        /// Grammar file (YAML, or JSON with a .json extension)
        #[arg(short, long, value_name = "GRAMMAR")]
        grammar: PathBuf,

        /// Validate files on all cores
        #[arg(short, long)]
        parallel: bool,
    },
}

impl BatchCommands {
    pub fn execute(self, verbose: bool) -> Result<(), CliError> {
        match self {
            BatchCommands::BatchValidate {
                files,
                grammar,
                parallel,
            } => commands::batch_validate(files, &grammar, parallel, verbose),
        }
    }
}
