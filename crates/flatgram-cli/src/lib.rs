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
//! Library behind the `flatgram` command.
//!
//! # Commands
//!
//! - **validate**: check one record file against a grammar file
//! - **inspect**: print a grammar as a tree with bounds and criteria
//! - **batch-validate**: check many files against one grammar, optionally in parallel
//! - **completion**: generate shell completion scripts
//!
//! # Grammar files
//!
//! A grammar file holds the record grammar plus the input format and limits:
//!
//! ```yaml
//! format:
//!   kind: csv
//!   delimiter: ","
//! limits:
//!   max_line_length: 4096
//!   timeout_ms: 10000
//! grammar:
//!   name: file
//!   children:
//!     - type: record
//!       name: header
//!       min_occurs: 1
//!       max_occurs: 1
//!       identify:
//!         - field: 0
//!           literal: H
//! ```
//!
//! Files ending in `.json` are read as JSON; anything else as YAML.
//!
//! # Examples
//!
//! ```no_run
//! use flatgram_cli::commands::validate;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), flatgram_cli::error::CliError> {
//! validate(Path::new("input.csv"), Path::new("batches.yaml"), false)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! Input and grammar files larger than 1 GB are rejected before reading.
//! Override with the `FLATGRAM_MAX_FILE_SIZE` environment variable (bytes).

pub mod batch;
pub mod cli;
pub mod commands;
pub mod error;
pub mod grammar_file;
