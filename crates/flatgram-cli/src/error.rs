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

//! Structured error types for the flatgram CLI.
//!
//! All CLI operations return `Result<T, CliError>` for consistent error reporting.

use flatgram::{GrammarError, StreamError};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for flatgram CLI operations.
///
/// Implements `Clone` so batch runs can hand per-file errors across threads.
///
/// # Examples
///
/// ```rust,no_run
/// use flatgram_cli::error::CliError;
///
/// fn read(path: &str) -> Result<String, CliError> {
///     std::fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
/// }
/// ```
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// I/O operation failed (file read or metadata access).
    #[error("I/O error for '{path}': {message}")]
    Io { path: PathBuf, message: String },

    /// Input file exceeds the configured size limit.
    #[error(
        "File '{path}' is too large ({actual} bytes). Maximum allowed size is {max} bytes ({max_mb} MB). \
         Set FLATGRAM_MAX_FILE_SIZE (in bytes) to raise the limit."
    )]
    FileTooLarge {
        path: PathBuf,
        actual: u64,
        max: u64,
        max_mb: u64,
    },

    /// The grammar file could not be loaded or describes an invalid tree.
    #[error("Grammar error in '{path}': {message}")]
    Grammar { path: PathBuf, message: String },

    /// The tokenizer rejected the input or its configuration.
    #[error("Format error: {0}")]
    Format(String),

    /// The record stream violates the grammar.
    #[error("{message}")]
    Validation { line: usize, message: String },

    /// Some files of a batch failed.
    #[error("{failed} of {total} files failed validation")]
    BatchFailed { failed: usize, total: usize },

    /// Invalid command-line input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with file path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    pub fn file_too_large(path: impl Into<PathBuf>, actual: u64, max: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            actual,
            max,
            max_mb: max / (1024 * 1024),
        }
    }

    pub fn grammar(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Grammar {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Line the error is attributed to, for validation errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Validation { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// Convert a stream error for the file at `path`.
    pub fn from_stream(path: impl Into<PathBuf>, err: StreamError) -> Self {
        match err {
            StreamError::Io(e) => Self::io_error(path, e),
            StreamError::Structure(d) => Self::Validation {
                line: d.line,
                message: d.to_string(),
            },
            StreamError::Config(message) => Self::Format(message),
            other => match other.line() {
                Some(line) => Self::Validation {
                    line,
                    message: other.to_string(),
                },
                None => Self::Format(other.to_string()),
            },
        }
    }

    /// Convert a grammar construction error for the grammar file at `path`.
    pub fn from_grammar(path: impl Into<PathBuf>, err: GrammarError) -> Self {
        Self::grammar(path, err.to_string())
    }
}
