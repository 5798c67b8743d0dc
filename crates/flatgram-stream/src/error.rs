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

//! Error types for record streams.
//!
//! Tokenizer-level problems ([`StreamError::Malformed`]) never reach record
//! identification and carry no grammar context. Structural violations found
//! by the sequencer are wrapped unchanged in [`StreamError::Structure`].
//!
//! # Error Handling Examples
//!
//! ```rust
//! use flatgram_stream::{validate, CsvReader, CsvReaderConfig, StreamError};
//! use flatgram_test::batch_tree;
//!
//! let tree = batch_tree();
//! let reader = CsvReader::new("H,1\nD,\"open\n".as_bytes(), CsvReaderConfig::default()).unwrap();
//!
//! match validate(&tree, reader) {
//!     Err(StreamError::Malformed { line, message }) => {
//!         assert_eq!(line, 2);
//!         assert!(message.contains("unterminated"));
//!     }
//!     other => panic!("expected malformed input, got {:?}", other),
//! }
//! ```

use flatgram_core::Diagnostic;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while reading, validating or writing a record stream.
///
/// Use [`line()`](Self::line) to extract the line number uniformly.
///
/// ```rust
/// use flatgram_stream::StreamError;
///
/// let err = StreamError::malformed(42, "unterminated quoted field");
/// assert_eq!(err.line(), Some(42));
/// assert!(err.to_string().contains("line 42"));
/// ```
#[derive(Error, Debug)]
pub enum StreamError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid UTF-8 encoding.
    #[error("Invalid UTF-8 at line {line}: {message}")]
    Utf8 { line: usize, message: String },

    /// The tokenizer could not split the input into records.
    #[error("Malformed input at line {line}: {message}")]
    Malformed { line: usize, message: String },

    /// A record stream that violates the grammar.
    #[error("{0}")]
    Structure(#[from] Diagnostic),

    /// Invalid tokenizer or writer configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A physical line longer than the configured limit.
    #[error("Line {line} exceeds maximum length of {limit} bytes")]
    LineTooLong { line: usize, limit: usize },

    /// The session exceeded its time limit.
    #[error("Timeout: elapsed {elapsed:?} exceeded limit {limit:?}")]
    Timeout { elapsed: Duration, limit: Duration },

    /// A writer cannot represent a field.
    #[error("Invalid field: {message}")]
    InvalidField { message: String },
}

impl StreamError {
    /// Create a malformed input error.
    #[inline]
    pub fn malformed(line: usize, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an invalid field error.
    #[inline]
    pub fn invalid_field(message: impl Into<String>) -> Self {
        Self::InvalidField {
            message: message.into(),
        }
    }

    /// Get the line number if available.
    #[inline]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Utf8 { line, .. }
            | Self::Malformed { line, .. }
            | Self::LineTooLong { line, .. } => Some(*line),
            Self::Structure(diagnostic) => Some(diagnostic.line()),
            Self::Io(_) | Self::Config(_) | Self::Timeout { .. } | Self::InvalidField { .. } => {
                None
            }
        }
    }

    /// The structural diagnostic, if this is a grammar violation.
    #[inline]
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Structure(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

/// Result type for stream operations.
pub type StreamResult<T> = Result<T, StreamError>;
