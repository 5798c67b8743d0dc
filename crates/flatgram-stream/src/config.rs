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

//! Reader, tokenizer and writer configuration.
//!
//! Every config is a plain struct with public fields and a `Default`; build
//! one with struct update syntax and hand it to the matching constructor,
//! which validates it.
//!
//! ```rust
//! use flatgram_stream::{CsvReaderConfig, DelimitedReaderConfig};
//!
//! let csv = CsvReaderConfig {
//!     delimiter: ';',
//!     comment: Some("#".to_string()),
//!     ..Default::default()
//! };
//! assert!(csv.validate().is_ok());
//!
//! let bad = DelimitedReaderConfig {
//!     delimiter: ',',
//!     escape: Some(','),
//!     ..Default::default()
//! };
//! assert!(bad.validate().is_err());
//! ```

use crate::error::{StreamError, StreamResult};
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Physical reading limits shared by every tokenizer.
///
/// # Examples
///
/// ```rust
/// use flatgram_stream::ReaderConfig;
///
/// let config = ReaderConfig::default();
/// assert_eq!(config.max_line_length, 1_000_000);
/// assert_eq!(config.buffer_size, 64 * 1024);
/// assert_eq!(config.timeout, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Maximum physical line length in bytes, terminator excluded.
    ///
    /// Default: 1,000,000 bytes
    pub max_line_length: usize,

    /// Buffer size for reading input.
    ///
    /// Default: 64KB
    pub buffer_size: usize,

    /// Wall-clock limit for a whole validation session.
    ///
    /// Checked before each record is read, so the session may run past the
    /// limit before [`StreamError::Timeout`] is raised. Reading a single
    /// record is not bounded: one long line (up to `max_line_length`) or a
    /// quoted field spanning many lines is tokenized in full before the next
    /// check.
    ///
    /// Default: None (no timeout)
    pub timeout: Option<Duration>,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            max_line_length: 1_000_000,
            buffer_size: 64 * 1024,
            timeout: None,
        }
    }
}

/// RFC 4180 style CSV reading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CsvReaderConfig {
    pub delimiter: char,
    pub quote: char,
    /// Escapes a quote (or itself) inside a quoted field. Equal to `quote`
    /// for the usual doubled-quote convention.
    pub escape: Option<char>,
    /// Quoted fields may span physical lines.
    pub multiline: bool,
    /// Whitespace may surround a quoted field.
    pub whitespace_allowed: bool,
    /// A quote character inside an unquoted field is taken literally
    /// instead of being an error.
    pub unquoted_quotes_allowed: bool,
    /// Lines starting with this prefix between records are skipped.
    pub comment: Option<String>,
}

impl Default for CsvReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            escape: Some('"'),
            multiline: true,
            whitespace_allowed: false,
            unquoted_quotes_allowed: false,
            comment: None,
        }
    }
}

impl CsvReaderConfig {
    pub fn validate(&self) -> StreamResult<()> {
        if self.delimiter == self.quote {
            return Err(StreamError::config("delimiter cannot match quote character"));
        }
        if self.escape == Some(self.delimiter) {
            return Err(StreamError::config("delimiter cannot match escape character"));
        }
        if is_line_break(self.delimiter) || is_line_break(self.quote) {
            return Err(StreamError::config("delimiter and quote cannot be line breaks"));
        }
        validate_comment(&self.comment)
    }
}

/// Delimited (tab-separated by default) reading.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DelimitedReaderConfig {
    pub delimiter: char,
    /// Escapes the delimiter or itself.
    pub escape: Option<char>,
    /// As the last character of a physical line, joins the next line.
    pub line_continuation: Option<char>,
    /// Lines starting with this prefix between records are skipped.
    pub comment: Option<String>,
}

impl Default for DelimitedReaderConfig {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            escape: None,
            line_continuation: None,
            comment: None,
        }
    }
}

impl DelimitedReaderConfig {
    pub fn validate(&self) -> StreamResult<()> {
        if self.escape == Some(self.delimiter) {
            return Err(StreamError::config("delimiter cannot match escape character"));
        }
        if self.line_continuation == Some(self.delimiter) {
            return Err(StreamError::config(
                "delimiter cannot match line continuation character",
            ));
        }
        if is_line_break(self.delimiter) {
            return Err(StreamError::config("delimiter cannot be a line break"));
        }
        validate_comment(&self.comment)
    }
}

/// Fixed-length reading. Each record is one field holding the whole line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FixedLengthReaderConfig {
    pub line_continuation: Option<char>,
    pub comment: Option<String>,
}

impl FixedLengthReaderConfig {
    pub fn validate(&self) -> StreamResult<()> {
        validate_comment(&self.comment)
    }
}

/// CSV writing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CsvWriterConfig {
    pub delimiter: char,
    pub quote: char,
    pub escape: char,
    /// Quote every field, not only those that need it.
    pub always_quote: bool,
    pub line_separator: String,
}

impl Default for CsvWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            escape: '"',
            always_quote: false,
            line_separator: "\n".to_string(),
        }
    }
}

impl CsvWriterConfig {
    pub fn validate(&self) -> StreamResult<()> {
        if self.delimiter == self.quote {
            return Err(StreamError::config("delimiter cannot match quote character"));
        }
        if self.delimiter == self.escape {
            return Err(StreamError::config("delimiter cannot match escape character"));
        }
        Ok(())
    }
}

/// Delimited writing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DelimitedWriterConfig {
    pub delimiter: char,
    /// Without an escape, fields containing the delimiter are rejected.
    pub escape: Option<char>,
    pub line_separator: String,
}

impl Default for DelimitedWriterConfig {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            escape: None,
            line_separator: "\n".to_string(),
        }
    }
}

impl DelimitedWriterConfig {
    pub fn validate(&self) -> StreamResult<()> {
        if self.escape == Some(self.delimiter) {
            return Err(StreamError::config("delimiter cannot match escape character"));
        }
        Ok(())
    }
}

/// Fixed-length writing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct FixedLengthWriterConfig {
    pub line_separator: String,
}

impl Default for FixedLengthWriterConfig {
    fn default() -> Self {
        Self {
            line_separator: "\n".to_string(),
        }
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn validate_comment(comment: &Option<String>) -> StreamResult<()> {
    match comment {
        Some(prefix) if prefix.is_empty() => {
            Err(StreamError::config("comment prefix cannot be empty"))
        }
        _ => Ok(()),
    }
}
