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

//! Structural diagnostics and grammar construction errors.

use std::fmt;
use thiserror::Error;

/// Line number reported when a violation is detected before any record
/// was accepted (for example, an empty stream that requires content).
pub const STREAM_START_LINE: usize = 0;

/// The kind of structural violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// The record matches no declared record type anywhere in the grammar.
    UnidentifiedRecord,
    /// The record (or end of input) cannot legally occur at the current
    /// grammar position.
    UnexpectedRecord,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnidentifiedRecord => write!(f, "UnidentifiedRecord"),
            Self::UnexpectedRecord => write!(f, "UnexpectedRecord"),
        }
    }
}

/// A structural violation raised by the sequencing engine.
///
/// Every diagnostic is fatal to the session that produced it. The line is the
/// offending record's line, or the last accepted record's line when the
/// violation is only detected at end of input ([`STREAM_START_LINE`] when no
/// record was ever accepted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct Diagnostic {
    /// The kind of violation.
    pub kind: DiagnosticKind,
    /// Human-readable message.
    pub message: String,
    /// Name of the identified record type, if the input record was identified.
    pub record_name: Option<String>,
    /// Name of the grammar node whose minimum occurrences were not met, if any.
    pub expected: Option<String>,
    /// Line number (1-based, or [`STREAM_START_LINE`]).
    pub line: usize,
    /// Raw text of the offending record, absent for end-of-input violations.
    pub text: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic with no record context.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            record_name: None,
            expected: None,
            line,
            text: None,
        }
    }

    /// A record that matches no record type in the grammar.
    pub fn unidentified(line: usize, text: impl Into<String>) -> Self {
        Self::new(
            DiagnosticKind::UnidentifiedRecord,
            "record does not match any record type",
            line,
        )
        .with_text(text)
    }

    /// A record or end of input that is not legal at the current position.
    pub fn unexpected(message: impl Into<String>, line: usize) -> Self {
        Self::new(DiagnosticKind::UnexpectedRecord, message, line)
    }

    /// Attach the identified record type name.
    pub fn with_record(mut self, name: impl Into<String>) -> Self {
        self.record_name = Some(name.into());
        self
    }

    /// Attach the name of the unmet grammar node.
    pub fn with_expected(mut self, name: impl Into<String>) -> Self {
        self.expected = Some(name.into());
        self
    }

    /// Attach the raw record text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// The line number this diagnostic is attributed to.
    #[inline]
    pub fn line(&self) -> usize {
        self.line
    }

    /// True for [`DiagnosticKind::UnidentifiedRecord`].
    #[inline]
    pub fn is_unidentified(&self) -> bool {
        self.kind == DiagnosticKind::UnidentifiedRecord
    }

    /// True for [`DiagnosticKind::UnexpectedRecord`].
    #[inline]
    pub fn is_unexpected(&self) -> bool {
        self.kind == DiagnosticKind::UnexpectedRecord
    }
}

/// Errors raised while assembling a [`ParserTree`](crate::ParserTree).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Two children of the same group share a name.
    #[error("duplicate node name '{name}' under '{parent}'")]
    DuplicateName { parent: String, name: String },

    /// Occurrence bounds are inconsistent.
    #[error("invalid occurrence bounds for '{name}': {reason}")]
    InvalidBounds { name: String, reason: String },

    /// A group declares more than one record without criteria.
    #[error("group '{parent}' has more than one unconditional record ('{first}', '{second}')")]
    MultipleFallbacks {
        parent: String,
        first: String,
        second: String,
    },

    /// A criterion pattern failed to compile.
    #[error("invalid pattern '{pattern}' for '{name}': {message}")]
    InvalidPattern {
        name: String,
        pattern: String,
        message: String,
    },

    /// A criterion definition names no field or no test.
    #[error("invalid criterion for '{name}': {reason}")]
    InvalidCriterion { name: String, reason: String },

    /// A child was added to a record node.
    #[error("'{parent}' is a record and cannot contain '{name}'")]
    NotAGroup { parent: String, name: String },

    /// A node id does not belong to the builder.
    #[error("unknown node id {0}")]
    UnknownNode(usize),

    /// Empty node name.
    #[error("node names must not be empty")]
    EmptyName,
}

/// Result type for sequencing operations.
pub type CoreResult<T> = Result<T, Diagnostic>;

/// Result type for grammar construction.
pub type GrammarResult<T> = Result<T, GrammarError>;
