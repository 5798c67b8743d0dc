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

//! Record identification criteria.
//!
//! A [`Criterion`] selects one value out of a tokenized record and tests it
//! against a literal or a regular expression. A record type matches a raw
//! record iff every one of its criteria succeeds.
//!
//! ```
//! use flatgram_core::{Criterion, FieldTest};
//!
//! let header = Criterion::literal(0, "H");
//! assert!(header.matches(&["H", "20250101"]));
//! assert!(!header.matches(&["D", "20250101"]));
//!
//! let amount = Criterion::pattern(1, r"\d+").unwrap();
//! assert!(amount.matches(&["D", "1500"]));
//! assert!(!amount.matches(&["D", "15.00"]));
//! assert!(matches!(amount.test, FieldTest::Pattern(_)));
//! ```

use crate::error::{GrammarError, GrammarResult};
use regex::Regex;
use std::fmt;

/// Which part of a tokenized record a criterion inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRef {
    /// The field at a 0-based position.
    Index(usize),
    /// A character slice of the first field. Fixed-length records arrive as a
    /// single field holding the whole line.
    Span { offset: usize, length: usize },
}

impl FieldRef {
    /// Extract the selected value, or `None` when the record is too short.
    pub fn select<'a, S: AsRef<str>>(&self, fields: &'a [S]) -> Option<&'a str> {
        match *self {
            FieldRef::Index(position) => fields.get(position).map(AsRef::as_ref),
            FieldRef::Span { offset, length } => {
                let line = fields.first()?.as_ref();
                let start = char_boundary(line, offset)?;
                let end = char_boundary(line, offset + length)?;
                Some(&line[start..end])
            }
        }
    }
}

/// Byte index of the `n`th character, allowing `n == char count`.
fn char_boundary(s: &str, n: usize) -> Option<usize> {
    if n == 0 {
        return Some(0);
    }
    match s.char_indices().nth(n) {
        Some((idx, _)) => Some(idx),
        None if s.chars().count() == n => Some(s.len()),
        None => None,
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldRef::Index(position) => write!(f, "field[{}]", position),
            FieldRef::Span { offset, length } => write!(f, "chars[{}..{}]", offset, offset + length),
        }
    }
}

/// The test applied to a selected value.
#[derive(Debug, Clone)]
pub enum FieldTest {
    /// Exact string equality.
    Literal(String),
    /// Whole-value regular expression match.
    Pattern(Regex),
}

impl FieldTest {
    /// Compile a pattern test. The expression must match the entire value.
    pub fn pattern(expr: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{})$", expr)).map(FieldTest::Pattern)
    }

    /// Run the test.
    #[inline]
    pub fn test(&self, value: &str) -> bool {
        match self {
            FieldTest::Literal(literal) => value == literal,
            FieldTest::Pattern(regex) => regex.is_match(value),
        }
    }
}

impl PartialEq for FieldTest {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FieldTest::Literal(a), FieldTest::Literal(b)) => a == b,
            (FieldTest::Pattern(a), FieldTest::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldTest::Literal(literal) => write!(f, "= {:?}", literal),
            FieldTest::Pattern(regex) => {
                let expr = regex.as_str();
                let inner = expr
                    .strip_prefix("^(?:")
                    .and_then(|s| s.strip_suffix(")$"))
                    .unwrap_or(expr);
                write!(f, "~ /{}/", inner)
            }
        }
    }
}

/// One identification test: a field selector plus a value test.
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    /// The inspected value.
    pub field: FieldRef,
    /// The test it must pass.
    pub test: FieldTest,
}

impl Criterion {
    /// Create a criterion from its parts.
    pub fn new(field: FieldRef, test: FieldTest) -> Self {
        Self { field, test }
    }

    /// Field at `position` must equal `literal`.
    pub fn literal(position: usize, literal: impl Into<String>) -> Self {
        Self::new(FieldRef::Index(position), FieldTest::Literal(literal.into()))
    }

    /// Field at `position` must fully match the regular expression `expr`.
    pub fn pattern(position: usize, expr: &str) -> GrammarResult<Self> {
        let test = FieldTest::pattern(expr).map_err(|e| GrammarError::InvalidPattern {
            name: FieldRef::Index(position).to_string(),
            pattern: expr.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(FieldRef::Index(position), test))
    }

    /// Characters `offset..offset + length` of a fixed-length line must equal `literal`.
    pub fn span(offset: usize, length: usize, literal: impl Into<String>) -> Self {
        Self::new(
            FieldRef::Span { offset, length },
            FieldTest::Literal(literal.into()),
        )
    }

    /// Evaluate the criterion. A missing field never matches.
    #[inline]
    pub fn matches<S: AsRef<str>>(&self, fields: &[S]) -> bool {
        self.field
            .select(fields)
            .is_some_and(|value| self.test.test(value))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.test)
    }
}

/// True when every criterion matches. An empty slice matches unconditionally.
pub fn all_match<S: AsRef<str>>(criteria: &[Criterion], fields: &[S]) -> bool {
    criteria.iter().all(|c| c.matches(fields))
}
