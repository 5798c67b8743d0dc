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

//! # Flatgram - Hierarchical Flat-File Record Grammar
//!
//! Flatgram checks that a flat file (CSV, delimited or fixed-length) follows a
//! hierarchical record grammar: which record types may occur, in what order,
//! how often, and nested in which groups. Records are identified by field
//! criteria and sequenced one at a time, so files of any size are checked in
//! constant memory.
//!
//! ## Quick Start
//!
//! ```rust
//! use flatgram::{validate_str, Bounds, Criterion, Format, NodeSpec, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new("file");
//! let root = builder.root();
//! let header = NodeSpec::new("header").bounds(Bounds::exactly(1));
//! builder.record(root, header, vec![Criterion::literal(0, "H")])?;
//! builder.record(root, NodeSpec::new("detail"), vec![Criterion::literal(0, "D")])?;
//! let tree = builder.build()?;
//!
//! let summary = validate_str(&tree, "H,2025\nD,1\nD,2\n", &Format::default()).unwrap();
//! assert_eq!(summary.records, 3);
//!
//! let err = validate_str(&tree, "D,1\n", &Format::default()).unwrap_err();
//! assert_eq!(err.line(), Some(1));
//! # Ok::<(), flatgram::GrammarError>(())
//! ```
//!
//! ## Modules
//!
//! - [`core`]: grammar tree, identification and sequencing engine
//! - [`stream`]: tokenizers, writers and the streaming validator
//!
//! ## Features
//!
//! - `serde`: load grammars and format settings from YAML or JSON
//!   ([`grammar_from_yaml`], [`grammar_from_json`])

pub use flatgram_core::{
    can_start, identify, traverse, Accepted, Bounds, Criterion, Diagnostic, DiagnosticKind,
    FieldRef, FieldTest, GrammarError, Input, Node, NodeId, NodeKind, NodeSpec, ParserTree,
    RecordCandidate, Sequencer, StatsCollector, Step, Summary, TreeBuilder, TreeVisitor,
    VisitorContext, STREAM_START_LINE,
};
pub use flatgram_stream::{
    CsvReader, CsvReaderConfig, DelimitedReader, DelimitedReaderConfig, FixedLengthReader,
    FixedLengthReaderConfig, Format, GrammarReader, RawRecord, ReaderConfig, RecordSource,
    StreamError, StreamResult,
};

#[cfg(feature = "serde")]
pub use flatgram_core::{CriterionDef, GrammarDef, GroupDef, MaxOccurs, NodeDef, RecordDef};

#[cfg(feature = "serde")]
mod error;
#[cfg(feature = "serde")]
pub use error::LoadError;

/// Grammar tree, identification and sequencing engine.
pub mod core {
    pub use flatgram_core::*;
}

/// Tokenizers, writers and the streaming validator.
pub mod stream {
    pub use flatgram_stream::*;
}

use std::io::Read;

/// Validate in-memory text against `tree`.
///
/// # Examples
///
/// ```rust
/// use flatgram::{validate_str, DelimitedReaderConfig, Format};
/// use flatgram_test::batch_tree;
///
/// let format = Format::Delimited(DelimitedReaderConfig::default());
/// let err = validate_str(&batch_tree(), "H\t1\n", &format).unwrap_err();
/// assert_eq!(err.diagnostic().and_then(|d| d.expected.as_deref()), Some("trailer"));
/// ```
pub fn validate_str(tree: &ParserTree, text: &str, format: &Format) -> StreamResult<Summary> {
    validate_reader(tree, text.as_bytes(), format)
}

/// Validate a reader with default limits.
pub fn validate_reader<R: Read>(
    tree: &ParserTree,
    input: R,
    format: &Format,
) -> StreamResult<Summary> {
    flatgram_stream::validate_reader(tree, input, format, &ReaderConfig::default())
}

/// Validate `text` and collect every accepted record.
///
/// Stops at the first error, which is returned instead.
pub fn accept_all(tree: &ParserTree, text: &str, format: &Format) -> StreamResult<Vec<Accepted>> {
    let config = ReaderConfig::default();
    let source = format.open(text.as_bytes(), &config)?;
    GrammarReader::with_config(tree, source, &config).collect()
}

/// Build a tree from a YAML grammar definition.
///
/// # Examples
///
/// ```rust
/// let yaml = r#"
/// name: file
/// min_occurs: 1
/// children:
///   - type: record
///     name: line
///     min_occurs: 1
///     identify:
///       - field: 0
///         pattern: "[0-9]+"
/// "#;
/// let tree = flatgram::grammar_from_yaml(yaml).unwrap();
/// assert!(flatgram::validate_str(&tree, "1\n22\n", &Default::default()).is_ok());
/// assert!(flatgram::validate_str(&tree, "", &Default::default()).is_err());
/// ```
#[cfg(feature = "serde")]
pub fn grammar_from_yaml(yaml: &str) -> Result<ParserTree, LoadError> {
    let def: GrammarDef = serde_yaml::from_str(yaml)?;
    Ok(def.build()?)
}

/// Build a tree from a JSON grammar definition.
#[cfg(feature = "serde")]
pub fn grammar_from_json(json: &str) -> Result<ParserTree, LoadError> {
    let def: GrammarDef = serde_json::from_str(json)?;
    Ok(def.build()?)
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use flatgram_test::{batch_tree, BATCH_CSV, BATCH_TSV, MULTILINE_BATCH_CSV};

    #[test]
    fn test_validate_str_csv() {
        let summary = validate_str(&batch_tree(), BATCH_CSV, &Format::default()).unwrap();
        assert_eq!(summary.records, 4);
    }

    #[test]
    fn test_validate_str_tsv() {
        let format = Format::Delimited(DelimitedReaderConfig::default());
        assert!(validate_str(&batch_tree(), BATCH_TSV, &format).is_ok());
        assert!(validate_str(&batch_tree(), BATCH_TSV, &Format::default()).is_err());
    }

    #[test]
    fn test_accept_all_paths() {
        let tree = batch_tree();
        let accepted = accept_all(&tree, MULTILINE_BATCH_CSV, &Format::default()).unwrap();
        let paths: Vec<_> = accepted.iter().map(|a| tree.path(a.node)).collect();
        assert_eq!(paths, vec!["batch/header", "batch/detail/detail", "batch/detail/detail", "batch/trailer"]);
        assert_eq!(accepted[1].fields[1], "first\nsecond");
    }

    #[test]
    fn test_accept_all_stops_at_error() {
        let tree = batch_tree();
        let err = accept_all(&tree, "H,1\nH,2\n", &Format::default()).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
