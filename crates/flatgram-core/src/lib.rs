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

//! Grammar tree, record identification and sequencing engine for
//! hierarchical flat files.
//!
//! A flat file (CSV, delimited or fixed-length) is a sequence of physical
//! records. A [`ParserTree`] declares which record types exist, how each is
//! recognised from its fields, and in what order and how often they occur,
//! with nesting through groups. A [`Sequencer`] checks a record stream
//! against the tree one record at a time, with one record of lookahead.
//!
//! # Example
//!
//! ```
//! use flatgram_core::{Bounds, Criterion, NodeSpec, RecordCandidate, Sequencer, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new("file");
//! let root = builder.root();
//! builder.record(root, NodeSpec::new("header").bounds(Bounds::exactly(1)), vec![Criterion::literal(0, "H")])?;
//! builder.record(root, NodeSpec::new("trailer").bounds(Bounds::exactly(1)), vec![Criterion::literal(0, "T")])?;
//! let tree = builder.build()?;
//!
//! let mut session = Sequencer::new(&tree);
//! let header = RecordCandidate::identify(&tree, vec!["H".into()], "H".into(), 1);
//! session.accept(header).unwrap();
//!
//! let err = session.finish().unwrap_err();
//! assert!(err.is_unexpected());
//! assert_eq!(err.expected.as_deref(), Some("trailer"));
//! assert_eq!(err.line(), 1);
//! # Ok::<(), flatgram_core::GrammarError>(())
//! ```
//!
//! # Features
//!
//! - `serde`: [`GrammarDef`] and friends for loading grammars from YAML or JSON.

mod criteria;
mod error;
#[cfg(feature = "serde")]
pub mod grammar;
mod identify;
mod sequencer;
pub mod traverse;
mod tree;

pub use criteria::{all_match, Criterion, FieldRef, FieldTest};
pub use error::{
    CoreResult, Diagnostic, DiagnosticKind, GrammarError, GrammarResult, STREAM_START_LINE,
};
#[cfg(feature = "serde")]
pub use grammar::{CriterionDef, GrammarDef, GroupDef, MaxOccurs, NodeDef, RecordDef};
pub use identify::identify;
pub use sequencer::{can_start, Accepted, Input, RecordCandidate, Sequencer, Step, Summary};
pub use traverse::{traverse, StatsCollector, TreeVisitor, VisitorContext};
pub use tree::{Bounds, Node, NodeId, NodeKind, NodeSpec, ParserTree, TreeBuilder};
