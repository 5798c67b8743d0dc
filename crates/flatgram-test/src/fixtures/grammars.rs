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

//! Canonical grammars.

use flatgram_core::{Bounds, Criterion, NodeSpec, ParserTree, TreeBuilder};

/// The batch grammar:
///
/// ```text
/// file [1..1]
/// └── batch [1..3]
///     ├── header [1..1]       field[0] = "H"
///     ├── detail [0..*]
///     │   └── detail [1..1]   field[0] = "D"
///     └── trailer [1..1]      field[0] = "T"
/// ```
pub fn batch_tree() -> ParserTree {
    let mut b = TreeBuilder::new("file").stream_bounds(Bounds::exactly(1));
    let root = b.root();
    let batch = b
        .group(root, NodeSpec::new("batch").bounds(Bounds::between(1, 3)))
        .expect("valid group");
    b.record(
        batch,
        NodeSpec::new("header").bounds(Bounds::exactly(1)),
        vec![Criterion::literal(0, "H")],
    )
    .expect("valid record");
    let detail = b
        .group(batch, NodeSpec::new("detail").bounds(Bounds::at_least(0)))
        .expect("valid group");
    b.record(
        detail,
        NodeSpec::new("detail").bounds(Bounds::exactly(1)),
        vec![Criterion::literal(0, "D")],
    )
    .expect("valid record");
    b.record(
        batch,
        NodeSpec::new("trailer").bounds(Bounds::exactly(1)),
        vec![Criterion::literal(0, "T")],
    )
    .expect("valid record");
    b.build().expect("batch grammar is valid")
}

/// A header, any mix of credits and debits, a trailer.
///
/// `credit` and `debit` share an order and are alternatives at one position.
pub fn ordered_choice_tree() -> ParserTree {
    let mut b = TreeBuilder::new("ledger");
    let root = b.root();
    b.record(
        root,
        NodeSpec::new("header").bounds(Bounds::exactly(1)).order(1),
        vec![Criterion::literal(0, "H")],
    )
    .expect("valid record");
    b.record(
        root,
        NodeSpec::new("credit").order(2),
        vec![Criterion::literal(0, "C")],
    )
    .expect("valid record");
    b.record(
        root,
        NodeSpec::new("debit").order(2),
        vec![Criterion::literal(0, "D")],
    )
    .expect("valid record");
    b.record(
        root,
        NodeSpec::new("trailer").bounds(Bounds::exactly(1)).order(3),
        vec![Criterion::literal(0, "T")],
    )
    .expect("valid record");
    b.build().expect("ledger grammar is valid")
}

/// Two record types whose criteria overlap: `specific` and `general` both
/// match lines starting with `"X1"`; whichever is declared first wins.
pub fn overlapping_tree(specific_first: bool) -> ParserTree {
    let mut b = TreeBuilder::new("file");
    let root = b.root();
    let specific = (
        NodeSpec::new("specific").order(1),
        vec![Criterion::literal(0, "X1")],
    );
    let general = (
        NodeSpec::new("general").order(1),
        vec![Criterion::pattern(0, "X[0-9]").expect("valid pattern")],
    );
    let (first, second) = if specific_first {
        (specific, general)
    } else {
        (general, specific)
    };
    b.record(root, first.0, first.1).expect("valid record");
    b.record(root, second.0, second.1).expect("valid record");
    b.build().expect("overlapping grammar is valid")
}

/// The batch grammar as a YAML definition document.
pub const BATCH_GRAMMAR_YAML: &str = r#"name: file
min_occurs: 1
max_occurs: 1
children:
  - type: group
    name: batch
    min_occurs: 1
    max_occurs: 3
    children:
      - type: record
        name: header
        min_occurs: 1
        max_occurs: 1
        identify:
          - field: 0
            literal: H
      - type: group
        name: detail
        max_occurs: unbounded
        children:
          - type: record
            name: detail
            min_occurs: 1
            max_occurs: 1
            identify:
              - field: 0
                literal: D
      - type: record
        name: trailer
        min_occurs: 1
        max_occurs: 1
        identify:
          - field: 0
            literal: T
"#;

/// The ordered-choice grammar as a JSON definition document.
pub const LEDGER_GRAMMAR_JSON: &str = r#"{
  "name": "ledger",
  "children": [
    {"type": "record", "name": "header", "min_occurs": 1, "max_occurs": 1,
     "identify": [{"field": 0, "literal": "H"}]},
    {"type": "record", "name": "credit", "order": 2,
     "identify": [{"field": 0, "literal": "C"}]},
    {"type": "record", "name": "debit", "order": 2,
     "identify": [{"field": 0, "literal": "D"}]},
    {"type": "record", "name": "trailer", "min_occurs": 1, "max_occurs": 1, "order": 3,
     "identify": [{"field": 0, "literal": "T"}]}
  ]
}"#;

/// A fixed-length grammar: a 1-character record type code at column 0.
pub const FIXED_GRAMMAR_YAML: &str = r#"name: payments
children:
  - type: record
    name: header
    min_occurs: 1
    max_occurs: 1
    identify:
      - offset: 0
        length: 1
        literal: "1"
  - type: record
    name: payment
    max_occurs: unbounded
    identify:
      - offset: 0
        length: 1
        literal: "6"
  - type: record
    name: control
    min_occurs: 1
    max_occurs: 1
    identify:
      - offset: 0
        length: 1
        literal: "9"
"#;
