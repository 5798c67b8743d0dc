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

//! Serializable grammar definitions.
//!
//! A [`GrammarDef`] is the document form of a [`ParserTree`], loaded from
//! YAML or JSON with `serde` and turned into a tree with
//! [`GrammarDef::build`].
//!
//! ```yaml
//! name: file
//! children:
//!   - type: group
//!     name: batch
//!     min_occurs: 1
//!     max_occurs: 3
//!     children:
//!       - type: record
//!         name: header
//!         min_occurs: 1
//!         max_occurs: 1
//!         identify:
//!           - field: 0
//!             literal: H
//!       - type: record
//!         name: detail
//!         max_occurs: unbounded
//!         identify:
//!           - field: 0
//!             pattern: "D[0-9]?"
//! ```
//!
//! Omitted bounds default to `0..unbounded` for nodes and `0..1` for the
//! stream. Omitted orders follow declaration order.

use crate::criteria::{Criterion, FieldRef, FieldTest};
use crate::error::{GrammarError, GrammarResult};
use crate::tree::{Bounds, Node, NodeId, NodeKind, NodeSpec, ParserTree, TreeBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper occurrence bound: a count or `unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawMaxOccurs", into = "RawMaxOccurs")]
pub enum MaxOccurs {
    Count(u32),
    #[default]
    Unbounded,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawMaxOccurs {
    Count(u32),
    Word(String),
}

impl TryFrom<RawMaxOccurs> for MaxOccurs {
    type Error = String;

    fn try_from(raw: RawMaxOccurs) -> Result<Self, Self::Error> {
        match raw {
            RawMaxOccurs::Count(n) => Ok(MaxOccurs::Count(n)),
            RawMaxOccurs::Word(word) if word == "unbounded" || word == "*" => {
                Ok(MaxOccurs::Unbounded)
            }
            RawMaxOccurs::Word(word) => Err(format!(
                "invalid max_occurs '{}', expected a number or 'unbounded'",
                word
            )),
        }
    }
}

impl From<MaxOccurs> for RawMaxOccurs {
    fn from(max: MaxOccurs) -> Self {
        match max {
            MaxOccurs::Count(n) => RawMaxOccurs::Count(n),
            MaxOccurs::Unbounded => RawMaxOccurs::Word("unbounded".to_string()),
        }
    }
}

impl From<MaxOccurs> for Option<u32> {
    fn from(max: MaxOccurs) -> Self {
        match max {
            MaxOccurs::Count(n) => Some(n),
            MaxOccurs::Unbounded => None,
        }
    }
}

impl From<Option<u32>> for MaxOccurs {
    fn from(max: Option<u32>) -> Self {
        max.map_or(MaxOccurs::Unbounded, MaxOccurs::Count)
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Count(n) => write!(f, "{}", n),
            MaxOccurs::Unbounded => write!(f, "unbounded"),
        }
    }
}

fn stream_max() -> MaxOccurs {
    MaxOccurs::Count(1)
}

/// Top-level grammar document describing the stream group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarDef {
    pub name: String,
    #[serde(default)]
    pub min_occurs: u32,
    #[serde(default = "stream_max")]
    pub max_occurs: MaxOccurs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDef>,
}

/// A child node definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeDef {
    Group(GroupDef),
    Record(RecordDef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupDef {
    pub name: String,
    #[serde(default)]
    pub min_occurs: u32,
    #[serde(default)]
    pub max_occurs: MaxOccurs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDef {
    pub name: String,
    #[serde(default)]
    pub min_occurs: u32,
    #[serde(default)]
    pub max_occurs: MaxOccurs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<u32>,
    /// Identification criteria; empty makes the record its group's fallback.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub identify: Vec<CriterionDef>,
}

/// A criterion: `field` or `offset` + `length`, and `literal` or `pattern`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl CriterionDef {
    /// Compile into a [`Criterion`]. `record` names the owner in errors.
    pub fn to_criterion(&self, record: &str) -> GrammarResult<Criterion> {
        let invalid = |reason: &str| GrammarError::InvalidCriterion {
            name: record.to_string(),
            reason: reason.to_string(),
        };
        let field = match (self.field, self.offset, self.length) {
            (Some(position), None, None) => FieldRef::Index(position),
            (None, Some(offset), Some(length)) => FieldRef::Span { offset, length },
            _ => return Err(invalid("expected either `field` or `offset` with `length`")),
        };
        let test = match (&self.literal, &self.pattern) {
            (Some(literal), None) => FieldTest::Literal(literal.clone()),
            (None, Some(pattern)) => {
                FieldTest::pattern(pattern).map_err(|e| GrammarError::InvalidPattern {
                    name: record.to_string(),
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?
            }
            _ => return Err(invalid("expected exactly one of `literal` or `pattern`")),
        };
        Ok(Criterion::new(field, test))
    }

    fn from_criterion(criterion: &Criterion) -> Self {
        let mut def = CriterionDef::default();
        match criterion.field {
            FieldRef::Index(position) => def.field = Some(position),
            FieldRef::Span { offset, length } => {
                def.offset = Some(offset);
                def.length = Some(length);
            }
        }
        match &criterion.test {
            FieldTest::Literal(literal) => def.literal = Some(literal.clone()),
            FieldTest::Pattern(regex) => {
                let expr = regex.as_str();
                let inner = expr
                    .strip_prefix("^(?:")
                    .and_then(|s| s.strip_suffix(")$"))
                    .unwrap_or(expr);
                def.pattern = Some(inner.to_string());
            }
        }
        def
    }
}

impl GrammarDef {
    /// Validate the definition and build the tree.
    pub fn build(&self) -> GrammarResult<ParserTree> {
        let mut builder = TreeBuilder::new(self.name.clone())
            .stream_bounds(Bounds::new(self.min_occurs, self.max_occurs.into()));
        let root = builder.root();
        for child in &self.children {
            add_node(&mut builder, root, child)?;
        }
        builder.build()
    }

    /// Describe an existing tree. Orders are written only where declaration
    /// order would not reproduce them.
    pub fn from_tree(tree: &ParserTree) -> Self {
        let root = tree.node(tree.root());
        Self {
            name: root.name.clone(),
            min_occurs: root.bounds.min,
            max_occurs: root.bounds.max.into(),
            children: child_defs(tree, tree.root()),
        }
    }
}

fn add_node(builder: &mut TreeBuilder, parent: NodeId, def: &NodeDef) -> GrammarResult<()> {
    match def {
        NodeDef::Group(group) => {
            let spec = node_spec(&group.name, group.min_occurs, group.max_occurs, group.order);
            let id = builder.group(parent, spec)?;
            for child in &group.children {
                add_node(builder, id, child)?;
            }
        }
        NodeDef::Record(record) => {
            let spec = node_spec(&record.name, record.min_occurs, record.max_occurs, record.order);
            let criteria = record
                .identify
                .iter()
                .map(|c| c.to_criterion(&record.name))
                .collect::<GrammarResult<Vec<_>>>()?;
            builder.record(parent, spec, criteria)?;
        }
    }
    Ok(())
}

fn node_spec(name: &str, min: u32, max: MaxOccurs, order: Option<u32>) -> NodeSpec {
    let spec = NodeSpec::new(name).occurs(min, max.into());
    match order {
        Some(order) => spec.order(order),
        None => spec,
    }
}

fn child_defs(tree: &ParserTree, group: NodeId) -> Vec<NodeDef> {
    let mut previous: Option<u32> = None;
    tree.children(group)
        .iter()
        .map(|&id| {
            let node = tree.node(id);
            let implied = previous.map_or(1, |order| order.saturating_add(1));
            previous = Some(node.order);
            let order = (node.order != implied).then_some(node.order);
            node_def(tree, id, node, order)
        })
        .collect()
}

fn node_def(tree: &ParserTree, id: NodeId, node: &Node, order: Option<u32>) -> NodeDef {
    match &node.kind {
        NodeKind::Group { .. } => NodeDef::Group(GroupDef {
            name: node.name.clone(),
            min_occurs: node.bounds.min,
            max_occurs: node.bounds.max.into(),
            order,
            children: child_defs(tree, id),
        }),
        NodeKind::Record { criteria } => NodeDef::Record(RecordDef {
            name: node.name.clone(),
            min_occurs: node.bounds.min,
            max_occurs: node.bounds.max.into(),
            order,
            identify: criteria.iter().map(CriterionDef::from_criterion).collect(),
        }),
    }
}
