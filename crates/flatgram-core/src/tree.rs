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

//! The grammar tree.
//!
//! A [`ParserTree`] is an arena of [`Node`]s addressed by [`NodeId`]. The root
//! is always a group describing the whole stream. Nodes keep a non-owning
//! parent index, so the tree is a plain `Vec` that can be shared read-only
//! across any number of sessions.
//!
//! Trees are assembled with [`TreeBuilder`] and are immutable afterwards.
//!
//! ```
//! use flatgram_core::{Bounds, Criterion, NodeSpec, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new("file");
//! let root = builder.root();
//! let batch = builder.group(root, NodeSpec::new("batch").bounds(Bounds::between(1, 3)))?;
//! builder.record(batch, NodeSpec::new("header").bounds(Bounds::exactly(1)), vec![Criterion::literal(0, "H")])?;
//! builder.record(batch, NodeSpec::new("trailer").bounds(Bounds::exactly(1)), vec![Criterion::literal(0, "T")])?;
//! let tree = builder.build()?;
//!
//! assert_eq!(tree.children(batch).len(), 2);
//! assert_eq!(tree.path(tree.find("batch/trailer").unwrap()), "batch/trailer");
//! # Ok::<(), flatgram_core::GrammarError>(())
//! ```

use crate::criteria::Criterion;
use crate::error::{GrammarError, GrammarResult};
use std::fmt;

/// Index of a node inside its [`ParserTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The arena index.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Occurrence bounds: `min..=max`, `max == None` meaning unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bounds {
    pub min: u32,
    pub max: Option<u32>,
}

impl Bounds {
    pub const fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    pub const fn exactly(n: u32) -> Self {
        Self::new(n, Some(n))
    }

    pub const fn optional() -> Self {
        Self::new(0, Some(1))
    }

    pub const fn at_least(min: u32) -> Self {
        Self::new(min, None)
    }

    pub const fn between(min: u32, max: u32) -> Self {
        Self::new(min, Some(max))
    }

    /// `count` reaches the minimum.
    #[inline]
    pub fn is_satisfied_by(&self, count: u32) -> bool {
        count >= self.min
    }

    /// `count` reaches the maximum; no further occurrence is allowed.
    #[inline]
    pub fn is_exhausted_by(&self, count: u32) -> bool {
        self.max.is_some_and(|max| count >= max)
    }

    /// `count` lies within the bounds.
    #[inline]
    pub fn contains(&self, count: u32) -> bool {
        self.is_satisfied_by(count) && self.max.map_or(true, |max| count <= max)
    }

    fn validate(&self, name: &str) -> GrammarResult<()> {
        let reason = match self.max {
            Some(0) => Some("maxOccurs must be at least 1".to_string()),
            Some(max) if max < self.min => Some(format!(
                "minOccurs {} exceeds maxOccurs {}",
                self.min, max
            )),
            _ => None,
        };
        match reason {
            Some(reason) => Err(GrammarError::InvalidBounds {
                name: name.to_string(),
                reason,
            }),
            None => Ok(()),
        }
    }
}

impl Default for Bounds {
    fn default() -> Self {
        Self::at_least(0)
    }
}

impl fmt::Display for Bounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "[{}..{}]", self.min, max),
            None => write!(f, "[{}..*]", self.min),
        }
    }
}

/// Node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// An ordered, boundedly-repeatable sequence of children.
    Group { children: Vec<NodeId> },
    /// One identifiable physical record type.
    Record { criteria: Vec<Criterion> },
}

/// A grammar node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Name, unique among siblings.
    pub name: String,
    /// Occurrence bounds within one pass of the parent.
    pub bounds: Bounds,
    /// Rank among siblings. Equal ranks are alternatives at the same position.
    pub order: u32,
    /// Parent group (`None` for the root).
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

impl Node {
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    #[inline]
    pub fn is_record(&self) -> bool {
        matches!(self.kind, NodeKind::Record { .. })
    }

    /// Children in match order (empty for records).
    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::Record { .. } => &[],
        }
    }

    /// Identification criteria (empty for groups).
    pub fn criteria(&self) -> &[Criterion] {
        match &self.kind {
            NodeKind::Record { criteria } => criteria,
            NodeKind::Group { .. } => &[],
        }
    }

    /// A record with no criteria, matching any raw record.
    #[inline]
    pub fn is_unconditional(&self) -> bool {
        matches!(&self.kind, NodeKind::Record { criteria } if criteria.is_empty())
    }
}

/// The immutable grammar: an arena of nodes rooted at a stream group.
#[derive(Debug, Clone, PartialEq)]
pub struct ParserTree {
    nodes: Vec<Node>,
    /// Every record in depth-first match order.
    records: Vec<NodeId>,
}

impl ParserTree {
    /// The stream group.
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Look up a node, returning `None` for foreign ids.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Number of nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn name(&self, id: NodeId) -> &str {
        &self.node(id).name
    }

    #[inline]
    pub fn bounds(&self, id: NodeId) -> Bounds {
        self.node(id).bounds
    }

    #[inline]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).children()
    }

    #[inline]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// All records, depth-first in match order.
    #[inline]
    pub fn records(&self) -> &[NodeId] {
        &self.records
    }

    /// Distance from the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(parent) = current {
            depth += 1;
            current = self.parent(parent);
        }
        depth
    }

    /// Slash-separated names below the root, e.g. `batch/header`.
    /// The root's path is its own name.
    pub fn path(&self, id: NodeId) -> String {
        if id == self.root() {
            return self.name(id).to_string();
        }
        let mut names = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == self.root() {
                break;
            }
            names.push(self.name(node));
            current = self.parent(node);
        }
        names.reverse();
        names.join("/")
    }

    /// Resolve a slash-separated path produced by [`path`](Self::path).
    pub fn find(&self, path: &str) -> Option<NodeId> {
        let mut current = self.root();
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            current = *self
                .children(current)
                .iter()
                .find(|&&child| self.name(child) == segment)?;
        }
        Some(current)
    }

    /// Position of `child` in its parent's match order.
    pub fn slot(&self, child: NodeId) -> Option<usize> {
        let parent = self.parent(child)?;
        self.children(parent).iter().position(|&c| c == child)
    }
}

/// Name, bounds and optional order of a node being added to a [`TreeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSpec {
    pub name: String,
    pub bounds: Bounds,
    pub order: Option<u32>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Bounds::default(),
            order: None,
        }
    }

    pub fn bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn occurs(mut self, min: u32, max: Option<u32>) -> Self {
        self.bounds = Bounds::new(min, max);
        self
    }

    /// Explicit sibling rank. Omitted ranks follow the previous sibling.
    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }
}

/// Assembles a [`ParserTree`], validating each node as it is added.
#[derive(Debug, Clone)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
}

impl TreeBuilder {
    /// Start a tree whose stream group occurs at most once and may be empty.
    pub fn new(root_name: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node {
                name: root_name.into(),
                bounds: Bounds::optional(),
                order: 0,
                parent: None,
                kind: NodeKind::Group {
                    children: Vec::new(),
                },
            }],
        }
    }

    /// Set stream-level bounds (e.g. `Bounds::exactly(1)` to reject empty input).
    pub fn stream_bounds(mut self, bounds: Bounds) -> Self {
        self.nodes[0].bounds = bounds;
        self
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Add a group under `parent`.
    pub fn group(&mut self, parent: NodeId, spec: NodeSpec) -> GrammarResult<NodeId> {
        self.add(
            parent,
            spec,
            NodeKind::Group {
                children: Vec::new(),
            },
        )
    }

    /// Add a record under `parent`. Empty `criteria` declares the group's fallback record.
    pub fn record(
        &mut self,
        parent: NodeId,
        spec: NodeSpec,
        criteria: Vec<Criterion>,
    ) -> GrammarResult<NodeId> {
        if criteria.is_empty() {
            if let Some(existing) = self
                .siblings(parent)?
                .iter()
                .find(|&&c| self.nodes[c.0].is_unconditional())
            {
                return Err(GrammarError::MultipleFallbacks {
                    parent: self.nodes[parent.0].name.clone(),
                    first: self.nodes[existing.0].name.clone(),
                    second: spec.name,
                });
            }
        }
        self.add(parent, spec, NodeKind::Record { criteria })
    }

    fn siblings(&self, parent: NodeId) -> GrammarResult<&[NodeId]> {
        let node = self
            .nodes
            .get(parent.0)
            .ok_or(GrammarError::UnknownNode(parent.0))?;
        Ok(node.children())
    }

    fn add(&mut self, parent: NodeId, spec: NodeSpec, kind: NodeKind) -> GrammarResult<NodeId> {
        if spec.name.is_empty() {
            return Err(GrammarError::EmptyName);
        }
        let parent_node = self
            .nodes
            .get(parent.0)
            .ok_or(GrammarError::UnknownNode(parent.0))?;
        if !parent_node.is_group() {
            return Err(GrammarError::NotAGroup {
                parent: parent_node.name.clone(),
                name: spec.name,
            });
        }
        let siblings = parent_node.children();
        if siblings.iter().any(|&c| self.nodes[c.0].name == spec.name) {
            return Err(GrammarError::DuplicateName {
                parent: parent_node.name.clone(),
                name: spec.name,
            });
        }
        spec.bounds.validate(&spec.name)?;

        let order = spec.order.unwrap_or_else(|| {
            siblings
                .last()
                .map_or(1, |&last| self.nodes[last.0].order.saturating_add(1))
        });

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: spec.name,
            bounds: spec.bounds,
            order,
            parent: Some(parent),
            kind,
        });
        if let NodeKind::Group { children } = &mut self.nodes[parent.0].kind {
            children.push(id);
        }
        Ok(id)
    }

    /// Freeze the tree. Children are sorted by order; equal orders keep
    /// declaration order.
    pub fn build(mut self) -> GrammarResult<ParserTree> {
        let root = &self.nodes[0];
        root.bounds.validate(&root.name)?;

        let orders: Vec<u32> = self.nodes.iter().map(|n| n.order).collect();
        for node in &mut self.nodes {
            if let NodeKind::Group { children } = &mut node.kind {
                children.sort_by_key(|c| orders[c.0]);
            }
        }

        let mut records = Vec::new();
        collect_records(&self.nodes, NodeId(0), &mut records);

        Ok(ParserTree {
            nodes: self.nodes,
            records,
        })
    }
}

fn collect_records(nodes: &[Node], id: NodeId, out: &mut Vec<NodeId>) {
    match &nodes[id.0].kind {
        NodeKind::Record { .. } => out.push(id),
        NodeKind::Group { children } => {
            for &child in children {
                collect_records(nodes, child, out);
            }
        }
    }
}
