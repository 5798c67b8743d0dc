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

//! Grammar tree traversal.
//!
//! Tools that render or analyse a grammar (the CLI `inspect` command, DOT
//! output, statistics) implement [`TreeVisitor`] and let [`traverse`] walk
//! the tree depth-first in match order.
//!
//! # Example
//!
//! ```
//! use flatgram_core::{traverse, Criterion, NodeSpec, StatsCollector, TreeBuilder};
//!
//! let mut builder = TreeBuilder::new("file");
//! let root = builder.root();
//! let batch = builder.group(root, NodeSpec::new("batch"))?;
//! builder.record(batch, NodeSpec::new("header"), vec![Criterion::literal(0, "H")])?;
//! let tree = builder.build()?;
//!
//! let mut stats = StatsCollector::default();
//! traverse(&tree, &mut stats).unwrap();
//! assert_eq!(stats.group_count, 1);
//! assert_eq!(stats.record_count, 1);
//! assert_eq!(stats.max_depth, 2);
//! # Ok::<(), flatgram_core::GrammarError>(())
//! ```

use crate::tree::{Node, NodeId, NodeKind, ParserTree};

/// Context provided to visitors during traversal.
#[derive(Debug, Clone)]
pub struct VisitorContext<'a> {
    /// Nesting depth (0 = stream group).
    pub depth: usize,
    /// Names from the stream group's first child down to the current node.
    pub path: Vec<&'a str>,
    /// The tree being traversed.
    pub tree: &'a ParserTree,
}

impl<'a> VisitorContext<'a> {
    /// Context for the stream group.
    pub fn new(tree: &'a ParserTree) -> Self {
        Self {
            depth: 0,
            path: Vec::new(),
            tree,
        }
    }

    /// Context one level below, entering `name`.
    pub fn child(&self, name: &'a str) -> Self {
        let mut path = self.path.clone();
        path.push(name);
        Self {
            depth: self.depth + 1,
            path,
            tree: self.tree,
        }
    }

    /// Path as `batch/header` (or the stream name at the root).
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            self.tree.name(self.tree.root()).to_string()
        } else {
            self.path.join("/")
        }
    }
}

/// Callbacks for each node of a grammar tree.
///
/// Group callbacks default to no-ops; only records must be handled.
pub trait TreeVisitor {
    /// Error type returned by visitor methods.
    type Error;

    /// Called before a group's children. The stream group is visited too.
    fn begin_group(
        &mut self,
        _id: NodeId,
        _node: &Node,
        _ctx: &VisitorContext,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after a group's children.
    fn end_group(
        &mut self,
        _id: NodeId,
        _node: &Node,
        _ctx: &VisitorContext,
    ) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called for each record.
    fn visit_record(
        &mut self,
        id: NodeId,
        node: &Node,
        ctx: &VisitorContext,
    ) -> Result<(), Self::Error>;
}

/// Walk `tree` depth-first in match order.
pub fn traverse<V: TreeVisitor>(tree: &ParserTree, visitor: &mut V) -> Result<(), V::Error> {
    let ctx = VisitorContext::new(tree);
    let root = tree.root();
    let node = tree.node(root);
    visitor.begin_group(root, node, &ctx)?;
    for &child in node.children() {
        traverse_node(tree, child, visitor, &ctx)?;
    }
    visitor.end_group(root, node, &ctx)
}

fn traverse_node<'a, V: TreeVisitor>(
    tree: &'a ParserTree,
    id: NodeId,
    visitor: &mut V,
    parent: &VisitorContext<'a>,
) -> Result<(), V::Error> {
    let node = tree.node(id);
    let ctx = parent.child(&node.name);
    match &node.kind {
        NodeKind::Record { .. } => visitor.visit_record(id, node, &ctx),
        NodeKind::Group { children } => {
            visitor.begin_group(id, node, &ctx)?;
            for &child in children {
                traverse_node(tree, child, visitor, &ctx)?;
            }
            visitor.end_group(id, node, &ctx)
        }
    }
}

/// Counts nodes by kind.
#[derive(Debug, Default)]
pub struct StatsCollector {
    /// Groups below the stream group.
    pub group_count: usize,
    pub record_count: usize,
    /// Records without criteria.
    pub unconditional_count: usize,
    pub max_depth: usize,
}

impl TreeVisitor for StatsCollector {
    type Error = std::convert::Infallible;

    fn begin_group(
        &mut self,
        _id: NodeId,
        _node: &Node,
        ctx: &VisitorContext,
    ) -> Result<(), Self::Error> {
        if ctx.depth > 0 {
            self.group_count += 1;
        }
        self.max_depth = self.max_depth.max(ctx.depth);
        Ok(())
    }

    fn visit_record(
        &mut self,
        _id: NodeId,
        node: &Node,
        ctx: &VisitorContext,
    ) -> Result<(), Self::Error> {
        self.record_count += 1;
        if node.is_unconditional() {
            self.unconditional_count += 1;
        }
        self.max_depth = self.max_depth.max(ctx.depth);
        Ok(())
    }
}
