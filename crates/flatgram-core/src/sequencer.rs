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

//! The sequencing engine.
//!
//! A [`Sequencer`] owns the cursor for one stream session: a stack of open
//! group frames, each holding per-child occurrence counts for the current
//! repetition and the tier (run of equal-order siblings) it has reached.
//!
//! Each candidate is placed depth-first, left-to-right, with bubble-up:
//!
//! 1. At the innermost frame, walk tiers from the current one. A record child
//!    under its maximum whose criteria match is consumed. A group child under
//!    its maximum that [can start](can_start) with the candidate is entered.
//! 2. A tier that cannot take the candidate is skipped if every child in it
//!    has met its minimum; otherwise the session fails naming the unmet node.
//! 3. When every tier is passed, the frame closes (one repetition of that
//!    group completes) and the candidate is retried at the parent.
//! 4. When the root is exhausted, a new pass of the stream begins if the root
//!    bounds allow it and the candidate can start one. Otherwise the record
//!    cannot occur anywhere and the session fails.
//!
//! End of input closes every frame innermost-first and checks minimums.
//! Every violation is sticky: once a session fails it keeps returning the
//! same diagnostic.

use crate::criteria::all_match;
use crate::error::{CoreResult, Diagnostic, STREAM_START_LINE};
use crate::tree::{NodeId, NodeKind, ParserTree};
use std::ops::Range;
use tracing::{debug, trace};

/// An identified (or unidentified) physical record offered to the sequencer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCandidate {
    /// The resolved record type, `None` if nothing matched.
    pub record: Option<NodeId>,
    pub fields: Vec<String>,
    pub text: String,
    /// 1-based line where the record starts.
    pub line: usize,
}

impl RecordCandidate {
    pub fn new(record: Option<NodeId>, fields: Vec<String>, text: String, line: usize) -> Self {
        Self {
            record,
            fields,
            text,
            line,
        }
    }

    /// Identify `fields` against every record type of `tree`.
    pub fn identify(tree: &ParserTree, fields: Vec<String>, text: String, line: usize) -> Self {
        let record = tree.identify(&fields);
        Self::new(record, fields, text, line)
    }
}

/// A record placed in the grammar, handed on for binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accepted {
    /// The grammar position that took the record.
    pub node: NodeId,
    pub fields: Vec<String>,
    pub text: String,
    pub line: usize,
}

/// Statistics of a session that reached end of input cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Records accepted.
    pub records: u64,
    /// Completed passes over the stream group.
    pub passes: u32,
    /// Line of the last accepted record, or [`STREAM_START_LINE`].
    pub last_line: usize,
}

/// One step of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Record(RecordCandidate),
    EndOfInput,
}

/// Outcome of a successful [`Sequencer::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Accepted(Accepted),
    Finished(Summary),
}

/// An open group repetition.
#[derive(Debug, Clone)]
struct Frame {
    group: NodeId,
    /// Position of `group` among its parent's children.
    slot: usize,
    /// Occurrences of each child within this repetition.
    counts: Vec<u32>,
    /// Index of the first child of the current tier.
    position: usize,
}

impl Frame {
    fn open(tree: &ParserTree, group: NodeId, slot: usize) -> Self {
        Self {
            group,
            slot,
            counts: vec![0; tree.children(group).len()],
            position: 0,
        }
    }
}

enum Placement {
    Accepted(NodeId),
    Enter { group: NodeId, slot: usize },
    Exhausted,
}

#[derive(Debug, Clone)]
enum State {
    Active,
    Finished(Summary),
    Failed(Diagnostic),
}

/// Drives one stream session against a shared [`ParserTree`].
#[derive(Debug, Clone)]
pub struct Sequencer<'t> {
    tree: &'t ParserTree,
    stack: Vec<Frame>,
    /// Completed passes of the root.
    passes: u32,
    /// The current root pass has accepted at least one record.
    pass_open: bool,
    records: u64,
    last_line: Option<usize>,
    state: State,
}

impl<'t> Sequencer<'t> {
    /// Start a session at the beginning of the stream.
    pub fn new(tree: &'t ParserTree) -> Self {
        Self {
            tree,
            stack: vec![Frame::open(tree, tree.root(), 0)],
            passes: 0,
            pass_open: false,
            records: 0,
            last_line: None,
            state: State::Active,
        }
    }

    #[inline]
    pub fn tree(&self) -> &'t ParserTree {
        self.tree
    }

    /// Records accepted so far.
    #[inline]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Line of the last accepted record.
    #[inline]
    pub fn last_line(&self) -> Option<usize> {
        self.last_line
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self.state, State::Failed(_))
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Finished(_))
    }

    /// Open groups, outermost first. The root is always first.
    pub fn open_groups(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.stack.iter().map(|frame| frame.group)
    }

    /// Discard all state and start over at the beginning of a new stream.
    pub fn reset(&mut self) {
        *self = Self::new(self.tree);
    }

    /// Feed one record or end of input.
    pub fn advance(&mut self, input: Input) -> CoreResult<Step> {
        match input {
            Input::Record(candidate) => self.accept(candidate).map(Step::Accepted),
            Input::EndOfInput => self.finish().map(Step::Finished),
        }
    }

    /// Place one record.
    pub fn accept(&mut self, candidate: RecordCandidate) -> CoreResult<Accepted> {
        match &self.state {
            State::Active => {}
            State::Failed(diagnostic) => return Err(diagnostic.clone()),
            State::Finished(_) => {
                return Err(
                    Diagnostic::unexpected("record after end of input", candidate.line)
                        .with_text(candidate.text),
                );
            }
        }

        let Some(record) = candidate.record else {
            return Err(self.fail(Diagnostic::unidentified(candidate.line, candidate.text)));
        };

        match self.place(record, &candidate) {
            Ok(node) => {
                trace!(
                    record = %self.tree.path(node),
                    line = candidate.line,
                    "record accepted"
                );
                self.records += 1;
                self.last_line = Some(candidate.line);
                self.pass_open = true;
                Ok(Accepted {
                    node,
                    fields: candidate.fields,
                    text: candidate.text,
                    line: candidate.line,
                })
            }
            Err(diagnostic) => {
                let name = self.tree.name(record).to_string();
                Err(self.fail(diagnostic.with_record(name).with_text(candidate.text)))
            }
        }
    }

    /// Signal end of input, closing every open frame.
    pub fn finish(&mut self) -> CoreResult<Summary> {
        match &self.state {
            State::Active => {}
            State::Failed(diagnostic) => return Err(diagnostic.clone()),
            State::Finished(summary) => return Ok(*summary),
        }
        match self.close() {
            Ok(summary) => {
                debug!(
                    records = summary.records,
                    passes = summary.passes,
                    "stream complete"
                );
                self.state = State::Finished(summary);
                Ok(summary)
            }
            Err(diagnostic) => Err(self.fail(diagnostic)),
        }
    }

    fn fail(&mut self, diagnostic: Diagnostic) -> Diagnostic {
        debug!(line = diagnostic.line, error = %diagnostic, "session failed");
        self.state = State::Failed(diagnostic.clone());
        diagnostic
    }

    fn place(&mut self, record: NodeId, candidate: &RecordCandidate) -> CoreResult<NodeId> {
        let tree = self.tree;
        let fields = candidate.fields.as_slice();
        loop {
            match self.place_in_top(record, fields, candidate.line)? {
                Placement::Accepted(node) => return Ok(node),
                Placement::Enter { group, slot } => {
                    debug!(group = %tree.path(group), line = candidate.line, "entering group");
                    self.stack.push(Frame::open(tree, group, slot));
                }
                Placement::Exhausted if self.stack.len() > 1 => self.pop_frame(),
                Placement::Exhausted => {
                    let root = tree.root();
                    let next = self.passes.saturating_add(1);
                    if self.pass_open
                        && !tree.bounds(root).is_exhausted_by(next)
                        && starts(tree, root, fields)
                    {
                        debug!(pass = u64::from(next) + 1, line = candidate.line, "starting stream pass");
                        self.passes = next;
                        self.pass_open = false;
                        self.stack[0] = Frame::open(tree, root, 0);
                    } else {
                        return Err(Diagnostic::unexpected(
                            format!("'{}' cannot occur at this position", tree.name(record)),
                            candidate.line,
                        ));
                    }
                }
            }
        }
    }

    fn place_in_top(
        &mut self,
        record: NodeId,
        fields: &[String],
        line: usize,
    ) -> CoreResult<Placement> {
        let tree = self.tree;
        let Some(frame) = self.stack.last_mut() else {
            return Ok(Placement::Exhausted);
        };
        let children = tree.children(frame.group);

        let mut start = frame.position;
        while start < children.len() {
            let tier = tier_at(tree, children, start);
            let counts = &frame.counts;
            if let Some(k) =
                select_in_tier(tree, children, tier.clone(), |k| counts[k], fields)
            {
                frame.position = start;
                let child = children[k];
                if tree.node(child).is_record() {
                    frame.counts[k] = frame.counts[k].saturating_add(1);
                    debug_assert!(tree.bounds(child).contains(frame.counts[k]));
                    return Ok(Placement::Accepted(child));
                }
                return Ok(Placement::Enter {
                    group: child,
                    slot: k,
                });
            }
            if let Some(k) = tier
                .clone()
                .find(|&k| !tree.bounds(children[k]).is_satisfied_by(frame.counts[k]))
            {
                let missing = first_required(tree, children[k]);
                return Err(Diagnostic::unexpected(
                    format!(
                        "expected '{}' but found '{}'",
                        tree.name(missing),
                        tree.name(record)
                    ),
                    line,
                )
                .with_expected(tree.name(missing)));
            }
            start = tier.end;
        }
        frame.position = start;
        Ok(Placement::Exhausted)
    }

    /// Close the innermost frame, completing one repetition of its group.
    fn pop_frame(&mut self) {
        if let Some(frame) = self.stack.pop() {
            debug!(group = %self.tree.path(frame.group), "closing group");
            if let Some(parent) = self.stack.last_mut() {
                parent.counts[frame.slot] = parent.counts[frame.slot].saturating_add(1);
            }
        }
    }

    fn close(&mut self) -> CoreResult<Summary> {
        let tree = self.tree;
        let line = self.last_line.unwrap_or(STREAM_START_LINE);

        while let Some(frame) = self.stack.last() {
            let is_root = self.stack.len() == 1;
            if !is_root || self.pass_open {
                let children = tree.children(frame.group);
                if let Some(k) = (0..children.len())
                    .find(|&k| !tree.bounds(children[k]).is_satisfied_by(frame.counts[k]))
                {
                    return Err(missing_at_end(tree, children[k], line));
                }
            }
            if is_root {
                break;
            }
            self.pop_frame();
        }

        let root = tree.root();
        let passes = self.passes.saturating_add(u32::from(self.pass_open));
        if !tree.bounds(root).is_satisfied_by(passes) {
            return Err(missing_at_end(tree, root, line));
        }
        Ok(Summary {
            records: self.records,
            passes,
            last_line: line,
        })
    }
}

fn missing_at_end(tree: &ParserTree, node: NodeId, line: usize) -> Diagnostic {
    let missing = first_required(tree, node);
    Diagnostic::unexpected(
        format!("expected '{}' before end of input", tree.name(missing)),
        line,
    )
    .with_expected(tree.name(missing))
}

/// The record that would have to appear first for `node` to occur, or the
/// deepest group with no required content.
fn first_required(tree: &ParserTree, node: NodeId) -> NodeId {
    tree.children(node)
        .iter()
        .copied()
        .find(|&child| tree.bounds(child).min > 0)
        .map_or(node, |child| first_required(tree, child))
}

/// Children sharing the order of `children[start]`.
fn tier_at(tree: &ParserTree, children: &[NodeId], start: usize) -> Range<usize> {
    let order = tree.node(children[start]).order;
    let len = children[start..]
        .iter()
        .take_while(|&&c| tree.node(c).order == order)
        .count();
    start..start + len
}

/// Pick the child of a tier that takes `fields`: criteria-bearing records and
/// groups in declared order, then the unconditional record. The unconditional
/// record is only eligible when no criteria-bearing sibling matches `fields`.
fn select_in_tier<S, F>(
    tree: &ParserTree,
    children: &[NodeId],
    tier: Range<usize>,
    count: F,
    fields: &[S],
) -> Option<usize>
where
    S: AsRef<str>,
    F: Fn(usize) -> u32,
{
    let mut unconditional = None;
    for k in tier {
        let child = children[k];
        let node = tree.node(child);
        if node.bounds.is_exhausted_by(count(k)) {
            continue;
        }
        match &node.kind {
            NodeKind::Record { criteria } if criteria.is_empty() => {
                if unconditional.is_none() && !stricter_sibling(tree, children, k, fields) {
                    unconditional = Some(k);
                }
            }
            NodeKind::Record { criteria } => {
                if all_match(criteria, fields) {
                    return Some(k);
                }
            }
            NodeKind::Group { .. } => {
                if starts(tree, child, fields) {
                    return Some(k);
                }
            }
        }
    }
    unconditional
}

/// Whether a fresh occurrence of `node` can begin with `fields`.
///
/// For a record this is its criteria. For a group, tiers are walked from the
/// first; the first tier holding a required child ends the search.
pub fn can_start<S: AsRef<str>>(tree: &ParserTree, node: NodeId, fields: &[S]) -> bool {
    starts(tree, node, fields)
}

fn starts<S: AsRef<str>>(tree: &ParserTree, node: NodeId, fields: &[S]) -> bool {
    match &tree.node(node).kind {
        NodeKind::Record { criteria } => all_match(criteria, fields),
        NodeKind::Group { children } => {
            let mut start = 0;
            while start < children.len() {
                let tier = tier_at(tree, children, start);
                if select_in_tier(tree, children, tier.clone(), |_| 0, fields).is_some() {
                    return true;
                }
                if tier.clone().any(|k| tree.bounds(children[k]).min > 0) {
                    return false;
                }
                start = tier.end;
            }
            false
        }
    }
}

/// Whether a sibling of `children[skip]` takes `fields` through its criteria.
fn stricter_sibling<S: AsRef<str>>(
    tree: &ParserTree,
    children: &[NodeId],
    skip: usize,
    fields: &[S],
) -> bool {
    children
        .iter()
        .enumerate()
        .any(|(k, &child)| k != skip && starts_strictly(tree, child, fields))
}

/// Like [`starts`], ignoring unconditional records.
fn starts_strictly<S: AsRef<str>>(tree: &ParserTree, node: NodeId, fields: &[S]) -> bool {
    match &tree.node(node).kind {
        NodeKind::Record { criteria } => !criteria.is_empty() && all_match(criteria, fields),
        NodeKind::Group { children } => {
            let mut start = 0;
            while start < children.len() {
                let tier = tier_at(tree, children, start);
                if tier
                    .clone()
                    .any(|k| starts_strictly(tree, children[k], fields))
                {
                    return true;
                }
                if tier.clone().any(|k| tree.bounds(children[k]).min > 0) {
                    return false;
                }
                start = tier.end;
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::Criterion;
    use crate::tree::{Bounds, NodeSpec, TreeBuilder};

    fn candidate(tree: &ParserTree, line: usize, fields: &[&str]) -> RecordCandidate {
        let fields: Vec<String> = fields.iter().map(|s| s.to_string()).collect();
        let text = fields.join(",");
        RecordCandidate::identify(tree, fields, text, line)
    }

    /// `file -> a[1..1], b[0..*], c[1..1]`
    fn flat() -> ParserTree {
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        for (name, bounds) in [
            ("a", Bounds::exactly(1)),
            ("b", Bounds::at_least(0)),
            ("c", Bounds::exactly(1)),
        ] {
            b.record(
                root,
                NodeSpec::new(name).bounds(bounds),
                vec![Criterion::literal(0, name.to_uppercase())],
            )
            .unwrap();
        }
        b.build().unwrap()
    }

    #[test]
    fn test_accepts_in_order() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        for (line, tag) in ["A", "B", "B", "C"].iter().enumerate() {
            let accepted = seq.accept(candidate(&tree, line + 1, &[tag])).unwrap();
            assert_eq!(accepted.line, line + 1);
        }
        let summary = seq.finish().unwrap();
        assert_eq!(summary.records, 4);
        assert_eq!(summary.passes, 1);
        assert_eq!(summary.last_line, 4);
    }

    #[test]
    fn test_optional_node_skipped() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["A"])).unwrap();
        seq.accept(candidate(&tree, 2, &["C"])).unwrap();
        assert!(seq.finish().is_ok());
    }

    #[test]
    fn test_skipping_required_node() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        let err = seq.accept(candidate(&tree, 1, &["C"])).unwrap_err();
        assert!(err.is_unexpected());
        assert_eq!(err.line, 1);
        assert_eq!(err.expected.as_deref(), Some("a"));
        assert_eq!(err.record_name.as_deref(), Some("c"));
        assert_eq!(err.text.as_deref(), Some("C"));
    }

    #[test]
    fn test_out_of_order() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["A"])).unwrap();
        seq.accept(candidate(&tree, 2, &["C"])).unwrap();
        let err = seq.accept(candidate(&tree, 3, &["B"])).unwrap_err();
        assert!(err.is_unexpected());
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_unidentified_is_independent_of_position() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        let err = seq.accept(candidate(&tree, 1, &["Z"])).unwrap_err();
        assert!(err.is_unidentified());
        assert_eq!(err.line, 1);
        assert_eq!(err.record_name, None);
    }

    #[test]
    fn test_failure_is_sticky() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        let first = seq.accept(candidate(&tree, 1, &["C"])).unwrap_err();
        assert!(seq.is_failed());
        let again = seq.accept(candidate(&tree, 2, &["A"])).unwrap_err();
        assert_eq!(first, again);
        assert_eq!(seq.finish().unwrap_err(), first);
    }

    #[test]
    fn test_record_after_finish() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["A"])).unwrap();
        seq.accept(candidate(&tree, 2, &["C"])).unwrap();
        let summary = seq.finish().unwrap();
        assert!(seq.is_finished());
        assert_eq!(seq.finish().unwrap(), summary);
        let err = seq.accept(candidate(&tree, 3, &["A"])).unwrap_err();
        assert!(err.is_unexpected());
        assert_eq!(err.line, 3);
    }

    #[test]
    fn test_empty_stream_allowed_by_default() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        let summary = seq.finish().unwrap();
        assert_eq!(summary.records, 0);
        assert_eq!(summary.passes, 0);
        assert_eq!(summary.last_line, STREAM_START_LINE);
    }

    #[test]
    fn test_empty_stream_with_required_content() {
        let mut b = TreeBuilder::new("file").stream_bounds(Bounds::exactly(1));
        let root = b.root();
        b.record(
            root,
            NodeSpec::new("header").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "H")],
        )
        .unwrap();
        let tree = b.build().unwrap();
        let err = Sequencer::new(&tree).finish().unwrap_err();
        assert!(err.is_unexpected());
        assert_eq!(err.line, STREAM_START_LINE);
        assert_eq!(err.expected.as_deref(), Some("header"));
    }

    #[test]
    fn test_repeated_stream_passes() {
        let mut b = TreeBuilder::new("file").stream_bounds(Bounds::between(1, 2));
        let root = b.root();
        b.record(
            root,
            NodeSpec::new("header").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "H")],
        )
        .unwrap();
        let tree = b.build().unwrap();

        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["H"])).unwrap();
        seq.accept(candidate(&tree, 2, &["H"])).unwrap();
        let err = seq.accept(candidate(&tree, 3, &["H"])).unwrap_err();
        assert_eq!(err.line, 3);

        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["H"])).unwrap();
        seq.accept(candidate(&tree, 2, &["H"])).unwrap();
        assert_eq!(seq.finish().unwrap().passes, 2);
    }

    #[test]
    fn test_ordered_alternatives() {
        // file -> header, (credit | debit)*, trailer
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        b.record(
            root,
            NodeSpec::new("header").bounds(Bounds::exactly(1)).order(1),
            vec![Criterion::literal(0, "H")],
        )
        .unwrap();
        let credit = b
            .record(root, NodeSpec::new("credit").order(2), vec![Criterion::literal(0, "C")])
            .unwrap();
        let debit = b
            .record(root, NodeSpec::new("debit").order(2), vec![Criterion::literal(0, "D")])
            .unwrap();
        b.record(
            root,
            NodeSpec::new("trailer").bounds(Bounds::exactly(1)).order(3),
            vec![Criterion::literal(0, "T")],
        )
        .unwrap();
        let tree = b.build().unwrap();

        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["H"])).unwrap();
        assert_eq!(seq.accept(candidate(&tree, 2, &["D"])).unwrap().node, debit);
        assert_eq!(seq.accept(candidate(&tree, 3, &["C"])).unwrap().node, credit);
        assert_eq!(seq.accept(candidate(&tree, 4, &["D"])).unwrap().node, debit);
        seq.accept(candidate(&tree, 5, &["T"])).unwrap();
        assert!(seq.finish().is_ok());
    }

    #[test]
    fn test_fallback_record() {
        // file -> header, any*, trailer; `any` has no criteria
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        b.record(
            root,
            NodeSpec::new("header").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "H")],
        )
        .unwrap();
        let any = b.record(root, NodeSpec::new("any"), vec![]).unwrap();
        let trailer = b
            .record(
                root,
                NodeSpec::new("trailer").bounds(Bounds::exactly(1)),
                vec![Criterion::literal(0, "T")],
            )
            .unwrap();
        let tree = b.build().unwrap();

        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["H"])).unwrap();
        assert_eq!(seq.accept(candidate(&tree, 2, &["X"])).unwrap().node, any);
        assert_eq!(seq.accept(candidate(&tree, 3, &["Y"])).unwrap().node, any);
        assert_eq!(seq.accept(candidate(&tree, 4, &["T"])).unwrap().node, trailer);
        assert!(seq.finish().is_ok());
    }

    #[test]
    fn test_can_start_skips_optional_prefix() {
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        let g = b.group(root, NodeSpec::new("g")).unwrap();
        let opt = b
            .record(g, NodeSpec::new("opt").bounds(Bounds::optional()), vec![Criterion::literal(0, "O")])
            .unwrap();
        b.record(
            g,
            NodeSpec::new("req").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "R")],
        )
        .unwrap();
        b.record(g, NodeSpec::new("after"), vec![Criterion::literal(0, "A")])
            .unwrap();
        let tree = b.build().unwrap();

        assert!(can_start(&tree, g, &["O"]));
        assert!(can_start(&tree, g, &["R"]));
        assert!(!can_start(&tree, g, &["A"]));
        assert!(can_start(&tree, opt, &["O"]));
        assert!(!can_start(&tree, opt, &["R"]));
    }

    #[test]
    fn test_advance_steps() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        let step = seq.advance(Input::Record(candidate(&tree, 1, &["A"]))).unwrap();
        assert!(matches!(step, Step::Accepted(ref a) if tree.name(a.node) == "a"));
        seq.advance(Input::Record(candidate(&tree, 2, &["C"]))).unwrap();
        let step = seq.advance(Input::EndOfInput).unwrap();
        assert!(matches!(step, Step::Finished(Summary { records: 2, .. })));
    }

    #[test]
    fn test_reset() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["C"])).unwrap_err();
        seq.reset();
        assert!(!seq.is_failed());
        assert_eq!(seq.records(), 0);
        seq.accept(candidate(&tree, 1, &["A"])).unwrap();
        assert_eq!(seq.last_line(), Some(1));
    }

    #[test]
    fn test_open_groups() {
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        let g = b.group(root, NodeSpec::new("g")).unwrap();
        b.record(g, NodeSpec::new("r"), vec![Criterion::literal(0, "R")])
            .unwrap();
        let tree = b.build().unwrap();
        let mut seq = Sequencer::new(&tree);
        assert_eq!(seq.open_groups().collect::<Vec<_>>(), vec![root]);
        seq.accept(candidate(&tree, 1, &["R"])).unwrap();
        assert_eq!(seq.open_groups().collect::<Vec<_>>(), vec![root, g]);
    }

    #[test]
    fn test_fallback_record_ignores_other_groups() {
        // file -> a[header, any*, trailer], b[x*]
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        let a = b.group(root, NodeSpec::new("a").bounds(Bounds::exactly(1))).unwrap();
        b.record(
            a,
            NodeSpec::new("header").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "H")],
        )
        .unwrap();
        let any = b.record(a, NodeSpec::new("any"), vec![]).unwrap();
        let trailer = b
            .record(
                a,
                NodeSpec::new("trailer").bounds(Bounds::exactly(1)),
                vec![Criterion::literal(0, "T")],
            )
            .unwrap();
        let bgroup = b.group(root, NodeSpec::new("b")).unwrap();
        b.record(bgroup, NodeSpec::new("x"), vec![Criterion::literal(0, "X")])
            .unwrap();
        let tree = b.build().unwrap();

        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["H"])).unwrap();
        let accepted = seq.accept(candidate(&tree, 2, &["X"])).unwrap();
        assert_eq!(accepted.node, any);
        assert_eq!(tree.path(accepted.node), "a/any");
        assert_eq!(seq.accept(candidate(&tree, 3, &["T"])).unwrap().node, trailer);
        assert!(seq.finish().is_ok());
    }

    #[test]
    fn test_fallback_record_yields_to_sibling_group() {
        // file -> header, any*, batch[start, end]
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        b.record(
            root,
            NodeSpec::new("header").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "H")],
        )
        .unwrap();
        let any = b.record(root, NodeSpec::new("any"), vec![]).unwrap();
        let batch = b.group(root, NodeSpec::new("batch")).unwrap();
        let start = b
            .record(
                batch,
                NodeSpec::new("start").bounds(Bounds::exactly(1)),
                vec![Criterion::literal(0, "S")],
            )
            .unwrap();
        let tree = b.build().unwrap();

        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["H"])).unwrap();
        assert_eq!(seq.accept(candidate(&tree, 2, &["Q"])).unwrap().node, any);
        assert_eq!(seq.accept(candidate(&tree, 3, &["S"])).unwrap().node, start);
        assert!(can_start(&tree, batch, &["S"]));
        assert!(!can_start(&tree, batch, &["Q"]));
    }

    /// `file -> g[2..3]{r}, t`
    fn repeated_group() -> ParserTree {
        let mut b = TreeBuilder::new("file");
        let root = b.root();
        let g = b
            .group(root, NodeSpec::new("g").bounds(Bounds::between(2, 3)))
            .unwrap();
        b.record(
            g,
            NodeSpec::new("r").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "R")],
        )
        .unwrap();
        b.record(
            root,
            NodeSpec::new("t").bounds(Bounds::exactly(1)),
            vec![Criterion::literal(0, "T")],
        )
        .unwrap();
        b.build().unwrap()
    }

    #[test]
    fn test_group_repetitions_still_required() {
        let tree = repeated_group();
        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["R"])).unwrap();
        let err = seq.accept(candidate(&tree, 2, &["T"])).unwrap_err();
        assert!(err.is_unexpected());
        assert_eq!(err.line, 2);
        assert_eq!(err.expected.as_deref(), Some("r"));
        assert_eq!(err.record_name.as_deref(), Some("t"));
    }

    #[test]
    fn test_group_repetitions_missing_at_end() {
        let tree = repeated_group();
        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["R"])).unwrap();
        let err = seq.finish().unwrap_err();
        assert!(err.is_unexpected());
        assert_eq!(err.line, 1);
        assert_eq!(err.expected.as_deref(), Some("r"));
    }

    #[test]
    fn test_group_repetitions_satisfied() {
        let tree = repeated_group();
        let mut seq = Sequencer::new(&tree);
        for (line, tag) in ["R", "R", "R", "T"].iter().enumerate() {
            seq.accept(candidate(&tree, line + 1, &[tag])).unwrap();
        }
        assert_eq!(seq.finish().unwrap().records, 4);

        let mut seq = Sequencer::new(&tree);
        for (line, tag) in ["R", "R", "R"].iter().enumerate() {
            seq.accept(candidate(&tree, line + 1, &[tag])).unwrap();
        }
        let err = seq.accept(candidate(&tree, 4, &["R"])).unwrap_err();
        assert_eq!(err.line, 4);
    }

    #[test]
    fn test_occurrence_count_saturates() {
        let tree = flat();
        let mut seq = Sequencer::new(&tree);
        seq.accept(candidate(&tree, 1, &["A"])).unwrap();
        seq.accept(candidate(&tree, 2, &["B"])).unwrap();
        seq.stack[0].counts[1] = u32::MAX - 1;
        seq.accept(candidate(&tree, 3, &["B"])).unwrap();
        seq.accept(candidate(&tree, 4, &["B"])).unwrap();
        assert_eq!(seq.stack[0].counts[1], u32::MAX);
        seq.accept(candidate(&tree, 5, &["C"])).unwrap();
        assert_eq!(seq.finish().unwrap().records, 5);
    }
}
