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

//! Record identification.
//!
//! Candidates are tried in the order given. The first one whose criteria all
//! match wins. A record without criteria only applies when no other
//! candidate matched.

use crate::criteria::all_match;
use crate::tree::{NodeId, NodeKind, ParserTree};

/// Identify `fields` among `candidates`. Group ids are skipped.
pub fn identify<S, I>(tree: &ParserTree, fields: &[S], candidates: I) -> Option<NodeId>
where
    S: AsRef<str>,
    I: IntoIterator<Item = NodeId>,
{
    let mut fallback = None;
    for id in candidates {
        if let NodeKind::Record { criteria } = &tree.node(id).kind {
            if criteria.is_empty() {
                fallback = fallback.or(Some(id));
            } else if all_match(criteria, fields) {
                return Some(id);
            }
        }
    }
    fallback
}

impl ParserTree {
    /// Identify a raw record against every record type in the grammar.
    ///
    /// This answers "is this a known record type at all"; whether it may
    /// occur at the current position is the sequencer's concern.
    pub fn identify<S: AsRef<str>>(&self, fields: &[S]) -> Option<NodeId> {
        identify(self, fields, self.records().iter().copied())
    }
}
