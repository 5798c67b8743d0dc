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

//! Drive a sequencer over in-memory records.

use flatgram_core::{CoreResult, ParserTree, RecordCandidate, Sequencer};

/// Identify comma-separated lines, numbering them from 1.
pub fn candidates(tree: &ParserTree, lines: &[&str]) -> Vec<RecordCandidate> {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let fields = line.split(',').map(str::to_string).collect();
            RecordCandidate::identify(tree, fields, line.to_string(), i + 1)
        })
        .collect()
}

/// Feed every candidate and finish. Returns the paths of accepted nodes.
pub fn run<I>(tree: &ParserTree, candidates: I) -> CoreResult<Vec<String>>
where
    I: IntoIterator<Item = RecordCandidate>,
{
    let mut session = Sequencer::new(tree);
    let mut paths = Vec::new();
    for candidate in candidates {
        let accepted = session.accept(candidate)?;
        paths.push(tree.path(accepted.node));
    }
    session.finish()?;
    Ok(paths)
}

/// [`run`] over comma-separated lines.
pub fn run_lines(tree: &ParserTree, lines: &[&str]) -> CoreResult<Vec<String>> {
    run(tree, candidates(tree, lines))
}
