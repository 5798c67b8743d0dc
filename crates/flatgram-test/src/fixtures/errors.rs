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

//! Grammar definitions that must be rejected.

/// Invalid grammar documents (YAML) for loader error testing.
///
/// Each tuple contains (name, yaml_text).
pub fn invalid_grammar_samples() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            "duplicate_sibling",
            "name: f\nchildren:\n  - {type: record, name: a, identify: [{field: 0, literal: A}]}\n  - {type: record, name: a, identify: [{field: 0, literal: B}]}\n",
        ),
        (
            "min_exceeds_max",
            "name: f\nchildren:\n  - {type: group, name: g, min_occurs: 3, max_occurs: 2}\n",
        ),
        (
            "zero_max",
            "name: f\nchildren:\n  - {type: group, name: g, max_occurs: 0}\n",
        ),
        (
            "two_fallbacks",
            "name: f\nchildren:\n  - {type: record, name: a}\n  - {type: record, name: b}\n",
        ),
        (
            "bad_pattern",
            "name: f\nchildren:\n  - {type: record, name: a, identify: [{field: 0, pattern: \"([\"}]}\n",
        ),
        (
            "criterion_without_test",
            "name: f\nchildren:\n  - {type: record, name: a, identify: [{field: 0}]}\n",
        ),
        (
            "empty_name",
            "name: f\nchildren:\n  - {type: record, name: \"\", identify: [{field: 0, literal: A}]}\n",
        ),
    ]
}

/// Grammar documents that do not deserialize at all.
pub fn malformed_grammar_samples() -> Vec<(&'static str, &'static str)> {
    vec![
        ("unknown_node_type", "name: f\nchildren:\n  - {type: segment, name: a}\n"),
        ("bad_max_word", "name: f\nmax_occurs: lots\n"),
        ("missing_name", "children: []\n"),
    ]
}
