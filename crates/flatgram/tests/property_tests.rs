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
//! Property-based tests across tokenizers and the sequencing engine.

use flatgram::{validate_str, DelimitedReaderConfig, Format, StreamError};
use flatgram_test::batch_tree;
use proptest::prelude::*;

/// Lines of a well-formed batch file with the given detail counts.
fn batch_lines(details: &[usize]) -> Vec<String> {
    let mut lines = Vec::new();
    for (b, &count) in details.iter().enumerate() {
        lines.push(format!("H,{b}"));
        lines.extend((0..count).map(|d| format!("D,{d}")));
        lines.push(format!("T,{count}"));
    }
    lines
}

fn join(lines: &[String], delimiter: char) -> String {
    lines
        .iter()
        .map(|l| format!("{}\n", l.replace(',', &delimiter.to_string())))
        .collect()
}

proptest! {
    #[test]
    fn prop_wellformed_batches_validate(details in prop::collection::vec(0usize..20, 1..=3)) {
        let tree = batch_tree();
        let lines = batch_lines(&details);

        let csv = validate_str(&tree, &join(&lines, ','), &Format::default()).unwrap();
        prop_assert_eq!(csv.records as usize, lines.len());
        prop_assert_eq!(csv.last_line, lines.len());

        let tsv = Format::Delimited(DelimitedReaderConfig::default());
        let delimited = validate_str(&tree, &join(&lines, '\t'), &tsv).unwrap();
        prop_assert_eq!(delimited, csv);
    }

    #[test]
    fn prop_missing_trailer_reported_at_last_line(details in prop::collection::vec(0usize..20, 1..=3)) {
        let tree = batch_tree();
        let mut lines = batch_lines(&details);
        lines.pop();

        match validate_str(&tree, &join(&lines, ','), &Format::default()) {
            Err(StreamError::Structure(d)) => {
                prop_assert!(d.is_unexpected());
                prop_assert_eq!(d.line, lines.len());
                prop_assert_eq!(d.expected.as_deref(), Some("trailer"));
            }
            other => prop_assert!(false, "expected structure error, got {:?}", other),
        }
    }

    #[test]
    fn prop_too_many_batches_rejected(extra in 0usize..5) {
        let tree = batch_tree();
        let lines = batch_lines(&[extra, 0, 1, extra]);
        let fourth_header = lines.iter().rposition(|l| l.starts_with('H')).unwrap() + 1;

        let err = validate_str(&tree, &join(&lines, ','), &Format::default()).unwrap_err();
        prop_assert_eq!(err.line(), Some(fourth_header));
    }
}
