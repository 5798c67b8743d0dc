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

//! Tests for the flatgram facade crate.

use flatgram::{
    accept_all, validate_reader, validate_str, CsvReaderConfig, DiagnosticKind,
    FixedLengthReaderConfig, Format, StreamError, STREAM_START_LINE, VERSION,
};
use flatgram_test::{
    batch_tree, invalid_batch_inputs, ordered_choice_tree, valid_batch_inputs, BATCH_CSV,
};

fn text(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

#[test]
fn test_version() {
    assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_core_and_stream_modules() {
    let tree = flatgram::core::TreeBuilder::new("f").build().unwrap();
    let reader = flatgram::stream::CsvReader::new("".as_bytes(), CsvReaderConfig::default()).unwrap();
    assert_eq!(flatgram::stream::validate(&tree, reader).unwrap().records, 0);
}

#[test]
fn test_valid_inputs() {
    let tree = batch_tree();
    for (name, lines) in valid_batch_inputs() {
        assert!(
            validate_str(&tree, &text(lines), &Format::default()).is_ok(),
            "{} should be valid",
            name
        );
    }
}

#[test]
fn test_invalid_inputs() {
    let tree = batch_tree();
    for rejection in invalid_batch_inputs() {
        let err = validate_str(&tree, &text(rejection.lines), &Format::default()).unwrap_err();
        let diagnostic = err.diagnostic().unwrap();
        assert_eq!(diagnostic.kind, rejection.kind, "{}", rejection.name);
        assert_eq!(diagnostic.line, rejection.line, "{}", rejection.name);
    }
}

#[test]
fn test_empty_input_line() {
    let err = validate_str(&batch_tree(), "", &Format::default()).unwrap_err();
    assert_eq!(err.line(), Some(STREAM_START_LINE));
}

#[test]
fn test_ordered_choice() {
    let tree = ordered_choice_tree();
    let accepted = accept_all(&tree, "H\nC\nD\nC\nT\n", &Format::default()).unwrap();
    let names: Vec<_> = accepted.iter().map(|a| tree.name(a.node)).collect();
    assert_eq!(names, vec!["header", "credit", "debit", "credit", "trailer"]);
}

#[test]
fn test_validate_reader_io() {
    let summary = validate_reader(&batch_tree(), std::io::Cursor::new(BATCH_CSV), &Format::default())
        .unwrap();
    assert_eq!(summary.last_line, 4);
}

#[test]
fn test_wrong_format_is_unidentified() {
    let format = Format::FixedLength(FixedLengthReaderConfig::default());
    let err = validate_str(&batch_tree(), BATCH_CSV, &format).unwrap_err();
    assert_eq!(err.diagnostic().map(|d| d.kind), Some(DiagnosticKind::UnidentifiedRecord));
    assert_eq!(err.line(), Some(1));
}

#[test]
fn test_malformed_passes_through() {
    let err = validate_str(&batch_tree(), "H,\"1\n", &Format::default()).unwrap_err();
    assert!(matches!(err, StreamError::Malformed { line: 1, .. }));
}
