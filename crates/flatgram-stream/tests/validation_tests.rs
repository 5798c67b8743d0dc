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

//! End-to-end validation of text streams.

use flatgram_core::{GrammarDef, STREAM_START_LINE};
use flatgram_stream::{
    validate, validate_reader, CsvReader, CsvReaderConfig, DelimitedReader,
    DelimitedReaderConfig, FixedLengthReader, FixedLengthReaderConfig, Format, GrammarReader,
    ReaderConfig, StreamError,
};
use flatgram_test::{
    batch_tree, invalid_batch_inputs, valid_batch_inputs, BATCH_CSV, BATCH_TSV,
    FIXED_GRAMMAR_YAML, MULTILINE_BATCH_CSV, PAYMENTS_FIXED,
};

fn to_text(lines: &[&str]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

fn csv_reader(text: &str) -> CsvReader<&[u8]> {
    CsvReader::new(text.as_bytes(), CsvReaderConfig::default()).unwrap()
}

#[test]
fn valid_inputs_pass_as_csv() {
    let tree = batch_tree();
    for (name, lines) in valid_batch_inputs() {
        let text = to_text(lines);
        let summary = validate(&tree, csv_reader(&text))
            .unwrap_or_else(|e| panic!("{} should validate: {}", name, e));
        assert_eq!(summary.records, lines.len() as u64, "{}", name);
        assert_eq!(summary.last_line, lines.len(), "{}", name);
    }
}

#[test]
fn invalid_inputs_fail_with_expected_diagnostic() {
    let tree = batch_tree();
    for rejection in invalid_batch_inputs() {
        let text = to_text(rejection.lines);
        let err = validate(&tree, csv_reader(&text)).unwrap_err();
        let diagnostic = err
            .diagnostic()
            .unwrap_or_else(|| panic!("{}: expected a diagnostic, got {}", rejection.name, err));
        assert_eq!(diagnostic.kind, rejection.kind, "{}", rejection.name);
        assert_eq!(diagnostic.line, rejection.line, "{}", rejection.name);
        assert_eq!(diagnostic.expected.as_deref(), rejection.expected, "{}", rejection.name);
    }
}

#[test]
fn empty_input_reports_stream_start() {
    let tree = batch_tree();
    let err = validate(&tree, csv_reader("")).unwrap_err();
    assert_eq!(err.line(), Some(STREAM_START_LINE));
}

#[test]
fn unidentified_record_carries_raw_text() {
    let tree = batch_tree();
    let err = validate(&tree, csv_reader("H,1\n\"X\",\"a,b\"\n")).unwrap_err();
    let diagnostic = err.diagnostic().unwrap();
    assert!(diagnostic.is_unidentified());
    assert_eq!(diagnostic.text.as_deref(), Some("\"X\",\"a,b\""));
}

#[test]
fn multiline_record_keeps_line_numbers_aligned() {
    let tree = batch_tree();
    let lines: Vec<_> = GrammarReader::new(&tree, csv_reader(MULTILINE_BATCH_CSV))
        .map(|r| r.unwrap().line)
        .collect();
    assert_eq!(lines, vec![1, 2, 4, 5]);
}

#[test]
fn multiline_record_error_points_past_continuation() {
    let tree = batch_tree();
    let text = "H,1\nD,\"a\nb\"\nX,1\n";
    let err = validate(&tree, csv_reader(text)).unwrap_err();
    assert_eq!(err.line(), Some(4));
}

#[test]
fn delimited_stream_validates() {
    let tree = batch_tree();
    let reader = DelimitedReader::new(BATCH_TSV.as_bytes(), DelimitedReaderConfig::default()).unwrap();
    assert_eq!(validate(&tree, reader).unwrap().records, 4);
}

#[test]
fn delimited_continuation_counts_lines() {
    let tree = batch_tree();
    let config = DelimitedReaderConfig {
        delimiter: ',',
        line_continuation: Some('\\'),
        ..Default::default()
    };
    let text = "H,1\nD,long\\\nvalue\nT,1\nD,late\n";
    let err = validate(&tree, DelimitedReader::new(text.as_bytes(), config).unwrap()).unwrap_err();
    assert_eq!(err.line(), Some(5));
}

#[test]
fn fixed_length_payments_validate() {
    let def: GrammarDef = serde_yaml::from_str(FIXED_GRAMMAR_YAML).unwrap();
    let tree = def.build().unwrap();
    let reader =
        FixedLengthReader::new(PAYMENTS_FIXED.as_bytes(), FixedLengthReaderConfig::default())
            .unwrap();

    let names: Vec<_> = GrammarReader::new(&tree, reader)
        .map(|r| tree.name(r.unwrap().node).to_string())
        .collect();
    assert_eq!(names, vec!["header", "payment", "payment", "control"]);
}

#[test]
fn fixed_length_missing_control() {
    let def: GrammarDef = serde_yaml::from_str(FIXED_GRAMMAR_YAML).unwrap();
    let tree = def.build().unwrap();
    let text = "1ACME      20250101\n6000001500JOHN DOE  \n";
    let err = validate_reader(
        &tree,
        text.as_bytes(),
        &Format::FixedLength(FixedLengthReaderConfig::default()),
        &ReaderConfig::default(),
    )
    .unwrap_err();
    let diagnostic = err.diagnostic().unwrap();
    assert_eq!(diagnostic.expected.as_deref(), Some("control"));
    assert_eq!(diagnostic.line, 2);
}

#[test]
fn line_too_long_is_reported() {
    let tree = batch_tree();
    let config = ReaderConfig {
        max_line_length: 8,
        ..Default::default()
    };
    let text = "H,1\nD,0123456789\nT,1\n";
    let err = validate_reader(&tree, text.as_bytes(), &Format::default(), &config).unwrap_err();
    assert!(matches!(err, StreamError::LineTooLong { line: 2, limit: 8 }));
}

#[test]
fn invalid_utf8_is_reported() {
    let tree = batch_tree();
    let bytes: &[u8] = b"H,1\nD,\xff\nT,1\n";
    let err = validate_reader(&tree, bytes, &Format::default(), &ReaderConfig::default())
        .unwrap_err();
    assert!(matches!(err, StreamError::Utf8 { line: 2, .. }));
}

#[test]
fn batch_csv_from_file() {
    use std::io::Write;

    let tree = batch_tree();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BATCH_CSV.as_bytes()).unwrap();

    let input = std::fs::File::open(file.path()).unwrap();
    let summary =
        validate_reader(&tree, input, &Format::default(), &ReaderConfig::default()).unwrap();
    assert_eq!(summary.records, 4);
}
