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

//! Record streams for the canonical grammars.
//!
//! Lines are comma-separated; the first field is the record type code.

use flatgram_core::DiagnosticKind;

/// Type alias for named record streams.
pub type InputList = Vec<(&'static str, &'static [&'static str])>;

/// An input the batch grammar must reject, and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    pub name: &'static str,
    pub lines: &'static [&'static str],
    pub kind: DiagnosticKind,
    pub line: usize,
    /// The unmet node, when the violation names one.
    pub expected: Option<&'static str>,
}

/// Streams the batch grammar accepts.
pub fn valid_batch_inputs() -> InputList {
    vec![
        ("header_trailer", &["H,1", "T,0"]),
        ("with_details", &["H,1", "D,100", "D,250", "T,2"]),
        (
            "three_batches",
            &["H,1", "T,0", "H,2", "D,5", "T,1", "H,3", "D,7", "D,8", "T,2"],
        ),
    ]
}

/// Streams the batch grammar rejects.
pub fn invalid_batch_inputs() -> Vec<Rejection> {
    use DiagnosticKind::*;
    vec![
        Rejection {
            name: "missing_trailer",
            lines: &["H,1"],
            kind: UnexpectedRecord,
            line: 1,
            expected: Some("trailer"),
        },
        Rejection {
            name: "missing_header",
            lines: &["D,5"],
            kind: UnexpectedRecord,
            line: 1,
            expected: Some("header"),
        },
        Rejection {
            name: "repeated_header",
            lines: &["H,1", "H,2", "T,0"],
            kind: UnexpectedRecord,
            line: 2,
            expected: Some("trailer"),
        },
        Rejection {
            name: "unknown_record",
            lines: &["H,1", "D,1", "D,2", "T,2", "H,2", "D,3", "D,4", "X,9"],
            kind: UnidentifiedRecord,
            line: 8,
            expected: None,
        },
        Rejection {
            name: "too_many_batches",
            lines: &["H,1", "T,0", "H,2", "T,0", "H,3", "T,0", "H,4", "T,0"],
            kind: UnexpectedRecord,
            line: 7,
            expected: None,
        },
        Rejection {
            name: "detail_after_trailer",
            lines: &["H,1", "T,0", "D,1"],
            kind: UnexpectedRecord,
            line: 3,
            expected: None,
        },
        Rejection {
            name: "empty",
            lines: &[],
            kind: UnexpectedRecord,
            line: flatgram_core::STREAM_START_LINE,
            expected: Some("header"),
        },
    ]
}

/// The `with_details` stream as CSV text.
pub const BATCH_CSV: &str = "H,1\nD,100\nD,250\nT,2\n";

/// A CSV stream whose detail spans two physical lines; the trailer is on line 5.
pub const MULTILINE_BATCH_CSV: &str = "H,1\nD,\"first\nsecond\"\nD,3\nT,2\n";

/// The `with_details` stream as tab-delimited text.
pub const BATCH_TSV: &str = "H\t1\nD\t100\nD\t250\nT\t2\n";

/// Fixed-length payments for the fixed grammar.
pub const PAYMENTS_FIXED: &str = "1ACME      20250101\n6000001500JOHN DOE  \n6000000250JANE ROE  \n9000002\n";
