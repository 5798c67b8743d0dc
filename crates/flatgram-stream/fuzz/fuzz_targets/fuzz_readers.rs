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
#![no_main]

//! Fuzz target for the record tokenizers and the validating driver.
//!
//! Arbitrary bytes are read as CSV (single- and multi-line), delimited and
//! fixed-length input, with a short line limit, and every record stream is
//! validated against a small grammar. Errors are expected; panics are bugs.
//!
//! ```bash
//! cd crates/flatgram-stream
//! cargo fuzz run fuzz_readers -- -max_len=4096
//! ```

use flatgram_core::{Bounds, Criterion, NodeSpec, ParserTree, TreeBuilder};
use flatgram_stream::{
    validate_reader, CsvReaderConfig, DelimitedReaderConfig, FixedLengthReaderConfig, Format,
    ReaderConfig,
};
use libfuzzer_sys::fuzz_target;

fn tree() -> Option<ParserTree> {
    let mut b = TreeBuilder::new("file");
    let root = b.root();
    b.record(
        root,
        NodeSpec::new("header").bounds(Bounds::optional()),
        vec![Criterion::literal(0, "H")],
    )
    .ok()?;
    b.record(root, NodeSpec::new("body"), vec![]).ok()?;
    b.record(
        root,
        NodeSpec::new("trailer").bounds(Bounds::optional()),
        vec![Criterion::span(0, 1, "T")],
    )
    .ok()?;
    b.build().ok()
}

fuzz_target!(|data: &[u8]| {
    let Some(tree) = tree() else { return };
    let reader = ReaderConfig {
        max_line_length: 256,
        ..Default::default()
    };
    let formats = [
        Format::Csv(CsvReaderConfig::default()),
        Format::Csv(CsvReaderConfig {
            multiline: true,
            comment: Some("#".into()),
            ..Default::default()
        }),
        Format::Delimited(DelimitedReaderConfig {
            escape: Some('\\'),
            line_continuation: Some('\\'),
            ..Default::default()
        }),
        Format::FixedLength(FixedLengthReaderConfig::default()),
    ];
    for format in &formats {
        let _ = validate_reader(&tree, data, format, &reader);
    }
});
