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
//! Time-limited validation of a large record stream

use flatgram_stream::{validate_reader, Format, GrammarReader, ReaderConfig, StreamError};
use flatgram_test::batch_tree;
use std::time::Duration;

fn large_batch(details: usize) -> String {
    let mut input = String::from("H,1\n");
    for i in 0..details {
        input.push_str(&format!("D,{}\n", i));
    }
    input.push_str(&format!("T,{}\n", details));
    input
}

fn main() {
    let tree = batch_tree();
    let format = Format::default();

    println!("Example 1: no timeout");
    match validate_reader(&tree, large_batch(1_000).as_bytes(), &format, &ReaderConfig::default()) {
        Ok(summary) => println!("  ✓ {} records\n", summary.records),
        Err(e) => println!("  ✗ {}\n", e),
    }

    println!("Example 2: generous timeout (10s)");
    let config = ReaderConfig {
        timeout: Some(Duration::from_secs(10)),
        ..Default::default()
    };
    match validate_reader(&tree, large_batch(1_000).as_bytes(), &format, &config) {
        Ok(summary) => println!("  ✓ {} records within the limit\n", summary.records),
        Err(e) => println!("  ✗ {}\n", e),
    }

    println!("Example 3: 500,000 records with a 1ms timeout");
    let input = large_batch(500_000);
    let config = ReaderConfig {
        timeout: Some(Duration::from_millis(1)),
        ..Default::default()
    };
    let source = match format.open(input.as_bytes(), &config) {
        Ok(source) => source,
        Err(e) => {
            println!("  ✗ {}", e);
            return;
        }
    };
    let mut reader = GrammarReader::with_config(&tree, source, &config);
    let mut accepted = 0;
    for result in reader.by_ref() {
        match result {
            Ok(_) => accepted += 1,
            Err(StreamError::Timeout { elapsed, limit }) => {
                println!("  ⚠ timed out after {:?} (limit {:?})", elapsed, limit);
                println!("    records accepted before the timeout: {}", accepted);
                return;
            }
            Err(e) => {
                println!("  ✗ {}", e);
                return;
            }
        }
    }
    match reader.finish() {
        Ok(summary) => println!("  ✓ finished all {} records in time", summary.records),
        Err(e) => println!("  ✗ {}", e),
    }
}
