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

//! Quick Start Example
//!
//! This example demonstrates the core functionality of Flatgram:
//! 1. Loading a grammar from YAML
//! 2. Validating a CSV file against it
//! 3. Reading a structural diagnostic
//!
//! Run with: cargo run --example quick_start --features serde

use flatgram::{accept_all, grammar_from_yaml, validate_str, Format};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Flatgram Quick Start Example ===\n");

    // 1. A batch file: up to three batches of header, details, trailer
    let grammar = r#"
name: file
min_occurs: 1
children:
  - type: group
    name: batch
    min_occurs: 1
    max_occurs: 3
    children:
      - type: record
        name: header
        min_occurs: 1
        max_occurs: 1
        identify:
          - field: 0
            literal: H
      - type: record
        name: detail
        max_occurs: unbounded
        identify:
          - field: 0
            literal: D
      - type: record
        name: trailer
        min_occurs: 1
        max_occurs: 1
        identify:
          - field: 0
            literal: T
"#;
    let tree = grammar_from_yaml(grammar)?;
    println!("✓ Grammar loaded: {} record types", tree.records().len());
    println!();

    // 2. A well-formed file
    println!("--- Validation ---");
    let input = "H,2025-01-01\nD,100\nD,\"multi\nline\"\nT,2\n";
    for record in accept_all(&tree, input, &Format::default())? {
        println!("  line {}: {}", record.line, tree.path(record.node));
    }
    let summary = validate_str(&tree, input, &Format::default())?;
    println!("✓ {} records, last line {}", summary.records, summary.last_line);
    println!();

    // 3. A file missing its trailer
    println!("--- Diagnostics ---");
    match validate_str(&tree, "H,2025-01-01\nD,100\n", &Format::default()) {
        Ok(_) => println!("unexpectedly valid"),
        Err(e) => println!("✗ {}", e),
    }

    Ok(())
}
