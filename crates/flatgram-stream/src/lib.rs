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

//! Record Streams for Flatgram
//!
//! This crate turns flat files into records and records into a validated
//! sequence. Tokenizers split physical lines into [`RawRecord`]s, and
//! [`GrammarReader`] identifies and sequences them one at a time against a
//! [`ParserTree`](flatgram_core::ParserTree), so memory use does not grow with
//! the input.
//!
//! # Features
//!
//! - **Tokenizers**: CSV (quoted, multiline), delimited (escape and line
//!   continuation) and fixed-length records
//! - **Iterator-based**: every reader is an `Iterator` of `StreamResult`s
//! - **Accurate positions**: records report the line they start on, even when
//!   they span several physical lines
//! - **Writers**: matching CSV, delimited and fixed-length writers
//! - **Timeout Protection**: bound the wall-clock time spent on untrusted input
//!
//! # Validating a File
//!
//! ```rust,no_run
//! use flatgram_stream::{validate, CsvReader, CsvReaderConfig};
//! use flatgram_test::batch_tree;
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! let tree = batch_tree();
//! let file = BufReader::new(File::open("batches.csv").unwrap());
//! let reader = CsvReader::new(file, CsvReaderConfig::default()).unwrap();
//!
//! match validate(&tree, reader) {
//!     Ok(summary) => println!("{} records", summary.records),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```
//!
//! # Processing Records as They Arrive
//!
//! ```rust
//! use flatgram_stream::{DelimitedReader, DelimitedReaderConfig, GrammarReader};
//! use flatgram_test::batch_tree;
//!
//! let tree = batch_tree();
//! let source =
//!     DelimitedReader::new("H\t1\nD\tx\nT\t1\n".as_bytes(), DelimitedReaderConfig::default())
//!         .unwrap();
//!
//! for accepted in GrammarReader::new(&tree, source) {
//!     let accepted = accepted.unwrap();
//!     println!("{} at line {}", tree.path(accepted.node), accepted.line);
//! }
//! ```
//!
//! # Timeout Protection for Untrusted Input
//!
//! ```rust
//! use flatgram_stream::{validate_reader, Format, ReaderConfig};
//! use flatgram_test::batch_tree;
//! use std::time::Duration;
//!
//! let config = ReaderConfig {
//!     timeout: Some(Duration::from_secs(10)),
//!     ..Default::default()
//! };
//!
//! let tree = batch_tree();
//! let summary =
//!     validate_reader(&tree, "H,1\nT,0\n".as_bytes(), &Format::default(), &config).unwrap();
//! assert_eq!(summary.records, 2);
//! ```

mod config;
mod csv;
mod delimited;
mod driver;
mod error;
mod fixed;
mod reader;
mod source;
mod writer;

pub use config::{
    CsvReaderConfig, CsvWriterConfig, DelimitedReaderConfig, DelimitedWriterConfig,
    FixedLengthReaderConfig, FixedLengthWriterConfig, ReaderConfig,
};
pub use csv::CsvReader;
pub use delimited::DelimitedReader;
pub use driver::{validate, validate_reader, validate_with_config, GrammarReader};
pub use error::{StreamError, StreamResult};
pub use fixed::FixedLengthReader;
pub use reader::{Line, LineReader};
pub use source::{Format, MemorySource, RawRecord, RecordSource};
pub use writer::{CsvWriter, DelimitedWriter, FixedLengthWriter, RecordWriter};

/// Re-export core types for convenience.
pub use flatgram_core::{Accepted, Diagnostic, DiagnosticKind, Summary};
