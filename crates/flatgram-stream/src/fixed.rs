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

//! Fixed-length tokenizer.
//!
//! Each logical line is one record with a single field holding the whole
//! line. Identification criteria address positions inside it with
//! [`FieldRef::Span`](flatgram_core::FieldRef).

use crate::config::FixedLengthReaderConfig;
use crate::delimited::read_logical_line;
use crate::error::StreamResult;
use crate::reader::LineReader;
use crate::source::{RawRecord, RecordSource};
use std::io::Read;

/// Reads fixed-length records.
///
/// # Examples
///
/// ```rust
/// use flatgram_stream::{FixedLengthReader, FixedLengthReaderConfig, RecordSource};
///
/// let mut reader =
///     FixedLengthReader::new("1ACME  \n9000001\n".as_bytes(), FixedLengthReaderConfig::default())
///         .unwrap();
/// assert_eq!(reader.next_record().unwrap().unwrap().fields, vec!["1ACME  "]);
/// assert_eq!(reader.next_record().unwrap().unwrap().line, 2);
/// assert!(reader.next_record().unwrap().is_none());
/// ```
pub struct FixedLengthReader<R: Read> {
    lines: LineReader<R>,
    config: FixedLengthReaderConfig,
}

impl<R: Read> FixedLengthReader<R> {
    pub fn new(reader: R, config: FixedLengthReaderConfig) -> StreamResult<Self> {
        Self::from_lines(LineReader::new(reader), config)
    }

    pub fn from_lines(lines: LineReader<R>, config: FixedLengthReaderConfig) -> StreamResult<Self> {
        config.validate()?;
        Ok(Self { lines, config })
    }

    pub fn config(&self) -> &FixedLengthReaderConfig {
        &self.config
    }
}

impl<R: Read> RecordSource for FixedLengthReader<R> {
    fn next_record(&mut self) -> StreamResult<Option<RawRecord>> {
        let joined = read_logical_line(
            &mut self.lines,
            self.config.line_continuation,
            None,
            self.config.comment.as_deref(),
        )?;
        Ok(joined.map(|(text, logical, line)| RawRecord {
            fields: vec![logical],
            text,
            line,
        }))
    }
}

impl<R: Read> Iterator for FixedLengthReader<R> {
    type Item = StreamResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
