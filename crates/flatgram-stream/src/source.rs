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

//! The tokenizer contract.

use crate::config::{CsvReaderConfig, DelimitedReaderConfig, FixedLengthReaderConfig, ReaderConfig};
use crate::csv::CsvReader;
use crate::delimited::DelimitedReader;
use crate::error::StreamResult;
use crate::fixed::FixedLengthReader;
use crate::reader::LineReader;
use std::io::Read;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One logical record as split by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub fields: Vec<String>,
    /// Raw text of every physical line the record spans, without the final
    /// line terminator.
    pub text: String,
    /// 1-based line where the record starts.
    pub line: usize,
}

impl RawRecord {
    pub fn new(fields: Vec<String>, text: impl Into<String>, line: usize) -> Self {
        Self {
            fields,
            text: text.into(),
            line,
        }
    }
}

/// A source of raw records.
///
/// Line numbers are non-decreasing. A record spanning several physical lines
/// carries its first line; the next record's number accounts for all of them.
pub trait RecordSource {
    /// The next record, or `None` at end of input.
    fn next_record(&mut self) -> StreamResult<Option<RawRecord>>;
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn next_record(&mut self) -> StreamResult<Option<RawRecord>> {
        (**self).next_record()
    }
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    fn next_record(&mut self) -> StreamResult<Option<RawRecord>> {
        (**self).next_record()
    }
}

/// Records already in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: std::collections::VecDeque<RawRecord>,
}

impl MemorySource {
    pub fn new(records: impl IntoIterator<Item = RawRecord>) -> Self {
        Self {
            records: records.into_iter().collect(),
        }
    }
}

impl RecordSource for MemorySource {
    fn next_record(&mut self) -> StreamResult<Option<RawRecord>> {
        Ok(self.records.pop_front())
    }
}

/// Tokenizer selection, as written in a grammar file's `format` section.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "snake_case")
)]
pub enum Format {
    Csv(CsvReaderConfig),
    Delimited(DelimitedReaderConfig),
    FixedLength(FixedLengthReaderConfig),
}

impl Default for Format {
    fn default() -> Self {
        Format::Csv(CsvReaderConfig::default())
    }
}

impl Format {
    /// Short name: `csv`, `delimited` or `fixed_length`.
    pub fn name(&self) -> &'static str {
        match self {
            Format::Csv(_) => "csv",
            Format::Delimited(_) => "delimited",
            Format::FixedLength(_) => "fixed_length",
        }
    }

    /// Open a reader of this format over `input`.
    pub fn open<'a, R: Read + 'a>(
        &self,
        input: R,
        config: &ReaderConfig,
    ) -> StreamResult<Box<dyn RecordSource + 'a>> {
        let lines = LineReader::with_config(input, config);
        Ok(match self {
            Format::Csv(c) => Box::new(CsvReader::from_lines(lines, c.clone())?),
            Format::Delimited(c) => Box::new(DelimitedReader::from_lines(lines, c.clone())?),
            Format::FixedLength(c) => Box::new(FixedLengthReader::from_lines(lines, c.clone())?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source() {
        let mut source = MemorySource::new(vec![
            RawRecord::new(vec!["a".into()], "a", 1),
            RawRecord::new(vec!["b".into()], "b", 2),
        ]);
        assert_eq!(source.next_record().unwrap().unwrap().line, 1);
        assert_eq!(source.next_record().unwrap().unwrap().text, "b");
        assert_eq!(source.next_record().unwrap(), None);
    }

    #[test]
    fn test_format_open() {
        let format = Format::Delimited(DelimitedReaderConfig::default());
        assert_eq!(format.name(), "delimited");
        let mut source = format.open("a\tb\n".as_bytes(), &ReaderConfig::default()).unwrap();
        let record = source.next_record().unwrap().unwrap();
        assert_eq!(record.fields, vec!["a", "b"]);
        assert!(source.next_record().unwrap().is_none());
    }

    #[test]
    fn test_format_open_rejects_bad_config() {
        let format = Format::Csv(CsvReaderConfig {
            delimiter: '"',
            ..Default::default()
        });
        assert!(format.open("".as_bytes(), &ReaderConfig::default()).is_err());
    }

    #[test]
    fn test_boxed_and_borrowed_sources() {
        let mut inner = MemorySource::new(vec![RawRecord::new(vec![], "", 1)]);
        {
            let mut borrowed: &mut MemorySource = &mut inner;
            assert!(borrowed.next_record().unwrap().is_some());
        }
        let mut boxed: Box<dyn RecordSource> = Box::new(inner);
        assert!(boxed.next_record().unwrap().is_none());
    }
}
