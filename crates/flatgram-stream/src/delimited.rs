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

//! Delimited tokenizer.

use crate::config::DelimitedReaderConfig;
use crate::error::{StreamError, StreamResult};
use crate::reader::LineReader;
use crate::source::{RawRecord, RecordSource};
use std::io::Read;

/// Reads delimited records, tab-separated by default.
///
/// With a line continuation character configured, a physical line ending in
/// that (unescaped) character is joined with the next one. The record text
/// keeps both lines; the fields do not see the continuation character.
///
/// # Examples
///
/// ```rust
/// use flatgram_stream::{DelimitedReader, DelimitedReaderConfig, RecordSource};
///
/// let config = DelimitedReaderConfig {
///     delimiter: ',',
///     line_continuation: Some('\\'),
///     ..Default::default()
/// };
/// let mut reader = DelimitedReader::new("1,2,\\\n3,4\n5,6".as_bytes(), config).unwrap();
///
/// let first = reader.next_record().unwrap().unwrap();
/// assert_eq!(first.fields, vec!["1", "2", "3", "4"]);
/// assert_eq!(first.text, "1,2,\\\n3,4");
/// assert_eq!(first.line, 1);
///
/// assert_eq!(reader.next_record().unwrap().unwrap().line, 3);
/// ```
pub struct DelimitedReader<R: Read> {
    lines: LineReader<R>,
    config: DelimitedReaderConfig,
}

impl<R: Read> DelimitedReader<R> {
    pub fn new(reader: R, config: DelimitedReaderConfig) -> StreamResult<Self> {
        Self::from_lines(LineReader::new(reader), config)
    }

    pub fn from_lines(lines: LineReader<R>, config: DelimitedReaderConfig) -> StreamResult<Self> {
        config.validate()?;
        Ok(Self { lines, config })
    }

    pub fn config(&self) -> &DelimitedReaderConfig {
        &self.config
    }
}

impl<R: Read> RecordSource for DelimitedReader<R> {
    fn next_record(&mut self) -> StreamResult<Option<RawRecord>> {
        let comment = self.config.comment.as_deref();
        let (text, logical, start) =
            match read_logical_line(&mut self.lines, self.config.line_continuation, self.config.escape, comment)? {
                Some(joined) => joined,
                None => return Ok(None),
            };
        let fields = split_fields(&logical, self.config.delimiter, self.config.escape);
        Ok(Some(RawRecord { fields, text, line: start }))
    }
}

impl<R: Read> Iterator for DelimitedReader<R> {
    type Item = StreamResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

/// Read one logical line: `(raw text, joined content, first line number)`.
///
/// Comment lines are only recognized where a record would start.
pub(crate) fn read_logical_line<R: Read>(
    lines: &mut LineReader<R>,
    continuation: Option<char>,
    escape: Option<char>,
    comment: Option<&str>,
) -> StreamResult<Option<(String, String, usize)>> {
    let mut line = loop {
        match lines.next_line()? {
            None => return Ok(None),
            Some(line) if comment.is_some_and(|p| line.content.starts_with(p)) => continue,
            Some(line) => break line,
        }
    };

    let start = line.number;
    let mut text = String::new();
    let mut logical = String::new();

    loop {
        text.push_str(&line.content);
        match continuation {
            Some(c) if ends_with_unescaped(&line.content, c, escape) => {
                logical.push_str(&line.content[..line.content.len() - c.len_utf8()]);
                text.push_str(line.terminator);
                line = match lines.next_line()? {
                    Some(next) => next,
                    None => {
                        return Err(StreamError::malformed(
                            line.number,
                            "line continuation at end of input",
                        ));
                    }
                };
            }
            _ => {
                logical.push_str(&line.content);
                return Ok(Some((text, logical, start)));
            }
        }
    }
}

/// True when `content` ends in `c` not preceded by an odd run of `escape`.
fn ends_with_unescaped(content: &str, c: char, escape: Option<char>) -> bool {
    let mut rev = content.chars().rev();
    if rev.next() != Some(c) {
        return false;
    }
    match escape {
        Some(e) => rev.take_while(|&p| p == e).count() % 2 == 0,
        None => true,
    }
}

fn split_fields(logical: &str, delimiter: char, escape: Option<char>) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut chars = logical.chars().peekable();

    while let Some(c) = chars.next() {
        if Some(c) == escape {
            match chars.peek() {
                Some(&next) if next == c || next == delimiter => {
                    field.push(next);
                    chars.next();
                }
                _ => field.push(c),
            }
        } else if c == delimiter {
            fields.push(std::mem::take(&mut field));
        } else {
            field.push(c);
        }
    }
    fields.push(field);
    fields
}
