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

//! CSV tokenizer.
//!
//! Quoted fields may contain delimiters and, when
//! [`CsvReaderConfig::multiline`] is set, line breaks. A record spanning
//! several physical lines reports its first line.

use crate::config::CsvReaderConfig;
use crate::error::{StreamError, StreamResult};
use crate::reader::LineReader;
use crate::source::{RawRecord, RecordSource};
use std::io::Read;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// At the start of a field, possibly after leading whitespace.
    FieldStart,
    Unquoted,
    Quoted,
    /// After the closing quote of a quoted field.
    Closed,
}

/// Reads CSV records.
///
/// # Examples
///
/// ```rust
/// use flatgram_stream::{CsvReader, CsvReaderConfig, RecordSource};
///
/// let input = "H,1\nD,\"two\nlines\"\nT,1\n";
/// let mut reader = CsvReader::new(input.as_bytes(), CsvReaderConfig::default()).unwrap();
///
/// assert_eq!(reader.next_record().unwrap().unwrap().fields, vec!["H", "1"]);
///
/// let detail = reader.next_record().unwrap().unwrap();
/// assert_eq!(detail.fields, vec!["D", "two\nlines"]);
/// assert_eq!(detail.line, 2);
///
/// assert_eq!(reader.next_record().unwrap().unwrap().line, 4);
/// assert!(reader.next_record().unwrap().is_none());
/// ```
pub struct CsvReader<R: Read> {
    lines: LineReader<R>,
    config: CsvReaderConfig,
}

impl<R: Read> CsvReader<R> {
    /// Create a reader with default line limits.
    pub fn new(reader: R, config: CsvReaderConfig) -> StreamResult<Self> {
        Self::from_lines(LineReader::new(reader), config)
    }

    /// Create a reader over an existing line reader.
    pub fn from_lines(lines: LineReader<R>, config: CsvReaderConfig) -> StreamResult<Self> {
        config.validate()?;
        Ok(Self { lines, config })
    }

    pub fn config(&self) -> &CsvReaderConfig {
        &self.config
    }

    fn is_comment(&self, content: &str) -> bool {
        matches!(&self.config.comment, Some(prefix) if content.starts_with(prefix.as_str()))
    }
}

impl<R: Read> RecordSource for CsvReader<R> {
    fn next_record(&mut self) -> StreamResult<Option<RawRecord>> {
        let mut line = loop {
            match self.lines.next_line()? {
                None => return Ok(None),
                Some(line) if self.is_comment(&line.content) => continue,
                Some(line) => break line,
            }
        };

        let start = line.number;
        let cfg = &self.config;
        let mut text = String::new();
        let mut fields = Vec::new();
        let mut field = String::new();
        let mut state = State::FieldStart;

        loop {
            text.push_str(&line.content);
            let mut chars = line.content.chars().peekable();

            while let Some(c) = chars.next() {
                match state {
                    State::FieldStart | State::Unquoted if c == cfg.delimiter => {
                        fields.push(std::mem::take(&mut field));
                        state = State::FieldStart;
                    }
                    State::FieldStart if c == cfg.quote => {
                        // Leading whitespace before a quote is not content.
                        field.clear();
                        state = State::Quoted;
                    }
                    State::FieldStart if cfg.whitespace_allowed && c.is_whitespace() => {
                        field.push(c);
                    }
                    State::FieldStart => {
                        field.push(c);
                        state = State::Unquoted;
                    }
                    State::Unquoted if c == cfg.quote && !cfg.unquoted_quotes_allowed => {
                        return Err(StreamError::malformed(
                            line.number,
                            "quote character in unquoted field",
                        ));
                    }
                    State::Unquoted => field.push(c),
                    State::Quoted => match cfg.escape {
                        Some(escape) if c == escape && escape != cfg.quote => {
                            match chars.peek() {
                                Some(&next) if next == cfg.quote || next == escape => {
                                    field.push(next);
                                    chars.next();
                                }
                                _ => field.push(c),
                            }
                        }
                        _ if c == cfg.quote => {
                            if cfg.escape == Some(cfg.quote) && chars.peek() == Some(&cfg.quote) {
                                field.push(c);
                                chars.next();
                            } else {
                                state = State::Closed;
                            }
                        }
                        _ => field.push(c),
                    },
                    State::Closed if c == cfg.delimiter => {
                        fields.push(std::mem::take(&mut field));
                        state = State::FieldStart;
                    }
                    State::Closed if cfg.whitespace_allowed && c.is_whitespace() => {}
                    State::Closed => {
                        return Err(StreamError::malformed(
                            line.number,
                            format!("unexpected character '{}' after closing quote", c),
                        ));
                    }
                }
            }

            if state != State::Quoted {
                fields.push(field);
                break;
            }
            if !cfg.multiline {
                return Err(StreamError::malformed(
                    line.number,
                    "quoted field spans lines but multiline is disabled",
                ));
            }

            field.push_str(line.terminator);
            text.push_str(line.terminator);
            line = match self.lines.next_line()? {
                Some(next) => next,
                None => {
                    return Err(StreamError::malformed(start, "unterminated quoted field"));
                }
            };
        }

        Ok(Some(RawRecord { fields, text, line: start }))
    }
}

impl<R: Read> Iterator for CsvReader<R> {
    type Item = StreamResult<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str, config: CsvReaderConfig) -> StreamResult<Vec<RawRecord>> {
        CsvReader::new(input.as_bytes(), config)?.collect()
    }

    fn fields(input: &str) -> Vec<Vec<String>> {
        read_all(input, CsvReaderConfig::default())
            .unwrap()
            .into_iter()
            .map(|r| r.fields)
            .collect()
    }

    #[test]
    fn test_basic() {
        assert_eq!(fields("a,b,c\n1,2,3"), vec![vec!["a", "b", "c"], vec!["1", "2", "3"]]);
    }

    #[test]
    fn test_empty_fields() {
        assert_eq!(fields(",,\n"), vec![vec!["", "", ""]]);
        assert_eq!(fields("\n"), vec![vec![""]]);
    }

    #[test]
    fn test_quoted_delimiter_and_doubled_quote() {
        assert_eq!(fields("\"a,b\",\"say \"\"hi\"\"\"\n"), vec![vec!["a,b", "say \"hi\""]]);
    }

    #[test]
    fn test_multiline_record_text_and_numbering() {
        let records = read_all("\"1\r\n2\",x\nnext", CsvReaderConfig::default()).unwrap();
        assert_eq!(records[0].fields, vec!["1\r\n2", "x"]);
        assert_eq!(records[0].text, "\"1\r\n2\",x");
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].line, 3);
    }

    #[test]
    fn test_multiline_disabled() {
        let config = CsvReaderConfig {
            multiline: false,
            ..Default::default()
        };
        let err = read_all("a\n\"open\nclose\"\n", config).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[test]
    fn test_unterminated_quote_reports_start_line() {
        let err = read_all("ok\n\"never\nclosed\n", CsvReaderConfig::default()).unwrap_err();
        assert!(matches!(err, StreamError::Malformed { line: 2, .. }));
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_character_after_closing_quote() {
        let err = read_all("\"a\"b\n", CsvReaderConfig::default()).unwrap_err();
        assert!(matches!(err, StreamError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_unquoted_quote() {
        assert!(read_all("a\"b\n", CsvReaderConfig::default()).is_err());

        let config = CsvReaderConfig {
            unquoted_quotes_allowed: true,
            ..Default::default()
        };
        let records = read_all("a\"b\n", config).unwrap();
        assert_eq!(records[0].fields, vec!["a\"b"]);
    }

    #[test]
    fn test_whitespace_around_quotes() {
        assert!(read_all(" \"a\" ,b\n", CsvReaderConfig::default()).is_err());

        let config = CsvReaderConfig {
            whitespace_allowed: true,
            ..Default::default()
        };
        let records = read_all(" \"a\" , b\n", config).unwrap();
        assert_eq!(records[0].fields, vec!["a", " b"]);
    }

    #[test]
    fn test_custom_escape() {
        let config = CsvReaderConfig {
            escape: Some('\\'),
            ..Default::default()
        };
        let records = read_all("\"a\\\"b\",\"c\\\\d\",\"e\\f\"\n", config).unwrap();
        assert_eq!(records[0].fields, vec!["a\"b", "c\\d", "e\\f"]);
    }

    #[test]
    fn test_comments_skipped_between_records() {
        let config = CsvReaderConfig {
            comment: Some("#".to_string()),
            ..Default::default()
        };
        let records = read_all("# header\na,b\n#x\nc\n", config).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].line, 2);
        assert_eq!(records[1].line, 4);
    }

    #[test]
    fn test_custom_delimiter() {
        let config = CsvReaderConfig {
            delimiter: ';',
            ..Default::default()
        };
        let records = read_all("a;b,c\n", config).unwrap();
        assert_eq!(records[0].fields, vec!["a", "b,c"]);
    }

    #[test]
    fn test_invalid_config() {
        let config = CsvReaderConfig {
            delimiter: '"',
            ..Default::default()
        };
        assert!(matches!(
            CsvReader::new("".as_bytes(), config),
            Err(StreamError::Config(_))
        ));
    }
}
