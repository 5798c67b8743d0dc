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

//! Physical line reader.
//!
//! Splits input on LF, CRLF or a lone CR, numbering lines from 1 and keeping
//! each line's terminator so tokenizers can rebuild the raw record text.

use crate::config::ReaderConfig;
use crate::error::{StreamError, StreamResult};
use std::io::{BufRead, BufReader, Read};

/// One physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number.
    pub number: usize,
    /// Content without the terminator.
    pub content: String,
    /// `"\n"`, `"\r\n"`, `"\r"`, or `""` for a final unterminated line.
    pub terminator: &'static str,
}

impl Line {
    /// Content followed by its terminator.
    pub fn raw(&self) -> String {
        let mut raw = String::with_capacity(self.content.len() + self.terminator.len());
        raw.push_str(&self.content);
        raw.push_str(self.terminator);
        raw
    }
}

/// Buffered line reader with line number tracking.
///
/// # Examples
///
/// ```rust
/// use flatgram_stream::LineReader;
/// use std::io::Cursor;
///
/// let mut reader = LineReader::new(Cursor::new("a\r\nb\rc"));
///
/// let line = reader.next_line().unwrap().unwrap();
/// assert_eq!((line.number, line.content.as_str(), line.terminator), (1, "a", "\r\n"));
///
/// // Peek without consuming
/// assert_eq!(reader.peek_line().unwrap().map(|l| l.number), Some(2));
/// assert_eq!(reader.next_line().unwrap().unwrap().content, "b");
///
/// let last = reader.next_line().unwrap().unwrap();
/// assert_eq!((last.number, last.terminator), (3, ""));
/// assert_eq!(reader.next_line().unwrap(), None);
/// ```
pub struct LineReader<R: Read> {
    reader: BufReader<R>,
    line_number: usize,
    max_line_length: usize,
    buffer: Vec<u8>,
    peeked: Option<Line>,
}

impl<R: Read> LineReader<R> {
    /// Create a new line reader with default limits.
    pub fn new(reader: R) -> Self {
        Self::with_config(reader, &ReaderConfig::default())
    }

    /// Create with the buffer size and line limit of `config`.
    pub fn with_config(reader: R, config: &ReaderConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(config.buffer_size.max(1), reader),
            line_number: 0,
            max_line_length: config.max_line_length,
            buffer: Vec::new(),
            peeked: None,
        }
    }

    /// Number of the last line read.
    #[inline]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line.
    pub fn next_line(&mut self) -> StreamResult<Option<Line>> {
        if let Some(peeked) = self.peeked.take() {
            return Ok(Some(peeked));
        }
        self.read_line_internal()
    }

    /// Peek at the next line without consuming it.
    pub fn peek_line(&mut self) -> StreamResult<Option<&Line>> {
        if self.peeked.is_none() {
            self.peeked = self.read_line_internal()?;
        }
        Ok(self.peeked.as_ref())
    }

    /// Push a line back to be read again.
    #[inline]
    pub fn push_back(&mut self, line: Line) {
        self.peeked = Some(line);
    }

    fn read_line_internal(&mut self) -> StreamResult<Option<Line>> {
        self.buffer.clear();
        let number = self.line_number + 1;
        let mut terminator = "";
        let mut pending_cr = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(StreamError::Io(e)),
            };
            if available.is_empty() {
                if pending_cr {
                    terminator = "\r";
                }
                break;
            }
            if pending_cr {
                if available[0] == b'\n' {
                    self.reader.consume(1);
                    terminator = "\r\n";
                } else {
                    terminator = "\r";
                }
                break;
            }
            match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    let is_cr = available[pos] == b'\r';
                    self.buffer.extend_from_slice(&available[..pos]);
                    self.reader.consume(pos + 1);
                    if is_cr {
                        pending_cr = true;
                    } else {
                        terminator = "\n";
                        break;
                    }
                }
                None => {
                    let len = available.len();
                    self.buffer.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
            if self.buffer.len() > self.max_line_length {
                return Err(StreamError::LineTooLong {
                    line: number,
                    limit: self.max_line_length,
                });
            }
        }

        if self.buffer.is_empty() && terminator.is_empty() {
            return Ok(None);
        }
        if self.buffer.len() > self.max_line_length {
            return Err(StreamError::LineTooLong {
                line: number,
                limit: self.max_line_length,
            });
        }

        self.line_number = number;
        let content = String::from_utf8(std::mem::take(&mut self.buffer)).map_err(|e| {
            StreamError::Utf8 {
                line: number,
                message: e.to_string(),
            }
        })?;
        Ok(Some(Line {
            number,
            content,
            terminator,
        }))
    }
}

impl<R: Read> Iterator for LineReader<R> {
    type Item = StreamResult<Line>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_line().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn contents(input: &str) -> Vec<(usize, String, &'static str)> {
        LineReader::new(Cursor::new(input.to_string()))
            .map(|line| {
                let line = line.unwrap();
                (line.number, line.content, line.terminator)
            })
            .collect()
    }

    #[test]
    fn test_read_lines() {
        assert_eq!(
            contents("line1\nline2\nline3"),
            vec![
                (1, "line1".to_string(), "\n"),
                (2, "line2".to_string(), "\n"),
                (3, "line3".to_string(), ""),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(contents("").is_empty());
    }

    #[test]
    fn test_empty_lines() {
        assert_eq!(
            contents("\n\n"),
            vec![(1, String::new(), "\n"), (2, String::new(), "\n")]
        );
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(
            contents("a\r\nb\rc\nd\r"),
            vec![
                (1, "a".to_string(), "\r\n"),
                (2, "b".to_string(), "\r"),
                (3, "c".to_string(), "\n"),
                (4, "d".to_string(), "\r"),
            ]
        );
    }

    #[test]
    fn test_cr_lf_split_across_buffers() {
        let config = ReaderConfig {
            buffer_size: 2,
            ..Default::default()
        };
        let mut reader = LineReader::with_config(Cursor::new("a\r\nb"), &config);
        let first = reader.next_line().unwrap().unwrap();
        assert_eq!(first.terminator, "\r\n");
        let second = reader.next_line().unwrap().unwrap();
        assert_eq!((second.number, second.content.as_str()), (2, "b"));
    }

    #[test]
    fn test_raw_text() {
        let mut reader = LineReader::new(Cursor::new("x\r\n"));
        assert_eq!(reader.next_line().unwrap().unwrap().raw(), "x\r\n");
    }

    #[test]
    fn test_line_number_after_eof() {
        let mut reader = LineReader::new(Cursor::new("line1"));
        assert_eq!(reader.line_number(), 0);
        reader.next_line().unwrap();
        assert_eq!(reader.line_number(), 1);
        assert_eq!(reader.next_line().unwrap(), None);
        assert_eq!(reader.line_number(), 1);
    }

    #[test]
    fn test_peek_and_push_back() {
        let mut reader = LineReader::new(Cursor::new("line1\nline2"));
        assert_eq!(reader.peek_line().unwrap().map(|l| l.number), Some(1));
        assert_eq!(reader.peek_line().unwrap().map(|l| l.number), Some(1));
        let line = reader.next_line().unwrap().unwrap();
        reader.push_back(line.clone());
        assert_eq!(reader.next_line().unwrap(), Some(line));
        assert_eq!(reader.next_line().unwrap().unwrap().content, "line2");
    }

    #[test]
    fn test_line_too_long() {
        let config = ReaderConfig {
            max_line_length: 4,
            buffer_size: 3,
            ..Default::default()
        };
        let mut reader = LineReader::with_config(Cursor::new("abcd\nabcdef\n"), &config);
        assert_eq!(reader.next_line().unwrap().unwrap().content, "abcd");
        let err = reader.next_line().unwrap_err();
        assert!(matches!(err, StreamError::LineTooLong { line: 2, limit: 4 }));
    }

    #[test]
    fn test_invalid_utf8() {
        let bytes: &[u8] = b"ok\n\xff\xfe\n";
        let mut reader = LineReader::new(bytes);
        reader.next_line().unwrap();
        let err = reader.next_line().unwrap_err();
        assert!(matches!(err, StreamError::Utf8 { line: 2, .. }));
    }
}
