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

//! Record writers, the output-side counterparts of the tokenizers.
//!
//! Writers track the physical line count so a caller can correlate output
//! with diagnostics from a later read.

use crate::config::{CsvWriterConfig, DelimitedWriterConfig, FixedLengthWriterConfig};
use crate::error::{StreamError, StreamResult};
use std::io::Write;

/// Writes one record per call.
pub trait RecordWriter {
    /// Write a record followed by the line separator.
    fn write(&mut self, fields: &[&str]) -> StreamResult<()>;

    fn flush(&mut self) -> StreamResult<()>;

    /// Physical lines written so far.
    fn line_number(&self) -> usize;
}

/// Count of line breaks in `s`, with CRLF counted once.
fn line_breaks(s: &str) -> usize {
    let bytes = s.as_bytes();
    bytes
        .iter()
        .enumerate()
        .filter(|&(i, &b)| b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n')))
        .count()
}

fn has_line_break(s: &str) -> bool {
    s.contains(['\r', '\n'])
}

/// CSV writer.
///
/// # Examples
///
/// ```rust
/// use flatgram_stream::{CsvWriter, CsvWriterConfig, RecordWriter};
///
/// let mut writer = CsvWriter::new(Vec::new(), CsvWriterConfig::default()).unwrap();
/// writer.write(&["H", "a,b"]).unwrap();
/// writer.write(&["D", "say \"hi\"\nbye"]).unwrap();
/// assert_eq!(writer.line_number(), 3);
///
/// let out = String::from_utf8(writer.into_inner()).unwrap();
/// assert_eq!(out, "H,\"a,b\"\nD,\"say \"\"hi\"\"\nbye\"\n");
/// ```
pub struct CsvWriter<W: Write> {
    out: W,
    config: CsvWriterConfig,
    line_number: usize,
}

impl<W: Write> CsvWriter<W> {
    pub fn new(out: W, config: CsvWriterConfig) -> StreamResult<Self> {
        config.validate()?;
        Ok(Self {
            out,
            config,
            line_number: 0,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn needs_quotes(&self, field: &str) -> bool {
        self.config.always_quote
            || field.contains([self.config.delimiter, self.config.quote, '\r', '\n'])
    }

    fn push_field(&self, line: &mut String, field: &str) {
        if !self.needs_quotes(field) {
            line.push_str(field);
            return;
        }
        let (quote, escape) = (self.config.quote, self.config.escape);
        line.push(quote);
        for c in field.chars() {
            if c == quote || c == escape {
                line.push(escape);
            }
            line.push(c);
        }
        line.push(quote);
    }
}

impl<W: Write> RecordWriter for CsvWriter<W> {
    fn write(&mut self, fields: &[&str]) -> StreamResult<()> {
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if i > 0 {
                line.push(self.config.delimiter);
            }
            self.push_field(&mut line, field);
            self.line_number += line_breaks(field);
        }
        line.push_str(&self.config.line_separator);
        self.out.write_all(line.as_bytes())?;
        self.line_number += 1;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        Ok(self.out.flush()?)
    }

    fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Delimited writer.
pub struct DelimitedWriter<W: Write> {
    out: W,
    config: DelimitedWriterConfig,
    line_number: usize,
}

impl<W: Write> DelimitedWriter<W> {
    pub fn new(out: W, config: DelimitedWriterConfig) -> StreamResult<Self> {
        config.validate()?;
        Ok(Self {
            out,
            config,
            line_number: 0,
        })
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordWriter for DelimitedWriter<W> {
    fn write(&mut self, fields: &[&str]) -> StreamResult<()> {
        let delimiter = self.config.delimiter;
        let mut line = String::new();
        for (i, field) in fields.iter().enumerate() {
            if has_line_break(field) {
                return Err(StreamError::invalid_field(format!(
                    "field {} contains a line break",
                    i
                )));
            }
            if i > 0 {
                line.push(delimiter);
            }
            match self.config.escape {
                Some(escape) => {
                    for c in field.chars() {
                        if c == escape || c == delimiter {
                            line.push(escape);
                        }
                        line.push(c);
                    }
                }
                None if field.contains(delimiter) => {
                    return Err(StreamError::invalid_field(format!(
                        "field {} contains the delimiter and no escape is configured",
                        i
                    )));
                }
                None => line.push_str(field),
            }
        }
        line.push_str(&self.config.line_separator);
        self.out.write_all(line.as_bytes())?;
        self.line_number += 1;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        Ok(self.out.flush()?)
    }

    fn line_number(&self) -> usize {
        self.line_number
    }
}

/// Fixed-length writer. Fields are written back to back; padding is the
/// caller's concern.
pub struct FixedLengthWriter<W: Write> {
    out: W,
    config: FixedLengthWriterConfig,
    line_number: usize,
}

impl<W: Write> FixedLengthWriter<W> {
    pub fn new(out: W, config: FixedLengthWriterConfig) -> Self {
        Self {
            out,
            config,
            line_number: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RecordWriter for FixedLengthWriter<W> {
    fn write(&mut self, fields: &[&str]) -> StreamResult<()> {
        if let Some(i) = fields.iter().position(|f| has_line_break(f)) {
            return Err(StreamError::invalid_field(format!(
                "field {} contains a line break",
                i
            )));
        }
        let mut line = fields.concat();
        line.push_str(&self.config.line_separator);
        self.out.write_all(line.as_bytes())?;
        self.line_number += 1;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        Ok(self.out.flush()?)
    }

    fn line_number(&self) -> usize {
        self.line_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv(config: CsvWriterConfig, records: &[&[&str]]) -> (String, usize) {
        let mut w = CsvWriter::new(Vec::new(), config).unwrap();
        for r in records {
            w.write(r).unwrap();
        }
        w.flush().unwrap();
        let lines = w.line_number();
        (String::from_utf8(w.into_inner()).unwrap(), lines)
    }

    #[test]
    fn test_csv_plain_fields_unquoted() {
        let (out, lines) = csv(CsvWriterConfig::default(), &[&["a", "b"], &[""]]);
        assert_eq!(out, "a,b\n\n");
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_csv_always_quote() {
        let config = CsvWriterConfig {
            always_quote: true,
            ..Default::default()
        };
        let (out, _) = csv(config, &[&["a", ""]]);
        assert_eq!(out, "\"a\",\"\"\n");
    }

    #[test]
    fn test_csv_custom_escape() {
        let config = CsvWriterConfig {
            escape: '\\',
            ..Default::default()
        };
        let (out, _) = csv(config, &[&["a\"b\\c"]]);
        assert_eq!(out, "\"a\\\"b\\\\c\"\n");

        let (out, _) = csv(
            CsvWriterConfig {
                escape: '\\',
                ..Default::default()
            },
            &[&["back\\slash"]],
        );
        assert_eq!(out, "back\\slash\n");
    }

    #[test]
    fn test_csv_line_count_with_embedded_breaks() {
        let (_, lines) = csv(CsvWriterConfig::default(), &[&["a\r\nb", "c\rd\ne"]]);
        assert_eq!(lines, 4);
    }

    #[test]
    fn test_csv_crlf_separator() {
        let config = CsvWriterConfig {
            line_separator: "\r\n".to_string(),
            ..Default::default()
        };
        let (out, lines) = csv(config, &[&["1"], &["2"]]);
        assert_eq!(out, "1\r\n2\r\n");
        assert_eq!(lines, 2);
    }

    #[test]
    fn test_delimited_escaping() {
        let config = DelimitedWriterConfig {
            escape: Some('\\'),
            ..Default::default()
        };
        let mut w = DelimitedWriter::new(Vec::new(), config).unwrap();
        w.write(&["a\tb", "c\\d"]).unwrap();
        assert_eq!(w.into_inner(), b"a\\\tb\tc\\\\d\n");
    }

    #[test]
    fn test_delimited_rejects_unescapable_delimiter() {
        let mut w = DelimitedWriter::new(Vec::new(), DelimitedWriterConfig::default()).unwrap();
        let err = w.write(&["ok", "bad\tfield"]).unwrap_err();
        assert!(matches!(err, StreamError::InvalidField { .. }));
        assert_eq!(w.line_number(), 0);
    }

    #[test]
    fn test_delimited_rejects_line_break() {
        let mut w = DelimitedWriter::new(Vec::new(), DelimitedWriterConfig::default()).unwrap();
        assert!(w.write(&["a\nb"]).is_err());
    }

    #[test]
    fn test_fixed_length() {
        let mut w = FixedLengthWriter::new(Vec::new(), FixedLengthWriterConfig::default());
        w.write(&["1", "ACME  "]).unwrap();
        w.write(&["9000001"]).unwrap();
        assert!(w.write(&["bad\r"]).is_err());
        assert_eq!(w.line_number(), 2);
        assert_eq!(w.into_inner(), b"1ACME  \n9000001\n");
    }

    #[test]
    fn test_writer_config_validation() {
        let config = CsvWriterConfig {
            delimiter: '"',
            ..Default::default()
        };
        assert!(CsvWriter::new(Vec::new(), config).is_err());
    }
}
