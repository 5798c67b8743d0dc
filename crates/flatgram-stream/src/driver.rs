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

//! Record stream validation.
//!
//! [`GrammarReader`] pulls raw records from a [`RecordSource`], identifies
//! each one against the grammar and feeds it to a [`Sequencer`]. Accepted
//! records come out in input order; the first error ends the stream.

use crate::config::ReaderConfig;
use crate::error::{StreamError, StreamResult};
use crate::source::{Format, RecordSource};
use flatgram_core::{Accepted, ParserTree, RecordCandidate, Sequencer, Summary};
use std::io::Read;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Iterator of accepted records over a grammar.
///
/// # Examples
///
/// ```rust
/// use flatgram_stream::{CsvReader, CsvReaderConfig, GrammarReader};
/// use flatgram_test::batch_tree;
///
/// let tree = batch_tree();
/// let source = CsvReader::new("H,1\nD,x\nT,1\n".as_bytes(), CsvReaderConfig::default()).unwrap();
/// let mut reader = GrammarReader::new(&tree, source);
///
/// let names: Vec<_> = reader
///     .by_ref()
///     .map(|r| tree.name(r.unwrap().node).to_string())
///     .collect();
/// assert_eq!(names, vec!["header", "detail", "trailer"]);
/// assert_eq!(reader.summary().map(|s| s.records), Some(3));
/// ```
pub struct GrammarReader<'t, S: RecordSource> {
    source: S,
    sequencer: Sequencer<'t>,
    timeout: Option<Duration>,
    start_time: Instant,
    done: bool,
    summary: Option<Summary>,
}

impl<'t, S: RecordSource> GrammarReader<'t, S> {
    pub fn new(tree: &'t ParserTree, source: S) -> Self {
        Self::with_config(tree, source, &ReaderConfig::default())
    }

    /// Create a reader bounded by `config.timeout`.
    pub fn with_config(tree: &'t ParserTree, source: S, config: &ReaderConfig) -> Self {
        debug!(grammar = tree.name(tree.root()), "starting validation");
        Self {
            source,
            sequencer: Sequencer::new(tree),
            timeout: config.timeout,
            start_time: Instant::now(),
            done: false,
            summary: None,
        }
    }

    /// Summary of a stream that reached end of input cleanly.
    pub fn summary(&self) -> Option<&Summary> {
        self.summary.as_ref()
    }

    pub fn sequencer(&self) -> &Sequencer<'t> {
        &self.sequencer
    }

    /// Consume the remaining records and return the session summary.
    pub fn finish(mut self) -> StreamResult<Summary> {
        while self.next_accepted()?.is_some() {}
        Ok(self.sequencer.finish()?)
    }

    /// Runs between records only; see [`ReaderConfig::timeout`].
    #[inline]
    fn check_timeout(&self) -> StreamResult<()> {
        if let Some(limit) = self.timeout {
            let elapsed = self.start_time.elapsed();
            if elapsed > limit {
                return Err(StreamError::Timeout { elapsed, limit });
            }
        }
        Ok(())
    }

    fn next_accepted(&mut self) -> StreamResult<Option<Accepted>> {
        if self.done {
            return Ok(None);
        }
        let result = self.step();
        if result.is_err() {
            self.done = true;
        }
        result
    }

    fn step(&mut self) -> StreamResult<Option<Accepted>> {
        self.check_timeout()?;
        match self.source.next_record()? {
            Some(raw) => {
                let candidate =
                    RecordCandidate::identify(self.sequencer.tree(), raw.fields, raw.text, raw.line);
                Ok(Some(self.sequencer.accept(candidate)?))
            }
            None => {
                let summary = self.sequencer.finish()?;
                debug!(
                    records = summary.records,
                    passes = summary.passes,
                    "validation complete"
                );
                self.summary = Some(summary);
                self.done = true;
                Ok(None)
            }
        }
    }
}

impl<S: RecordSource> Iterator for GrammarReader<'_, S> {
    type Item = StreamResult<Accepted>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_accepted() {
            Ok(Some(accepted)) => Some(Ok(accepted)),
            Ok(None) => None,
            Err(e) => {
                match e.diagnostic() {
                    Some(d) => warn!(line = d.line, kind = %d.kind, "{}", d.message),
                    None => warn!(line = ?e.line(), "{}", e),
                }
                Some(Err(e))
            }
        }
    }
}

/// Validate a whole record stream against `tree`.
pub fn validate<S: RecordSource>(tree: &ParserTree, source: S) -> StreamResult<Summary> {
    GrammarReader::new(tree, source).finish()
}

/// Validate with the limits of `config`.
pub fn validate_with_config<S: RecordSource>(
    tree: &ParserTree,
    source: S,
    config: &ReaderConfig,
) -> StreamResult<Summary> {
    GrammarReader::with_config(tree, source, config).finish()
}

/// Tokenize `input` as `format` and validate it.
pub fn validate_reader<R: Read>(
    tree: &ParserTree,
    input: R,
    format: &Format,
    config: &ReaderConfig,
) -> StreamResult<Summary> {
    let source = format.open(input, config)?;
    validate_with_config(tree, source, config)
}
