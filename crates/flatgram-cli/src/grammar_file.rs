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

//! Grammar files: a tokenizer `format`, optional reader `limits` and the
//! `grammar` tree, in YAML or JSON.
//!
//! ```yaml
//! format:
//!   kind: csv
//!   delimiter: ";"
//! limits:
//!   timeout_ms: 30000
//! grammar:
//!   name: file
//!   children:
//!     - type: record
//!       name: line
//! ```

use crate::commands::read_file;
use crate::error::CliError;
use flatgram::{Format, GrammarDef, ParserTree, ReaderConfig};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Physical reading limits. Omitted values keep the reader defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Limits {
    pub max_line_length: Option<usize>,
    pub timeout_ms: Option<u64>,
}

impl Limits {
    pub fn reader_config(&self) -> ReaderConfig {
        let defaults = ReaderConfig::default();
        ReaderConfig {
            max_line_length: self.max_line_length.unwrap_or(defaults.max_line_length),
            timeout: self.timeout_ms.map(Duration::from_millis),
            ..defaults
        }
    }
}

/// The on-disk grammar file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrammarFile {
    #[serde(default)]
    pub format: Format,
    #[serde(default)]
    pub limits: Limits,
    pub grammar: GrammarDef,
}

/// A grammar file ready for validation.
#[derive(Debug, Clone)]
pub struct LoadedGrammar {
    pub tree: ParserTree,
    pub format: Format,
    pub reader: ReaderConfig,
}

impl GrammarFile {
    /// Parse grammar file text; `.json` paths are JSON, anything else YAML.
    pub fn parse(path: &Path, content: &str) -> Result<Self, CliError> {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(content).map_err(|e| e.to_string())
        } else {
            serde_yaml::from_str(content).map_err(|e| e.to_string())
        };
        parsed.map_err(|message| CliError::grammar(path, message))
    }

    pub fn build(self, path: &Path) -> Result<LoadedGrammar, CliError> {
        let tree = self
            .grammar
            .build()
            .map_err(|e| CliError::from_grammar(path, e))?;
        Ok(LoadedGrammar {
            tree,
            format: self.format,
            reader: self.limits.reader_config(),
        })
    }
}

/// Read, parse and build the grammar file at `path`.
pub fn load_grammar(path: &Path) -> Result<LoadedGrammar, CliError> {
    let content = read_file(path)?;
    GrammarFile::parse(path, &content)?.build(path)
}
