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

//! Grammar loading errors.

use flatgram_core::GrammarError;
use thiserror::Error;

/// A grammar definition that could not be turned into a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The document is not valid YAML or JSON for a grammar.
    #[error("cannot read grammar definition: {0}")]
    Syntax(String),

    /// The definition parsed but describes an invalid tree.
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

impl From<serde_yaml::Error> for LoadError {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Syntax(source.to_string())
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(source: serde_json::Error) -> Self {
        Self::Syntax(source.to_string())
    }
}
