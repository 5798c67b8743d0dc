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

//! Shared test fixtures and utilities for flatgram.
//!
//! This crate provides the canonical grammars, sample inputs and a small
//! session driver so that the core, stream, CLI and facade crates test
//! against the same data.
//!
//! # Quick Start
//!
//! ```rust
//! use flatgram_test::{fixtures, run_lines};
//!
//! let tree = fixtures::batch_tree();
//! let accepted = run_lines(&tree, &["H,1", "D,10", "T,1"]).unwrap();
//! assert_eq!(accepted, vec!["batch/header", "batch/detail/detail", "batch/trailer"]);
//!
//! let err = run_lines(&tree, &["H,1"]).unwrap_err();
//! assert_eq!(err.expected.as_deref(), Some("trailer"));
//! ```

/// Canonical grammars, inputs and invalid samples.
pub mod fixtures;

/// Helpers that drive a sequencer over in-memory records.
pub mod session;

pub use fixtures::*;
pub use session::{candidates, run, run_lines};
