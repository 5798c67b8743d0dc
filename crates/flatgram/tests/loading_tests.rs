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

//! Grammar loading through the facade.

use flatgram::{grammar_from_json, grammar_from_yaml, validate_str, Format, LoadError};
use flatgram_test::{
    batch_tree, invalid_grammar_samples, malformed_grammar_samples, ordered_choice_tree,
    BATCH_GRAMMAR_YAML, FIXED_GRAMMAR_YAML, LEDGER_GRAMMAR_JSON, PAYMENTS_FIXED,
};

#[test]
fn yaml_grammar_matches_builder() {
    assert_eq!(grammar_from_yaml(BATCH_GRAMMAR_YAML).unwrap(), batch_tree());
}

#[test]
fn json_grammar_matches_builder() {
    assert_eq!(grammar_from_json(LEDGER_GRAMMAR_JSON).unwrap(), ordered_choice_tree());
}

#[test]
fn invalid_grammars_are_grammar_errors() {
    for (name, yaml) in invalid_grammar_samples() {
        assert!(
            matches!(grammar_from_yaml(yaml), Err(LoadError::Grammar(_))),
            "{} should fail to build",
            name
        );
    }
}

#[test]
fn malformed_grammars_are_syntax_errors() {
    for (name, yaml) in malformed_grammar_samples() {
        assert!(
            matches!(grammar_from_yaml(yaml), Err(LoadError::Syntax(_))),
            "{} should fail to parse",
            name
        );
    }
    assert!(matches!(grammar_from_json("{"), Err(LoadError::Syntax(_))));
}

#[test]
fn fixed_grammar_validates_payments() {
    let tree = grammar_from_yaml(FIXED_GRAMMAR_YAML).unwrap();
    let format: Format = serde_yaml::from_str("kind: fixed_length\n").unwrap();
    let summary = validate_str(&tree, PAYMENTS_FIXED, &format).unwrap();
    assert_eq!(summary.records, 4);
}
