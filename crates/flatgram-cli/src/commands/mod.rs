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

//! CLI command implementations

mod batch_commands;
mod completion;
mod inspect;
mod validate;

pub use batch_commands::batch_validate;
pub use completion::{
    generate_completion_for_command, print_installation_instructions, write_completion,
};
pub use inspect::inspect;
pub use validate::{validate, validate_file};

use crate::error::CliError;
use std::fs::{self, File};
use std::path::Path;

/// Default maximum file size to prevent OOM attacks (1 GB)
/// Can be overridden via FLATGRAM_MAX_FILE_SIZE environment variable
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Get the maximum file size from environment or use default.
fn get_max_file_size() -> u64 {
    std::env::var("FLATGRAM_MAX_FILE_SIZE")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

fn check_file_size(path: &Path) -> Result<(), CliError> {
    let metadata = fs::metadata(path).map_err(|e| CliError::io_error(path, e))?;
    let max_file_size = get_max_file_size();
    if metadata.len() > max_file_size {
        return Err(CliError::file_too_large(path, metadata.len(), max_file_size));
    }
    Ok(())
}

/// Read a whole file, rejecting files above the size limit before reading.
pub fn read_file(path: &Path) -> Result<String, CliError> {
    check_file_size(path)?;
    fs::read_to_string(path).map_err(|e| CliError::io_error(path, e))
}

/// Open a file for streaming, rejecting files above the size limit.
pub fn open_input(path: &Path) -> Result<File, CliError> {
    check_file_size(path)?;
    File::open(path).map_err(|e| CliError::io_error(path, e))
}
