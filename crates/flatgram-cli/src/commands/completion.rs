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
//! Shell completion scripts

use clap::Command;
use clap_complete::{generate, Generator};
use std::io::{self, Write};

/// Write the completion script for `cmd` to `out`.
pub fn write_completion<G: Generator>(generator: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(generator, cmd, name, out);
}

/// Write the completion script for `cmd` to stdout.
///
/// # Examples
///
/// ```no_run
/// use clap::Command;
/// use clap_complete::shells::Bash;
/// use flatgram_cli::commands::generate_completion_for_command;
///
/// let mut cmd = Command::new("flatgram");
/// generate_completion_for_command(Bash, &mut cmd);
/// ```
pub fn generate_completion_for_command<G: Generator>(generator: G, cmd: &mut Command) {
    write_completion(generator, cmd, &mut io::stdout());
}

/// Installation instructions for the completion script of `shell`.
///
/// Shell names are case-insensitive; unknown shells yield
/// `"Unsupported shell"`.
///
/// ```
/// use flatgram_cli::commands::print_installation_instructions;
///
/// assert!(print_installation_instructions("Zsh").contains("_flatgram"));
/// assert_eq!(print_installation_instructions("tcsh"), "Unsupported shell");
/// ```
pub fn print_installation_instructions(shell: &str) -> String {
    match shell.to_lowercase().as_str() {
        "bash" => {
            r#"# Bash completion installation:

# For current session only:
eval "$(flatgram completion bash)"

# Or save to the completions directory:
flatgram completion bash > ~/.local/share/bash-completion/completions/flatgram
"#
        }
        "zsh" => {
            r#"# Zsh completion installation:

# For current session only:
eval "$(flatgram completion zsh)"

# Or save to a directory in $fpath:
flatgram completion zsh > ~/.zsh/completions/_flatgram
"#
        }
        "fish" => {
            r#"# Fish completion installation:

flatgram completion fish > ~/.config/fish/completions/flatgram.fish
"#
        }
        "powershell" | "pwsh" => {
            r#"# PowerShell completion installation:

# Add this line to the profile at $PROFILE:
flatgram completion powershell | Out-String | Invoke-Expression
"#
        }
        "elvish" => {
            r#"# Elvish completion installation:

# Add this line to ~/.elvish/rc.elv:
eval (flatgram completion elvish | slurp)
"#
        }
        _ => "Unsupported shell",
    }
    .to_string()
}
