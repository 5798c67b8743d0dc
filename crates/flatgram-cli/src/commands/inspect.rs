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

//! Inspect command - grammar tree visualization

use crate::error::CliError;
use crate::grammar_file::load_grammar;
use colored::Colorize;
use flatgram::{traverse, Node, NodeId, StatsCollector, TreeVisitor, VisitorContext};
use std::fmt::{self, Write};
use std::path::Path;

/// Renders one line per node, indented by depth.
#[derive(Debug, Default)]
pub struct TreePrinter {
    pub output: String,
}

impl TreePrinter {
    fn line(&mut self, ctx: &VisitorContext, label: String, node: &Node) -> fmt::Result {
        write!(self.output, "{}{} {}", "  ".repeat(ctx.depth), label, node.bounds.to_string().cyan())?;
        if ctx.depth > 0 {
            write!(self.output, " {}", format!("order {}", node.order).dimmed())?;
        }
        writeln!(self.output)
    }
}

impl TreeVisitor for TreePrinter {
    type Error = fmt::Error;

    fn begin_group(&mut self, _id: NodeId, node: &Node, ctx: &VisitorContext) -> fmt::Result {
        self.line(ctx, format!("{}/", node.name).bold().to_string(), node)
    }

    fn visit_record(&mut self, _id: NodeId, node: &Node, ctx: &VisitorContext) -> fmt::Result {
        self.line(ctx, node.name.green().to_string(), node)?;
        let indent = "  ".repeat(ctx.depth + 1);
        if node.is_unconditional() {
            writeln!(self.output, "{}{}", indent, "(any record)".yellow())?;
        }
        for criterion in node.criteria() {
            writeln!(self.output, "{}{} {}", indent, "when".dimmed(), criterion)?;
        }
        Ok(())
    }
}

/// Print the grammar tree with bounds, order and identification criteria.
///
/// With `show_stats`, node counts and nesting depth follow the tree.
pub fn inspect(grammar: &Path, show_stats: bool) -> Result<(), CliError> {
    let loaded = load_grammar(grammar)?;
    let tree = &loaded.tree;

    let mut printer = TreePrinter::default();
    traverse(tree, &mut printer).map_err(|e| CliError::invalid_input(e.to_string()))?;

    println!("{}", "Flatgram Grammar".bold().underline());
    println!();
    println!("{}  {}", "Format:".cyan(), loaded.format.name());
    println!();
    print!("{}", printer.output);

    if show_stats {
        let mut stats = StatsCollector::default();
        if let Err(never) = traverse(tree, &mut stats) {
            match never {}
        }
        println!();
        println!("{}", "Statistics:".cyan());
        println!("  Groups: {}", stats.group_count);
        println!("  Records: {}", stats.record_count);
        println!("  Unconditional records: {}", stats.unconditional_count);
        println!("  Max depth: {}", stats.max_depth);
    }
    Ok(())
}
