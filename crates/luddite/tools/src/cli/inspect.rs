// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! `luddite inspect`: summary of a compiled resource table

use anyhow::{Context, Result};
use clap::Args;
use luddite_common::{CompiledTable, TableReader};
use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Resource table written by `luddite compile`
    #[arg(value_name = "TABLE")]
    pub table: PathBuf,

    /// Print the whole table as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the inspect command, returning the text to print
pub fn run_inspect(args: &InspectArgs) -> Result<String> {
    let text =
        fs::read_to_string(&args.table).with_context(|| format!("Failed to read table {}", args.table.display()))?;
    let table = TableReader::new()
        .read(&text)
        .with_context(|| format!("Failed to read table {}", args.table.display()))?;

    if args.json {
        return Ok(serde_json::to_string_pretty(&table)?);
    }
    Ok(summarize(&table))
}

/// Human-readable overview of a table
pub fn summarize(table: &CompiledTable) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "language: {} (table version {})", table.language, table.version);

    for family in &table.families {
        let initial = family.initial_state.map_or_else(|| "-".to_string(), |state| state.0.to_string());
        let _ = write!(out, "family {}: initial state {initial}", family.family);
        if let Some(sublanguage) = &family.sublanguage {
            let _ = write!(out, ", sublanguage {sublanguage}");
        }
        if !family.keywords.is_empty() {
            let _ = write!(out, ", {} keywords", family.keywords.len());
        }
        if let Some(look_back) = &family.look_back {
            let _ = write!(out, ", {} look-back tests", look_back.tests.len());
        }
        out.push('\n');
    }

    let _ = writeln!(out, "states: {} ({} transitions)", table.states.len(), table.transition_count());
    for state in &table.states {
        let _ = writeln!(out, "  {:>4} {:<6} {} transitions", state.id.0, state.family.name(), state.transitions.len());
    }
    for unique in &table.unique_states {
        let _ = writeln!(out, "unique: style {} -> state {}", unique.style, unique.state.0);
    }
    out
}
