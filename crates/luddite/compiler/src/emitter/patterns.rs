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

//! `$NAME` pattern variable expansion

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static VARIABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\\?)\$([A-Za-z_][A-Za-z0-9_]*)").expect("pattern variable regex is valid"));

/// Result of expanding one regex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub pattern: String,
    /// Referenced names with no pattern definition
    pub unresolved: Vec<String>,
    /// Expansion was still making progress when the limit was reached
    pub limit_reached: bool,
}

/// Substitute pattern references in `pattern`, repeating so patterns may
/// refer to other patterns. `\$NAME` is left alone.
pub fn expand_patterns(pattern: &str, patterns: &BTreeMap<String, String>, limit: usize) -> Expansion {
    let mut current = pattern.to_string();
    let mut limit_reached = true;

    for _ in 0..limit {
        let mut changed = false;
        let next = VARIABLE
            .replace_all(&current, |caps: &Captures| {
                let whole = caps[0].to_string();
                if !caps[1].is_empty() {
                    return whole;
                }
                match patterns.get(&caps[2]) {
                    Some(value) => {
                        changed = true;
                        value.clone()
                    }
                    None => whole,
                }
            })
            .into_owned();
        current = next;
        if !changed {
            limit_reached = false;
            break;
        }
    }

    let mut unresolved: Vec<String> = Vec::new();
    for caps in VARIABLE.captures_iter(&current) {
        let name = &caps[2];
        if caps[1].is_empty() && !patterns.contains_key(name) && !unresolved.iter().any(|n| n == name) {
            unresolved.push(name.to_string());
        }
    }

    Expansion { pattern: current, unresolved, limit_reached }
}
