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

//! Configuration for indent computation

use serde::{Deserialize, Serialize};

/// How indentation is measured and rendered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndentConfig {
    /// Columns per indent level
    pub indent_width: usize,

    /// Render with tabs where possible
    pub use_tabs: bool,

    /// Columns per tab stop
    pub tab_width: usize,

    /// Maximum number of lines the backward walk may visit
    pub scan_window: usize,

    /// Indent levels added to the first line after a backslash continuation
    pub continuation_indent: usize,
}

impl Default for IndentConfig {
    fn default() -> Self {
        Self { indent_width: 4, use_tabs: false, tab_width: 8, scan_window: 100, continuation_indent: 1 }
    }
}

impl IndentConfig {
    /// Two-space indentation, the usual Ruby style
    pub fn ruby() -> Self {
        Self { indent_width: 2, ..Default::default() }
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_tabs(mut self, use_tabs: bool) -> Self {
        self.use_tabs = use_tabs;
        self
    }

    pub fn with_tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    pub fn with_scan_window(mut self, lines: usize) -> Self {
        self.scan_window = lines;
        self
    }

    pub fn with_continuation_indent(mut self, levels: usize) -> Self {
        self.continuation_indent = levels;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.indent_width == 0 {
            return Err("Indent width must be greater than 0".to_string());
        }
        if self.tab_width == 0 {
            return Err("Tab width must be greater than 0".to_string());
        }
        if self.scan_window == 0 {
            return Err("Scan window must cover at least one line".to_string());
        }
        Ok(())
    }

    /// Whitespace reaching `columns`
    pub fn render(&self, columns: usize) -> String {
        if self.use_tabs {
            let tabs = columns / self.tab_width;
            let spaces = columns % self.tab_width;
            format!("{}{}", "\t".repeat(tabs), " ".repeat(spaces))
        } else {
            " ".repeat(columns)
        }
    }
}
