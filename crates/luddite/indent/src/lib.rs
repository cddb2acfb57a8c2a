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

//! Luddite Indent Library
//!
//! Computes auto-indentation for a new line from an already lexed buffer by
//! walking backward over styled tokens, tracking keyword and bracket nesting.
//!
//! - `buffer`: the read-only host primitives and an in-memory buffer
//! - `token`: splitting a line into significant tokens
//! - `language`: style and keyword classes, with `ruby` as the built-in rules
//! - `engine`: the backward walk and rendering

pub mod buffer;
pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod ruby;
pub mod token;

pub use buffer::{BufferAccess, StyledBuffer};
pub use config::IndentConfig;
pub use engine::{IndentEngine, Resolution};
pub use error::{IndentError, IndentResult};
pub use language::{IndentLanguage, KeywordClass, StyleClass};
pub use ruby::RubyLanguage;
pub use token::{Token, line_tokens};
