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

//! Luddite Common Library
//!
//! Types shared by the UDL grammar compiler and the tools that consume its
//! output: lexer families, style constants, the compiled transition table
//! and its wire format.

pub mod error;
pub mod family;
pub mod style;
pub mod table;

pub use error::{TableFormatError, TableResult};
pub use family::{Family, UnknownFamily};
pub use style::{StyleId, StyleRef, UDL_STYLES, style_by_name, style_name};
pub use table::{
    CompiledState, CompiledTable, CompiledTransition, DelimiterOp, Flipper, KeywordStyles, LookBackTable, LookBackTest,
    MatchKind, Selector, StackOp, StateId, TableFamily, TableReader, TableVersion, TestAction, UniqueState,
};
