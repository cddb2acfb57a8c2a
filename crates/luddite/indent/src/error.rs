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

//! Error types for indent computation
//!
//! These never reach the editor: `IndentEngine::compute_indent` turns any of
//! them into an empty suggestion.

use thiserror::Error;

/// Internal failures of the backward walk
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndentError {
    #[error("Position {position} is past the end of the buffer ({length} bytes)")]
    PositionOutOfRange { position: usize, length: usize },

    #[error("Buffer has {styles} styles for {bytes} bytes of text")]
    StyleLengthMismatch { bytes: usize, styles: usize },

    #[error("Brace match for closer at {closer} returned {opener}, which is not before it")]
    BraceMismatch { closer: usize, opener: usize },

    #[error("Invalid indent configuration: {0}")]
    Configuration(String),
}

/// Result type for indent operations
pub type IndentResult<T> = Result<T, IndentError>;
