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

//! Error types for reading and writing transition tables

use thiserror::Error;

/// Errors that can occur while decoding a table stream
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableFormatError {
    #[error("Table stream is empty")]
    EmptyStream,

    #[error("Table stream must start with a version record, found tag {0} on line 1")]
    MissingVersion(u8),

    #[error("Unsupported table format major version {found} (reader understands {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Unknown record tag {tag} on line {line}")]
    UnknownTag { tag: u8, line: usize },

    #[error("Malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("Record on line {line} needs a scratch buffer string but none was staged")]
    EmptyScratchBuffer { line: usize },

    #[error("Record on line {line} refers to {what} before it was declared")]
    OutOfOrder { line: usize, what: String },

    #[error("Scratch chunk on line {line} declares {declared} bytes but carries {actual}")]
    ChunkLengthMismatch { line: usize, declared: usize, actual: usize },
}

/// Result type for table format operations
pub type TableResult<T> = Result<T, TableFormatError>;
