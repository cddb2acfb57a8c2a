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

//! Typed transitions
//!
//! Commands form one tagged union. Combinations the runtime cannot honor
//! are rejected when a `Transition` is built.

use crate::error::TransitionError;
use crate::grammar::PaintMode;
use luddite_common::{MatchKind, StateId, StyleRef};

/// Action performed when a transition fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Paint { mode: PaintMode, style: StyleRef },
    Push(StateId),
    Pop,
    Replace(StateId),
    AtEol(StateId),
    SetDelimiter { group: u32, opposite: bool },
    ClearDelimiter,
    KeepDelimiter,
    Redo,
    NoKeyword,
}

impl Command {
    fn is_stack_op(&self) -> bool {
        matches!(self, Command::Push(_) | Command::Pop | Command::Replace(_))
    }

    fn is_delimiter_op(&self) -> bool {
        matches!(self, Command::SetDelimiter { .. } | Command::ClearDelimiter | Command::KeepDelimiter)
    }
}

/// A validated transition of one state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub matcher: MatchKind,
    pub target: Option<StateId>,
    pub token_check: bool,
    pub commands: Vec<Command>,
}

impl Transition {
    /// Build a transition, rejecting command combinations that conflict
    pub fn new(
        matcher: MatchKind,
        target: Option<StateId>,
        token_check: bool,
        commands: Vec<Command>,
    ) -> Result<Self, TransitionError> {
        let has_push = commands.iter().any(|c| matches!(c, Command::Push(_)));
        let has_pop = commands.iter().any(|c| matches!(c, Command::Pop));
        if has_push && has_pop {
            return Err(TransitionError::PushAndPop);
        }
        if commands.iter().filter(|c| c.is_stack_op()).count() > 1 {
            return Err(TransitionError::MultipleStackOps);
        }
        if commands.iter().filter(|c| c.is_delimiter_op()).count() > 1 {
            return Err(TransitionError::MultipleDelimiterOps);
        }
        if commands.iter().filter(|c| matches!(c, Command::AtEol(_))).count() > 1 {
            return Err(TransitionError::MultipleAtEol);
        }
        for mode in [PaintMode::Upto, PaintMode::Include] {
            let count = commands.iter().filter(|c| matches!(c, Command::Paint { mode: m, .. } if *m == mode)).count();
            if count > 1 {
                return Err(TransitionError::DuplicatePaint(mode));
            }
        }
        Ok(Self { matcher, target, token_check, commands })
    }

    /// Style of the paint command with the given mode
    pub fn paint(&self, mode: PaintMode) -> Option<&StyleRef> {
        self.commands.iter().find_map(|c| match c {
            Command::Paint { mode: m, style } if *m == mode => Some(style),
            _ => None,
        })
    }

    /// Paint color used for EOF synthesis: upto, else include
    pub fn paint_color(&self) -> Option<&StyleRef> {
        self.paint(PaintMode::Upto).or_else(|| self.paint(PaintMode::Include))
    }

    /// Whether this transition already handles end of buffer
    pub fn matches_eof(&self) -> bool {
        match &self.matcher {
            MatchKind::Eof => true,
            MatchKind::Regex { pattern, .. } => pattern == "\\z",
            _ => false,
        }
    }

    /// Every style reference, for resolution checks
    pub fn style_refs(&self) -> impl Iterator<Item = &StyleRef> {
        self.commands.iter().filter_map(|c| match c {
            Command::Paint { style, .. } => Some(style),
            _ => None,
        })
    }
}
