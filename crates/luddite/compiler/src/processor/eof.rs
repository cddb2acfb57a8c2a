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

//! End-of-buffer transition synthesis
//!
//! A state whose painting transitions all agree on one color gets a trailing
//! `\z` transition that paints the rest of the buffer with that color. Any
//! other shape is left to the grammar author and reported.

use crate::grammar::PaintMode;
use crate::session::{Command, Transition};
use luddite_common::{MatchKind, StyleRef};

/// Result of inspecting one state's transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EofOutcome {
    /// The state already matches `\z` itself
    AlreadyHandled,
    /// Append this transition
    Synthesized(Transition),
    /// Nothing appended; the reason goes to the build log
    Skipped(String),
}

/// Compare styles by value when both resolve, by spelling otherwise
fn normalized(style: &StyleRef) -> StyleRef {
    match style.resolve() {
        Some(id) => StyleRef::Number(id),
        None => style.clone(),
    }
}

/// Decide whether a state gets a synthetic `\z` transition
pub fn synthesize_eof(transitions: &[Transition]) -> EofOutcome {
    let mut common: Option<&StyleRef> = None;
    let mut colors_disagree = false;
    let mut missing_commands = false;
    let mut explicit_eof = false;

    for transition in transitions {
        if transition.matches_eof() {
            explicit_eof = true;
        }
        if transition.commands.is_empty() {
            missing_commands = true;
            continue;
        }
        let Some(color) = transition.paint_color() else {
            continue;
        };
        match common {
            None => common = Some(color),
            Some(seen) if normalized(seen) != normalized(color) => colors_disagree = true,
            Some(_) => {}
        }
    }

    if explicit_eof {
        return EofOutcome::AlreadyHandled;
    }
    if missing_commands {
        return EofOutcome::Skipped("some transitions have no commands; add an explicit /\\z/ transition".into());
    }
    if colors_disagree {
        return EofOutcome::Skipped("transitions paint with different colors; add an explicit /\\z/ transition".into());
    }
    let Some(color) = common else {
        return EofOutcome::Skipped("no paint color found; add an explicit /\\z/ transition".into());
    };

    EofOutcome::Synthesized(Transition {
        matcher: MatchKind::Regex { pattern: "\\z".to_string(), ignore_case: false },
        target: None,
        token_check: false,
        commands: vec![Command::Paint { mode: PaintMode::Upto, style: color.clone() }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use luddite_common::StateId;

    fn painting(mode: PaintMode, style: &str) -> Transition {
        Transition::new(
            MatchKind::Literal("x".into()),
            Some(StateId(2)),
            false,
            vec![Command::Paint { mode, style: StyleRef::from(style) }],
        )
        .unwrap()
    }

    #[test]
    fn test_single_color_synthesizes() {
        let transitions = vec![
            painting(PaintMode::Upto, "SCE_UDL_SSL_DEFAULT"),
            painting(PaintMode::Include, "SCE_UDL_SSL_DEFAULT"),
        ];
        let EofOutcome::Synthesized(eof) = synthesize_eof(&transitions) else {
            panic!("expected a synthetic transition");
        };
        assert!(eof.matches_eof());
        assert_eq!(eof.paint(PaintMode::Upto), Some(&StyleRef::from("SCE_UDL_SSL_DEFAULT")));
    }

    #[test]
    fn test_name_and_number_of_same_style_agree() {
        let mut numeric = painting(PaintMode::Upto, "unused");
        numeric.commands = vec![Command::Paint { mode: PaintMode::Upto, style: StyleRef::Number(31) }];
        let transitions = vec![painting(PaintMode::Upto, "SCE_UDL_SSL_DEFAULT"), numeric];
        assert!(matches!(synthesize_eof(&transitions), EofOutcome::Synthesized(_)));
    }

    #[test]
    fn test_disagreeing_colors_skip() {
        let transitions = vec![
            painting(PaintMode::Upto, "SCE_UDL_SSL_DEFAULT"),
            painting(PaintMode::Upto, "SCE_UDL_SSL_STRING"),
        ];
        assert!(matches!(synthesize_eof(&transitions), EofOutcome::Skipped(_)));
    }

    #[test]
    fn test_missing_commands_skip() {
        let bare = Transition::new(MatchKind::Literal("y".into()), None, false, vec![]).unwrap();
        let transitions = vec![painting(PaintMode::Upto, "SCE_UDL_SSL_DEFAULT"), bare];
        assert!(matches!(synthesize_eof(&transitions), EofOutcome::Skipped(_)));
    }

    #[test]
    fn test_explicit_eof_is_kept() {
        let mut transitions = vec![painting(PaintMode::Upto, "SCE_UDL_SSL_DEFAULT")];
        transitions.push(
            Transition::new(MatchKind::Regex { pattern: "\\z".into(), ignore_case: false }, None, false, vec![
                Command::Paint { mode: PaintMode::Upto, style: StyleRef::from("SCE_UDL_SSL_STRING") },
            ])
            .unwrap(),
        );
        assert_eq!(synthesize_eof(&transitions), EofOutcome::AlreadyHandled);
    }

    #[test]
    fn test_no_color_skips() {
        assert!(matches!(synthesize_eof(&[]), EofOutcome::Skipped(_)));
    }
}
