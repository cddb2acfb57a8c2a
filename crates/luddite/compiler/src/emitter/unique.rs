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

//! Unique style-to-state map
//!
//! A state is identified by a style when every transition of the state that
//! paints "upto" uses that one style. Styles claimed by more than one state
//! are ambiguous and left out.

use luddite_common::{CompiledState, StateId, StyleId, UniqueState};
use std::collections::BTreeMap;

/// Style identifying a state, if its upto colors agree
fn state_style(state: &CompiledState) -> Option<StyleId> {
    let mut style = None;
    for transition in &state.transitions {
        match (style, transition.upto_style) {
            (_, None) => {}
            (None, Some(s)) => style = Some(s),
            (Some(seen), Some(s)) if seen != s => return None,
            (Some(_), Some(_)) => {}
        }
    }
    style
}

/// Compute unique-state records sorted by style
pub fn unique_states(states: &[CompiledState]) -> Vec<UniqueState> {
    let mut by_style: BTreeMap<StyleId, Vec<StateId>> = BTreeMap::new();
    for state in states {
        if let Some(style) = state_style(state) {
            by_style.entry(style).or_default().push(state.id);
        }
    }
    by_style
        .into_iter()
        .filter_map(|(style, owners)| match owners.as_slice() {
            [state] => Some(UniqueState { style, state: *state }),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use luddite_common::{CompiledTransition, Family, MatchKind};

    fn state(id: u32, styles: &[Option<StyleId>]) -> CompiledState {
        let transitions = styles
            .iter()
            .map(|style| {
                let mut transition = CompiledTransition::new(MatchKind::Literal("x".into()));
                transition.upto_style = *style;
                transition
            })
            .collect();
        CompiledState { id: StateId(id), family: Family::Ssl, transitions }
    }

    #[test]
    fn test_ambiguous_styles_are_dropped() {
        let states = vec![
            state(1, &[Some(35), None, Some(35)]),
            state(2, &[Some(31)]),
            state(3, &[Some(31)]),
            state(4, &[Some(32), Some(33)]),
            state(5, &[Some(14)]),
        ];
        assert_eq!(
            unique_states(&states),
            vec![UniqueState { style: 14, state: StateId(5) }, UniqueState { style: 35, state: StateId(1) }]
        );
    }
}
