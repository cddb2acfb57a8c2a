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

//! Compiler session
//!
//! All state gathered while compiling one grammar lives in a single
//! `CompilerSession` that is handed from stage to stage:
//!
//! - `transition`: typed transitions and their command union
//! - `family`: per-family declarations

pub mod family;
pub mod transition;

pub use family::{FamilyInfo, FlipperDef, LookBackRule};
pub use transition::{Command, Transition};

use crate::diagnostics::Diagnostics;
use crate::error::{GrammarError, GrammarResult};
use luddite_common::{Family, StateId};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Language-detection metadata, kept in declaration order without duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DetectionInfo {
    pub namespaces: Vec<String>,
    pub public_ids: Vec<String>,
    pub system_ids: Vec<String>,
}

impl DetectionInfo {
    fn add(list: &mut Vec<String>, value: &str) {
        if !list.iter().any(|v| v == value) {
            list.push(value.to_string());
        }
    }

    pub fn add_namespace(&mut self, value: &str) {
        Self::add(&mut self.namespaces, value);
    }

    pub fn add_public_id(&mut self, value: &str) {
        Self::add(&mut self.public_ids, value);
    }

    pub fn add_system_id(&mut self, value: &str) {
        Self::add(&mut self.system_ids, value);
    }

    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty() && self.public_ids.is_empty() && self.system_ids.is_empty()
    }
}

/// Everything known about the grammar being compiled
#[derive(Debug, Default)]
pub struct CompilerSession {
    state_ids: HashMap<String, StateId>,
    state_names: Vec<String>,
    owners: HashMap<StateId, Family>,
    referenced: BTreeSet<StateId>,
    blocks: BTreeMap<StateId, Vec<Transition>>,
    families: BTreeMap<Family, FamilyInfo>,
    language: Option<String>,
    unknown_families: Vec<String>,
    detection: DetectionInfo,
    diagnostics: Diagnostics,
}

impl CompilerSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for a state name, allocating the next one on first sight
    pub fn intern_state_name(&mut self, name: &str) -> StateId {
        if let Some(id) = self.state_ids.get(name) {
            return *id;
        }
        self.state_names.push(name.to_string());
        let id = StateId(self.state_names.len() as u32);
        self.state_ids.insert(name.to_string(), id);
        id
    }

    /// Intern a state name used as a destination
    pub fn reference_state(&mut self, name: &str) -> StateId {
        let id = self.intern_state_name(name);
        self.referenced.insert(id);
        id
    }

    /// Name a state was interned under
    pub fn state_name(&self, id: StateId) -> Option<&str> {
        let index = (id.0 as usize).checked_sub(1)?;
        self.state_names.get(index).map(String::as_str)
    }

    /// Id of an already interned state
    pub fn state_id(&self, name: &str) -> Option<StateId> {
        self.state_ids.get(name).copied()
    }

    pub fn state_count(&self) -> usize {
        self.state_names.len()
    }

    /// Record the owning family of a state. Returns false and keeps the
    /// existing owner when one was already set.
    pub fn set_family_owner(&mut self, state: StateId, family: Family) -> bool {
        if self.owners.contains_key(&state) {
            return false;
        }
        self.owners.insert(state, family);
        true
    }

    /// Owning family of a state
    pub fn family_owner(&self, state: StateId) -> GrammarResult<Family> {
        self.owners.get(&state).copied().ok_or_else(|| {
            GrammarError::DanglingState(self.state_name(state).unwrap_or("<unnamed>").to_string())
        })
    }

    /// States used as destinations, in id order
    pub fn referenced_states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.referenced.iter().copied()
    }

    pub fn has_block(&self, state: StateId) -> bool {
        self.blocks.contains_key(&state)
    }

    pub fn insert_block(&mut self, state: StateId, transitions: Vec<Transition>) {
        self.blocks.insert(state, transitions);
    }

    /// Transition blocks in state id order
    pub fn blocks(&self) -> impl Iterator<Item = (StateId, &[Transition])> {
        self.blocks.iter().map(|(id, transitions)| (*id, transitions.as_slice()))
    }

    pub fn block(&self, state: StateId) -> Option<&[Transition]> {
        self.blocks.get(&state).map(Vec::as_slice)
    }

    /// Declarations of a family, created on first use
    pub fn family_info_mut(&mut self, family: Family) -> &mut FamilyInfo {
        self.families.entry(family).or_insert_with(|| FamilyInfo::new(family))
    }

    pub fn family_info(&self, family: Family) -> Option<&FamilyInfo> {
        self.families.get(&family)
    }

    /// Families with any declarations, in family order
    pub fn families(&self) -> impl Iterator<Item = &FamilyInfo> {
        self.families.values()
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Assign the language name. Repeating the same name is accepted.
    pub fn set_language(&mut self, name: &str) -> GrammarResult<()> {
        match &self.language {
            Some(existing) if existing != name => Err(GrammarError::ConflictingLanguage {
                existing: existing.clone(),
                new: name.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                self.language = Some(name.to_string());
                Ok(())
            }
        }
    }

    pub fn record_unknown_family(&mut self, name: &str) {
        if !self.unknown_families.iter().any(|f| f == name) {
            self.unknown_families.push(name.to_string());
        }
    }

    pub fn unknown_families(&self) -> &[String] {
        &self.unknown_families
    }

    pub fn detection(&self) -> &DetectionInfo {
        &self.detection
    }

    pub fn detection_mut(&mut self) -> &mut DetectionInfo {
        &mut self.detection
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Split the session into its diagnostics and detection metadata
    pub fn into_reports(self) -> (Diagnostics, DetectionInfo) {
        (self.diagnostics, self.detection)
    }
}
