//! Action tokens bound to inline buttons.
//!
//! Each entry into a state that shows buttons replaces the whole token set,
//! so a token from an earlier message can never match again.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use rc_domain::record::CrewType;

/// What pressing a button means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    ConfirmName,
    RetryName,
    SelectType(CrewType),
    ConfirmType,
    RetryType,
    ConfirmStartPhoto,
    RetryStartPhoto,
    ConfirmEndPhoto,
    RetryEndPhoto,
}

impl Action {
    /// Readable prefix of the token; the suffix is random.
    pub fn slug(self) -> &'static str {
        match self {
            Action::ConfirmName => "confirm_name",
            Action::RetryName => "retry_name",
            Action::SelectType(CrewType::Disponibilidad) => "type_disp",
            Action::SelectType(CrewType::Regular) => "type_reg",
            Action::ConfirmType => "confirm_type",
            Action::RetryType => "retry_type",
            Action::ConfirmStartPhoto => "confirm_start_photo",
            Action::RetryStartPhoto => "retry_start_photo",
            Action::ConfirmEndPhoto => "confirm_end_photo",
            Action::RetryEndPhoto => "retry_end_photo",
        }
    }
}

/// The set of tokens the current state accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTokens {
    active: BTreeMap<String, Action>,
}

impl ActionTokens {
    /// Replace the active set with one fresh token per action, returned in
    /// the order given.
    pub fn issue(&mut self, actions: &[Action]) -> Vec<(Action, String)> {
        self.active.clear();
        actions
            .iter()
            .map(|&action| {
                let token = mint(action);
                self.active.insert(token.clone(), action);
                (action, token)
            })
            .collect()
    }

    pub fn lookup(&self, token: &str) -> Option<Action> {
        self.active.get(token).copied()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.active.keys().map(String::as_str)
    }

    /// `(token, action)` pairs; confirm sorts before retry.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Action)> {
        self.active.iter().map(|(t, a)| (t.as_str(), *a))
    }
}

fn mint(action: Action) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}.{}", action.slug(), &id[..8])
}
