use crate::models::ids::UserId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One user's standing across every category.
///
/// Only nonzero weights are kept in `weights`; boolean categories store 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user_id: UserId,
    #[serde(default)]
    pub weights: BTreeMap<String, u32>,
}

impl RosterEntry {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            weights: BTreeMap::new(),
        }
    }

    pub fn weight(&self, category: &str) -> u32 {
        self.weights.get(category).copied().unwrap_or(0)
    }

    /// Overwrite the weight held in `category`; 0 removes it.
    pub fn set(&mut self, category: &str, weight: u32) {
        if weight == 0 {
            self.weights.remove(category);
        } else {
            self.weights.insert(category.to_string(), weight);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weights.values().all(|w| *w == 0)
    }
}
