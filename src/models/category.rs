//! Category model: the fixed set of roster buckets, their capacities and the
//! selector tokens each one accepts.
//!
//! Tokens are ordered: the first token of a category is the solo level
//! (weight 1), the n-th token brings n-1 guests (weight n).

use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Levels solo, +1, +2 … each contributing its weight to the total.
    Weighted,
    /// One token, one holder.
    SingleSlot,
    /// One token, presence only.
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capacity {
    Bounded(u32),
    Unbounded,
}

impl Capacity {
    pub fn admits(&self, total: u32) -> bool {
        match self {
            Capacity::Bounded(max) => total <= *max,
            Capacity::Unbounded => true,
        }
    }

    /// Spots still free once `used` is occupied. `None` when uncapped.
    pub fn remaining(&self, used: u32) -> Option<u32> {
        match self {
            Capacity::Bounded(max) => Some(max.saturating_sub(used)),
            Capacity::Unbounded => None,
        }
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capacity::Bounded(max) => write!(f, "{}", max),
            Capacity::Unbounded => write!(f, "∞"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub icon: String,
    pub kind: CategoryKind,
    /// Absent means uncapped. Ignored for single-slot categories.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    pub tokens: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// Category suggested to users rejected for lack of room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative: Option<String>,
}

impl Category {
    pub fn capacity_limit(&self) -> Capacity {
        match (self.kind, self.capacity) {
            (CategoryKind::SingleSlot, _) => Capacity::Bounded(1),
            (_, Some(max)) => Capacity::Bounded(max),
            (_, None) => Capacity::Unbounded,
        }
    }

    /// Occupancy weight of `token`, 0 when the token does not belong here.
    pub fn weight_for(&self, token: &str) -> u32 {
        self.tokens
            .iter()
            .position(|t| t == token)
            .map(|i| i as u32 + 1)
            .unwrap_or(0)
    }

    pub fn solo_token(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or_default()
    }

    pub fn is_boolean(&self) -> bool {
        !matches!(self.kind, CategoryKind::Weighted)
    }

    pub fn placeholder_text(&self) -> String {
        self.placeholder
            .clone()
            .unwrap_or_else(|| "No one yet".to_string())
    }

    /// Human label of a selection level: "solo", "+1", "+2" …
    pub fn level_label(weight: u32) -> String {
        match weight {
            0 => "none".to_string(),
            1 => "solo".to_string(),
            w => format!("+{}", w - 1),
        }
    }

    fn validate(&self) -> AppResult<()> {
        if self.id.trim().is_empty() {
            return Err(AppError::Category("category id cannot be empty".into()));
        }
        if self.tokens.is_empty() {
            return Err(AppError::Category(format!(
                "category '{}' has no tokens",
                self.id
            )));
        }
        if self.is_boolean() && self.tokens.len() != 1 {
            return Err(AppError::Category(format!(
                "category '{}' is {:?} and must have exactly one token",
                self.id, self.kind
            )));
        }
        if self.kind == CategoryKind::SingleSlot && matches!(self.capacity, Some(c) if c != 1) {
            return Err(AppError::Category(format!(
                "single-slot category '{}' cannot declare capacity {}",
                self.id,
                self.capacity.unwrap_or_default()
            )));
        }
        if self.capacity == Some(0) {
            return Err(AppError::Category(format!(
                "category '{}' capacity must be positive",
                self.id
            )));
        }
        Ok(())
    }
}

/// A recognized token outside every roster category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub token: String,
    pub label: String,
    /// Sent privately to whoever uses the token.
    pub message: String,
}

/// What a token means once looked up in the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenRole<'a> {
    Roster {
        category: &'a Category,
        weight: u32,
    },
    Decoration(&'a Decoration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryModel {
    categories: Vec<Category>,
    decorations: Vec<Decoration>,
}

impl CategoryModel {
    pub fn new(categories: Vec<Category>, decorations: Vec<Decoration>) -> AppResult<Self> {
        let mut ids = HashSet::new();
        let mut tokens = HashSet::new();

        for c in &categories {
            c.validate()?;
            if !ids.insert(c.id.as_str()) {
                return Err(AppError::Category(format!("duplicate category id '{}'", c.id)));
            }
            for t in &c.tokens {
                if !tokens.insert(t.as_str()) {
                    return Err(AppError::Category(format!(
                        "token '{}' is used more than once",
                        t
                    )));
                }
            }
        }

        for d in &decorations {
            if !tokens.insert(d.token.as_str()) {
                return Err(AppError::Category(format!(
                    "decoration token '{}' is already used",
                    d.token
                )));
            }
        }

        for c in &categories {
            if let Some(alt) = &c.alternative
                && !ids.contains(alt.as_str())
            {
                return Err(AppError::Category(format!(
                    "category '{}' suggests unknown alternative '{}'",
                    c.id, alt
                )));
            }
        }

        Ok(Self {
            categories,
            decorations,
        })
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn decorations(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn weight_for(&self, category: &str, token: &str) -> u32 {
        self.get(category).map(|c| c.weight_for(token)).unwrap_or(0)
    }

    pub fn capacity_of(&self, category: &str) -> Option<Capacity> {
        self.get(category).map(Category::capacity_limit)
    }

    pub fn classify(&self, token: &str) -> Option<TokenRole<'_>> {
        for c in &self.categories {
            let weight = c.weight_for(token);
            if weight > 0 {
                return Some(TokenRole::Roster {
                    category: c,
                    weight,
                });
            }
        }
        self.decorations
            .iter()
            .find(|d| d.token == token)
            .map(TokenRole::Decoration)
    }

    pub fn alternative_for(&self, category: &Category) -> Option<&Category> {
        category.alternative.as_deref().and_then(|id| self.get(id))
    }

    /// Every recognized token, in the order it is seeded on the signup message.
    pub fn all_tokens(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|c| c.tokens.iter().cloned())
            .chain(self.decorations.iter().map(|d| d.token.clone()))
            .collect()
    }
}

impl Default for CategoryModel {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            decorations: default_decorations(),
        }
    }
}

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

pub fn default_categories() -> Vec<Category> {
    vec![
        Category {
            id: "main".into(),
            label: "Main Players".into(),
            icon: "⚔️".into(),
            kind: CategoryKind::Weighted,
            capacity: Some(15),
            tokens: tokens(&["⚔️", "🗡️", "⚡", "🛡️", "🏹", "🔥"]),
            placeholder: Some("No players signed up yet".into()),
            alternative: Some("travelers".into()),
        },
        Category {
            id: "travelers".into(),
            label: "Travelers".into(),
            icon: "🎒".into(),
            kind: CategoryKind::Weighted,
            capacity: Some(5),
            tokens: tokens(&["🎒", "🌟", "🎭", "🎨", "🎪", "🎯"]),
            placeholder: Some("No travelers signed up yet".into()),
            alternative: Some("main".into()),
        },
        Category {
            id: "storyteller".into(),
            label: "Storyteller".into(),
            icon: "📜".into(),
            kind: CategoryKind::SingleSlot,
            capacity: None,
            tokens: tokens(&["📜"]),
            placeholder: Some("No storyteller yet".into()),
            alternative: None,
        },
        Category {
            id: "interested".into(),
            label: "Interested".into(),
            icon: "👀".into(),
            kind: CategoryKind::Flag,
            capacity: None,
            tokens: tokens(&["👀"]),
            placeholder: Some("No one yet".into()),
            alternative: None,
        },
    ]
}

pub fn default_decorations() -> Vec<Decoration> {
    vec![Decoration {
        token: "🍿".into(),
        label: "Just watching".into(),
        message: "🍿 Spectators are always welcome! Come watch the mayhem unfold, \
                  no signup needed."
            .into(),
    }]
}
