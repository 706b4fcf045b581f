// src/export/model.rs

use crate::models::category::{CategoryKind, CategoryModel};
use crate::store::RosterStore;
use serde::Serialize;

/// Flat roster row for CSV / JSON export.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct RosterExport {
    pub category: String,
    pub rank: usize,
    pub user_id: u64,
    pub weight: u32,
    pub guests: u32,
}

/// One row per user per category, ranked in store order.
pub(crate) fn roster_rows(model: &CategoryModel, store: &RosterStore) -> Vec<RosterExport> {
    model
        .categories()
        .iter()
        .flat_map(|c| {
            store
                .members(&c.id)
                .enumerate()
                .map(|(i, (user, w))| RosterExport {
                    category: c.id.clone(),
                    rank: i + 1,
                    user_id: user.0,
                    weight: w,
                    guests: if c.kind == CategoryKind::Weighted { w - 1 } else { 0 },
                })
                .collect::<Vec<_>>()
        })
        .collect()
}
