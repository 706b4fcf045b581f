//! Summary projector: roster state → the signup message body.

use crate::errors::{AppError, AppResult};
use crate::models::category::{Capacity, Category, CategoryKind, CategoryModel};
use crate::models::ids::UserId;
use crate::models::settings::EventSettings;
use crate::models::snapshot::RosterSnapshot;
use chrono::{DateTime, FixedOffset};
use std::fmt::Write;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextOccurrence {
    pub at: DateTime<FixedOffset>,
    pub formatted: String,
    /// Platform timestamp markup, rendered in each reader's local time.
    pub tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterLine {
    pub rank: usize,
    pub user: UserId,
    /// Present only where the weight is a magnitude (weighted categories).
    pub weight: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub category: String,
    pub heading: String,
    pub lines: Vec<RosterLine>,
    pub placeholder: Option<String>,
    pub total: u32,
    pub capacity: Capacity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub title: String,
    pub tagline: String,
    pub next_occurrence: Option<NextOccurrence>,
    pub sections: Vec<SummarySection>,
    pub instructions: String,
    pub footer: String,
    pub error: Option<String>,
}

impl Summary {
    /// Minimal valid summary used when the full one cannot be built.
    pub fn fallback(title: &str, reason: &str) -> Self {
        Self {
            title: title.to_string(),
            tagline: String::new(),
            next_occurrence: None,
            sections: Vec::new(),
            instructions: String::new(),
            footer: String::new(),
            error: Some(format!("⚠️ Signup summary unavailable ({reason})")),
        }
    }

    pub fn section(&self, category: &str) -> Option<&SummarySection> {
        self.sections.iter().find(|s| s.category == category)
    }

    pub fn is_fallback(&self) -> bool {
        self.error.is_some()
    }

    /// Markdown body posted on the board and printed by `status`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "**{}**", self.title);

        if let Some(err) = &self.error {
            let _ = writeln!(out, "{}", err);
            return out;
        }

        let _ = writeln!(out, "{}", self.tagline);

        if let Some(next) = &self.next_occurrence {
            let _ = writeln!(out, "\n**📅 Next Game**\n{} ({})", next.tag, next.formatted);
        }

        for s in &self.sections {
            let _ = writeln!(out, "\n**{}**", s.heading);
            if let Some(p) = &s.placeholder {
                let _ = writeln!(out, "{}", p);
            }
            for line in &s.lines {
                let _ = writeln!(out, "{}. {}{}", line.rank, line.user.mention(), guests_text(line.weight));
            }
        }

        let _ = writeln!(out, "\n**How to Join**\n{}", self.instructions);

        if !self.footer.is_empty() {
            let _ = writeln!(out, "\n{}", self.footer);
        }
        out
    }
}

fn guests_text(weight: Option<u32>) -> String {
    match weight {
        Some(w) if w > 1 => {
            let guests = w - 1;
            format!(" (+{} guest{})", guests, if guests != 1 { "s" } else { "" })
        }
        _ => String::new(),
    }
}

pub fn format_occurrence(at: DateTime<FixedOffset>) -> NextOccurrence {
    NextOccurrence {
        formatted: at.format("%A, %B %-d, %Y at %H:%M (UTC%:z)").to_string(),
        tag: format!("<t:{}:F>", at.timestamp()),
        at,
    }
}

fn heading(category: &Category, total: u32) -> String {
    let icon = if category.icon.is_empty() {
        String::new()
    } else {
        format!("{} ", category.icon)
    };
    match category.capacity_limit() {
        Capacity::Bounded(max) => format!("{}{} ({}/{})", icon, category.label, total, max),
        Capacity::Unbounded => format!("{}{} ({})", icon, category.label, total),
    }
}

fn build_section(snapshot: &RosterSnapshot, category: &Category) -> SummarySection {
    let lines: Vec<RosterLine> = snapshot
        .entries
        .iter()
        .filter_map(|e| {
            let w = e.weight(&category.id);
            (w > 0).then_some((e.user_id, w))
        })
        .enumerate()
        .map(|(i, (user, w))| RosterLine {
            rank: i + 1,
            user,
            weight: (category.kind == CategoryKind::Weighted).then_some(w),
        })
        .collect();

    let total = snapshot.entries.iter().map(|e| e.weight(&category.id)).sum();

    SummarySection {
        category: category.id.clone(),
        heading: heading(category, total),
        placeholder: lines.is_empty().then(|| category.placeholder_text()),
        lines,
        total,
        capacity: category.capacity_limit(),
    }
}

/// Usage text listing every token and what it does.
pub fn instructions(model: &CategoryModel) -> String {
    let mut out = String::new();
    for c in model.categories() {
        let _ = writeln!(out, "**{}:**", c.label);
        match c.kind {
            CategoryKind::Weighted => {
                let _ = writeln!(out, "{} Solo", c.solo_token());
                let levels: Vec<String> = c
                    .tokens
                    .iter()
                    .enumerate()
                    .skip(1)
                    .map(|(i, t)| format!("{} +{}", t, i))
                    .collect();
                if !levels.is_empty() {
                    let _ = writeln!(out, "{}", levels.join(" "));
                }
            }
            CategoryKind::SingleSlot => {
                let _ = writeln!(out, "{} Claim the {} slot", c.solo_token(), c.label.to_lowercase());
            }
            CategoryKind::Flag => {
                let _ = writeln!(out, "{} Add yourself to {}", c.solo_token(), c.label.to_lowercase());
            }
        }
        out.push('\n');
    }
    for d in model.decorations() {
        let _ = writeln!(out, "{} {}", d.token, d.label);
    }
    out.trim_end().to_string()
}

pub fn try_project(
    snapshot: &RosterSnapshot,
    model: &CategoryModel,
    settings: &EventSettings,
    occurrence: AppResult<DateTime<FixedOffset>>,
) -> AppResult<Summary> {
    let at = occurrence?;

    if model.categories().is_empty() {
        return Err(AppError::Category("no categories configured".into()));
    }

    Ok(Summary {
        title: settings.title.clone(),
        tagline: settings.tagline.clone(),
        next_occurrence: Some(format_occurrence(at)),
        sections: model
            .categories()
            .iter()
            .map(|c| build_section(snapshot, c))
            .collect(),
        instructions: instructions(model),
        footer: settings.footer.clone(),
        error: None,
    })
}

/// Never fails: any error degrades to [`Summary::fallback`].
pub fn project(
    snapshot: &RosterSnapshot,
    model: &CategoryModel,
    settings: &EventSettings,
    occurrence: AppResult<DateTime<FixedOffset>>,
) -> Summary {
    match try_project(snapshot, model, settings, occurrence) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "failed to build signup summary");
            Summary::fallback(&settings.title, &e.to_string())
        }
    }
}
