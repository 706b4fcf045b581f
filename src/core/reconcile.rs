//! Reconciliation engine: turns one reaction signal into an accepted or
//! rejected roster change.
//!
//! Each category holds at most one active selection per user. A new token in
//! the same category supersedes the previous one (its weight overwrites the
//! stored weight, and the old reaction is retracted). Categories are
//! independent of each other.

use crate::collab::Platform;
use crate::core::coordinator::Coordinator;
use crate::models::category::{Capacity, Category, CategoryKind, TokenRole};
use crate::models::ids::{MessageId, UserId};
use crate::models::signal::Signal;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    NotBound,
    OtherMessage,
    UnknownToken,
    DecorationRemoved,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    CapacityExceeded {
        category: String,
        requested: u32,
        available: u32,
    },
    SlotTaken {
        category: String,
        holder: UserId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ignored(IgnoreReason),
    Accepted {
        category: String,
        weight: u32,
        total: u32,
    },
    /// The user already holds what they selected.
    Unchanged { category: String },
    Rejected(Rejection),
    Removed {
        category: String,
        /// Weight left after the removal (0 when nothing remains).
        weight: u32,
        total: u32,
    },
    Decorated { token: String },
}

enum Resolved {
    Roster(Category, u32),
    Decoration(String),
}

impl<P: Platform> Coordinator<P> {
    /// Reconcile one signal. Runs to completion before returning.
    pub fn handle(&mut self, signal: Signal) -> Outcome {
        let Some(bound) = self.store.snapshot().message_id else {
            return Outcome::Ignored(IgnoreReason::NotBound);
        };
        if signal.message() != bound {
            return Outcome::Ignored(IgnoreReason::OtherMessage);
        }

        let resolved = match self.model.classify(signal.token()) {
            Some(TokenRole::Roster { category, weight }) => {
                Resolved::Roster(category.clone(), weight)
            }
            Some(TokenRole::Decoration(d)) => Resolved::Decoration(d.message.clone()),
            None => {
                debug!(user = %signal.user(), token = signal.token(), "ignoring unrecognized token");
                return Outcome::Ignored(IgnoreReason::UnknownToken);
            }
        };

        match (signal, resolved) {
            (Signal::Added { user, message, token }, Resolved::Roster(category, weight)) => {
                self.select(user, message, &category, &token, weight)
            }
            (Signal::Removed { user, message, token }, Resolved::Roster(category, _)) => {
                self.deselect(user, message, &category, &token)
            }
            (Signal::Added { user, message, token }, Resolved::Decoration(text)) => {
                self.notify(user, &text);
                self.retract(message, &token, user);
                Outcome::Decorated { token }
            }
            (Signal::Removed { .. }, Resolved::Decoration(_)) => {
                Outcome::Ignored(IgnoreReason::DecorationRemoved)
            }
        }
    }

    fn select(
        &mut self,
        user: UserId,
        message: MessageId,
        category: &Category,
        token: &str,
        weight: u32,
    ) -> Outcome {
        let prior = self.store.weight_of(user, &category.id);
        let current_total = self.store.total_weight(&category.id);
        let capacity = category.capacity_limit();

        if category.kind == CategoryKind::SingleSlot {
            if prior > 0 {
                return Outcome::Unchanged {
                    category: category.id.clone(),
                };
            }
            let holder = self
                .store
                .members(&category.id)
                .find(|(u, _)| *u != user)
                .map(|(u, _)| u);
            if let Some(holder) = holder {
                return self.reject(
                    user,
                    message,
                    token,
                    category,
                    Rejection::SlotTaken {
                        category: category.id.clone(),
                        holder,
                    },
                );
            }
        }

        let candidate_total = current_total - prior + weight;
        if !capacity.admits(candidate_total) {
            let available = capacity.remaining(current_total - prior).unwrap_or(0);
            return self.reject(
                user,
                message,
                token,
                category,
                Rejection::CapacityExceeded {
                    category: category.id.clone(),
                    requested: weight,
                    available,
                },
            );
        }

        self.store.set_category_weight(user, &category.id, weight);
        self.supersede(user, message, category, token);
        self.store.commit();
        self.republish();

        let total = self.store.total_weight(&category.id);
        info!(user = %user, category = %category.id, weight, total, "selection accepted");
        self.record(
            "join",
            &format!("{} {}", category.id, user),
            &format!("{} ({}), total {}/{}", token, Category::level_label(weight), total, capacity),
        );

        Outcome::Accepted {
            category: category.id.clone(),
            weight,
            total,
        }
    }

    /// Retract the user's other reactions in `category` so exactly one stays.
    fn supersede(&mut self, user: UserId, message: MessageId, category: &Category, keep: &str) {
        let active = match self.platform.active_tokens_for(message, &category.tokens) {
            Ok(a) => a,
            Err(e) => {
                warn!(error = %e, "could not read reactions to supersede");
                return;
            }
        };
        for (u, t) in active {
            if u == user && t != keep {
                self.retract(message, &t, user);
            }
        }
    }

    fn reject(
        &mut self,
        user: UserId,
        message: MessageId,
        token: &str,
        category: &Category,
        rejection: Rejection,
    ) -> Outcome {
        self.retract(message, token, user);
        let text = self.rejection_text(category, &rejection);
        self.notify(user, &text);

        info!(user = %user, category = %category.id, ?rejection, "selection rejected");
        self.record("reject", &format!("{} {}", category.id, user), &text);
        Outcome::Rejected(rejection)
    }

    fn rejection_text(&self, category: &Category, rejection: &Rejection) -> String {
        let alt = self.model.alternative_for(category);
        match rejection {
            Rejection::SlotTaken { holder, .. } => format!(
                "🚫 **The {} slot is already taken** by {}.",
                category.label.to_lowercase(),
                holder.mention()
            ),
            Rejection::CapacityExceeded {
                requested,
                available,
                ..
            } if *available > 0 => {
                let hint = match alt {
                    Some(a) => format!(
                        "Try a smaller group or react with {} to join {}!",
                        a.solo_token(),
                        a.label.to_lowercase()
                    ),
                    None => "Try a smaller group!".to_string(),
                };
                format!(
                    "🚫 **Not enough {} spots!** You requested {} spot{} but only {} remain. {}",
                    category.label.to_lowercase(),
                    requested,
                    if *requested != 1 { "s" } else { "" },
                    available,
                    hint
                )
            }
            Rejection::CapacityExceeded { .. } => match alt {
                Some(a) => format!(
                    "🚫 **{} are full!** Try reacting with {} to join {}, or come watch the mayhem unfold! 🍿",
                    category.label,
                    a.solo_token(),
                    a.label.to_lowercase()
                ),
                None => format!(
                    "🚫 **{} are full!** Come watch the mayhem unfold! 🍿",
                    category.label
                ),
            },
        }
    }

    fn deselect(
        &mut self,
        user: UserId,
        message: MessageId,
        category: &Category,
        token: &str,
    ) -> Outcome {
        let prior = self.store.weight_of(user, &category.id);
        let others_total = self.store.total_weight(&category.id) - prior;
        let capacity = category.capacity_limit();

        let weight = match self.platform.active_tokens_for(message, &category.tokens) {
            Ok(active) => {
                let mut remaining: Vec<u32> = active
                    .into_iter()
                    .filter(|(u, t)| *u == user && t != token)
                    .map(|(_, t)| category.weight_for(&t))
                    .filter(|w| *w > 0)
                    .collect();
                remaining.sort_unstable();
                next_weight(category, capacity, others_total, prior, &remaining)
            }
            // without the reaction list only the removed token itself is known
            Err(e) => {
                warn!(error = %e, "could not read remaining reactions");
                if category.weight_for(token) == prior {
                    0
                } else {
                    prior
                }
            }
        };

        self.store.set_category_weight(user, &category.id, weight);
        self.store.commit();
        self.republish();

        let total = self.store.total_weight(&category.id);
        info!(user = %user, category = %category.id, weight, total, "selection removed");
        self.record(
            "leave",
            &format!("{} {}", category.id, user),
            &format!("{} removed, now {}, total {}/{}", token, Category::level_label(weight), total, capacity),
        );

        Outcome::Removed {
            category: category.id.clone(),
            weight,
            total,
        }
    }

    fn retract(&mut self, message: MessageId, token: &str, user: UserId) {
        if let Err(e) = self.platform.retract_input(message, token, user) {
            warn!(user = %user, token, error = %e, "could not retract reaction");
        }
    }
}

/// Weight left after a removal. With several reactions still present the
/// lowest one that fits wins. A single-slot category only keeps a slot the
/// user already held.
fn next_weight(
    category: &Category,
    capacity: Capacity,
    others_total: u32,
    prior: u32,
    remaining: &[u32],
) -> u32 {
    if category.kind == CategoryKind::SingleSlot && prior == 0 {
        return 0;
    }
    remaining
        .iter()
        .copied()
        .find(|w| capacity.admits(others_total + w))
        .unwrap_or(0)
}
