//! One-way mirror of roster totals into the scheduled event description.

use crate::collab::{EventDraft, EventMirror};
use crate::errors::{AppError, AppResult};
use crate::models::category::{Capacity, CategoryModel};
use crate::models::ids::EventId;
use crate::models::settings::EventSettings;
use crate::store::RosterStore;
use chrono::{DateTime, Duration, FixedOffset};
use tracing::{debug, warn};

pub fn describe(settings: &EventSettings, model: &CategoryModel, store: &RosterStore) -> String {
    let mut out = format!("{}\n\n", settings.title);
    for c in model.categories() {
        let total = store.total_weight(&c.id);
        match c.capacity_limit() {
            Capacity::Bounded(max) => out.push_str(&format!("{}: {}/{}\n", c.label, total, max)),
            Capacity::Unbounded => out.push_str(&format!("{}: {}\n", c.label, total)),
        }
    }
    out.push_str("\nReact to the signup message to join!");
    out
}

/// End of an event starting at `start`, from the configured duration.
pub fn event_end(
    settings: &EventSettings,
    start: DateTime<FixedOffset>,
) -> AppResult<DateTime<FixedOffset>> {
    settings.validate()?;
    Duration::try_minutes(settings.duration_minutes)
        .and_then(|d| start.checked_add_signed(d))
        .ok_or_else(|| {
            AppError::Config(format!(
                "event duration of {} minutes is out of range",
                settings.duration_minutes
            ))
        })
}

pub fn draft(
    settings: &EventSettings,
    model: &CategoryModel,
    store: &RosterStore,
    start: DateTime<FixedOffset>,
    end: DateTime<FixedOffset>,
) -> EventDraft {
    EventDraft {
        name: settings.title.clone(),
        description: describe(settings, model, store),
        start,
        end,
        location: settings.location.clone(),
    }
}

/// Create the event once at setup. `None` when the platform refuses.
pub fn create<M: EventMirror + ?Sized>(mirror: &mut M, draft: &EventDraft) -> Option<EventId> {
    match mirror.create_event(draft) {
        Ok(id) => {
            debug!(event = %id, "scheduled event created");
            Some(id)
        }
        Err(e) => {
            warn!(error = %e, "could not create scheduled event");
            None
        }
    }
}

/// Push current totals if an event is bound. Failures are logged only.
pub fn sync<M: EventMirror + ?Sized>(
    mirror: &mut M,
    event: Option<EventId>,
    settings: &EventSettings,
    model: &CategoryModel,
    store: &RosterStore,
) {
    let Some(event) = event else {
        return;
    };
    let description = describe(settings, model, store);
    if let Err(e) = mirror.update_description(event, &description) {
        warn!(event = %event, error = %e, "failed to update scheduled event");
    }
}
