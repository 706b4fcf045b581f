//! Operator operations: posting a new signup, clearing and resetting it.

use crate::collab::Platform;
use crate::core::coordinator::Coordinator;
use crate::core::{mirror, summary};
use crate::errors::AppResult;
use crate::models::ids::{ChannelId, EventId, MessageId, UserId};
use crate::models::occurrence::Occurrence;
use crate::models::settings::Schedule;
use crate::models::snapshot::RosterSnapshot;
use chrono::{DateTime, FixedOffset};
use tracing::{info, warn};

/// Optional overrides of the configured schedule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupRequest {
    pub channel: ChannelId,
    pub weekday: Option<String>,
    pub time: Option<String>,
    pub timezone: Option<String>,
    /// YYYY-MM-DD; makes the occurrence a one-off.
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupReport {
    pub message: MessageId,
    pub channel: ChannelId,
    pub event: Option<EventId>,
    pub starts_at: DateTime<FixedOffset>,
    pub week_of: String,
}

/// Validate the request against the configured schedule.
pub fn resolve_occurrence(defaults: &Schedule, request: &SetupRequest) -> AppResult<Occurrence> {
    let schedule = Schedule {
        weekday: request
            .weekday
            .clone()
            .unwrap_or_else(|| defaults.weekday.clone()),
        time: request.time.clone().unwrap_or_else(|| defaults.time.clone()),
        timezone: request
            .timezone
            .clone()
            .unwrap_or_else(|| defaults.timezone.clone()),
    };

    // the weekday is validated even when a date makes it irrelevant
    let rule = schedule.rule()?;
    match &request.date {
        Some(date) => schedule.on_date(date),
        None => Ok(rule),
    }
}

impl<P: Platform> Coordinator<P> {
    /// Post a fresh signup message and bind the roster to it. Nothing is
    /// mutated when validation or posting fails.
    pub fn setup(&mut self, request: SetupRequest) -> AppResult<SetupReport> {
        let occurrence = resolve_occurrence(&self.schedule, &request)?;
        let starts_at = occurrence.next_after(self.clock_now())?;
        let week_of = starts_at.format("%Y-%m-%d").to_string();
        let ends_at = mirror::event_end(&self.settings, starts_at)?;

        let fresh = RosterSnapshot {
            occurrence: Some(occurrence.clone()),
            ..RosterSnapshot::default()
        };
        let summary = summary::project(&fresh, &self.model, &self.settings, Ok(starts_at));
        let message =
            self.platform
                .post_signup(request.channel, &summary, &self.model.all_tokens())?;

        self.store.clear_entries();
        self.store.bind_message(message, request.channel);
        self.store.set_occurrence(occurrence, week_of.clone());

        let draft = mirror::draft(&self.settings, &self.model, &self.store, starts_at, ends_at);
        let event = mirror::create(&mut self.platform, &draft);
        self.store.bind_event(event);
        self.store.commit();

        info!(message = %message, channel = %request.channel, ?event, %week_of, "signup posted");
        self.record(
            "setup",
            &format!("message {}", message),
            &format!(
                "Signup for {} posted{}",
                week_of,
                if event.is_some() { " with event" } else { ", event not created" }
            ),
        );

        Ok(SetupReport {
            message,
            channel: request.channel,
            event,
            starts_at,
            week_of,
        })
    }

    /// Empty the roster but keep the message and event bound.
    pub fn clear_roster(&mut self) -> AppResult<()> {
        if let Some(message) = self.store.snapshot().message_id {
            let users: Vec<UserId> = self.store.entries().iter().map(|e| e.user_id).collect();
            let tokens = self.model.all_tokens();
            match self.platform.active_tokens_for(message, &tokens) {
                Ok(active) => {
                    for (user, token) in active.into_iter().filter(|(u, _)| users.contains(u)) {
                        if let Err(e) = self.platform.retract_input(message, &token, user) {
                            warn!(user = %user, error = %e, "could not retract reaction while clearing");
                        }
                    }
                }
                Err(e) => warn!(error = %e, "could not read reactions while clearing"),
            }
        }

        self.store.clear_entries();
        self.store.commit();
        self.republish();

        info!("roster cleared");
        self.record("clear", "", "Roster cleared");
        Ok(())
    }

    /// Clear the roster and forget the message, channel and event.
    pub fn full_reset(&mut self) -> AppResult<()> {
        self.store.clear_entries();
        self.store.unbind();
        self.store.commit();

        info!("roster reset");
        self.record("reset", "", "Roster and bindings reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    fn request() -> SetupRequest {
        SetupRequest {
            channel: ChannelId(7),
            ..SetupRequest::default()
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let occ = resolve_occurrence(&Schedule::default(), &request()).unwrap();
        assert_eq!(occ, Schedule::default().rule().unwrap());
    }

    #[test]
    fn overrides_are_applied() {
        let req = SetupRequest {
            weekday: Some("fri".into()),
            time: Some("8pm".into()),
            timezone: Some("Europe/Rome".into()),
            ..request()
        };
        let occ = resolve_occurrence(&Schedule::default(), &req).unwrap();
        assert_eq!(
            occ,
            Occurrence::Recurring {
                weekday: 4,
                hour: 20,
                minute: 0,
                timezone: "Europe/Rome".into()
            }
        );
    }

    #[test]
    fn invalid_overrides_are_rejected() {
        let bad = SetupRequest {
            weekday: Some("caturday".into()),
            ..request()
        };
        assert!(matches!(
            resolve_occurrence(&Schedule::default(), &bad),
            Err(AppError::InvalidWeekday(_))
        ));

        let bad = SetupRequest {
            date: Some("next week".into()),
            ..request()
        };
        assert!(matches!(
            resolve_occurrence(&Schedule::default(), &bad),
            Err(AppError::InvalidDate(_))
        ));
    }
}
