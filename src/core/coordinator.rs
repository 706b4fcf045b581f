//! The coordinator owns the roster and serializes every operation on it.
//!
//! Reconciliation lives in `reconcile.rs`, setup and resets in `setup.rs`;
//! both extend the same type.

use crate::collab::Platform;
use crate::core::clock::{Clock, SystemClock};
use crate::core::mirror;
use crate::core::summary::{self, Summary};
use crate::errors::AppResult;
use crate::models::category::CategoryModel;
use crate::models::ids::UserId;
use crate::models::settings::{EventSettings, Schedule};
use crate::store::{RosterStore, log};
use chrono::{DateTime, FixedOffset, Utc};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

pub struct Coordinator<P: Platform> {
    pub(crate) model: CategoryModel,
    pub(crate) settings: EventSettings,
    pub(crate) schedule: Schedule,
    pub(crate) store: RosterStore,
    pub(crate) platform: P,
    clock: Box<dyn Clock>,
    activity: Option<PathBuf>,
}

impl<P: Platform> Coordinator<P> {
    pub fn new(
        model: CategoryModel,
        settings: EventSettings,
        schedule: Schedule,
        store: RosterStore,
        platform: P,
    ) -> Self {
        Self {
            model,
            settings,
            schedule,
            store,
            platform,
            clock: Box::new(SystemClock),
            activity: None,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Append operator-visible operations to this activity log.
    pub fn with_activity_log(mut self, path: impl Into<PathBuf>) -> Self {
        self.activity = Some(path.into());
        self
    }

    pub fn model(&self) -> &CategoryModel {
        &self.model
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    pub fn into_parts(self) -> (RosterStore, P) {
        (self.store, self.platform)
    }

    pub(crate) fn clock_now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Start of the next game: the bound occurrence, else the configured rule.
    pub fn next_occurrence(&self) -> AppResult<DateTime<FixedOffset>> {
        let now = self.clock.now();
        match &self.store.snapshot().occurrence {
            Some(occ) => occ.next_after(now),
            None => self.schedule.rule()?.next_after(now),
        }
    }

    /// Current summary. Never mutates anything.
    pub fn status(&self) -> Summary {
        summary::project(
            self.store.snapshot(),
            &self.model,
            &self.settings,
            self.next_occurrence(),
        )
    }

    /// Re-render the bound message and mirror the totals.
    pub(crate) fn republish(&mut self) {
        let Some(message) = self.store.snapshot().message_id else {
            return;
        };
        let summary = self.status();
        if let Err(e) = self.platform.render_summary(message, &summary) {
            warn!(message = %message, error = %e, "failed to update signup message");
        }
        mirror::sync(
            &mut self.platform,
            self.store.snapshot().event_id,
            &self.settings,
            &self.model,
            &self.store,
        );
    }

    /// DM the user; fall back to a self-deleting channel post.
    pub(crate) fn notify(&mut self, user: UserId, text: &str) {
        let Err(e) = self.platform.notify_user(user, text) else {
            return;
        };
        debug!(user = %user, error = %e, "direct message failed, trying channel");

        let Some(channel) = self.store.snapshot().channel_id else {
            warn!(user = %user, error = %e, "could not notify user");
            return;
        };
        let ttl = Duration::from_secs(self.settings.transient_notice_secs);
        let text = format!("{} {}", user.mention(), text);
        if let Err(e) = self.platform.post_transient(channel, &text, ttl) {
            warn!(user = %user, channel = %channel, error = %e, "could not notify user");
        }
    }

    pub(crate) fn record(&self, operation: &str, target: &str, message: &str) {
        let Some(path) = &self.activity else {
            return;
        };
        if let Err(e) = log::ttlog(path, operation, target, message) {
            warn!(error = %e, "failed to write activity log");
        }
    }
}
