//! Roster store: the in-memory roster table plus its bindings, persisted
//! write-through to a single snapshot file.

pub mod file;
pub mod log;

use crate::errors::AppResult;
use crate::models::entry::RosterEntry;
use crate::models::ids::{ChannelId, EventId, MessageId, UserId};
use crate::models::occurrence::Occurrence;
use crate::models::snapshot::RosterSnapshot;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

#[derive(Debug, Default)]
pub struct RosterStore {
    snapshot: RosterSnapshot,
    path: Option<PathBuf>,
    unsaved: bool,
}

impl RosterStore {
    /// A store with no backing file. Persisting is a no-op.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: RosterSnapshot) -> Self {
        let mut store = Self {
            snapshot,
            path: None,
            unsaved: false,
        };
        store.prune_empty();
        store
    }

    /// Load the snapshot at `path`. A missing or unreadable file yields the
    /// empty default; the path is kept so later writes land there.
    pub fn restore(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let snapshot = match file::load_snapshot(&path) {
            Ok(Some(s)) => {
                debug!(path = %path.display(), entries = s.entries.len(), "snapshot restored");
                s
            }
            Ok(None) => {
                debug!(path = %path.display(), "no snapshot yet, starting empty");
                RosterSnapshot::default()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "snapshot unreadable, starting empty");
                RosterSnapshot::default()
            }
        };

        let mut store = Self::with_snapshot(snapshot);
        store.path = Some(path);
        store
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn snapshot(&self) -> &RosterSnapshot {
        &self.snapshot
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.snapshot.entries
    }

    pub fn entry(&self, user: UserId) -> Option<&RosterEntry> {
        self.snapshot.entries.iter().find(|e| e.user_id == user)
    }

    /// Existing entry for `user`, or a fresh zero-valued one appended at the
    /// end. A fresh entry left at zero is dropped by the next prune.
    pub fn get_or_create(&mut self, user: UserId) -> &mut RosterEntry {
        let idx = match self.snapshot.entries.iter().position(|e| e.user_id == user) {
            Some(i) => i,
            None => {
                self.snapshot.entries.push(RosterEntry::new(user));
                self.snapshot.entries.len() - 1
            }
        };
        &mut self.snapshot.entries[idx]
    }

    pub fn weight_of(&self, user: UserId, category: &str) -> u32 {
        self.entry(user).map(|e| e.weight(category)).unwrap_or(0)
    }

    /// Overwrite the stored weight. Never adds to the previous value.
    pub fn set_category_weight(&mut self, user: UserId, category: &str, weight: u32) {
        if weight == 0 && self.entry(user).is_none() {
            return;
        }
        self.get_or_create(user).set(category, weight);
        self.unsaved = true;
    }

    /// Remove entries with nothing left in any category.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.snapshot.entries.len();
        self.snapshot.entries.retain(|e| !e.is_empty());
        let pruned = before - self.snapshot.entries.len();
        if pruned > 0 {
            debug!(pruned, "pruned empty roster entries");
        }
        pruned
    }

    pub fn total_weight(&self, category: &str) -> u32 {
        self.snapshot
            .entries
            .iter()
            .map(|e| e.weight(category))
            .sum()
    }

    /// Users holding a nonzero weight in `category`, in store order.
    pub fn members<'a>(&'a self, category: &'a str) -> impl Iterator<Item = (UserId, u32)> + 'a {
        self.snapshot.entries.iter().filter_map(move |e| {
            let w = e.weight(category);
            (w > 0).then_some((e.user_id, w))
        })
    }

    pub fn clear_entries(&mut self) {
        self.snapshot.entries.clear();
        self.unsaved = true;
    }

    pub fn bind_message(&mut self, message: MessageId, channel: ChannelId) {
        self.snapshot.message_id = Some(message);
        self.snapshot.channel_id = Some(channel);
        self.unsaved = true;
    }

    pub fn bind_event(&mut self, event: Option<EventId>) {
        self.snapshot.event_id = event;
        self.unsaved = true;
    }

    pub fn set_occurrence(&mut self, occurrence: Occurrence, week_of: String) {
        self.snapshot.occurrence = Some(occurrence);
        self.snapshot.week_of = Some(week_of);
        self.unsaved = true;
    }

    pub fn unbind(&mut self) {
        self.snapshot.unbind();
        self.unsaved = true;
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Prune, then write the snapshot. On failure the in-memory state stays
    /// authoritative and is retried by the next write or on drop.
    pub fn persist(&mut self) -> AppResult<()> {
        self.prune_empty();
        let Some(path) = self.path.as_deref() else {
            self.unsaved = false;
            return Ok(());
        };
        match file::save_snapshot(path, &self.snapshot) {
            Ok(()) => {
                self.unsaved = false;
                Ok(())
            }
            Err(e) => {
                self.unsaved = true;
                Err(e)
            }
        }
    }

    /// Write-through after a mutation; failures are logged, not returned.
    pub fn commit(&mut self) {
        if let Err(e) = self.persist() {
            error!(error = %e, "failed to persist roster snapshot");
        }
    }

    /// Best-effort final write of anything not yet on disk.
    pub fn flush(&mut self) -> AppResult<()> {
        if self.unsaved {
            self.persist()?;
        }
        Ok(())
    }
}

impl Drop for RosterStore {
    fn drop(&mut self) {
        if self.unsaved && self.path.is_some() {
            if let Err(e) = self.persist() {
                error!(error = %e, "final snapshot write failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const ANNA: UserId = UserId(1);
    const BRUNO: UserId = UserId(2);

    #[test]
    fn set_overwrites_instead_of_adding() {
        let mut store = RosterStore::in_memory();
        store.set_category_weight(ANNA, "main", 3);
        store.set_category_weight(ANNA, "main", 2);
        assert_eq!(store.weight_of(ANNA, "main"), 2);
        assert_eq!(store.total_weight("main"), 2);
    }

    #[test]
    fn prune_removes_all_zero_entries() {
        let mut store = RosterStore::in_memory();
        store.set_category_weight(ANNA, "main", 1);
        store.set_category_weight(BRUNO, "travelers", 2);
        store.set_category_weight(ANNA, "main", 0);
        assert_eq!(store.prune_empty(), 1);
        assert!(store.entry(ANNA).is_none());
        assert!(store.entry(BRUNO).is_some());
    }

    #[test]
    fn get_or_create_does_not_survive_prune_when_untouched() {
        let mut store = RosterStore::in_memory();
        store.get_or_create(ANNA);
        assert_eq!(store.entries().len(), 1);
        store.prune_empty();
        assert!(store.entries().is_empty());
    }

    #[test]
    fn members_keep_store_order() {
        let mut store = RosterStore::in_memory();
        store.set_category_weight(BRUNO, "main", 1);
        store.set_category_weight(ANNA, "main", 4);
        store.set_category_weight(ANNA, "interested", 1);
        let main: Vec<_> = store.members("main").collect();
        assert_eq!(main, vec![(BRUNO, 1), (ANNA, 4)]);
        assert_eq!(store.total_weight("main"), 5);
    }

    #[test]
    fn persist_and_restore_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let mut store = RosterStore::restore(&path);
        store.bind_message(MessageId(10), ChannelId(20));
        store.bind_event(Some(EventId(30)));
        store.set_category_weight(ANNA, "main", 3);
        store.set_category_weight(BRUNO, "storyteller", 1);
        store.persist().unwrap();
        let expected = store.snapshot().clone();
        drop(store);

        let restored = RosterStore::restore(&path);
        assert_eq!(restored.snapshot(), &expected);
    }

    #[test]
    fn malformed_snapshot_restores_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        std::fs::write(&path, "{ this is not json").unwrap();

        let store = RosterStore::restore(&path);
        assert_eq!(store.snapshot(), &RosterSnapshot::default());
        assert_eq!(store.path(), Some(path.as_path()));
    }

    #[test]
    fn missing_snapshot_restores_empty() {
        let dir = tempdir().unwrap();
        let store = RosterStore::restore(dir.path().join("absent.json"));
        assert!(store.entries().is_empty());
        assert!(!store.snapshot().is_bound());
    }

    #[test]
    fn failed_write_keeps_memory_state_and_flags_unsaved() {
        let dir = tempdir().unwrap();
        // a directory where the file should be makes the rename fail
        let path = dir.path().join("snapshot.json");
        std::fs::create_dir_all(&path).unwrap();

        let mut store = RosterStore::restore(&path);
        store.set_category_weight(ANNA, "main", 2);
        assert!(store.persist().is_err());
        assert!(store.has_unsaved_changes());
        assert_eq!(store.weight_of(ANNA, "main"), 2);
    }

    #[test]
    fn drop_writes_pending_changes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        {
            let mut store = RosterStore::restore(&path);
            store.set_category_weight(ANNA, "travelers", 1);
        }
        let restored = RosterStore::restore(&path);
        assert_eq!(restored.weight_of(ANNA, "travelers"), 1);
    }

    #[test]
    fn members_accepts_a_short_lived_category_name() {
        let mut store = RosterStore::in_memory();
        store.set_category_weight(ANNA, "main", 2);
        store.set_category_weight(BRUNO, "interested", 1);

        let members: Vec<(UserId, u32)> = {
            let category = String::from("main");
            store.members(&category).collect()
        };
        assert_eq!(members, vec![(ANNA, 2)]);
    }
}
