//! Authoritative identity bookkeeping for connected participants
//!
//! Two small structures live here:
//! - [`IdentityRoster`]: the id-to-display-name mapping, kept in first-seen
//!   order. Only the authoritative process holds one; replicas learn names
//!   through roster broadcasts.
//! - [`NameIndex`]: the reverse name-to-id index used to resolve
//!   human-chosen inputs (like a pre-game winner's name) to a connection.
//!   Never replicated; clients have no use for it.

use log::info;
use shared::PlayerId;
use std::collections::HashMap;

/// Mapping from stable identifier to display name, in first-seen order.
///
/// Names may be blank (a disconnected-but-not-yet-cleaned-up slot); consumers
/// that pick an active turn-holder must skip blank entries.
#[derive(Debug, Default)]
pub struct IdentityRoster {
    entries: Vec<(PlayerId, String)>,
}

impl IdentityRoster {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Idempotent upsert. A repeated registration for the same id overwrites
    /// the stored name in place without changing roster order.
    pub fn register_or_update(&mut self, id: PlayerId, name: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(eid, _)| *eid == id) {
            if entry.1 != name {
                info!("Roster update: {} is now \"{}\"", id, name);
                entry.1 = name.to_string();
            }
        } else {
            info!("Roster add: {} as \"{}\"", id, name);
            self.entries.push((id, name.to_string()));
        }
    }

    /// No-op when the id is absent.
    pub fn remove(&mut self, id: PlayerId) {
        let before = self.entries.len();
        self.entries.retain(|(eid, _)| *eid != id);
        if self.entries.len() != before {
            info!("Roster remove: {}", id);
        }
    }

    pub fn name_of(&self, id: PlayerId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(eid, _)| *eid == id)
            .map(|(_, name)| name.as_str())
    }

    pub fn contains(&self, id: PlayerId) -> bool {
        self.entries.iter().any(|(eid, _)| *eid == id)
    }

    /// Ordered snapshot of display names, for consumers that only need the
    /// name list.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|(_, name)| name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &str)> {
        self.entries.iter().map(|(id, name)| (*id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Reverse index from display name to stable identifier.
///
/// Unregistration only succeeds when the stored id matches exactly, so a
/// stale unregister cannot clobber a newer registration for the same name.
#[derive(Debug, Default)]
pub struct NameIndex {
    by_name: HashMap<String, PlayerId>,
}

impl NameIndex {
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: &str, id: PlayerId) {
        self.by_name.insert(name.to_string(), id);
    }

    /// No-op unless `name` is currently mapped to exactly `id`.
    pub fn unregister(&mut self, name: &str, id: PlayerId) {
        if self.by_name.get(name) == Some(&id) {
            self.by_name.remove(name);
        }
    }

    pub fn resolve(&self, name: &str) -> Option<PlayerId> {
        self.by_name.get(name).copied()
    }
}
