//! In-memory entity snapshots held by the canvas.
//!
//! The host owns the real data. It loads snapshots with
//! [`EntityStore::replace_all`] and the canvas writes to them only when a
//! gesture commits, right before publishing the matching event.

use std::collections::BTreeMap;

use floorkit_core::{Device, PersonMarker, Zone};

/// Anything the canvas keys by a string id.
pub trait Entity: Clone {
    fn id(&self) -> &str;
}

impl Entity for Device {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for Zone {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for PersonMarker {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Id-ordered entity snapshot.
#[derive(Debug, Clone)]
pub struct EntityStore<T: Entity> {
    items: BTreeMap<String, T>,
    revision: u64,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            items: BTreeMap::new(),
            revision: 0,
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole snapshot. Later duplicates of an id win.
    pub fn replace_all(&mut self, items: impl IntoIterator<Item = T>) {
        self.items = items
            .into_iter()
            .map(|item| (item.id().to_string(), item))
            .collect();
        self.revision += 1;
    }

    /// Inserts or replaces one entity.
    pub fn upsert(&mut self, item: T) {
        self.items.insert(item.id().to_string(), item);
        self.revision += 1;
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        let removed = self.items.remove(id);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    /// Mutable access; bumps the revision because callers commit through it.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut T> {
        let item = self.items.get_mut(id);
        if item.is_some() {
            self.revision += 1;
        }
        item
    }

    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Entities in ascending id order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.items.values()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.items.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Bumped on every mutation; lets caches detect stale data.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

pub type DeviceStore = EntityStore<Device>;
pub type ZoneStore = EntityStore<Zone>;
pub type PeopleStore = EntityStore<PersonMarker>;
