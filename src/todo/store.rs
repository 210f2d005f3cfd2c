//! Persistent todo store.
//!
//! Items and completion flags live in two documents: the key `"list"`
//! holds a JSON array of items, the key `"doneMap"` holds a JSON object
//! mapping item id to a boolean. Every mutation rewrites both keys so
//! the backend always holds a consistent pair.
//!
//! Loading is forgiving: a missing or malformed document falls back to
//! a seeded default list (malformed input is logged, never propagated),
//! and completion flags with no matching item are kept as loaded.

use crate::storage::{Storage, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Storage key for the item list.
pub const LIST_KEY: &str = "list";
/// Storage key for the completion map.
pub const DONE_MAP_KEY: &str = "doneMap";

/// A single todo item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Stable identifier, unique within the list.
    pub id: u64,
    /// Display text.
    pub message: String,
}

type DoneMap = BTreeMap<u64, bool>;

fn seed_items() -> Vec<Todo> {
    vec![
        Todo {
            id: 1,
            message: "Apple".to_string(),
        },
        Todo {
            id: 2,
            message: "Banana".to_string(),
        },
        Todo {
            id: 3,
            message: "Cherry".to_string(),
        },
    ]
}

// Reads a key and deserializes it, treating every failure mode as
// absence. Parse errors are worth logging; scalar JSON of the wrong
// shape and missing keys are not.
fn load_key<T: for<'de> Deserialize<'de>>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(err) => {
            tracing::error!(key, %err, "discarding unparseable stored document");
            return None;
        }
    };
    if !value.is_array() && !value.is_object() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Todo items plus completion flags over a storage backend.
#[derive(Debug)]
pub struct Store<S: Storage> {
    storage: S,
    items: Vec<Todo>,
    done: DoneMap,
}

impl<S: Storage> Store<S> {
    /// Loads the store from `storage`, seeding a default list when the
    /// item list is absent or unreadable.
    pub fn load(storage: S) -> Self {
        let items = load_key::<Vec<Todo>>(&storage, LIST_KEY).unwrap_or_else(seed_items);
        let done = load_key::<DoneMap>(&storage, DONE_MAP_KEY).unwrap_or_default();
        Self {
            storage,
            items,
            done,
        }
    }

    /// Returns the items in list order.
    pub fn items(&self) -> &[Todo] {
        &self.items
    }

    /// Returns whether the item with `id` is marked done. Absent ids
    /// read as not done.
    pub fn is_done(&self, id: u64) -> bool {
        self.done.get(&id).copied().unwrap_or(false)
    }

    /// Appends a new item with the given text and returns its id.
    ///
    /// Ids are allocated as one past the current maximum, so removing
    /// items never causes a later addition to collide with a survivor.
    pub fn add_item(&mut self, message: impl Into<String>) -> Result<u64, StorageError> {
        let id = self.items.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        self.items.push(Todo {
            id,
            message: message.into(),
        });
        self.sync()?;
        Ok(id)
    }

    /// Flips the completion flag for `id`. An id with no flag yet is
    /// treated as not done and becomes done.
    pub fn toggle_done(&mut self, id: u64) -> Result<(), StorageError> {
        let flag = self.done.entry(id).or_insert(false);
        *flag = !*flag;
        self.sync()
    }

    /// Removes the first item with `id`, if any. The completion map is
    /// left untouched, so a flag may outlive its item.
    pub fn remove_item(&mut self, id: u64) -> Result<(), StorageError> {
        if let Some(index) = self.items.iter().position(|t| t.id == id) {
            self.items.remove(index);
            self.sync()?;
        }
        Ok(())
    }

    fn sync(&mut self) -> Result<(), StorageError> {
        // Serialization of these shapes cannot fail; only the backend can.
        let list = serde_json::to_string(&self.items).unwrap_or_default();
        let done = serde_json::to_string(&self.done).unwrap_or_default();
        self.storage.set(LIST_KEY, &list)?;
        self.storage.set(DONE_MAP_KEY, &done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_seeds_when_empty() {
        let store = Store::load(MemoryStorage::new());
        let messages: Vec<&str> = store.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["Apple", "Banana", "Cherry"]);
        assert_eq!(store.items()[2].id, 3);
    }

    #[test]
    fn test_seeds_on_malformed_list() {
        let mut backend = MemoryStorage::new();
        backend.set(LIST_KEY, "{not json").unwrap();
        backend.set(DONE_MAP_KEY, "42").unwrap();
        let store = Store::load(backend);
        assert_eq!(store.items().len(), 3);
        assert!(!store.is_done(1));
    }

    #[test]
    fn test_loads_persisted_state() {
        let mut backend = MemoryStorage::new();
        backend
            .set(LIST_KEY, r#"[{"id":7,"message":"Fig"}]"#)
            .unwrap();
        backend.set(DONE_MAP_KEY, r#"{"7":true}"#).unwrap();
        let store = Store::load(backend);
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.items()[0].message, "Fig");
        assert!(store.is_done(7));
    }

    #[test]
    fn test_add_allocates_past_max_id() {
        let mut store = Store::load(MemoryStorage::new());
        let id = store.add_item("Date").unwrap();
        assert_eq!(id, 4);

        // Removing the max and adding again must not reuse a live id
        store.remove_item(4).unwrap();
        store.remove_item(3).unwrap();
        let id = store.add_item("Elderberry").unwrap();
        assert_eq!(id, 3);
        store.remove_item(1).unwrap();
        let id = store.add_item("Fig").unwrap();
        assert_eq!(id, 4);
    }

    #[test]
    fn test_add_to_empty_list_starts_at_one() {
        let mut backend = MemoryStorage::new();
        backend.set(LIST_KEY, "[]").unwrap();
        let mut store = Store::load(backend);
        assert_eq!(store.add_item("Apple").unwrap(), 1);
    }

    #[test]
    fn test_toggle_done() {
        let mut store = Store::load(MemoryStorage::new());
        assert!(!store.is_done(2));
        store.toggle_done(2).unwrap();
        assert!(store.is_done(2));
        store.toggle_done(2).unwrap();
        assert!(!store.is_done(2));
    }

    #[test]
    fn test_remove_keeps_order_and_flags() {
        let mut store = Store::load(MemoryStorage::new());
        store.toggle_done(1).unwrap();
        store.remove_item(1).unwrap();
        let ids: Vec<u64> = store.items().iter().map(|t| t.id).collect();
        assert_eq!(ids, [2, 3]);
        // Orphaned flag survives removal
        assert!(store.is_done(1));
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = Store::load(MemoryStorage::new());
        store.remove_item(99).unwrap();
        assert_eq!(store.items().len(), 3);
    }

    #[test]
    fn test_file_backend_roundtrip_and_corrupt_fallback() {
        use crate::storage::FileStorage;

        let dir = tempfile::tempdir().unwrap();
        {
            let backend = FileStorage::new(dir.path()).unwrap();
            let mut store = Store::load(backend);
            store.add_item("Date").unwrap();
            store.toggle_done(4).unwrap();
        }
        {
            let backend = FileStorage::new(dir.path()).unwrap();
            let store = Store::load(backend);
            assert_eq!(store.items().len(), 4);
            assert!(store.is_done(4));
        }

        // A corrupted list file falls back to the seed list
        std::fs::write(dir.path().join("list.json"), "{{{").unwrap();
        let backend = FileStorage::new(dir.path()).unwrap();
        let store = Store::load(backend);
        let messages: Vec<&str> = store.items().iter().map(|t| t.message.as_str()).collect();
        assert_eq!(messages, ["Apple", "Banana", "Cherry"]);
    }

    #[test]
    fn test_mutations_persist_both_keys() {
        let mut store = Store::load(MemoryStorage::new());
        store.add_item("Date").unwrap();
        store.toggle_done(2).unwrap();

        // A fresh store over a copy of the backend sees the same state
        let reloaded = Store::load(store.storage.clone());
        assert_eq!(reloaded.items().len(), 4);
        assert!(reloaded.is_done(2));
        assert_eq!(reloaded.items()[3].message, "Date");
    }
}
