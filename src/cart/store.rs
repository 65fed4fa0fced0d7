//! Key-value storage used to persist carts between sessions.

use dashmap::DashMap;

/// Minimal string key-value store, the shape of browser local storage.
///
/// Writes are last-writer-wins; there is no locking across keys.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String);
}

/// In-process store backed by a concurrent map
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set(&self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryStore::new();
        assert_eq!(store.get("cart"), None);

        store.set("cart", "[]".into());
        store.set("cart", "[{}]".into());
        assert_eq!(store.get("cart").as_deref(), Some("[{}]"));
    }
}
