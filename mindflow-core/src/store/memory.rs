use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::StateStorage;

/// In-process storage. Clones share the same map, so two stores opened over
/// clones of one handle behave like two tabs over the same browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("memory storage mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self, key: &str) -> crate::error::Result<Option<String>> {
        let entries = self.entries.lock().expect("memory storage mutex poisoned");
        Ok(entries.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> crate::error::Result<()> {
        let mut entries = self.entries.lock().expect("memory storage mutex poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> crate::error::Result<()> {
        let mut entries = self.entries.lock().expect("memory storage mutex poisoned");
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.save("k", "v").unwrap();
        assert_eq!(b.load("k").unwrap().as_deref(), Some("v"));
        b.remove("k").unwrap();
        assert!(a.is_empty());
    }
}
