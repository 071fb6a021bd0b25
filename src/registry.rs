//! Connection registry
//!
//! Maps display names to the connection that registered them. Used for the
//! "N users online" greeting and for the duplicate-name policy.

use std::collections::HashMap;

use crate::types::ConnectionId;

/// Name → connection lookup table
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<String, ConnectionId>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the entry for `name` (last write wins)
    ///
    /// Returns the connection that previously held the name, if any.
    pub fn register(&mut self, name: String, id: ConnectionId) -> Option<ConnectionId> {
        self.entries.insert(name, id)
    }

    /// Remove the entry for `name`; absent names are a no-op
    pub fn unregister(&mut self, name: &str) -> Option<ConnectionId> {
        self.entries.remove(name)
    }

    /// Remove the entry for `name` only while it still belongs to `id`
    pub fn unregister_if(&mut self, name: &str, id: ConnectionId) -> bool {
        if self.entries.get(name) == Some(&id) {
            self.entries.remove(name);
            true
        } else {
            false
        }
    }

    /// Number of registered names
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<ConnectionId> {
        self.entries.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_count() {
        let mut registry = Registry::new();
        assert_eq!(registry.count(), 0);

        registry.register("Alice".to_string(), ConnectionId::new());
        registry.register("Bob".to_string(), ConnectionId::new());

        assert_eq!(registry.count(), 2);
        assert!(registry.contains("Alice"));
        assert!(registry.contains("Bob"));
    }

    #[test]
    fn test_register_overwrites() {
        let mut registry = Registry::new();
        let first = ConnectionId::new();
        let second = ConnectionId::new();

        assert_eq!(registry.register("Alice".to_string(), first), None);
        assert_eq!(registry.register("Alice".to_string(), second), Some(first));

        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get("Alice"), Some(second));
    }

    #[test]
    fn test_unregister_absent_is_noop() {
        let mut registry = Registry::new();
        registry.register("Alice".to_string(), ConnectionId::new());

        assert_eq!(registry.unregister("Nobody"), None);
        assert_eq!(registry.count(), 1);

        assert!(registry.unregister("Alice").is_some());
        assert_eq!(registry.unregister("Alice"), None);
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_unregister_if_keeps_newer_owner() {
        let mut registry = Registry::new();
        let old = ConnectionId::new();
        let new = ConnectionId::new();
        registry.register("Alice".to_string(), old);
        registry.register("Alice".to_string(), new);

        assert!(!registry.unregister_if("Alice", old));
        assert_eq!(registry.get("Alice"), Some(new));

        assert!(registry.unregister_if("Alice", new));
        assert!(!registry.contains("Alice"));
    }
}
