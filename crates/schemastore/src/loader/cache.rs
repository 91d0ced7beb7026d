//! In-memory cache of resolved schemas
//!
//! Entries are keyed by fully-qualified name and live for the lifetime of the
//! owning store. There is no eviction.
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::loader::resolver::ResolutionContext;
use std::collections::HashMap;
use std::sync::Arc;

/// In-memory cache for resolved schemas
#[derive(Debug)]
pub struct SchemaCache<S> {
    entries: HashMap<String, Arc<S>>,
}

impl<S> SchemaCache<S> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Get a cached schema
    pub fn get(&self, fullname: &str) -> Option<&Arc<S>> {
        self.entries.get(fullname)
    }

    /// Cache a schema, returning the entry it replaced
    pub fn insert(&mut self, fullname: String, schema: Arc<S>) -> Option<Arc<S>> {
        self.entries.insert(fullname, schema)
    }

    /// Remove a specific entry from cache
    pub fn remove(&mut self, fullname: &str) -> Option<Arc<S>> {
        self.entries.remove(fullname)
    }

    /// Check if cache contains a name
    pub fn contains(&self, fullname: &str) -> bool {
        self.entries.contains_key(fullname)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all cached entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<S>)> {
        self.entries.iter().map(|(name, schema)| (name.as_str(), schema))
    }
}

impl<S> Default for SchemaCache<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> ResolutionContext<S> for SchemaCache<S> {
    fn lookup(&self, fullname: &str) -> Option<&Arc<S>> {
        self.get(fullname)
    }

    fn insert(&mut self, fullname: String, schema: Arc<S>) {
        self.entries.insert(fullname, schema);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_cache_operations() {
        let mut cache: SchemaCache<&'static str> = SchemaCache::new();
        assert!(cache.is_empty());

        let widget = Arc::new("widget");
        assert!(cache.insert("com.example.Widget".to_string(), Arc::clone(&widget)).is_none());
        assert!(cache.contains("com.example.Widget"));
        assert!(Arc::ptr_eq(cache.get("com.example.Widget").unwrap(), &widget));

        assert!(cache.remove("com.example.Widget").is_some());
        assert!(cache.get("com.example.Widget").is_none());
        assert!(cache.remove("com.example.Widget").is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        let mut cache: SchemaCache<u8> = SchemaCache::new();
        for name in ["y.z.Z", "x", "y.Y"] {
            cache.insert(name.to_string(), Arc::new(0));
        }
        assert_eq!(cache.names(), vec!["x", "y.Y", "y.z.Z"]);
        assert_eq!(cache.iter().count(), 3);
    }

    #[test]
    fn test_cache_as_resolution_context() {
        let mut cache: SchemaCache<u8> = SchemaCache::default();
        {
            let context: &mut dyn ResolutionContext<u8> = &mut cache;
            context.insert("a".to_string(), Arc::new(7));
            assert_eq!(context.lookup("a").map(|s| **s), Some(7));
            assert!(context.lookup("b").is_none());
        }
        assert_eq!(cache.len(), 1);
    }
}
