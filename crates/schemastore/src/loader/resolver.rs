//! Resolution context handed to the schema parser
//!
//! This module handles:
//! - The lookup/insert contract the parser resolves references through
//! - Journaling of the entries a single parse attempt inserts
//! - Cycle and depth detection across dependency loads
//!
//! Copyright (c) 2025 SchemaStore Team
//! Licensed under the Apache-2.0 license

use crate::loader::cache::SchemaCache;
use crate::loader::error::{StoreError, StoreResult};
use std::sync::Arc;

/// Default cap on nested dependency loads.
///
/// Cycles are caught by the stack itself; the cap only keeps a very long
/// acyclic chain from overflowing the thread stack.
pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 512;

/// Already-resolved schemas visible to the parser
pub trait ResolutionContext<S> {
    /// Look up a fully-resolved schema by fully-qualified name
    fn lookup(&self, fullname: &str) -> Option<&Arc<S>>;

    /// Make a fully-resolved schema visible under its fully-qualified name
    fn insert(&mut self, fullname: String, schema: Arc<S>);
}

/// Context for a single parse attempt over the store cache.
///
/// Every insertion is journaled so a failed attempt can be undone without
/// touching entries resolved outside of it.
pub struct ResolutionScope<'a, S> {
    cache: &'a mut SchemaCache<S>,
    journal: Journal<S>,
}

impl<'a, S> ResolutionScope<'a, S> {
    pub fn new(cache: &'a mut SchemaCache<S>) -> Self {
        Self {
            cache,
            journal: Journal::default(),
        }
    }

    /// Names inserted during this attempt, in insertion order
    pub fn inserted(&self) -> impl Iterator<Item = &str> {
        self.journal.names()
    }

    /// Keep everything inserted during this attempt
    pub fn commit(self) -> Vec<String> {
        self.journal.entries.into_iter().map(|entry| entry.name).collect()
    }

    /// Undo every insertion of this attempt, restoring replaced entries
    pub fn rollback(self) -> usize {
        self.journal.rollback(self.cache)
    }

    /// Release the cache while keeping the attempt's entries in place.
    ///
    /// The returned journal undoes them later with [`Journal::rollback`].
    pub fn detach(self) -> Journal<S> {
        self.journal
    }
}

struct JournalEntry<S> {
    name: String,
    previous: Option<Arc<S>>,
    inserted: Arc<S>,
}

/// Insertions made by one parse attempt, oldest first
pub struct Journal<S> {
    entries: Vec<JournalEntry<S>>,
}

impl<S> Default for Journal<S> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<S> Journal<S> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    fn record(&mut self, name: String, previous: Option<Arc<S>>, inserted: Arc<S>) {
        self.entries.push(JournalEntry {
            name,
            previous,
            inserted,
        });
    }

    /// Undo the recorded insertions, newest first.
    ///
    /// An entry replaced since it was recorded belongs to someone else and is
    /// left alone. Returns the number of entries undone.
    pub fn rollback(self, cache: &mut SchemaCache<S>) -> usize {
        let mut undone = 0;
        for entry in self.entries.into_iter().rev() {
            let current = cache
                .get(&entry.name)
                .is_some_and(|schema| Arc::ptr_eq(schema, &entry.inserted));
            if !current {
                continue;
            }

            match entry.previous {
                Some(schema) => {
                    cache.insert(entry.name, schema);
                }
                None => {
                    cache.remove(&entry.name);
                }
            }
            undone += 1;
        }
        undone
    }
}

impl<S> ResolutionContext<S> for ResolutionScope<'_, S> {
    fn lookup(&self, fullname: &str) -> Option<&Arc<S>> {
        self.cache.get(fullname)
    }

    fn insert(&mut self, fullname: String, schema: Arc<S>) {
        let previous = self.cache.insert(fullname.clone(), Arc::clone(&schema));
        self.journal.record(fullname, previous, schema);
    }
}

/// Chain of names currently being loaded
#[derive(Debug, Clone)]
pub struct ResolutionStack {
    chain: Vec<String>,
    max_depth: usize,
}

impl ResolutionStack {
    pub fn new(max_depth: usize) -> Self {
        Self {
            chain: Vec::new(),
            max_depth,
        }
    }

    /// Enter a load for `fullname`, rejecting cycles and runaway depth
    pub fn push(&mut self, fullname: &str) -> StoreResult<()> {
        if self.contains(fullname) {
            let mut chain = self.chain.clone();
            chain.push(fullname.to_string());
            return Err(StoreError::circular_reference(&chain));
        }

        if self.chain.len() >= self.max_depth {
            return Err(StoreError::ResolutionDepthExceeded {
                depth: self.max_depth,
                name: fullname.to_string(),
            });
        }

        self.chain.push(fullname.to_string());
        Ok(())
    }

    /// Leave the innermost load
    pub fn pop(&mut self) -> Option<String> {
        self.chain.pop()
    }

    pub fn contains(&self, fullname: &str) -> bool {
        self.chain.iter().any(|name| name == fullname)
    }

    pub fn depth(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}

impl Default for ResolutionStack {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RESOLUTION_DEPTH)
    }
}
