//! Historical-grid uniqueness registry.
//!
//! Injected into the generator so it can avoid re-issuing an identical grid.
//! Read/append-only; implementations must be safe to share across concurrent
//! generation tasks.

use parking_lot::RwLock;
use std::collections::HashSet;

pub trait UniquenessRegistry: Send + Sync {
    fn has_hash(&self, hash: &str) -> bool;
    fn add_hash(&self, hash: String);
}

/// Process-local registry backed by a read-write lock.
#[derive(Debug, Default)]
pub struct InMemoryUniquenessRegistry {
    hashes: RwLock<HashSet<String>>,
}

impl InMemoryUniquenessRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.hashes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.read().is_empty()
    }
}

impl UniquenessRegistry for InMemoryUniquenessRegistry {
    fn has_hash(&self, hash: &str) -> bool {
        self.hashes.read().contains(hash)
    }

    fn add_hash(&self, hash: String) {
        self.hashes.write().insert(hash);
    }
}

/// Registry that remembers nothing. The default when callers do not care
/// about historical duplicates.
#[derive(Debug, Default)]
pub struct NullRegistry;

impl UniquenessRegistry for NullRegistry {
    fn has_hash(&self, _hash: &str) -> bool {
        false
    }

    fn add_hash(&self, _hash: String) {}
}
