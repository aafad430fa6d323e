//! This module contains the memoizing cache for per-contract type metadata.
//!
//! Metadata for a (contract, epoch) pair is computed at most once; the write
//! lock is held across the build so that concurrent callers for the same key
//! cannot race a second walk of the type tree. Readers of an already-built
//! entry share the `Arc` without further synchronization.

use std::{collections::HashMap, sync::Arc};

use parking_lot::RwLock;

use crate::{error::decode::Result, metadata::Metadata, protocols::Epoch};

/// A memoizing metadata cache keyed by contract address and epoch.
#[derive(Debug, Default)]
pub struct MetadataCache {
    entries: RwLock<HashMap<(String, Epoch), Arc<Metadata>>>,
}

impl MetadataCache {
    /// Constructs an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the metadata for the provided key, building it with `build` on
    /// the first request.
    ///
    /// A failed build is not cached; the next caller retries.
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if `build` fails.
    pub fn get_or_build<F>(&self, address: &str, epoch: Epoch, build: F) -> Result<Arc<Metadata>>
    where
        F: FnOnce() -> Result<Metadata>,
    {
        let key = (address.to_owned(), epoch);

        if let Some(existing) = self.entries.read().get(&key) {
            return Ok(Arc::clone(existing));
        }

        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(&key) {
            return Ok(Arc::clone(existing));
        }

        let built = Arc::new(build()?);
        entries.insert(key, Arc::clone(&built));
        Ok(built)
    }

    /// Gets the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Checks whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
