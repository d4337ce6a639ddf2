// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// A map from resource keys to their nearest-first ancestry chain.
///
/// Storing a chain also stores each of its suffixes under the key that starts
/// the suffix. Entries are never replaced: the first chain stored for a key
/// wins.
#[derive(Debug, Default)]
pub struct AncestryCache {
    entries: Mutex<HashMap<String, Vec<String>>>,
}

impl AncestryCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached chain for `key`, if any.
    pub fn get(&self, key: &str) -> Option<Vec<String>> {
        self.lock().get(key).cloned()
    }

    /// Returns true if `key` has a cached chain.
    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    /// Stores `ancestors` under `key` and each suffix under its first element.
    ///
    /// Empty keys and empty chains are ignored.
    pub fn store(&self, key: &str, ancestors: &[String]) {
        if key.is_empty() || ancestors.is_empty() {
            return;
        }
        let mut entries = self.lock();
        entries
            .entry(key.to_string())
            .or_insert_with(|| ancestors.to_vec());
        for (i, ancestor) in ancestors.iter().enumerate() {
            entries
                .entry(ancestor.clone())
                .or_insert_with(|| ancestors[i..].to_vec());
        }
    }

    /// The number of cached keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A copy of all the cached entries.
    pub fn snapshot(&self) -> HashMap<String, Vec<String>> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<String>>> {
        // The map is always left consistent, a poisoned lock is still usable.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
